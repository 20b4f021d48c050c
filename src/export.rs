use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{error::AppError, models::trip::Trip};

pub const EXPORT_FILE_NAME: &str = "tugboat_trips.csv";

const HEADERS: [&str; 7] = [
    "Contractor",
    "Date",
    "Location",
    "Service Type",
    "Status",
    "Notes",
    "Invoice Status",
];

/// Renders trips as CSV: every field quoted, embedded quotes doubled,
/// rows separated by `\n` with no trailing newline.
pub fn to_csv<'a>(trips: impl IntoIterator<Item = &'a Trip>) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for trip in trips {
        writer.write_record([
            trip.contractor.as_str(),
            trip.date.as_str(),
            trip.location.as_str(),
            trip.service_type.as_str(),
            trip.status().as_str(),
            trip.notes.as_str(),
            trip.invoice_status().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| AppError::Other(anyhow::anyhow!("flushing csv: {}", err.error())))?;
    let mut text = String::from_utf8(bytes).map_err(|err| AppError::Other(err.into()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
