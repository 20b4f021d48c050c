use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::AppError,
    export::{self, EXPORT_FILE_NAME},
    filter::{self, StatusFilter},
    models::{form::TripForm, invoice::InvoiceUpload, trip::Trip},
    services::{trips::SaveStatus, verification},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trips_page))
        .route("/trips", post(trip_submit))
        .route("/trips/:index/verify", post(trip_verify))
        .route("/trips/:index/invoice", get(invoice_download))
        .route("/export", get(export_csv))
}

#[derive(Debug, Default, Deserialize)]
struct FilterQuery {
    status: Option<String>,
}

impl FilterQuery {
    fn selected(&self) -> Result<StatusFilter, AppError> {
        match self.status.as_deref() {
            None | Some("") => Ok(StatusFilter::All),
            Some(raw) => raw.parse(),
        }
    }
}

struct FilterOption {
    value: &'static str,
    selected: bool,
}

struct TripRow {
    index: usize,
    contractor: String,
    date: String,
    location: String,
    service_type: String,
    status: &'static str,
    notes: String,
    has_invoice: bool,
    invoice_name: String,
    awaiting_verification: bool,
    decided: bool,
    approved: bool,
}

impl TripRow {
    fn new(index: usize, trip: &Trip) -> Self {
        Self {
            index,
            contractor: trip.contractor.clone(),
            date: trip.date.clone(),
            location: trip.location.clone(),
            service_type: trip.service_type.clone(),
            status: trip.status().as_str(),
            notes: trip.notes.clone(),
            has_invoice: trip.has_invoice(),
            invoice_name: trip.invoice_name_text().to_string(),
            awaiting_verification: trip.awaiting_verification(),
            decided: trip.verified().is_some(),
            approved: trip.verified() == Some(true),
        }
    }
}

#[derive(Template)]
#[template(path = "trips.html")]
struct TripsTemplate {
    current_filter: &'static str,
    filters: Vec<FilterOption>,
    rows: Vec<TripRow>,
    total: usize,
    has_warning: bool,
    save_warning: String,
}

async fn trips_page(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let selected = query.selected()?;
    let trips = state.trips.lock().await;
    let rows = filter::filter_indexed(trips.all(), selected)
        .map(|(index, trip)| TripRow::new(index, trip))
        .collect();
    let filters = StatusFilter::OPTIONS
        .into_iter()
        .map(|option| FilterOption {
            value: option.as_str(),
            selected: option == selected,
        })
        .collect();
    let save_warning = trips.save_warning().unwrap_or_default().to_string();

    Ok(AskamaTemplateResponse::into_response(TripsTemplate {
        current_filter: selected.as_str(),
        filters,
        rows,
        total: trips.len(),
        has_warning: !save_warning.is_empty(),
        save_warning,
    }))
}

async fn trip_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut form = TripForm::default();
    let mut back_to = StatusFilter::All;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == "invoice" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            // Browsers send an empty part when no file was picked.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            form.attach(InvoiceUpload::new(file_name, content_type, bytes.to_vec()));
        } else if name == "status" {
            let value = field.text().await.map_err(bad_multipart)?;
            back_to = FilterQuery {
                status: Some(value),
            }
            .selected()
            .unwrap_or_default();
        } else {
            let value = field.text().await.map_err(bad_multipart)?;
            form.set_field(&name, value);
        }
    }

    let submitted = form.submit();
    let invoice = match submitted.invoice {
        Some(upload) => Some(state.invoices.store(&upload).await?),
        None => None,
    };
    let trip = Trip::pending(submitted.details, invoice);
    let contractor = trip.contractor.clone();

    let mut trips = state.trips.lock().await;
    let status = trips.append(trip).await;
    info!(
        index = trips.len() - 1,
        contractor = %contractor,
        saved = status.is_saved(),
        "trip added"
    );

    Ok(Redirect::to(&format!("/?status={back_to}")))
}

#[derive(Deserialize)]
struct VerifyForm {
    approved: bool,
    status: Option<String>,
}

async fn trip_verify(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<VerifyForm>,
) -> Result<Redirect, AppError> {
    let back_to = FilterQuery {
        status: form.status,
    }
    .selected()
    .unwrap_or_default();

    let mut trips = state.trips.lock().await;
    if let SaveStatus::Unsaved(reason) =
        verification::verify(&mut trips, index, form.approved).await?
    {
        warn!(index, "invoice decision kept in memory only: {reason}");
    }

    Ok(Redirect::to(&format!("/?status={back_to}")))
}

async fn invoice_download(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let invoice = {
        let trips = state.trips.lock().await;
        trips.get(index)?.invoice.clone().ok_or(AppError::NotFound)?
    };
    let bytes = state.invoices.read(&invoice).await?;

    Ok((
        [
            (header::CONTENT_TYPE, invoice.content_type.clone()),
            (header::CONTENT_DISPOSITION, invoice.content_disposition()),
        ],
        bytes,
    )
        .into_response())
}

async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, AppError> {
    let selected = query.selected()?;
    let csv = {
        let trips = state.trips.lock().await;
        export::to_csv(filter::filter(trips.all(), selected))?
    };
    info!(filter = %selected, "exported trips as csv");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv;charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

fn bad_multipart(err: MultipartError) -> AppError {
    AppError::BadRequest(err.to_string())
}
