use crate::models::{invoice::InvoiceUpload, trip::TripDetails};

/// Draft state of the "new trip" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripForm {
    pub details: TripDetails,
    pub invoice: Option<InvoiceUpload>,
}

/// What a submitted form hands over to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTrip {
    pub details: TripDetails,
    pub invoice: Option<InvoiceUpload>,
}

impl TripForm {
    /// Sets a text field by its form name. Values are kept verbatim;
    /// unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        let slot = match name {
            "contractor" => &mut self.details.contractor,
            "date" => &mut self.details.date,
            "location" => &mut self.details.location,
            "serviceType" => &mut self.details.service_type,
            "notes" => &mut self.details.notes,
            _ => return,
        };
        *slot = value.into();
    }

    pub fn attach(&mut self, upload: InvoiceUpload) {
        self.invoice = Some(upload);
    }

    /// Hands over the draft and resets the form to its blank defaults.
    pub fn submit(&mut self) -> SubmittedTrip {
        let form = std::mem::take(self);
        SubmittedTrip {
            details: form.details,
            invoice: form.invoice,
        }
    }
}
