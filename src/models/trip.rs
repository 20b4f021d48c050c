use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::invoice::InvoiceRef};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TripStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl TripStatus {
    pub const ALL: [TripStatus; 3] = [
        TripStatus::Pending,
        TripStatus::Approved,
        TripStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "Pending",
            TripStatus::Approved => "Approved",
            TripStatus::Rejected => "Rejected",
        }
    }

    /// Status implied by an invoice decision.
    pub fn from_verified(verified: Option<bool>) -> Self {
        match verified {
            None => TripStatus::Pending,
            Some(true) => TripStatus::Approved,
            Some(false) => TripStatus::Rejected,
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("unknown trip status: {s}")))
    }
}

/// Descriptive fields of a trip as entered in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripDetails {
    pub contractor: String,
    pub date: String,
    pub location: String,
    pub service_type: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", try_from = "StoredTrip")]
pub struct Trip {
    pub contractor: String,
    pub date: String,
    pub location: String,
    pub service_type: String,
    pub notes: String,
    #[serde(default)]
    pub invoice: Option<InvoiceRef>,
    status: TripStatus,
    #[serde(default)]
    verified: Option<bool>,
}

/// Trip as read from storage, before its invoice state is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTrip {
    contractor: String,
    date: String,
    location: String,
    service_type: String,
    notes: String,
    #[serde(default)]
    invoice: Option<InvoiceRef>,
    status: TripStatus,
    #[serde(default)]
    verified: Option<bool>,
}

impl TryFrom<StoredTrip> for Trip {
    type Error = String;

    fn try_from(stored: StoredTrip) -> Result<Self, Self::Error> {
        if stored.status != TripStatus::from_verified(stored.verified) {
            return Err(format!(
                "status {} does not match verified {:?}",
                stored.status, stored.verified
            ));
        }
        if stored.verified.is_some() && stored.invoice.is_none() {
            return Err("invoice decision recorded without an invoice".to_string());
        }
        Ok(Self {
            contractor: stored.contractor,
            date: stored.date,
            location: stored.location,
            service_type: stored.service_type,
            notes: stored.notes,
            invoice: stored.invoice,
            status: stored.status,
            verified: stored.verified,
        })
    }
}

impl Trip {
    /// A freshly submitted trip: Pending with no invoice decision.
    pub fn pending(details: TripDetails, invoice: Option<InvoiceRef>) -> Self {
        Self {
            contractor: details.contractor,
            date: details.date,
            location: details.location,
            service_type: details.service_type,
            notes: details.notes,
            invoice,
            status: TripStatus::Pending,
            verified: None,
        }
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn verified(&self) -> Option<bool> {
        self.verified
    }

    pub fn has_invoice(&self) -> bool {
        self.invoice.is_some()
    }

    /// Invoice column of the export, derived from `verified` alone.
    pub fn invoice_status(&self) -> TripStatus {
        TripStatus::from_verified(self.verified)
    }

    /// Whether approve/reject may be offered for this trip.
    pub fn awaiting_verification(&self) -> bool {
        self.has_invoice() && self.verified.is_none()
    }

    /// Records an invoice decision. Callers check preconditions first.
    pub(crate) fn record_decision(&mut self, approved: bool) {
        self.verified = Some(approved);
        self.status = TripStatus::from_verified(self.verified);
    }

    pub fn invoice_name_text(&self) -> &str {
        self.invoice
            .as_ref()
            .map(|invoice| invoice.file_name.as_str())
            .unwrap_or("No invoice uploaded")
    }
}
