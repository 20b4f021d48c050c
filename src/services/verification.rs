use tracing::info;

use crate::{
    error::AppError,
    services::trips::{SaveStatus, TripRepository},
};

/// Applies an approve/reject decision to the invoice of the trip at `index`.
///
/// The trip must carry an invoice and must not have been decided yet; a
/// second decision is refused rather than overwriting the first.
pub async fn verify(
    repo: &mut TripRepository,
    index: usize,
    approved: bool,
) -> Result<SaveStatus, AppError> {
    let status = repo
        .update_at(index, |trip| {
            if !trip.has_invoice() {
                return Err(AppError::MissingInvoice { index });
            }
            if trip.verified().is_some() {
                return Err(AppError::AlreadyVerified { index });
            }
            trip.record_decision(approved);
            Ok(())
        })
        .await?;
    info!(index, approved, "invoice verified");
    Ok(status)
}
