use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::AppConfig,
    services::{invoices::InvoiceStore, trips::TripRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: Arc<Mutex<TripRepository>>,
    pub invoices: InvoiceStore,
}

impl AppState {
    pub fn new(config: AppConfig, trips: TripRepository, invoices: InvoiceStore) -> Self {
        Self {
            config,
            trips: Arc::new(Mutex::new(trips)),
            invoices,
        }
    }
}
