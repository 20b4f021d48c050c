use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::AppError;

const DEFAULT_SLOT: &str = "tugboat_trips";
const DEFAULT_MAX_INVOICE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub data_root: PathBuf,
    pub trips_slot: String,
    pub store_quota_bytes: Option<usize>,
    pub max_invoice_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let data_root = env::var("DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let trips_slot = env::var("TRIPS_SLOT").unwrap_or_else(|_| DEFAULT_SLOT.to_string());

        let store_quota_bytes = match env::var("STORE_QUOTA_BYTES") {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|err| AppError::Config(format!("invalid STORE_QUOTA_BYTES: {err}")))?,
            ),
            Err(_) => None,
        };

        let max_invoice_bytes = match env::var("MAX_INVOICE_BYTES") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| AppError::Config(format!("invalid MAX_INVOICE_BYTES: {err}")))?,
            Err(_) => DEFAULT_MAX_INVOICE_BYTES,
        };

        Ok(Self {
            listen_addr,
            data_root,
            trips_slot,
            store_quota_bytes,
            max_invoice_bytes,
        })
    }

    /// Path of the JSON document holding the persisted trip list.
    pub fn slot_path(&self) -> PathBuf {
        self.data_root.join(format!("{}.json", self.trips_slot))
    }

    pub fn invoices_dir(&self) -> PathBuf {
        self.data_root.join("invoices")
    }
}
