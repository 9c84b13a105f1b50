//! Load testing support for the invoice endpoint.
//!
//! Shared by the `invoice-load-fake` and `invoice-load-csv` binaries:
//! payload sources (synthetic or CSV), an HTTP client that saves returned
//! PDFs, and a resource usage report for the runner process.

pub mod client;
pub mod csv_source;
pub mod fake;
pub mod literal;
pub mod monitor;

pub use client::{BatchOptions, BatchReport, InvoiceClient};
pub use monitor::{ResourceMonitor, ResourceReport};

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/generate-invoice/";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("resource monitor unavailable: {0}")]
    Monitor(String),
}
