use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::Value;

use super::LoadError;

const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct InvoiceResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl InvoiceResponse {
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// 200 with an `application/pdf` content type.
    pub fn is_pdf(&self) -> bool {
        self.is_success()
            && self
                .content_type
                .as_deref()
                .and_then(|value| value.split(';').next())
                .map(|mime| mime.trim().eq_ignore_ascii_case(PDF_MIME))
                .unwrap_or(false)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    /// Only save responses that declare `application/pdf`, not just any 200.
    pub require_pdf_content_type: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub attempted: usize,
    pub saved: usize,
    pub failed: usize,
}

pub struct InvoiceClient {
    http: Client,
    endpoint: String,
}

impl InvoiceClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LoadError> {
        let http = Client::builder()
            .user_agent(concat!("proforma-invoice-loadgen/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn submit(&self, payload: &Value) -> Result<InvoiceResponse, LoadError> {
        let response = self.http.post(&self.endpoint).json(payload).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(InvoiceResponse {
            status,
            content_type,
            body,
        })
    }

    /// Post every payload in order and save accepted responses as
    /// `invoice_<n>.pdf`, `n` being the 1-based position in the batch.
    /// Individual failures are logged and counted; the batch keeps going.
    pub async fn run_batch<I>(&self, payloads: I, options: &BatchOptions) -> Result<BatchReport, LoadError>
    where
        I: IntoIterator<Item = Result<Value, LoadError>>,
    {
        tokio::fs::create_dir_all(&options.output_dir)
            .await
            .map_err(|source| LoadError::Io {
                path: options.output_dir.clone(),
                source,
            })?;

        let mut report = BatchReport::default();
        for (index, payload) in payloads.into_iter().enumerate() {
            let number = index + 1;
            report.attempted += 1;
            log::info!("Generating invoice #{}...", number);

            let payload = match payload {
                Ok(payload) => payload,
                Err(e) => {
                    log::error!("Error on invoice #{}: {}", number, e);
                    report.failed += 1;
                    continue;
                }
            };

            let response = match self.submit(&payload).await {
                Ok(response) => response,
                Err(e) => {
                    log::error!("Exception at invoice #{}: {}", number, e);
                    report.failed += 1;
                    continue;
                }
            };

            let accepted = if options.require_pdf_content_type {
                response.is_pdf()
            } else {
                response.is_success()
            };
            if !accepted {
                log::warn!(
                    "Failed invoice #{} - status {}: {}",
                    number,
                    response.status.as_u16(),
                    response.text()
                );
                report.failed += 1;
                continue;
            }

            let path = output_path(&options.output_dir, number);
            match tokio::fs::write(&path, &response.body).await {
                Ok(()) => {
                    log::info!("Saved invoice #{} to {}", number, path.display());
                    report.saved += 1;
                }
                Err(e) => {
                    log::error!("Failed to write {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

pub fn output_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("invoice_{}.pdf", number))
}
