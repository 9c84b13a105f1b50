use std::sync::Arc;

use crate::config::AppConfig;
use crate::invoice::{Generator, GeneratorError, InvoiceCounter, InvoiceData, InvoiceRenderEngine};

/// Shared state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator<InvoiceData> + Send + Sync>,
    pub counter: Arc<InvoiceCounter>,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn Generator<InvoiceData> + Send + Sync>,
        counter: InvoiceCounter,
    ) -> Self {
        Self {
            generator,
            counter: Arc::new(counter),
        }
    }

    /// Load the template and font once and point the counter at its file.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeneratorError> {
        let engine = InvoiceRenderEngine::from_config(config)?;
        Ok(Self::new(
            Arc::new(engine),
            InvoiceCounter::new(config.counter_file.clone()),
        ))
    }
}
