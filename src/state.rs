//! Shared application state.

use std::sync::Arc;

use crate::config::{ConfigError, ServerConfig};
use crate::licence::{DocumentAssembler, PdfBackend, QrRasterizer};

pub struct AppState {
    pub assembler: DocumentAssembler<PdfBackend>,
}

impl AppState {
    pub fn new_with_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let defaults = config.load_defaults()?;

        let assembler = DocumentAssembler::new(
            PdfBackend,
            Arc::new(defaults),
            Arc::new(QrRasterizer::default()),
            config.letterhead.clone(),
        );

        Ok(Self { assembler })
    }
}
