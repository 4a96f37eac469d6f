use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pdfchat_engine::{GatewayError, GatewaySettings, DEFAULT_BACKEND_URL};

/// Terminal chat client for a local PDF question-answering backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "pdfchat", version, about)]
pub struct Args {
    /// Origin of the backend service.
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// File that receives the log output.
    #[arg(long, default_value = "./pdfchat.log")]
    pub log_file: PathBuf,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Seconds to wait for the backend connection to open.
    #[arg(long, default_value_t = 10)]
    pub connect_timeout: u64,
}

impl Args {
    pub fn gateway_settings(&self) -> Result<GatewaySettings, GatewayError> {
        let mut settings = GatewaySettings::with_base_url(&self.backend_url)?;
        settings.connect_timeout = Duration::from_secs(self.connect_timeout);
        Ok(settings)
    }
}
