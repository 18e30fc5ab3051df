//! CLI error types.

use ymf_config::ConfigError;
use ymf_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no HTML available for this document: {0}")]
    Render(#[from] RenderError),
}
