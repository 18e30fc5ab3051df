//! `ymf render` command implementation.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Args;
use ymf_config::{CliSettings, Config, TogglerAppend};
use ymf_renderer::MarkdownRenderer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover ymf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Class prefix for generated markup (overrides config).
    #[arg(long, env = "YMF_STYLE_PREFIX")]
    style_prefix: Option<String>,

    /// Script accessor used by toggler and TOC snippets (overrides config).
    #[arg(long)]
    app_base_var_name: Option<String>,

    /// Parse time budget in milliseconds (overrides config).
    #[arg(long)]
    max_parsing_time_ms: Option<u64>,

    /// Number elements from the process-wide counter.
    #[arg(long)]
    shared_ids: bool,

    /// Emit a snippet for every pair in TOGGLER.AFTER/BEFORE.
    #[arg(long)]
    accumulate_togglers: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, I/O or rendering fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "using configuration");
        }

        let markdown = self.read_input()?;
        let html = MarkdownRenderer::new(config.render_config()).render(&markdown)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            style_prefix: self.style_prefix.clone(),
            app_base_var_name: self.app_base_var_name.clone(),
            max_parsing_time_ms: self.max_parsing_time_ms,
            shared_ids: self.shared_ids.then_some(true),
            toggler_append: self
                .accumulate_togglers
                .then_some(TogglerAppend::AccumulateAll),
        }
    }

    fn read_input(&self) -> Result<String, CliError> {
        match &self.input {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => {
                let mut markdown = String::new();
                std::io::stdin().read_to_string(&mut markdown)?;
                Ok(markdown)
            }
        }
    }
}
