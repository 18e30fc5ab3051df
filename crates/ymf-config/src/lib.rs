//! Configuration management for YMF.
//!
//! Parses `ymf.toml` files with serde and discovers them in the current
//! directory or its parents. [`CliSettings`] override file values after
//! loading, and [`Config::render_config`] turns the result into the
//! renderer's [`RenderConfig`].
//!
//! ```toml
//! [render]
//! style_prefix = "jsh-"
//! app_base_var_name = "${YMF_APP:-jshAppBase}"
//! max_parsing_time_ms = 2000
//! tables = true
//! suppress_html = true
//! toggler_append = "keep-last"
//! shared_ids = false
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.style_prefix`
//! - `render.app_base_var_name`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use ymf_renderer::{
    DEFAULT_APP_BASE_VAR_NAME, DEFAULT_MAX_PARSING_TIME, DEFAULT_STYLE_PREFIX, Extensions,
    IdScope, RenderConfig, TogglerAppendMode,
};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ymf.toml";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the CSS class prefix.
    pub style_prefix: Option<String>,
    /// Override the script accessor name.
    pub app_base_var_name: Option<String>,
    /// Override the parse time budget.
    pub max_parsing_time_ms: Option<u64>,
    /// Override element id sharing.
    pub shared_ids: Option<bool>,
    /// Override the `TOGGLER.AFTER`/`TOGGLER.BEFORE` snippet mode.
    pub toggler_append: Option<TogglerAppend>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering options.
    pub render: RenderSettings,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// The `[render]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Prefix of every generated class.
    pub style_prefix: String,
    /// Global accessor used by emitted scripts.
    pub app_base_var_name: String,
    /// Parse time budget in milliseconds.
    pub max_parsing_time_ms: u64,
    /// Pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~`.
    pub strikethrough: bool,
    /// Task list items.
    pub tasklists: bool,
    /// Show author HTML as text.
    pub suppress_html: bool,
    /// Draw element ids from the process-wide counter.
    pub shared_ids: bool,
    /// Snippet mode for `TOGGLER.AFTER`/`TOGGLER.BEFORE`.
    pub toggler_append: TogglerAppend,
    /// Seed `{prefix}md-{tag}` classes.
    pub default_styles: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            style_prefix: DEFAULT_STYLE_PREFIX.to_owned(),
            app_base_var_name: DEFAULT_APP_BASE_VAR_NAME.to_owned(),
            max_parsing_time_ms: u64::try_from(DEFAULT_MAX_PARSING_TIME.as_millis())
                .unwrap_or(u64::MAX),
            tables: true,
            strikethrough: false,
            tasklists: false,
            suppress_html: true,
            shared_ids: false,
            toggler_append: TogglerAppend::default(),
            default_styles: true,
        }
    }
}

/// `toggler_append` values as written in TOML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TogglerAppend {
    /// Only the last `(tag, style)` pair produces a snippet.
    #[default]
    KeepLast,
    /// Every pair produces a snippet.
    AccumulateAll,
}

impl From<TogglerAppend> for TogglerAppendMode {
    fn from(value: TogglerAppend) -> Self {
        match value {
            TogglerAppend::KeepLast => Self::KeepLast,
            TogglerAppend::AccumulateAll => Self::AccumulateAll,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.style_prefix`").
        field: String,
        /// Error message (e.g., "${`YMF_PREFIX`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require `value` to be a dotted JavaScript identifier path like `app.base`.
fn require_js_path(value: &str, field: &str) -> Result<(), ConfigError> {
    let is_ident = |segment: &str| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    };
    if !value.split('.').all(is_ident) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a JavaScript identifier, got {value:?}"
        )));
    }
    Ok(())
}

/// Require `value` to contain only characters allowed in a class name prefix.
fn require_class_prefix(value: &str, field: &str) -> Result<(), ConfigError> {
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(ConfigError::Validation(format!(
            "{field} contains invalid character {c:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `ymf.toml` in the current directory and its parents, falling back
    /// to defaults. CLI settings take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Build the renderer configuration.
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        let render = &self.render;
        let mut extensions = Extensions::empty();
        extensions.set(Extensions::SUPPRESS_ALL_HTML, render.suppress_html);
        extensions.set(Extensions::TABLES, render.tables);
        extensions.set(Extensions::STRIKETHROUGH, render.strikethrough);
        extensions.set(Extensions::TASKLISTS, render.tasklists);

        let id_scope = if render.shared_ids {
            IdScope::global()
        } else {
            IdScope::Session
        };

        RenderConfig::default()
            .with_style_prefix(render.style_prefix.clone())
            .with_app_base_var_name(render.app_base_var_name.clone())
            .with_extensions(extensions)
            .with_max_parsing_time(Duration::from_millis(render.max_parsing_time_ms))
            .with_id_scope(id_scope)
            .with_toggler_append_mode(render.toggler_append.into())
            .with_default_styles(render.default_styles)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        require_class_prefix(&render.style_prefix, "render.style_prefix")?;
        require_non_empty(&render.app_base_var_name, "render.app_base_var_name")?;
        require_js_path(&render.app_base_var_name, "render.app_base_var_name")?;
        if render.max_parsing_time_ms == 0 {
            return Err(ConfigError::Validation(
                "render.max_parsing_time_ms must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(prefix) = &settings.style_prefix {
            self.render.style_prefix.clone_from(prefix);
        }
        if let Some(name) = &settings.app_base_var_name {
            self.render.app_base_var_name.clone_from(name);
        }
        if let Some(ms) = settings.max_parsing_time_ms {
            self.render.max_parsing_time_ms = ms;
        }
        if let Some(shared) = settings.shared_ids {
            self.render.shared_ids = shared;
        }
        if let Some(mode) = settings.toggler_append {
            self.render.toggler_append = mode;
        }
    }

    /// Search for the config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.render.style_prefix =
            expand::expand_env(&self.render.style_prefix, "render.style_prefix")?;
        self.render.app_base_var_name =
            expand::expand_env(&self.render.app_base_var_name, "render.app_base_var_name")?;
        Ok(())
    }
}
