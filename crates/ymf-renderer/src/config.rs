//! Render session configuration.

use std::time::Duration;

use bitflags::bitflags;
use pulldown_cmark::Options;

use crate::ids::IdScope;

/// Default prefix for every generated CSS class.
pub const DEFAULT_STYLE_PREFIX: &str = "jsh-";

/// Default name of the client-side application object emitted in scripts.
pub const DEFAULT_APP_BASE_VAR_NAME: &str = "jshAppBase";

/// Default upper bound for parsing a single document.
pub const DEFAULT_MAX_PARSING_TIME: Duration = Duration::from_secs(2);

bitflags! {
    /// Markdown parser feature switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Extensions: u32 {
        /// Neutralize raw HTML other than comment directives and `<br>`.
        const SUPPRESS_ALL_HTML = 1;
        /// Pipe tables.
        const TABLES = 1 << 1;
        /// `~~strikethrough~~`.
        const STRIKETHROUGH = 1 << 2;
        /// `- [ ]` task list items.
        const TASKLISTS = 1 << 3;
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self::SUPPRESS_ALL_HTML | Self::TABLES
    }
}

impl Extensions {
    /// Parser options matching the enabled extensions.
    #[must_use]
    pub fn parser_options(self) -> Options {
        let mut options = Options::empty();
        if self.contains(Self::TABLES) {
            options |= Options::ENABLE_TABLES;
        }
        if self.contains(Self::STRIKETHROUGH) {
            options |= Options::ENABLE_STRIKETHROUGH;
        }
        if self.contains(Self::TASKLISTS) {
            options |= Options::ENABLE_TASKLISTS;
        }
        options
    }
}

/// How a `TOGGLER.AFTER` / `TOGGLER.BEFORE` directive combines the snippets
/// it generates for each `(tag, style)` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TogglerAppendMode {
    /// Emit only the snippet of the last pair.
    #[default]
    KeepLast,
    /// Emit one snippet per pair, in order.
    AccumulateAll,
}

/// Configuration for a render session.
///
/// Built with [`RenderConfig::default`] and the `with_*` methods.
///
/// # Example
///
/// ```
/// use ymf_renderer::{RenderConfig, TogglerAppendMode};
///
/// let config = RenderConfig::default()
///     .with_style_prefix("doc-")
///     .with_toggler_append_mode(TogglerAppendMode::AccumulateAll);
/// assert_eq!(config.style_prefix, "doc-");
/// ```
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Prefix prepended to generated CSS classes.
    pub style_prefix: String,
    /// JavaScript identifier of the application object used in scripts.
    pub app_base_var_name: String,
    /// Parser feature switches.
    pub extensions: Extensions,
    /// Upper bound for converting a single document.
    pub max_parsing_time: Duration,
    /// Which counter element ids are drawn from.
    pub id_scope: IdScope,
    /// Snippet policy for toggler append directives.
    pub toggler_append_mode: TogglerAppendMode,
    /// Seed the `{prefix}md-{tag}` class on every default tag.
    pub seed_default_styles: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style_prefix: DEFAULT_STYLE_PREFIX.to_owned(),
            app_base_var_name: DEFAULT_APP_BASE_VAR_NAME.to_owned(),
            extensions: Extensions::default(),
            max_parsing_time: DEFAULT_MAX_PARSING_TIME,
            id_scope: IdScope::default(),
            toggler_append_mode: TogglerAppendMode::default(),
            seed_default_styles: true,
        }
    }
}

impl RenderConfig {
    /// Set the CSS class prefix.
    #[must_use]
    pub fn with_style_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.style_prefix = prefix.into();
        self
    }

    /// Set the application object name used in emitted scripts.
    #[must_use]
    pub fn with_app_base_var_name(mut self, name: impl Into<String>) -> Self {
        self.app_base_var_name = name.into();
        self
    }

    /// Replace the parser feature switches.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set the parsing time limit.
    #[must_use]
    pub fn with_max_parsing_time(mut self, limit: Duration) -> Self {
        self.max_parsing_time = limit;
        self
    }

    /// Set the element id scope.
    #[must_use]
    pub fn with_id_scope(mut self, scope: IdScope) -> Self {
        self.id_scope = scope;
        self
    }

    /// Set the toggler append snippet policy.
    #[must_use]
    pub fn with_toggler_append_mode(mut self, mode: TogglerAppendMode) -> Self {
        self.toggler_append_mode = mode;
        self
    }

    /// Enable or disable seeding of default tag classes.
    #[must_use]
    pub fn with_default_styles(mut self, enabled: bool) -> Self {
        self.seed_default_styles = enabled;
        self
    }

    /// Class used to mark fenced code in the intermediate HTML.
    pub(crate) fn code_marker_class(&self) -> String {
        format!("{}md-code", self.style_prefix)
    }
}
