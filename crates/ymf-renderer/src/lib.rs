//! Markdown to HTML renderer with comment directives and diagram extraction.
//!
//! Documents are converted by a [`MarkdownRenderer`] in four stages:
//!
//! 1. [`normalize::prepare_markdown`] escapes author HTML, protects blank
//!    lines in fenced code and expands multi-line box comments.
//! 2. An [`HtmlSerializer`] walks the pulldown-cmark events. Tag classes,
//!    `<!---COMMAND--->` comments and `label:|:value` splitters go through the
//!    session's [`DirectiveInterpreter`](directive::DirectiveInterpreter).
//! 3. The [`DiagramExtractor`] turns fenced code into diagram placeholders or
//!    numbered code blocks.
//! 4. Literal fixups and numbered heading ids.
//!
//! # Example
//!
//! ```
//! use ymf_renderer::{RenderConfig, render};
//!
//! let markdown = "<!---BOX.INFO Note--->\nRemember this.\n<!---/BOX.INFO--->";
//! let html = render(markdown, &RenderConfig::default()).unwrap();
//! assert!(html.starts_with(r#"<div class="jsh-md-infobox">"#));
//! assert!(html.contains(r#"<p class="jsh-md-p">Remember this.</p>"#));
//! ```

mod config;
mod diagram;
pub mod directive;
mod error;
mod ids;
pub mod normalize;
mod pipeline;
mod replacements;
mod serializer;
mod state;
mod styles;

pub use config::{
    DEFAULT_APP_BASE_VAR_NAME, DEFAULT_MAX_PARSING_TIME, DEFAULT_STYLE_PREFIX, Extensions,
    RenderConfig, TogglerAppendMode,
};
pub use diagram::{DIAGRAM_KINDS, DiagramExtractor, DiagramKind};
pub use error::RenderError;
pub use ids::{ElementIdCounter, IdScope};
pub use pipeline::{MarkdownRenderer, render};
pub use replacements::Replacements;
pub use serializer::{ExtensionHooks, HtmlSerializer, SPLITTER};
pub use state::{escape_html, escape_html_lazy};
pub use styles::{DEFAULT_STYLED_TAGS, StyleRegistry};
