//! Markdown to HTML render pipeline.

use std::time::Instant;

use pulldown_cmark::{Parser, TextMergeStream};

use crate::config::RenderConfig;
use crate::diagram::DiagramExtractor;
use crate::directive::DirectiveInterpreter;
use crate::error::RenderError;
use crate::normalize;
use crate::serializer::HtmlSerializer;

/// Renders markdown documents with a fixed configuration.
///
/// Each call to [`render`](Self::render) is an independent session: it gets
/// a fresh style registry and TOC counter, and draws element ids from the
/// counter selected by [`RenderConfig::id_scope`].
///
/// # Example
///
/// ```
/// use ymf_renderer::{MarkdownRenderer, RenderConfig};
///
/// let renderer = MarkdownRenderer::new(RenderConfig::default().with_default_styles(false));
/// let html = renderer.render("# Title\n\nHello").unwrap();
/// assert_eq!(html, r#"<h1 id="heading_1">Title</h1><p>Hello</p>"#);
/// ```
#[derive(Debug)]
pub struct MarkdownRenderer {
    config: RenderConfig,
    extractor: DiagramExtractor,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        let extractor = DiagramExtractor::new(&config.style_prefix);
        Self { config, extractor }
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Convert one markdown document to HTML.
    ///
    /// Stages, in order: source preparation, conversion, ellipsis cleanup,
    /// diagram extraction, entity fixups, heading ids.
    pub fn render(&self, document: &str) -> Result<String, RenderError> {
        let started = Instant::now();
        let ids = self.config.id_scope.counter();

        let prepared = normalize::prepare_markdown(document);
        let mut interpreter = DirectiveInterpreter::new(&self.config);
        let parser = Parser::new_ext(&prepared, self.config.extensions.parser_options());
        let mut html = HtmlSerializer::new(&mut interpreter, &self.config)
            .serialize(
                TextMergeStream::new(parser),
                started,
                self.config.max_parsing_time,
            )
            .inspect_err(|e| tracing::warn!(error = %e, "markdown conversion failed"))?;

        normalize::normalize_ellipsis(&mut html);
        let mut html = self.extractor.extract(&html, &ids);
        normalize::fix_entities(&mut html);
        let html = normalize::inject_heading_ids(&html, &ids);

        tracing::debug!(
            input_len = document.len(),
            output_len = html.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "rendered document"
        );
        Ok(html)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Convert `document` with `config`.
///
/// Shorthand for `MarkdownRenderer::new(config.clone()).render(document)`.
pub fn render(document: &str, config: &RenderConfig) -> Result<String, RenderError> {
    MarkdownRenderer::new(config.clone()).render(document)
}
