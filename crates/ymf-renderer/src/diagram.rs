//! Diagram and code block extraction.
//!
//! The serializer writes every fenced block as a marker element,
//! `<code class="{prefix}md-code">{info}\n{content}</code>`. After conversion
//! the extractor rewrites each marker into its final form:
//!
//! - fences tagged with a known diagram language become a `<div>` the client
//!   renders (`mermaid`, mind maps, `PlantUML`);
//! - every other fence becomes a numbered `<pre><code>` block.
//!
//! Passes run one after another in [`DIAGRAM_KINDS`] order, followed by the
//! generic pass. Each replacement takes the next id from the session's
//! [`ElementIdCounter`], so ids follow pass order first and document order
//! second.

use regex::{Captures, Regex};

use crate::ids::ElementIdCounter;

/// Code block content: anything but control characters other than tab, LF and CR.
const BODY: &str = r"[^\x00-\x08\x0B\x0C\x0E-\x1F\x7F]*?";

/// A fence language rendered client-side as a diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagramKind {
    /// Fence language tag.
    pub tag: &'static str,
    /// Prefix of the generated element id.
    pub id_prefix: &'static str,
    /// Class of the generated div.
    pub class: &'static str,
}

/// Known diagram languages, in extraction order.
pub const DIAGRAM_KINDS: &[DiagramKind] = &[
    DiagramKind {
        tag: "mermaid",
        id_prefix: "inlineMermaid",
        class: "mermaid",
    },
    DiagramKind {
        tag: "yaiofreemind",
        id_prefix: "inlineMindmap",
        class: "yaiomindmap",
    },
    DiagramKind {
        tag: "yaiomindmap",
        id_prefix: "inlineMindmap",
        class: "yaiomindmap",
    },
    DiagramKind {
        tag: "yaioplantuml",
        id_prefix: "yaioplantuml",
        class: "yaioplantuml",
    },
    DiagramKind {
        tag: "ymffreemind",
        id_prefix: "inlineMindmap",
        class: "ymfmindmap",
    },
    DiagramKind {
        tag: "ymfmindmap",
        id_prefix: "inlineMindmap",
        class: "ymfmindmap",
    },
    DiagramKind {
        tag: "ymfplantuml",
        id_prefix: "ymfplantuml",
        class: "ymfplantuml",
    },
];

/// Id prefix of generic code blocks.
const CODE_ID_PREFIX: &str = "inlineCode";

/// Rewrites fenced code markers into diagram placeholders and code blocks.
#[derive(Debug)]
pub struct DiagramExtractor {
    diagrams: Vec<(DiagramKind, Regex)>,
    generic: Regex,
    code_class: String,
}

impl DiagramExtractor {
    /// Build the passes for markers carrying `{style_prefix}md-code`.
    #[must_use]
    pub fn new(style_prefix: &str) -> Self {
        let marker = regex::escape(&format!(r#"<code class="{style_prefix}md-code">"#));
        let diagrams = DIAGRAM_KINDS
            .iter()
            .map(|kind| {
                let pattern = format!(
                    r"{marker}{}(?:[ \t][^\n<]*)?\n({BODY})</code>",
                    regex::escape(kind.tag)
                );
                (*kind, Regex::new(&pattern).unwrap())
            })
            .collect();
        let generic = Regex::new(&format!(r"{marker}[^\n<]*\n({BODY})</code>")).unwrap();

        Self {
            diagrams,
            generic,
            code_class: format!("{style_prefix}code txt"),
        }
    }

    /// Run every pass over `html`, drawing ids from `ids`.
    ///
    /// # Example
    ///
    /// ```
    /// use ymf_renderer::{DiagramExtractor, ElementIdCounter};
    ///
    /// let extractor = DiagramExtractor::new("jsh-");
    /// let ids = ElementIdCounter::new();
    /// let html = extractor.extract(r#"<code class="jsh-md-code">mermaid
    /// graph TD;
    /// </code>"#, &ids);
    /// assert_eq!(html, "<div id=\"inlineMermaid1\" class=\"mermaid\">graph TD;\n</div>");
    /// ```
    #[must_use]
    pub fn extract(&self, html: &str, ids: &ElementIdCounter) -> String {
        let mut html = html.to_owned();

        for (kind, pattern) in &self.diagrams {
            html = replace_counted(pattern, &html, kind.tag, |caps| {
                format!(
                    r#"<div id="{}{}" class="{}">{}</div>"#,
                    kind.id_prefix,
                    ids.next_id(),
                    kind.class,
                    &caps[1]
                )
            });
        }

        replace_counted(&self.generic, &html, "code", |caps| {
            format!(
                r#"<pre><code id="{CODE_ID_PREFIX}{}" class="{}">{}</code></pre>"#,
                ids.next_id(),
                self.code_class,
                &caps[1]
            )
        })
    }
}

fn replace_counted(
    pattern: &Regex,
    html: &str,
    label: &str,
    mut render: impl FnMut(&Captures<'_>) -> String,
) -> String {
    let mut count = 0usize;
    let result = pattern.replace_all(html, |caps: &Captures<'_>| {
        count += 1;
        render(caps)
    });
    if count > 0 {
        tracing::debug!(kind = label, count, "extracted code blocks");
    }
    result.into_owned()
}
