//! pulldown-cmark event walk producing the intermediate HTML.
//!
//! The serializer owns document structure only. Everything configurable is
//! delegated to an [`ExtensionHooks`] implementation: the class attribute of
//! each emitted tag, the rendering of `<!---...--->` comment directives, and
//! the rendering of `left:|:right` splitters.
//!
//! Fenced code is not rendered here. Each block is written as a marker
//! element that the diagram extractor rewrites later.

use std::fmt::Write;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};
use regex::Regex;

use crate::config::{Extensions, RenderConfig};
use crate::error::RenderError;
use crate::normalize;
use crate::state::{CodeBlockState, ImageState, TableState, escape_html, escape_html_lazy};

/// Separator between splitter label and value.
pub const SPLITTER: &str = ":|:";

/// Events processed between two deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 64;

static INLINE_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!---(.*?)--->|<br\s*/?>").unwrap());

/// Rendering strategy the serializer calls back into.
pub trait ExtensionHooks {
    /// ` class="..."` attribute for `tag`, or an empty string.
    fn class_attr(&self, tag: &str) -> String;

    /// HTML replacing a comment directive; `raw` is the text between `<!---` and `--->`.
    fn comment_directive(&mut self, raw: &str) -> String;

    /// HTML for a splitter. Both halves are already escaped.
    fn splitter(&mut self, left: &str, right: &str) -> String;
}

/// Wall-clock budget for one conversion.
#[derive(Clone, Copy, Debug)]
struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    fn check(&self) -> Result<(), RenderError> {
        let elapsed = self.start.elapsed();
        if elapsed > self.limit {
            return Err(RenderError::ParseTimeout {
                elapsed,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

/// A slice of text or raw HTML split around the markup the serializer handles.
enum Piece<'a> {
    Directive(&'a str),
    LineBreak,
    Plain(&'a str),
}

fn pieces(text: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in INLINE_MARKUP.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            out.push(Piece::Plain(&text[last..whole.start()]));
        }
        out.push(match caps.get(1) {
            Some(raw) => Piece::Directive(raw.as_str()),
            None => Piece::LineBreak,
        });
        last = whole.end();
    }
    if last < text.len() {
        out.push(Piece::Plain(&text[last..]));
    }
    out
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// HTML serializer for one document.
pub struct HtmlSerializer<'h, H: ExtensionHooks> {
    hooks: &'h mut H,
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    /// Raw HTML collected for the current HTML block.
    html_block: Option<String>,
    code_marker: String,
    suppress_html: bool,
}

impl<'h, H: ExtensionHooks> HtmlSerializer<'h, H> {
    #[must_use]
    pub fn new(hooks: &'h mut H, config: &RenderConfig) -> Self {
        Self {
            hooks,
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            html_block: None,
            code_marker: config.code_marker_class(),
            suppress_html: config.extensions.contains(Extensions::SUPPRESS_ALL_HTML),
        }
    }

    /// Serialize `events`, giving up once `limit` has elapsed since `started`.
    pub fn serialize<'a, I>(
        mut self,
        events: I,
        started: Instant,
        limit: Duration,
    ) -> Result<String, RenderError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        let deadline = Deadline {
            start: started,
            limit,
        };
        for (index, event) in events.enumerate() {
            if index % DEADLINE_CHECK_INTERVAL == 0 {
                deadline.check()?;
            }
            self.process_event(event);
        }
        deadline.check()?;
        Ok(self.output)
    }

    fn attr(&self, tag: &str) -> String {
        self.hooks.class_attr(tag)
    }

    fn open(&mut self, tag: &str) {
        let attr = self.attr(tag);
        write!(self.output, "<{tag}{attr}>").unwrap();
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => match self.html_block.as_mut() {
                Some(buffer) => buffer.push_str(&html),
                None => self.raw_html(&html),
            },
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.open("br"),
            Event::Rule => self.open("hr"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { " checked" } else { "" };
                write!(self.output, r#"<input type="checkbox" disabled{checked}>"#).unwrap();
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open("p"),
            Tag::Heading { level, .. } => self.open(&format!("h{}", heading_number(level))),
            Tag::BlockQuote(_) => self.open("blockquote"),
            Tag::CodeBlock(kind) => match kind {
                CodeBlockKind::Fenced(info) => self.code.start(&info, true),
                CodeBlockKind::Indented => self.code.start("", false),
            },
            Tag::HtmlBlock => self.html_block = Some(String::new()),
            Tag::List(Some(1)) => self.open("ol"),
            Tag::List(Some(start)) => {
                let attr = self.attr("ol");
                write!(self.output, r#"<ol{attr} start="{start}">"#).unwrap();
            }
            Tag::List(None) => self.open("ul"),
            Tag::Item => self.open("li"),
            Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.open("dl"),
            Tag::DefinitionListTitle => self.open("dt"),
            Tag::DefinitionListDefinition => self.open("dd"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.open("table");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.open("thead");
                self.open("tr");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.open("tr");
            }
            Tag::TableCell => {
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                let attr = self.attr(tag);
                let align = self.table.current_alignment_attr();
                write!(self.output, "<{tag}{attr}{align}>").unwrap();
            }
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<del>"),
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let attr = self.attr("a");
                write!(self.output, r#"<a{attr} href="{}""#, escape_html(&dest_url)).unwrap();
                if !title.is_empty() {
                    write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                self.output.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => self.image.start(&dest_url, &title),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(level) => {
                write!(self.output, "</h{}>", heading_number(level)).unwrap();
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let fenced = self.code.is_fenced();
                let (info, mut content) = self.code.end();
                if fenced {
                    content = normalize::restore_blank_lines(&content);
                }
                write!(
                    self.output,
                    "<code class=\"{}\">{}\n{}</code>",
                    self.code_marker,
                    escape_html_lazy(&info),
                    escape_html_lazy(&content)
                )
                .unwrap();
            }
            TagEnd::HtmlBlock => {
                if let Some(block) = self.html_block.take() {
                    self.raw_html(&block);
                }
            }
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead>");
                self.open("tbody");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</del>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            TagEnd::Link => self.output.push_str("</a>"),
            TagEnd::Image => {
                let (src, title, alt) = self.image.end();
                let attr = self.attr("img");
                write!(
                    self.output,
                    r#"<img{attr} src="{}" alt="{}""#,
                    escape_html(&src),
                    escape_html(&alt)
                )
                .unwrap();
                if !title.is_empty() {
                    write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                self.output.push_str(" />");
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }
        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }
        for piece in pieces(text) {
            match piece {
                Piece::Directive(raw) => self.directive(raw),
                Piece::LineBreak => self.open("br"),
                Piece::Plain(plain) => self.plain_text(plain),
            }
        }
    }

    fn plain_text(&mut self, text: &str) {
        match text.split_once(SPLITTER) {
            Some((left, right)) => {
                let html = self.hooks.splitter(&escape_html(left), &escape_html(right));
                self.output.push_str(&html);
            }
            None => self.output.push_str(&escape_html(text)),
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        let attr = self.attr("code");
        write!(self.output, "<code{attr}>{}</code>", escape_html(code)).unwrap();
    }

    fn raw_html(&mut self, html: &str) {
        for piece in pieces(html) {
            match piece {
                Piece::Directive(raw) => self.directive(raw),
                Piece::LineBreak => self.open("br"),
                Piece::Plain(plain) if self.suppress_html => {
                    self.output.push_str(&escape_html_lazy(plain));
                }
                Piece::Plain(plain) => self.output.push_str(plain),
            }
        }
    }

    fn directive(&mut self, raw: &str) {
        let html = self.hooks.comment_directive(raw);
        self.output.push_str(&html);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_str("\n");
        } else {
            self.output.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Parser, TextMergeStream};

    use super::*;

    /// Hooks that style nothing and make directives visible.
    struct PlainHooks;

    impl ExtensionHooks for PlainHooks {
        fn class_attr(&self, tag: &str) -> String {
            if tag == "p" {
                r#" class="para""#.to_owned()
            } else {
                String::new()
            }
        }

        fn comment_directive(&mut self, raw: &str) -> String {
            format!("[{raw}]")
        }

        fn splitter(&mut self, left: &str, right: &str) -> String {
            format!("<l>{left}</l><r>{right}</r>")
        }
    }

    fn serialize(markdown: &str) -> String {
        let config = RenderConfig::default();
        let parser = Parser::new_ext(markdown, config.extensions.parser_options());
        let mut hooks = PlainHooks;
        HtmlSerializer::new(&mut hooks, &config)
            .serialize(
                TextMergeStream::new(parser),
                Instant::now(),
                Duration::from_secs(60),
            )
            .unwrap()
    }

    #[test]
    fn test_paragraph_class() {
        assert_eq!(serialize("Hello"), r#"<p class="para">Hello</p>"#);
    }

    #[test]
    fn test_heading() {
        assert_eq!(serialize("## Title"), "<h2>Title</h2>");
    }

    #[test]
    fn test_fenced_code_marker() {
        assert_eq!(
            serialize("```mermaid\ngraph TD;\n```"),
            "<code class=\"jsh-md-code\">mermaid\ngraph TD;\n</code>"
        );
    }

    #[test]
    fn test_fenced_placeholder_lines_restored() {
        assert_eq!(
            serialize("```mermaid\n.\ng\n.\n```"),
            "<code class=\"jsh-md-code\">mermaid\n\ng\n\n</code>"
        );
    }

    #[test]
    fn test_indented_code_keeps_dot_lines() {
        let html = serialize("    a\n    .\n    b\n");
        assert!(html.contains("a\n.\nb"), "{html}");
    }

    #[test]
    fn test_code_content_escaped_once() {
        assert_eq!(
            serialize("```\na &lt; b & c\n```"),
            "<code class=\"jsh-md-code\">\na &lt; b &amp; c\n</code>"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(serialize("`x < y`"), r#"<p class="para"><code>x &lt; y</code></p>"#);
    }

    #[test]
    fn test_block_comment_directive() {
        assert_eq!(serialize("<!---TOC--->").trim_end(), "[TOC]");
    }

    #[test]
    fn test_inline_comment_directive() {
        assert_eq!(
            serialize("before <!---BOX x---> after"),
            r#"<p class="para">before [BOX x] after</p>"#
        );
    }

    #[test]
    fn test_splitter() {
        assert_eq!(
            serialize("Name:|:Value"),
            r#"<p class="para"><l>Name</l><r>Value</r></p>"#
        );
    }

    #[test]
    fn test_inline_br() {
        assert_eq!(serialize("a<br>b"), r#"<p class="para">a<br>b</p>"#);
    }

    #[test]
    fn test_suppressed_raw_html_is_escaped() {
        assert_eq!(
            serialize("<div>\nx\n</div>").trim_end(),
            "&lt;div&gt;\nx\n&lt;/div&gt;"
        );
    }

    #[test]
    fn test_table() {
        let html = serialize("| A | B |\n|:--|---|\n| 1 | 2 |");
        assert_eq!(
            html,
            r#"<table><thead><tr><th align="left">A</th><th>B</th></tr></thead><tbody><tr><td align="left">1</td><td>2</td></tr></tbody></table>"#
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            serialize(r#"[a](http://x.org/?a=1&b=2 "T") ![alt](i.png)"#),
            r#"<p class="para"><a href="http://x.org/?a=1&amp;b=2" title="T">a</a> <img src="i.png" alt="alt" /></p>"#
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(serialize("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(serialize("3. a"), r#"<ol start="3"><li>a</li></ol>"#);
    }

    #[test]
    fn test_deadline_exceeded() {
        let config = RenderConfig::default();
        let mut hooks = PlainHooks;
        let started = Instant::now().checked_sub(Duration::from_secs(5)).unwrap();
        let result = HtmlSerializer::new(&mut hooks, &config).serialize(
            Parser::new("text").into_iter(),
            started,
            Duration::from_millis(1),
        );
        assert!(matches!(result, Err(RenderError::ParseTimeout { .. })));
    }
}
