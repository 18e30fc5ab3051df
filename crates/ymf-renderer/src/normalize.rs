//! Text passes run before and after markdown conversion.
//!
//! Before conversion the source is escaped leniently so author-written HTML
//! shows up as text, then the three constructs the renderer understands
//! (`<br>`, `<!---` and `--->`) are restored. Inside fenced code, blank lines
//! are replaced by a lone `.` so the parser keeps them. Multi-line `BOX` and
//! `CONTAINER` comments are rewritten into an open and a close comment around
//! their body.
//!
//! The serializer turns placeholder lines back into blank lines when it
//! closes a fenced block. After conversion a few literal fixups are applied
//! and headings receive numbered ids.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::directive::DirectiveKind;
use crate::ids::ElementIdCounter;
use crate::replacements::Replacements;
use crate::state::escape_html_lazy;

/// Fence delimiter searched for in the source text.
const FENCE: &str = "```";

/// Comment directive delimiters.
pub(crate) const TOKEN_OPEN: &str = "<!---";
pub(crate) const TOKEN_CLOSE: &str = "--->";

/// Line standing in for a blank line inside fenced code.
const BLANK_LINE_PLACEHOLDER: &str = ".";

static HEADING_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<h([1-8])((?:\s[^>]*)?)>").unwrap());

static RESTORE_MARKUP: LazyLock<Replacements> = LazyLock::new(|| {
    Replacements::new()
        .with("&lt;br&gt;", "<br>")
        .with("&lt;!---", TOKEN_OPEN)
        .with("---&gt;", TOKEN_CLOSE)
});

static ELLIPSIS: LazyLock<Replacements> =
    LazyLock::new(|| Replacements::new().with("\u{2026}", "..."));

static ENTITY_FIXUPS: LazyLock<Replacements> = LazyLock::new(|| {
    Replacements::new()
        .with("&mdash;", "---")
        .with("&amp;gt;", "&gt;")
});

/// Prepare raw markdown for conversion.
///
/// # Example
///
/// ```
/// use ymf_renderer::normalize::prepare_markdown;
///
/// let prepared = prepare_markdown("<b>x</b><br>\n```\na\n\nb\n```");
/// assert_eq!(prepared, "&lt;b&gt;x&lt;/b&gt;<br>\n```\na\n.\nb\n```");
/// ```
#[must_use]
pub fn prepare_markdown(text: &str) -> String {
    let mut escaped = escape_html_lazy(text);
    RESTORE_MARKUP.apply(&mut escaped);
    ELLIPSIS.apply(&mut escaped);
    let expanded = expand_block_directives(&escaped);

    let mut out = String::with_capacity(expanded.len() + 64);
    let mut rest = expanded.as_str();
    while let Some(start) = rest.find(FENCE) {
        out.push_str(&rest[..start]);
        let code_start = start + FENCE.len();
        let Some(len) = rest[code_start..].find(FENCE) else {
            tracing::debug!("unterminated code fence, passing remainder through");
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(FENCE);
        out.push_str(&protect_blank_lines(&rest[code_start..code_start + len]));
        out.push_str(FENCE);
        rest = &rest[code_start + len + FENCE.len()..];
    }
    out.push_str(rest);
    out
}

/// Offset just past the fenced block opening at `start`, or `None` when the
/// fence is never closed.
fn fenced_block_end(text: &str, start: usize) -> Option<usize> {
    let code_start = start + FENCE.len();
    text[code_start..]
        .find(FENCE)
        .map(|len| code_start + len + FENCE.len())
}

/// Position of `needle` in `text`, skipping over closed fenced blocks.
fn find_outside_fences(text: &str, needle: &str) -> Option<usize> {
    let mut offset = 0;
    loop {
        let rest = &text[offset..];
        let hit = rest.find(needle)?;
        match rest.find(FENCE) {
            Some(fence) if fence < hit => match fenced_block_end(rest, fence) {
                Some(end) => offset += end,
                None => return Some(offset + hit),
            },
            _ => return Some(offset + hit),
        }
    }
}

/// Normalize line endings and replace interior blank lines with a placeholder.
fn protect_blank_lines(code: &str) -> String {
    let code = code.replace("\r\n", "\n").replace("\n\r", "\n");
    let lines: Vec<&str> = code.split('\n').collect();
    let last = lines.len().saturating_sub(1);
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let interior = i > 0 && i < last;
            if interior && line.trim_matches([' ', '\t']).is_empty() {
                BLANK_LINE_PLACEHOLDER
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite multi-line `BOX`/`CONTAINER` comments into open comment, body and
/// close comment. Other comments and fenced code are left alone; a comment
/// body may itself contain fenced code.
fn expand_block_directives(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let fence = rest.find(FENCE);
        let open = rest.find(TOKEN_OPEN).filter(|&o| fence.is_none_or(|f| o < f));
        if let Some(open) = open {
            let inner_start = open + TOKEN_OPEN.len();
            let Some(len) = find_outside_fences(&rest[inner_start..], TOKEN_CLOSE) else {
                break;
            };
            let inner = &rest[inner_start..inner_start + len];
            let token_end = inner_start + len + TOKEN_CLOSE.len();

            out.push_str(&rest[..open]);
            match block_form(inner) {
                Some((header, body, close)) => {
                    out.push_str(TOKEN_OPEN);
                    out.push_str(header);
                    out.push_str(TOKEN_CLOSE);
                    out.push('\n');
                    out.push_str(body);
                    if !body.is_empty() && !body.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(TOKEN_OPEN);
                    out.push_str(&close);
                    out.push_str(TOKEN_CLOSE);
                }
                None => out.push_str(&rest[open..token_end]),
            }
            rest = &rest[token_end..];
        } else if let Some(fence) = fence {
            let Some(end) = fenced_block_end(rest, fence) else {
                break;
            };
            out.push_str(&rest[..end]);
            rest = &rest[end..];
        } else {
            break;
        }
    }
    out.push_str(rest);
    out
}

/// Split a multi-line comment into `(header, body, close token)` when its
/// first line opens a box or container.
fn block_form(inner: &str) -> Option<(&str, &str, String)> {
    let (header, body) = inner.split_once('\n')?;
    let header = header.trim_end_matches('\r');
    let directive = crate::directive::recognize(header)?;
    let close = match directive.kind {
        kind @ (DirectiveKind::BoxOpen(_) | DirectiveKind::ContainerOpen) => kind.close_token()?,
        _ => return None,
    };
    Some((header, body, close))
}

/// Replace `…` with three dots.
pub(crate) fn normalize_ellipsis(html: &mut String) {
    ELLIPSIS.apply(html);
}

/// Literal entity fixups applied after conversion.
pub(crate) fn fix_entities(html: &mut String) {
    ENTITY_FIXUPS.apply(html);
}

/// Give every heading open tag an `id="heading_N"` attribute, drawing `N`
/// from `ids` in document order.
#[must_use]
pub fn inject_heading_ids(html: &str, ids: &ElementIdCounter) -> String {
    HEADING_OPEN
        .replace_all(html, |caps: &Captures<'_>| {
            format!(r#"<h{} id="heading_{}"{}>"#, &caps[1], ids.next_id(), &caps[2])
        })
        .into_owned()
}

/// Turn placeholder lines of fenced code content back into blank lines.
#[must_use]
pub fn restore_blank_lines(code: &str) -> String {
    code.split('\n')
        .map(|line| {
            if line == BLANK_LINE_PLACEHOLDER {
                ""
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
