//! Event-walk state for the HTML serializer, plus escaping helpers.

use pulldown_cmark::Alignment;

/// State for tracking fenced code capture.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    fenced: bool,
    /// Full fence info string, e.g. `mermaid` or `rust title=x`.
    info: String,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, info: &str, fenced: bool) {
        self.active = true;
        self.fenced = fenced;
        info.clone_into(&mut self.info);
        self.buffer.clear();
    }

    /// End the current block and return `(info, content)`.
    pub(crate) fn end(&mut self) -> (String, String) {
        self.active = false;
        (
            std::mem::take(&mut self.info),
            std::mem::take(&mut self.buffer),
        )
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn is_fenced(&self) -> bool {
        self.fenced
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Alignment attribute for the current cell.
    pub(crate) fn current_alignment_attr(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" align="left""#,
            Some(Alignment::Center) => r#" align="center""#,
            Some(Alignment::Right) => r#" align="right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Pending image: destination, title and the alt text collected so far.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    src: String,
    title: String,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self, src: &str, title: &str) {
        self.active = true;
        src.clone_into(&mut self.src);
        title.clone_into(&mut self.title);
        self.alt_text.clear();
    }

    /// End capture and return `(src, title, alt)`.
    pub(crate) fn end(&mut self) -> (String, String, String) {
        self.active = false;
        (
            std::mem::take(&mut self.src),
            std::mem::take(&mut self.title),
            std::mem::take(&mut self.alt_text),
        )
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape `<`, `>` and `&`, leaving `&` alone when it already starts a
/// character reference such as `&amp;`, `&#39;` or `&#x27;`.
///
/// Escaping twice yields the same text as escaping once.
///
/// # Example
///
/// ```
/// use ymf_renderer::escape_html_lazy;
///
/// assert_eq!(escape_html_lazy("a < b &amp; c & d"), "a &lt; b &amp; c &amp; d");
/// ```
#[must_use]
pub fn escape_html_lazy(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '&' if starts_with_char_reference(&s[i..]) => result.push('&'),
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Whether `s` (which starts with `&`) opens a named or numeric reference.
fn starts_with_char_reference(s: &str) -> bool {
    let body = &s.as_bytes()[1..];
    let (digits, valid): (&[u8], fn(&u8) -> bool) = match body {
        [b'#', b'x' | b'X', rest @ ..] => (rest, u8::is_ascii_hexdigit),
        [b'#', rest @ ..] => (rest, u8::is_ascii_digit),
        [first, ..] if first.is_ascii_alphabetic() => (body, u8::is_ascii_alphanumeric),
        _ => return false,
    };
    let len = digits.iter().take_while(|&b| valid(b)).count();
    len > 0 && digits.get(len) == Some(&b';')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_escape_html_lazy_keeps_references() {
        assert_eq!(escape_html_lazy("&amp; &lt; &#39; &#x27;"), "&amp; &lt; &#39; &#x27;");
    }

    #[test]
    fn test_escape_html_lazy_escapes_bare_ampersand() {
        assert_eq!(escape_html_lazy("a & b"), "a &amp; b");
        assert_eq!(escape_html_lazy("&"), "&amp;");
        assert_eq!(escape_html_lazy("&amp"), "&amp;amp");
        assert_eq!(escape_html_lazy("&#;"), "&amp;#;");
        assert_eq!(escape_html_lazy("&#xZ;"), "&amp;#xZ;");
    }

    #[test]
    fn test_escape_html_lazy_idempotent() {
        let once = escape_html_lazy("<b> & \"q\"");
        assert_eq!(once, "&lt;b&gt; &amp; \"q\"");
        assert_eq!(escape_html_lazy(&once), once);
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start("mermaid", true);
        assert!(state.is_active());
        assert!(state.is_fenced());

        state.push_str("graph TD;\n");
        let (info, content) = state.end();
        assert_eq!(info, "mermaid");
        assert_eq!(content, "graph TD;\n");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);
        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(state.current_alignment_attr(), r#" align="left""#);
        state.next_cell();
        assert_eq!(state.current_alignment_attr(), "");
        state.next_cell();
        assert_eq!(state.current_alignment_attr(), r#" align="right""#);
        state.end_head();
        state.start_row();
        assert!(!state.is_in_head());
        assert_eq!(state.current_alignment_attr(), r#" align="left""#);
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        state.start("a.png", "Title");
        assert!(state.is_active());
        state.push_str("alt ");
        state.push_str("text");
        let (src, title, alt) = state.end();
        assert_eq!(src, "a.png");
        assert_eq!(title, "Title");
        assert_eq!(alt, "alt text");
        assert!(!state.is_active());
    }
}
