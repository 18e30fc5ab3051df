//! Ordered literal substitutions.
//!
//! The pipeline runs a handful of fixed text rewrites (ellipsis, dash entity,
//! double-escaped `>`) before and after conversion. Each rewrite set is a
//! [`Replacements`] applied in registration order.

/// Ordered list of literal `from -> to` substitutions.
///
/// # Example
///
/// ```
/// use ymf_renderer::Replacements;
///
/// let mut text = "wait… &mdash; done".to_owned();
/// let replacements = Replacements::new()
///     .with("…", "...")
///     .with("&mdash;", "---");
/// replacements.apply(&mut text);
///
/// assert_eq!(text, "wait... --- done");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a substitution; later substitutions see the output of earlier ones.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.items.push((from.into(), to.into()));
    }

    /// Builder form of [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.add(from, to);
        self
    }

    /// Apply every substitution to `text`, in order.
    pub fn apply(&self, text: &mut String) {
        for (from, to) in &self.items {
            if !from.is_empty() && text.contains(from.as_str()) {
                *text = text.replace(from.as_str(), to);
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_leaves_text() {
        let mut text = "unchanged".to_owned();
        Replacements::new().apply(&mut text);
        assert_eq!(text, "unchanged");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let mut text = "a… b… c…".to_owned();
        Replacements::new().with("…", "...").apply(&mut text);
        assert_eq!(text, "a... b... c...");
    }

    #[test]
    fn test_order_is_significant() {
        let mut text = "&amp;gt;".to_owned();
        let replacements = Replacements::new()
            .with("&amp;gt;", "&gt;")
            .with("&gt;", ">");
        replacements.apply(&mut text);
        assert_eq!(text, ">");
    }

    #[test]
    fn test_empty_pattern_ignored() {
        let mut text = "abc".to_owned();
        Replacements::new().with("", "x").apply(&mut text);
        assert_eq!(text, "abc");
    }

    #[test]
    fn test_reusable() {
        let replacements = Replacements::new().with("x", "y");
        let mut first = "x".to_owned();
        let mut second = "xx".to_owned();
        replacements.apply(&mut first);
        replacements.apply(&mut second);
        assert_eq!(first, "y");
        assert_eq!(second, "yy");
        assert_eq!(replacements.len(), 1);
        assert!(!replacements.is_empty());
    }
}
