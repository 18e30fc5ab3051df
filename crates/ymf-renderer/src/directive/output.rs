//! Directive outcome types.

/// Result of interpreting one comment directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveOutcome {
    /// HTML to splice in place of the comment. May be empty (e.g. `STYLE`).
    Rendered(String),
    /// The comment was not emitted.
    Dropped(DropReason),
}

/// Why a comment produced no output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// No route matched the comment text.
    Unrecognized,
    /// The directive needs a parameter it did not get.
    MissingParameter,
}

impl DirectiveOutcome {
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Rendered(s.into())
    }

    /// HTML to emit; dropped directives emit nothing.
    #[must_use]
    pub fn into_html(self) -> String {
        match self {
            Self::Rendered(html) => html,
            Self::Dropped(_) => String::new(),
        }
    }

    #[must_use]
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_into_html() {
        assert_eq!(DirectiveOutcome::html("<div>").into_html(), "<div>");
    }

    #[test]
    fn test_dropped_into_html_is_empty() {
        let outcome = DirectiveOutcome::Dropped(DropReason::Unrecognized);
        assert!(outcome.is_dropped());
        assert_eq!(outcome.into_html(), "");
    }
}
