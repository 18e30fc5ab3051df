//! Parsed directive model.

/// Flavor of a `BOX` directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxVariant {
    /// `BOX`: a single styled div.
    Plain,
    /// `BOX.INFO`
    Info,
    /// `BOX.WARN`
    Warn,
    /// `BOX.ALERT`
    Alert,
}

impl BoxVariant {
    /// Registry tag holding the outer div classes.
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::Plain => "box",
            Self::Info => "infobox",
            Self::Warn => "warnbox",
            Self::Alert => "alertbox",
        }
    }

    /// Directive keyword, e.g. `BOX.WARN`.
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::Plain => "BOX",
            Self::Info => "BOX.INFO",
            Self::Warn => "BOX.WARN",
            Self::Alert => "BOX.ALERT",
        }
    }

    /// Markup closing an open box of this flavor.
    pub(crate) fn close_markup(self) -> &'static str {
        match self {
            Self::Plain => "</div>",
            Self::Info | Self::Warn | Self::Alert => "</div></div>",
        }
    }
}

/// Where a `TOGGLER.AFTER` / `TOGGLER.BEFORE` control is inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TogglerPosition {
    After,
    Before,
}

/// What a recognized directive does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    BoxOpen(BoxVariant),
    BoxClose(BoxVariant),
    ContainerOpen,
    ContainerClose,
    StyleSet,
    StyleReset,
    Toggler,
    TogglerAppend(TogglerPosition),
    Toc,
    SplitterLeft,
    SplitterRight,
}

impl DirectiveKind {
    /// Comment text closing a block opened by this kind, for kinds that wrap content.
    pub(crate) fn close_token(self) -> Option<String> {
        match self {
            Self::BoxOpen(variant) => Some(format!("/{}", variant.keyword())),
            Self::ContainerOpen => Some("/CONTAINER".to_owned()),
            _ => None,
        }
    }
}

/// A recognized directive and its raw parameter text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub param: String,
}

impl Directive {
    #[must_use]
    pub fn new(kind: DirectiveKind, param: impl Into<String>) -> Self {
        Self {
            kind,
            param: param.into(),
        }
    }

    /// Comma-separated arguments of toggler directives.
    pub(crate) fn toggler_args(&self) -> TogglerArgs {
        TogglerArgs::parse(&self.param)
    }
}

/// `tags:styles` filter used by `STYLE` and toggler append directives.
///
/// Both halves are space-separated lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleFilter {
    pub tags: Vec<String>,
    pub styles: Vec<String>,
}

impl StyleFilter {
    /// Parse `"h1 p:red big"`. Anything after a second `:` is ignored.
    #[must_use]
    pub fn parse(filter: &str) -> Self {
        let mut segments = filter.split(':');
        Self {
            tags: words(segments.next().unwrap_or_default()),
            styles: words(segments.next().unwrap_or_default()),
        }
    }

    /// Every `(tag, style)` combination, tags outermost.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().flat_map(move |tag| {
            self.styles
                .iter()
                .map(move |style| (tag.as_str(), style.as_str()))
        })
    }

    pub(crate) fn tag_refs(&self) -> Vec<&str> {
        self.tags.iter().map(String::as_str).collect()
    }

    pub(crate) fn style_refs(&self) -> Vec<&str> {
        self.styles.iter().map(String::as_str).collect()
    }
}

fn words(segment: &str) -> Vec<String> {
    segment.split_whitespace().map(str::to_owned).collect()
}

/// Toggler type used when the directive names none.
pub(crate) const DEFAULT_TOGGLER_TYPE: &str = "icon";

/// `target,type` arguments of toggler directives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TogglerArgs {
    /// First argument, kept verbatim.
    pub(crate) target: String,
    pub(crate) toggler_type: String,
}

impl TogglerArgs {
    fn parse(param: &str) -> Self {
        let mut args = param.split(',');
        let target = args.next().unwrap_or_default().to_owned();
        let toggler_type = args
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOGGLER_TYPE)
            .to_owned();
        Self {
            target,
            toggler_type,
        }
    }

    /// Target with every space removed.
    pub(crate) fn compact_target(&self) -> String {
        self.target.replace(' ', "")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_style_filter_parse() {
        let filter = StyleFilter::parse("h1 p:red  big");
        assert_eq!(filter.tags, ["h1", "p"]);
        assert_eq!(filter.styles, ["red", "big"]);
    }

    #[test]
    fn test_style_filter_missing_styles() {
        let filter = StyleFilter::parse("p");
        assert_eq!(filter.tags, ["p"]);
        assert!(filter.styles.is_empty());
        assert_eq!(filter.pairs().count(), 0);
    }

    #[test]
    fn test_style_filter_extra_segment_ignored() {
        let filter = StyleFilter::parse("p:a:b");
        assert_eq!(filter.styles, ["a"]);
    }

    #[test]
    fn test_style_filter_pairs_order() {
        let filter = StyleFilter::parse("h2 h3:x y");
        let pairs: Vec<_> = filter.pairs().collect();
        assert_eq!(pairs, [("h2", "x"), ("h2", "y"), ("h3", "x"), ("h3", "y")]);
    }

    #[test]
    fn test_toggler_args_default_type() {
        let args = Directive::new(DirectiveKind::Toggler, "detail1").toggler_args();
        assert_eq!(args.target, "detail1");
        assert_eq!(args.toggler_type, "icon");
    }

    #[test]
    fn test_toggler_args_explicit_type() {
        let args = Directive::new(DirectiveKind::Toggler, "my id, text").toggler_args();
        assert_eq!(args.compact_target(), "myid");
        assert_eq!(args.toggler_type, "text");
    }

    #[test]
    fn test_toggler_args_empty_type_falls_back() {
        let args = Directive::new(DirectiveKind::Toggler, "a,").toggler_args();
        assert_eq!(args.toggler_type, "icon");
    }

    #[test]
    fn test_box_variant_markup() {
        assert_eq!(BoxVariant::Plain.tag(), "box");
        assert_eq!(BoxVariant::Warn.tag(), "warnbox");
        assert_eq!(BoxVariant::Plain.close_markup(), "</div>");
        assert_eq!(BoxVariant::Alert.close_markup(), "</div></div>");
    }

    #[test]
    fn test_close_token() {
        assert_eq!(
            DirectiveKind::BoxOpen(BoxVariant::Info).close_token().as_deref(),
            Some("/BOX.INFO")
        );
        assert_eq!(
            DirectiveKind::ContainerOpen.close_token().as_deref(),
            Some("/CONTAINER")
        );
        assert_eq!(DirectiveKind::Toc.close_token(), None);
    }
}
