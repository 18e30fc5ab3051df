//! Ordered recognizer table for comment directives.
//!
//! Each route is an anchored pattern matched against the whole comment text.
//! Routes are tried in table order and the first match wins.

use std::sync::LazyLock;

use regex::Regex;

use super::command::{BoxVariant, Directive, DirectiveKind, TogglerPosition};

struct Route {
    name: &'static str,
    pattern: Regex,
    classify: fn(&str) -> Option<DirectiveKind>,
}

impl Route {
    fn new(name: &'static str, pattern: &str, classify: fn(&str) -> Option<DirectiveKind>) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            classify,
        }
    }
}

static ROUTES: LazyLock<[Route; 5]> = LazyLock::new(|| {
    [
        Route::new(
            "box-open",
            r"(?i)^(BOX\.INFO|BOX\.WARN|BOX\.ALERT|BOX|CONTAINER|STYLE) *([#-_a-z,;0-9.: \p{L}\p{N}]*?) *$",
            classify_open,
        ),
        Route::new(
            "box-close",
            r"(?i)^/(BOX\.INFO|BOX\.WARN|BOX\.ALERT|BOX|CONTAINER|STYLE) *([#-_a-z,;0-9.: \p{L}\p{N}]*?) *$",
            classify_close,
        ),
        Route::new(
            "toggler",
            r"(?i)^(TOGGLER) *([-#_a-z,;0-9.]*?) *$",
            |_| Some(DirectiveKind::Toggler),
        ),
        Route::new(
            "toggler-append",
            r"(?i)^(TOGGLER\.AFTER|TOGGLER\.BEFORE) *([-#_a-z,;0-9.: ]*?) *$",
            classify_toggler_append,
        ),
        Route::new("toc", r"(?i)^(TOC) *([-#_a-z,;0-9.]*?) *$", |_| {
            Some(DirectiveKind::Toc)
        }),
    ]
});

/// Match the text between `<!---` and `--->` against the route table.
pub(crate) fn recognize(raw: &str) -> Option<Directive> {
    ROUTES.iter().find_map(|route| {
        let caps = route.pattern.captures(raw)?;
        let kind = (route.classify)(caps.get(1)?.as_str())?;
        let param = caps.get(2).map_or("", |m| m.as_str());
        tracing::trace!(route = route.name, ?kind, param, "directive recognized");
        Some(Directive::new(kind, param))
    })
}

fn classify_open(keyword: &str) -> Option<DirectiveKind> {
    match keyword.to_ascii_uppercase().as_str() {
        "STYLE" => Some(DirectiveKind::StyleSet),
        "CONTAINER" => Some(DirectiveKind::ContainerOpen),
        other => box_variant(other).map(DirectiveKind::BoxOpen),
    }
}

fn classify_close(keyword: &str) -> Option<DirectiveKind> {
    match keyword.to_ascii_uppercase().as_str() {
        "STYLE" => Some(DirectiveKind::StyleReset),
        "CONTAINER" => Some(DirectiveKind::ContainerClose),
        other => box_variant(other).map(DirectiveKind::BoxClose),
    }
}

fn classify_toggler_append(keyword: &str) -> Option<DirectiveKind> {
    match keyword.to_ascii_uppercase().as_str() {
        "TOGGLER.AFTER" => Some(DirectiveKind::TogglerAppend(TogglerPosition::After)),
        "TOGGLER.BEFORE" => Some(DirectiveKind::TogglerAppend(TogglerPosition::Before)),
        _ => None,
    }
}

fn box_variant(keyword: &str) -> Option<BoxVariant> {
    match keyword {
        "BOX" => Some(BoxVariant::Plain),
        "BOX.INFO" => Some(BoxVariant::Info),
        "BOX.WARN" => Some(BoxVariant::Warn),
        "BOX.ALERT" => Some(BoxVariant::Alert),
        _ => None,
    }
}
