//! Per-tag CSS class registry.
//!
//! Every element the serializer emits asks the registry for its class list.
//! `STYLE` directives add and remove classes while the document renders.

use std::collections::HashMap;

/// Tags seeded with a `{prefix}md-{tag}` class at session start.
pub const DEFAULT_STYLED_TAGS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "h7",
    "h8",
    "img",
    "a",
    "p",
    "table",
    "tr",
    "td",
    "th",
    "tbody",
    "thead",
    "br",
    "li",
    "ul",
    "ol",
    "container",
    "code",
    "box",
    "box-ue",
    "box-container",
    "infobox",
    "infobox-ue",
    "infobox-container",
    "warnbox",
    "warnbox-ue",
    "warnbox-container",
    "alertbox",
    "alertbox-ue",
    "alertbox-container",
    "togglerparent",
    "splitter1",
    "splitter2",
];

/// Mapping from tag name to its ordered, duplicate-free class list.
#[derive(Clone, Debug, Default)]
pub struct StyleRegistry {
    tags: HashMap<String, Vec<String>>,
    /// Prefix the default classes were seeded with, if any.
    default_prefix: Option<String>,
}

impl StyleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the default class of every tag in
    /// [`DEFAULT_STYLED_TAGS`].
    #[must_use]
    pub fn with_defaults(prefix: &str) -> Self {
        let mut registry = Self::new();
        for tag in DEFAULT_STYLED_TAGS {
            registry.insert(tag, &default_class(prefix, tag));
        }
        registry.default_prefix = Some(prefix.to_owned());
        registry
    }

    /// Add every style to every tag. Styles already present are kept in place.
    pub fn set_styles(&mut self, tags: &[&str], styles: &[&str]) {
        for tag in tags.iter().filter(|t| !t.is_empty()) {
            for style in styles.iter().filter(|s| !s.is_empty()) {
                self.insert(tag, style);
            }
        }
    }

    /// Remove every style from every tag. Seeded default classes are never removed.
    pub fn reset_styles(&mut self, tags: &[&str], styles: &[&str]) {
        for tag in tags.iter().filter(|t| !t.is_empty()) {
            let protected = self.default_class_of(tag);
            let Some(list) = self.tags.get_mut(*tag) else {
                continue;
            };
            list.retain(|existing| {
                protected.as_deref() == Some(existing.as_str())
                    || !styles.contains(&existing.as_str())
            });
        }
    }

    /// Classes registered for `tag`, in insertion order.
    #[must_use]
    pub fn styles(&self, tag: &str) -> &[String] {
        self.tags.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Space-joined class list for `tag`, empty when it has none.
    #[must_use]
    pub fn classes(&self, tag: &str) -> String {
        self.styles(tag).join(" ")
    }

    /// ` class="..."` attribute for `tag`, or an empty string when it has no classes.
    ///
    /// The leading space lets callers splice the result straight after the tag name.
    ///
    /// # Example
    ///
    /// ```
    /// use ymf_renderer::StyleRegistry;
    ///
    /// let mut styles = StyleRegistry::with_defaults("jsh-");
    /// styles.set_styles(&["p"], &["lead"]);
    /// assert_eq!(styles.class_attr("p"), r#" class="jsh-md-p lead""#);
    /// assert_eq!(styles.class_attr("blockquote"), "");
    /// ```
    #[must_use]
    pub fn class_attr(&self, tag: &str) -> String {
        match self.styles(tag) {
            [] => String::new(),
            list => format!(r#" class="{}""#, list.join(" ")),
        }
    }

    fn insert(&mut self, tag: &str, style: &str) {
        let list = self.tags.entry(tag.to_owned()).or_default();
        if !list.iter().any(|s| s == style) {
            list.push(style.to_owned());
        }
    }

    fn default_class_of(&self, tag: &str) -> Option<String> {
        let prefix = self.default_prefix.as_deref()?;
        DEFAULT_STYLED_TAGS
            .contains(&tag)
            .then(|| default_class(prefix, tag))
    }
}

fn default_class(prefix: &str, tag: &str) -> String {
    format!("{prefix}md-{tag}")
}
