//! Turns recognized directives into HTML.

use std::fmt::Write;

use super::command::{BoxVariant, Directive, DirectiveKind, StyleFilter, TogglerPosition};
use super::output::{DirectiveOutcome, DropReason};
use super::routes::recognize;
use crate::config::{RenderConfig, TogglerAppendMode};
use crate::serializer::ExtensionHooks;
use crate::styles::StyleRegistry;

/// Stateful directive renderer for one render session.
///
/// Owns the session's [`StyleRegistry`] (mutated by `STYLE` directives) and
/// the table-of-contents counter.
///
/// # Example
///
/// ```
/// use ymf_renderer::RenderConfig;
/// use ymf_renderer::directive::DirectiveInterpreter;
///
/// let mut interpreter = DirectiveInterpreter::new(&RenderConfig::default());
/// let html = interpreter.interpret("BOX.INFO Note").into_html();
/// assert_eq!(
///     html,
///     r#"<div class="jsh-md-infobox"><div class="jsh-md-infobox-ue">Note</div><div class="jsh-md-infobox-container">"#
/// );
/// ```
#[derive(Debug)]
pub struct DirectiveInterpreter {
    styles: StyleRegistry,
    style_prefix: String,
    app: String,
    append_mode: TogglerAppendMode,
    next_toc_id: u64,
}

impl DirectiveInterpreter {
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        let styles = if config.seed_default_styles {
            StyleRegistry::with_defaults(&config.style_prefix)
        } else {
            StyleRegistry::new()
        };
        Self {
            styles,
            style_prefix: config.style_prefix.clone(),
            app: config.app_base_var_name.clone(),
            append_mode: config.toggler_append_mode,
            next_toc_id: 1,
        }
    }

    /// Interpret the text found between `<!---` and `--->`.
    pub fn interpret(&mut self, raw: &str) -> DirectiveOutcome {
        match recognize(raw) {
            Some(directive) => self.render(&directive),
            None => {
                tracing::debug!(directive = raw, "dropping unrecognized comment directive");
                DirectiveOutcome::Dropped(DropReason::Unrecognized)
            }
        }
    }

    /// Render an already recognized directive.
    pub fn render(&mut self, directive: &Directive) -> DirectiveOutcome {
        let param = directive.param.as_str();
        let outcome = match directive.kind {
            DirectiveKind::BoxOpen(variant) => DirectiveOutcome::html(self.open_box(variant, param)),
            DirectiveKind::BoxClose(variant) => DirectiveOutcome::html(variant.close_markup()),
            DirectiveKind::ContainerOpen => DirectiveOutcome::html(self.open_container(param)),
            DirectiveKind::ContainerClose => DirectiveOutcome::html("</div>"),
            DirectiveKind::StyleSet => self.update_styles(param, true),
            DirectiveKind::StyleReset => self.update_styles(param, false),
            DirectiveKind::Toggler => self.toggler(directive),
            DirectiveKind::TogglerAppend(position) => self.toggler_append(directive, position),
            DirectiveKind::Toc => DirectiveOutcome::html(self.toc()),
            DirectiveKind::SplitterLeft => DirectiveOutcome::html(format!(
                r#"<label{}>{param}</label>"#,
                self.styles.class_attr("splitter1")
            )),
            DirectiveKind::SplitterRight => DirectiveOutcome::html(format!(
                r#"<span{}>{param}</span>"#,
                self.styles.class_attr("splitter2")
            )),
        };
        if let DirectiveOutcome::Dropped(reason) = &outcome {
            tracing::debug!(kind = ?directive.kind, ?reason, "directive dropped");
        }
        outcome
    }

    /// Current class registry.
    #[must_use]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    fn class_list(&self, tag: &str, extra: &str) -> String {
        let base = self.styles.classes(tag);
        match (base.is_empty(), extra.is_empty()) {
            (_, true) => base,
            (true, false) => extra.to_owned(),
            (false, false) => format!("{base} {extra}"),
        }
    }

    fn open_box(&self, variant: BoxVariant, param: &str) -> String {
        let tag = variant.tag();
        if variant == BoxVariant::Plain {
            return format!(r#"<div class="{}">"#, self.class_list(tag, param));
        }
        format!(
            r#"<div class="{}"><div class="{}">{param}</div><div class="{}">"#,
            self.styles.classes(tag),
            self.styles.classes(&format!("{tag}-ue")),
            self.styles.classes(&format!("{tag}-container")),
        )
    }

    fn open_container(&self, param: &str) -> String {
        let id = format!("md-container-{param}");
        format!(
            r#"<div class="{}" id="{id}">"#,
            self.class_list("container", &id)
        )
    }

    fn update_styles(&mut self, param: &str, set: bool) -> DirectiveOutcome {
        if param.is_empty() {
            return DirectiveOutcome::Dropped(DropReason::MissingParameter);
        }
        let filter = StyleFilter::parse(param);
        let (tags, styles) = (filter.tag_refs(), filter.style_refs());
        if set {
            self.styles.set_styles(&tags, &styles);
        } else {
            self.styles.reset_styles(&tags, &styles);
        }
        tracing::trace!(?tags, ?styles, set, "style registry updated");
        DirectiveOutcome::html("")
    }

    fn toggler(&self, directive: &Directive) -> DirectiveOutcome {
        let args = directive.toggler_args();
        let id = args.compact_target();
        if id.is_empty() {
            return DirectiveOutcome::Dropped(DropReason::MissingParameter);
        }
        let parent = format!("md-togglerparent-{id}");
        let app = &self.app;
        DirectiveOutcome::html(format!(
            r#"<div class="{}" id="{parent}"></div><script>{app}.get("UIToggler").appendToggler(".{parent}", ".md-container-{id}", "{}");</script>"#,
            self.class_list("togglerparent", &parent),
            args.toggler_type,
        ))
    }

    fn toggler_append(&self, directive: &Directive, position: TogglerPosition) -> DirectiveOutcome {
        let args = directive.toggler_args();
        let filter = StyleFilter::parse(&args.target);
        let before = position == TogglerPosition::Before;

        let snippets = filter.pairs().map(|(tag, style)| {
            format!(
                r#"<script>{}.get("UIToggler").appendTogglerForElements("{tag}.{style}", "{}", {before});</script>"#,
                self.app, args.toggler_type,
            )
        });
        let html = match self.append_mode {
            TogglerAppendMode::KeepLast => snippets.last(),
            TogglerAppendMode::AccumulateAll => {
                let all: String = snippets.collect();
                (!all.is_empty()).then_some(all)
            }
        };
        html.map_or(
            DirectiveOutcome::Dropped(DropReason::MissingParameter),
            DirectiveOutcome::Rendered,
        )
    }

    fn toc(&mut self) -> String {
        let n = self.next_toc_id;
        self.next_toc_id += 1;

        let base = format!("{}md-toc-container", self.style_prefix);
        let id = format!("{base}-{n}");
        let app = &self.app;
        let mut html = format!(r#"<div class="{base} {id}" id="{id}"></div>"#);
        write!(
            html,
            r#"<script>{app}.get("Renderer").addTOCForBlock({app}.$("div.{id}"), {app}.$("div.{id}").parents("div"), undefined);</script>"#
        )
        .unwrap();
        html
    }
}

impl ExtensionHooks for DirectiveInterpreter {
    fn class_attr(&self, tag: &str) -> String {
        self.styles.class_attr(tag)
    }

    fn comment_directive(&mut self, raw: &str) -> String {
        self.interpret(raw).into_html()
    }

    fn splitter(&mut self, left: &str, right: &str) -> String {
        let mut html = self
            .render(&Directive::new(DirectiveKind::SplitterLeft, left))
            .into_html();
        html.push_str(
            &self
                .render(&Directive::new(DirectiveKind::SplitterRight, right))
                .into_html(),
        );
        html
    }
}
