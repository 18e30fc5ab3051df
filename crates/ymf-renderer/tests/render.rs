//! End-to-end rendering scenarios.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use ymf_renderer::{
    ElementIdCounter, IdScope, MarkdownRenderer, RenderConfig, TogglerAppendMode, render,
};

fn styled(markdown: &str) -> String {
    render(markdown, &RenderConfig::default()).unwrap()
}

fn unstyled(markdown: &str) -> String {
    render(markdown, &RenderConfig::default().with_default_styles(false)).unwrap()
}

#[test]
fn heading_and_paragraph() {
    assert_eq!(
        unstyled("# Title\n\nHello"),
        r#"<h1 id="heading_1">Title</h1><p>Hello</p>"#
    );
}

#[test]
fn mermaid_block_becomes_placeholder() {
    assert_eq!(
        styled("```mermaid\ngraph TD;\n```"),
        "<div id=\"inlineMermaid1\" class=\"mermaid\">graph TD;\n</div>"
    );
}

#[test]
fn info_box_wraps_body() {
    let html = styled("<!---BOX.INFO My Label--->\nBody\n<!---/BOX.INFO--->");
    let open = r#"<div class="jsh-md-infobox"><div class="jsh-md-infobox-ue">My Label</div><div class="jsh-md-infobox-container">"#;
    assert!(html.starts_with(open), "{html}");
    assert!(html.contains(r#"<p class="jsh-md-p">Body</p>"#), "{html}");
    assert!(html.trim_end().ends_with("</div></div>"), "{html}");
}

#[test]
fn multi_line_box_comment() {
    let html = styled("<!---BOX.WARN Careful\nThis is *important*.\n--->");
    assert!(html.starts_with(r#"<div class="jsh-md-warnbox">"#), "{html}");
    assert!(html.contains("<em>important</em>"), "{html}");
    assert!(html.trim_end().ends_with("</div></div>"), "{html}");
}

#[test]
fn style_directive_changes_later_paragraphs() {
    let html = styled("Before\n\n<!---STYLE p:lead--->\n\nAfter\n\n<!---/STYLE p:lead--->\n\nEnd");
    assert!(html.contains(r#"<p class="jsh-md-p">Before</p>"#), "{html}");
    assert!(html.contains(r#"<p class="jsh-md-p lead">After</p>"#), "{html}");
    assert!(html.contains(r#"<p class="jsh-md-p">End</p>"#), "{html}");
}

#[test]
fn toc_directive() {
    let html = styled("<!---TOC--->\n\n# A");
    assert!(html.contains(r#"<div class="jsh-md-toc-container jsh-md-toc-container-1" id="jsh-md-toc-container-1"></div>"#));
    assert!(html.contains(r#"jshAppBase.get("Renderer").addTOCForBlock("#));
    assert!(html.contains(r#"<h1 id="heading_1" class="jsh-md-h1">A</h1>"#));
}

#[test]
fn toggler_and_container() {
    let html = styled("<!---TOGGLER details--->\n\n<!---CONTAINER details--->\n\nHidden\n\n<!---/CONTAINER--->");
    assert!(html.contains(r#"id="md-togglerparent-details""#), "{html}");
    assert!(html.contains(r#"appendToggler(".md-togglerparent-details", ".md-container-details", "icon")"#));
    assert!(html.contains(r#"<div class="jsh-md-container md-container-details" id="md-container-details">"#));
}

#[test]
fn toggler_append_modes() {
    let doc = "<!---TOGGLER.AFTER h2 h3:x--->";
    let keep_last = styled(doc);
    assert_eq!(keep_last.matches("<script>").count(), 1);
    assert!(keep_last.contains(r#"appendTogglerForElements("h3.x", "icon", false)"#));

    let config = RenderConfig::default().with_toggler_append_mode(TogglerAppendMode::AccumulateAll);
    let all = render(doc, &config).unwrap();
    assert_eq!(all.matches("<script>").count(), 2);
    assert!(all.contains(r#"appendTogglerForElements("h2.x", "icon", false)"#));
}

#[test]
fn unrecognized_comment_dropped() {
    assert_eq!(unstyled("a <!---NOPE---> b"), "<p>a  b</p>");
}

#[test]
fn plain_html_comment_is_text() {
    assert_eq!(unstyled("<!-- note -->"), "<p>&lt;!-- note --&gt;</p>");
}

#[test]
fn splitter() {
    assert_eq!(
        styled("Name:|:Value"),
        r#"<p class="jsh-md-p"><label class="jsh-md-splitter1">Name</label><span class="jsh-md-splitter2">Value</span></p>"#
    );
}

#[test]
fn generic_code_block() {
    assert_eq!(
        unstyled("```rust\nlet a = 1 < 2;\n```"),
        "<pre><code id=\"inlineCode1\" class=\"jsh-code txt\">let a = 1 &lt; 2;\n</code></pre>"
    );
}

#[test]
fn blank_lines_in_code_survive() {
    let html = unstyled("```\nfirst\n\n\nlast\n```");
    assert!(html.contains("first\n\n\nlast\n"), "{html}");
}

#[test]
fn leading_blank_line_in_code_survives() {
    assert_eq!(
        unstyled("```\n\nfirst\n```"),
        "<pre><code id=\"inlineCode1\" class=\"jsh-code txt\">\nfirst\n</code></pre>"
    );
    assert_eq!(
        unstyled("```mermaid\n\ngraph TD;\n```"),
        "<div id=\"inlineMermaid1\" class=\"mermaid\">\ngraph TD;\n</div>"
    );
}

#[test]
fn dot_line_in_prose_kept() {
    assert_eq!(unstyled("a\n.\nb"), "<p>a\n.\nb</p>");
}

#[test]
fn multi_line_box_with_fenced_code() {
    let html = styled("<!---BOX.INFO Label\nText\n```\ncode\n```\nMore\n--->");
    assert!(html.starts_with(r#"<div class="jsh-md-infobox">"#), "{html}");
    assert!(html.contains(r#"<div class="jsh-md-infobox-ue">Label</div>"#), "{html}");
    assert!(html.contains(r#"<p class="jsh-md-p">Text</p>"#), "{html}");
    assert!(
        html.contains("<pre><code id=\"inlineCode1\" class=\"jsh-code txt\">code\n</code></pre>"),
        "{html}"
    );
    assert!(html.contains(r#"<p class="jsh-md-p">More</p>"#), "{html}");
    assert!(html.trim_end().ends_with("</div></div>"), "{html}");
}

#[test]
fn mindmap_aliases_share_class() {
    let html = unstyled("```ymffreemind\na\n```\n\n```ymfmindmap\nb\n```");
    assert_eq!(
        html,
        concat!(
            "<div id=\"inlineMindmap1\" class=\"ymfmindmap\">a\n</div>",
            "<div id=\"inlineMindmap2\" class=\"ymfmindmap\">b\n</div>",
        )
    );
    let html = unstyled("```yaiofreemind\na\n```\n\n```yaiomindmap\nb\n```");
    assert!(html.contains("<div id=\"inlineMindmap1\" class=\"yaiomindmap\">a\n</div>"));
    assert!(html.contains("<div id=\"inlineMindmap2\" class=\"yaiomindmap\">b\n</div>"));
}

#[test]
fn custom_prefix_and_app() {
    let config = RenderConfig::default()
        .with_style_prefix("doc-")
        .with_app_base_var_name("app");
    let html = render("<!---TOC--->\n\n```x\ny\n```", &config).unwrap();
    assert!(html.contains(r#"id="doc-md-toc-container-1""#), "{html}");
    assert!(html.contains("app.get(\"Renderer\")"), "{html}");
    assert!(html.contains(r#"class="doc-code txt""#), "{html}");
}

#[test]
fn shared_ids_are_unique_across_documents() {
    let counter = Arc::new(ElementIdCounter::new());
    let renderer = MarkdownRenderer::new(
        RenderConfig::default()
            .with_default_styles(false)
            .with_id_scope(IdScope::Shared(Arc::clone(&counter))),
    );
    let first = renderer.render("```mermaid\na\n```").unwrap();
    let second = renderer.render("```mermaid\nb\n```").unwrap();
    assert!(first.contains("inlineMermaid1"));
    assert!(second.contains("inlineMermaid2"));
}

#[test]
fn table_cells_styled() {
    let html = styled("| A |\n|---|\n| 1 |");
    assert_eq!(
        html,
        concat!(
            r#"<table class="jsh-md-table"><thead class="jsh-md-thead"><tr class="jsh-md-tr">"#,
            r#"<th class="jsh-md-th">A</th></tr></thead><tbody class="jsh-md-tbody">"#,
            r#"<tr class="jsh-md-tr"><td class="jsh-md-td">1</td></tr></tbody></table>"#,
        )
    );
}

#[test]
fn line_break_tag_styled() {
    assert_eq!(
        styled("a<br>b"),
        r#"<p class="jsh-md-p">a<br class="jsh-md-br">b</p>"#
    );
}
