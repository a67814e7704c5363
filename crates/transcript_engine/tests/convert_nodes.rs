use pretty_assertions::assert_eq;
use transcript_engine::TranscriptConverter;

fn convert(html: &str) -> String {
    TranscriptConverter.convert_fragment(html)
}

#[test]
fn inline_code_is_preserved_in_paragraph() {
    assert_eq!(convert("<p>Hello <code>world</code></p>"), "Hello `world`");
}

#[test]
fn preformatted_block_is_fenced_verbatim() {
    let md = convert("<pre><code>&lt;b&gt;not bold&lt;/b&gt; *x* # y\n</code></pre>");
    assert_eq!(md, "```\n<b>not bold</b> *x* # y\n```");
}

#[test]
fn code_text_survives_inside_emphasis_and_headings() {
    assert_eq!(convert("<h3>Use <code>cargo</code></h3>"), "### Use `cargo`");
    assert_eq!(convert("<p><b>run <code>x_y</code></b></p>"), "**run `x_y`**");
}

#[test]
fn placeholders_never_leak() {
    let md = convert("<ul><li><code>a</code></li><li><pre>b</pre></li></ul><p><code>c</code></p>");
    assert!(!md.contains('\u{E000}'));
    assert!(!md.contains("CODE_BLOCK"));
    assert!(md.contains("`a`"));
    assert!(md.contains("```\nb\n```"));
    assert!(md.contains("`c`"));
}

#[test]
fn headings_use_hash_per_level() {
    assert_eq!(convert("<h2>Title</h2><p>Body</p>"), "## Title\n\nBody");
    assert_eq!(convert("<h6>Deep</h6>"), "###### Deep");
}

#[test]
fn inline_emphasis_and_scripts() {
    assert_eq!(convert("<p>a <strong>b</strong> c</p>"), "a **b** c");
    assert_eq!(convert("<p><em>soft</em> and <i>slanted</i></p>"), "*soft* and *slanted*");
    assert_eq!(convert("<p>H<sub>2</sub>O and x<sup>2</sup></p>"), "H<sub>2</sub>O and x<sup>2</sup>");
    assert_eq!(convert("<p>a<b>  </b>b</p>"), "ab");
}

#[test]
fn line_breaks_and_rules() {
    assert_eq!(convert("<p>one<br>two</p>"), "one\ntwo");
    assert_eq!(convert("<p>a</p><hr><p>b</p>"), "a\n\n---\n\nb");
}

#[test]
fn unordered_list_with_nested_list() {
    let md = convert("<ul><li>a<ul><li>b</li><li>c</li></ul></li><li>d</li></ul>");
    assert_eq!(md, "- a\n  - b\n  - c\n- d");
}

#[test]
fn ordered_list_numbering_resets_per_list() {
    let md = convert("<ol><li>one<ol><li>inner</li></ol></li><li>two</li></ol>");
    assert_eq!(md, "1. one\n  1. inner\n2. two");
}

#[test]
fn hidden_list_items_do_not_consume_numbers() {
    let md = convert(r#"<ol><li>one</li><li aria-hidden="true">secret</li><li>two</li></ol>"#);
    assert_eq!(md, "1. one\n2. two");
}

#[test]
fn list_items_render_inline_markup() {
    let md = convert("<ul>\n  <li>\n    <p>Use <b>bold</b></p>\n  </li>\n</ul>");
    assert_eq!(md, "- Use **bold**");
}

#[test]
fn links_with_and_without_href() {
    assert_eq!(convert(r#"<p><a href="https://example.com">site</a></p>"#), "[site](https://example.com)");
    assert_eq!(convert("<p><a>plain</a></p>"), "plain");
}

#[test]
fn lens_links_are_dropped_entirely() {
    let md = convert(
        r#"<p>before<a class="lens-icon-container" href="https://lens.example"><span>Search image</span></a>after</p>"#,
    );
    assert_eq!(md, "beforeafter");
}

#[test]
fn only_uploaded_images_render() {
    let md = convert(
        r#"<p><img src="avatar.png" alt="me"><img src="cat.png" alt="cat" data-test-id="uploaded-img-0"></p>"#,
    );
    assert_eq!(md, "![cat](cat.png)");
    assert_eq!(convert(r#"<img src="icon.svg" alt="icon">"#), "");
}

#[test]
fn table_renders_with_separator() {
    let md = convert("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>");
    assert_eq!(md, "| A | B |\n| --- | --- |\n| 1 | 2 |");
}

#[test]
fn blockquote_lines_are_prefixed() {
    let md = convert("<blockquote>\n<p>line one</p>\n<p>line two</p>\n</blockquote>");
    assert_eq!(md, "> line one\n> line two");
}

#[test]
fn blockquote_quotes_plain_text_content() {
    let md = convert("<p>before</p><blockquote><p><b>Note</b></p>\n<ul><li>x <code>y</code></li></ul></blockquote>");
    assert_eq!(md, "before\n\n> Note\n> x `y`");
}

#[test]
fn code_inside_lens_link_leaves_no_placeholder() {
    let md = convert(r#"<p>a<a class="lens-icon-container" href="x"><code>q</code></a>b <code>c</code></p>"#);
    assert_eq!(md, "ab `c`");
}

#[test]
fn hidden_nodes_contribute_nothing() {
    let md = convert(
        r#"<p>visible<span class="cdk-visually-hidden">secret1</span></p>
           <div style="display: none"><p>secret2</p></div>
           <p><b>bold<span aria-hidden="true">secret3</span></b></p>
           <table><tr><td>cell<span style="visibility:hidden">secret4</span></td></tr></table>"#,
    );
    assert!(!md.contains("secret"), "hidden text leaked: {md:?}");
    assert!(md.contains("visible"));
    assert!(md.contains("**bold**"));
    assert!(md.contains("| cell |"));
}

#[test]
fn inline_and_block_math() {
    assert_eq!(
        convert(r#"<p>Energy <span class="math-inline" data-math="E=mc^2">E=mc2</span></p>"#),
        "Energy $E=mc^2$"
    );
    assert_eq!(
        convert(r#"<div class="math-block" data-math="\int_0^1 x\,dx"></div>"#),
        "$$\n\\int_0^1 x\\,dx\n$$"
    );
}

#[test]
fn block_math_in_list_follows_indent() {
    let md = convert(r#"<ul><li>Formula:<div class="math-block" data-math="x^2"></div></li></ul>"#);
    assert_eq!(md, "- Formula:\n  $$\n  x^2\n  $$");
}

#[test]
fn math_without_source_falls_back_to_children() {
    assert_eq!(convert(r#"<p><span class="math-inline">plain</span></p>"#), "plain");
}

#[test]
fn unknown_elements_are_transparent_and_chrome_is_dropped() {
    assert_eq!(convert("<div><custom-el>hi <b>there</b></custom-el></div>"), "hi **there**");
    assert_eq!(convert("<p>a</p><script>var x = 1;</script><button>copy</button>"), "a");
}
