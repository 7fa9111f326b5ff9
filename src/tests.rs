//! Cross-module properties: determinism, resumption equivalence, style
//! totality, fold invariants, and end-to-end coloring scenarios for both
//! lexers.

use crate::document::{Accessor, Document};
use crate::{css, defaults, fold, tcl};

const SENTINEL: u8 = 0xEE;

// ── Helpers ──────────────────────────────────────────────────────

fn new_css_doc(src: &str, less: bool, scss: bool) -> Document {
    let mut doc = Document::new(src);
    if less {
        doc.set_property("lexer.css.less.language", 1);
    }
    if scss {
        doc.set_property("lexer.css.scss.language", 1);
    }
    doc
}

fn css_doc(src: &str, less: bool, scss: bool) -> Document {
    let mut doc = new_css_doc(src, less, scss);
    let lists = defaults::css_word_lists();
    css::colorize(0, src.len(), 0, &lists, &mut doc);
    css::fold(0, src.len(), 0, &lists, &mut doc);
    doc
}

fn tcl_doc(src: &str) -> Document {
    let mut doc = Document::new(src);
    tcl::colorize(0, src.len(), 0, &defaults::tcl_keywords(), &mut doc);
    doc
}

/// Collapse styles into (text, style) runs for readable assertions.
fn style_runs(doc: &Document) -> Vec<(String, u8)> {
    let mut out: Vec<(String, u8)> = Vec::new();
    for (i, &style) in doc.styles().iter().enumerate() {
        let ch = doc.text()[i] as char;
        match out.last_mut() {
            Some((text, s)) if *s == style => text.push(ch),
            _ => out.push((ch.to_string(), style)),
        }
    }
    out
}

fn css_runs(doc: &Document) -> Vec<(String, css::Style)> {
    style_runs(doc)
        .into_iter()
        .map(|(t, s)| (t, css::Style::from(s)))
        .collect()
}

fn tcl_runs(doc: &Document) -> Vec<(String, tcl::Style)> {
    style_runs(doc)
        .into_iter()
        .map(|(t, s)| (t, tcl::Style::from(s)))
        .collect()
}

/// Everything a pass persists: styles, per-line states, fold levels.
fn metadata(doc: &Document) -> (Vec<u8>, Vec<u32>, Vec<u32>) {
    let lines = doc.line_count();
    (
        doc.styles().to_vec(),
        (0..lines).map(|l| doc.line_state(l)).collect(),
        (0..lines).map(|l| doc.fold_level(l)).collect(),
    )
}

fn assert_css_resumption(src: &str, less: bool, scss: bool) {
    let full = css_doc(src, less, scss);
    let lists = defaults::css_word_lists();
    for line in 1..full.line_count() {
        let mut doc = new_css_doc(src, less, scss);
        let split = doc.line_start(line);
        if split == 0 || split >= src.len() {
            continue;
        }
        css::colorize(0, split, 0, &lists, &mut doc);
        css::fold(0, split, 0, &lists, &mut doc);
        let init = doc.style_at(split - 1);
        css::colorize(split, src.len() - split, init, &lists, &mut doc);
        css::fold(split, src.len() - split, init, &lists, &mut doc);
        assert_eq!(metadata(&doc), metadata(&full), "split at line {line}");
    }
}

fn assert_tcl_resumption(src: &str) {
    let full = tcl_doc(src);
    let keywords = defaults::tcl_keywords();
    for line in 1..full.line_count() {
        let mut doc = Document::new(src);
        let split = doc.line_start(line);
        if split == 0 || split >= src.len() {
            continue;
        }
        tcl::colorize(0, split, 0, &keywords, &mut doc);
        let init = doc.style_at(split - 1);
        tcl::colorize(split, src.len() - split, init, &keywords, &mut doc);
        assert_eq!(metadata(&doc), metadata(&full), "split at line {line}");
    }
}

// ── Sample documents ─────────────────────────────────────────────

const CSS_SAMPLE: &str = "\
/* reset rules
   for the demo */
p { color: red; margin: 0; }
div, span { padding: 1em 2px; }
@media screen {
  a:hover { text-decoration: none; }
}
@import \"theme.css\";
h1 { background: url(\"a.png\") !important; }
.note #head [ title ] { width: 10PX; }
";

const SCSS_SAMPLE: &str = "\
$base: 4px;
.card {
  padding: $base;
  color: red;
  .title { font-weight: bold; }
  // small print
}
a { opacity: 0.5; }
";

const LESS_SAMPLE: &str = "\
@color: #fff;
.mixin(@a; @b) { border: none; }
.box {
  .mixin(1; 2);
  width: ~\"calc(100% - 10px)\";
  color: @color;
}
";

const TCL_SAMPLE: &str = "\
# demo script {
proc greet {name} {
    if {$name eq \"\"} {
        set name \"world\"
    }
    puts \"hello $name\"
}
set msg \"line one
line two\"
greet $msg
set long [list a \\
    b c]
";

// ── Determinism ──────────────────────────────────────────────────

#[test]
fn css_two_passes_are_identical() {
    let a = css_doc(CSS_SAMPLE, false, false);
    let b = css_doc(CSS_SAMPLE, false, false);
    assert_eq!(metadata(&a), metadata(&b));
}

#[test]
fn css_recoloring_same_document_is_stable() {
    let mut doc = css_doc(SCSS_SAMPLE, false, true);
    let before = metadata(&doc);
    let lists = defaults::css_word_lists();
    css::colorize(0, SCSS_SAMPLE.len(), 0, &lists, &mut doc);
    css::fold(0, SCSS_SAMPLE.len(), 0, &lists, &mut doc);
    assert_eq!(metadata(&doc), before);
}

#[test]
fn tcl_two_passes_are_identical() {
    let a = tcl_doc(TCL_SAMPLE);
    let b = tcl_doc(TCL_SAMPLE);
    assert_eq!(metadata(&a), metadata(&b));
}

#[test]
fn tcl_recoloring_same_document_is_stable() {
    let mut doc = tcl_doc(TCL_SAMPLE);
    let before = metadata(&doc);
    tcl::colorize(0, TCL_SAMPLE.len(), 0, &defaults::tcl_keywords(), &mut doc);
    assert_eq!(metadata(&doc), before);
}

// ── Resumption equivalence ───────────────────────────────────────

#[test]
fn css_resumes_at_every_line_boundary() {
    assert_css_resumption(CSS_SAMPLE, false, false);
}

#[test]
fn scss_resumes_at_every_line_boundary() {
    assert_css_resumption(SCSS_SAMPLE, false, true);
}

#[test]
fn less_resumes_at_every_line_boundary() {
    assert_css_resumption(LESS_SAMPLE, true, false);
}

#[test]
fn tcl_resumes_at_every_line_boundary() {
    assert_tcl_resumption(TCL_SAMPLE);
}

#[test]
fn css_resumes_at_arbitrary_positions() {
    let full = css_doc(CSS_SAMPLE, false, false);
    let lists = defaults::css_word_lists();
    for split in [3, 17, CSS_SAMPLE.len() / 2, CSS_SAMPLE.len() - 4] {
        let mut doc = new_css_doc(CSS_SAMPLE, false, false);
        css::colorize(0, split, 0, &lists, &mut doc);
        css::fold(0, split, 0, &lists, &mut doc);
        let init = doc.style_at(split - 1);
        css::colorize(split, CSS_SAMPLE.len() - split, init, &lists, &mut doc);
        // Folding is a whole-range second pass for the host too.
        css::fold(0, CSS_SAMPLE.len(), 0, &lists, &mut doc);
        assert_eq!(metadata(&doc), metadata(&full), "split at {split}");
    }
}

// ── Style totality ───────────────────────────────────────────────

#[test]
fn css_every_byte_gets_a_style() {
    let mut doc = new_css_doc(CSS_SAMPLE, false, false);
    doc.fill_styles(SENTINEL);
    css::colorize(0, CSS_SAMPLE.len(), 0, &defaults::css_word_lists(), &mut doc);
    assert!(doc.styles().iter().all(|&s| s != SENTINEL));
}

#[test]
fn tcl_every_byte_gets_a_style() {
    let mut doc = Document::new(TCL_SAMPLE);
    doc.fill_styles(SENTINEL);
    tcl::colorize(0, TCL_SAMPLE.len(), 0, &defaults::tcl_keywords(), &mut doc);
    assert!(doc.styles().iter().all(|&s| s != SENTINEL));
}

// ── Fold invariants ──────────────────────────────────────────────

#[test]
fn fold_levels_never_drop_below_base() {
    let src = "}}\np { color: red; }\n}\n";
    let doc = css_doc(src, false, false);
    for line in 0..doc.line_count() {
        assert!(fold::number(doc.fold_level(line)) >= fold::BASE, "line {line}");
    }

    let src = "]]}\nproc p {} {\nputs x\n}\n";
    let doc = tcl_doc(src);
    for line in 0..doc.line_count() {
        assert!(fold::number(doc.fold_level(line)) >= fold::BASE, "line {line}");
    }
}

#[test]
fn balanced_css_returns_to_base_level() {
    let doc = css_doc(CSS_SAMPLE, false, false);
    let last = doc.line_count() - 1;
    assert_eq!(fold::number(doc.fold_level(last)), fold::BASE);
}

#[test]
fn blank_line_gets_white_flag_in_compact_mode() {
    let src = "p {\n\n}\n";
    let doc = css_doc(src, false, false);
    assert!(doc.fold_level(1) & fold::WHITE_FLAG != 0);
    assert!(doc.fold_level(0) & fold::HEADER_FLAG != 0);

    let mut doc = new_css_doc(src, false, false);
    doc.set_property("fold.compact", 0);
    let lists = defaults::css_word_lists();
    css::colorize(0, src.len(), 0, &lists, &mut doc);
    css::fold(0, src.len(), 0, &lists, &mut doc);
    assert!(doc.fold_level(1) & fold::WHITE_FLAG == 0);
}

#[test]
fn comment_folding_is_opt_in() {
    let src = "/* a\n   b */\np { color: red; }\n";
    let doc = css_doc(src, false, false);
    assert_eq!(fold::number(doc.fold_level(1)), fold::BASE);

    let mut doc = new_css_doc(src, false, false);
    doc.set_property("fold.comment", 1);
    let lists = defaults::css_word_lists();
    css::colorize(0, src.len(), 0, &lists, &mut doc);
    css::fold(0, src.len(), 0, &lists, &mut doc);
    assert!(doc.fold_level(0) & fold::HEADER_FLAG != 0);
    assert_eq!(fold::number(doc.fold_level(1)), fold::BASE + 1);
}

#[test]
fn tcl_fold_at_else_reports_line_minimum() {
    let src = "if {$x} {\nputs a\n} else {\nputs b\n}\n";
    let doc = tcl_doc(src);
    // fold.at.else defaults on: the `} else {` line folds at the outer level
    // and becomes a header.
    assert_eq!(fold::number(doc.fold_level(2)), fold::BASE);
    assert!(doc.fold_level(2) & fold::HEADER_FLAG != 0);

    let mut doc = Document::new(src);
    doc.set_property("fold.at.else", 0);
    tcl::colorize(0, src.len(), 0, &defaults::tcl_keywords(), &mut doc);
    assert_eq!(fold::number(doc.fold_level(2)), fold::BASE + 1);
    assert!(doc.fold_level(2) & fold::HEADER_FLAG == 0);
}

// ── Mode-stack soundness ─────────────────────────────────────────

#[test]
fn tcl_deep_nesting_stays_sound() {
    let mut src = String::new();
    for _ in 0..20 {
        src.push_str("{ ");
    }
    src.push('x');
    for _ in 0..20 {
        src.push_str(" }");
    }
    src.push('\n');
    let doc = tcl_doc(&src);
    // Every push was matched by a pop; over-deep slots shift out instead of
    // corrupting neighbors, and the final stack is empty.
    assert_eq!(doc.line_state(0), 0);
}

#[test]
fn tcl_pops_on_empty_stack_are_noops() {
    let doc = tcl_doc("]]]}}}\nset x 1\n");
    assert_eq!(doc.line_state(0), 0);
    assert_eq!(doc.line_state(1), 0);
}

// ── Scenarios ────────────────────────────────────────────────────

#[test]
fn s1_plain_declaration_with_important() {
    use css::Style::*;
    let doc = css_doc("p { color: red !important; }", false, false);
    assert_eq!(
        css_runs(&doc),
        vec![
            ("p".into(), Tag),
            (" ".into(), Default),
            ("{".into(), Operator),
            (" ".into(), Default),
            ("color".into(), Identifier),
            (":".into(), Operator),
            (" ".into(), Default),
            ("red".into(), Value),
            (" ".into(), Default),
            ("!important".into(), Important),
            (";".into(), Operator),
            (" ".into(), Default),
            ("}".into(), Operator),
        ]
    );
}

#[test]
fn s2_scss_assignment() {
    use css::Style::*;
    let doc = css_doc("$x: 1.5em;\n", false, true);
    assert_eq!(
        css_runs(&doc),
        vec![
            ("$x".into(), Identifier),
            (":".into(), Operator),
            (" ".into(), Default),
            ("1.5em".into(), Number),
            (";".into(), Operator),
            ("\n".into(), Default),
        ]
    );
    // After the assignment the next line starts back at top level.
    assert_eq!(doc.line_state(1), 0);
}

#[test]
fn s3_less_url_argument() {
    use css::Style::*;
    let doc = css_doc("a{background:url(\"x.png\")}", true, false);
    assert_eq!(
        css_runs(&doc),
        vec![
            ("a".into(), Tag),
            ("{".into(), Operator),
            ("background".into(), Identifier),
            (":".into(), Operator),
            ("url(".into(), Value),
            ("\"x.png\"".into(), DoubleString),
            (")".into(), Value),
            ("}".into(), Operator),
        ]
    );
}

#[test]
fn s4_tcl_proc_definition() {
    use tcl::Style::*;
    let doc = tcl_doc("proc foo {a b} { puts \"hi\" }\n");
    assert_eq!(
        tcl_runs(&doc),
        vec![
            ("proc".into(), Word),
            (" ".into(), Default),
            ("foo".into(), Identifier),
            (" ".into(), Default),
            ("{".into(), Operator),
            ("a".into(), Identifier),
            (" ".into(), Default),
            ("b".into(), Identifier),
            ("}".into(), Operator),
            (" ".into(), Default),
            ("{".into(), Operator),
            (" ".into(), Default),
            ("puts".into(), Word),
            (" ".into(), Default),
            ("\"hi\"".into(), String),
            (" ".into(), Default),
            ("}".into(), Operator),
            ("\n".into(), Default),
        ]
    );
    assert_eq!(doc.line_state(0), 0); // mode stack empty at end of line
}

#[test]
fn s5_quote_before_closing_brace_is_literal() {
    use tcl::Style::*;
    let doc = tcl_doc("{ foo \" } bar");
    let runs = tcl_runs(&doc);
    assert!(runs.contains(&("\"".into(), Literal)), "runs: {runs:?}");
}

#[test]
fn s6_tcl_variables() {
    use tcl::Style::*;
    let doc = tcl_doc("$a$b ${c(d)}(e)");
    assert_eq!(
        tcl_runs(&doc),
        vec![
            ("$a$b".into(), Variable),
            (" ".into(), Default),
            ("${c(d)}".into(), Variable),
            ("(".into(), Operator),
            ("e".into(), Identifier),
            (")".into(), Operator),
        ]
    );
}

// ── Boundary behavior ────────────────────────────────────────────

#[test]
fn important_survives_interleaved_comment_and_whitespace() {
    use css::Style::*;
    let doc = css_doc("p { color: red !/*x*/ important; }", false, false);
    let runs = css_runs(&doc);
    assert!(runs.contains(&("!".into(), Important)), "runs: {runs:?}");
    assert!(runs.contains(&("/*x*/".into(), Comment)), "runs: {runs:?}");
    assert!(runs.contains(&("important".into(), Important)), "runs: {runs:?}");
}

#[test]
fn important_that_never_resolves_becomes_value() {
    use css::Style::*;
    let doc = css_doc("p { color: red !urgent; }", false, false);
    let runs = css_runs(&doc);
    assert!(runs.contains(&("!urgent".into(), Value)), "runs: {runs:?}");
}

#[test]
fn scss_dollar_names_skip_classification() {
    use css::Style::*;
    // `color` is a known property name, but $color must stay an identifier.
    let doc = css_doc("$color: red;", false, true);
    assert_eq!(css_runs(&doc)[0], ("$color".into(), Identifier));
}

#[test]
fn directives_resolve_top_level_forms() {
    use css::Style::*;
    let doc = css_doc("@import \"a.css\";\np { color: red; }\n", false, false);
    let runs = css_runs(&doc);
    assert!(runs.contains(&("@".into(), Operator)), "runs: {runs:?}");
    assert!(runs.contains(&("import".into(), Directive)), "runs: {runs:?}");
    // The `;` ended the directive, so `p` lexes as a selector tag again.
    assert!(runs.contains(&("p".into(), Tag)), "runs: {runs:?}");
}

#[test]
fn numeric_units_require_a_word_boundary() {
    use css::Style::*;
    let doc = css_doc("p { margin: 10PX 5emx; }", false, false);
    let runs = css_runs(&doc);
    // Case-insensitive unit, consumed into the number.
    assert!(runs.contains(&("10PX".into(), Number)), "runs: {runs:?}");
    // `emx` is not a unit: the number ends and the rest lexes as a value.
    assert!(runs.contains(&("5".into(), Number)), "runs: {runs:?}");
    assert!(runs.contains(&("emx".into(), Value)), "runs: {runs:?}");
}

#[test]
fn less_mixin_call_restyles_class() {
    use css::Style::*;
    let doc = css_doc(".box { .round(4px); }", true, false);
    let runs = css_runs(&doc);
    assert!(runs.contains(&("round".into(), Mixin)), "runs: {runs:?}");
    assert!(runs.contains(&("box".into(), Class)), "runs: {runs:?}");
}

#[test]
fn less_parent_pseudo_reference() {
    use css::Style::*;
    let doc = css_doc(".a {\n&:hover { color: red; }\n}\n", true, false);
    let runs = css_runs(&doc);
    assert!(runs.contains(&("hover".into(), PseudoClass)), "runs: {runs:?}");
}

#[test]
fn unterminated_css_string_restyles_to_eol() {
    use css::Style::*;
    let doc = css_doc("p { content: \"abc\n}\n", false, false);
    let runs = css_runs(&doc);
    assert!(runs.contains(&("\"abc".into(), StringEol)), "runs: {runs:?}");

    // End of document inside a string restyles the same way.
    let doc = css_doc("p { content: \"xy", false, false);
    let runs = css_runs(&doc);
    assert!(runs.contains(&("\"xy".into(), StringEol)), "runs: {runs:?}");
}

#[test]
fn css_string_continues_over_escaped_newline() {
    let src = "p { content: \"ab\\\ncd\"; }\n";
    let doc = css_doc(src, false, false);
    let quote = src.find('"').unwrap();
    let d = src.find('d').unwrap();
    assert_eq!(css::Style::from(doc.styles()[quote]), css::Style::DoubleString);
    assert_eq!(css::Style::from(doc.styles()[d]), css::Style::DoubleString);
}

#[test]
fn unterminated_tcl_string_keeps_state_at_end() {
    use tcl::Style::*;
    let doc = tcl_doc("set s \"abc");
    let runs = tcl_runs(&doc);
    assert!(runs.contains(&("\"abc".into(), String)), "runs: {runs:?}");
}

#[test]
fn tcl_string_ends_early_on_unbalanced_brace() {
    use tcl::Style::*;
    // Inside a brace group the string's brace balance is tracked; an
    // unmatched close on the continuation line ends the string early and
    // reads as an operator.
    let src = "{ set x \"abc\n} done\n";
    let doc = tcl_doc(src);
    let pos = src.find('}').unwrap();
    assert_eq!(tcl::Style::from(doc.styles()[pos]), Operator);
    assert_eq!(tcl::Style::from(doc.styles()[pos - 2]), String); // "abc
    assert_eq!(tcl::Style::from(doc.styles()[pos + 2]), Identifier); // done
}

#[test]
fn tcl_io_styles_are_preserved_on_resume() {
    use tcl::Style::*;
    let src = "puts hi\nmore output\nset x 1\n";
    let mut doc = Document::new(src);
    // An external collaborator painted the second line as captured stdout.
    let io_start = doc.line_start(1);
    let io_end = doc.line_start(2);
    doc.set_style_range(io_start, io_end, Stdout as u8);
    tcl::colorize(io_start, src.len() - io_start, Stdout as u8, &defaults::tcl_keywords(), &mut doc);
    // The IO run survives untouched; lexing picks up after it.
    assert!(doc.styles()[io_start..io_end].iter().all(|&s| s == Stdout as u8));
    assert_eq!(tcl::Style::from(doc.styles()[io_end]), Word); // set
}
