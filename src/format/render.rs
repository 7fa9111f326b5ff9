//! Emit a colored document: group styled bytes into runs, wrap each run in
//! the theme's prefix/suffix, re-emit the source text in between.

use super::theme::{Class, Theme};
use crate::document::Document;

/// Render `doc` with ANSI (or plain) styling. `classify` maps a raw style
/// byte to a render class; adjacent bytes with the same class merge into one
/// run so the output stays compact.
pub fn render<T: Theme>(doc: &Document, classify: fn(u8) -> Class, theme: &T) -> String {
    let text = doc.text();
    let styles = doc.styles();
    // Rough overhead per run for the ANSI codes.
    let mut out = String::with_capacity(text.len() + text.len() / 4);

    let mut pos = 0;
    while pos < text.len() {
        let class = classify(styles[pos]);
        let mut end = pos + 1;
        while end < text.len() && classify(styles[end]) == class {
            end += 1;
        }
        out.push_str(theme.prefix(class));
        out.push_str(&String::from_utf8_lossy(&text[pos..end]));
        out.push_str(theme.suffix(class));
        pos = end;
    }

    out
}
