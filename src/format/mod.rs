//! Render a colored document for a terminal.
//!
//! Themes map render classes to ANSI codes; the renderer walks the style
//! bytes written by a colorize pass, merges them into runs, and emits the
//! source with each run wrapped in its theme codes.

mod render;
mod theme;

pub use render::render;
pub use theme::{AnsiTheme, Class, Theme, css_class, tcl_class};
