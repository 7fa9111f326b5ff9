//! Styling: map lexer style tags to output render classes and ANSI codes.
//!
//! The lexers emit fine-grained style tags; rendering flattens them into a
//! smaller set of semantic classes so one palette covers both languages.

use crate::{css, tcl};

/// Semantic render class for a run of source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Default,
    Keyword,
    Identifier,
    Selector,
    Property,
    UnknownProperty,
    Value,
    String,
    Number,
    Comment,
    Operator,
    Directive,
    Important,
    Variable,
    Error,
}

/// Something that can wrap a render class in a prefix/suffix (e.g. ANSI).
pub trait Theme {
    /// Prefix to emit before a run with this class (e.g. ANSI color).
    fn prefix(&self, class: Class) -> &str;
    /// Suffix to emit after the run (e.g. reset).
    fn suffix(&self, class: Class) -> &str;
}

/// Render class for a CSS style byte.
#[must_use]
pub fn css_class(style: css::Style) -> Class {
    use css::Style;
    match style {
        Style::Default => Class::Default,
        Style::Tag
        | Style::Class
        | Style::Id
        | Style::Attribute
        | Style::Mixin
        | Style::PseudoClass
        | Style::PseudoElement
        | Style::ExtendedPseudoClass
        | Style::ExtendedPseudoElement => Class::Selector,
        Style::UnknownPseudoClass | Style::UnknownIdentifier => Class::UnknownProperty,
        Style::Identifier
        | Style::Identifier2
        | Style::Identifier3
        | Style::ExtendedIdentifier => Class::Property,
        Style::Value => Class::Value,
        Style::DoubleString | Style::SingleString => Class::String,
        Style::StringEol => Class::Error,
        Style::Number => Class::Number,
        Style::Comment => Class::Comment,
        Style::Operator => Class::Operator,
        Style::Directive => Class::Directive,
        Style::Important => Class::Important,
    }
}

/// Render class for a Tcl style byte.
#[must_use]
pub fn tcl_class(style: tcl::Style) -> Class {
    use tcl::Style;
    match style {
        Style::Default | Style::Stdin | Style::Stdout | Style::Stderr => Class::Default,
        Style::Number => Class::Number,
        Style::Word => Class::Keyword,
        Style::Comment => Class::Comment,
        Style::String | Style::Character | Style::Literal => Class::String,
        Style::Operator => Class::Operator,
        Style::Identifier => Class::Identifier,
        Style::Eol => Class::Error,
        Style::Variable | Style::Array => Class::Variable,
    }
}

/// Default ANSI theme for terminal output.
#[derive(Debug)]
pub struct AnsiTheme {
    reset: String,
    keyword: String,
    identifier: String,
    selector: String,
    property: String,
    unknown_property: String,
    value: String,
    string: String,
    number: String,
    comment: String,
    operator: String,
    directive: String,
    important: String,
    variable: String,
    error: String,
}

impl AnsiTheme {
    /// Richer colors (One Dark / Dracula-inspired) for dark backgrounds.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            reset: "\x1b[0m".into(),
            keyword: "\x1b[38;5;208m".into(), // orange (proc, if, set)
            identifier: "\x1b[38;5;223m".into(), // light sand
            selector: "\x1b[38;5;117m".into(), // light blue (tags, .class, #id)
            property: "\x1b[38;5;150m".into(), // soft green
            unknown_property: "\x1b[38;5;167m".into(), // muted red
            value: "\x1b[38;5;223m".into(),   // light sand
            string: "\x1b[38;5;113m".into(),  // green
            number: "\x1b[38;5;179m".into(),  // gold/amber
            comment: "\x1b[38;5;246m".into(), // gray
            operator: "\x1b[38;5;81m".into(), // cyan
            directive: "\x1b[38;5;170m".into(), // purple/magenta (@media)
            important: "\x1b[1;38;5;203m".into(), // bold red (!important)
            variable: "\x1b[1;38;5;221m".into(), // bold yellow ($var)
            error: "\x1b[41;38;5;231m".into(), // white on red
        }
    }

    /// No ANSI codes (plain text).
    #[must_use]
    pub fn none() -> Self {
        Self {
            reset: String::new(),
            keyword: String::new(),
            identifier: String::new(),
            selector: String::new(),
            property: String::new(),
            unknown_property: String::new(),
            value: String::new(),
            string: String::new(),
            number: String::new(),
            comment: String::new(),
            operator: String::new(),
            directive: String::new(),
            important: String::new(),
            variable: String::new(),
            error: String::new(),
        }
    }

    fn code(&self, class: Class) -> &str {
        match class {
            Class::Default => "",
            Class::Keyword => self.keyword.as_str(),
            Class::Identifier => self.identifier.as_str(),
            Class::Selector => self.selector.as_str(),
            Class::Property => self.property.as_str(),
            Class::UnknownProperty => self.unknown_property.as_str(),
            Class::Value => self.value.as_str(),
            Class::String => self.string.as_str(),
            Class::Number => self.number.as_str(),
            Class::Comment => self.comment.as_str(),
            Class::Operator => self.operator.as_str(),
            Class::Directive => self.directive.as_str(),
            Class::Important => self.important.as_str(),
            Class::Variable => self.variable.as_str(),
            Class::Error => self.error.as_str(),
        }
    }
}

impl Theme for AnsiTheme {
    fn prefix(&self, class: Class) -> &str {
        self.code(class)
    }

    fn suffix(&self, class: Class) -> &str {
        if self.code(class).is_empty() {
            ""
        } else {
            self.reset.as_str()
        }
    }
}
