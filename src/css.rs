//! Colorizer for Cascading Style Sheets, covering the Less and SCSS dialects.
//!
//! The machine runs one state per style tag plus a coarse *main sub-state*
//! that decides how ambiguous tokens classify: an identifier at top level is
//! a selector tag, the same identifier after `{` is a property name, and
//! under Less/SCSS nesting it can be either until a `{` or `:` resolves it.
//! The main sub-state is the per-line saved state, which is what makes a
//! pass resumable: [`colorize`] rewinds to the nearest line that starts at
//! top level *and* at base fold depth, and re-lexes from there.
//!
//! Folding is a separate pass over the styled bytes ([`fold`]).

use crate::context::StyleContext;
use crate::document::Accessor;
use crate::fold;
use crate::wordlist::{WordList, copy_word_lowered};

/// Style tags. Discriminants are the persisted byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Style {
    Default = 0,
    Tag = 1,
    Class = 2,
    PseudoClass = 3,
    UnknownPseudoClass = 4,
    Operator = 5,
    Identifier = 6,
    UnknownIdentifier = 7,
    Value = 8,
    Comment = 9,
    Id = 10,
    Important = 11,
    Directive = 12,
    DoubleString = 13,
    SingleString = 14,
    Identifier2 = 15,
    Attribute = 16,
    Identifier3 = 17,
    PseudoElement = 18,
    ExtendedIdentifier = 19,
    ExtendedPseudoClass = 20,
    ExtendedPseudoElement = 21,
    Mixin = 22,
    StringEol = 23,
    Number = 24,
}

impl From<u8> for Style {
    fn from(v: u8) -> Self {
        match v {
            1 => Style::Tag,
            2 => Style::Class,
            3 => Style::PseudoClass,
            4 => Style::UnknownPseudoClass,
            5 => Style::Operator,
            6 => Style::Identifier,
            7 => Style::UnknownIdentifier,
            8 => Style::Value,
            9 => Style::Comment,
            10 => Style::Id,
            11 => Style::Important,
            12 => Style::Directive,
            13 => Style::DoubleString,
            14 => Style::SingleString,
            15 => Style::Identifier2,
            16 => Style::Attribute,
            17 => Style::Identifier3,
            18 => Style::PseudoElement,
            19 => Style::ExtendedIdentifier,
            20 => Style::ExtendedPseudoClass,
            21 => Style::ExtendedPseudoElement,
            22 => Style::Mixin,
            23 => Style::StringEol,
            24 => Style::Number,
            _ => Style::Default,
        }
    }
}

/// Word-list slots, in the order the host supplies them.
pub const CSS1_PROPERTIES: usize = 0;
pub const PSEUDO_CLASSES: usize = 1;
pub const CSS2_PROPERTIES: usize = 2;
pub const CSS3_PROPERTIES: usize = 3;
pub const PSEUDO_ELEMENTS: usize = 4;
pub const EXTENDED_PROPERTIES: usize = 5;
pub const EXTENDED_PSEUDO_CLASSES: usize = 6;
pub const EXTENDED_PSEUDO_ELEMENTS: usize = 7;

pub const WORD_LIST_DESCRIPTIONS: [&str; 8] = [
    "CSS1 Properties",
    "Pseudo-classes",
    "CSS2 Properties",
    "CSS3 Properties",
    "Pseudo-elements",
    "Browser-Specific CSS Properties",
    "Browser-Specific Pseudo-classes",
    "Browser-Specific Pseudo-elements",
];

/// Coarse context, persisted per line. Values 0..=7 are the saved form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
enum MainState {
    TopLevel = 0,
    InSelector = 1,
    InDeclarationName = 2,
    InPropertyValue = 3,
    /// Less/SCSS nesting: the next identifier may be a selector or a
    /// property name; resolved by the first `{` or `:` to the right.
    Ambiguous = 4,
    ScssAssignment = 5,
    InMediaTopLevel = 6,
    InFontFace = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportantPhase {
    AfterBang,
    InComment,
    InWhitespace,
    InWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringKind {
    Plain,
    /// Inside a Less `~"..."` escape; the closing quote is an operator.
    LessCssEscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentKind {
    Block,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentifierKind {
    Plain,
    /// `$name` under SCSS: always an identifier, never classified.
    ScssDollar,
}

/// Dialect switchboard, read once per pass from the host properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dialect {
    pub less: bool,
    pub scss: bool,
}

impl Dialect {
    pub fn from_properties<A: Accessor>(styler: &A) -> Self {
        Self {
            less: styler.property_int("lexer.css.less.language", 0) != 0,
            scss: styler.property_int("lexer.css.scss.language", 0) != 0,
        }
    }

    /// `//` comments are a Less/SCSS extension.
    fn line_comments(self) -> bool {
        self.less || self.scss
    }

    /// `{` leaves selector context ambiguous instead of entering a
    /// declaration name.
    fn nested_rules(self) -> bool {
        self.less || self.scss
    }

    fn scss_dollar_vars(self) -> bool {
        self.scss
    }

    fn less_css_escape(self) -> bool {
        self.less
    }

    fn less_backtick(self) -> bool {
        self.less
    }

    /// `&` and `^` are operators only under the extended dialects.
    fn extended_operators(self) -> bool {
        self.less || self.scss
    }
}

const IDENT_BUF: usize = 100;
const VALUE_BUF: usize = 12;

/// Word characters per the CSS grammar; bytes >= 0x80 are UTF-8 tails and
/// stay inside tokens.
fn is_word_char(b: u8) -> bool {
    b >= 0x80 || b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_safe_alpha(b: u8) -> bool {
    b >= 0x80 || b.is_ascii_alphabetic() || b == b'_'
}

fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c')
}

/// Resolve a finished property-name run against the property lists. Hits
/// restyle to the matching identifier tier; misses take `default_style` when
/// `style_the_default` is set and otherwise keep their current style.
fn classify_property<A: Accessor>(
    sc: &mut StyleContext<'_, A>,
    lists: &[WordList; 8],
    style_the_default: bool,
    default_style: Style,
) {
    let mut buf = [0u8; IDENT_BUF];
    let word = copy_word_lowered(sc.styler(), sc.seg_start(), sc.pos(), is_word_char, &mut buf);
    if lists[CSS1_PROPERTIES].contains(word) {
        sc.change_state(Style::Identifier as u8);
    } else if lists[CSS2_PROPERTIES].contains(word) {
        sc.change_state(Style::Identifier2 as u8);
    } else if lists[CSS3_PROPERTIES].contains(word) {
        sc.change_state(Style::Identifier3 as u8);
    } else if lists[EXTENDED_PROPERTIES].contains(word) {
        sc.change_state(Style::ExtendedIdentifier as u8);
    } else if style_the_default {
        sc.change_state(default_style as u8);
    }
    sc.set_state(Style::Default as u8);
}

fn classify_pseudo<A: Accessor>(sc: &mut StyleContext<'_, A>, lists: &[WordList; 8]) {
    let mut buf = [0u8; IDENT_BUF];
    let word = copy_word_lowered(sc.styler(), sc.seg_start(), sc.pos(), is_word_char, &mut buf);
    let resolved = if lists[PSEUDO_CLASSES].contains(word) {
        Style::PseudoClass
    } else if lists[PSEUDO_ELEMENTS].contains(word) {
        Style::PseudoElement
    } else if lists[EXTENDED_PSEUDO_CLASSES].contains(word) {
        Style::ExtendedPseudoClass
    } else if lists[EXTENDED_PSEUDO_ELEMENTS].contains(word) {
        Style::ExtendedPseudoElement
    } else {
        Style::UnknownPseudoClass
    };
    sc.change_state(resolved as u8);
    sc.set_state(Style::Default as u8);
}

/// Scan right from `pos`: true if a byte from `pos_set` shows up before any
/// byte from `neg_set` (or before `end`).
fn followed_by_chars<A: Accessor>(
    sc: &StyleContext<'_, A>,
    mut pos: usize,
    end: usize,
    pos_set: &[u8],
    neg_set: &[u8],
) -> bool {
    while pos < end {
        let c = sc.byte_at(pos);
        if pos_set.contains(&c) {
            return true;
        }
        if neg_set.contains(&c) {
            return false;
        }
        pos += 1;
    }
    false
}

/// True when the byte before a `-` (skipping spaces and tabs leftward) is an
/// argument opener, so `-3` in `.mixin(-3)` reads as a number.
fn starts_arg<A: Accessor>(sc: &StyleContext<'_, A>, mut pos: usize) -> bool {
    while pos > 0 && is_space_or_tab(sc.byte_at(pos)) {
        pos -= 1;
    }
    matches!(sc.byte_at(pos), b'(' | b',')
}

const URL_LIKE_WORDS: [&[u8]; 4] = [b"url", b"url-prefix", b"domain", b"regexp"];

/// Color `[start, start + length)`, rewound left to a safe restart line.
/// Writes styles, per-line saved states, and (through [`fold`], which the
/// host runs afterwards) leaves the style runs folding keys off of.
pub fn colorize<A: Accessor>(
    start: usize,
    length: usize,
    init_style: u8,
    word_lists: &[WordList; 8],
    styler: &mut A,
) {
    let dialect = Dialect::from_properties(styler);

    let mut main = MainState::TopLevel;
    let mut nested_declaration_count: u32 = 0;
    let mut important_phase = ImportantPhase::AfterBang;
    let mut string_kind = StringKind::Plain;
    let mut comment_kind = CommentKind::Block;
    let mut identifier_kind = IdentifierKind::Plain;
    let mut in_top_level_directive = false;
    let mut in_url_string = false;
    let mut init_style = init_style;

    // Rewind to the nearest preceding line that both starts at top level and
    // sits at base fold depth; a top-level saved state inside an unclosed
    // brace is not a safe restart.
    let orig_start = start;
    let mut line_current = styler.line_of(orig_start);
    while line_current > 0
        && (styler.line_state(line_current) != MainState::TopLevel as u32
            || fold::above_base(styler.fold_level(line_current)))
    {
        line_current -= 1;
    }
    let start = styler.line_start(line_current);
    if start < orig_start {
        init_style = Style::Default as u8;
    }
    // A restart line may begin inside a block comment; arm the comment
    // sub-state so the interior continues instead of restyling as operators.
    if line_current >= 1 && styler.style_at(start) == Style::Comment as u8 {
        if styler.style_at(start - 1) == Style::Comment as u8 {
            comment_kind = CommentKind::Block;
            init_style = Style::Comment as u8;
        } else {
            init_style = Style::Default as u8;
        }
    }

    let final_length = length + orig_start - start;
    let mut sc = StyleContext::new(styler, start, final_length, init_style);

    while sc.more() {
        let ch = sc.ch;
        match Style::from(sc.state()) {
            Style::Identifier => {
                if !is_word_char(ch) {
                    if identifier_kind == IdentifierKind::ScssDollar {
                        identifier_kind = IdentifierKind::Plain;
                        sc.set_state(Style::Default as u8);
                    } else {
                        classify_property(&mut sc, word_lists, true, Style::UnknownIdentifier);
                    }
                }
            }

            Style::PseudoClass => {
                if !is_word_char(ch) {
                    classify_pseudo(&mut sc, word_lists);
                }
            }

            Style::Value => {
                if !is_word_char(ch) {
                    let mut buf = [0u8; VALUE_BUF];
                    let word = sc.current_lowered(&mut buf);
                    let url_like = URL_LIKE_WORDS.iter().any(|w| {
                        (word == *w && ch == b'(')
                            || (word.starts_with(w) && word.get(w.len()) == Some(&b'('))
                    });
                    if url_like {
                        if ch == b'(' {
                            if sc.ch_next == b'"' {
                                in_url_string = true;
                                sc.forward_set_state(Style::DoubleString as u8);
                            } else if sc.ch_next == b'\'' {
                                in_url_string = true;
                                sc.forward_set_state(Style::SingleString as u8);
                            }
                        } else if is_blank(ch) || ch == b')' {
                            // The argument run ends; keep the closing paren
                            // on the value style to match the opening one.
                            if ch == b')' {
                                sc.forward();
                            }
                            sc.set_state(Style::Default as u8);
                        }
                    } else {
                        sc.set_state(Style::Default as u8);
                    }
                }
            }

            Style::Tag => {
                if !is_word_char(ch) {
                    if main == MainState::Ambiguous {
                        // `{` to the right keeps this a selector tag; `:`
                        // (or the end of the range) makes it a property name.
                        let mut follow = b' ';
                        let mut i = sc.pos();
                        while i < sc.end() {
                            let c = sc.byte_at(i);
                            if c == b':' || c == b'{' {
                                follow = c;
                                break;
                            }
                            i += 1;
                        }
                        if follow == b'{' {
                            sc.set_state(Style::Default as u8);
                        } else {
                            classify_property(&mut sc, word_lists, false, Style::UnknownIdentifier);
                        }
                    } else {
                        sc.set_state(Style::Default as u8);
                    }
                }
            }

            Style::Directive => {
                if !is_word_char(ch) {
                    let mut buf = [0u8; IDENT_BUF];
                    let word = copy_word_lowered(
                        sc.styler(),
                        sc.seg_start(),
                        sc.pos(),
                        is_word_char,
                        &mut buf,
                    );
                    match word {
                        b"import" | b"charset" | b"namespace" => {
                            in_top_level_directive = true;
                            main = MainState::InPropertyValue;
                        }
                        b"media" | b"-moz-document" => main = MainState::InMediaTopLevel,
                        b"font-face" => main = MainState::InFontFace,
                        _ => {}
                    }
                    sc.set_state(Style::Default as u8);
                }
            }

            Style::Class => {
                if !is_word_char(ch) {
                    if dialect.less {
                        // `.name` followed (over blanks) by `(`, `;` or `}`
                        // is a mixin call rather than a class selector.
                        let mut i = sc.pos();
                        while i < sc.end() {
                            let c = sc.byte_at(i);
                            if matches!(c, b'(' | b';' | b'}') {
                                sc.change_state(Style::Mixin as u8);
                                break;
                            }
                            if !is_blank(c) {
                                break;
                            }
                            i += 1;
                        }
                    }
                    sc.set_state(Style::Default as u8);
                }
            }

            Style::Id | Style::Attribute | Style::PseudoElement => {
                if !is_word_char(ch) {
                    sc.set_state(Style::Default as u8);
                }
            }

            Style::Important => {
                if is_word_char(ch) {
                    if important_phase != ImportantPhase::InComment {
                        if important_phase == ImportantPhase::InWhitespace {
                            sc.change_state(Style::Default as u8);
                            sc.set_state(Style::Important as u8);
                        }
                        important_phase = ImportantPhase::InWord;
                    }
                } else if important_phase == ImportantPhase::InWord {
                    let mut buf = [0u8; IDENT_BUF];
                    let word = copy_word_lowered(
                        sc.styler(),
                        sc.seg_start(),
                        sc.pos(),
                        is_word_char,
                        &mut buf,
                    );
                    if word == b"important" {
                        main = MainState::InPropertyValue;
                    } else {
                        sc.change_state(Style::Value as u8);
                    }
                    sc.set_state(Style::Default as u8);
                } else if is_blank(ch) {
                    if important_phase == ImportantPhase::AfterBang {
                        sc.set_state(Style::Important as u8);
                    }
                    important_phase = ImportantPhase::InWhitespace;
                } else if sc.match_two(b'/', b'*') {
                    if important_phase == ImportantPhase::AfterBang {
                        sc.set_state(Style::Important as u8);
                        important_phase = ImportantPhase::InComment;
                    } else if important_phase == ImportantPhase::InWhitespace {
                        sc.change_state(Style::Default as u8);
                        sc.set_state(Style::Important as u8);
                        important_phase = ImportantPhase::InComment;
                    }
                    sc.forward();
                } else if important_phase == ImportantPhase::InComment && sc.match_two(b'*', b'/') {
                    sc.forward();
                    sc.forward();
                    sc.change_state(Style::Comment as u8);
                    sc.set_state(Style::Important as u8);
                    // The loop advances once more; stay on this byte.
                    sc.retreat();
                    important_phase = ImportantPhase::AfterBang;
                } else if important_phase == ImportantPhase::AfterBang {
                    // Not whitespace, a comment, or a word: give up.
                    sc.set_state(Style::Default as u8);
                }
            }

            Style::DoubleString | Style::SingleString => {
                if ch == b'\\' {
                    // Backslash-newline continues the string on the next
                    // physical line; the saved state carries over.
                    if sc.ch_next == b'\r' && sc.byte_at(sc.pos() + 2) == b'\n' {
                        sc.forward();
                    }
                    if sc.ch_next == b'\n' {
                        line_current += 1;
                        sc.set_line_state(line_current, main as u32);
                    }
                    sc.forward();
                } else if matches!(ch, b'\n' | b'\r' | b'\x0c') {
                    in_url_string = false;
                    sc.change_state(Style::StringEol as u8);
                    sc.set_state(Style::Default as u8);
                } else {
                    let quote = if sc.state() == Style::DoubleString as u8 {
                        b'"'
                    } else {
                        b'\''
                    };
                    if ch == quote {
                        sc.forward();
                        if in_url_string {
                            // Close of a url("...") argument: return to value
                            // so the `)` pairs with the `(`.
                            in_url_string = false;
                            sc.set_state(Style::Value as u8);
                        } else {
                            sc.set_state(Style::Default as u8);
                        }
                    }
                }
            }

            Style::Number => {
                if !ch.is_ascii_digit() && ch != b'.' {
                    if sc.match_ignore_case("grad") && !is_word_char(sc.byte_at(sc.pos() + 4)) {
                        sc.forward();
                        sc.forward();
                        sc.forward();
                        sc.forward_set_state(Style::Default as u8);
                    } else if (sc.match_ignore_case("deg")
                        || sc.match_ignore_case("rad")
                        || sc.match_ignore_case("khz"))
                        && !is_word_char(sc.byte_at(sc.pos() + 3))
                    {
                        sc.forward();
                        sc.forward();
                        sc.forward_set_state(Style::Default as u8);
                    } else if (sc.match_ignore_case("em")
                        || sc.match_ignore_case("ex")
                        || sc.match_ignore_case("px")
                        || sc.match_ignore_case("cm")
                        || sc.match_ignore_case("mm")
                        || sc.match_ignore_case("in")
                        || sc.match_ignore_case("pt")
                        || sc.match_ignore_case("pc")
                        || sc.match_ignore_case("ms")
                        || sc.match_ignore_case("ss")
                        || sc.match_ignore_case("hz"))
                        && !is_word_char(sc.byte_at(sc.pos() + 2))
                    {
                        sc.forward();
                        sc.forward_set_state(Style::Default as u8);
                    } else if (ch == b'%' || ch == b's' || ch == b'S') && !is_word_char(sc.ch_next)
                    {
                        sc.forward_set_state(Style::Default as u8);
                    } else {
                        sc.set_state(Style::Default as u8);
                    }
                }
            }

            Style::Operator => sc.set_state(Style::Default as u8),

            Style::Comment => {
                if comment_kind == CommentKind::Block && sc.match_two(b'*', b'/') {
                    sc.forward();
                    sc.forward_set_state(Style::Default as u8);
                } else if comment_kind == CommentKind::Line && (ch == b'\n' || ch == b'\r') {
                    sc.set_state(Style::Default as u8);
                } else if ch == b'\n' {
                    line_current += 1;
                    sc.set_line_state(line_current, main as u32);
                }
            }

            _ => {}
        }

        if sc.state() == Style::Default as u8 {
            // A handler above may have consumed bytes, so the blank check
            // reads the cursor, not the byte this iteration started on:
            // a newline right after `*/` or a numeric unit still counts.
            if is_blank(sc.ch) {
                if sc.ch == b'\n' {
                    line_current += 1;
                    sc.set_line_state(line_current, main as u32);
                }
                sc.forward();
                continue;
            }
            match sc.ch {
                b'!' => {
                    if main == MainState::InPropertyValue {
                        sc.set_state(Style::Important as u8);
                        important_phase = ImportantPhase::AfterBang;
                    } else {
                        sc.set_state(Style::Operator as u8);
                    }
                }

                b'"' => {
                    if dialect.less_css_escape() && string_kind == StringKind::LessCssEscape {
                        // Closing quote of a ~"..." escape.
                        sc.set_state(Style::Operator as u8);
                        string_kind = StringKind::Plain;
                    } else {
                        sc.set_state(Style::DoubleString as u8);
                    }
                }

                b'\'' => sc.set_state(Style::SingleString as u8),

                b'#' => {
                    if main == MainState::InPropertyValue || main == MainState::ScssAssignment {
                        // Color hash.
                        sc.set_state(Style::Value as u8);
                    } else {
                        main = MainState::InSelector;
                        sc.set_state(Style::Operator as u8);
                        if is_word_char(sc.ch_next) {
                            sc.forward_set_state(Style::Id as u8);
                        }
                    }
                }

                b'$' => {
                    if dialect.scss_dollar_vars() {
                        identifier_kind = IdentifierKind::ScssDollar;
                        if main == MainState::TopLevel {
                            main = MainState::ScssAssignment;
                        }
                        sc.set_state(Style::Identifier as u8);
                    }
                }

                b'.' => {
                    if matches!(
                        main,
                        MainState::InPropertyValue
                            | MainState::ScssAssignment
                            | MainState::InMediaTopLevel
                    ) && sc.ch_next.is_ascii_digit()
                    {
                        sc.set_state(Style::Number as u8);
                    } else {
                        sc.set_state(Style::Operator as u8);
                        if matches!(
                            main,
                            MainState::TopLevel | MainState::InSelector | MainState::Ambiguous
                        ) && is_word_char(sc.ch_next)
                        {
                            sc.forward_set_state(Style::Class as u8);
                            main = MainState::InSelector;
                        }
                    }
                }

                b'&' | b'^' => {
                    let mut handled = false;
                    if sc.ch == b'&'
                        && dialect.extended_operators()
                        && sc.ch_next == b':'
                        && main == MainState::Ambiguous
                    {
                        // Parent reference followed by a pseudo: `&:hover`.
                        let next2 = sc.byte_at(sc.pos() + 2);
                        if next2 == b':' || is_word_char(next2) {
                            sc.set_state(Style::Operator as u8);
                            sc.forward();
                            if next2 == b':' {
                                sc.forward_set_state(Style::PseudoElement as u8);
                            } else {
                                sc.forward_set_state(Style::PseudoClass as u8);
                            }
                            main = MainState::InSelector;
                            handled = true;
                        }
                    }
                    if !handled && dialect.extended_operators() {
                        sc.set_state(Style::Operator as u8);
                    }
                }

                b'|' | b'%' | b'*' | b'+' | b',' | b'<' | b'=' | b'>' | b'?' | b']' | b'(' => {
                    sc.set_state(Style::Operator as u8);
                }

                b'/' => {
                    if sc.ch_next == b'*' {
                        comment_kind = CommentKind::Block;
                        sc.set_state(Style::Comment as u8);
                        sc.forward();
                    } else if dialect.line_comments() && sc.ch_next == b'/' {
                        comment_kind = CommentKind::Line;
                        sc.set_state(Style::Comment as u8);
                    } else {
                        sc.set_state(Style::Operator as u8);
                    }
                }

                b'{' => {
                    match main {
                        MainState::Ambiguous => {
                            // Still ambiguous, one level deeper.
                        }
                        MainState::TopLevel | MainState::InSelector => {
                            main = if dialect.nested_rules() {
                                MainState::Ambiguous
                            } else {
                                MainState::InDeclarationName
                            };
                            nested_declaration_count += 1;
                        }
                        MainState::InFontFace => {
                            nested_declaration_count += 1;
                            main = MainState::InDeclarationName;
                        }
                        MainState::InPropertyValue => {
                            // @page blocks, and SCSS nested property names
                            // with a common parent (`font: { family: ... }`).
                            nested_declaration_count += 1;
                            main = if dialect.scss {
                                MainState::InDeclarationName
                            } else {
                                MainState::InSelector
                            };
                        }
                        MainState::InMediaTopLevel => main = MainState::InSelector,
                        _ => {}
                    }
                    sc.set_state(Style::Operator as u8);
                }

                b':' => {
                    if (is_word_char(sc.ch_next) || sc.ch_next == b':')
                        && (matches!(main, MainState::TopLevel | MainState::InSelector)
                            || (main == MainState::Ambiguous
                                && followed_by_chars(&sc, sc.pos(), sc.end(), b"{", b";}")))
                    {
                        sc.set_state(Style::Operator as u8);
                        if sc.ch_next == b':' {
                            sc.forward();
                            sc.forward_set_state(Style::PseudoElement as u8);
                        } else {
                            sc.forward_set_state(Style::PseudoClass as u8);
                        }
                        main = MainState::InSelector;
                    } else {
                        if matches!(main, MainState::InDeclarationName | MainState::Ambiguous) {
                            main = MainState::InPropertyValue;
                        }
                        sc.set_state(Style::Operator as u8);
                    }
                }

                b';' => {
                    if dialect.scss && main == MainState::ScssAssignment {
                        main = MainState::TopLevel;
                    } else if dialect.less || dialect.scss {
                        main = MainState::Ambiguous;
                    } else if in_top_level_directive {
                        main = MainState::TopLevel;
                        in_top_level_directive = false;
                    } else {
                        main = MainState::InDeclarationName;
                    }
                    sc.set_state(Style::Operator as u8);
                }

                b'@' => {
                    sc.set_state(Style::Operator as u8);
                    if is_word_char(sc.ch_next) {
                        sc.forward_set_state(Style::Directive as u8);
                    }
                }

                b'[' => {
                    if matches!(main, MainState::InSelector | MainState::Ambiguous) {
                        sc.set_state(Style::Operator as u8);
                        if is_space_or_tab(sc.ch_next) {
                            sc.forward_set_state(Style::Default as u8);
                            while sc.more() && is_space_or_tab(sc.ch_next) {
                                sc.forward();
                            }
                        }
                        if is_safe_alpha(sc.ch_next) {
                            sc.forward_set_state(Style::Attribute as u8);
                        }
                    } else {
                        sc.set_state(Style::Operator as u8);
                    }
                }

                b'}' => {
                    nested_declaration_count = nested_declaration_count.saturating_sub(1);
                    main = MainState::TopLevel;
                    sc.set_state(Style::Operator as u8);
                }

                b'~' => {
                    sc.set_state(Style::Operator as u8);
                    if dialect.less_css_escape() && sc.ch_next == b'"' {
                        sc.forward();
                        string_kind = StringKind::LessCssEscape;
                    }
                }

                b'`' => {
                    if dialect.less_backtick() {
                        sc.set_state(Style::Operator as u8);
                    }
                }

                b'-' => {
                    if matches!(main, MainState::InPropertyValue | MainState::ScssAssignment) {
                        if sc.ch_next.is_ascii_digit() {
                            sc.set_state(Style::Number as u8);
                        } else if is_word_char(sc.ch_next) {
                            sc.set_state(Style::Value as u8);
                        } else {
                            sc.set_state(Style::Operator as u8);
                        }
                    } else if dialect.less
                        && matches!(main, MainState::InSelector | MainState::Ambiguous)
                        && starts_arg(&sc, sc.pos().saturating_sub(1))
                        && sc.ch_next.is_ascii_digit()
                    {
                        sc.set_state(Style::Number as u8);
                    } else {
                        sc.set_state(Style::Identifier as u8);
                    }
                }

                b')' => sc.set_state(Style::Operator as u8),

                _ => {
                    if sc.ch.is_ascii_digit() {
                        sc.set_state(Style::Number as u8);
                    } else if is_safe_alpha(sc.ch) {
                        match main {
                            MainState::InPropertyValue
                            | MainState::ScssAssignment
                            | MainState::InMediaTopLevel => sc.set_state(Style::Value as u8),
                            MainState::TopLevel => {
                                main = MainState::InSelector;
                                sc.set_state(Style::Tag as u8);
                            }
                            MainState::InSelector | MainState::Ambiguous => {
                                sc.set_state(Style::Tag as u8);
                            }
                            _ => sc.set_state(Style::Identifier as u8),
                        }
                    }
                }
            }
        }

        sc.forward();
    }

    if matches!(
        Style::from(sc.state()),
        Style::DoubleString | Style::SingleString
    ) {
        sc.change_state(Style::StringEol as u8);
    }
    sc.complete();
}

fn is_space_char(b: u8) -> bool {
    b == b' ' || (0x09..=0x0d).contains(&b)
}

/// Fold pass over styled bytes: `{`/`}` operators adjust the level, comment
/// runs do too when `fold.comment` is on, and each line gets its start level
/// plus header/blank flags.
pub fn fold<A: Accessor>(
    start: usize,
    length: usize,
    _init_style: u8,
    _word_lists: &[WordList; 8],
    styler: &mut A,
) {
    let fold_comment = styler.property_int("fold.comment", 0) != 0;
    let fold_compact = styler.property_int("fold.compact", 1) != 0;
    let end = start + length;
    let mut visible_chars: u32 = 0;
    let mut line_current = styler.line_of(start);
    let mut level_prev = fold::number(styler.fold_level(line_current));
    let mut level_current = level_prev;
    let mut ch_next = styler.byte_at(start);
    let mut in_comment = start > 0 && styler.style_at(start - 1) == Style::Comment as u8;

    let mut i = start;
    while i < end {
        let ch = ch_next;
        ch_next = styler.byte_at(i + 1);
        let style = styler.style_at(i);
        let at_eol = (ch == b'\r' && ch_next != b'\n') || ch == b'\n';
        if fold_comment {
            if !in_comment && style == Style::Comment as u8 {
                level_current += 1;
            } else if in_comment
                && style != Style::Comment as u8
                && fold::above_base(level_current)
            {
                level_current -= 1;
            }
            in_comment = style == Style::Comment as u8;
        }
        if style == Style::Operator as u8 {
            if ch == b'{' {
                level_current += 1;
            } else if ch == b'}' && fold::above_base(level_current) {
                level_current -= 1;
            }
        }
        if at_eol {
            let mut lev = level_prev;
            if visible_chars == 0 && fold_compact {
                lev |= fold::WHITE_FLAG;
            }
            if level_current > level_prev && visible_chars > 0 {
                lev |= fold::HEADER_FLAG;
            }
            if lev != styler.fold_level(line_current) {
                styler.set_fold_level(line_current, lev);
            }
            line_current += 1;
            level_prev = level_current;
            visible_chars = 0;
        }
        if !is_space_char(ch) {
            visible_chars += 1;
        }
        i += 1;
    }
    // The next line keeps its flags; only its start level is known here.
    let flags_next = styler.fold_level(line_current) & !fold::NUMBER_MASK;
    styler.set_fold_level(line_current, level_prev | flags_next);
}
