//! Colorizer for Tcl.
//!
//! Tcl nesting is a stack of contexts: brace groups, `[...]` command
//! substitutions, and `"..."` strings, any of which can contain the others.
//! The stack is packed into a `u32` as 2-bit slots with the top in the low
//! bits ([`ModeStack`]), and that packed word is the per-line saved state.
//! Folding is computed inline with the coloring pass rather than as a
//! second sweep.
//!
//! The IO styles (`stdin`/`stdout`/`stderr`) are painted by an outside
//! collaborator; this lexer only steps over them on resume and never emits
//! them.

use crate::context::Painter;
use crate::document::Accessor;
use crate::fold;
use crate::wordlist::{WordList, copy_word};

/// Style tags. Discriminants are the persisted byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Style {
    Default = 0,
    Number = 1,
    Word = 2,
    Comment = 3,
    String = 4,
    Character = 5,
    Literal = 6,
    Operator = 7,
    Identifier = 8,
    Eol = 9,
    Variable = 10,
    Array = 11,
    Stdin = 12,
    Stdout = 13,
    Stderr = 14,
}

impl From<u8> for Style {
    fn from(v: u8) -> Self {
        match v {
            1 => Style::Number,
            2 => Style::Word,
            3 => Style::Comment,
            4 => Style::String,
            5 => Style::Character,
            6 => Style::Literal,
            7 => Style::Operator,
            8 => Style::Identifier,
            9 => Style::Eol,
            10 => Style::Variable,
            11 => Style::Array,
            12 => Style::Stdin,
            13 => Style::Stdout,
            14 => Style::Stderr,
            _ => Style::Default,
        }
    }
}

pub const WORD_LIST_DESCRIPTIONS: [&str; 1] = ["Tcl keywords"];

/// A nesting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Mode {
    TopLevel = 0,
    InString = 1,
    InCommand = 2,
    InBrace = 3,
}

/// Context stack packed as 2-bit slots in a `u32`, top of stack in the low
/// bits; the packed word is the persisted line state. Sixteen slots cover
/// realistic nesting; pushing past that drops the outermost context, and
/// popping an empty stack is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeStack(u32);

impl ModeStack {
    const SLOT_BITS: u32 = 2;
    const TOP_MASK: u32 = 0x3;

    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn push(&mut self, mode: Mode) {
        self.0 = (self.0 << Self::SLOT_BITS) | mode as u32;
    }

    pub fn pop(&mut self) {
        self.0 >>= Self::SLOT_BITS;
    }

    /// The top slot matches `mode`. With `Mode::TopLevel` this means the
    /// stack is effectively empty.
    #[must_use]
    pub fn top_is(self, mode: Mode) -> bool {
        self.0 & Self::TOP_MASK == mode as u32
    }

    /// The top slot matches `mode` or the stack is empty.
    #[must_use]
    pub fn top_is_or_top_level(self, mode: Mode) -> bool {
        let top = self.0 & Self::TOP_MASK;
        top == 0 || top == mode as u32
    }
}

const WORD_BUF: usize = 40;

fn is_word_char(b: u8) -> bool {
    b >= 0x80 || b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

fn is_word_start(b: u8) -> bool {
    b >= 0x80 || b.is_ascii_alphanumeric() || b == b'_'
}

/// Backslash included: escaped braces must stay visible as operators to
/// downstream consumers.
fn is_operator(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')'
            | b'{'
            | b'}'
            | b'['
            | b']'
            | b';'
            | b'!'
            | b'%'
            | b'^'
            | b'&'
            | b'*'
            | b'-'
            | b'='
            | b'+'
            | b'|'
            | b'<'
            | b'>'
            | b'?'
            | b'/'
            | b'\\'
    )
}

fn is_space_char(b: u8) -> bool {
    b == b' ' || (0x09..=0x0d).contains(&b)
}

fn is_io_style(style: u8) -> bool {
    matches!(
        Style::from(style),
        Style::Stdin | Style::Stdout | Style::Stderr
    )
}

/// Classify a finished word run and paint it: leading digit or dot makes a
/// number, keyword-list membership (case-sensitive) a word, anything else an
/// identifier.
fn classify_word<A: Accessor>(
    styler: &mut A,
    painter: &mut Painter,
    start: usize,
    end: usize,
    keywords: &WordList,
) {
    let mut buf = [0u8; WORD_BUF];
    let word = copy_word(styler, start, end, &mut buf);
    let style = if word
        .first()
        .is_some_and(|&b| b.is_ascii_digit() || b == b'.')
    {
        Style::Number
    } else if keywords.contains(word) {
        Style::Word
    } else {
        Style::Identifier
    };
    painter.colour_to(styler, end, style as u8);
}

/// In a `{ ... " ...` situation: does the rest of the line close the brace
/// before any quote or newline? If so the quote reads as a literal.
fn line_contains_closing_brace<A: Accessor>(styler: &A, mut pos: usize, end: usize) -> bool {
    let mut num_braces = 0i32;
    while pos < end {
        match styler.byte_at(pos) {
            b'\\' => pos += 1,
            b'"' | b'\n' => return false,
            b'{' => num_braces += 1,
            b'}' => {
                num_braces -= 1;
                if num_braces < 0 {
                    return true;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    false
}

/// Walking left from `pos` over default-styled bytes, is the nearest styled
/// byte a comment? Keeps the brace balance of a comment block alive across
/// consecutive comment lines.
fn continues_comment<A: Accessor>(styler: &mut A, mut pos: usize) -> bool {
    styler.flush();
    loop {
        match Style::from(styler.style_at(pos)) {
            Style::Comment => return true,
            Style::Default => {}
            _ => return false,
        }
        if pos == 0 {
            return false;
        }
        pos -= 1;
    }
}

/// Color `[start, start + length)`, rewound left per the resume policy, with
/// fold levels computed along the way.
pub fn colorize<A: Accessor>(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &WordList,
    styler: &mut A,
) {
    let mut mode_stack = ModeStack::default();
    let mut start_pos = start;
    let length_doc = start + length;

    let mut in_escape = false;
    let mut in_str_brace_cnt: i32 = 0;
    // Brace balance across a block of comment lines; resets when the block
    // does not continue an earlier one.
    let mut in_cmt_brace_cnt: i32 = 0;
    // Heuristic: the next token begins a command.
    let mut cmd_start = true;
    let mut var_braced = false;

    if is_io_style(init_style) {
        // IO runs belong to the host; step past them and keep the caller's
        // context untouched.
        while start_pos < length_doc && is_io_style(styler.style_at(start_pos)) {
            start_pos += 1;
        }
    } else {
        // Walk back past lines whose predecessor ends in a backslash
        // continuation or a comment, and past lines that end inside a
        // multi-line string; resume with the saved stack of the line before.
        let mut start_line = styler.line_of(start_pos);
        let mut resumed_at = None;
        while start_line > 0 {
            let line_pos = styler.line_start(start_line);
            let mut pos = line_pos - 1;
            let mut ch = styler.byte_at(pos);
            if pos > 0 && ch == b'\n' {
                pos -= 1;
                ch = styler.byte_at(pos);
            }
            if pos > 0 && ch == b'\r' {
                pos -= 1;
                ch = styler.byte_at(pos);
            }
            if ch == b'\\' || styler.style_at(pos) == Style::Comment as u8 {
                start_line -= 1;
                continue;
            }
            let saved = ModeStack::from_bits(styler.line_state(start_line - 1));
            if !saved.top_is(Mode::InString) {
                mode_stack = saved;
                resumed_at = Some(line_pos);
                break;
            }
            start_line -= 1;
        }
        // No safe restart line: start over from the top with a clear stack.
        start_pos = resumed_at.unwrap_or(0);
    }

    let mut state = Style::Default;
    let mut ch_prev = b' ';
    let mut ch_next = styler.byte_at(start_pos);

    let mut visible_chars: u32 = 0;
    let mut line_current = styler.line_of(start_pos);
    let mut level_prev = fold::number(styler.fold_level(line_current)) as i32;
    let mut level_min_prev = level_prev;
    let mut level_current = level_prev;
    let fold_compact = styler.property_int("fold.compact", 1) != 0;
    let fold_at_else = styler.property_int("fold.at.else", 1) != 0;

    let mut painter = Painter::new(start_pos);

    let mut i = start_pos;
    while i < length_doc {
        let mut ch = ch_next;
        ch_next = styler.byte_at(i + 1);

        if ch_prev == b'\\' {
            // Colorization always starts at a line beginning, so flipping on
            // each backslash tracks parity correctly.
            in_escape = !in_escape;
        } else if in_escape {
            if ch_prev == b'\r' && ch == b'\n' {
                // An escaped CR LF keeps the escape alive for the LF.
            } else {
                in_escape = false;
            }
        }

        if (ch == b'\r' && ch_next != b'\n') || ch == b'\n' {
            // One trigger per line ending regardless of convention.
            styler.set_line_state(line_current, mode_stack.bits());
            if state == Style::Eol {
                painter.colour_to(styler, i + 1, state as u8);
                state = Style::Default;
            }
            let level_use = if fold_at_else { level_min_prev } else { level_prev };
            let mut lev = level_use.max(fold::BASE as i32) as u32;
            if visible_chars == 0 && fold_compact {
                lev |= fold::WHITE_FLAG;
            }
            if level_current > level_use && visible_chars > 0 {
                lev |= fold::HEADER_FLAG;
            }
            if lev != styler.fold_level(line_current) {
                styler.set_fold_level(line_current, lev);
            }
            line_current += 1;
            level_min_prev = level_current;
            level_prev = level_current;
            visible_chars = 0;
            if state == Style::Default && !in_escape {
                cmd_start = true;
            }
        } else if !is_space_char(ch) {
            visible_chars += 1;
        }

        if state == Style::Default {
            if ch == b'#' && cmd_start {
                painter.colour_to(styler, i, state as u8);
                state = Style::Comment;
                if i > 0 && !continues_comment(styler, i - 1) {
                    in_cmt_brace_cnt = 0;
                }
                cmd_start = false;
            } else if ch == b'"' && !in_escape {
                if mode_stack.top_is(Mode::InBrace) {
                    if line_contains_closing_brace(styler, i + 1, length_doc) {
                        // The enclosing brace closes on this line, so the
                        // quote cannot open a string here.
                        painter.colour_to(styler, i, state as u8);
                        painter.colour_to(styler, i + 1, Style::Literal as u8);
                    } else {
                        painter.colour_to(styler, i, state as u8);
                        state = Style::String;
                        mode_stack.push(Mode::InString);
                        // Count braces in this string. The count does not
                        // survive a string broken by a command substitution.
                        in_str_brace_cnt = 0;
                    }
                } else {
                    painter.colour_to(styler, i, state as u8);
                    state = Style::String;
                    mode_stack.push(Mode::InString);
                    in_str_brace_cnt = -1;
                }
                cmd_start = false;
            } else if ch == b'$' {
                painter.colour_to(styler, i, state as u8);
                if ch_next == b'{' {
                    var_braced = true;
                    i += 1;
                    ch = ch_next;
                    ch_next = styler.byte_at(i + 1);
                    state = Style::Variable;
                } else if is_word_char(ch_next) {
                    var_braced = false;
                    state = Style::Variable;
                } else {
                    painter.colour_to(styler, i + 1, Style::Operator as u8);
                    // Stay in default mode.
                }
                cmd_start = false;
            } else if is_operator(ch) || ch == b':' {
                if ch == b'-' && ch_next.is_ascii_alphabetic() {
                    painter.colour_to(styler, i, state as u8);
                    // A switch name like -glob; the word classifier settles
                    // what it is at the boundary.
                    state = Style::Word;
                    cmd_start = false;
                } else {
                    // Single-character operator; a multi-character run gets
                    // its remaining bytes on later iterations.
                    painter.colour_to(styler, i, state as u8);
                    painter.colour_to(styler, i + 1, Style::Operator as u8);
                    if !in_escape {
                        if ch == b'{' || ch == b'[' {
                            if ch == b'{' {
                                if level_min_prev > level_current {
                                    level_min_prev = level_current;
                                }
                                mode_stack.push(Mode::InBrace);
                            } else {
                                mode_stack.push(Mode::InCommand);
                            }
                            level_current += 1;
                            cmd_start = true;
                        } else if ch == b']' || ch == b'}' {
                            if fold::number(level_current as u32) > fold::BASE {
                                level_current -= 1;
                            }
                            if ch == b']' {
                                if mode_stack.top_is(Mode::InCommand) {
                                    mode_stack.pop();
                                    if mode_stack.top_is(Mode::InString) {
                                        // The command interrupted a string;
                                        // pick the string back up.
                                        state = Style::String;
                                    }
                                }
                            } else if mode_stack.top_is(Mode::InBrace) {
                                mode_stack.pop();
                            }
                        } else if ch == b';' && mode_stack.top_is_or_top_level(Mode::InBrace) {
                            cmd_start = true;
                        }
                    }
                }
            } else if is_word_start(ch) {
                painter.colour_to(styler, i, state as u8);
                if is_word_char(ch_next) {
                    state = Style::Word;
                } else {
                    let word_start = painter.seg_start();
                    classify_word(styler, &mut painter, word_start, i + 1, keywords);
                    // Stay in the default state.
                }
                cmd_start = false;
            } else if !is_space_char(ch) {
                cmd_start = false;
            }
        } else if state == Style::Word {
            if !is_word_char(ch_next) {
                let word_start = painter.seg_start();
                classify_word(styler, &mut painter, word_start, i + 1, keywords);
                state = Style::Default;
            }
        } else if state == Style::Variable {
            // A variable is ${?\w*}? and may be directly followed by another
            // variable: $a$b, ${a(def)(def)} all one var, ${abc}(def) where
            // (def) is no longer part of the name.
            if !is_word_char(ch_next) {
                let mut var_ends_here = false;
                if var_braced {
                    if ch_next == b'}' {
                        var_braced = false;
                        painter.colour_to(styler, i + 2, state as u8);
                        state = Style::Default;
                        i += 1;
                        ch = ch_next;
                        ch_next = styler.byte_at(i + 1);
                    }
                    // else keep building the braced name
                } else if ch_next == b':' && styler.byte_at(i + 2) == b':' {
                    // Namespace separator; step over the first colon so the
                    // second doesn't end the name.
                    i += 1;
                    ch = ch_next;
                    ch_next = b':';
                } else {
                    var_ends_here = true;
                }
                if var_ends_here {
                    painter.colour_to(styler, i + 1, state as u8);
                    state = Style::Default;
                }
            }
        } else if state == Style::Comment {
            // The line continuation character also works for comments.
            if (ch == b'\r' || ch == b'\n') && !in_escape {
                painter.colour_to(styler, i, state as u8);
                state = Style::Default;
                cmd_start = true;
            } else if ch == b'{' && !in_escape {
                in_cmt_brace_cnt += 1;
            } else if ch == b'}' && !in_escape {
                in_cmt_brace_cnt -= 1;
                // One deeper than the block opened in: this brace closes the
                // enclosing group, not the comment's own nesting.
                if in_cmt_brace_cnt == -1 && mode_stack.top_is(Mode::InBrace) {
                    mode_stack.pop();
                    painter.colour_to(styler, i, state as u8);
                    painter.colour_to(styler, i + 1, Style::Operator as u8);
                    state = Style::Default;
                }
            }
        } else if state == Style::String && !in_escape {
            if ch == b'\r' || ch == b'\n' {
                // Stay in the string, but the continuation line may well
                // begin a new command; in Tcl nothing is sure until eval.
                cmd_start = true;
            } else if ch == b'"' {
                painter.colour_to(styler, i + 1, state as u8);
                mode_stack.pop();
                state = Style::Default;
            } else if ch == b'[' {
                mode_stack.push(Mode::InCommand);
                painter.colour_to(styler, i + 1, state as u8);
                state = Style::Default;
                level_current += 1;
                cmd_start = true;
            } else if ch == b'{' {
                in_str_brace_cnt += 1;
            } else if ch == b'}' {
                in_str_brace_cnt -= 1;
                if in_str_brace_cnt < 0 {
                    // Unbalanced close: the string ends at the prior byte
                    // and the brace reads as an operator.
                    painter.colour_to(styler, i, state as u8);
                    mode_stack.pop();
                    painter.colour_to(styler, i + 1, Style::Operator as u8);
                    state = Style::Default;
                    level_current -= 1;
                }
            }
        }
        ch_prev = ch;
        i += 1;
    }

    // Color the tail of the range; an open word still gets classified.
    if state == Style::Word {
        let word_start = painter.seg_start();
        classify_word(styler, &mut painter, word_start, length_doc, keywords);
    } else {
        painter.colour_to(styler, length_doc, state as u8);
    }
    let flags_next = styler.fold_level(line_current) & !fold::NUMBER_MASK;
    let level = level_prev.max(fold::BASE as i32) as u32;
    styler.set_fold_level(line_current, level | flags_next);
    styler.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn keywords() -> WordList {
        WordList::new(&["proc", "puts", "set", "if", "else", "while", "expr"])
    }

    fn colorized(text: &str) -> Document {
        let mut doc = Document::new(text);
        colorize(0, text.len(), 0, &keywords(), &mut doc);
        doc
    }

    fn style_at(doc: &Document, pos: usize) -> Style {
        Style::from(doc.styles()[pos])
    }

    #[test]
    fn mode_stack_packs_lsb_first() {
        let mut stack = ModeStack::default();
        stack.push(Mode::InBrace);
        stack.push(Mode::InCommand);
        stack.push(Mode::InString);
        assert_eq!(stack.bits(), 0b11_10_01);
        assert!(stack.top_is(Mode::InString));
        stack.pop();
        assert!(stack.top_is(Mode::InCommand));
        stack.pop();
        stack.pop();
        assert!(stack.top_is(Mode::TopLevel));
        stack.pop(); // empty pop is a no-op
        assert_eq!(stack.bits(), 0);
    }

    #[test]
    fn keywords_and_identifiers() {
        let src = "proc foo {} {}";
        let doc = colorized(src);
        assert_eq!(style_at(&doc, 0), Style::Word); // proc
        assert_eq!(style_at(&doc, 5), Style::Identifier); // foo
    }

    #[test]
    fn numbers_classify_by_leading_digit() {
        let doc = colorized("set x 1.5");
        assert_eq!(style_at(&doc, 0), Style::Word);
        assert_eq!(style_at(&doc, 4), Style::Identifier);
        assert_eq!(style_at(&doc, 6), Style::Number);
        assert_eq!(style_at(&doc, 8), Style::Number);
    }

    #[test]
    fn quote_in_closing_brace_line_is_literal() {
        // The brace closes later on the same line, so the quote cannot open
        // a string.
        let src = "{ foo \" } bar";
        let doc = colorized(src);
        assert_eq!(style_at(&doc, 6), Style::Literal);
        assert_eq!(style_at(&doc, 10), Style::Identifier); // bar
    }

    #[test]
    fn string_state_survives_newline() {
        let src = "set s \"ab\ncd\"\n";
        let mut doc = Document::new(src);
        colorize(0, src.len(), 0, &keywords(), &mut doc);
        assert_eq!(style_at(&doc, 8), Style::String);
        assert_eq!(style_at(&doc, 10), Style::String);
        // Line 0 ends inside the string: saved stack has in-string on top.
        assert!(ModeStack::from_bits(doc.line_state(0)).top_is(Mode::InString));
        assert!(ModeStack::from_bits(doc.line_state(1)).top_is(Mode::TopLevel));
    }

    #[test]
    fn command_inside_string_resumes_string() {
        let src = "set s \"a[expr 1]b\"";
        let doc = colorized(src);
        assert_eq!(style_at(&doc, 7), Style::String); // a
        assert_eq!(style_at(&doc, 8), Style::String); // [ painted with string
        assert_eq!(style_at(&doc, 9), Style::Word); // expr
        assert_eq!(style_at(&doc, 16), Style::String); // b
        assert_eq!(style_at(&doc, 17), Style::String); // closing quote
    }

    #[test]
    fn flag_words_start_at_dash() {
        let doc = colorized("lsearch -exact");
        assert_eq!(style_at(&doc, 8), Style::Identifier);
        assert_eq!(style_at(&doc, 13), Style::Identifier);
    }

    #[test]
    fn comment_only_at_command_start() {
        let doc = colorized("set x 1 ;# trailing\n");
        assert_eq!(style_at(&doc, 9), Style::Comment);
        assert_eq!(style_at(&doc, 12), Style::Comment);

        let doc = colorized("set x #notacomment\n");
        assert_eq!(style_at(&doc, 6), Style::Default); // '#' mid-command, no comment
    }

    #[test]
    fn fold_levels_for_proc_body() {
        let src = "proc p {} {\nset x 1\n}\n";
        let mut doc = Document::new(src);
        colorize(0, src.len(), 0, &keywords(), &mut doc);
        assert!(doc.fold_level(0) & fold::HEADER_FLAG != 0);
        assert_eq!(fold::number(doc.fold_level(1)), fold::BASE + 1);
        assert_eq!(fold::number(doc.fold_level(2)), fold::BASE + 1);
    }
}
