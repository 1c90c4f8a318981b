//! Compact pattern notation parser.
//!
//! ```text
//! pattern     := sequence ( '|' sequence )*
//! sequence    := item ( ',' item )*
//! item        := group | element
//! group       := '(' pattern ')' '?'?
//! element     := '!'? symbol ( '?' | '+' | '*' )*
//! ```

use super::pattern::{Pattern, PatternElement, PatternItem};
use crate::error::LexiconError;
use crate::token::Tag;
use std::iter::Peekable;
use std::str::Chars;

pub(super) fn parse(notation: &str) -> Result<Pattern, LexiconError> {
    let mut parser = Parser {
        notation,
        chars: notation.chars().peekable(),
    };
    let mut alternatives = parser.alternatives()?;
    if let Some(c) = parser.chars.next() {
        return Err(LexiconError::notation(notation, format!("unexpected {c:?}")));
    }
    if alternatives.len() == 1 {
        Ok(Pattern::Sequence(alternatives.pop().unwrap_or_default()))
    } else {
        Ok(Pattern::Alternation(alternatives))
    }
}

struct Parser<'a> {
    notation: &'a str,
    chars: Peekable<Chars<'a>>,
}

/// A character of an element, remembering whether it was escaped
#[derive(Clone, Copy)]
struct Raw {
    c: char,
    escaped: bool,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> LexiconError {
        LexiconError::notation(self.notation, reason)
    }

    fn alternatives(&mut self) -> Result<Vec<Vec<PatternItem>>, LexiconError> {
        let mut alternatives = vec![self.sequence()?];
        while self.chars.next_if_eq(&'|').is_some() {
            alternatives.push(self.sequence()?);
        }
        Ok(alternatives)
    }

    fn sequence(&mut self) -> Result<Vec<PatternItem>, LexiconError> {
        let mut items = vec![self.item()?];
        while self.chars.next_if_eq(&',').is_some() {
            items.push(self.item()?);
        }
        Ok(items)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn item(&mut self) -> Result<PatternItem, LexiconError> {
        self.skip_whitespace();
        if self.chars.next_if_eq(&'(').is_none() {
            return self.element().map(PatternItem::Element);
        }

        let mut alternatives = self.alternatives()?;
        if self.chars.next_if_eq(&')').is_none() {
            return Err(self.error("unbalanced '('"));
        }
        self.skip_whitespace();
        match self.chars.peek() {
            Some('?') => {
                self.chars.next();
                alternatives.push(Vec::new());
            }
            Some('+' | '*') => return Err(self.error("groups cannot repeat")),
            _ => {}
        }
        self.skip_whitespace();
        Ok(PatternItem::Alternation(alternatives))
    }

    fn element(&mut self) -> Result<PatternElement, LexiconError> {
        let mut raw: Vec<Raw> = Vec::new();
        while let Some(&c) = self.chars.peek() {
            match c {
                ',' | '|' | '(' | ')' => break,
                '\\' => {
                    self.chars.next();
                    let escaped = match self.chars.next() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(other) => other,
                        None => return Err(self.error("trailing escape")),
                    };
                    raw.push(Raw { c: escaped, escaped: true });
                }
                _ => {
                    self.chars.next();
                    raw.push(Raw { c, escaped: false });
                }
            }
        }

        let mut body = trim_unescaped_whitespace(&raw);
        if let [single] = body {
            return Ok(PatternElement::new(Tag::from(single.c.to_string())));
        }

        let mut optional = false;
        let mut repeat = false;
        while let Some((last, rest)) = body.split_last() {
            match last {
                Raw { c: '?', escaped: false } => optional = true,
                Raw { c: '+', escaped: false } => repeat = true,
                Raw { c: '*', escaped: false } => {
                    optional = true;
                    repeat = true;
                }
                _ => break,
            }
            body = trim_unescaped_whitespace(rest);
        }

        let mut inverted = false;
        if let Some((Raw { c: '!', escaped: false }, rest)) = body.split_first() {
            inverted = true;
            body = trim_unescaped_whitespace(rest);
        }

        if body.is_empty() {
            return Err(self.error("empty element"));
        }

        let symbol: Tag = body.iter().map(|raw| raw.c).collect();
        let mut element = PatternElement::new(symbol);
        if optional {
            element = element.optional();
        }
        if repeat {
            element = element.repeat();
        }
        if inverted {
            element = element.inverted();
        }
        Ok(element)
    }
}

fn trim_unescaped_whitespace(raw: &[Raw]) -> &[Raw] {
    let is_blank = |r: &Raw| !r.escaped && r.c.is_whitespace();
    let start = raw.iter().position(|r| !is_blank(r)).unwrap_or(raw.len());
    let end = raw.iter().rposition(|r| !is_blank(r)).map_or(start, |i| i + 1);
    &raw[start..end]
}
