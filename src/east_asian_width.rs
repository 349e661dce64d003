// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! East Asian Width tables built from `EastAsianWidth.txt`.
//!
//! Records come in two shapes:
//! ```text
//! 1100;W           # Lo         HANGUL CHOSEONG KIYEOK
//! 1101..115F;W     # Lo    [95] HANGUL CHOSEONG SSANGKIYEOK..HANGUL CHOSEONG FILLER
//! ```
//! Anything else is commentary and gets skipped.

use std::collections::HashMap;
use std::fmt;

use crate::apperr::{Error, Result, Stage};
use crate::category::GeneralCategory;
use crate::interval::{Interval, parse_code_point};

/// The `East_Asian_Width` property values of UAX #11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EastAsianWidth {
    Ambiguous, // A
    Fullwidth, // F
    Halfwidth, // H
    Neutral,   // N
    Narrow,    // Na
    Wide,      // W
}

impl EastAsianWidth {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "A" => EastAsianWidth::Ambiguous,
            "F" => EastAsianWidth::Fullwidth,
            "H" => EastAsianWidth::Halfwidth,
            "N" => EastAsianWidth::Neutral,
            "Na" => EastAsianWidth::Narrow,
            "W" => EastAsianWidth::Wide,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EastAsianWidth::Ambiguous => "A",
            EastAsianWidth::Fullwidth => "F",
            EastAsianWidth::Halfwidth => "H",
            EastAsianWidth::Neutral => "N",
            EastAsianWidth::Narrow => "Na",
            EastAsianWidth::Wide => "W",
        }
    }
}

impl fmt::Display for EastAsianWidth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tokenized line of `EastAsianWidth.txt`. Fields are borrowed verbatim
/// and have not been validated beyond their shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EawLine<'a> {
    SingleCodePoint { cp: &'a str, width: &'a str, category: &'a str },
    Range { low: &'a str, high: &'a str, width: &'a str, category: &'a str },
    Unrecognized,
}

struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self.rest.find(|c: char| !pred(c)).unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        token
    }

    fn word(&mut self) -> Option<&'a str> {
        Some(self.take_while(|c| c.is_ascii_alphanumeric() || c == '_')).filter(|w| !w.is_empty())
    }

    fn eat(&mut self, prefix: &str) -> bool {
        match self.rest.strip_prefix(prefix) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn skip_blanks(&mut self) {
        self.take_while(|c| c == ' ' || c == '\t');
    }
}

/// Splits a line into its record fields, without backtracking.
pub fn tokenize(line: &str) -> EawLine<'_> {
    tokenize_record(line).unwrap_or(EawLine::Unrecognized)
}

fn tokenize_record(line: &str) -> Option<EawLine<'_>> {
    let mut tok = Tokenizer { rest: line };

    let low = tok.word()?;
    let high = if tok.eat("..") { Some(tok.word()?) } else { None };

    tok.skip_blanks();
    if !tok.eat(";") {
        return None;
    }
    tok.skip_blanks();
    let width = tok.word()?;

    tok.skip_blanks();
    if !tok.eat("#") {
        return None;
    }
    tok.skip_blanks();
    let category = tok.word()?;

    Some(match high {
        Some(high) => EawLine::Range { low, high, width, category },
        None => EawLine::SingleCodePoint { cp: low, width, category },
    })
}

/// Selects which records of `EastAsianWidth.txt` are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidthFilter {
    pub wanted: Vec<EastAsianWidth>,
    pub excluded_categories: Vec<GeneralCategory>,
}

impl WidthFilter {
    fn accepts(&self, width: &str, category: &str) -> Option<EastAsianWidth> {
        if GeneralCategory::parse(category).is_some_and(|c| self.excluded_categories.contains(&c)) {
            return None;
        }
        EastAsianWidth::parse(width).filter(|w| self.wanted.contains(w))
    }
}

/// Intervals per width class, in file order. Neither sorted nor merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidthIntervals {
    classes: HashMap<EastAsianWidth, Vec<Interval>>,
}

impl WidthIntervals {
    pub fn get(&self, width: EastAsianWidth) -> &[Interval] {
        self.classes.get(&width).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Builds the width class tables from the lines of `EastAsianWidth.txt`.
pub fn build_width_table<I, S>(lines: I, filter: &WidthFilter) -> Result<WidthIntervals>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classes: HashMap<EastAsianWidth, Vec<Interval>> = HashMap::new();
    let mut kept = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end_matches('\r');
        if line.starts_with('#') {
            continue;
        }

        let (low, high, width, category) = match tokenize(line) {
            EawLine::SingleCodePoint { cp, width, category } => (cp, cp, width, category),
            EawLine::Range { low, high, width, category } => (low, high, width, category),
            EawLine::Unrecognized => {
                if !line.trim().is_empty() {
                    log::trace!("skipping line {}: {line:?}", index + 1);
                }
                continue;
            }
        };

        let format_err = |message: &str| Error::format(Stage::Widths, index + 1, line, message);
        let low = parse_code_point(low).ok_or_else(|| format_err("invalid code point"))?;
        let high = parse_code_point(high).ok_or_else(|| format_err("invalid code point"))?;
        if low > high {
            return Err(format_err("range bounds out of order"));
        }

        let Some(width) = filter.accepts(width, category) else {
            continue;
        };

        classes.entry(width).or_default().push(Interval::new(low, high));
        kept += 1;
    }

    log::debug!("kept {kept} width records");
    Ok(WidthIntervals { classes })
}
