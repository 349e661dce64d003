// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Code point intervals and the width payload carried by the final table.

use std::fmt;
use std::ops::RangeInclusive;

pub const MAX_CODE_POINT: u32 = 0x10FFFF;

// Isolated surrogates have no interpretation and are never assigned a category.
pub const SURROGATES: RangeInclusive<u32> = 0xD800..=0xDFFF;

pub fn is_surrogate(cp: u32) -> bool {
    SURROGATES.contains(&cp)
}

/// Parses a bare hexadecimal code point such as `1F600`.
pub fn parse_code_point(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok().filter(|&cp| cp <= MAX_CODE_POINT)
}

/// An inclusive `low..=high` range of code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub low: u32,
    pub high: u32,
}

impl Interval {
    pub const fn new(low: u32, high: u32) -> Self {
        debug_assert!(low <= high);
        Self { low, high }
    }

    pub const fn single(cp: u32) -> Self {
        Self { low: cp, high: cp }
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.low <= cp && cp <= self.high
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    /// Returns the parts of `self` that remain after taking out `cp`.
    pub fn split_out(self, cp: u32) -> impl Iterator<Item = Interval> {
        let (before, after) = if !self.contains(cp) {
            (Some(self), None)
        } else {
            (
                (cp > self.low).then(|| Interval::new(self.low, cp - 1)),
                (cp < self.high).then(|| Interval::new(cp + 1, self.high)),
            )
        };
        before.into_iter().chain(after)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.low == self.high {
            write!(f, "U+{:04X}", self.low)
        } else {
            write!(f, "U+{:04X}..U+{:04X}", self.low, self.high)
        }
    }
}

/// Display width in terminal columns: outside of, and inside of an East Asian context.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnWidths {
    pub default: u8,
    pub east_asian: u8,
}

impl ColumnWidths {
    pub const ZERO: Self = Self::new(0, 0);
    pub const NARROW: Self = Self::new(1, 1);
    pub const WIDE: Self = Self::new(2, 2);
    pub const AMBIGUOUS: Self = Self::new(1, 2);

    pub const fn new(default: u8, east_asian: u8) -> Self {
        Self { default, east_asian }
    }
}

/// One row of the final width table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidthInterval {
    pub low: u32,
    pub high: u32,
    pub widths: ColumnWidths,
}

impl WidthInterval {
    pub const fn new(interval: Interval, widths: ColumnWidths) -> Self {
        Self { low: interval.low, high: interval.high, widths }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.low, self.high)
    }
}

/// Finds the first pair of consecutive rows in a `low`-sorted table that overlap.
pub fn find_overlap(table: &[WidthInterval]) -> Option<(WidthInterval, WidthInterval)> {
    table.windows(2).find(|w| w[0].high >= w[1].low).map(|w| (w[0], w[1]))
}
