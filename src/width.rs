// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Combines general categories and East Asian Width classes into display widths.

use crate::category::{CategoryIntervals, GeneralCategory};
use crate::east_asian_width::{EastAsianWidth, WidthFilter, WidthIntervals};
use crate::interval::{ColumnWidths, Interval, WidthInterval};

/// The precedence data of the width classification.
///
/// Rules are applied in field order. Earlier rules are overrides: a code point that is
/// both a nonspacing mark and listed as `W` must end up zero width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthPolicy {
    /// Categories whose members occupy no column, in either context.
    pub zero_width_categories: Vec<GeneralCategory>,
    /// Code points taken back out of the zero width categories.
    pub zero_width_exceptions: Vec<u32>,
    /// Ranges that are zero width regardless of their properties.
    pub zero_width_ranges: Vec<Interval>,
    /// Classes that are two columns wide in either context.
    pub wide_classes: Vec<EastAsianWidth>,
    /// Classes that are one column wide, except in an East Asian context.
    pub ambiguous_classes: Vec<EastAsianWidth>,
}

impl WidthPolicy {
    /// The classification used for terminal column widths, after `wcwidth()`.
    pub fn standard() -> Self {
        Self {
            // Me: Mark, enclosing
            // Mn: Mark, non-spacing
            // Cf: Control, format
            zero_width_categories: vec![
                GeneralCategory::Me,
                GeneralCategory::Mn,
                GeneralCategory::Cf,
            ],
            // U+00AD: Soft Hyphen
            // Although it's gc=Cf, it's rendered as a hyphen wherever a line gets broken
            // at its position, and wcwidth() gives it a width of 1.
            zero_width_exceptions: vec![0x00AD],
            // U+1160 to U+11FF: Hangul Jungseong and Jongseong jamo
            // These are gc=Lo ea=N, but combine with the preceding Choseong into one syllable.
            zero_width_ranges: vec![Interval::new(0x1160, 0x11FF)],
            wide_classes: vec![EastAsianWidth::Wide, EastAsianWidth::Fullwidth],
            ambiguous_classes: vec![EastAsianWidth::Ambiguous],
        }
    }

    /// The records of `EastAsianWidth.txt` this policy consumes.
    ///
    /// Members of the zero width categories are left out, as the category rule already covers them.
    pub fn width_filter(&self) -> WidthFilter {
        let mut wanted = self.wide_classes.clone();
        for &class in &self.ambiguous_classes {
            if !wanted.contains(&class) {
                wanted.push(class);
            }
        }
        WidthFilter { wanted, excluded_categories: self.zero_width_categories.clone() }
    }
}

impl Default for WidthPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Produces the unsorted list of explicit width intervals.
///
/// Every code point not covered by the result has the default width of one column.
/// Overlaps between the rules are not resolved here.
pub fn classify(
    categories: &CategoryIntervals,
    widths: &WidthIntervals,
    policy: &WidthPolicy,
) -> Vec<WidthInterval> {
    let mut table = Vec::new();

    for &category in &policy.zero_width_categories {
        for &interval in categories.get(category) {
            let mut parts = vec![interval];
            for &cp in &policy.zero_width_exceptions {
                parts = parts.into_iter().flat_map(|iv| iv.split_out(cp)).collect();
            }
            table.extend(parts.into_iter().map(|iv| WidthInterval::new(iv, ColumnWidths::ZERO)));
        }
    }

    table.extend(
        policy.zero_width_ranges.iter().map(|&iv| WidthInterval::new(iv, ColumnWidths::ZERO)),
    );

    for &class in &policy.wide_classes {
        table.extend(
            widths.get(class).iter().map(|&iv| WidthInterval::new(iv, ColumnWidths::WIDE)),
        );
    }

    for &class in &policy.ambiguous_classes {
        table.extend(
            widths.get(class).iter().map(|&iv| WidthInterval::new(iv, ColumnWidths::AMBIGUOUS)),
        );
    }

    log::debug!("classified {} intervals", table.len());
    table
}
