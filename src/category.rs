// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! General category tables built from `UnicodeData.txt`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::iter;

use crate::apperr::{Error, Result, Stage};
use crate::interval::{Interval, is_surrogate, parse_code_point};

/// Number of `;`-separated fields in every `UnicodeData.txt` record.
pub const UNICODE_DATA_FIELDS: usize = 15;

/// Suffix of the name field that opens a range record, e.g. `<CJK Ideograph, First>`.
const RANGE_FIRST_SUFFIX: &str = ", First>";

// The order of the variants is the order in which tables are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum GeneralCategory {
    Lu, // Uppercase_Letter
    Ll, // Lowercase_Letter
    Lt, // Titlecase_Letter
    Lm, // Modifier_Letter
    Lo, // Other_Letter
    Mn, // Nonspacing_Mark
    Mc, // Spacing_Mark
    Me, // Enclosing_Mark
    Nd, // Decimal_Number
    Nl, // Letter_Number
    No, // Other_Number
    Pc, // Connector_Punctuation
    Pd, // Dash_Punctuation
    Ps, // Open_Punctuation
    Pe, // Close_Punctuation
    Pi, // Initial_Punctuation
    Pf, // Final_Punctuation
    Po, // Other_Punctuation
    Sm, // Math_Symbol
    Sc, // Currency_Symbol
    Sk, // Modifier_Symbol
    So, // Other_Symbol
    Zs, // Space_Separator
    Zl, // Line_Separator
    Zp, // Paragraph_Separator
    Cc, // Control
    Cf, // Format
    Cs, // Surrogate
    Co, // Private_Use
    Cn, // Unassigned

    // Grouped values
    LC, // Cased_Letter
    L,  // Letter
    M,  // Mark
    N,  // Number
    P,  // Punctuation
    S,  // Symbol
    Z,  // Separator
    C,  // Other
}

impl GeneralCategory {
    pub fn parse(s: &str) -> Option<Self> {
        use GeneralCategory::*;
        Some(match s {
            "Lu" => Lu,
            "Ll" => Ll,
            "Lt" => Lt,
            "Lm" => Lm,
            "Lo" => Lo,
            "Mn" => Mn,
            "Mc" => Mc,
            "Me" => Me,
            "Nd" => Nd,
            "Nl" => Nl,
            "No" => No,
            "Pc" => Pc,
            "Pd" => Pd,
            "Ps" => Ps,
            "Pe" => Pe,
            "Pi" => Pi,
            "Pf" => Pf,
            "Po" => Po,
            "Sm" => Sm,
            "Sc" => Sc,
            "Sk" => Sk,
            "So" => So,
            "Zs" => Zs,
            "Zl" => Zl,
            "Zp" => Zp,
            "Cc" => Cc,
            "Cf" => Cf,
            "Cs" => Cs,
            "Co" => Co,
            "Cn" => Cn,
            "LC" => LC,
            "L" => L,
            "M" => M,
            "N" => N,
            "P" => P,
            "S" => S,
            "Z" => Z,
            "C" => C,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        use GeneralCategory::*;
        match self {
            Lu => "Lu",
            Ll => "Ll",
            Lt => "Lt",
            Lm => "Lm",
            Lo => "Lo",
            Mn => "Mn",
            Mc => "Mc",
            Me => "Me",
            Nd => "Nd",
            Nl => "Nl",
            No => "No",
            Pc => "Pc",
            Pd => "Pd",
            Ps => "Ps",
            Pe => "Pe",
            Pi => "Pi",
            Pf => "Pf",
            Po => "Po",
            Sm => "Sm",
            Sc => "Sc",
            Sk => "Sk",
            So => "So",
            Zs => "Zs",
            Zl => "Zl",
            Zp => "Zp",
            Cc => "Cc",
            Cf => "Cf",
            Cs => "Cs",
            Co => "Co",
            Cn => "Cn",
            LC => "LC",
            L => "L",
            M => "M",
            N => "N",
            P => "P",
            S => "S",
            Z => "Z",
            C => "C",
        }
    }

    pub fn is_grouped(self) -> bool {
        use GeneralCategory::*;
        matches!(self, LC | L | M | N | P | S | Z | C)
    }
}

impl fmt::Display for GeneralCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps each specific category to the grouped categories it belongs to.
///
/// A specific category without an entry is rejected while parsing, so the table
/// also acts as the set of categories `UnicodeData.txt` is allowed to use.
#[derive(Debug, Clone)]
pub struct CategoryExpansion {
    groups: HashMap<GeneralCategory, Vec<GeneralCategory>>,
}

impl CategoryExpansion {
    pub fn new(groups: impl IntoIterator<Item = (GeneralCategory, Vec<GeneralCategory>)>) -> Self {
        Self { groups: groups.into_iter().collect() }
    }

    /// Table 12 of UAX #44: <https://www.unicode.org/reports/tr44/#General_Category_Values>
    pub fn tr44() -> Self {
        use GeneralCategory::*;
        Self::new([
            (Lu, vec![LC, L]),
            (Ll, vec![LC, L]),
            (Lt, vec![LC, L]),
            (Lm, vec![L]),
            (Lo, vec![L]),
            (Mn, vec![M]),
            (Mc, vec![M]),
            (Me, vec![M]),
            (Nd, vec![N]),
            (Nl, vec![N]),
            (No, vec![N]),
            (Pc, vec![P]),
            (Pd, vec![P]),
            (Ps, vec![P]),
            (Pe, vec![P]),
            (Pi, vec![P]),
            (Pf, vec![P]),
            (Po, vec![P]),
            (Sm, vec![S]),
            (Sc, vec![S]),
            (Sk, vec![S]),
            (So, vec![S]),
            (Zs, vec![Z]),
            (Zl, vec![Z]),
            (Zp, vec![Z]),
            (Cc, vec![C]),
            (Cf, vec![C]),
            (Cs, vec![C]),
            (Co, vec![C]),
            (Cn, vec![C]),
        ])
    }

    pub fn groups(&self, category: GeneralCategory) -> Option<&[GeneralCategory]> {
        self.groups.get(&category).map(Vec::as_slice)
    }

    /// The category itself, followed by every group it belongs to.
    pub fn expand(&self, category: GeneralCategory) -> impl Iterator<Item = GeneralCategory> + '_ {
        iter::once(category).chain(self.groups(category).unwrap_or_default().iter().copied())
    }
}

/// Coalesced code point intervals per general category, specific and grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIntervals {
    tables: BTreeMap<GeneralCategory, Vec<Interval>>,
}

impl CategoryIntervals {
    /// The sorted, disjoint, non-adjacent intervals of `category`.
    /// Categories without any code point yield an empty slice.
    pub fn get(&self, category: GeneralCategory) -> &[Interval] {
        self.tables.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeneralCategory, &[Interval])> {
        self.tables.iter().map(|(&c, t)| (c, t.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

/// Builds the per-category interval tables from the lines of `UnicodeData.txt`.
///
/// A record whose name ends in `, First>` opens a range which the next record closes.
/// Every code point from the opening one up to, but excluding, the closing one
/// inherits the closing record's category. The closing code point is then assigned
/// by its own record like any other.
pub fn build_category_table<I, S>(lines: I, expansion: &CategoryExpansion) -> Result<CategoryIntervals>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut assigned: HashMap<u32, GeneralCategory> = HashMap::new();
    let mut range_start = None;
    let mut records = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end_matches('\r');
        let line_no = index + 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() != UNICODE_DATA_FIELDS {
            return Err(Error::format(
                Stage::Categories,
                line_no,
                line,
                format!("expected {UNICODE_DATA_FIELDS} fields, got {}", fields.len()),
            ));
        }

        let category = GeneralCategory::parse(fields[2])
            .filter(|&c| expansion.groups(c).is_some())
            .ok_or_else(|| {
                Error::format(
                    Stage::Categories,
                    line_no,
                    line,
                    format!("unknown general category {:?}", fields[2]),
                )
            })?;
        let cp = parse_code_point(fields[0])
            .ok_or_else(|| Error::format(Stage::Categories, line_no, line, "invalid code point"))?;
        records += 1;

        if is_surrogate(cp) {
            continue;
        }

        if let Some(start) = range_start.take() {
            for c in (start..cp).filter(|&c| !is_surrogate(c)) {
                assigned.insert(c, category);
            }
        }

        if fields[1].ends_with(RANGE_FIRST_SUFFIX) {
            range_start = Some(cp);
            continue;
        }

        assigned.insert(cp, category);
    }

    log::debug!("{records} records assigned {} code points", assigned.len());

    let mut members: BTreeMap<GeneralCategory, Vec<u32>> = BTreeMap::new();
    for (&cp, &category) in &assigned {
        for c in expansion.expand(category) {
            members.entry(c).or_default().push(cp);
        }
    }

    let mut tables = BTreeMap::new();
    for (category, mut points) in members {
        points.sort_unstable();
        points.dedup();
        tables.insert(category, coalesce_sorted(&points)?);
    }

    Ok(CategoryIntervals { tables })
}

/// Merges strictly ascending code points into runs of consecutive values.
pub fn coalesce_sorted(points: &[u32]) -> Result<Vec<Interval>> {
    let mut out = Vec::new();
    let Some((&first, rest)) = points.split_first() else {
        return Ok(out);
    };

    let mut current = Interval::single(first);
    for &cp in rest {
        if cp <= current.high {
            return Err(Error::invariant(
                Stage::Categories,
                Some(cp),
                format!("code point follows U+{:04X} out of order", current.high),
            ));
        }
        if cp == current.high + 1 {
            current.high = cp;
        } else {
            out.push(current);
            current = Interval::single(cp);
        }
    }
    out.push(current);

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::interval::SURROGATES;

    fn record(cp: u32, name: &str, category: &str) -> String {
        format!("{cp:04X};{name};{category};0;L;;;;;N;;;;;")
    }

    fn build(lines: &[String]) -> Result<CategoryIntervals> {
        build_category_table(lines, &CategoryExpansion::tr44())
    }

    #[test]
    fn test_adjacent_letters_coalesce_and_expand() {
        let lines = [
            record(0x41, "LATIN CAPITAL LETTER A", "Lu"),
            record(0x42, "LATIN CAPITAL LETTER B", "Lu"),
        ];
        let table = build(&lines).unwrap();
        let expected = [Interval::new(0x41, 0x42)];
        assert_eq!(table.get(GeneralCategory::Lu), expected);
        assert_eq!(table.get(GeneralCategory::LC), expected);
        assert_eq!(table.get(GeneralCategory::L), expected);
        assert!(table.get(GeneralCategory::Ll).is_empty());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_groups_merge_across_specific_categories() {
        let lines = [
            record(0x41, "LATIN CAPITAL LETTER A", "Lu"),
            record(0x42, "LATIN SMALL LETTER ?", "Ll"),
            record(0x43, "MODIFIER", "Lm"),
            record(0x45, "DIGIT", "No"),
        ];
        let table = build(&lines).unwrap();
        assert_eq!(table.get(GeneralCategory::LC), [Interval::new(0x41, 0x42)]);
        assert_eq!(table.get(GeneralCategory::L), [Interval::new(0x41, 0x43)]);
        assert_eq!(table.get(GeneralCategory::N), [Interval::single(0x45)]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let lines = [
            "# comment".to_string(),
            String::new(),
            record(0x300, "COMBINING GRAVE ACCENT", "Mn") + "\r",
        ];
        let table = build(&lines).unwrap();
        assert_eq!(table.get(GeneralCategory::Mn), [Interval::single(0x300)]);
        assert_eq!(table.get(GeneralCategory::M), [Interval::single(0x300)]);
    }

    #[test]
    fn test_range_inherits_closing_category_half_open() {
        let lines = [
            record(0x3400, "<CJK Ideograph Extension A, First>", "Lo"),
            record(0x3410, "<CJK Ideograph Extension A, Last>", "So"),
        ];
        let table = build(&lines).unwrap();
        assert_eq!(table.get(GeneralCategory::So), [Interval::new(0x3400, 0x3410)]);
        assert!(table.get(GeneralCategory::Lo).is_empty());
    }

    #[test]
    fn test_range_closed_by_any_record() {
        let lines = [
            record(0x100, "<Thing, First>", "Lo"),
            record(0x104, "PLAIN", "Sm"),
            record(0x105, "AFTER", "Lo"),
        ];
        let table = build(&lines).unwrap();
        assert_eq!(table.get(GeneralCategory::Sm), [Interval::new(0x100, 0x104)]);
        assert_eq!(table.get(GeneralCategory::Lo), [Interval::single(0x105)]);
    }

    #[test]
    fn test_range_then_overwrite_keeps_later_record() {
        let lines = [
            record(0x10, "<Thing, First>", "Lo"),
            record(0x14, "<Thing, Last>", "Lo"),
            record(0x12, "OVERRIDE", "Sm"),
        ];
        let table = build(&lines).unwrap();
        assert_eq!(
            table.get(GeneralCategory::Lo),
            [Interval::new(0x10, 0x11), Interval::new(0x13, 0x14)]
        );
        assert_eq!(table.get(GeneralCategory::Sm), [Interval::single(0x12)]);
    }

    #[test]
    fn test_surrogates_are_dropped() {
        let lines = [
            record(0xD7FF, "BEFORE", "Lo"),
            record(0xD800, "<Non Private Use High Surrogate, First>", "Cs"),
            record(0xDB7F, "<Non Private Use High Surrogate, Last>", "Cs"),
            record(0xDFFF, "LONE", "Cs"),
            record(0xE000, "<Private Use, First>", "Co"),
            record(0xF8FF, "<Private Use, Last>", "Co"),
        ];
        let table = build(&lines).unwrap();
        assert!(table.get(GeneralCategory::Cs).is_empty());
        assert_eq!(table.get(GeneralCategory::Co), [Interval::new(0xE000, 0xF8FF)]);
        let surrogates = Interval::new(*SURROGATES.start(), *SURROGATES.end());
        for (_, intervals) in table.iter() {
            assert!(intervals.iter().all(|iv| !iv.intersects(&surrogates)));
        }
    }

    #[test]
    fn test_range_spanning_surrogates_skips_them() {
        let lines = [record(0xD700, "<Odd, First>", "Co"), record(0xE001, "<Odd, Last>", "Co")];
        let table = build(&lines).unwrap();
        assert_eq!(
            table.get(GeneralCategory::Co),
            [Interval::new(0xD700, 0xD7FF), Interval::new(0xE000, 0xE001)]
        );
    }

    #[test]
    fn test_output_is_disjoint_and_non_adjacent() {
        let lines: Vec<String> = [0x20, 0x21, 0x23, 0x24, 0x25, 0x30, 0x2F]
            .iter()
            .map(|&cp| record(cp, "X", "Po"))
            .collect();
        let table = build(&lines).unwrap();
        let po = table.get(GeneralCategory::Po);
        assert_eq!(
            po,
            [Interval::new(0x20, 0x21), Interval::new(0x23, 0x25), Interval::new(0x2F, 0x30)]
        );
        assert!(po.windows(2).all(|w| w[0].high + 1 < w[1].low));
    }

    #[test]
    fn test_wrong_field_count_is_format_error() {
        let err = build(&["0041;LATIN CAPITAL LETTER A;Lu".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Format { stage: Stage::Categories, line: 1, .. }));
    }

    #[test]
    fn test_unknown_category_is_format_error() {
        let lines = [record(0x41, "A", "Lu"), record(0x42, "B", "Xx")];
        let err = build(&lines).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));

        // Grouped codes are not valid record categories.
        let err = build(&[record(0x41, "A", "L")]).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_bad_code_point_is_format_error() {
        let line = "00G1;BAD;Lu;0;L;;;;;N;;;;;".to_string();
        assert!(matches!(build(&[line]).unwrap_err(), Error::Format { .. }));
        let line = "110000;BAD;Lu;0;L;;;;;N;;;;;".to_string();
        assert!(matches!(build(&[line]).unwrap_err(), Error::Format { .. }));
    }

    #[test]
    fn test_coalesce_rejects_unsorted_input() {
        let err = coalesce_sorted(&[1, 2, 2]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvariantViolation { stage: Stage::Categories, code_point: Some(2), .. }
        ));
        assert!(coalesce_sorted(&[5, 3]).is_err());
        assert!(coalesce_sorted(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_expansion_is_total_over_specific_categories() {
        let expansion = CategoryExpansion::tr44();
        for s in [
            "Lu", "Ll", "Lt", "Lm", "Lo", "Mn", "Mc", "Me", "Nd", "Nl", "No", "Pc", "Pd", "Ps",
            "Pe", "Pi", "Pf", "Po", "Sm", "Sc", "Sk", "So", "Zs", "Zl", "Zp", "Cc", "Cf", "Cs",
            "Co", "Cn",
        ] {
            let cat = GeneralCategory::parse(s).unwrap();
            assert_eq!(cat.as_str(), s);
            assert!(!cat.is_grouped());
            let groups = expansion.groups(cat).unwrap();
            assert!(!groups.is_empty());
            assert!(groups.iter().all(|g| g.is_grouped()));
        }
        assert_eq!(
            expansion.expand(GeneralCategory::Lu).collect::<Vec<_>>(),
            [GeneralCategory::Lu, GeneralCategory::LC, GeneralCategory::L]
        );
    }
}
