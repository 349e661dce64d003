// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Runs the stages in order: fetch, parse, classify, optimize, emit.

use std::path::PathBuf;

use reqwest::blocking::Client;

use crate::apperr::{Error, Result, Stage};
use crate::category::{CategoryExpansion, CategoryIntervals, build_category_table};
use crate::config::{Command, Config};
use crate::east_asian_width::{WidthFilter, WidthIntervals, build_width_table};
use crate::emit::{emit_category_table, emit_width_table};
use crate::interval::{WidthInterval, find_overlap};
use crate::optimize::optimize;
use crate::source::{
    EAST_ASIAN_WIDTH, FileSource, HttpSource, LineSource, LogProgress, UNICODE_DATA, ucd_url,
};
use crate::width::{WidthPolicy, classify};

/// Where the UCD files of a run come from.
pub enum UcdLocation {
    Directory(PathBuf),
    Remote { client: Client, version: String },
}

impl UcdLocation {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match &config.ucd_dir {
            Some(dir) => UcdLocation::Directory(dir.clone()),
            None => UcdLocation::Remote {
                client: Client::builder().build()?,
                version: config.version.clone(),
            },
        })
    }

    pub fn open(&self, file: &str) -> Box<dyn LineSource> {
        match self {
            UcdLocation::Directory(dir) => Box::new(FileSource::new(dir.join(file))),
            UcdLocation::Remote { client, version } => {
                Box::new(HttpSource::new(client.clone(), ucd_url(version, file)))
            }
        }
    }
}

/// Produces the requested table, rendered according to `config.emit`.
pub fn run(config: &Config) -> Result<String> {
    let ucd = UcdLocation::from_config(config)?;
    let expansion = CategoryExpansion::tr44();
    let categories = load_categories(&*ucd.open(UNICODE_DATA), &expansion)?;

    match config.command {
        Command::Widths => {
            let filter = config.policy.width_filter();
            let widths = load_widths(&*ucd.open(EAST_ASIAN_WIDTH), &filter)?;
            let table = compile_width_table(&categories, &widths, &config.policy, config.strict)?;
            Ok(emit_width_table(&table, &config.version, &config.emit))
        }
        Command::Category(category) => {
            let table = categories.get(category);
            if table.is_empty() {
                log::warn!("general category {category} has no code points");
            }
            Ok(emit_category_table(category, table, &config.version, &config.emit))
        }
    }
}

pub fn load_categories(
    source: &dyn LineSource,
    expansion: &CategoryExpansion,
) -> Result<CategoryIntervals> {
    log::info!("Parsing categories from source: {}", source.describe());
    let text = source.fetch(Some(&mut LogProgress::new(UNICODE_DATA)))?;
    build_category_table(text.lines(), expansion)
}

pub fn load_widths(source: &dyn LineSource, filter: &WidthFilter) -> Result<WidthIntervals> {
    log::info!("Parsing widths from source: {}", source.describe());
    let text = source.fetch(Some(&mut LogProgress::new(EAST_ASIAN_WIDTH)))?;
    build_width_table(text.lines(), filter)
}

/// Classifies and optimizes. With `strict`, overlapping rows in the result are an error.
pub fn compile_width_table(
    categories: &CategoryIntervals,
    widths: &WidthIntervals,
    policy: &WidthPolicy,
    strict: bool,
) -> Result<Vec<WidthInterval>> {
    let table = classify(categories, widths, policy);
    let before = table.len();
    let table = optimize(table)?;
    log::info!("{before} intervals, {} after optimization", table.len());

    if let Some((a, b)) = find_overlap(&table) {
        let message = format!("{} overlaps {}", a.interval(), b.interval());
        if strict {
            return Err(Error::invariant(Stage::Classification, Some(b.low), message));
        }
        log::warn!("{message}");
    }

    Ok(table)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::category::GeneralCategory;
    use crate::interval::{ColumnWidths, Interval};

    const UNICODE_DATA_SAMPLE: &str = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0042;LATIN CAPITAL LETTER B;Lu;0;L;;;;;N;;;;0062;
00AD;SOFT HYPHEN;Cf;0;BN;;;;;N;;;;;
0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING GRAVE;;;;
0301;COMBINING ACUTE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING ACUTE;;;;
0488;COMBINING CYRILLIC HUNDRED THOUSANDS SIGN;Me;0;NSM;;;;;N;;;;;
1100;HANGUL CHOSEONG KIYEOK;Lo;0;L;;;;;N;;;;;
1101;HANGUL CHOSEONG SSANGKIYEOK;Lo;0;L;;;;;N;;;;;
302A;IDEOGRAPHIC LEVEL TONE MARK;Mn;218;NSM;;;;;N;;;;;
4E00;<CJK Ideograph, First>;Lo;0;L;;;;;N;;;;;
9FFF;<CJK Ideograph, Last>;Lo;0;L;;;;;N;;;;;
D800;<Non Private Use High Surrogate, First>;Cs;0;L;;;;;N;;;;;
DB7F;<Non Private Use High Surrogate, Last>;Cs;0;L;;;;;N;;;;;
";

    const EAST_ASIAN_WIDTH_SAMPLE: &str = "\
# EastAsianWidth-14.0.0.txt
# @missing: 0000..10FFFF; N

0041..005A;Na    # Lu    [26] LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER Z
00A1;A           # Po         INVERTED EXCLAMATION MARK
00AD;A           # Cf         SOFT HYPHEN
0300..036F;A     # Mn   [112] COMBINING GRAVE ACCENT..COMBINING LATIN SMALL LETTER X
1100..115F;W     # Lo    [96] HANGUL CHOSEONG KIYEOK..HANGUL CHOSEONG FILLER
1160..11FF;N     # Lo   [160] HANGUL JUNGSEONG FILLER..HANGUL JONGSEONG SSANGNIEUN
3000;F           # Zs         IDEOGRAPHIC SPACE
3001..3003;W     # Po     [3] IDEOGRAPHIC COMMA..DITTO MARK
302A..302D;W     # Mn     [4] IDEOGRAPHIC LEVEL TONE MARK..IDEOGRAPHIC ENTERING TONE MARK
4E00..9FFF;W     # Lo [20992] CJK UNIFIED IDEOGRAPH-4E00..CJK UNIFIED IDEOGRAPH-9FFF

# EOF
";

    fn sample_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("ucd-tables-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(UNICODE_DATA), UNICODE_DATA_SAMPLE).unwrap();
        fs::write(dir.join(EAST_ASIAN_WIDTH), EAST_ASIAN_WIDTH_SAMPLE).unwrap();
        dir
    }

    fn compile(strict: bool) -> Result<Vec<WidthInterval>> {
        let policy = WidthPolicy::standard();
        let categories =
            build_category_table(UNICODE_DATA_SAMPLE.lines(), &CategoryExpansion::tr44())?;
        let widths = build_width_table(EAST_ASIAN_WIDTH_SAMPLE.lines(), &policy.width_filter())?;
        compile_width_table(&categories, &widths, &policy, strict)
    }

    #[test]
    fn test_compile_width_table() {
        let row = |low, high, widths| WidthInterval::new(Interval::new(low, high), widths);
        assert_eq!(
            compile(true).unwrap(),
            [
                row(0xA1, 0xA1, ColumnWidths::AMBIGUOUS),
                row(0x300, 0x301, ColumnWidths::ZERO),
                row(0x488, 0x488, ColumnWidths::ZERO),
                row(0x1100, 0x115F, ColumnWidths::WIDE),
                row(0x1160, 0x11FF, ColumnWidths::ZERO),
                row(0x3000, 0x3003, ColumnWidths::WIDE),
                row(0x302A, 0x302A, ColumnWidths::ZERO),
                row(0x4E00, 0x9FFF, ColumnWidths::WIDE),
            ]
        );
    }

    #[test]
    fn test_strict_rejects_overlaps() {
        let policy = WidthPolicy::standard();
        let categories = CategoryIntervals::default();
        let widths = build_width_table(["1150..1170;W # Lo"], &policy.width_filter()).unwrap();

        let table = compile_width_table(&categories, &widths, &policy, false).unwrap();
        assert_eq!(table.len(), 2);

        let err = compile_width_table(&categories, &widths, &policy, true).unwrap_err();
        assert!(matches!(
            err,
            Error::InvariantViolation { stage: Stage::Classification, code_point: Some(0x1160), .. }
        ));
    }

    #[test]
    fn test_empty_sources_are_empty_input() {
        let policy = WidthPolicy { zero_width_ranges: vec![], ..WidthPolicy::standard() };
        let err = compile_width_table(
            &CategoryIntervals::default(),
            &WidthIntervals::default(),
            &policy,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyInput { stage: Stage::Optimizer }));
    }

    #[test]
    fn test_run_from_directory() {
        let dir = sample_dir("widths");
        let mut config = Config::new(Command::Widths);
        config.ucd_dir = Some(dir.clone());
        let out = run(&config).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert!(out.contains("8 intervals of code point widths"));
        assert!(out.contains("std::array<std::tuple<uint32_t, uint32_t, uint8_t, uint8_t>, 8>"));
        assert!(out.contains("{0x9FFF, 0x4E00, 2, 2},"));
        assert!(!out.contains("0xAD"));
    }

    #[test]
    fn test_run_category_from_directory() {
        let dir = sample_dir("category");
        let mut config = Config::new(Command::Category(GeneralCategory::L));
        config.ucd_dir = Some(dir.clone());
        let out = run(&config).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert!(out.contains("unicode_gc_l_table"));
        assert!(out.contains("{0x41, 0x42}, {0x1100, 0x1101}, {0x4E00, 0x9FFF},"));
    }

    #[test]
    fn test_run_missing_directory_is_retrieval_error() {
        let mut config = Config::new(Command::Widths);
        config.ucd_dir = Some(std::env::temp_dir().join("ucd-tables-no-such-dir"));
        assert!(matches!(run(&config).unwrap_err(), Error::Retrieval { .. }));
    }
}
