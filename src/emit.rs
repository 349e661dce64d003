// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Renders finished tables as C++ or Rust array declarations.

use std::fmt::Write as _;

use indoc::writedoc;

use crate::category::GeneralCategory;
use crate::interval::{ColumnWidths, Interval, WidthInterval};

const ROWS_PER_LINE: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Cpp,
    Rust,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub lang: Language,
    /// C++: prefix the declaration with `static`. Rust: `static` instead of `const`.
    pub static_storage: bool,
    /// C++: `T name[]` instead of `std::array<T, N>`. Rust: `&[T]` instead of `[T; N]`.
    pub raw_array: bool,
    pub element_type: Option<String>,
    pub name: Option<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            lang: Language::Cpp,
            static_storage: true,
            raw_array: false,
            element_type: None,
            name: None,
        }
    }
}

/// Renders the width table. Rows are keyed by their upper bound, so a lower-bound
/// search over the first element lands on the only row that can contain a code point:
/// `{high, low, default width, East Asian width}`.
pub fn emit_width_table(table: &[WidthInterval], version: &str, options: &EmitOptions) -> String {
    let rows: Vec<String> = table
        .iter()
        .map(|w| {
            let (high, low) = (w.high, w.low);
            let ColumnWidths { default, east_asian } = w.widths;
            match options.lang {
                Language::Cpp => format!("{{0x{high:X}, 0x{low:X}, {default}, {east_asian}}}"),
                Language::Rust => format!("(0x{high:X}, 0x{low:X}, {default}, {east_asian})"),
            }
        })
        .collect();

    let (element_type, name) = match options.lang {
        Language::Cpp => ("std::tuple<uint32_t, uint32_t, uint8_t, uint8_t>", "unicode_eaw_table"),
        Language::Rust => ("(u32, u32, u8, u8)", "UNICODE_EAW_TABLE"),
    };

    render(&rows, version, "code point widths", element_type, name, options)
}

/// Renders the intervals of one general category as `{low, high}` pairs.
pub fn emit_category_table(
    category: GeneralCategory,
    table: &[Interval],
    version: &str,
    options: &EmitOptions,
) -> String {
    let rows: Vec<String> = table
        .iter()
        .map(|iv| match options.lang {
            Language::Cpp => format!("{{0x{:X}, 0x{:X}}}", iv.low, iv.high),
            Language::Rust => format!("(0x{:X}, 0x{:X})", iv.low, iv.high),
        })
        .collect();

    let (element_type, name) = match options.lang {
        Language::Cpp => (
            "std::pair<uint32_t, uint32_t>",
            format!("unicode_gc_{}_table", category.as_str().to_lowercase()),
        ),
        Language::Rust => {
            ("(u32, u32)", format!("UNICODE_GC_{}_TABLE", category.as_str().to_uppercase()))
        }
    };

    let description = format!("general category {category}");
    render(&rows, version, &description, element_type, &name, options)
}

fn render(
    rows: &[String],
    version: &str,
    description: &str,
    default_element_type: &str,
    default_name: &str,
    options: &EmitOptions,
) -> String {
    let element_type = options.element_type.as_deref().unwrap_or(default_element_type);
    let name = options.name.as_deref().unwrap_or(default_name);
    let mut buf = String::new();

    _ = writedoc!(
        buf,
        "
        // BEGIN: Generated by ucd-tables on {}, {} intervals of {}
        // This table was generated from Unicode Character Database version {version}
        // https://www.unicode.org/Public/{version}/
        ",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        rows.len(),
        description,
    );

    let close = match options.lang {
        Language::Cpp => {
            let storage = if options.static_storage { "static " } else { "" };
            if options.raw_array {
                _ = write!(buf, "{storage}const {element_type} {name}[] = {{");
                "};"
            } else {
                _ = write!(
                    buf,
                    "{storage}const std::array<{element_type}, {}> {name} = {{{{",
                    rows.len()
                );
                "}};"
            }
        }
        Language::Rust => {
            let storage = if options.static_storage { "static" } else { "const" };
            buf.push_str("#[rustfmt::skip]\n");
            if options.raw_array {
                _ = write!(buf, "pub {storage} {name}: &[{element_type}] = &[");
            } else {
                _ = write!(buf, "pub {storage} {name}: [{element_type}; {}] = [", rows.len());
            }
            "];"
        }
    };

    for (i, row) in rows.iter().enumerate() {
        if i % ROWS_PER_LINE == 0 {
            buf.push_str("\n   ");
        }
        _ = write!(buf, " {row},");
    }
    buf.push('\n');
    buf.push_str(close);
    buf.push_str("\n// END: Generated by ucd-tables\n");
    buf
}
