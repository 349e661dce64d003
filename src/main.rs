// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, bail};
use ucd_tables::category::GeneralCategory;
use ucd_tables::config::{Command, Config};
use ucd_tables::emit::Language;
use ucd_tables::pipeline;

const HELP: &str = "\
Usage: ucd-tables [options...] <eaw | gc CATEGORY>
  eaw                   Display widths from UnicodeData.txt and EastAsianWidth.txt
  gc CATEGORY           Intervals of a general category, e.g. Lu or L
  -h, --help            Prints help information
  --ucd-version=<VER>   UCD release to download (default: 14.0.0)
  --ucd-dir=<DIR>       Read UnicodeData.txt and EastAsianWidth.txt from DIR instead
  --lang=<cpp|rust>     Output language (default: cpp)
  --no-static           Omit the static qualifier (Rust: emit a const)
  --raw-array           C++: T name[] instead of std::array. Rust: a slice
  -t, --element-type=<TYPE>
                        Element type of the emitted array
  -n, --name=<NAME>     Name of the emitted array
  --strict              Fail if the width table contains overlapping intervals

Logging is controlled via RUST_LOG (default: info).
";

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        eprint!("{HELP}");
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = Config::new(Command::Widths);
    if let Some(version) = args.opt_value_from_str::<_, String>("--ucd-version")? {
        config.version = version;
    }
    config.ucd_dir = args
        .opt_value_from_os_str("--ucd-dir", |s| -> Result<PathBuf, &'static str> { Ok(s.into()) })?;
    config.strict = args.contains("--strict");

    let emit = &mut config.emit;
    if let Some(lang) = args.opt_value_from_fn("--lang", |arg| match arg {
        "cpp" => Ok(Language::Cpp),
        "rust" => Ok(Language::Rust),
        l => bail!("invalid language: \"{}\"", l),
    })? {
        emit.lang = lang;
    }
    // `--static` and `--std-array` are the defaults and only accepted for symmetry.
    let force_static = args.contains("--static");
    emit.static_storage = force_static || !args.contains("--no-static");
    let force_std_array = args.contains("--std-array");
    emit.raw_array = !force_std_array && args.contains("--raw-array");
    emit.element_type = args.opt_value_from_str(["-t", "--element-type"])?;
    emit.name = args.opt_value_from_str(["-n", "--name"])?;

    let command: String = args.free_from_str().context("missing command, see --help")?;
    config.command = match command.as_str() {
        "eaw" => Command::Widths,
        "gc" => {
            let category: String =
                args.free_from_str().context("missing general category, see --help")?;
            match GeneralCategory::parse(&category) {
                Some(c) => Command::Category(c),
                None => bail!("unknown general category: \"{}\"", category),
            }
        }
        c => bail!("unknown command: \"{}\"", c),
    };

    let arg_remaining = args.finish();
    if !arg_remaining.is_empty() {
        bail!("unrecognized arguments: {:?}", arg_remaining);
    }

    let buf = pipeline::run(&config)
        .with_context(|| format!("failed to build the table from UCD {}", config.version))?;
    std::io::stdout().write_all(buf.as_bytes())?;
    Ok(())
}
