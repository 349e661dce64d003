// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

pub const KILO: u64 = 1000;
pub const MEGA: u64 = 1000 * 1000;
pub const GIGA: u64 = 1000 * 1000 * 1000;

pub const KIBI: u64 = 1024;
pub const MEBI: u64 = 1024 * 1024;

/// Formats a byte count with a metric suffix and one decimal, e.g. `1.9MB`.
pub struct MetricFormatter(pub u64);

impl fmt::Display for MetricFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        let (unit, suffix) = match value {
            GIGA.. => (GIGA, "GB"),
            MEGA.. => (MEGA, "MB"),
            KILO.. => (KILO, "kB"),
            _ => return write!(f, "{value}B"),
        };
        let tenths = value * 10 / unit;
        write!(f, "{}.{}{suffix}", tenths / 10, tenths % 10)
    }
}
