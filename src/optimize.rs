// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::apperr::{Error, Result, Stage};
use crate::interval::WidthInterval;

/// Sorts the table by lower bound and merges touching rows with identical widths.
///
/// The sort is stable, so rows sharing a lower bound keep the order the rules produced them in.
/// Overlapping rows are left as they are.
pub fn optimize(mut table: Vec<WidthInterval>) -> Result<Vec<WidthInterval>> {
    if table.is_empty() {
        return Err(Error::EmptyInput { stage: Stage::Optimizer });
    }

    table.sort_by_key(|w| w.low);

    let mut out = Vec::with_capacity(table.len());
    let mut rows = table.into_iter();
    let Some(mut current) = rows.next() else {
        return Err(Error::EmptyInput { stage: Stage::Optimizer });
    };

    for next in rows {
        if current.high.checked_add(1) == Some(next.low) && current.widths == next.widths {
            current.high = next.high;
        } else {
            out.push(current);
            current = next;
        }
    }
    out.push(current);

    log::debug!("optimized into {} intervals", out.len());
    Ok(out)
}
