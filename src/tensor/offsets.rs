//! Offsets for variable-length segments such as discrete action branches.

use std::ops::Range;

use crate::error::{Error, Result};

/// Cumulative sum with a leading zero.
///
/// `result[0] == 0` and `result[i]` is the sum of `sizes[..i]`, so the output
/// is one element longer than the input. Totals are accumulated in `i64`,
/// which cannot overflow for any realistic number of `i32` sizes.
///
/// ```
/// use pixel_tensor::prefix_sum;
///
/// assert_eq!(prefix_sum(&[]), vec![0]);
/// assert_eq!(prefix_sum(&[5, 3, 2]), vec![0, 5, 8, 10]);
/// ```
#[must_use]
pub fn prefix_sum(sizes: &[i32]) -> Vec<i64> {
    let mut offsets = Vec::with_capacity(sizes.len() + 1);
    offsets.push(0);

    let mut total = 0_i64;
    offsets.extend(sizes.iter().map(|&size| {
        total += i64::from(size);
        total
    }));

    offsets
}

/// Half-open index range of every segment.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if any size is negative or the total
/// does not fit in `usize`.
pub fn segment_ranges(sizes: &[i32]) -> Result<Vec<Range<usize>>> {
    if let Some((index, size)) = sizes.iter().enumerate().find(|(_, size)| **size < 0) {
        return Err(Error::InvalidParameter {
            name: format!("sizes[{index}]"),
            reason: format!("segment size must not be negative, got {size}"),
        });
    }

    let to_index = |offset: i64| {
        usize::try_from(offset).map_err(|_| Error::InvalidParameter {
            name: "sizes".to_string(),
            reason: format!("offset {offset} does not fit in usize"),
        })
    };

    prefix_sum(sizes)
        .windows(2)
        .map(|pair| -> Result<Range<usize>> { Ok(to_index(pair[0])?..to_index(pair[1])?) })
        .collect()
}

/// Split a flat buffer into consecutive segments of the given sizes.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for negative sizes and
/// [`Error::ShapeMismatch`] if the sizes do not add up to `data.len()`.
pub fn split_segments<'a, T>(data: &'a [T], sizes: &[i32]) -> Result<Vec<&'a [T]>> {
    let ranges = segment_ranges(sizes)?;
    let total = ranges.last().map_or(0, |range| range.end);

    if total != data.len() {
        return Err(Error::ShapeMismatch {
            expected: format!("{total} elements"),
            actual: format!("{} elements", data.len()),
        });
    }

    Ok(ranges.into_iter().map(|range| &data[range]).collect())
}
