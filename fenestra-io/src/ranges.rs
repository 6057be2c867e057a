//! Query-range files: one `lo-hi` interval per line.
//!
//! The separator is the first `-` (scanning from the second character) that
//! splits the line into two parsable floats, so negative bounds such as
//! `-5--1` and exponents such as `1e-3-2e-3` both parse.

use std::{fs, path::Path};

use crate::error::DatasetError;

/// Reads a query-range file into `(lo, hi)` pairs.
///
/// # Errors
/// Returns [`DatasetError::MissingSeparator`] when no split yields two
/// floats and [`DatasetError::RangeOrder`] when `lo > hi`, both with the
/// 1-based line number.
pub fn read_ranges(path: impl AsRef<Path>) -> Result<Vec<(f32, f32)>, DatasetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut ranges = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        let (lo, hi) = split_range(trimmed).ok_or(DatasetError::MissingSeparator {
            path: path.to_path_buf(),
            line: line_number,
        })?;
        if lo > hi {
            return Err(DatasetError::RangeOrder {
                path: path.to_path_buf(),
                line: line_number,
            });
        }
        ranges.push((lo, hi));
    }
    Ok(ranges)
}

/// Writes a query-range file, one `lo-hi` pair per line.
///
/// # Errors
/// Returns [`DatasetError::Io`] on filesystem failures.
pub fn write_ranges(path: impl AsRef<Path>, ranges: &[(f32, f32)]) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let mut text = String::new();
    for (lo, hi) in ranges {
        text.push_str(&format!("{lo}-{hi}\n"));
    }
    fs::write(path, text).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn split_range(line: &str) -> Option<(f32, f32)> {
    for (position, byte) in line.bytes().enumerate().skip(1) {
        if byte != b'-' {
            continue;
        }
        let lo = line[..position].parse::<f32>();
        let hi = line[position + 1..].parse::<f32>();
        if let (Ok(lo), Ok(hi)) = (lo, hi) {
            return Some((lo, hi));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("ranges.csv");
        fs::write(&path, contents).expect("write fixture");
        (dir, path)
    }

    #[rstest]
    #[case::plain("1.5-2.5", (1.5, 2.5))]
    #[case::both_negative("-5--1", (-5.0, -1.0))]
    #[case::negative_lo("-2.5-3", (-2.5, 3.0))]
    #[case::exponents("1e-3-2e-3", (1e-3, 2e-3))]
    #[case::equal_bounds("7-7", (7.0, 7.0))]
    fn parses_separator_variants(#[case] line: &str, #[case] expected: (f32, f32)) {
        let (_dir, path) = write_fixture(&format!("{line}\n"));
        let ranges = read_ranges(&path).expect("read must succeed");
        assert_eq!(ranges, vec![expected]);
    }

    #[rstest]
    #[case::no_separator("1.5 2.5")]
    #[case::one_value("3.0")]
    #[case::garbage("abc-def")]
    fn rejects_unsplittable_lines(#[case] line: &str) {
        let (_dir, path) = write_fixture(&format!("{line}\n"));
        let err = read_ranges(&path).expect_err("bad line must fail");
        assert!(matches!(err, DatasetError::MissingSeparator { line: 1, .. }));
    }

    #[test]
    fn rejects_reversed_bounds() {
        let (_dir, path) = write_fixture("1-2\n9-3\n");
        let err = read_ranges(&path).expect_err("reversed bounds must fail");
        assert!(matches!(err, DatasetError::RangeOrder { line: 2, .. }));
    }

    #[test]
    fn round_trip_preserves_ranges() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("ranges.csv");
        let ranges = vec![(-5.0, -1.0), (0.5, 99.5)];
        write_ranges(&path, &ranges).expect("write must succeed");
        assert_eq!(read_ranges(&path).expect("read must succeed"), ranges);
    }
}
