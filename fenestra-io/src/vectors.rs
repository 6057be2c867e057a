//! Binary vector files.
//!
//! The benchmark `.bin` layout is a header of two little-endian `u32` values
//! (`count`, then `dim`) followed by `count * dim` little-endian `f32`
//! values, row-major, with no trailer. The fvecs layout repeats
//! `dim: u32` + `dim` floats per record and is only read by the converter.

use std::{fs, path::Path};

use crate::error::DatasetError;

const HEADER_BYTES: usize = 8;
const WORD: usize = 4;

/// A fully loaded vector file: `count` rows of `dim` floats.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorSet {
    /// Number of rows.
    pub count: usize,
    /// Floats per row.
    pub dim: usize,
    /// Row-major values, `count * dim` long.
    pub values: Vec<f32>,
}

impl VectorSet {
    /// Borrows row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }
}

/// Reads a `.bin` vector file.
///
/// # Errors
/// Returns [`DatasetError::Io`] on filesystem failures,
/// [`DatasetError::Header`] when fewer than eight bytes exist, and
/// [`DatasetError::Truncated`] when the payload falls short of the header's
/// promise. Trailing bytes beyond the payload are ignored.
pub fn read_vector_set(path: impl AsRef<Path>) -> Result<VectorSet, DatasetError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.len() < HEADER_BYTES {
        return Err(DatasetError::Header {
            path: path.to_path_buf(),
        });
    }
    let count = read_u32_le(&bytes, 0) as usize;
    let dim = read_u32_le(&bytes, WORD) as usize;
    let expected = HEADER_BYTES + count * dim * WORD;
    if bytes.len() < expected {
        return Err(DatasetError::Truncated {
            path: path.to_path_buf(),
            expected,
            actual: bytes.len(),
        });
    }
    let values = bytes[HEADER_BYTES..expected]
        .chunks_exact(WORD)
        .map(read_f32_le)
        .collect();
    Ok(VectorSet { count, dim, values })
}

/// Writes a `.bin` vector file.
///
/// # Errors
/// Returns [`DatasetError::WriteShape`] when `values.len() != count * dim`
/// and [`DatasetError::Io`] on filesystem failures.
pub fn write_vector_set(
    path: impl AsRef<Path>,
    count: usize,
    dim: usize,
    values: &[f32],
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    if values.len() != count * dim {
        return Err(DatasetError::WriteShape {
            path: path.to_path_buf(),
            values: values.len(),
            count,
            dim,
        });
    }
    let mut bytes = Vec::with_capacity(HEADER_BYTES + values.len() * WORD);
    bytes.extend_from_slice(&(count as u32).to_le_bytes());
    bytes.extend_from_slice(&(dim as u32).to_le_bytes());
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    fs::write(path, bytes).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an fvecs file: repeated `dim` + `dim` floats records.
///
/// # Errors
/// Returns [`DatasetError::Truncated`] when a record is cut short and
/// [`DatasetError::FvecsDimension`] when a record's dimension differs from
/// the first record's.
pub fn read_fvecs(path: impl AsRef<Path>) -> Result<VectorSet, DatasetError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = Vec::new();
    let mut dim = 0_usize;
    let mut count = 0_usize;
    let mut offset = 0_usize;
    while offset < bytes.len() {
        if bytes.len() - offset < WORD {
            return Err(DatasetError::Truncated {
                path: path.to_path_buf(),
                expected: offset + WORD,
                actual: bytes.len(),
            });
        }
        let record_dim = read_u32_le(&bytes, offset) as usize;
        offset += WORD;
        if count == 0 {
            dim = record_dim;
        } else if record_dim != dim {
            return Err(DatasetError::FvecsDimension {
                path: path.to_path_buf(),
                record: count + 1,
                expected: dim,
                got: record_dim,
            });
        }
        let record_bytes = record_dim * WORD;
        if bytes.len() - offset < record_bytes {
            return Err(DatasetError::Truncated {
                path: path.to_path_buf(),
                expected: offset + record_bytes,
                actual: bytes.len(),
            });
        }
        values.extend(bytes[offset..offset + record_bytes].chunks_exact(WORD).map(read_f32_le));
        offset += record_bytes;
        count += 1;
    }
    Ok(VectorSet { count, dim, values })
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let word: [u8; WORD] = bytes[offset..offset + WORD]
        .try_into()
        .expect("slice is exactly four bytes");
    u32::from_le_bytes(word)
}

fn read_f32_le(word: &[u8]) -> f32 {
    let word: [u8; WORD] = word.try_into().expect("chunk is exactly four bytes");
    f32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bin_round_trip_preserves_rows() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("vectors.bin");
        let values = vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        write_vector_set(&path, 3, 2, &values).expect("write must succeed");

        let set = read_vector_set(&path).expect("read must succeed");
        assert_eq!(set.count, 3);
        assert_eq!(set.dim, 2);
        assert_eq!(set.row(1), &[3.0, 4.0]);
        assert_eq!(set.values, values);
    }

    #[test]
    fn short_header_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("short.bin");
        fs::write(&path, [1_u8, 0, 0]).expect("write fixture");
        let err = read_vector_set(&path).expect_err("short file must fail");
        assert!(matches!(err, DatasetError::Header { .. }));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("truncated.bin");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2_u32.to_le_bytes());
        bytes.extend_from_slice(&3_u32.to_le_bytes());
        bytes.extend_from_slice(&1.0_f32.to_le_bytes());
        fs::write(&path, bytes).expect("write fixture");

        let err = read_vector_set(&path).expect_err("truncated file must fail");
        assert!(matches!(
            err,
            DatasetError::Truncated {
                expected: 32,
                actual: 12,
                ..
            }
        ));
    }

    #[test]
    fn write_rejects_mismatched_shape() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("bad.bin");
        let err = write_vector_set(&path, 2, 2, &[1.0, 2.0, 3.0])
            .expect_err("mismatched shape must fail");
        assert!(matches!(err, DatasetError::WriteShape { .. }));
    }

    #[test]
    fn fvecs_reads_consistent_records() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("vectors.fvecs");
        let mut bytes = Vec::new();
        for row in [[1.0_f32, 2.0], [3.0, 4.0]] {
            bytes.extend_from_slice(&2_u32.to_le_bytes());
            for value in row {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        fs::write(&path, bytes).expect("write fixture");

        let set = read_fvecs(&path).expect("read must succeed");
        assert_eq!(set.count, 2);
        assert_eq!(set.dim, 2);
        assert_eq!(set.values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn fvecs_rejects_dimension_drift() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("drift.fvecs");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1_u32.to_le_bytes());
        bytes.extend_from_slice(&1.0_f32.to_le_bytes());
        bytes.extend_from_slice(&2_u32.to_le_bytes());
        bytes.extend_from_slice(&1.0_f32.to_le_bytes());
        bytes.extend_from_slice(&2.0_f32.to_le_bytes());
        fs::write(&path, bytes).expect("write fixture");

        let err = read_fvecs(&path).expect_err("drifting dimension must fail");
        assert!(matches!(
            err,
            DatasetError::FvecsDimension {
                record: 2,
                expected: 1,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn empty_fvecs_is_an_empty_set() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("empty.fvecs");
        fs::write(&path, []).expect("write fixture");
        let set = read_fvecs(&path).expect("read must succeed");
        assert_eq!(set.count, 0);
        assert!(set.values.is_empty());
    }
}
