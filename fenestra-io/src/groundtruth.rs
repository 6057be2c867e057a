//! Ground-truth files in ivecs layout: records of a little-endian `u32`
//! count followed by that many little-endian `u32` neighbour ids, repeated
//! until end of file.

use std::{fs, path::Path};

use crate::error::DatasetError;

const WORD: usize = 4;

/// Reads every ground-truth record.
///
/// # Errors
/// Returns [`DatasetError::Truncated`] when the file ends inside a record.
pub fn read_ground_truth(path: impl AsRef<Path>) -> Result<Vec<Vec<u32>>, DatasetError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    let mut offset = 0_usize;
    while offset < bytes.len() {
        if bytes.len() - offset < WORD {
            return Err(DatasetError::Truncated {
                path: path.to_path_buf(),
                expected: offset + WORD,
                actual: bytes.len(),
            });
        }
        let count = read_u32_le(&bytes, offset) as usize;
        offset += WORD;
        let record_bytes = count * WORD;
        if bytes.len() - offset < record_bytes {
            return Err(DatasetError::Truncated {
                path: path.to_path_buf(),
                expected: offset + record_bytes,
                actual: bytes.len(),
            });
        }
        let record = bytes[offset..offset + record_bytes]
            .chunks_exact(WORD)
            .map(|word| {
                let word: [u8; WORD] = word.try_into().expect("chunk is exactly four bytes");
                u32::from_le_bytes(word)
            })
            .collect();
        offset += record_bytes;
        records.push(record);
    }
    Ok(records)
}

/// Writes ground-truth records in ivecs layout.
///
/// # Errors
/// Returns [`DatasetError::Io`] on filesystem failures.
pub fn write_ground_truth(
    path: impl AsRef<Path>,
    records: &[Vec<u32>],
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    for record in records {
        bytes.extend_from_slice(&(record.len() as u32).to_le_bytes());
        for id in record {
            bytes.extend_from_slice(&id.to_le_bytes());
        }
    }
    fs::write(path, bytes).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let word: [u8; WORD] = bytes[offset..offset + WORD]
        .try_into()
        .expect("slice is exactly four bytes");
    u32::from_le_bytes(word)
}
