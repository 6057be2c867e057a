//! Attribute files: one float per line, line `i` tagging corpus point `i`.

use std::{fs, path::Path};

use crate::error::DatasetError;

/// Reads an attribute file.
///
/// # Errors
/// Returns [`DatasetError::InvalidFloat`] with the 1-based line number when
/// a line is empty, unparsable, or carries more than one token.
pub fn read_attributes(path: impl AsRef<Path>) -> Result<Vec<f32>, DatasetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let mut tokens = line.split_whitespace();
        let value = tokens
            .next()
            .and_then(|token| token.parse::<f32>().ok())
            .ok_or(DatasetError::InvalidFloat {
                path: path.to_path_buf(),
                line: line_number,
            })?;
        if tokens.next().is_some() {
            return Err(DatasetError::InvalidFloat {
                path: path.to_path_buf(),
                line: line_number,
            });
        }
        values.push(value);
    }
    Ok(values)
}

/// Writes an attribute file, one value per line.
///
/// # Errors
/// Returns [`DatasetError::Io`] on filesystem failures.
pub fn write_attributes(path: impl AsRef<Path>, values: &[f32]) -> Result<(), DatasetError> {
    let path = path.as_ref();
    let mut text = String::new();
    for value in values {
        text.push_str(&format!("{value}\n"));
    }
    fs::write(path, text).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
