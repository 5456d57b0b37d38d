//! Splits a markdown file into its YAML header and body and decodes the
//! header into a [`Document`].
//!
//! ```text
//! ---
//! id: getting-started
//! title: Getting Started
//! order: 1
//! ---
//! Intro text.
//! ```

use std::path::Path;

use crate::{error::AppError, storage::types::document::Document};

pub const DELIMITER: &str = "---";

/// The three segments of a frontmatter file. Only the first two delimiter
/// lines are significant; later ones belong to the body.
#[derive(Debug, PartialEq, Eq)]
struct Segments<'a> {
    header: &'a str,
    body: &'a str,
}

fn split_segments(raw: &str) -> Option<Segments<'_>> {
    let mut header_start = None;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        let line_end = offset + line.len();
        if line.trim() == DELIMITER {
            match header_start {
                None => header_start = Some(line_end),
                Some(start) => {
                    return Some(Segments {
                        header: raw.get(start..offset)?,
                        body: raw.get(line_end..)?,
                    });
                }
            }
        }
        offset = line_end;
    }

    None
}

/// Decodes one file. `source` only appears in error messages.
pub fn parse_document(raw: &str, source: &Path) -> Result<Document, AppError> {
    let segments = split_segments(raw).ok_or_else(|| AppError::MalformedDocument {
        path: source.to_path_buf(),
    })?;

    let header = segments.header.trim();
    let mut document: Document = if header.is_empty() {
        Document::default()
    } else {
        serde_yaml::from_str(header).map_err(|source_err| AppError::HeaderDecode {
            path: source.to_path_buf(),
            source: source_err,
        })?
    };

    document.content = segments.body.trim().to_string();

    Ok(document)
}
