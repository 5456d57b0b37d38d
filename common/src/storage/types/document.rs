use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One documentation page, decoded from a markdown file with a YAML header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub order: i32,
    /// Only set for `packages` documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(rename = "functions", default, skip_serializing_if = "Vec::is_empty")]
    pub function_data: Vec<FunctionData>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionData {
    pub name: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub description: String,
}

impl Document {
    pub fn key(&self) -> DocumentKey {
        DocumentKey {
            language: self.language.clone(),
            doc_type: self.doc_type.clone(),
            id: self.id.clone(),
        }
    }

    /// Stamps the identity of `key` onto the document and returns the header
    /// fields that disagreed with it, as `(field, header value)` pairs.
    pub(crate) fn assign_key(&mut self, key: &DocumentKey) -> Vec<(&'static str, String)> {
        let mut conflicts = Vec::new();
        for (field, slot, wanted) in [
            ("language", &mut self.language, &key.language),
            ("type", &mut self.doc_type, &key.doc_type),
            ("id", &mut self.id, &key.id),
        ] {
            if !slot.is_empty() && !slot.eq_ignore_ascii_case(wanted) {
                conflicts.push((field, std::mem::take(slot)));
            }
            wanted.clone_into(slot);
        }
        conflicts
    }
}

/// A `(language, doc_type)` pair: one directory of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentScope {
    pub language: String,
    pub doc_type: String,
}

impl DocumentScope {
    pub fn new(language: &str, doc_type: &str) -> Result<Self, AppError> {
        Ok(Self {
            language: normalize_segment("language", language)?,
            doc_type: normalize_segment("document type", doc_type)?,
        })
    }

    pub fn key(&self, id: &str) -> Result<DocumentKey, AppError> {
        Ok(DocumentKey {
            language: self.language.clone(),
            doc_type: self.doc_type.clone(),
            id: normalize_segment("document id", id)?,
        })
    }

    pub fn contains(&self, key: &DocumentKey) -> bool {
        key.language == self.language && key.doc_type == self.doc_type
    }
}

impl fmt::Display for DocumentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.doc_type)
    }
}

/// Composite identity of a cached document. Every component is a lowercase
/// path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    pub language: String,
    pub doc_type: String,
    pub id: String,
}

impl DocumentKey {
    pub fn new(language: &str, doc_type: &str, id: &str) -> Result<Self, AppError> {
        DocumentScope::new(language, doc_type)?.key(id)
    }

    pub fn scope(&self) -> DocumentScope {
        DocumentScope {
            language: self.language.clone(),
            doc_type: self.doc_type.clone(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.language, self.doc_type, self.id)
    }
}

/// Lowercases a request segment and rejects anything that could escape its
/// directory once joined onto the data root.
pub fn normalize_segment(what: &str, raw: &str) -> Result<String, AppError> {
    let segment = raw.trim();
    if segment.is_empty() {
        return Err(AppError::Validation(format!("{what} must not be empty")));
    }
    if segment.starts_with('.')
        || segment
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(AppError::Validation(format!("invalid {what}: {raw}")));
    }
    Ok(segment.to_lowercase())
}
