use serde::Serialize;

use crate::storage::types::document::Document;

pub const MIN_QUERY_CHARS: usize = 2;

/// Characters of body text kept on each side of a content match.
const SNIPPET_RADIUS: usize = 60;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Title,
    Function,
    Description,
    Content,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub doc_id: String,
    pub title: String,
    pub match_type: MatchType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip)]
    order: i32,
}

impl SearchHit {
    fn new(doc: &Document, match_type: MatchType) -> Self {
        Self {
            doc_type: doc.doc_type.clone(),
            doc_id: doc.id.clone(),
            title: doc.title.clone(),
            match_type,
            function_name: None,
            function_signature: None,
            snippet: None,
            order: doc.order,
        }
    }
}

/// Case-insensitive search over titles, function records, descriptions and
/// body text. A document contributes at most one title, description and
/// content hit, plus one hit per matching function. Hits are ranked by match
/// type, then document order, then id.
pub fn search_documents<'a, I>(documents: I, query: &str, limit: usize) -> Vec<SearchHit>
where
    I: IntoIterator<Item = &'a Document>,
{
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for doc in documents {
        if doc.title.to_lowercase().contains(&needle) {
            hits.push(SearchHit::new(doc, MatchType::Title));
        }

        for function in &doc.function_data {
            if function.name.to_lowercase().contains(&needle)
                || function.description.to_lowercase().contains(&needle)
            {
                let mut hit = SearchHit::new(doc, MatchType::Function);
                hit.function_name = Some(function.name.clone());
                hit.function_signature =
                    Some(function.signature.clone()).filter(|sig| !sig.is_empty());
                hit.snippet = Some(function.description.clone()).filter(|d| !d.is_empty());
                hits.push(hit);
            }
        }

        if let Some(description) = doc
            .description
            .as_deref()
            .filter(|d| d.to_lowercase().contains(&needle))
        {
            let mut hit = SearchHit::new(doc, MatchType::Description);
            hit.snippet = Some(description.to_string());
            hits.push(hit);
        }

        if let Some(snippet) = snippet_around(&doc.content, &needle) {
            let mut hit = SearchHit::new(doc, MatchType::Content);
            hit.snippet = Some(snippet);
            hits.push(hit);
        }
    }

    hits.sort_by(|a, b| {
        a.match_type
            .cmp(&b.match_type)
            .then_with(|| a.order.cmp(&b.order))
            .then_with(|| a.doc_type.cmp(&b.doc_type))
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    hits.truncate(limit);
    hits
}

/// A window of `text` around the first occurrence of `needle` (already
/// lowercased), on char boundaries, with ellipses where it was cut.
fn snippet_around(text: &str, needle: &str) -> Option<String> {
    // Same folding as the needle, so a title match implies a body match.
    let lowered = text.to_lowercase();
    let match_start = lowered.find(needle)?;
    let match_end = match_start.saturating_add(needle.len());

    // Byte offset in `lowered` where each char of `text` begins. Context
    // sensitive folds (final sigma) keep their byte length.
    let mut offsets = Vec::with_capacity(text.len());
    let mut offset = 0usize;
    for c in text.chars() {
        offsets.push(offset);
        offset = offset.saturating_add(c.to_lowercase().map(char::len_utf8).sum::<usize>());
    }
    let first = offsets
        .partition_point(|&o| o <= match_start)
        .saturating_sub(1);
    let last = offsets.partition_point(|&o| o < match_end);

    let chars: Vec<char> = text.chars().collect();
    let from = first.saturating_sub(SNIPPET_RADIUS);
    let to = last.saturating_add(SNIPPET_RADIUS).min(chars.len());

    let mut snippet: String = chars.get(from..to)?.iter().collect();
    snippet = snippet.split_whitespace().collect::<Vec<_>>().join(" ");
    if from > 0 {
        snippet.insert_str(0, "...");
    }
    if to < chars.len() {
        snippet.push_str("...");
    }
    Some(snippet)
}
