//! On-disk UX knowledge base
//!
//! Plain text and markdown documents are loaded once at startup and searched
//! with a case-insensitive substring match.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const PREVIEW_CHARS: usize = 200;

/// A loaded document
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub kind: DocumentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Markdown,
    Text,
}

/// A document matching a search query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub document: String,
    pub title: String,
    /// Number of occurrences of the query in the document
    pub relevance: usize,
    pub preview: String,
}

/// Overview returned by the agent listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeSummary {
    pub total_documents: usize,
    pub documents: Vec<String>,
    pub types: Vec<DocumentKind>,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    documents: BTreeMap<String, Document>,
}

impl KnowledgeBase {
    /// An empty knowledge base
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `.md` and `.txt` file directly inside `dir`.
    ///
    /// Unreadable files are skipped with a warning; a missing directory yields
    /// an empty knowledge base.
    pub fn load(dir: &Path) -> Self {
        let mut base = Self::default();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Knowledge directory not readable");
                return base;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let kind = match path.extension().and_then(|e| e.to_str()) {
                Some("md") => DocumentKind::Markdown,
                Some("txt") => DocumentKind::Text,
                _ => continue,
            };
            let Some(title) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match fs::read_to_string(&path) {
                Ok(content) => {
                    base.insert(title, content.trim(), kind);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping knowledge document"),
            }
        }

        info!(documents = base.len(), dir = %dir.display(), "Knowledge base loaded");
        base
    }

    /// Add or replace a document
    pub fn insert(&mut self, title: &str, content: &str, kind: DocumentKind) {
        self.documents.insert(
            title.to_string(),
            Document {
                title: title.to_string(),
                content: content.to_string(),
                kind,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Documents containing `query`, most occurrences first
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = self
            .documents
            .iter()
            .filter_map(|(id, doc)| {
                let relevance = doc.content.to_lowercase().matches(query.as_str()).count();
                (relevance > 0).then(|| SearchResult {
                    document: id.clone(),
                    title: doc.title.clone(),
                    relevance,
                    preview: preview(&doc.content),
                })
            })
            .collect();

        // Stable sort keeps title order among equal scores
        results.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        results.truncate(max_results);
        results
    }

    pub fn summary(&self) -> KnowledgeSummary {
        let mut types: Vec<DocumentKind> = Vec::new();
        for doc in self.documents.values() {
            if !types.contains(&doc.kind) {
                types.push(doc.kind);
            }
        }

        KnowledgeSummary {
            total_documents: self.documents.len(),
            documents: self.documents.keys().cloned().collect(),
            types,
        }
    }
}

fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeBase {
        let mut base = KnowledgeBase::empty();
        base.insert(
            "job-stories",
            "A job story starts with a situation. Every job story ends with an outcome.",
            DocumentKind::Markdown,
        );
        base.insert("personas", "Personas describe users.", DocumentKind::Text);
        base.insert(
            "journeys",
            "Journey maps follow the user. A job story can seed one.",
            DocumentKind::Text,
        );
        base
    }

    #[test]
    fn test_search_ranks_by_occurrences() {
        let results = sample().search("Job Story", 5);
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["job-stories", "journeys"]);
        assert_eq!(results[0].relevance, 2);
    }

    #[test]
    fn test_search_limits_results() {
        assert_eq!(sample().search("job story", 1).len(), 1);
        assert!(sample().search("wireframe", 3).is_empty());
        assert!(sample().search("   ", 3).is_empty());
    }

    #[test]
    fn test_preview_is_truncated() {
        let mut base = KnowledgeBase::empty();
        let long = "é".repeat(250);
        base.insert("long", &long, DocumentKind::Text);

        let result = &base.search("é", 1)[0];
        assert_eq!(result.preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(result.preview.ends_with("..."));
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.total_documents, 3);
        assert_eq!(summary.documents, vec!["job-stories", "journeys", "personas"]);
        assert!(summary.types.contains(&DocumentKind::Markdown));
        assert!(summary.types.contains(&DocumentKind::Text));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("flows.md"), "# Flows\nA user flow maps steps.").unwrap();
        fs::write(dir.path().join("notes.txt"), "Usability notes").unwrap();
        fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();

        let base = KnowledgeBase::load(dir.path());
        assert_eq!(base.len(), 2);
        assert_eq!(base.document("flows").unwrap().kind, DocumentKind::Markdown);
        assert!(base.document("image").is_none());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let base = KnowledgeBase::load(Path::new("/definitely/not/here"));
        assert!(base.is_empty());
    }
}
