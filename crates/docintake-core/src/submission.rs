use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::DocumentCategory;

/// Storage paths per category.
///
/// Always holds all twelve categories, empty lists included, so a stored
/// record never has a missing key. Paths within a category keep the order
/// they were pushed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<DocumentCategory, Vec<String>>")]
pub struct DocumentPaths(BTreeMap<DocumentCategory, Vec<String>>);

impl DocumentPaths {
    pub fn new() -> Self {
        Self(
            DocumentCategory::ALL
                .iter()
                .map(|c| (*c, Vec::new()))
                .collect(),
        )
    }

    pub fn push(&mut self, category: DocumentCategory, path: impl Into<String>) {
        self.0.entry(category).or_default().push(path.into());
    }

    pub fn get(&self, category: DocumentCategory) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All categories in fixed order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentCategory, &[String])> {
        self.0.iter().map(|(c, paths)| (*c, paths.as_slice()))
    }

    /// Categories that hold at least one path.
    pub fn non_empty(&self) -> impl Iterator<Item = (DocumentCategory, &[String])> {
        self.iter().filter(|(_, paths)| !paths.is_empty())
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for DocumentPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<DocumentCategory, Vec<String>>> for DocumentPaths {
    fn from(mut map: BTreeMap<DocumentCategory, Vec<String>>) -> Self {
        for c in DocumentCategory::ALL {
            map.entry(c).or_default();
        }
        Self(map)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub company_name: String,
    pub document_paths: DocumentPaths,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmission {
    pub company_name: String,
    pub document_paths: DocumentPaths,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_holds_all_twelve_empty() {
        let paths = DocumentPaths::new();
        assert_eq!(paths.len(), 12);
        assert!(paths.is_empty());
        assert_eq!(paths.non_empty().count(), 0);
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut paths = DocumentPaths::new();
        paths.push(DocumentCategory::Msds, "msds/b.pdf");
        paths.push(DocumentCategory::Msds, "msds/a.pdf");
        assert_eq!(paths.get(DocumentCategory::Msds), ["msds/b.pdf", "msds/a.pdf"]);
        assert_eq!(paths.total(), 2);
        assert_eq!(paths.len(), 12);
    }

    #[test]
    fn serializes_every_key() {
        let mut paths = DocumentPaths::new();
        paths.push(DocumentCategory::CommercialInvoice, "commercialInvoice/x.pdf");
        let value = serde_json::to_value(&paths).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 12);
        assert_eq!(obj["commercialInvoice"][0], "commercialInvoice/x.pdf");
        assert_eq!(obj["tk3"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn deserializing_partial_map_fills_missing_keys() {
        let paths: DocumentPaths =
            serde_json::from_str(r#"{"packingList": ["packingList/p.pdf"]}"#).unwrap();
        assert_eq!(paths.len(), 12);
        assert_eq!(paths.get(DocumentCategory::PackingList), ["packingList/p.pdf"]);
        assert!(paths.get(DocumentCategory::ImportPermit).is_empty());
    }

    #[test]
    fn iter_follows_category_order() {
        let paths = DocumentPaths::new();
        let order: Vec<_> = paths.iter().map(|(c, _)| c).collect();
        assert_eq!(order, DocumentCategory::ALL);
    }
}
