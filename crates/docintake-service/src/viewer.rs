//! Read-only model of past submissions for the list page and the CLI.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use docintake_core::submission::Submission;
use docintake_core::DocumentCategory;
use serde::Serialize;

use crate::{IntakeService, ServiceError};

pub const NO_DOCUMENTS: &str = "No documents uploaded";

#[derive(Debug, Clone, Serialize)]
pub struct FileLink {
    /// Last path segment, shown as the link text.
    pub name: String,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub category: DocumentCategory,
    pub label: String,
    pub files: Vec<FileLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub id: String,
    pub company_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_at_display: String,
    /// Non-empty categories only, in fixed category order.
    pub documents: Vec<CategoryView>,
}

impl SubmissionView {
    pub fn has_documents(&self) -> bool {
        !self.documents.is_empty()
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Build views newest first, whatever order `submissions` arrives in.
pub fn build_views<F>(mut submissions: Vec<Submission>, resolve_url: F) -> Vec<SubmissionView>
where
    F: Fn(&str) -> String,
{
    submissions.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    submissions
        .into_iter()
        .map(|s| {
            let documents = s
                .document_paths
                .non_empty()
                .map(|(category, paths)| CategoryView {
                    category,
                    label: category.label(),
                    files: paths
                        .iter()
                        .map(|path| FileLink {
                            name: path.rsplit('/').next().unwrap_or(path).to_string(),
                            path: path.clone(),
                            url: resolve_url(path),
                        })
                        .collect(),
                })
                .collect();
            SubmissionView {
                uploaded_at_display: format_timestamp(&s.uploaded_at),
                id: s.id,
                company_name: s.company_name,
                uploaded_at: s.uploaded_at,
                documents,
            }
        })
        .collect()
}

pub async fn load_views<S>(service: &S) -> Result<Vec<SubmissionView>, ServiceError>
where
    S: IntakeService + ?Sized,
{
    let submissions = service.list_submissions().await?;
    Ok(build_views(submissions, |path| service.file_url(path)))
}

/// Plain-text listing for terminals.
pub fn render_text(views: &[SubmissionView]) -> String {
    if views.is_empty() {
        return "No submissions yet.\n".to_string();
    }
    let mut out = String::new();
    for view in views {
        let _ = writeln!(out, "{}  ({})", view.company_name, view.uploaded_at_display);
        if !view.has_documents() {
            let _ = writeln!(out, "  {NO_DOCUMENTS}");
        }
        for doc in &view.documents {
            let _ = writeln!(out, "  {}:", doc.label);
            for file in &doc.files {
                let _ = writeln!(out, "    {}  {}", file.name, file.url);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use docintake_core::DocumentPaths;

    use super::*;

    fn submission(id: &str, millis: i64, paths: DocumentPaths) -> Submission {
        Submission {
            id: id.into(),
            company_name: format!("Company {id}"),
            document_paths: paths,
            uploaded_at: Utc.timestamp_millis_opt(millis).unwrap(),
        }
    }

    fn resolve(path: &str) -> String {
        format!("https://cdn.example.com/{path}")
    }

    #[test]
    fn later_submission_comes_first_regardless_of_input_order() {
        let views = build_views(
            vec![
                submission("old", 1_000, DocumentPaths::new()),
                submission("new", 3_000, DocumentPaths::new()),
                submission("mid", 2_000, DocumentPaths::new()),
            ],
            resolve,
        );
        let ids: Vec<_> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"]);
    }

    #[test]
    fn empty_categories_are_omitted_and_labels_derived() {
        let mut paths = DocumentPaths::new();
        paths.push(DocumentCategory::PackingList, "packingList/acme_list_1.pdf");
        paths.push(DocumentCategory::CommercialInvoice, "commercialInvoice/acme_inv_1.pdf");
        paths.push(DocumentCategory::CommercialInvoice, "commercialInvoice/acme_inv_2.pdf");

        let views = build_views(vec![submission("a", 0, paths)], resolve);
        let docs = &views[0].documents;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].label, "Commercial Invoice");
        assert_eq!(docs[0].files.len(), 2);
        assert_eq!(docs[0].files[1].name, "acme_inv_2.pdf");
        assert_eq!(
            docs[0].files[0].url,
            "https://cdn.example.com/commercialInvoice/acme_inv_1.pdf"
        );
        assert_eq!(docs[1].label, "Packing List");
    }

    #[test]
    fn submission_without_files_renders_placeholder() {
        let views = build_views(vec![submission("empty", 0, DocumentPaths::new())], resolve);
        assert!(!views[0].has_documents());
        let text = render_text(&views);
        assert!(text.contains(NO_DOCUMENTS));
    }

    #[test]
    fn timestamp_display_format() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(format_timestamp(&ts), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn render_text_lists_links() {
        let mut paths = DocumentPaths::new();
        paths.push(DocumentCategory::Msds, "msds/acme_sheet_1.pdf");
        let views = build_views(vec![submission("x", 0, paths)], resolve);
        let text = render_text(&views);
        assert!(text.contains("Company x"));
        assert!(text.contains("  Msds:"));
        assert!(text.contains("acme_sheet_1.pdf  https://cdn.example.com/msds/acme_sheet_1.pdf"));
        assert_eq!(render_text(&[]), "No submissions yet.\n");
    }
}
