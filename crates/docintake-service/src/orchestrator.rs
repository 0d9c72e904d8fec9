//! Fan-out/fan-in submission flow.
//!
//! Every selected file is uploaded on its own, in category order and then
//! selection order. A failed upload is logged and skipped. One metadata
//! record is written only if at least one upload succeeded; there is no
//! rollback across the store and the database.

use std::collections::BTreeMap;

use chrono::Utc;
use docintake_core::submission::{CreateSubmission, DocumentPaths, Submission};
use docintake_core::DocumentCategory;
use thiserror::Error;

use crate::{DocumentFile, IntakeService};

/// Validated-form input: a company name and the files picked per category.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub company_name: String,
    pub files: BTreeMap<DocumentCategory, Vec<DocumentFile>>,
}

impl SubmissionForm {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn add_file(&mut self, category: DocumentCategory, file: DocumentFile) {
        self.files.entry(category).or_default().push(file);
    }

    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// One file that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub category: DocumentCategory,
    pub filename: String,
    pub message: String,
}

#[derive(Debug)]
pub struct SubmitReport {
    pub submission: Submission,
    /// Files skipped because their upload failed.
    pub failures: Vec<UploadFailure>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid submission: {0}")]
    Validation(String),

    #[error("no documents were uploaded ({attempted} selected), please try again")]
    TotalFailure {
        attempted: usize,
        failures: Vec<UploadFailure>,
    },

    #[error("documents were uploaded but the submission could not be saved ({message}), please try again")]
    Persistence {
        message: String,
        /// Blobs already written that no record points at.
        orphaned_paths: Vec<String>,
    },
}

pub async fn submit<S>(service: &S, form: &SubmissionForm) -> Result<SubmitReport, SubmitError>
where
    S: IntakeService + ?Sized,
{
    let company_name = form.company_name.trim();
    if company_name.is_empty() {
        return Err(SubmitError::Validation("company name is required".into()));
    }

    let mut document_paths = DocumentPaths::new();
    let mut failures = Vec::new();

    for category in DocumentCategory::ALL {
        let Some(files) = form.files.get(&category) else {
            continue;
        };
        for file in files {
            match service.upload_document(category, company_name, file).await {
                Ok(path) => document_paths.push(category, path),
                Err(e) => {
                    tracing::warn!(
                        category = %category,
                        filename = %file.filename,
                        "upload failed, skipping: {e}"
                    );
                    failures.push(UploadFailure {
                        category,
                        filename: file.filename.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    if document_paths.is_empty() {
        return Err(SubmitError::TotalFailure {
            attempted: form.file_count(),
            failures,
        });
    }

    let input = CreateSubmission {
        company_name: company_name.to_string(),
        document_paths,
        uploaded_at: Utc::now(),
    };

    match service.create_submission(&input).await {
        Ok(submission) => {
            tracing::info!(
                id = %submission.id,
                company = %submission.company_name,
                files = submission.document_paths.total(),
                skipped = failures.len(),
                "submission saved"
            );
            Ok(SubmitReport {
                submission,
                failures,
            })
        }
        Err(e) => {
            let orphaned_paths: Vec<String> = input
                .document_paths
                .iter()
                .flat_map(|(_, paths)| paths.iter().cloned())
                .collect();
            tracing::error!(
                orphaned = orphaned_paths.len(),
                "submission record write failed, uploaded files are orphaned: {e}"
            );
            Err(SubmitError::Persistence {
                message: e.to_string(),
                orphaned_paths,
            })
        }
    }
}
