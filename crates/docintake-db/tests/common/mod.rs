// Backend-agnostic integration tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so that the same logic
// can be exercised against both the SQLite and Postgres backends.

use chrono::{DateTime, Duration, TimeZone, Utc};
use docintake_core::submission::{CreateSubmission, DocumentPaths};
use docintake_core::DocumentCategory;
use docintake_db::{Database, DbError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).unwrap()
}

fn make_submission(company: &str, uploaded_at: DateTime<Utc>) -> CreateSubmission {
    let mut document_paths = DocumentPaths::new();
    document_paths.push(
        DocumentCategory::CommercialInvoice,
        format!("commercialInvoice/{company}_invoice_1.pdf"),
    );
    CreateSubmission {
        company_name: company.to_string(),
        document_paths,
        uploaded_at,
    }
}

// ---------------------------------------------------------------------------
// Submission tests
// ---------------------------------------------------------------------------

/// Create then fetch: every field survives, and all twelve keys come back.
pub async fn test_submission_roundtrip(db: &dyn Database) {
    let mut input = make_submission("Acme Co.", at(1_700_000_000_000));
    input.document_paths.push(DocumentCategory::Msds, "msds/b.pdf");
    input.document_paths.push(DocumentCategory::Msds, "msds/a.pdf");

    let created = db.create_submission(&input).await.unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.company_name, "Acme Co.");
    assert_eq!(created.uploaded_at, input.uploaded_at);
    assert_eq!(created.document_paths, input.document_paths);

    let fetched = db.get_submission(&created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.document_paths.len(), 12);
    assert_eq!(
        fetched.document_paths.get(DocumentCategory::Msds),
        ["msds/b.pdf", "msds/a.pdf"]
    );
    assert_eq!(
        fetched.document_paths.get(DocumentCategory::CommercialInvoice),
        ["commercialInvoice/Acme Co._invoice_1.pdf"]
    );
    assert!(fetched.document_paths.get(DocumentCategory::Tk4).is_empty());
}

/// A single populated category leaves eleven empty lists in the stored record.
pub async fn test_single_category_record(db: &dyn Database) {
    let created = db
        .create_submission(&make_submission("solo", at(1_700_000_000_000)))
        .await
        .unwrap();
    let fetched = db.get_submission(&created.id).await.unwrap();

    let empty = fetched
        .document_paths
        .iter()
        .filter(|(_, paths)| paths.is_empty())
        .count();
    assert_eq!(empty, 11);
    assert_eq!(fetched.document_paths.total(), 1);
}

/// Listing is newest first regardless of insertion order.
pub async fn test_list_newest_first(db: &dyn Database) {
    let base = at(1_700_000_000_000);
    let middle = db
        .create_submission(&make_submission("middle", base))
        .await
        .unwrap();
    let newest = db
        .create_submission(&make_submission("newest", base + Duration::hours(1)))
        .await
        .unwrap();
    let oldest = db
        .create_submission(&make_submission("oldest", base - Duration::days(3)))
        .await
        .unwrap();

    let all = db.list_submissions().await.unwrap();
    let ids: Vec<_> = all.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, [newest.id.as_str(), middle.id.as_str(), oldest.id.as_str()]);
}

/// Sub-second differences still order correctly.
pub async fn test_list_orders_within_a_second(db: &dyn Database) {
    let base = at(1_700_000_000_000);
    let later = db
        .create_submission(&make_submission("later", base + Duration::milliseconds(450)))
        .await
        .unwrap();
    let earlier = db
        .create_submission(&make_submission("earlier", base + Duration::milliseconds(5)))
        .await
        .unwrap();

    let all = db.list_submissions().await.unwrap();
    assert_eq!(all[0].id, later.id);
    assert_eq!(all[1].id, earlier.id);
}

pub async fn test_list_empty(db: &dyn Database) {
    assert!(db.list_submissions().await.unwrap().is_empty());
}

pub async fn test_get_missing(db: &dyn Database) {
    let err = db.get_submission("does-not-exist").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}
