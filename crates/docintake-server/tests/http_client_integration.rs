//! Integration tests for HttpService against a real server.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 with in-memory SQLite
//! and a temp local store, then drives it through the HTTP client layer.

use docintake_core::DocumentCategory;
use docintake_service::viewer::{load_views, render_text};
use docintake_service::{
    submit, DocumentFile, HttpService, IntakeService, ServiceError, SubmissionForm, SubmitError,
};

async fn spawn_server() -> String {
    let server = docintake_server::test_helpers::spawn_test_server().await;
    server.base_url
}

fn pdf(name: &str) -> DocumentFile {
    DocumentFile::new(name, "application/pdf", "%PDF-1.7 test")
}

#[tokio::test]
async fn health_check_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);
    svc.health_check().await.unwrap();
}

#[tokio::test]
async fn upload_and_fetch_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let path = svc
        .upload_document(DocumentCategory::CommercialInvoice, "Acme Co.", &pdf("Invoice #1.pdf"))
        .await
        .unwrap();
    assert!(path.starts_with("commercialInvoice/acme_co__Invoice_1_"));
    assert!(path.ends_with(".pdf"));

    let bytes = svc.fetch_file(&path).await.unwrap();
    assert_eq!(bytes.as_ref(), b"%PDF-1.7 test");
}

#[tokio::test]
async fn url_unsafe_extension_fetches_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let path = svc
        .upload_document(
            DocumentCategory::IdCard,
            "Acme",
            &DocumentFile::new("scan.p#f", "application/octet-stream", "img"),
        )
        .await
        .unwrap();
    assert!(path.ends_with(".p#f"));
    assert!(svc.file_url(&path).ends_with(".p%23f"));

    let bytes = svc.fetch_file(&path).await.unwrap();
    assert_eq!(bytes.as_ref(), b"img");
}

#[tokio::test]
async fn same_file_twice_gets_two_paths() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let first = svc
        .upload_document(DocumentCategory::PackingList, "Acme", &pdf("list.pdf"))
        .await
        .unwrap();
    let second = svc
        .upload_document(DocumentCategory::PackingList, "Acme", &pdf("list.pdf"))
        .await
        .unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn upload_without_company_is_invalid_input() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let err = svc
        .upload_document(DocumentCategory::Msds, "", &pdf("a.pdf"))
        .await
        .unwrap_err();
    match err {
        ServiceError::InvalidInput(msg) => assert!(msg.contains("companyName")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn submit_end_to_end_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let mut form = SubmissionForm::new("Acme Co.");
    form.add_file(DocumentCategory::Tk1, pdf("tk1 form.pdf"));
    form.add_file(DocumentCategory::IdCard, DocumentFile::new("front.jpg", "image/jpeg", "jpeg"));
    form.add_file(DocumentCategory::IdCard, DocumentFile::new("back.jpg", "image/jpeg", "jpeg"));

    let report = submit(&svc, &form).await.unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(report.submission.document_paths.total(), 3);

    let fetched = svc.get_submission(&report.submission.id).await.unwrap();
    let id_cards = fetched.document_paths.get(DocumentCategory::IdCard);
    assert_eq!(id_cards.len(), 2);
    assert!(id_cards[0].contains("front"));
    assert!(id_cards[1].contains("back"));
    assert!(fetched.document_paths.get(DocumentCategory::Msds).is_empty());

    let listed = svc.list_submissions().await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn submit_with_nothing_selected_writes_nothing() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let err = submit(&svc, &SubmissionForm::new("Acme")).await.unwrap_err();
    assert!(matches!(err, SubmitError::TotalFailure { attempted: 0, .. }));
    assert!(svc.list_submissions().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_views_newest_first_via_http() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    for company in ["First Ltd", "Second Ltd"] {
        let mut form = SubmissionForm::new(company);
        form.add_file(DocumentCategory::PurchaseOrder, pdf("po.pdf"));
        submit(&svc, &form).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let views = load_views(&svc).await.unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].company_name, "Second Ltd");
    assert_eq!(views[0].documents[0].label, "Purchase Order");
    assert!(views[0].documents[0].files[0].url.starts_with(&url));

    let text = render_text(&views);
    assert!(text.find("Second Ltd").unwrap() < text.find("First Ltd").unwrap());
}

#[tokio::test]
async fn missing_submission_is_not_found() {
    let url = spawn_server().await;
    let svc = HttpService::new(&url);

    let err = svc.get_submission("no-such-id").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
