use serde::{Deserialize, Serialize};

/// Multipart field names accepted by the upload endpoint.
pub const FIELD_FILE: &str = "file";
pub const FIELD_FOLDER: &str = "folder";
pub const FIELD_COMPANY_NAME: &str = "companyName";

/// Successful upload: where the blob landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub path: String,
}

/// Drop any directory prefix a client may send along with a file name.
pub fn client_file_name(raw: &str) -> &str {
    raw.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unix_and_windows_prefixes() {
        assert_eq!(client_file_name("invoice.pdf"), "invoice.pdf");
        assert_eq!(client_file_name("/tmp/x/invoice.pdf"), "invoice.pdf");
        assert_eq!(client_file_name(r"C:\Users\me\scan.v2.jpg"), "scan.v2.jpg");
        assert_eq!(client_file_name("dir/"), "");
    }

    #[test]
    fn uploaded_document_wire_shape() {
        let json = serde_json::to_string(&UploadedDocument { path: "msds/a.pdf".into() }).unwrap();
        assert_eq!(json, r#"{"path":"msds/a.pdf"}"#);
    }
}
