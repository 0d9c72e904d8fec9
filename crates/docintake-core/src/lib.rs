pub mod category;
pub mod sanitize;
pub mod submission;
pub mod upload;

pub use category::DocumentCategory;
pub use submission::{CreateSubmission, DocumentPaths, Submission};
