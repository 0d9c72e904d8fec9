mod http;
mod local;
pub mod orchestrator;
pub mod proxy;
mod traits;
pub mod viewer;

pub use http::HttpService;
pub use local::LocalService;
pub use orchestrator::{submit, SubmissionForm, SubmitError, SubmitReport, UploadFailure};
pub use traits::{DocumentFile, IntakeService, ServiceError};
