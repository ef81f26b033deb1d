mod download_service;
mod listing_service;
mod upload_service;
mod visibility_service;

pub use download_service::{DownloadService, FileContent};
pub use listing_service::ListingService;
pub use upload_service::{BestEffortFailure, UploadOutcome, UploadService};
pub use visibility_service::VisibilityService;
