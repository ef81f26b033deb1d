pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use handlers::FilesState;
pub use services::{DownloadService, ListingService, UploadService, VisibilityService};
pub use store::{FileStore, PgFileStore};
