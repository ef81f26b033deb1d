pub mod dto;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
pub mod store;

pub use services::SessionResolver;
pub use store::{PgUserStore, UserStore};
