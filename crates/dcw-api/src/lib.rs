pub mod admin;
pub mod auth;
pub mod complaints;
pub mod error;
pub mod files;
pub mod middleware;
pub mod notifications;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner, Settings};
