pub mod admin;
pub mod api;
pub mod cancel;
pub mod config;
pub mod console;
pub mod dom;
pub mod error;
pub mod recognition;
pub mod route;
pub mod types;

pub use api::ApiClient;
pub use cancel::CancelToken;
pub use config::Config;
pub use error::{ConsoleError, Result};
pub use route::View;
