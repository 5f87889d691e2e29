pub mod analysis;
pub mod app;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
