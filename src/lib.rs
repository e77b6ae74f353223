pub mod app;
pub mod calendar;
pub mod config;
pub mod drafts;
pub mod errors;
pub mod handlers;
pub mod journal;
pub mod mode;
pub mod models;
pub mod records;
pub mod rich_text;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::{Config, EditPolicy};
pub use journal::Journal;
pub use state::AppState;
pub use storage::DraftSlot;
