pub mod chat;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod profile;
pub mod push;
pub mod state;
pub mod translate;
pub mod ws;

pub use error::ApiError;
pub use state::{AppState, AppStateInner};
