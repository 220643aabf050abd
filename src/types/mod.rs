mod auth;
mod chat;
mod ws;

pub use auth::*;
pub use chat::*;
pub use ws::*;
