//! Command Handlers 实现

mod manga_handlers;
mod speech_handlers;

pub use manga_handlers::*;
pub use speech_handlers::*;
