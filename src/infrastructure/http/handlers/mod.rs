//! HTTP Handlers

mod manga;
mod root;
mod speech;

pub use manga::*;
pub use root::*;
pub use speech::*;
