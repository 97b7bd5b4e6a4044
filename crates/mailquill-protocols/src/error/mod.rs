//! Error types for the mailquill protocol layer.

mod channel;
mod generation;

pub use channel::*;
pub use generation::*;
