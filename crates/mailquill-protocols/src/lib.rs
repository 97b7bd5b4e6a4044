//! # mailquill Protocols
//!
//! Shared definitions for the mailquill workspace. Contains only message
//! types and collaborator traits - no implementations.
//!
//! ## Contents
//!
//! - [`ContentRequest`] / [`ContentResponse`] - the one-shot operations carried
//!   between the controlling UI and the page-side engine
//! - [`InsertionStatus`] - human-readable terminal status of an insertion
//! - [`TextGenerator`] - trait for the external text-generation collaborator

pub mod error;
pub mod generator;
pub mod request;
pub mod response;

pub use error::{ChannelError, GenerationError};
pub use generator::TextGenerator;
pub use request::{ContentRequest, RequestEnvelope};
pub use response::{ContentResponse, InsertionStatus, ResponseEnvelope, StatusKind};
