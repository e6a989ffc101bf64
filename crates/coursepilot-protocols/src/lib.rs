//! # CoursePilot Protocols
//!
//! Wire contracts shared by the three CoursePilot processes (popup UI,
//! background coordinator, page-embedded controller).
//!
//! Contains only data definitions - no behavior beyond constructors and
//! predicates. Field and action names match the JSON shapes the processes
//! exchange, so records round-trip unchanged through the message bus.
//!
//! ## Core Types
//!
//! - [`LessonRecord`] - One entry of a lesson snapshot
//! - [`PageRequest`] / [`PageEvent`] - Messages by direction
//! - [`PageResponse`] - Response shapes, including structured failures
//! - [`ProtocolError`] - Parse errors that map to failure responses

pub mod error;
pub mod lesson;
pub mod message;

pub use error::ProtocolError;
pub use lesson::{LessonRecord, LessonStatus, LessonType};
pub use message::{
    Feature, IncomingMessage, PageEvent, PageRequest, PageResponse, SessionState, parse_incoming,
};
