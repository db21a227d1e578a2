//! # protomcp-common
//!
//! Shared helpers for protoc plugins and the HTTP handlers they generate.
//!
//! This crate provides:
//! - Classification of protobuf descriptors (message, field, enum, service,
//!   method, file) and of field shapes (scalar, repeated, map, oneof, ...)
//! - Lookup and ordered traversal of descriptor children
//! - Slice clearing helpers that release element references
//! - A string builder that only allocates once something is written
//! - Size-capped protobuf-JSON request decoding and JSON response rendering
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`generator`]: Descriptor classification, traversal and test constructors
//! - [`lazybuf`]: Lazily allocated string building
//! - [`slices`]: Clearing and zeroing element sequences
//! - [`web`]: HTTP JSON decode and render wrappers
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use protomcp_common::generator::{for_each_field, is_repeated_field, testutils::*, Type};
//! use protomcp_common::LazyBuffer;
//!
//! let msg = new_message(
//!     "User",
//!     vec![new_field("id", 1, Type::Int64), new_repeated_field("tags", 2, Type::String)],
//! );
//!
//! let mut out = LazyBuffer::new();
//! for_each_field(&msg, |field| {
//!     if is_repeated_field(field) {
//!         out.write_string([field.name(), " "]);
//!     }
//!     true
//! });
//! assert_eq!(out.as_str(), "tags ");
//! ```
//!
//! ## Features
//!
//! - `axum` (default): [`web::ProtoJson`] extractor/response and
//!   `IntoResponse` for [`Error`]

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod generator;
pub mod lazybuf;
pub mod slices;
pub mod web;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use lazybuf::{LazyBuffer, MaybeLazyBuffer};
pub use slices::{clear_and_nil_slice, clear_slice, zero_slice};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
