//! GraphQL schemas for Quill.
//!
//! Two schemas live here: the features schema over authors, posts, notices
//! and reminds (with the `Message` interface and `MessageResult` union), and
//! a mock schema whose values are generated on every request.
//!
//! The gateway crate builds the HTTP handlers and wires them into the router.
//! This crate only defines the schemas, types, stores and resolvers.

pub mod context;
pub mod error;
pub mod literal_guard;
pub mod mock;
pub mod mutations;
pub mod queries;
pub mod resolve;
pub mod scalars;
pub mod schema;
pub mod store;
pub mod types;

pub use {
    error::SchemaError,
    resolve::{MessageKind, resolve_message_kind},
    scalars::{Date, DateError, Literal, LiteralKind},
    schema::{MockSchema, QuillSchema, SchemaOptions, build_mock_schema, build_schema},
    store::{MessageRecord, Stores},
};
