//! Authoring engine for eligibility screeners.
//!
//! Screeners, their benefits and custom eligibility checks live in two states:
//! a mutable *working* draft owned by its author and an immutable *published*
//! snapshot consumed by evaluation surfaces. This crate owns the rules that
//! move records between those states across a document store and a blob store,
//! and the schema engine that derives a screener's form inputs from the checks
//! embedded in its benefits.

pub mod config;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod library;
pub mod publish;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod schema;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod versioning;
