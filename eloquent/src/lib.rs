#![allow(clippy::module_inception)]
//! # Eloquent - In-Memory Query Toolkit
//!
//! Eloquent queries and reshapes JSON-like data held in memory. Items are
//! dynamic [`Value`](common::Value)s, usually [`Document`](document::Document)s,
//! and are addressed by dotted field paths such as `address.city`.
//!
//! ## Key Features
//!
//! - **Declarative queries**: Literal, pattern, nested and operator-form query documents
//! - **Extensible operators**: Register custom binary operators next to the built-in ones
//! - **Collections**: Filtering, grouping, sorting, pagination and aggregation over sequences
//! - **Models**: Path-based reads and writes, merging and diffing of a single document
//! - **Deferred collections**: The collection surface over asynchronously produced items
//! - **Macros**: Named user extensions inherited by every derived collection or model
//!
//! ## Quick Start
//!
//! ```rust
//! use eloquent::collection::Collection;
//! use eloquent::{doc, val};
//!
//! let people = Collection::new(vec![
//!     doc! { name: "Ada", age: 36, address: { city: "London" } },
//!     doc! { name: "Alan", age: 41, address: { city: "Wilmslow" } },
//!     doc! { name: "Grace", age: 17, address: { city: "New York" } },
//! ]);
//!
//! let adults = people.find(doc! { "$$age": { gte: 18 } }).unwrap();
//! assert_eq!(adults.count(), 2);
//!
//! let londoners = people.where_eq("address.city", "London").unwrap();
//! assert_eq!(londoners.pluck("name").all(), &[val!("Ada")]);
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Eager collections
//! - [`common`] - Values, patterns, macros and shared utilities
//! - [`config`] - Field separator, operator marker and pagination defaults
//! - [`document`] - Documents and the path accessor
//! - [`eloquent`] - Deferred collections
//! - [`errors`] - Error types and result definitions
//! - [`model`] - Single-document models
//! - [`query`] - Query specifications, compiler, operators and matcher

pub mod collection;
pub mod common;
pub mod config;
pub mod document;
pub mod eloquent;
pub mod errors;
pub mod model;
pub mod query;
