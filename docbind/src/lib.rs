#![allow(dead_code, unused_imports)]
//! # Docbind - Object-Document Mapper Core
//!
//! Docbind binds typed model metadata to documents in a schemaless document
//! store. It covers the in-memory half of an object-document mapper: model
//! types with declared fields, relations and embedded inheritance; live
//! instances with dirty tracking and localized fields; and the mapping layer
//! that moves instances between their object and document forms.
//!
//! ## Key Features
//!
//! - **Schema metadata**: declared fields, defaults, localized fields, and
//!   embedded/referenced relations registered per model type
//! - **Embedded inheritance**: polymorphic subtypes resolved through a
//!   per-hierarchy discriminator field
//! - **Selector builder**: construct a new instance from a query selector,
//!   dropping operator and nested-document conditions
//! - **Deep copy**: structurally independent copies of whole model graphs
//!   with fresh identities, carried locale maps and recursively duplicated
//!   embedded children
//! - **Dynamic attributes**: schema-less extras on types that opt in, kept
//!   verbatim on load either way
//! - **In-memory store**: a concurrent document collection and a typed
//!   repository for save/load round-trips
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docbind::doc;
//! use docbind::model::Model;
//! use docbind::schema::{ModelType, TypeRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TypeRegistry::new();
//! registry.register(
//!     ModelType::builder("Person")
//!         .field("title")
//!         .embeds_many("addresses", "Address"),
//! )?;
//! registry.register(ModelType::builder("Address").field("street"))?;
//!
//! let person = registry.get("Person")?;
//! let mut model = Model::new(person, doc!("title": "sir"))?;
//!
//! let address = registry.get("Address")?;
//! model.push_embedded("addresses", Model::new(address, doc!("street": "high"))?)?;
//!
//! // a structurally independent copy with fresh identities
//! let copy = model.dup()?;
//! assert_ne!(copy.id(), model.id());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Value model, locale context, and shared utilities
//! - [`document`] - Raw documents and document ids
//! - [`errors`] - Error types and result definitions
//! - [`mapping`] - Selector builder, document mapper, and deep copy
//! - [`model`] - Live model instances with state and dirty tracking
//! - [`repository`] - Typed repositories over collections
//! - [`schema`] - Model type metadata and the type registry
//! - [`store`] - In-memory document collections

pub mod common;
pub mod document;
pub mod errors;
pub mod mapping;
pub mod model;
pub mod repository;
pub mod schema;
pub mod store;
