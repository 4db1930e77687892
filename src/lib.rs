//! Forward migrations for the game's animation packs.
//!
//! An animation pack is a JSON document mapping animation ids to animations.
//! Its layout went through five schema versions; this crate moves packs from
//! one version to the next.
//!
//! - [`steps`] – the individual version-to-version steps
//! - [`pipeline`] – applying a chain of steps to a pack
//! - [`schema`] – typed shapes of an animation per version
//! - [`storage`] – reading and writing pack files
//! - [`jobs`] – which files each step migrates
//! - [`config`] – INI configuration (atlas table, file lists, asset root)

pub mod action;
pub mod config;
pub mod document;
pub mod error;
pub mod jobs;
pub mod pipeline;
pub mod schema;
pub mod steps;
pub mod storage;
pub mod version;

pub use document::Pack;
pub use error::{MigrateError, SchemaError};
pub use pipeline::{Pipeline, migrate};
pub use version::SchemaVersion;
