//! Common utilities and shared types for futsalgo.
//!
//! This crate provides foundational components used across all futsalgo crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **View Cache**: Redis-backed caching of rendered views via [`ViewCache`]
//!
//! # Example
//!
//! ```no_run
//! use futsalgo_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod view_cache;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use view_cache::ViewCache;
