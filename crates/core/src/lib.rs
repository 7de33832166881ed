//! Core business logic for futsalgo.

pub mod services;

pub use services::*;
