//! # Manege Core
//!
//! Domain models, error types, and the pure scheduling view-model logic for
//! the Manege riding-school management service. This crate performs no I/O;
//! everything here is shared by the database and API layers.

pub mod calendar;
pub mod errors;
pub mod models;
