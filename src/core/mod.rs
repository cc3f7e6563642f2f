// src/core/mod.rs

pub mod dates;
pub mod identity;
pub mod lenient;
pub mod sanitize;

pub use identity::TransferId;
