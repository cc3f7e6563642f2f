// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod merge;
pub mod pages;

pub mod file;
pub mod log;
pub mod progress;
pub mod runner;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
