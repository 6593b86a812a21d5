//! Test support utilities and fixtures for the refactoring language server

pub mod fixtures;
pub mod helpers;
pub mod mocks;

pub use helpers::{settings_with_binary, RecordingSink};
