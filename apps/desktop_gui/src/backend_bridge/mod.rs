//! Bridge between the UI thread and the backend worker runtime.

pub mod commands;
pub mod runtime;
