//! CLI command handlers

pub mod commands;

pub use commands::{scan, translate, translate_with, TranslateOptions};
