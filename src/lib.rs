//! Road Network Generation Library
//!
//! Turns a road network description into a validated, immutable network model
//! and renders it. Generation itself lives in `generation`; `parser` extracts
//! drafts from text, `render` consumes finished models and `config` holds the
//! startup settings.

pub mod config;
pub mod generation;
pub mod parser;
pub mod render;
