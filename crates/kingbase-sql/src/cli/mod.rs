//! CLI functionality for the kbsql tool
//!
//! This module contains all CLI-related functionality including:
//! - Registry construction from an options file
//! - Mapping lookup and literal rendering
//! - Store type parsing
//! - Output formatting

pub mod config;
pub mod describe;
pub mod literal;
pub mod map;
pub mod output;
pub mod parse_type;
pub mod types;
