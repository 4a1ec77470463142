//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - The match record and message model shared by both search engines
//! - Rendering for the supported output formats
//! - Path normalization utilities
//! - Common utilities

pub mod model;
pub mod paths;
pub mod render;
pub mod util;
