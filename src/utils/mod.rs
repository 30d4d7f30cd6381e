//! Utility modules for common functionality
//!
//! This module provides the file logger and progress reporting used throughout the application.

pub mod logger;
pub mod progress;
