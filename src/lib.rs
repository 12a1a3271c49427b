//! Modulite Library
//!
//! Core of the Modulite widget customizer: the style catalog loaded from
//! JSON documents, the widget configuration builder and editor, and the
//! file-backed widget and app stores.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod services;
