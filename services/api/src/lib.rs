//! services/api/src/lib.rs
//!
//! HTTP service for the eco tracker: configuration, port adapters and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
