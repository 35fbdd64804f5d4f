//! Content Core - an in-memory editorial content system
//!
//! This library tracks articles, videos and images through a draft/published
//! lifecycle, organizes them by category and tag, gates mutations by the
//! permissions of the bound actor, and produces aggregate reports.

pub mod config;
pub mod controllers;
pub mod models;
