//! # Fitplan Common Library
//!
//! Shared code for the fitness-class planning services:
//! - Domain models (movements, muscle groups, class plans)
//! - Storage access handle and its SQLite implementation
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{ClassPlan, Movement, MuscleGroup};
