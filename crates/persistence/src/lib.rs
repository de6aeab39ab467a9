//! Persistence layer for the registration service.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the domain store traits
//! - Query metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
