//! Domain layer for the registration service.
//!
//! This crate contains:
//! - Domain models (Group, User, InviteToken, Registration)
//! - Storage, hashing and notification traits
//! - The registration workflow and in-memory store implementations

pub mod models;
pub mod services;
