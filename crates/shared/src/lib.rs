//! Shared utilities for the registration service.
//!
//! This crate provides functionality used by every other crate:
//! - Password hashing with Argon2id
//! - Field validation for registration input

pub mod password;
pub mod validation;
