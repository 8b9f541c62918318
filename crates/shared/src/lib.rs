//! Shared utilities and common types for the Taklifnoma backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token verification (tokens are issued by the external auth provider)
//! - Common validation logic for invitation and template fields
//! - Cursor-based pagination for admin listings

pub mod jwt;
pub mod pagination;
pub mod validation;
