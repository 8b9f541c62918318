//! Domain layer for the Taklifnoma backend.
//!
//! This crate contains:
//! - Domain models (Invitation, CustomTemplate, Guest, Profile, admin records)
//! - Slug generation and the public invitation URL derivation
//! - Status enumerations with their legal transitions

pub mod models;
