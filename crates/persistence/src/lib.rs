//! Persistence layer for the Taklifnoma backend.
//!
//! This crate contains:
//! - Remote store access (connection pool, entities, repositories)
//! - The local fallback store (durable, file-backed, browser-localStorage role)
//! - The ephemeral draft cache
//! - The reconciliation layer deciding per operation which source to use
//!   and merging result sets

pub mod cache;
pub mod db;
pub mod entities;
pub mod error;
pub mod fallback;
pub mod metrics;
pub mod reconcile;
pub mod repositories;
