//! # Engram Protocols
//!
//! Core protocol definitions for the Engram memory engine.
//! Contains only interface definitions and shared types - no implementations.
//!
//! ## Core Traits
//!
//! - [`MemoryStore`] - Trait for hybrid memory storage implementations

pub mod error;
pub mod memory;

// Re-export core traits and types
pub use error::MemoryError;
pub use memory::{MemoryRecord, MemoryStore, SearchScore, SemanticMemory};
