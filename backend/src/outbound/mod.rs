//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **security**: Argon2id password hashing
//! - **media**: filesystem storage for uploaded images
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod media;
pub mod persistence;
pub mod security;
