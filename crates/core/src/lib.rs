//! PilotWardrobe Core - Shared domain logic.
//!
//! This crate provides the business rules shared across PilotWardrobe
//! components:
//! - `storefront` - Public-facing marketplace API
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no network I/O, no
//! database access, no HTTP clients. The cart's durable mirror is expressed
//! as the [`cart::CartStorage`] trait so the surrounding service decides
//! where the bytes live.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs
//! - [`cart`] - Line items, the session cart store, and corruption recovery
//! - [`sizing`] - The garment size recommendation engine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod sizing;
pub mod types;

pub use types::*;
