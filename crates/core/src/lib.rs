//! Campus Events Core - Shared domain types.
//!
//! This crate provides the types shared by every Campus Events component:
//! - `server` - HTTP service (identity, event repository, dashboards)
//! - `cli` - Command-line tools for migrations and demo data
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. The event status state machine lives here so both storage
//! backends and the service layer agree on it.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, emails, roles, statuses and ticket identifiers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
