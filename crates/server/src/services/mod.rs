//! Business logic services.
//!
//! # Services
//!
//! - `identity` - Sign-up, sign-in and profile management
//! - `events` - Event CRUD, approvals and ticketed registration
//! - `registration` - Registration form workflow
//! - `dashboard` - Per-role dashboard view models

pub mod dashboard;
pub mod events;
pub mod identity;
pub mod registration;
