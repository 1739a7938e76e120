//! Core types for Campus Events.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;
pub mod ticket;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::Role;
pub use status::*;
pub use ticket::{TicketId, TicketIdError};
