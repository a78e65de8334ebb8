//! Command surface: registration table and reply texts.
//!
//! # See also
//! - `service::role_service` for the handlers behind each command.

pub mod registry;
pub mod reply;
