//! Guild-side domain model.
//!
//! # Responsibility
//! - Define the snowflake identifiers the core passes around.
//! - Describe a member as a transient, read-only snapshot.
//!
//! # Invariants
//! - The core never owns member state; every snapshot is fetched per invocation.
//! - Identifiers are opaque and only compared for equality/order.

pub mod ids;
pub mod member;
