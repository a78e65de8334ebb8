//! Role reconciliation policy.
//!
//! # Responsibility
//! - Decide which target roles a member should be granted.
//! - Stay pure: no I/O, no logging, no platform calls.
//!
//! # Invariants
//! - Plans only ever add roles; removal is not expressible.
//! - A role already held never appears in a plan.
//! - Planning against `plan.applied_to(held)` yields an empty plan.

pub mod reconcile;
