//! Integration tests for cloudwait
//!
//! # Test Organization
//!
//! - `resources`: Stories about waiting for a resource to reach a state or
//!   to disappear, including deadline and cancellation behavior
//!
//! - `actions`: Stories about waiting for remote actions, singly and in
//!   ordered batches
//!
//! - `common`: Scripted remotes shared by the stories above

mod actions;
mod common;
