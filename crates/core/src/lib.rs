//! Discount tracker domain crate.
//!
//! Holds the discount model, the filter predicate engine and filter state,
//! the in-memory store, the copy action, and the simulated extraction task.
//! Nothing here knows about HTTP so the same logic backs the API server
//! and the tests.

pub mod clipboard;
pub mod discount;
pub mod error;
pub mod expiry;
pub mod extraction;
pub mod filter;
pub mod filter_state;
pub mod seed;
pub mod store;
pub mod types;
