//! Request handlers.
//!
//! Each submodule provides async handler functions for one area of the API.
//! Handlers lock the shared store or filter state, delegate to `dtrack_core`,
//! and map errors via [`AppError`](crate::error::AppError).

pub mod dashboard;
pub mod discounts;
pub mod extraction;
pub mod public_offers;
