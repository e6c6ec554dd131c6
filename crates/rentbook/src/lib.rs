//! Rentbook: occupancy and rent-payment tracking for small rental portfolios.
//!
//! The heart of the crate is [`rentals`]: a pure occupancy/payment state
//! engine, repository traits for the backing store, and a service layer that
//! orchestrates the two-write tenancy start with explicit compensation.

pub mod config;
pub mod error;
pub mod rentals;
pub mod telemetry;
