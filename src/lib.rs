//! Homeshine - Recurring home-cleaning booking and subscription backend.
//!
//! This crate implements the subscription → booking → renewal → reminder
//! lifecycle for a recurring cleaning service, together with the joined
//! queries that drive it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
