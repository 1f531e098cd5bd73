//! Dronz REST - delivery service API client
//!
//! Fetches restaurants, orders, the central area and no-fly zones.

pub mod client;

pub use client::DronzClient;
