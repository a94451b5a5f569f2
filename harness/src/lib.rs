//! Wayfinder Harness: world-level orchestration for the search engine.
//!
//! The harness runs a world through every configured strategy, replay-checks
//! each trace, and packages traces, report, and world description as a
//! self-contained artifact bundle.
//!
//! The harness does NOT implement search logic. It delegates to
//! `wayfinder-search`. Worlds provide domain data only; the harness owns
//! orchestration.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod audit;
pub mod bundle;
pub mod bundle_dir;
pub mod contract;
pub mod logging;
pub mod metrics;
pub mod runner;
pub mod worlds;
