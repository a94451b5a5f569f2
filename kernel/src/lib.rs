//! Wayfinder Kernel: the immutable data model under the search engine.
//!
//! # API Surface
//!
//! - [`model::road_graph::RoadGraphV1`] -- weighted undirected road graph,
//!   validated once at construction
//! - [`model::heuristic::HeuristicTableV1`] -- per-node remaining-cost estimates
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON writer
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `proof` ← `model`
//!
//! `model` uses `proof` for fingerprints. `proof` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod model;
pub mod proof;
