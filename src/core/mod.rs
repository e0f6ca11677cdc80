// DRCScope - core/mod.rs
//
// Core business logic layer: matching, classification, parsing, aggregation.
// Must NOT depend on: ui, platform, or app.

pub mod aggregate;
pub mod classifier;
pub mod discovery;
pub mod export;
pub mod matcher;
pub mod model;
pub mod parser;
