// DRCScope - app/mod.rs
//
// Application layer: ingestion orchestration and session state.
// Dependencies: core layer, platform::fs for reads.
// Must NOT depend on: ui.

pub mod ingest;
pub mod state;
