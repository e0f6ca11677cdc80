// DRCScope - lib.rs
//
// Library entry point, exposing all modules for integration testing and
// for embedding the pipeline in other tools.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
