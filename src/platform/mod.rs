// DRCScope - platform/mod.rs
//
// Platform abstraction layer: config files, platform directories, file reads.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
