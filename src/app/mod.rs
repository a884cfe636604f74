// HerdImport - app/mod.rs
//
// Application layer: input acquisition, export orchestration, reporting.
// Dependencies: core, platform.

pub mod import;
pub mod report;
