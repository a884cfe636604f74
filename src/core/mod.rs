// HerdImport - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, chrono, regex, csv, serde.
// Must NOT depend on: app, platform, or any filesystem I/O.

pub mod costs;
pub mod date;
pub mod export;
pub mod importer;
pub mod mapper;
pub mod model;
pub mod template;
pub mod tokenizer;
pub mod validator;
