//! riverspiral-io: Delimited text input.
//!
//! Reads a header-first delimited text table into the pipeline's
//! [`Table`](riverspiral_pipeline::Table) and optionally runs the load
//! pass on it. Everything downstream of the table is sans-IO and lives in
//! `riverspiral-pipeline`.

pub mod delimited;

pub use delimited::{CsvOptions, LoadError, load_groups, load_table, read_table};
