//! # dyntamic-cli: Command-Line Interface
//!
//! Thin clap front end over the dyntamic library crates.
//!
//! ## Subcommands
//!
//! - `compile`: schema file to model descriptor (or back to schema)
//! - `validate`: payload file against a schema file
//! - `infer`: type-name sample to schema or descriptor
//!
//! ## Crate Policy
//!
//! - Argument structs live next to their handlers; `main.rs` only assembles
//!   them and initializes tracing.
//! - Handlers return an exit code; business logic stays in the library
//!   crates.
//! - Files ending in `.yaml`/`.yml` are read as YAML, everything else as
//!   JSON.

pub mod compile;
pub mod config;
pub mod document;
pub mod infer;
pub mod validate;

pub use config::CliConfig;
pub use document::load_document;
