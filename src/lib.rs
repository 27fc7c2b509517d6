//! Helix transpiler driver.
//!
//! Ties the declaration compiler in `helix-codegen` to files on disk:
//! configuration, source discovery, the per-file pipeline and diagnostic
//! rendering.

pub mod config;
pub mod diagnostics;
pub mod discover;
pub mod error;
pub mod pipeline;

pub use config::HelixConfig;
pub use error::{DriverError, DriverResult};
pub use pipeline::{CompilationResult, SourceFile, compile_file, compile_source};
