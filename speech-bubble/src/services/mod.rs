//! Rendering pipelines driven by the CLI.

pub mod batch;
pub mod fhd;
