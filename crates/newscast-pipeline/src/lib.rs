//! Episode assembly pipeline.
//!
//! Drives the stages strictly sequentially: load the script, render
//! narration audio (unless a pre-rendered track is supplied), then
//! compose the episode video. Each stage's failure is terminal for the
//! run; retry policy belongs to whatever invokes the binary.

pub mod config;
pub mod run;

pub use config::PipelineConfig;
pub use run::run;
