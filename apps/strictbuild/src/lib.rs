//! strictbuild core library.
//!
//! Drives an external JavaScript compiler over the job-definition files of a
//! directory: files are split into balanced groups, one compiler process runs
//! per group on a bounded worker pool, and the diagnostic streams are folded
//! into a strict-mode pass/fail decision.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Config file loading and the immutable run `Context`.
//! - `discovery`: Job-definition file listing.
//! - `groups`: Partitioning files into process groups.
//! - `runner`: One compiler invocation per group.
//! - `diagnostics`: Sentinel sections, block segmentation, detail parsing.
//! - `strict`: Per-path diagnostic index and the strict policy.
//! - `scheduler`: Fan-out/fan-in and the final decision.
//! - `output`: Human/JSON printers.
//! - `models`: Shared data types.
//! - `error`: Error types.
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod groups;
pub mod models;
pub mod output;
pub mod runner;
pub mod scheduler;
pub mod strict;
