//! Command-line front end for [collision-estimator](https://crates.io/crates/collision-estimator).
//!
//! Estimates the probability that two of `n` random hashes share a value when the hash
//! has `k` possible outputs. Both inputs accept either a bit length (`2^b` values) or a
//! raw count; anything other than digits is ignored, the same way the input fields of
//! a form would sanitize it.
//!
//! # Usage
//!
//! One-shot, with a 64-bit hash and a million hashes:
//!
//! ```sh
//! collision-calc --buckets 64 --hashes 1000000
//! # Collision probability: ≈ 2.710503e-8
//! ```
//!
//! The classic birthday paradox:
//!
//! ```sh
//! collision-calc --bucket-mode count --buckets 365 --hashes 23
//! # Collision probability: = 50.7297234324%
//! ```
//!
//! A leading `=` marks an exact result, `≈` an exponential approximation. Use
//! `--exact-cutoff` to move the point where the approximation takes over and
//! `--precision` to change the number of significant digits.
//!
//! Interactive mode reads `<buckets> <hashes>` lines and settings commands
//! (`:precision N`, `:cutoff N`, `:bucket-mode bits|count`, `:hash-mode bits|count`,
//! `:show`, `:quit`) from stdin and recalculates on every change.

pub mod command;
pub mod error;
pub mod report;
pub mod session;
pub mod settings;

pub use command::{Command, parse_line};
pub use error::Error;
pub use report::{OutputFormat, Report, exit_code, render_text, write_report};
pub use session::run_interactive;
pub use settings::{Calculation, ModeArg, Settings, describe};
