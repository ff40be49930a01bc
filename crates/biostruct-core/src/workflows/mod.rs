//! # Workflows Module
//!
//! Entry points that run the whole pipeline over a frame.
//!
//! - **Pipeline** ([`pipeline`]) - Builds a frame from an input adapter and
//!   derives polymers, dihedrals, secondary structure and hydrogen bonds,
//!   reporting each phase through a
//!   [`ProgressReporter`](crate::engine::progress::ProgressReporter).

pub mod pipeline;
