//! # Engine Module
//!
//! Derives geometry from an assembled [`Frame`](crate::core::models::frame::Frame):
//! backbone dihedrals, secondary structure and hydrogen-bond networks.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Thresholds and angle windows, loadable from TOML
//! - **Dihedrals** ([`dihedrals`]) - Phi, psi and omega for amino polymers
//! - **Ramachandran** ([`ramachandran`]) - Per-pair classification and run detection
//! - **Structures** ([`structures`]) - Computed and declared structure segments
//! - **Hydrogen Bonds** ([`hbonds`]) - Backbone amide bonds and nucleic base pairs
//! - **Progress Monitoring** ([`progress`]) - Phase reporting for callers
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! Every pass works on `&mut Frame` and runs to completion. Geometry that
//! cannot be evaluated (missing atoms, degenerate angles) only removes the
//! affected residue from consideration.

pub mod config;
pub mod dihedrals;
pub mod error;
pub mod hbonds;
pub mod progress;
pub mod ramachandran;
pub mod structures;
