//! # Core Module
//!
//! Stateless building blocks: the frame data model, the input record
//! boundary, the biological residue and polymer layer, and small geometry
//! helpers.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, groups, chains, models and the frame
//! - **Input Boundary** ([`io`]) - Records produced by file adapters
//! - **Biological Layer** ([`bio`]) - Monomer classification and polymer assembly
//! - **Utilities** ([`utils`]) - Geometry and static name tables

pub mod bio;
pub mod io;
pub mod models;
pub mod utils;
