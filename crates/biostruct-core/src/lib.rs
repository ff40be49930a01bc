//! # biostruct
//!
//! Turns a stream of atoms, bonds and structure annotations into a
//! navigable model of biological macromolecules: residues classified as
//! amino acids, nucleotides or carbohydrates, chained into polymers, with
//! backbone dihedrals, secondary structure and hydrogen-bond networks.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Data models (`Frame`, groups, chains,
//!   polymers), the input records and adapter trait, the monomer resolver and
//!   the polymer assembler.
//!
//! - **[`engine`]: The Geometry Layer.** Settings, dihedral computation,
//!   Ramachandran classification, structure assignment and hydrogen-bond
//!   detection, each a pass over `&mut Frame`.
//!
//! - **[`workflows`]: The Public API.** [`workflows::pipeline::load`] builds a
//!   frame from a [`ModelAdapter`](core::io::traits::ModelAdapter) and runs
//!   every pass; [`workflows::pipeline::recompute`] reruns them after edits.

pub mod core;
pub mod engine;
pub mod workflows;
