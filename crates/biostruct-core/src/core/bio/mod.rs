//! Biological interpretation of raw groups.
//!
//! - [`resolver`] classifies groups into typed monomers by their role atoms
//! - [`monomer`] holds the per-subtype role offset tables
//! - [`assembler`] chains connected monomers into [`polymer::BioPolymer`]s
//! - [`structure`] describes secondary structure segments and their axes

pub mod assembler;
pub mod monomer;
pub mod polymer;
pub mod resolver;
pub mod structure;
