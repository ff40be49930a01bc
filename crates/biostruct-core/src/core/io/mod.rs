//! Input boundary of the library.
//!
//! File-format parsers live outside this crate. They hand atoms, bonds and
//! secondary structure annotations to the builder as plain records through
//! the [`traits::ModelAdapter`] trait.

pub mod records;
pub mod traits;
