//! # Core Models Module
//!
//! Data structures describing a loaded structure. Everything refers to atoms
//! by their index in the frame's atom vector; chains and polymers are
//! addressed by slotmap keys so that handles into a rebuilt polymer arena
//! become invalid instead of pointing at the wrong polymer.
//!
//! ## Key Components
//!
//! - [`atom`] - Atoms, distinguishing roles and packed sequence codes
//! - [`group`] - Contiguous atom ranges forming one residue
//! - [`chain`] - Groups sharing a chain identifier within one model
//! - [`model`] - Chains, polymers and declared structures of one model
//! - [`frame`] - Owner of all of the above plus bonds and hydrogen bonds
//! - [`builder`] - Streaming construction of a frame from atom records
//! - [`topology`] - Bond orders, bonds and hydrogen bonds
//! - [`ids`] - Slotmap key types

pub mod atom;
pub mod builder;
pub mod chain;
pub mod frame;
pub mod group;
pub mod ids;
pub mod model;
pub mod topology;
