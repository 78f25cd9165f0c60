//! Canonical domain model for the reconciliation engine.
//!
//! # Responsibility
//! - Define the data shapes exchanged with external adapters.
//! - Keep all identity decisions in one place (`headword`).
//!
//! # Invariants
//! - Model types are plain values; no I/O and no hidden state.

pub mod audio;
pub mod headword;
pub mod note;
