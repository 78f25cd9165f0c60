//! Use-case layer: the reconciliation pass itself.

pub mod reconcile;
