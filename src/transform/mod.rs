//! Shared transform helpers (matrix composition, decomposition, plane changes).

pub mod affine;
pub mod plane;
