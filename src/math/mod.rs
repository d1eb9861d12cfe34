//! Shared numerical helpers for the projection and datum-shift kernels.

mod ancillary;
mod series;

pub use ancillary::{gudermannian_inv, pj_msfn, pj_phi2, qs, sinhpsi_to_tanphi, ts};
pub use series::horner;
