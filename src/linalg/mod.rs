//! Linear algebra module.
//!
//! Contains the symmetric tridiagonal eigensolver and the plane rotations it is built on.

pub mod evd;
pub mod jacobi;
