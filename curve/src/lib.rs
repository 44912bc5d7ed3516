//! Prime-order group of the SM2 recommended curve (GB/T 32918.5).
//!
//! This crate provides the base and scalar fields in Montgomery form, affine
//! and projective curve points, SEC1 point encoding and helpers for random
//! sampling. Point addition uses complete projective formulas, and scalar
//! multiplication by secret scalars runs in constant time with respect to the
//! scalar value. Variable-time routines are named as such and are meant for
//! public inputs only.

mod montgomery;

mod affine;
mod basefield;
mod errors;
mod generator_table;
mod group;
mod msm;
mod projective;
mod random;
mod scalarfield;

pub use affine::{Affine, COMPRESSED_LEN, CURVE_A, CURVE_B, UNCOMPRESSED_LEN};
pub use basefield::BaseField;
pub use errors::CurveError;
pub use generator_table::mul_generator_affine;
pub use group::{Group, ScalarBits};
pub use msm::{double_scalar_mul_basepoint, double_scalar_mul_basepoint_affine};
pub use projective::Projective;
pub use random::RandomField;
pub use scalarfield::ScalarField;
