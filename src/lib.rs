//! Unimat implements uniaxial (scalar stress-strain) concrete constitutive
//! models for structural simulation under earthquake and fire loading
//!
//! The crate provides two models sharing a common lifecycle of trial
//! evaluation, commit, and revert operations:
//!
//! 1. [`ConcreteCyclic`] -- the generalized hysteretic model of Chang and
//!    Mander (1994) with Tsai-equation envelopes, smooth transition curves,
//!    and a family of numbered response rules for cyclic loading.
//! 2. [`ConcreteThermal`] -- a bilinear hysteretic concrete with Eurocode
//!    temperature-dependent degradation of strength and deformation
//!    parameters, including cooling (residual strength) and thermal
//!    elongation.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod material;
pub use crate::material::*;
