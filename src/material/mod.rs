//! Implements uniaxial material models

mod concrete_cyclic;
mod concrete_thermal;
mod eurocode;
mod samples;
mod strain_path;
mod transition;
mod tsai;
mod uniaxial;
pub use crate::material::concrete_cyclic::*;
pub use crate::material::concrete_thermal::*;
pub use crate::material::eurocode::*;
pub use crate::material::samples::*;
pub use crate::material::strain_path::*;
pub use crate::material::transition::*;
pub use crate::material::tsai::*;
pub use crate::material::uniaxial::*;
