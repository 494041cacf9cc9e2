//! Implements the Eurocode temperature dependence of concrete properties
//!
//! Piecewise tables for siliceous-aggregate concrete: compressive strength
//! reduction and peak/ultimate strains per EN 1992-1-2, residual strength
//! after cooling per EN 1994-1-2, tensile degradation, and thermal
//! elongation. Temperatures are in degrees Celsius measured above ambient
//! conditions; `None` indicates a temperature outside the tabulated range.

/// Returns the compressive strength reduction factor at a given temperature
///
/// Applies to both the peak strength and the crushing (residual) strength.
/// Valid up to 1080 °C.
pub fn strength_factor(temp: f64) -> Option<f64> {
    if temp <= 80.0 {
        Some(1.0)
    } else if temp <= 180.0 {
        Some(1.0 - (temp - 80.0) * 0.05 / 100.0)
    } else if temp <= 280.0 {
        Some(0.95 - (temp - 180.0) * 0.1 / 100.0)
    } else if temp <= 380.0 {
        Some(0.85 - (temp - 280.0) * 0.1 / 100.0)
    } else if temp <= 480.0 {
        Some(0.75 - (temp - 380.0) * 0.15 / 100.0)
    } else if temp <= 580.0 {
        Some(0.6 - (temp - 480.0) * 0.15 / 100.0)
    } else if temp <= 680.0 {
        Some(0.45 - (temp - 580.0) * 0.15 / 100.0)
    } else if temp <= 780.0 {
        Some(0.3 - (temp - 680.0) * 0.15 / 100.0)
    } else if temp <= 880.0 {
        Some(0.15 - (temp - 780.0) * 0.07 / 100.0)
    } else if temp <= 980.0 {
        Some(0.08 - (temp - 880.0) * 0.04 / 100.0)
    } else if temp <= 1080.0 {
        Some(0.04 - (temp - 980.0) * 0.03 / 100.0)
    } else {
        None
    }
}

/// Returns the strains at peak stress and at crushing at a given temperature
///
/// The peak strain saturates at -0.025 above 580 °C; the crushing strain
/// keeps growing to -0.0475 at 1080 °C. Valid up to 1080 °C.
pub fn peak_strains(temp: f64) -> Option<(f64, f64)> {
    if temp <= 0.0 {
        Some((-0.0025, -0.02))
    } else if temp <= 80.0 {
        Some((
            -(0.0025 + (0.004 - 0.0025) * temp / 80.0),
            -(0.02 + (0.0225 - 0.02) * temp / 80.0),
        ))
    } else if temp <= 180.0 {
        Some((
            -(0.004 + (0.0055 - 0.004) * (temp - 80.0) / 100.0),
            -(0.0225 + 0.0025 * (temp - 80.0) / 100.0),
        ))
    } else if temp <= 280.0 {
        Some((
            -(0.0055 + (0.007 - 0.0055) * (temp - 180.0) / 100.0),
            -(0.025 + 0.0025 * (temp - 180.0) / 100.0),
        ))
    } else if temp <= 380.0 {
        Some((
            -(0.007 + (0.01 - 0.007) * (temp - 280.0) / 100.0),
            -(0.0275 + 0.0025 * (temp - 280.0) / 100.0),
        ))
    } else if temp <= 480.0 {
        Some((
            -(0.01 + (0.015 - 0.01) * (temp - 380.0) / 100.0),
            -(0.03 + 0.0025 * (temp - 380.0) / 100.0),
        ))
    } else if temp <= 580.0 {
        Some((
            -(0.015 + (0.025 - 0.015) * (temp - 480.0) / 100.0),
            -(0.0325 + 0.0025 * (temp - 480.0) / 100.0),
        ))
    } else if temp <= 680.0 {
        Some((-0.025, -(0.035 + 0.0025 * (temp - 580.0) / 100.0)))
    } else if temp <= 780.0 {
        Some((-0.025, -(0.0375 + 0.0025 * (temp - 680.0) / 100.0)))
    } else if temp <= 880.0 {
        Some((-0.025, -(0.04 + 0.0025 * (temp - 780.0) / 100.0)))
    } else if temp <= 980.0 {
        Some((-0.025, -(0.0425 + 0.0025 * (temp - 880.0) / 100.0)))
    } else if temp <= 1080.0 {
        Some((-0.025, -(0.045 + 0.0025 * (temp - 980.0) / 100.0)))
    } else {
        None
    }
}

/// Returns the residual strength factor after cooling down to ambient
///
/// `kappa` is the strength factor at the maximum reached temperature.
pub fn ambient_residual_factor(temp_max: f64, kappa: f64) -> f64 {
    if temp_max <= 80.0 {
        kappa
    } else if temp_max <= 280.0 {
        1.0 - 0.235 * (temp_max - 80.0) / 200.0
    } else {
        0.9 * kappa
    }
}

/// Returns the tensile strength reduction factor at a given temperature
///
/// Linear decay from 80 °C to zero at 580 °C; `None` above 580 °C, where
/// tensile resistance is treated as exhausted.
pub fn tension_factor(temp: f64) -> Option<f64> {
    if temp <= 80.0 {
        Some(1.0)
    } else if temp <= 580.0 {
        Some(1.0 - (temp - 80.0) / 500.0)
    } else {
        None
    }
}

/// Returns the free thermal elongation strain at a given temperature
///
/// EN 1994-1-2 curve for siliceous aggregates with a plateau of 14.009e-3
/// between 680 °C and 1180 °C. Valid up to 1180 °C.
pub fn thermal_elongation(temp: f64) -> Option<f64> {
    if temp <= 1.0 {
        Some(temp * 9.213e-6)
    } else if temp <= 680.0 {
        let t = temp + 20.0;
        Some(-1.8e-4 + 9e-6 * t + 2.3e-11 * t * t * t)
    } else if temp <= 1180.0 {
        Some(14.009e-3)
    } else {
        None
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
