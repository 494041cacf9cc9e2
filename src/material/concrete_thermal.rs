use super::{eurocode, QueryValue, UniaxialMaterial};
use crate::StrError;
use log::warn;
use serde::{Deserialize, Serialize};

/// Holds parameters for the thermal-degradation concrete model (ambient values)
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamConcreteThermal {
    /// Compressive strength (negative)
    pub fc: f64,

    /// Strain at the compressive strength (negative)
    pub epsc0: f64,

    /// Crushing strength (negative)
    pub fcu: f64,

    /// Strain at the crushing strength (negative)
    pub epscu: f64,

    /// Ratio between the unloading slope and the initial slope
    pub rat: f64,

    /// Tensile strength (positive)
    pub ft: f64,

    /// Tension softening modulus (positive)
    pub ets: f64,
}

/// Implements a bilinear hysteretic concrete model with Eurocode thermal degradation
///
/// The mechanical law combines a Hognestad-type compression envelope (parabola,
/// linear descending branch, flat residual), a linear tension envelope with
/// softening, and secant-based unloading/reloading between strain extremes.
/// [`ConcreteThermal::update_temperature`] degrades the strength and
/// deformation parameters with temperature following EN 1992-1-2, provides the
/// free thermal elongation per EN 1994-1-2, and handles the residual-strength
/// interpolation while cooling.
///
/// # Reference
///
/// * Yassin MHM (1994) Nonlinear analysis of prestressed concrete structures
///   under monotonic and cyclic loads, PhD dissertation, UC Berkeley
#[derive(Clone, Debug)]
pub struct ConcreteThermal {
    /// Integer identifier
    tag: i32,

    /// Ambient (input) parameters
    param: ParamConcreteThermal,

    // temperature-adjusted working values
    fc: f64,
    epsc0: f64,
    fcu: f64,
    epscu: f64,
    rat: f64,
    ft: f64,
    ets: f64,

    // committed history
    ecmin_c: f64, // minimum (most negative) strain reached
    dept_c: f64,  // depth of the excursion into the tension envelope
    eps_c: f64,
    sig_c: f64,
    e_c: f64,
    temp_c: f64,

    // trial values
    ecmin: f64,
    dept: f64,
    eps: f64,
    sig: f64,
    e: f64,

    // temperature state
    temp: f64,
    temp_max: f64,
    thermal_strain: f64,
    cooling: bool,
}

impl ConcreteThermal {
    /// Allocates a new instance
    pub fn new(tag: i32, param: ParamConcreteThermal) -> Result<Self, StrError> {
        if param.fc >= 0.0 {
            return Err("fc must be negative");
        }
        if param.epsc0 >= 0.0 {
            return Err("epsc0 must be negative");
        }
        if param.fcu >= 0.0 {
            return Err("fcu must be negative");
        }
        if param.epscu >= 0.0 {
            return Err("epscu must be negative");
        }
        if param.rat <= 0.0 {
            return Err("rat must be positive");
        }
        if param.ft < 0.0 {
            return Err("ft must not be negative");
        }
        if param.ets <= 0.0 {
            return Err("ets must be positive");
        }
        let e0 = 2.0 * param.fc / param.epsc0;
        Ok(ConcreteThermal {
            tag,
            param,
            fc: param.fc,
            epsc0: param.epsc0,
            fcu: param.fcu,
            epscu: param.epscu,
            rat: param.rat,
            ft: param.ft,
            ets: param.ets,
            ecmin_c: 0.0,
            dept_c: 0.0,
            eps_c: 0.0,
            sig_c: 0.0,
            e_c: e0,
            temp_c: 0.0,
            ecmin: 0.0,
            dept: 0.0,
            eps: 0.0,
            sig: 0.0,
            e: e0,
            temp: 0.0,
            temp_max: 0.0,
            thermal_strain: 0.0,
            cooling: false,
        })
    }

    /// Updates the material properties for a new temperature
    ///
    /// `temp_max` is the maximum temperature recorded so far for this point.
    /// Returns `(tangent, elongation)` where the elongation is the free
    /// thermal strain. Temperatures above the tabulated range are logged and
    /// the previous properties are kept.
    pub fn update_temperature(&mut self, temp: f64, temp_max: f64) -> Result<(f64, f64), StrError> {
        self.temp = temp;
        self.temp_max = temp_max;

        // tension side
        match eurocode::tension_factor(temp) {
            Some(k) => {
                self.ft = k * self.param.ft;
                self.ets = if temp <= 80.0 {
                    self.param.ets
                } else {
                    k * self.param.fc * 1.5 / self.param.epsc0
                };
            }
            None => {
                self.ft = 1.0e-3;
                self.ets = 1.0e-3;
            }
        }

        // compression side
        match (eurocode::strength_factor(temp), eurocode::peak_strains(temp)) {
            (Some(k), Some((epsc0, epscu))) => {
                self.fc = k * self.param.fc;
                self.fcu = k * self.param.fcu;
                self.epsc0 = epsc0;
                self.epscu = epscu;
            }
            _ => warn!(
                "temperature {} exceeds the tabulated range; keeping previous compression properties",
                temp
            ),
        }

        // residual-strength interpolation while cooling
        self.cooling = temp < self.temp_c;
        if self.cooling && self.temp_max > 0.0 {
            if let (Some(kappa), Some((epsc0_max, epscu_max))) = (
                eurocode::strength_factor(self.temp_max),
                eurocode::peak_strains(self.temp_max),
            ) {
                let fc_max = kappa * self.param.fc;
                let fcu_max = kappa * self.param.fcu;
                let amb = eurocode::ambient_residual_factor(self.temp_max, kappa);
                let fc_amb = amb * self.param.fc;
                let fcu_amb = amb * self.param.fcu;
                self.fc = fc_max - (fc_max - fc_amb) * (self.temp_max - temp) / self.temp_max;
                self.fcu = fcu_max - (fcu_max - fcu_amb) * (self.temp_max - temp) / self.temp_max;
                self.epsc0 = epsc0_max;
                self.epscu = self.epsc0 + (epscu_max - epsc0_max) * self.fc / fc_max;
                self.ft = 0.0;
            }
        }

        // free thermal elongation
        match eurocode::thermal_elongation(temp) {
            Some(v) => self.thermal_strain = v,
            None => warn!(
                "temperature {} exceeds the elongation table; keeping previous elongation",
                temp
            ),
        }
        Ok((1.5 * self.fc / self.epsc0, self.thermal_strain))
    }

    /// Returns the current free thermal elongation strain
    pub fn thermal_strain(&self) -> f64 {
        self.thermal_strain
    }

    /// Returns the current (temperature-adjusted) compressive strength
    pub fn current_fc(&self) -> f64 {
        self.fc
    }

    /// Returns the current (temperature-adjusted) tensile strength
    pub fn current_ft(&self) -> f64 {
        self.ft
    }

    /// Evaluates the tension envelope at a strain measured from the tension anchor
    fn tension_envelope(&self, epsc: f64) -> (f64, f64) {
        let ec0 = 2.0 * self.fc / self.epsc0;
        let eps0 = self.ft / ec0;
        let epsu = self.ft * (1.0 / self.ets + 1.0 / ec0);
        if epsc <= eps0 {
            (epsc * ec0, ec0)
        } else if epsc <= epsu {
            (self.ft - self.ets * (epsc - eps0), -self.ets)
        } else {
            (0.0, 1.0e-10)
        }
    }

    /// Evaluates the compression envelope
    fn compression_envelope(&self, epsc: f64) -> (f64, f64) {
        let ec0 = 2.0 * self.fc / self.epsc0;
        let rat = epsc / self.epsc0;
        if epsc >= self.epsc0 {
            (self.fc * rat * (2.0 - rat), ec0 * (1.0 - rat))
        } else if epsc > self.epscu {
            (
                (self.fcu - self.fc) * (epsc - self.epsc0) / (self.epscu - self.epsc0) + self.fc,
                (self.fcu - self.fc) / (self.epscu - self.epsc0),
            )
        } else {
            (self.fcu, 1.0e-10)
        }
    }
}

impl UniaxialMaterial for ConcreteThermal {
    fn tag(&self) -> i32 {
        self.tag
    }

    fn set_trial_strain(&mut self, strain: f64) -> Result<(), StrError> {
        let ec0 = 2.0 * self.fc / self.epsc0;
        self.ecmin = self.ecmin_c;
        self.dept = self.dept_c;
        self.eps = strain;
        let deps = self.eps - self.eps_c;
        if self.eps < self.ecmin {
            // virgin loading on the compression envelope
            let (sig, e) = self.compression_envelope(self.eps);
            self.sig = sig;
            self.e = e;
            self.ecmin = self.eps;
        } else {
            // unloading/reloading slope anchored at the minimum strain
            let epsr = (self.fcu - self.rat * ec0 * self.epscu) / (ec0 * (1.0 - self.rat));
            let sigmr = ec0 * epsr;
            let (sigmm, _) = self.compression_envelope(self.ecmin);
            let er = (sigmm - sigmr) / (self.ecmin - epsr);
            let ept = self.ecmin - sigmm / er;
            if self.eps <= ept {
                let sigmin = sigmm + er * (self.eps - self.ecmin);
                let sigmax = er * 0.5 * (self.eps - ept);
                self.sig = self.sig_c + ec0 * deps;
                self.e = ec0;
                if self.sig <= sigmin {
                    self.sig = sigmin;
                    self.e = er;
                }
                if self.sig >= sigmax {
                    self.sig = sigmax;
                    self.e = 0.5 * er;
                }
            } else {
                // tension side, shifted by the anchor strain ept
                let epn = ept + self.dept;
                if self.eps <= epn {
                    let (sicn, _) = self.tension_envelope(self.dept);
                    self.e = if self.dept != 0.0 { sicn / self.dept } else { ec0 };
                    self.sig = self.e * (self.eps - ept);
                } else {
                    let (sig, e) = self.tension_envelope(self.eps - ept);
                    self.sig = sig;
                    self.e = e;
                    self.dept = self.eps - ept;
                }
            }
        }
        Ok(())
    }

    fn strain(&self) -> f64 {
        self.eps
    }

    fn stress(&self) -> f64 {
        self.sig
    }

    fn tangent(&self) -> f64 {
        self.e
    }

    fn initial_tangent(&self) -> f64 {
        2.0 * self.fc / self.epsc0
    }

    fn commit_state(&mut self) -> Result<(), StrError> {
        self.ecmin_c = self.ecmin;
        self.dept_c = self.dept;
        self.e_c = self.e;
        self.sig_c = self.sig;
        self.eps_c = self.eps;
        self.temp_c = self.temp;
        Ok(())
    }

    fn revert_to_last_commit(&mut self) {
        self.ecmin = self.ecmin_c;
        self.dept = self.dept_c;
        self.e = self.e_c;
        self.sig = self.sig_c;
        self.eps = self.eps_c;
    }

    fn revert_to_start(&mut self) {
        let e0 = 2.0 * self.fc / self.epsc0;
        self.ecmin_c = 0.0;
        self.dept_c = 0.0;
        self.eps_c = 0.0;
        self.sig_c = 0.0;
        self.e_c = e0;
        self.ecmin = 0.0;
        self.dept = 0.0;
        self.eps = 0.0;
        self.sig = 0.0;
        self.e = e0;
    }

    fn get_copy(&self) -> Box<dyn UniaxialMaterial> {
        Box::new(self.clone())
    }

    fn to_record(&self) -> Vec<f64> {
        vec![
            self.fc,
            self.epsc0,
            self.fcu,
            self.epscu,
            self.rat,
            self.ft,
            self.ets,
            self.ecmin_c,
            self.dept_c,
            self.eps_c,
            self.sig_c,
            self.e_c,
            self.tag as f64,
        ]
    }

    fn restore_from_record(&mut self, data: &[f64]) -> Result<(), StrError> {
        if data.len() != 13 {
            return Err("thermal concrete record must have 13 values");
        }
        self.fc = data[0];
        self.epsc0 = data[1];
        self.fcu = data[2];
        self.epscu = data[3];
        self.rat = data[4];
        self.ft = data[5];
        self.ets = data[6];
        self.ecmin_c = data[7];
        self.dept_c = data[8];
        self.eps_c = data[9];
        self.sig_c = data[10];
        self.e_c = data[11];
        self.tag = data[12] as i32;
        self.revert_to_last_commit();
        Ok(())
    }

    fn query(&self, key: &str) -> Option<QueryValue> {
        match key {
            "ec" => Some(QueryValue::Scalar(self.epsc0)),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ConcreteThermal, ParamConcreteThermal};
    use crate::material::{QueryValue, SampleParams, UniaxialMaterial};
    use approx::assert_relative_eq;

    #[test]
    fn captures_wrong_input() {
        let mut param = SampleParams::param_concrete_thermal();
        param.fc = 30.0;
        assert_eq!(
            ConcreteThermal::new(1, param).err(),
            Some("fc must be negative")
        );
        let mut param = SampleParams::param_concrete_thermal();
        param.ets = 0.0;
        assert_eq!(
            ConcreteThermal::new(1, param).err(),
            Some("ets must be positive")
        );
    }

    #[test]
    fn compression_envelope_is_exact_at_peak() -> Result<(), crate::StrError> {
        let param = SampleParams::param_concrete_thermal();
        let mut model = ConcreteThermal::new(1, param)?;
        model.set_trial_strain(param.epsc0)?;
        assert_relative_eq!(model.stress(), param.fc, epsilon = 1e-12);
        assert_relative_eq!(model.tangent(), 0.0, epsilon = 1e-12);
        // crushing plateau
        model.set_trial_strain(param.epscu - 0.01)?;
        assert_relative_eq!(model.stress(), param.fcu, epsilon = 1e-12);
        assert_eq!(model.tangent(), 1.0e-10);
        Ok(())
    }

    #[test]
    fn temperature_below_80_is_identity() -> Result<(), crate::StrError> {
        let param = SampleParams::param_concrete_thermal();
        let mut model = ConcreteThermal::new(1, param)?;
        let (et, elong) = model.update_temperature(80.0, 80.0)?;
        assert_eq!(model.current_fc(), param.fc);
        assert_eq!(model.current_ft(), param.ft);
        assert_relative_eq!(et, 1.5 * param.fc / param.epsc0, epsilon = 1e-12);
        assert!(elong > 0.0);
        if let Some(QueryValue::Scalar(ec)) = model.query("ec") {
            assert_eq!(ec, -0.004);
        } else {
            panic!("query must return the strain at peak stress");
        }
        Ok(())
    }

    #[test]
    fn heating_degrades_strength() -> Result<(), crate::StrError> {
        let param = SampleParams::param_concrete_thermal();
        let mut model = ConcreteThermal::new(1, param)?;
        model.update_temperature(580.0, 580.0)?;
        assert_relative_eq!(model.current_fc(), 0.45 * param.fc, epsilon = 1e-12);
        assert_relative_eq!(model.current_ft(), 0.0, epsilon = 1e-12);
        // softer response: peak strain deepens
        if let Some(QueryValue::Scalar(ec)) = model.query("ec") {
            assert_relative_eq!(ec, -0.025, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn cooling_interpolates_residual_strength() -> Result<(), crate::StrError> {
        let param = SampleParams::param_concrete_thermal();
        let mut model = ConcreteThermal::new(1, param)?;
        model.update_temperature(600.0, 600.0)?;
        let fc_hot = model.current_fc();
        model.commit_state()?;
        // strength decays monotonically toward the ambient residual value
        let mut prev = fc_hot;
        for temp in [500.0, 400.0, 300.0, 200.0, 100.0, 0.0] {
            model.update_temperature(temp, 600.0)?;
            let fc = model.current_fc();
            assert!(fc >= prev); // less negative would mean recovery
            assert!(fc.abs() <= prev.abs());
            assert_eq!(model.current_ft(), 0.0);
            prev = fc;
        }
        // fully cooled: 0.9 kappa residual
        let kappa = 0.45 - (600.0 - 580.0) * 0.15 / 100.0;
        assert_relative_eq!(prev, 0.9 * kappa * param.fc, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn elongation_saturates_above_680() -> Result<(), crate::StrError> {
        let param = SampleParams::param_concrete_thermal();
        let mut model = ConcreteThermal::new(1, param)?;
        let (_, a) = model.update_temperature(700.0, 700.0)?;
        let (_, b) = model.update_temperature(900.0, 900.0)?;
        assert_eq!(a, 14.009e-3);
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn commit_and_revert_are_consistent() -> Result<(), crate::StrError> {
        let param = SampleParams::param_concrete_thermal();
        let mut model = ConcreteThermal::new(1, param)?;
        model.set_trial_strain(-0.003)?;
        model.commit_state()?;
        let record = model.to_record();
        // trial evaluation never disturbs the committed state
        model.set_trial_strain(-0.001)?;
        model.revert_to_last_commit();
        assert_eq!(model.to_record(), record);
        assert_eq!(model.strain(), -0.003);
        // record round trip is exact
        let mut other = ConcreteThermal::new(2, param)?;
        other.restore_from_record(&record)?;
        assert_eq!(other.to_record(), record);
        Ok(())
    }

    #[test]
    fn unloading_reloading_stays_inside_envelope() -> Result<(), crate::StrError> {
        let param = SampleParams::param_concrete_thermal();
        let mut model = ConcreteThermal::new(1, param)?;
        model.set_trial_strain(-0.003)?;
        let sig_env = model.stress();
        model.commit_state()?;
        // unloading reduces the stress magnitude
        model.set_trial_strain(-0.002)?;
        assert!(model.stress() > sig_env);
        model.commit_state()?;
        // reloading back does not exceed the envelope stress
        model.set_trial_strain(-0.003)?;
        assert!(model.stress() >= sig_env - 1e-12);
        Ok(())
    }
}
