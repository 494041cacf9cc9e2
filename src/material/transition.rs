/// Holds a smooth transition curve connecting two stress-strain points
///
/// The curve joins the start point `(esi, fi)` with slope `ei` to the end
/// point `(esf, ff)` with slope `ef` using the generalized form of Chang
/// and Mander:
///
/// ```text
/// f(ε) = fi + (ε - esi) (ei + a |ε - esi|ʳ)
/// ```
///
/// with `r` and `a` solved in closed form from the boundary slopes and the
/// secant slope. Degenerate fits (boundary slopes on one side of the secant,
/// vanishing or overflowing powers) evaluate as the linear secant instead.
///
/// # Reference
///
/// * Chang GA, Mander JB (1994) Seismic energy based fatigue damage analysis
///   of bridge columns: Part 1 - Evaluation of seismic capacity,
///   NCEER Technical Report 94-0006
#[derive(Clone, Copy, Debug)]
pub struct TransitionCurve {
    /// Start strain
    pub esi: f64,

    /// Start stress
    pub fi: f64,

    /// Slope at the start point
    pub ei: f64,

    /// End strain
    pub esf: f64,

    /// End stress
    pub ff: f64,

    /// Slope at the end point
    pub ef: f64,

    /// Curvature exponent r
    r: f64,

    /// Curvature coefficient a (sentinel 1e-300 / 1e300 when the fit degenerates)
    a: f64,

    /// Start and end strains coincide
    zero_length: bool,
}

impl TransitionCurve {
    /// Fits a new transition curve between two boundary points
    pub fn new(esi: f64, fi: f64, ei: f64, esf: f64, ff: f64, ef: f64) -> Self {
        if esf == esi {
            return TransitionCurve {
                esi,
                fi,
                ei,
                esf,
                ff,
                ef,
                r: 0.0,
                a: 0.0,
                zero_length: true,
            };
        }
        let esec = (ff - fi) / (esf - esi);
        let r = (ef - esec) / (esec - ei);
        let check = (esf - esi).abs().powf(r);
        let a = if check == 0.0 || !check.is_finite() || esec == ei {
            1.0e-300
        } else {
            let a = (esec - ei) / check;
            if !a.is_finite() {
                1.0e300
            } else {
                a
            }
        };
        TransitionCurve {
            esi,
            fi,
            ei,
            esf,
            ff,
            ef,
            r,
            a,
            zero_length: false,
        }
    }

    /// Returns the secant slope between the boundary points
    ///
    /// Zero-length curves report the start slope, matching [`TransitionCurve::eval`].
    pub fn secant(&self) -> f64 {
        if self.zero_length {
            self.ei
        } else {
            (self.ff - self.fi) / (self.esf - self.esi)
        }
    }

    /// Evaluates stress and tangent at a given strain
    ///
    /// Falls back to the linear secant whenever the fit or the evaluation
    /// degenerates; callers may detect this by comparing the returned
    /// tangent with [`TransitionCurve::secant`].
    pub fn eval(&self, es: f64) -> (f64, f64) {
        if self.zero_length {
            return (self.fi, self.ei);
        }
        let esec = self.secant();
        let linear = (self.fi + esec * (es - self.esi), esec);
        if self.a == 1.0e300 || self.a == 0.0 {
            return linear;
        }
        let inv = (es - self.esi).abs().powf(-self.r);
        if inv == 0.0 || !inv.is_finite() {
            return linear;
        }
        let both_above = self.ei >= esec && self.ef >= esec;
        let both_below = self.ei <= esec && self.ef <= esec;
        if both_above || both_below {
            return linear;
        }
        let pow = (es - self.esi).abs().powf(self.r);
        let stress = self.fi + (es - self.esi) * (self.ei + self.a * pow);
        let tangent = self.ei + self.a * (self.r + 1.0) * pow;
        if !tangent.is_finite() {
            return linear;
        }
        (stress, tangent)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::TransitionCurve;
    use approx::assert_relative_eq;

    #[test]
    fn curve_matches_boundary_conditions() {
        // steep start, flat end, slopes bracketing the secant
        let (esi, fi, ei) = (-0.002, -25.0, 30000.0);
        let (esf, ff, ef) = (-0.0005, 0.0, 1000.0);
        let curve = TransitionCurve::new(esi, fi, ei, esf, ff, ef);
        let esec = (ff - fi) / (esf - esi);
        assert!(ei > esec && ef < esec);

        // endpoint stress is reproduced by the power form
        let (s_end, _) = curve.eval(esf);
        assert_relative_eq!(s_end, ff, epsilon = 1e-9);

        // tangent approaches the start slope near the start point
        let (_, t) = curve.eval(esi - 1e-9);
        assert_relative_eq!(t, ei, epsilon = 1.0);
    }

    #[test]
    fn fallback_secant_is_exact_for_interior_points() {
        // both boundary slopes above the secant force the linear fallback
        let curve = TransitionCurve::new(0.0, 0.0, 2000.0, 0.001, 1.0, 1500.0);
        let esec = curve.secant();
        assert_relative_eq!(esec, 1000.0, epsilon = 1e-12);
        for es in [0.0, 0.00025, 0.0005, 0.001] {
            let (s, t) = curve.eval(es);
            assert_eq!(t, esec);
            assert_relative_eq!(s, esec * es, epsilon = 1e-12);
        }
    }

    #[test]
    fn equal_slopes_degenerate_to_secant() {
        // ei == esec makes the exponent blow up; sentinel coefficient applies
        let curve = TransitionCurve::new(0.0, 0.0, 1000.0, 0.001, 1.0, 1000.0);
        let (s, t) = curve.eval(0.0004);
        assert_eq!(t, 1000.0);
        assert_relative_eq!(s, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn zero_length_curve_returns_start_point() {
        let curve = TransitionCurve::new(0.001, 5.0, 2000.0, 0.001, 7.0, 100.0);
        let (s, t) = curve.eval(0.001);
        assert_eq!(s, 5.0);
        assert_eq!(t, 2000.0);
        assert_eq!(curve.secant(), 2000.0);
    }

    #[test]
    fn evaluation_at_start_point_falls_back() {
        // |es - esi|^(-r) overflows at the start point itself
        let curve = TransitionCurve::new(-0.002, -25.0, 30000.0, -0.0005, 0.0, 1000.0);
        let (_, t) = curve.eval(-0.002);
        assert_eq!(t, curve.secant());
    }
}
