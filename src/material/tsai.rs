/// Evaluates the normalized stress of Tsai's equation
///
/// ```text
///         n x                      xʳ
/// y = ─────────    with   D = 1 + (n - ───────) x + ───────   (r ≠ 1)
///          D                           r - 1        r - 1
/// ```
///
/// For `r = 1` the denominator becomes `D = 1 + (n - 1 + ln(x)/ln(10)) x`.
/// At the peak (`x = 1`) the value is exactly `y = 1`.
///
/// # Reference
///
/// * Tsai WT (1988) Uniaxial compressional stress-strain relation of concrete,
///   Journal of Structural Engineering, 114(9):2133-2136
pub fn tsai_y(x: f64, n: f64, r: f64) -> f64 {
    let d = tsai_d(x, n, r);
    n * x / d
}

/// Evaluates the normalized tangent of Tsai's equation
///
/// ```text
///     1 - xʳ
/// z = ──────
///       D²
/// ```
///
/// At the peak (`x = 1`) the tangent is exactly zero.
pub fn tsai_z(x: f64, n: f64, r: f64) -> f64 {
    let d = tsai_d(x, n, r);
    (1.0 - x.powf(r)) / (d * d)
}

/// Evaluates the denominator shared by y and z
fn tsai_d(x: f64, n: f64, r: f64) -> f64 {
    if r == 1.0 {
        1.0 + (n - 1.0 + x.ln() / 10.0_f64.ln()) * x
    } else {
        1.0 + (n - r / (r - 1.0)) * x + x.powf(r) / (r - 1.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
