use super::{tsai_y, tsai_z, QueryValue, TransitionCurve, UniaxialMaterial};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds parameters for the cyclic concrete model
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamConcreteCyclic {
    /// Compressive strength (negative)
    pub fpcc: f64,

    /// Strain at the compressive strength (negative)
    pub epcc: f64,

    /// Initial tangent modulus (positive)
    pub ec: f64,

    /// Shape parameter of the compression envelope
    pub rc: f64,

    /// Non-dimensional critical strain on the compression envelope
    pub xcrn: f64,

    /// Tensile strength (positive)
    pub ft: f64,

    /// Strain at the tensile strength (positive)
    pub et: f64,

    /// Shape parameter of the tension envelope
    pub rt: f64,

    /// Non-dimensional critical strain on the tension envelope
    pub xcrp: f64,

    /// Restrict the response to the monotonic envelopes
    pub monotonic: bool,

    /// Use the gradual gap-closure stiffness while reloading through a crack
    pub gap_close: bool,
}

/// Indicates the direction of the last strain increment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    /// No strain excursion yet
    None,

    /// Strain was increasing (toward tension)
    Up,

    /// Strain was decreasing (toward compression)
    Down,
}

impl Dir {
    fn to_code(self) -> f64 {
        match self {
            Dir::None => 0.0,
            Dir::Up => 1.0,
            Dir::Down => -1.0,
        }
    }

    fn from_code(code: f64) -> Result<Self, StrError> {
        if code == 0.0 {
            Ok(Dir::None)
        } else if code == 1.0 {
            Ok(Dir::Up)
        } else if code == -1.0 {
            Ok(Dir::Down)
        } else {
            Err("unknown increment direction code in record")
        }
    }
}

/// Identifies the active response curve following the rule numbering of Chang and Mander
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Virgin state before the first nonzero strain excursion
    Initial,

    /// Rule 1: compression envelope
    ComprEnvelope,

    /// Rule 2: tension envelope
    TensEnvelope,

    /// Rule 3: unloading from the compression envelope
    UnloadCompr,

    /// Rule 4: unloading from the tension envelope
    UnloadTens,

    /// Rule 5: spalled (zero stress) region of the compression envelope
    ComprResidual,

    /// Rule 6: cracked (zero stress) region of the tension envelope
    TensResidual,

    /// Rule 7: reloading toward the compression envelope
    ReloadCompr,

    /// Rule 8: reloading toward the tension envelope
    ReloadTens,

    /// Rule 9: connecting curve from the compression plastic point to the tension unloading point
    ConnectTens,

    /// Rule 10: connecting curve from the tension plastic point to the compression unloading point
    ConnectCompr,

    /// Rule 11: inner reversal heading negative, targeting the strain eb
    InnerNeg,

    /// Rule 12: inner reversal heading positive, targeting the strain ea
    InnerPos,

    /// Rule 13: crack closing curve toward the compression unloading point
    GapClose,

    /// Rule 14: reversal inside the open crack toward the zero stress strain
    GapReversal,

    /// Rule 15: inner reversal re-targeting the crack closing curve
    GapRetarget,

    /// Rule 66: open crack plateau (zero stress)
    CrackPlateau,

    /// Rule 77: partial re-unloading path on the compression side
    PartialCompr,

    /// Rule 88: partial re-unloading path on the tension side
    PartialTens,
}

impl Rule {
    fn to_code(self) -> f64 {
        match self {
            Rule::Initial => 0.0,
            Rule::ComprEnvelope => 1.0,
            Rule::TensEnvelope => 2.0,
            Rule::UnloadCompr => 3.0,
            Rule::UnloadTens => 4.0,
            Rule::ComprResidual => 5.0,
            Rule::TensResidual => 6.0,
            Rule::ReloadCompr => 7.0,
            Rule::ReloadTens => 8.0,
            Rule::ConnectTens => 9.0,
            Rule::ConnectCompr => 10.0,
            Rule::InnerNeg => 11.0,
            Rule::InnerPos => 12.0,
            Rule::GapClose => 13.0,
            Rule::GapReversal => 14.0,
            Rule::GapRetarget => 15.0,
            Rule::CrackPlateau => 66.0,
            Rule::PartialCompr => 77.0,
            Rule::PartialTens => 88.0,
        }
    }

    fn from_code(code: f64) -> Result<Self, StrError> {
        let rule = match code as i32 {
            0 => Rule::Initial,
            1 => Rule::ComprEnvelope,
            2 => Rule::TensEnvelope,
            3 => Rule::UnloadCompr,
            4 => Rule::UnloadTens,
            5 => Rule::ComprResidual,
            6 => Rule::TensResidual,
            7 => Rule::ReloadCompr,
            8 => Rule::ReloadTens,
            9 => Rule::ConnectTens,
            10 => Rule::ConnectCompr,
            11 => Rule::InnerNeg,
            12 => Rule::InnerPos,
            13 => Rule::GapClose,
            14 => Rule::GapReversal,
            15 => Rule::GapRetarget,
            66 => Rule::CrackPlateau,
            77 => Rule::PartialCompr,
            88 => Rule::PartialTens,
            _ => return Err("unknown rule code in record"),
        };
        Ok(rule)
    }
}

/// Holds the history defining the hysteretic state
#[derive(Clone, Copy, Debug, PartialEq)]
struct CyclicHistory {
    /// Unloading point on the compression side (strain, stress)
    eunn: f64,
    funn: f64,

    /// Unloading point on the tension side (strain, stress)
    eunp: f64,
    funp: f64,

    /// Last inner reversal point (strain, stress)
    er: f64,
    fr: f64,

    /// Partial re-unloading point on the compression side (strain, stress)
    er0n: f64,
    fr0n: f64,

    /// Partial re-unloading point on the tension side (strain, stress)
    er0p: f64,
    fr0p: f64,

    /// Shifted origin of the tension envelope (crack offset)
    e0: f64,

    /// Target strain of positive-going inner reversals
    ea: f64,

    /// Target strain of negative-going inner reversals
    eb: f64,

    /// Strain where the crack closing curve starts
    ed: f64,

    /// Direction of the last strain increment
    inc: Dir,

    /// Active rule
    rule: Rule,
}

impl CyclicHistory {
    fn zero() -> Self {
        CyclicHistory {
            eunn: 0.0,
            funn: 0.0,
            eunp: 0.0,
            funp: 0.0,
            er: 0.0,
            fr: 0.0,
            er0n: 0.0,
            fr0n: 0.0,
            er0p: 0.0,
            fr0p: 0.0,
            e0: 0.0,
            ea: 0.0,
            eb: 0.0,
            ed: 0.0,
            inc: Dir::None,
            rule: Rule::Initial,
        }
    }
}

/// Holds the degraded reloading quantities derived from the history
///
/// All values are pure functions of the parameters and the history points;
/// quantities whose defining points coincide (e.g. the starred values before
/// any partial re-unloading happened) are not finite and must not be used by
/// the rules that would read them.
struct Derived {
    // compression side
    esecn: f64,
    espln: f64,
    epln: f64,
    fnewn: f64,
    enewn: f64,
    esren: f64,
    fren: f64,
    eren: f64,
    fnewstn: f64,
    enewstn: f64,
    esrestn: f64,
    frestn: f64,
    erestn: f64,

    // tension side
    esplp: f64,
    eplp: f64,
    fnewp: f64,
    enewp: f64,
    esrep: f64,
    frep: f64,
    erep: f64,
    fnewstp: f64,
    enewstp: f64,
    esrestp: f64,
    frestp: f64,
    erestp: f64,
}

/// Implements the cyclic hysteretic concrete model of Chang and Mander
///
/// The envelopes follow Tsai's equation with a linear tail up to the
/// critical non-dimensional strains `xcrn` (spalling) and `xcrp` (cracking);
/// transitions between envelope branches follow smooth [`TransitionCurve`]
/// segments selected by a set of numbered rules ([`Rule`]) covering
/// unloading, reloading, inner reversals, partial re-unloading, and crack
/// closure with an optional gradual gap-closure stiffness.
///
/// # Reference
///
/// * Chang GA, Mander JB (1994) Seismic energy based fatigue damage analysis
///   of bridge columns: Part 1 - Evaluation of seismic capacity,
///   NCEER Technical Report 94-0006
#[derive(Clone, Debug)]
pub struct ConcreteCyclic {
    /// Integer identifier
    tag: i32,

    /// Material parameters
    param: ParamConcreteCyclic,

    /// Committed history
    hist: CyclicHistory,

    /// Committed strain, stress, and tangent
    strain_c: f64,
    stress_c: f64,
    tangent_c: f64,

    /// Trial history
    t_hist: CyclicHistory,

    /// Trial strain, stress, and tangent
    strain: f64,
    stress: f64,
    tangent: f64,
}

impl ConcreteCyclic {
    /// Allocates a new instance
    pub fn new(tag: i32, param: ParamConcreteCyclic) -> Result<Self, StrError> {
        if param.fpcc >= 0.0 {
            return Err("fpcc must be negative");
        }
        if param.epcc >= 0.0 {
            return Err("epcc must be negative");
        }
        if param.ec <= 0.0 {
            return Err("ec must be positive");
        }
        if param.ft <= 0.0 {
            return Err("ft must be positive");
        }
        if param.et <= 0.0 {
            return Err("et must be positive");
        }
        if param.xcrn <= 0.0 || param.xcrp <= 0.0 {
            return Err("xcrn and xcrp must be positive");
        }
        Ok(ConcreteCyclic {
            tag,
            param,
            hist: CyclicHistory::zero(),
            strain_c: 0.0,
            stress_c: 0.0,
            tangent_c: param.ec,
            t_hist: CyclicHistory::zero(),
            strain: 0.0,
            stress: 0.0,
            tangent: param.ec,
        })
    }

    /// Returns the rule active in the trial state
    pub fn active_rule(&self) -> Rule {
        self.t_hist.rule
    }

    /// Returns the rule of the committed state
    pub fn committed_rule(&self) -> Rule {
        self.hist.rule
    }

    /// Evaluates the compression envelope (rules 1 and 5)
    fn compr_envelope(&self, e: f64) -> (f64, f64, Rule) {
        let p = &self.param;
        let x = (e / p.epcc).abs();
        let n = (p.ec * p.epcc / p.fpcc).abs();
        let y_cr = tsai_y(p.xcrn, n, p.rc);
        let z_cr = tsai_z(p.xcrn, n, p.rc);
        let xsp = (p.xcrn - y_cr / (n * z_cr)).abs();
        if x <= xsp {
            if x < p.xcrn {
                (
                    p.fpcc * tsai_y(x, n, p.rc),
                    p.ec * tsai_z(x, n, p.rc),
                    Rule::ComprEnvelope,
                )
            } else {
                (
                    p.fpcc * (y_cr + n * z_cr * (x - p.xcrn)),
                    p.ec * z_cr,
                    Rule::ComprEnvelope,
                )
            }
        } else {
            (0.0, 0.0, Rule::ComprResidual)
        }
    }

    /// Evaluates the tension envelope shifted by the crack offset (rules 2 and 6)
    fn tens_envelope(&self, e: f64, e0: f64) -> (f64, f64, Rule) {
        let p = &self.param;
        let x = ((e - e0) / p.et).abs();
        let n = p.ec * p.et / p.ft;
        let y_cr = tsai_y(p.xcrp, n, p.rt);
        let z_cr = tsai_z(p.xcrp, n, p.rt);
        let xcrk = (p.xcrp - y_cr / (n * z_cr)).abs();
        if x <= xcrk {
            if x < p.xcrp {
                (
                    p.ft * tsai_y(x, n, p.rt),
                    p.ec * tsai_z(x, n, p.rt),
                    Rule::TensEnvelope,
                )
            } else {
                (
                    p.ft * (y_cr + n * z_cr * (x - p.xcrp)),
                    p.ec * z_cr,
                    Rule::TensEnvelope,
                )
            }
        } else {
            (0.0, 0.0, Rule::TensResidual)
        }
    }

    /// Evaluates compression envelope stress and tangent without rule classification
    fn compr_target(&self, e: f64) -> (f64, f64) {
        let (s, t, _) = self.compr_envelope(e);
        (s, t)
    }

    /// Evaluates tension envelope stress and tangent without rule classification
    fn tens_target(&self, e: f64, e0: f64) -> (f64, f64) {
        let (s, t, _) = self.tens_envelope(e, e0);
        (s, t)
    }

    /// Computes the degraded reloading quantities from a history
    fn derived(&self, h: &CyclicHistory) -> Derived {
        let p = &self.param;

        // compression side
        let xn = (h.eunn / p.epcc).abs();
        let esecn = p.ec * (((h.funn / (p.ec * p.epcc)).abs() + 0.57) / (xn + 0.57));
        let espln = h.eunn - h.funn / esecn;
        let epln = 0.1 * p.ec * (-2.0 * xn).exp();
        let delen = h.eunn / (1.15 + 2.75 * xn);
        let delfn = if h.eunn <= p.epcc / 10.0 {
            0.09 * h.funn * xn.sqrt()
        } else {
            0.0
        };
        let fnewn = h.funn - delfn;
        let enewn = if h.eunn == espln {
            p.ec
        } else {
            f64::min(p.ec, fnewn / (h.eunn - espln))
        };
        let esren = h.eunn + delen;
        let (fren, eren) = self.compr_target(esren);
        let fnewstn = h.funn - delfn * ((h.eunn - h.er0n) / (h.eunn - espln));
        let enewstn = (fnewstn - h.fr0n) / (h.eunn - h.er0n);
        let esrestn = h.eunn + delen * (h.eunn - h.er0n) / (h.eunn - espln);
        let (frestn, erestn) = self.compr_target(esrestn);

        // tension side
        let xp = ((h.eunp - h.e0) / p.et).abs();
        let mut esecp = p.ec * (((h.funp / (p.ec * p.et)).abs() + 0.67) / (xp + 0.67));
        let floor = (h.funp / (h.eunp - espln)).abs();
        if esecp < floor {
            esecp = floor;
        }
        let esplp = h.eunp - h.funp / esecp;
        let eplp = if p.gap_close {
            p.ec / (xp.powf(1.1) + 1.0)
        } else {
            0.0
        };
        let delep = 0.22 * (h.eunp - h.e0).abs();
        let delfp = if h.eunp >= h.e0 + p.et / 2.0 {
            0.15 * h.funp
        } else {
            0.0
        };
        let fnewp = h.funp - delfp;
        let enewp = if h.eunp == esplp {
            p.ec
        } else {
            f64::min(p.ec, fnewp / (h.eunp - esplp))
        };
        let esrep = h.eunp + delep;
        let (frep, erep) = self.tens_target(esrep, h.e0);
        let fnewstp = h.funp - delfp * ((h.eunp - h.er0p) / (h.eunp - esplp));
        let enewstp = (fnewstp - h.fr0p) / (h.eunp - h.er0p);
        let esrestp = h.eunp + delep * (h.eunp - h.er0p) / (h.eunp - esplp);
        let (frestp, erestp) = self.tens_target(esrestp, h.e0);

        Derived {
            esecn,
            espln,
            epln,
            fnewn,
            enewn,
            esren,
            fren,
            eren,
            fnewstn,
            enewstn,
            esrestn,
            frestn,
            erestn,
            esplp,
            eplp,
            fnewp,
            enewp,
            esrep,
            frep,
            erep,
            fnewstp,
            enewstp,
            esrestp,
            frestp,
            erestp,
        }
    }

    /// Updates the crack offset and the tension unloading point after a new
    /// compression unloading point has been established
    ///
    /// Returns `(e0, eunp, funp)`.
    fn update_crack_offset(&self, h: &CyclicHistory) -> (f64, f64, f64) {
        let p = &self.param;
        let xun = (h.eunn / p.epcc).abs();
        let xup = ((h.eunp - h.e0) / p.et).abs();
        let xup = f64::max(xup, xun);
        let (e0_ref, eunp_ref, funp_ref) = if ((h.eunp - h.e0) / p.et).abs() < xun {
            let eunp_ref = xun * p.et;
            let (f, _, _) = self.tens_envelope(eunp_ref, 0.0);
            (0.0, eunp_ref, f)
        } else {
            (h.e0, h.eunp, h.funp)
        };

        // plastic quantities from the new compression unloading point
        let esecn = p.ec * (((h.funn / (p.ec * p.epcc)).abs() + 0.57) / (xun + 0.57));
        let espln = h.eunn - h.funn / esecn;
        let epln = 0.1 * p.ec * (-2.0 * xun).exp();

        // secant stiffness of the reference tension unloading point
        let xp_ref = ((eunp_ref - e0_ref) / p.et).abs();
        let mut esecp = p.ec * (((funp_ref / (p.ec * p.et)).abs() + 0.67) / (xp_ref + 0.67));
        let floor = (funp_ref / (eunp_ref - espln)).abs();
        if esecp < floor {
            esecp = floor;
        }

        let dele0 = 2.0 * funp_ref / (esecp + epln);
        let e0 = espln + dele0 - xup * p.et;
        let eunp = xup * p.et + e0;
        let (funp, _, _) = self.tens_envelope(eunp, e0);
        (e0, eunp, funp)
    }

    /// Computes the target strain of rules 11/12 from the negative target eb
    fn ea_inner(&self, h: &CyclicHistory, d: &Derived) -> f64 {
        d.espln + ((h.eunn - h.eb) / (h.eunn - d.esplp)) * (h.eunp - d.espln)
    }

    /// Computes the target strain of rules 11/12 from the positive target ea
    fn eb_inner(&self, h: &CyclicHistory, d: &Derived) -> f64 {
        h.eunn - ((h.ea - d.espln) / (h.eunp - d.espln)) * (h.eunn - d.esplp)
    }

    /// Returns the response on the line through the plastic point espln
    ///
    /// Used as the crack closing patch whenever the rule 10 or rule 13 curve
    /// degenerates to its secant.
    fn plastic_line(&self, e: f64, d: &Derived) -> (f64, f64) {
        if e >= d.espln {
            (0.0, 0.0)
        } else {
            (d.enewn * (e - d.espln), d.enewn)
        }
    }

    /// Evaluates the rule 10 curve with the crack closing patch
    fn connect_compr_value(&self, e: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64) {
        let c = TransitionCurve::new(d.esplp, 0.0, d.eplp, h.eunn, d.fnewn, d.enewn);
        let (s, t) = c.eval(e);
        if t == c.secant() {
            self.plastic_line(e, d)
        } else {
            (s, t)
        }
    }

    /// Evaluates the rule 13 curve with the crack closing patch
    fn gap_close_value(&self, e: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64) {
        let c = TransitionCurve::new(h.ed, 0.0, 0.0, h.eunn, d.fnewn, d.enewn);
        let (s, t) = c.eval(e);
        if t == c.secant() {
            self.plastic_line(e, d)
        } else {
            (s, t)
        }
    }

    /// Evaluates the positive-going chain: rules 3, 9, 8, then the tension envelope
    fn pos_chain(&self, e: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e <= d.espln {
            let c = TransitionCurve::new(h.eunn, h.funn, self.param.ec, d.espln, 0.0, d.epln);
            let (s, t) = c.eval(e);
            (s, t, Rule::UnloadCompr)
        } else if e <= h.eunp {
            let c = TransitionCurve::new(d.espln, 0.0, d.epln, h.eunp, d.fnewp, d.enewp);
            let (s, t) = c.eval(e);
            (s, t, Rule::ConnectTens)
        } else if e <= d.esrep {
            let c = TransitionCurve::new(h.eunp, d.fnewp, d.enewp, d.esrep, d.frep, d.erep);
            let (s, t) = c.eval(e);
            (s, t, Rule::ReloadTens)
        } else {
            self.tens_envelope(e, h.e0)
        }
    }

    /// Evaluates an inner reversal toward the positive-going chain (rule 12)
    fn pos_inner(&self, e: f64, er: f64, fr: f64, ea: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e <= ea {
            let (fa, eta) = {
                let (s, t, _) = self.pos_chain(ea, h, d);
                (s, t)
            };
            let c = TransitionCurve::new(er, fr, self.param.ec, ea, fa, eta);
            let (s, t) = c.eval(e);
            (s, t, Rule::InnerPos)
        } else {
            self.pos_chain(e, h, d)
        }
    }

    /// Evaluates the two-segment partial reloading path on the tension side (rule 88)
    fn pos_partial_chain(&self, e: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e < d.esrestp {
            let c = if e <= h.eunp {
                TransitionCurve::new(h.er0p, h.fr0p, self.param.ec, h.eunp, d.fnewstp, d.enewstp)
            } else {
                TransitionCurve::new(h.eunp, d.fnewstp, d.enewstp, d.esrestp, d.frestp, d.erestp)
            };
            let (s, t) = c.eval(e);
            (s, t, Rule::PartialTens)
        } else {
            self.tens_envelope(e, h.e0)
        }
    }

    /// Evaluates an inner reversal toward the rule 88 path (rule 12)
    fn pos_partial_inner(&self, e: f64, er: f64, fr: f64, ea: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e <= ea {
            let (fa, eta) = {
                let (s, t, _) = self.pos_partial_chain(ea, h, d);
                (s, t)
            };
            let c = TransitionCurve::new(er, fr, self.param.ec, ea, fa, eta);
            let (s, t) = c.eval(e);
            (s, t, Rule::InnerPos)
        } else {
            self.pos_partial_chain(e, h, d)
        }
    }

    /// Evaluates the negative-going chain: rules 4, 10, 7, then the compression envelope
    fn neg_chain(&self, e: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e >= d.esplp {
            let c = TransitionCurve::new(h.eunp, h.funp, self.param.ec, d.esplp, 0.0, d.eplp);
            let (s, t) = c.eval(e);
            (s, t, Rule::UnloadTens)
        } else if e >= h.eunn {
            let (s, t) = self.connect_compr_value(e, h, d);
            (s, t, Rule::ConnectCompr)
        } else if e >= d.esren {
            let c = TransitionCurve::new(h.eunn, d.fnewn, d.enewn, d.esren, d.fren, d.eren);
            let (s, t) = c.eval(e);
            (s, t, Rule::ReloadCompr)
        } else {
            self.compr_envelope(e)
        }
    }

    /// Evaluates an inner reversal toward the negative-going chain (rule 11)
    fn neg_inner(&self, e: f64, er: f64, fr: f64, eb: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e >= eb {
            let (fb, etb) = {
                let (s, t, _) = self.neg_chain(eb, h, d);
                (s, t)
            };
            let c = TransitionCurve::new(er, fr, self.param.ec, eb, fb, etb);
            let (s, t) = c.eval(e);
            (s, t, Rule::InnerNeg)
        } else {
            self.neg_chain(e, h, d)
        }
    }

    /// Evaluates the two-segment partial reloading path on the compression side (rule 77)
    fn neg_partial_chain(&self, e: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e > d.esrestn {
            let c = if e >= h.eunn {
                TransitionCurve::new(h.er0n, h.fr0n, self.param.ec, h.eunn, d.fnewstn, d.enewstn)
            } else {
                TransitionCurve::new(h.eunn, d.fnewstn, d.enewstn, d.esrestn, d.frestn, d.erestn)
            };
            let (s, t) = c.eval(e);
            (s, t, Rule::PartialCompr)
        } else {
            self.compr_envelope(e)
        }
    }

    /// Evaluates an inner reversal toward the rule 77 path (rule 11)
    fn neg_partial_inner(&self, e: f64, er: f64, fr: f64, eb: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e >= eb {
            let (fb, etb) = {
                let (s, t, _) = self.neg_partial_chain(eb, h, d);
                (s, t)
            };
            let c = TransitionCurve::new(er, fr, self.param.ec, eb, fb, etb);
            let (s, t) = c.eval(e);
            (s, t, Rule::InnerNeg)
        } else {
            self.neg_partial_chain(e, h, d)
        }
    }

    /// Evaluates the crack closing chain: rule 13, 7, then the compression envelope
    fn gap_neg_chain(&self, e: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e >= h.eunn {
            let (s, t) = self.gap_close_value(e, h, d);
            (s, t, Rule::GapClose)
        } else if e >= d.esren {
            let c = TransitionCurve::new(h.eunn, d.fnewn, d.enewn, d.esren, d.fren, d.eren);
            let (s, t) = c.eval(e);
            (s, t, Rule::ReloadCompr)
        } else {
            self.compr_envelope(e)
        }
    }

    /// Evaluates an inner reversal re-targeting the crack closing chain (rule 15)
    fn gap_neg_inner(&self, e: f64, er: f64, fr: f64, ea: f64, h: &CyclicHistory, d: &Derived) -> (f64, f64, Rule) {
        if e >= ea {
            let (fa, eta) = self.gap_close_value(ea, h, d);
            let c = TransitionCurve::new(er, fr, self.param.ec, ea, fa, eta);
            let (s, t) = c.eval(e);
            (s, t, Rule::GapRetarget)
        } else {
            self.gap_neg_chain(e, h, d)
        }
    }

    /// Evaluates the release chain inside the open crack: rules 14, 66, then 6
    fn gap_pos_chain(&self, e: f64, er: f64, fr: f64, eb: f64, eunp: f64) -> (f64, f64, Rule) {
        if e <= eb {
            let c = TransitionCurve::new(er, fr, self.param.ec, eb, 0.0, 0.0);
            let (s, t) = c.eval(e);
            (s, t, Rule::GapReversal)
        } else if e < eunp {
            (0.0, 0.0, Rule::CrackPlateau)
        } else {
            (0.0, 0.0, Rule::TensResidual)
        }
    }
}

impl UniaxialMaterial for ConcreteCyclic {
    fn tag(&self) -> i32 {
        self.tag
    }

    fn set_trial_strain(&mut self, strain: f64) -> Result<(), StrError> {
        // the trial state always restarts from the committed state
        self.revert_to_last_commit();
        self.strain = strain;
        let p = self.param;

        // monotonic response and the virgin state
        if p.monotonic || self.hist.inc == Dir::None {
            let (s, t, rule) = if strain < 0.0 {
                self.compr_envelope(strain)
            } else if strain > 0.0 {
                self.tens_envelope(strain, 0.0)
            } else {
                (0.0, p.ec, Rule::Initial)
            };
            let mut h = CyclicHistory::zero();
            h.inc = if strain < 0.0 {
                Dir::Down
            } else if strain > 0.0 {
                Dir::Up
            } else {
                Dir::None
            };
            h.rule = rule;
            self.t_hist = h;
            self.stress = s;
            self.tangent = t;
            return Ok(());
        }

        let eps_c = self.strain_c;
        let sc = self.stress_c;
        let tc = self.tangent_c;
        let h0 = self.hist;
        let mut h = h0;
        h.inc = if strain > eps_c {
            Dir::Up
        } else if strain < eps_c {
            Dir::Down
        } else {
            h0.inc
        };

        let (s, t, rule) = match h0.inc {
            Dir::Down => {
                if strain > eps_c {
                    // reversal toward tension
                    match h0.rule {
                        Rule::ComprEnvelope | Rule::ComprResidual | Rule::ReloadCompr => {
                            h.eunn = eps_c;
                            h.funn = sc;
                            let (e0, eunp, funp) = self.update_crack_offset(&h);
                            h.e0 = e0;
                            h.eunp = eunp;
                            h.funp = funp;
                            let d = self.derived(&h);
                            self.pos_chain(strain, &h, &d)
                        }
                        Rule::ConnectCompr => {
                            h.er = eps_c;
                            h.fr = sc;
                            h.eb = h.er;
                            let d = self.derived(&h);
                            h.ea = self.ea_inner(&h, &d);
                            self.pos_inner(strain, h.er, h.fr, h.ea, &h, &d)
                        }
                        Rule::InnerNeg => {
                            h.er = eps_c;
                            h.fr = sc;
                            let d = self.derived(&h);
                            if h.eb != h.er0p {
                                self.pos_inner(strain, h.er, h.fr, h.ea, &h, &d)
                            } else {
                                self.pos_partial_inner(strain, h.er, h.fr, h.ea, &h, &d)
                            }
                        }
                        Rule::GapClose | Rule::GapRetarget => {
                            h.er = eps_c;
                            h.fr = sc;
                            let d = self.derived(&h);
                            if h0.rule == Rule::GapClose {
                                h.ea = h.er;
                                h.eb = h.ea - h.fr / d.esecn;
                            }
                            self.gap_pos_chain(strain, h.er, h.fr, h.eb, h.eunp)
                        }
                        Rule::UnloadTens => {
                            h.er0p = eps_c;
                            h.fr0p = sc;
                            h.eb = h.er0p;
                            let d = self.derived(&h);
                            self.pos_partial_chain(strain, &h, &d)
                        }
                        Rule::PartialCompr => {
                            if eps_c >= h0.eunn {
                                h.er = eps_c;
                                h.fr = sc;
                                h.eb = h.er;
                                h.ea = h.er0n;
                                let d = self.derived(&h);
                                self.pos_inner(strain, h.er, h.fr, h.ea, &h, &d)
                            } else {
                                // the previous unloading point was passed: fresh unloading
                                h.eunn = eps_c;
                                h.funn = sc;
                                let (e0, eunp, funp) = self.update_crack_offset(&h);
                                h.e0 = e0;
                                h.eunp = eunp;
                                h.funp = funp;
                                let d = self.derived(&h);
                                self.pos_chain(strain, &h, &d)
                            }
                        }
                        _ => (sc, tc, h0.rule),
                    }
                } else {
                    // continuing toward compression
                    let d = self.derived(&h);
                    match h0.rule {
                        Rule::UnloadTens | Rule::ConnectCompr | Rule::ReloadCompr => {
                            self.neg_chain(strain, &h, &d)
                        }
                        Rule::ComprEnvelope | Rule::ComprResidual => self.compr_envelope(strain),
                        Rule::PartialCompr => self.neg_partial_chain(strain, &h, &d),
                        Rule::GapClose => self.gap_neg_chain(strain, &h, &d),
                        Rule::GapRetarget => self.gap_neg_inner(strain, h.er, h.fr, h.ea, &h, &d),
                        Rule::InnerNeg => {
                            if h.ea != h.er0n {
                                self.neg_inner(strain, h.er, h.fr, h.eb, &h, &d)
                            } else {
                                self.neg_partial_inner(strain, h.er, h.fr, h.eb, &h, &d)
                            }
                        }
                        _ => (sc, tc, h0.rule),
                    }
                }
            }
            Dir::Up => {
                if strain < eps_c {
                    // reversal toward compression
                    if sc.abs() == 0.0 {
                        // the crack is open: close it through rule 13
                        h.eunp = eps_c;
                        h.funp = 0.0;
                        let (f, _, _) = self.compr_envelope(h.eunn);
                        h.funn = f;
                        h.er = eps_c;
                        h.fr = sc;
                        h.ed = h.er;
                        let d = self.derived(&h);
                        self.gap_neg_chain(strain, &h, &d)
                    } else {
                        match h0.rule {
                            Rule::TensEnvelope | Rule::ReloadTens => {
                                h.eunp = eps_c;
                                let (f, _, _) = self.tens_envelope(h.eunp, h.e0);
                                h.funp = f;
                                let d = self.derived(&h);
                                self.neg_chain(strain, &h, &d)
                            }
                            Rule::ConnectTens => {
                                h.er = eps_c;
                                h.fr = sc;
                                h.ea = h.er;
                                let d = self.derived(&h);
                                h.eb = self.eb_inner(&h, &d);
                                self.neg_inner(strain, h.er, h.fr, h.eb, &h, &d)
                            }
                            Rule::InnerPos => {
                                h.er = eps_c;
                                h.fr = sc;
                                let d = self.derived(&h);
                                if h.ea != h.er0n {
                                    self.neg_inner(strain, h.er, h.fr, h.eb, &h, &d)
                                } else {
                                    self.neg_partial_inner(strain, h.er, h.fr, h.eb, &h, &d)
                                }
                            }
                            Rule::GapReversal => {
                                h.er = eps_c;
                                h.fr = sc;
                                let d = self.derived(&h);
                                self.gap_neg_inner(strain, h.er, h.fr, h.ea, &h, &d)
                            }
                            Rule::UnloadCompr => {
                                h.er0n = eps_c;
                                h.fr0n = sc;
                                h.ea = h.er0n;
                                let d = self.derived(&h);
                                self.neg_partial_chain(strain, &h, &d)
                            }
                            Rule::PartialTens => {
                                if eps_c <= h0.eunp {
                                    h.er = eps_c;
                                    h.fr = sc;
                                    h.ea = h.er;
                                    h.eb = h.er0p;
                                    let d = self.derived(&h);
                                    self.neg_inner(strain, h.er, h.fr, h.eb, &h, &d)
                                } else {
                                    h.eunp = eps_c;
                                    let (f, _, _) = self.tens_envelope(h.eunp, h.e0);
                                    h.funp = f;
                                    let d = self.derived(&h);
                                    self.neg_chain(strain, &h, &d)
                                }
                            }
                            _ => (sc, tc, h0.rule),
                        }
                    }
                } else {
                    // continuing toward tension
                    let d = self.derived(&h);
                    match h0.rule {
                        Rule::UnloadCompr | Rule::ConnectTens | Rule::ReloadTens => {
                            self.pos_chain(strain, &h, &d)
                        }
                        Rule::TensEnvelope => self.tens_envelope(strain, h.e0),
                        Rule::TensResidual => (0.0, 0.0, Rule::TensResidual),
                        Rule::PartialTens => self.pos_partial_chain(strain, &h, &d),
                        Rule::GapReversal => self.gap_pos_chain(strain, h.er, h.fr, h.eb, h.eunp),
                        Rule::CrackPlateau => {
                            if strain < h.eunp {
                                (0.0, 0.0, Rule::CrackPlateau)
                            } else {
                                (0.0, 0.0, Rule::TensResidual)
                            }
                        }
                        Rule::InnerPos => {
                            if h.eb != h.er0p {
                                self.pos_inner(strain, h.er, h.fr, h.ea, &h, &d)
                            } else {
                                self.pos_partial_inner(strain, h.er, h.fr, h.ea, &h, &d)
                            }
                        }
                        _ => (sc, tc, h0.rule),
                    }
                }
            }
            Dir::None => (sc, tc, h0.rule),
        };

        h.rule = rule;
        self.t_hist = h;
        self.stress = s;
        self.tangent = t;
        Ok(())
    }

    fn strain(&self) -> f64 {
        self.strain
    }

    fn stress(&self) -> f64 {
        self.stress
    }

    fn tangent(&self) -> f64 {
        self.tangent
    }

    fn initial_tangent(&self) -> f64 {
        self.param.ec
    }

    fn commit_state(&mut self) -> Result<(), StrError> {
        self.hist = self.t_hist;
        self.strain_c = self.strain;
        self.stress_c = self.stress;
        self.tangent_c = self.tangent;
        Ok(())
    }

    fn revert_to_last_commit(&mut self) {
        self.t_hist = self.hist;
        self.strain = self.strain_c;
        self.stress = self.stress_c;
        self.tangent = self.tangent_c;
    }

    fn revert_to_start(&mut self) {
        self.hist = CyclicHistory::zero();
        self.strain_c = 0.0;
        self.stress_c = 0.0;
        self.tangent_c = self.param.ec;
        self.revert_to_last_commit();
    }

    fn get_copy(&self) -> Box<dyn UniaxialMaterial> {
        Box::new(self.clone())
    }

    fn to_record(&self) -> Vec<f64> {
        let p = &self.param;
        let h = &self.hist;
        vec![
            self.tag as f64,
            p.fpcc,
            p.epcc,
            p.ec,
            p.rc,
            p.xcrn,
            p.ft,
            p.et,
            p.rt,
            p.xcrp,
            if p.monotonic { 1.0 } else { 0.0 },
            if p.gap_close { 1.0 } else { 0.0 },
            h.eunn,
            h.funn,
            h.eunp,
            h.funp,
            h.er,
            h.fr,
            h.er0n,
            h.fr0n,
            h.er0p,
            h.fr0p,
            h.e0,
            h.ea,
            h.eb,
            h.ed,
            h.inc.to_code(),
            h.rule.to_code(),
            self.strain_c,
            self.stress_c,
            self.tangent_c,
        ]
    }

    fn restore_from_record(&mut self, data: &[f64]) -> Result<(), StrError> {
        if data.len() != 31 {
            return Err("cyclic concrete record must have 31 values");
        }
        self.tag = data[0] as i32;
        self.param.fpcc = data[1];
        self.param.epcc = data[2];
        self.param.ec = data[3];
        self.param.rc = data[4];
        self.param.xcrn = data[5];
        self.param.ft = data[6];
        self.param.et = data[7];
        self.param.rt = data[8];
        self.param.xcrp = data[9];
        self.param.monotonic = data[10] != 0.0;
        self.param.gap_close = data[11] != 0.0;
        self.hist = CyclicHistory {
            eunn: data[12],
            funn: data[13],
            eunp: data[14],
            funp: data[15],
            er: data[16],
            fr: data[17],
            er0n: data[18],
            fr0n: data[19],
            er0p: data[20],
            fr0p: data[21],
            e0: data[22],
            ea: data[23],
            eb: data[24],
            ed: data[25],
            inc: Dir::from_code(data[26])?,
            rule: Rule::from_code(data[27])?,
        };
        self.strain_c = data[28];
        self.stress_c = data[29];
        self.tangent_c = data[30];
        self.revert_to_last_commit();
        Ok(())
    }

    fn query(&self, key: &str) -> Option<QueryValue> {
        let p = &self.param;
        match key {
            "getCommittedConcreteStrain" => Some(QueryValue::Scalar(self.strain_c)),
            "getCommittedConcreteStress" => Some(QueryValue::Scalar(self.stress_c)),
            "getCommittedCyclicCrackingConcreteStrain" => Some(QueryValue::Scalar(self.hist.eunp)),
            "getInputParameters" => Some(QueryValue::Vector(vec![
                self.tag as f64,
                p.fpcc,
                p.epcc,
                p.ec,
                p.rc,
                p.xcrn,
                p.ft,
                p.et,
                p.rt,
                p.xcrp,
                if p.gap_close { 1.0 } else { 0.0 },
            ])),
            _ => None,
        }
    }
}

impl fmt::Display for ConcreteCyclic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ConcreteCyclic({}): strain = {}, stress = {}, tangent = {}",
            self.tag, self.strain_c, self.stress_c, self.tangent_c
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
