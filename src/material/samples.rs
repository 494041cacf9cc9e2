use super::{ParamConcreteCyclic, ParamConcreteThermal};

/// Holds sample material parameters for testing and demonstrations
pub struct SampleParams {}

impl SampleParams {
    /// Returns parameters for the cyclic concrete model
    ///
    /// Units: MPa and dimensionless strains. A 27.6 MPa concrete with the
    /// customary Chang-Mander shape parameters.
    pub fn param_concrete_cyclic() -> ParamConcreteCyclic {
        ParamConcreteCyclic {
            fpcc: -27.6,
            epcc: -0.0045,
            ec: 25000.0,
            rc: 7.0,
            xcrn: 1.035,
            ft: 2.76,
            et: 0.00022,
            rt: 1.2,
            xcrp: 10000.0,
            monotonic: false,
            gap_close: false,
        }
    }

    /// Returns parameters for the thermal concrete model
    ///
    /// Units: MPa and dimensionless strains.
    pub fn param_concrete_thermal() -> ParamConcreteThermal {
        ParamConcreteThermal {
            fc: -30.0,
            epsc0: -0.0025,
            fcu: -6.0,
            epscu: -0.02,
            rat: 0.1,
            ft: 3.0,
            ets: 2400.0,
        }
    }
}
