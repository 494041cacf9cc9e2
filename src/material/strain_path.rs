use super::UniaxialMaterial;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds the converged response at one point of a strain path
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct StatePoint {
    /// Total strain
    pub strain: f64,

    /// Stress
    pub stress: f64,

    /// Tangent modulus
    pub tangent: f64,
}

/// Holds a sequence of strain points for driving a uniaxial material
pub struct StrainPath {
    /// Strain points visited in order
    pub strains: Vec<f64>,
}

impl StrainPath {
    /// Allocates a path from explicit strain points
    pub fn new(strains: &[f64]) -> Self {
        StrainPath {
            strains: strains.to_vec(),
        }
    }

    /// Allocates a symmetric cyclic path with growing amplitude
    ///
    /// Each cycle visits `-k·amplitude/cycles`, back through zero, then
    /// `+k·amplitude/cycles` with `points` subdivisions per excursion.
    pub fn new_cycles(amplitude: f64, cycles: usize, points: usize) -> Result<Self, StrError> {
        if amplitude <= 0.0 {
            return Err("amplitude must be positive");
        }
        if cycles < 1 || points < 1 {
            return Err("cycles and points must be at least 1");
        }
        let mut strains = vec![0.0];
        let mut current = 0.0;
        for cycle in 1..=cycles {
            let peak = amplitude * (cycle as f64) / (cycles as f64);
            for &target in &[-peak, peak] {
                let start = current;
                for i in 1..=points {
                    strains.push(start + (target - start) * (i as f64) / (points as f64));
                }
                current = target;
            }
        }
        Ok(StrainPath { strains })
    }

    /// Drives a material through the path, committing each point
    pub fn follow(&self, model: &mut dyn UniaxialMaterial) -> Result<Vec<StatePoint>, StrError> {
        let mut states = Vec::with_capacity(self.strains.len());
        for &strain in &self.strains {
            model.set_trial_strain(strain)?;
            model.commit_state()?;
            states.push(StatePoint {
                strain: model.strain(),
                stress: model.stress(),
                tangent: model.tangent(),
            });
        }
        Ok(states)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::StrainPath;

    #[test]
    fn captures_wrong_input() {
        assert_eq!(
            StrainPath::new_cycles(-1.0, 2, 4).err(),
            Some("amplitude must be positive")
        );
        assert_eq!(
            StrainPath::new_cycles(0.01, 0, 4).err(),
            Some("cycles and points must be at least 1")
        );
    }

    #[test]
    fn cycles_visit_growing_peaks() {
        let path = StrainPath::new_cycles(0.01, 2, 5).unwrap();
        assert_eq!(path.strains[0], 0.0);
        let min = path.strains.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = path.strains.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, -0.01);
        assert_eq!(max, 0.01);
        // first negative peak is half the final amplitude
        assert!(path.strains.contains(&-0.005));
    }
}
