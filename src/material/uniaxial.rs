use crate::StrError;

/// Holds the result of a string-keyed material query
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    /// Single value
    Scalar(f64),

    /// List of values
    Vector(Vec<f64>),
}

/// Specifies the essential functions of uniaxial material models
///
/// The lifecycle follows the trial/committed state pattern: the trial state
/// is a pure function of the committed state and the trial strain, and only
/// [`UniaxialMaterial::commit_state`] turns trial into committed.
pub trait UniaxialMaterial: Send {
    /// Returns the integer identifier of this material instance
    fn tag(&self) -> i32;

    /// Computes the trial stress and tangent for a given total strain
    ///
    /// Always restarts from the committed state; calling this repeatedly
    /// with different strains is path independent.
    fn set_trial_strain(&mut self, strain: f64) -> Result<(), StrError>;

    /// Returns the trial strain
    fn strain(&self) -> f64;

    /// Returns the trial stress
    fn stress(&self) -> f64;

    /// Returns the trial tangent modulus
    fn tangent(&self) -> f64;

    /// Returns the elastic modulus at zero strain
    fn initial_tangent(&self) -> f64;

    /// Makes the trial history and state become committed
    fn commit_state(&mut self) -> Result<(), StrError>;

    /// Discards the trial state, restoring the committed one
    fn revert_to_last_commit(&mut self);

    /// Wipes all history; material parameters are retained
    fn revert_to_start(&mut self);

    /// Returns a fully independent copy with identical parameters and committed state
    fn get_copy(&self) -> Box<dyn UniaxialMaterial>;

    /// Returns the fixed-order numeric record for persistence and exchange
    fn to_record(&self) -> Vec<f64>;

    /// Restores parameters, history, and committed state from a record
    fn restore_from_record(&mut self, data: &[f64]) -> Result<(), StrError>;

    /// Answers a string-keyed query; None means the key is not handled here
    fn query(&self, key: &str) -> Option<QueryValue>;
}
