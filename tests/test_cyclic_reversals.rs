use approx::assert_relative_eq;
use unimat::{ConcreteCyclic, Rule, SampleParams, StrError, StrainPath, UniaxialMaterial};

#[test]
fn full_reversal_cycle_works() -> Result<(), StrError> {
    let param = SampleParams::param_concrete_cyclic();
    let mut model = ConcreteCyclic::new(1, param)?;

    // compression excursion on the envelope
    model.set_trial_strain(-0.003)?;
    assert_eq!(model.active_rule(), Rule::ComprEnvelope);
    let sig_env = model.stress();
    assert!(sig_env < 0.9 * param.fpcc && sig_env > param.fpcc);
    model.commit_state()?;

    // unload: the stress magnitude drops, the tangent starts near ec
    model.set_trial_strain(-0.0025)?;
    assert_eq!(model.active_rule(), Rule::UnloadCompr);
    assert!(model.stress() > sig_env);
    model.commit_state()?;

    // keep pulling through the plastic point into the connecting curve
    model.set_trial_strain(-0.0013)?;
    assert_eq!(model.active_rule(), Rule::ConnectTens);
    model.commit_state()?;

    // reversal from the connecting curve triggers an inner curve
    model.set_trial_strain(-0.002)?;
    assert_eq!(model.active_rule(), Rule::InnerNeg);
    model.commit_state()?;

    // deep compression returns to the envelope
    model.set_trial_strain(-0.006)?;
    assert_eq!(model.active_rule(), Rule::ComprEnvelope);
    Ok(())
}

#[test]
fn growing_cycles_stay_bounded() -> Result<(), StrError> {
    let param = SampleParams::param_concrete_cyclic();
    let mut model = ConcreteCyclic::new(1, param)?;
    let path = StrainPath::new_cycles(0.008, 3, 40)?;
    let states = path.follow(&mut model)?;
    for state in &states {
        assert!(state.stress.is_finite());
        assert!(state.tangent.is_finite());
        // compression never exceeds the envelope peak, tension never the strength
        assert!(state.stress >= param.fpcc * 1.001);
        assert!(state.stress <= param.ft * 1.001);
    }
    // the hysteresis dissipates energy: the net work on the specimen is positive
    let mut work = 0.0;
    for pair in states.windows(2) {
        work += 0.5 * (pair[1].stress + pair[0].stress) * (pair[1].strain - pair[0].strain);
    }
    assert!(work > 0.0);
    Ok(())
}

#[test]
fn partial_unloading_uses_the_starred_path() -> Result<(), StrError> {
    let param = SampleParams::param_concrete_cyclic();
    let mut model = ConcreteCyclic::new(1, param)?;
    model.set_trial_strain(-0.003)?;
    model.commit_state()?;
    model.set_trial_strain(-0.002)?;
    assert_eq!(model.active_rule(), Rule::UnloadCompr);
    model.commit_state()?;
    // reversing halfway down the unloading curve stores the partial point
    model.set_trial_strain(-0.0025)?;
    assert_eq!(model.active_rule(), Rule::PartialCompr);
    model.commit_state()?;
    // reversing once more from the starred path produces an inner curve
    model.set_trial_strain(-0.0022)?;
    assert_eq!(model.active_rule(), Rule::InnerPos);
    Ok(())
}

#[test]
fn serialization_round_trip_is_bit_for_bit() -> Result<(), StrError> {
    let param = SampleParams::param_concrete_cyclic();
    let mut model = ConcreteCyclic::new(9, param)?;
    for strain in [-0.002, -0.001, -0.0035, 0.0002] {
        model.set_trial_strain(strain)?;
        model.commit_state()?;
    }
    let record = model.to_record();
    assert_eq!(record.len(), 31);
    let mut restored = ConcreteCyclic::new(1, param)?;
    restored.restore_from_record(&record)?;
    assert_eq!(restored.to_record(), record);
    assert_eq!(restored.tag(), 9);
    // the restored model continues identically
    let mut a = model.get_copy();
    let mut b = restored.get_copy();
    for strain in [-0.001, -0.004, 0.0005] {
        a.set_trial_strain(strain)?;
        b.set_trial_strain(strain)?;
        assert_eq!(a.stress(), b.stress());
        assert_eq!(a.tangent(), b.tangent());
        a.commit_state()?;
        b.commit_state()?;
    }
    Ok(())
}

#[test]
fn crack_gap_reversals_follow_rules_14_and_15() -> Result<(), StrError> {
    let mut param = SampleParams::param_concrete_cyclic();
    param.xcrp = 1.5; // cracking at a finite tensile strain
    let mut model = ConcreteCyclic::new(1, param)?;

    // compress, crack, then start closing the gap
    model.set_trial_strain(-0.003)?;
    model.commit_state()?;
    model.set_trial_strain(0.004)?;
    assert_eq!(model.active_rule(), Rule::TensResidual);
    model.commit_state()?;
    model.set_trial_strain(-0.0015)?;
    assert_eq!(model.active_rule(), Rule::GapClose);
    let sig_closing = model.stress();
    assert!(sig_closing < 0.0);
    model.commit_state()?;

    // releasing mid-closure reverses inside the open crack
    model.set_trial_strain(-0.0012)?;
    assert_eq!(model.active_rule(), Rule::GapReversal);
    assert!(model.stress() < 0.0 && model.stress() > sig_closing);
    model.commit_state()?;

    // reversing again re-fits back onto the closure curve
    model.set_trial_strain(-0.0013)?;
    assert_eq!(model.active_rule(), Rule::GapRetarget);
    assert!(model.stress() < 0.0 && model.stress() > param.fpcc);
    model.commit_state()?;

    // one more release inside the gap stays on the reversal curve
    model.set_trial_strain(-0.00125)?;
    assert_eq!(model.active_rule(), Rule::GapReversal);
    model.commit_state()?;

    // deep compression runs through the closure down to the envelope
    model.set_trial_strain(-0.005)?;
    assert_eq!(model.active_rule(), Rule::ComprEnvelope);
    assert!(model.stress() < sig_closing);
    assert!(model.stress() > param.fpcc * 1.001);
    Ok(())
}

#[test]
fn gap_closure_flag_stiffens_the_reloading() -> Result<(), StrError> {
    let base = SampleParams::param_concrete_cyclic();
    let mut gradual = base;
    gradual.gap_close = true;
    let mut plain = ConcreteCyclic::new(1, base)?;
    let mut stiff = ConcreteCyclic::new(2, gradual)?;

    // identical compression and tension excursions establish both unloading points
    for model in [&mut plain, &mut stiff] {
        model.set_trial_strain(-0.003)?;
        model.commit_state()?;
        model.set_trial_strain(0.0005)?;
        model.commit_state()?;
        // reloading back into compression crosses the crack closing region
        model.set_trial_strain(-0.002)?;
        assert_eq!(model.active_rule(), Rule::ConnectCompr);
    }

    // the nonzero plastic slope picks the stress up earlier while closing
    assert!(stiff.stress() < plain.stress());
    assert!(plain.stress() < 0.0);
    Ok(())
}

#[test]
fn unloading_tangent_matches_the_elastic_modulus() -> Result<(), StrError> {
    let param = SampleParams::param_concrete_cyclic();
    let mut model = ConcreteCyclic::new(1, param)?;
    model.set_trial_strain(-0.004)?;
    model.commit_state()?;
    model.set_trial_strain(-0.00399)?;
    assert_relative_eq!(model.tangent(), param.ec, max_relative = 0.02);
    Ok(())
}
