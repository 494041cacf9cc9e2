use structopt::StructOpt;
use unimat::{ConcreteCyclic, ConcreteThermal, SampleParams, StrError, StrainPath, UniaxialMaterial};

/// Runs a concrete model through a cyclic strain path and prints JSON
#[derive(StructOpt, Debug)]
#[structopt(name = "unimat_strain_path")]
struct Options {
    /// Model kind: cyclic or thermal
    #[structopt(default_value = "cyclic")]
    model: String,

    /// Largest strain magnitude of the path
    #[structopt(long, default_value = "0.008")]
    amplitude: f64,

    /// Number of cycles with growing amplitude
    #[structopt(long, default_value = "3")]
    cycles: usize,

    /// Points per excursion
    #[structopt(long, default_value = "50")]
    points: usize,

    /// Temperature applied before loading (thermal model only)
    #[structopt(long, default_value = "20")]
    temperature: f64,
}

fn main() -> Result<(), StrError> {
    env_logger::init();
    let opt = Options::from_args();

    let mut model: Box<dyn UniaxialMaterial> = match opt.model.as_str() {
        "cyclic" => Box::new(ConcreteCyclic::new(1, SampleParams::param_concrete_cyclic())?),
        "thermal" => {
            let mut m = ConcreteThermal::new(1, SampleParams::param_concrete_thermal())?;
            m.update_temperature(opt.temperature, opt.temperature)?;
            Box::new(m)
        }
        _ => return Err("model must be cyclic or thermal"),
    };

    let path = StrainPath::new_cycles(opt.amplitude, opt.cycles, opt.points)?;
    let states = path.follow(model.as_mut())?;
    let json = serde_json::to_string_pretty(&states).map_err(|_| "cannot serialize states")?;
    println!("{}", json);
    Ok(())
}
