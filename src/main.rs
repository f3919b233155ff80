use std::{env, error::Error, path::Path, time::Instant};

use log::info;

use convaware::{
    recorders::{JSONRecorder, Recorder},
    ConvolutionAware, Initializer,
};

// Usage: convaware [dims, e.g. 3,3,4,8] [seed] [output.json]
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let shape = match args.first() {
        Some(dims) => dims
            .split(',')
            .map(|d| d.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![3, 3, 4, 8],
    };
    let seed = match args.get(1) {
        Some(seed) => Some(seed.parse::<u64>()?),
        None => Some(42),
    };

    let init = ConvolutionAware::new(0.05, seed)?;
    let start_time = Instant::now();
    let weights = init.initialize(&shape)?;
    info!(
        "Initialized {:?} in {:?}: mean {:.6}, variance {:.6}",
        weights.shape(),
        start_time.elapsed(),
        weights.mean().unwrap_or(f32::NAN),
        weights.var(0.0),
    );

    if let Some(path) = args.get(2) {
        JSONRecorder::save_weights(&weights, Path::new(path))?;
        info!("Saved weights to {}", path);
    }
    Ok(())
}
