use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use crate::common::WeightsD;
use crate::config::ConvolutionAwareConfig;

// Trait for saving/loading initializer configs and generated weights into/from files
pub trait Recorder {
    fn save_config(config: &ConvolutionAwareConfig, file_path: &Path) -> io::Result<()>;

    fn load_config(file_path: &Path) -> io::Result<ConvolutionAwareConfig>;

    fn save_weights(weights: &WeightsD, file_path: &Path) -> io::Result<()>;

    fn load_weights(file_path: &Path) -> io::Result<WeightsD>;
}

pub struct JSONRecorder;

impl JSONRecorder {
    fn write<T: serde::Serialize>(value: &T, file_path: &Path) -> io::Result<()> {
        let file = File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()
    }

    fn read<T: serde::de::DeserializeOwned>(file_path: &Path) -> io::Result<T> {
        let file = File::open(file_path)?;
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(value)
    }
}

impl Recorder for JSONRecorder {
    fn save_config(config: &ConvolutionAwareConfig, file_path: &Path) -> io::Result<()> {
        Self::write(config, file_path)
    }

    fn load_config(file_path: &Path) -> io::Result<ConvolutionAwareConfig> {
        let config: ConvolutionAwareConfig = Self::read(file_path)?;
        config
            .validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    fn save_weights(weights: &WeightsD, file_path: &Path) -> io::Result<()> {
        Self::write(weights, file_path)
    }

    fn load_weights(file_path: &Path) -> io::Result<WeightsD> {
        Self::read(file_path)
    }
}
