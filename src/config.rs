use serde::{Deserialize, Serialize};

use crate::errors::{InitError, InitResult};

pub const DEFAULT_EPS_STD: f64 = 0.05;

/// Where the channel axes sit in a kernel shape. Only affects fan computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    #[default]
    ChannelsLast,
    ChannelsFirst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvolutionAwareConfig {
    // Standard deviation of the symmetry-breaking noise
    #[serde(default = "default_eps_std")]
    pub eps_std: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub data_format: DataFormat,
}

fn default_eps_std() -> f64 {
    DEFAULT_EPS_STD
}

impl Default for ConvolutionAwareConfig {
    fn default() -> Self {
        ConvolutionAwareConfig {
            eps_std: DEFAULT_EPS_STD,
            seed: None,
            data_format: DataFormat::default(),
        }
    }
}

impl ConvolutionAwareConfig {
    pub fn new(eps_std: f64, seed: Option<u64>) -> InitResult<Self> {
        let config = ConvolutionAwareConfig {
            eps_std,
            seed,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_data_format(mut self, data_format: DataFormat) -> Self {
        self.data_format = data_format;
        self
    }

    pub fn validate(&self) -> InitResult<()> {
        if !self.eps_std.is_finite() || self.eps_std <= 0.0 {
            return Err(InitError::Configuration(format!(
                "eps_std must be a positive finite number, got {}",
                self.eps_std
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
