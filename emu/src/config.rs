use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

use crate::error::LoadError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Return only the live part of the stack, `[0, sp)`
    pub shorten: bool,
    /// Print the machine state before every step
    pub debug: bool,
    /// Maximum number of executed instructions
    pub tmax: Option<u64>,
}

impl RunOptions {
    pub fn load(fname: &str) -> Result<Self, LoadError> {
        let file = File::open(fname).map_err(|e| LoadError::Io(fname.to_string(), e))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|e| LoadError::Yaml(fname.to_string(), e))
    }
}
