use std::env;
use std::path::PathBuf;
use log::{info, warn};
use crate::error::Error;

pub const DATA_ROOT:   &str = "SILK_DATA_ROOTDIR";
pub const SITE_CONFIG: &str = "SILK_CONFIG_FILE";

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub data_root:   PathBuf,
    pub site_config: PathBuf,
}

impl Location {
    pub fn new<P: Into<PathBuf>>(data_root: P, site_config: P) -> Self {
        Self {
            data_root:   data_root.into(),
            site_config: site_config.into(),
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        let data_root   = var(DATA_ROOT)?;
        let site_config = var(SITE_CONFIG)?;

        info!("{} = {}", DATA_ROOT,   data_root.display());
        info!("{} = {}", SITE_CONFIG, site_config.display());

        if !data_root.exists() {
            warn!("{} {} does not exist", DATA_ROOT, data_root.display());
        }

        if !site_config.exists() {
            warn!("{} {} does not exist", SITE_CONFIG, site_config.display());
        }

        Ok(Self { data_root, site_config })
    }
}

fn var(name: &str) -> Result<PathBuf, Error> {
    match env::var_os(name) {
        Some(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _                        => Err(Error::Config(format!("{} not set", name))),
    }
}
