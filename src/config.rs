use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::kernel::matrix_multiply::DEFAULT_TILE;
use crate::{BenchError, BenchResult};

pub const DEFAULT_ARRAY_WORKERS: usize = 4;

/// Tunables for the optimized kernels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelSettings {
    /// Worker tasks used by the parallel array fill
    pub array_workers: usize,
    /// Tile edge for the tiled matrix multiply
    pub matmul_tile: usize,
}

impl Default for KernelSettings {
    fn default() -> Self {
        KernelSettings {
            array_workers: DEFAULT_ARRAY_WORKERS,
            matmul_tile: DEFAULT_TILE,
        }
    }
}

impl KernelSettings {
    fn validate(&self) -> BenchResult<()> {
        if self.array_workers == 0 {
            return Err(BenchError::Config("kernels.array_workers must be at least 1".into()));
        }
        if self.matmul_tile == 0 {
            return Err(BenchError::Config("kernels.matmul_tile must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub kernels: KernelSettings,
}

impl HarnessConfig {
    pub fn from_toml_str(s: &str) -> BenchResult<Self> {
        let cfg: HarnessConfig = toml::from_str(s).map_err(|e| BenchError::Config(e.to_string()))?;
        cfg.kernels.validate()?;
        Ok(cfg)
    }
}

pub fn load_config(path: &Path) -> BenchResult<HarnessConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    HarnessConfig::from_toml_str(&s)
}

/// Load `path` if given, otherwise use the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> BenchResult<HarnessConfig> {
    match path {
        Some(p) => load_config(p),
        None => Ok(HarnessConfig::default()),
    }
}
