// env.rs - Environment variables read once at startup

use std::path::{Path, PathBuf};

pub const DATA_DIR_VAR: &str = "UKB_DATA_DIR";
pub const OUTPUT_DIR_VAR: &str = "UKB_OUTPUT_DIR";
pub const CONFIG_VAR: &str = "UKBPREP_CONFIG";

/// Base directories and default config path taken from the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub config: Option<String>,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            data_dir: get(DATA_DIR_VAR).map(PathBuf::from),
            output_dir: get(OUTPUT_DIR_VAR).map(PathBuf::from),
            config: get(CONFIG_VAR),
        }
    }

    /// Relative input paths are taken from the data directory
    pub fn resolve_input(&self, path: &str) -> PathBuf {
        resolve(self.data_dir.as_deref(), path)
    }

    /// Relative output paths are placed under the output directory
    pub fn resolve_output(&self, path: &str) -> PathBuf {
        resolve(self.output_dir.as_deref(), path)
    }
}

fn resolve(base: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}
