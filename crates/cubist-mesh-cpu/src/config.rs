use std::time::Duration;

use serde::Deserialize;

fn default_chunk_size() -> i32 {
    16
}

fn default_time_slice_ms() -> u64 {
    8
}

fn default_light_tint() -> [f32; 3] {
    [1.0, 0.85, 0.6]
}

/// Mesher tuning, loadable from TOML. Every field has a default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MeshConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
    #[serde(default = "default_time_slice_ms")]
    pub time_slice_ms: u64,
    #[serde(default = "default_light_tint")]
    pub light_tint: [f32; 3],
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            time_slice_ms: default_time_slice_ms(),
            light_tint: default_light_tint(),
        }
    }
}

impl MeshConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut cfg: MeshConfig = toml::from_str(toml_str)?;
        cfg.chunk_size = cfg.chunk_size.max(1);
        Ok(cfg)
    }

    #[inline]
    pub fn time_slice(&self) -> Duration {
        Duration::from_millis(self.time_slice_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(MeshConfig::from_toml_str("").unwrap(), MeshConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg = MeshConfig::from_toml_str("chunk_size = 8\ntime_slice_ms = 2\n").unwrap();
        assert_eq!(cfg.chunk_size, 8);
        assert_eq!(cfg.time_slice(), Duration::from_millis(2));
        assert_eq!(cfg.light_tint, [1.0, 0.85, 0.6]);
        assert_eq!(MeshConfig::from_toml_str("chunk_size = 0").unwrap().chunk_size, 1);
    }
}
