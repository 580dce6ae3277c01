use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig};
use super::state::Properties;
use super::types::{RenderFlags, Shape};

const DEFAULT_NAMESPACE: &str = "minecraft:";

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("read blocks config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse blocks config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("block {0:?} is defined twice")]
    DuplicateBlock(String),
    #[error("unknown_block {0:?} is not a defined block")]
    MissingFallback(String),
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub name: String,
    pub flags: RenderFlags,
    pub shape: Shape,
    pub defaults: Properties,
}

impl BlockType {
    fn compile(def: BlockDef) -> Self {
        let shape = def.shape.unwrap_or_default();
        let semi_transparent = def.semi_transparent.unwrap_or(false);
        let opaque = def
            .opaque
            .unwrap_or(!semi_transparent && shape == Shape::Cube);
        let self_culling = def.self_culling.unwrap_or(opaque);
        let emissive = def
            .emissive
            .unwrap_or_else(|| def.emissive_intensity.is_some_and(|i| i > 0.0));
        let emissive_intensity = if emissive {
            def.emissive_intensity.unwrap_or(1.0)
        } else {
            0.0
        };
        BlockType {
            name: qualify(&def.name),
            flags: RenderFlags {
                opaque,
                semi_transparent,
                self_culling,
                emissive,
                emissive_intensity,
                emissive_conditional: def.emissive_conditional,
            },
            shape,
            defaults: def.defaults.unwrap_or_default(),
        }
    }
}

/// Flag and default-property lookup by block identifier, loaded from TOML.
#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, usize>,
    pub unknown_block: Option<usize>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks {
            reg.insert(BlockType::compile(def))?;
        }
        if let Some(name) = cfg.unknown_block {
            let idx = reg
                .index_of(&name)
                .ok_or(RegistryError::MissingFallback(name))?;
            reg.unknown_block = Some(idx);
        }
        Ok(reg)
    }

    /// Registers a block type; identifiers without a namespace get `minecraft:`.
    pub fn insert(&mut self, ty: BlockType) -> Result<(), RegistryError> {
        let name = qualify(&ty.name);
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateBlock(name));
        }
        self.by_name.insert(name.clone(), self.blocks.len());
        self.blocks.push(BlockType { name, ..ty });
        Ok(())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        match self.by_name.get(name) {
            Some(&i) => Some(i),
            None if !name.contains(':') => self.by_name.get(&qualify(name)).copied(),
            None => None,
        }
    }

    /// Exact lookup, without the unknown-block fallback.
    pub fn get(&self, name: &str) -> Option<&BlockType> {
        self.index_of(name).map(|i| &self.blocks[i])
    }

    /// Lookup that falls back to the configured unknown block.
    pub fn get_or_unknown(&self, name: &str) -> Option<&BlockType> {
        self.index_of(name)
            .or(self.unknown_block)
            .map(|i| &self.blocks[i])
    }

    /// Flags for `name`; unregistered names get all-false flags, so they never occlude.
    pub fn flags(&self, name: &str) -> RenderFlags {
        self.get(name).map(|t| t.flags.clone()).unwrap_or_default()
    }

    pub fn default_properties(&self, name: &str) -> Option<&Properties> {
        self.get(name)
            .map(|t| &t.defaults)
            .filter(|d| !d.is_empty())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn qualify(name: &str) -> String {
    if name.contains(':') {
        name.to_string()
    } else {
        format!("{DEFAULT_NAMESPACE}{name}")
    }
}
