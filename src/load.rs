use std::fs;
use std::path::Path;

use cubist_schem::{LoadOptions, SchemError, Schematic};
use cubist_structure::{PersistedStructure, StructureError, VoxelStructure};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("input is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Schem(#[from] SchemError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    /// `{ size, palette, blocks }`
    Structure,
    /// `{ regions: [...] }`
    Schematic,
}

impl InputFormat {
    pub fn detect(doc: &Value) -> Self {
        if doc.get("regions").is_some() {
            InputFormat::Schematic
        } else {
            InputFormat::Structure
        }
    }
}

pub fn load_structure_str(
    text: &str,
    opts: &LoadOptions,
) -> Result<(InputFormat, VoxelStructure), LoadError> {
    let doc: Value = serde_json::from_str(text)?;
    let format = InputFormat::detect(&doc);
    let structure = match format {
        InputFormat::Schematic => {
            let schem: Schematic = serde_json::from_value(doc)?;
            schem.to_structure(opts)?
        }
        InputFormat::Structure => {
            let data: PersistedStructure = serde_json::from_value(doc)?;
            VoxelStructure::from_persisted(data)?
        }
    };
    log::debug!(
        "loaded {:?} size={} blocks={} palette={}",
        format,
        structure.size(),
        structure.len(),
        structure.palette().len()
    );
    Ok((format, structure))
}

pub fn load_structure(
    path: impl AsRef<Path>,
    opts: &LoadOptions,
) -> Result<(InputFormat, VoxelStructure), LoadError> {
    let text = fs::read_to_string(path)?;
    load_structure_str(&text, opts)
}
