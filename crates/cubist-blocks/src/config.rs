use serde::Deserialize;

use crate::state::Properties;
use crate::types::Shape;

// Top-level blocks config file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    // Name of a registered block whose flags and shape stand in for identifiers that are not
    // registered. Without it, unregistered identifiers fail model resolution.
    #[serde(default)]
    pub unknown_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub opaque: Option<bool>,
    #[serde(default)]
    pub semi_transparent: Option<bool>,
    #[serde(default)]
    pub self_culling: Option<bool>,
    #[serde(default)]
    pub emissive: Option<bool>,
    #[serde(default)]
    pub emissive_intensity: Option<f32>,
    #[serde(default)]
    pub emissive_conditional: Option<String>,
    #[serde(default)]
    pub shape: Option<Shape>,
    // Default property values merged under a state's explicit properties.
    #[serde(default)]
    pub defaults: Option<Properties>,
}
