use serde::{Deserialize, Serialize};

use crate::state::Properties;

/// Per-identifier flags consulted by the mesher for culling, bucketing and lights.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderFlags {
    pub opaque: bool,
    pub semi_transparent: bool,
    pub self_culling: bool,
    pub emissive: bool,
    pub emissive_intensity: f32,
    /// When set, the block only glows while this property is absent or `"true"`.
    pub emissive_conditional: Option<String>,
}

impl RenderFlags {
    /// Flags of a plain opaque full cube.
    pub fn opaque() -> Self {
        Self {
            opaque: true,
            self_culling: true,
            ..Self::default()
        }
    }

    /// Light intensity this block emits given its resolved properties.
    pub fn emission(&self, properties: &Properties) -> f32 {
        if !self.emissive {
            return 0.0;
        }
        match &self.emissive_conditional {
            Some(prop) => match properties.get(prop).map(String::as_str) {
                None | Some("true") => self.emissive_intensity,
                Some(_) => 0.0,
            },
            None => self.emissive_intensity,
        }
    }
}

// Shape used by the built-in model provider to select geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Cube,
    None,
}
