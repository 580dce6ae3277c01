use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Property assignments of a block state. A `BTreeMap` keeps keys sorted, which is the
/// order the canonical key is written in.
pub type Properties = BTreeMap<String, String>;

const WATER_LIKE: [&str; 2] = ["minecraft:water", "minecraft:bubble_column"];

/// Identifier plus property assignments, e.g. `minecraft:furnace[facing=north,lit=true]`.
///
/// Serialized in the palette layout used by structure files:
/// `{ "Name": "minecraft:stone", "Properties": { .. } }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockState {
    #[serde(rename = "Name")]
    name: String,
    #[serde(
        rename = "Properties",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    properties: Properties,
}

impl BlockState {
    pub fn new(name: impl Into<String>, properties: Properties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// State with no properties.
    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, Properties::new())
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    #[inline]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Canonical key: identifier, then `[k=v,...]` in key order when properties exist.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Water itself, bubble columns, and anything carrying `waterlogged=true`.
    pub fn is_waterlogged(&self) -> bool {
        WATER_LIKE.contains(&self.name.as_str()) || self.property("waterlogged") == Some("true")
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("]")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseStateError {
    #[error("empty block identifier in {0:?}")]
    EmptyName(String),
    #[error("unterminated property list in {0:?}")]
    Unterminated(String),
    #[error("malformed property {prop:?} in {key:?}")]
    MalformedProperty { key: String, prop: String },
}

impl FromStr for BlockState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, rest) = match s.find('[') {
            Some(i) => (&s[..i], Some(&s[i + 1..])),
            None => (s, None),
        };
        if name.is_empty() {
            return Err(ParseStateError::EmptyName(s.to_string()));
        }
        let mut properties = Properties::new();
        if let Some(rest) = rest {
            let body = rest
                .strip_suffix(']')
                .ok_or_else(|| ParseStateError::Unterminated(s.to_string()))?;
            for prop in body.split(',').filter(|p| !p.is_empty()) {
                let (k, v) =
                    prop.split_once('=')
                        .ok_or_else(|| ParseStateError::MalformedProperty {
                            key: s.to_string(),
                            prop: prop.to_string(),
                        })?;
                properties.insert(k.trim().to_string(), v.trim().to_string());
            }
        }
        Ok(BlockState::new(name, properties))
    }
}
