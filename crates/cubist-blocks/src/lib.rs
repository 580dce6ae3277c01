//! Block states, render flags, and the flag registry crate.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod state;
pub mod types;

pub use registry::{BlockRegistry, BlockType, RegistryError};
pub use state::{BlockState, ParseStateError, Properties};
pub use types::{RenderFlags, Shape};
