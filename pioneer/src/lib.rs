pub mod biome;
pub mod constraints;
pub mod downhill_map;
pub mod elevation;
pub mod error;
pub mod flow_map;
pub mod hops;
pub mod mesh;
pub mod points;
pub mod rain;
pub mod region_index;
pub mod simulator;
pub mod terrain_band;

extern crate commons;
extern crate delaunator;
extern crate serde;
extern crate thiserror;

pub use error::{FieldError, MeshError};
pub use mesh::Mesh;
pub use simulator::{TerrainFields, TerrainSimulator};
