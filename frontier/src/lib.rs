pub mod args;
pub mod error;
pub mod generation;
pub mod parameters;
pub mod railroad;
pub mod road_builder;
pub mod settlement;
pub mod spline;
pub mod transfer;

#[cfg(test)]
mod fixtures;

#[cfg(test)]
#[macro_use]
extern crate hamcrest;
#[cfg(test)]
#[macro_use]
extern crate maplit;

extern crate commons;
extern crate network;
extern crate pioneer;
extern crate serde;
extern crate thiserror;

pub use error::GenerationError;
pub use generation::{compute_transport, generate, Generation, Terrain, Transport};
pub use parameters::{ManualOverrides, Parameters, SavedMap};
