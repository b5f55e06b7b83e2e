use crate::error::GenerationError;
use crate::railroad::{RailroadParams, Station, Waypoint};
use crate::road_builder::RoadParams;
use crate::settlement::TownParams;
use pioneer::elevation::ElevationParams;
use pioneer::flow_map::RiverParams;
use pioneer::rain::RainfallParams;
use pioneer::terrain_band::BandThresholds;

use serde::{Deserialize, Serialize};
use std::default::Default;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub mesh_seed: u32,
    pub spacing: f32,
    pub mountain_spacing: f32,
    pub elevation: ElevationParams,
    pub biomes: RainfallParams,
    pub rivers: RiverParams,
    pub towns: TownParams,
    pub roads: RoadParams,
    pub railroads: RailroadParams,
    pub bands: BandThresholds,
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters {
            mesh_seed: 12345,
            spacing: 5.5,
            mountain_spacing: 35.0,
            elevation: ElevationParams::default(),
            biomes: RainfallParams::default(),
            rivers: RiverParams::default(),
            towns: TownParams::default(),
            roads: RoadParams::default(),
            railroads: RailroadParams::default(),
            bands: BandThresholds::default(),
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), GenerationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GenerationError::invalid(name, value))
    }
}

fn range(name: &'static str, min: f32, max: f32) -> Result<(), GenerationError> {
    if min <= max {
        Ok(())
    } else {
        Err(GenerationError::invalid(name, format!("{}..{}", min, max)))
    }
}

impl Parameters {
    /// Rejects values no stage could run with.
    pub fn validate(&self) -> Result<(), GenerationError> {
        positive("spacing", self.spacing)?;
        positive("mountain_spacing", self.mountain_spacing)?;
        if !(0.0..=1.0).contains(&self.elevation.island) {
            return Err(GenerationError::invalid("elevation.island", self.elevation.island));
        }
        if self.towns.min_spacing < 0.0 {
            return Err(GenerationError::invalid(
                "towns.min_spacing",
                self.towns.min_spacing,
            ));
        }
        positive("towns.town_radius", self.towns.town_radius)?;
        range(
            "towns.elevation",
            self.towns.elevation_min,
            self.towns.elevation_max,
        )?;
        range(
            "towns.rainfall",
            self.towns.rainfall_min,
            self.towns.rainfall_max,
        )?;
        if self.roads.river_crossing_cost < 1.0 {
            return Err(GenerationError::invalid(
                "roads.river_crossing_cost",
                self.roads.river_crossing_cost,
            ));
        }
        if self.roads.slope_weight < 0.0 {
            return Err(GenerationError::invalid(
                "roads.slope_weight",
                self.roads.slope_weight,
            ));
        }
        Ok(())
    }
}

/// Hand edits layered over procedural generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualOverrides {
    /// Replaces procedural town placement when not empty.
    pub manual_towns: Vec<usize>,
    pub manual_stations: Vec<Station>,
    pub waypoints: Vec<Waypoint>,
}

/// Everything needed to regenerate a map exactly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedMap {
    pub parameters: Parameters,
    pub manual: ManualOverrides,
}
