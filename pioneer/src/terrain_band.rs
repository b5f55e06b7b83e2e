use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TerrainBand {
    DeepWater,
    Water,
    Coast,
    River,
    Dirtbank,
    Lowland,
    Land,
    Highland,
    Hill,
    Midmountain,
    Mountain,
}

impl TerrainBand {
    pub fn name(&self) -> &'static str {
        match self {
            TerrainBand::DeepWater => "terrain_deep_water",
            TerrainBand::Water => "terrain_water",
            TerrainBand::Coast => "terrain_coast",
            TerrainBand::River => "terrain_river",
            TerrainBand::Dirtbank => "terrain_dirtbank",
            TerrainBand::Lowland => "terrain_lowland",
            TerrainBand::Land => "terrain_land",
            TerrainBand::Highland => "terrain_highland",
            TerrainBand::Hill => "terrain_hill",
            TerrainBand::Midmountain => "terrain_midmountain",
            TerrainBand::Mountain => "terrain_mountain",
        }
    }

    pub fn is_water(&self) -> bool {
        matches!(
            self,
            TerrainBand::DeepWater | TerrainBand::Water | TerrainBand::Coast | TerrainBand::River
        )
    }
}

impl fmt::Display for TerrainBand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Upper elevation bound of each band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub deep_water_max: f32,
    pub water_max: f32,
    pub coast_max: f32,
    pub coast_max_steps: u32,
    pub dirtbank_max: f32,
    pub lowland_max: f32,
    pub land_max: f32,
    pub highland_max: f32,
    pub hill_max: f32,
    pub midmountain_max: f32,
}

impl Default for BandThresholds {
    fn default() -> BandThresholds {
        BandThresholds {
            deep_water_max: -0.2,
            water_max: -0.1,
            coast_max: 0.0,
            coast_max_steps: 3,
            dirtbank_max: 0.1,
            lowland_max: 0.2,
            land_max: 0.35,
            highland_max: 0.5,
            hill_max: 0.65,
            midmountain_max: 0.8,
        }
    }
}

impl BandThresholds {
    /// `distance_from_water` is the hop count to the nearest underwater region; shallows further
    /// out than `coast_max_steps` read as dirt rather than coast.
    pub fn band(
        &self,
        elevation: f32,
        is_river: bool,
        distance_from_water: Option<u32>,
    ) -> TerrainBand {
        if elevation < self.deep_water_max {
            TerrainBand::DeepWater
        } else if elevation < self.water_max {
            TerrainBand::Water
        } else if elevation < self.coast_max {
            match distance_from_water {
                Some(distance) if distance <= self.coast_max_steps => TerrainBand::Coast,
                _ => TerrainBand::Dirtbank,
            }
        } else if is_river {
            TerrainBand::River
        } else {
            self.land_band(elevation)
        }
    }

    pub fn land_band(&self, elevation: f32) -> TerrainBand {
        if elevation < self.dirtbank_max {
            TerrainBand::Dirtbank
        } else if elevation < self.lowland_max {
            TerrainBand::Lowland
        } else if elevation < self.land_max {
            TerrainBand::Land
        } else if elevation < self.highland_max {
            TerrainBand::Highland
        } else if elevation < self.hill_max {
            TerrainBand::Hill
        } else if elevation < self.midmountain_max {
            TerrainBand::Midmountain
        } else {
            TerrainBand::Mountain
        }
    }
}

pub fn terrain_band_at(elevation: f32) -> TerrainBand {
    BandThresholds::default().land_band(elevation)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn land_bands_should_follow_thresholds() {
        assert_eq!(terrain_band_at(0.0), TerrainBand::Dirtbank);
        assert_eq!(terrain_band_at(0.15), TerrainBand::Lowland);
        assert_eq!(terrain_band_at(0.3), TerrainBand::Land);
        assert_eq!(terrain_band_at(0.35), TerrainBand::Highland);
        assert_eq!(terrain_band_at(0.6), TerrainBand::Hill);
        assert_eq!(terrain_band_at(0.7), TerrainBand::Midmountain);
        assert_eq!(terrain_band_at(0.95), TerrainBand::Mountain);
    }

    #[test]
    fn water_bands_should_ignore_rivers() {
        let thresholds = BandThresholds::default();
        assert_eq!(thresholds.band(-0.5, true, Some(0)), TerrainBand::DeepWater);
        assert_eq!(thresholds.band(-0.15, true, Some(0)), TerrainBand::Water);
    }

    #[test]
    fn shallows_should_be_coast_only_near_water() {
        let thresholds = BandThresholds::default();
        assert_eq!(thresholds.band(-0.05, false, Some(2)), TerrainBand::Coast);
        assert_eq!(thresholds.band(-0.05, false, Some(3)), TerrainBand::Coast);
        assert_eq!(thresholds.band(-0.05, false, Some(4)), TerrainBand::Dirtbank);
        assert_eq!(thresholds.band(-0.05, false, None), TerrainBand::Dirtbank);
    }

    #[test]
    fn river_should_override_land() {
        let thresholds = BandThresholds::default();
        assert_eq!(thresholds.band(0.4, true, None), TerrainBand::River);
        assert_eq!(thresholds.band(0.4, false, None), TerrainBand::Highland);
    }

    #[test]
    fn name_should_match_zone_id() {
        assert_eq!(TerrainBand::Midmountain.to_string(), "terrain_midmountain");
        assert!(TerrainBand::Coast.is_water());
        assert!(!TerrainBand::Hill.is_water());
    }
}
