use crate::error::GenerationError;
use crate::parameters::{ManualOverrides, Parameters, SavedMap};
use crate::railroad::{Railroad, RailroadBuilder};
use crate::road_builder::{build_roads, RoadSegment};
use crate::settlement::{manual_towns, TownPlacer, TownSite};
use crate::spline::{build_spline_samples, SplineSample};
use commons::log::{debug, info};
use commons::V2;
use pioneer::biome::{Biome, BiomeLayout};
use pioneer::constraints::ElevationConstraints;
use pioneer::hops::{distance_from_water, is_river_region};
use pioneer::points::choose_points;
use pioneer::region_index::RegionIndex;
use pioneer::terrain_band::{BandThresholds, TerrainBand};
use pioneer::{FieldError, Mesh, TerrainFields, TerrainSimulator};
use serde::{Deserialize, Serialize};

/// The expensive part of a map: everything that depends only on the mesh and terrain
/// parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    pub mesh: Mesh,
    pub peaks: Vec<usize>,
    pub fields: TerrainFields,
    pub region_index: RegionIndex,
}

impl Terrain {
    pub fn region_at(&self, position: &V2<f32>) -> Option<usize> {
        self.region_index.region_containing(&self.mesh, position)
    }

    pub fn bands(
        &self,
        thresholds: &BandThresholds,
        min_flow: f32,
    ) -> Result<Vec<TerrainBand>, FieldError> {
        let distances = distance_from_water(&self.mesh, &self.fields)?;
        Ok((0..self.mesh.num_solid_regions())
            .map(|r| {
                thresholds.band(
                    self.fields.elevation_r[r],
                    is_river_region(&self.mesh, &self.fields, r, min_flow),
                    distances[r],
                )
            })
            .collect())
    }

    pub fn biomes(&self, mesh_seed: u32) -> Vec<Biome> {
        let layout = BiomeLayout::new(mesh_seed);
        (0..self.mesh.num_solid_regions())
            .map(|r| layout.biome_at(self.mesh.position_r(r), Some(self.fields.elevation_r[r])))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub towns: Vec<TownSite>,
    pub road_segments: Vec<RoadSegment>,
    pub railroad: Railroad,
}

impl Transport {
    pub fn town_regions(&self) -> Vec<usize> {
        self.towns.iter().map(|town| town.region).collect()
    }

    /// One curve per unbroken run of track.
    pub fn railroad_splines(&self, terrain: &Terrain) -> Vec<Vec<SplineSample>> {
        self.railroad
            .runs
            .iter()
            .map(|run| build_spline_samples(&terrain.mesh, run, &self.railroad.station_ids))
            .filter(|samples| !samples.is_empty())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    pub terrain: Terrain,
    pub transport: Transport,
}

pub fn build_terrain(parameters: &Parameters) -> Result<Terrain, GenerationError> {
    parameters.validate()?;
    let points = choose_points(
        parameters.mesh_seed,
        parameters.spacing,
        parameters.mountain_spacing,
    )?;
    let mesh = Mesh::from_points(&points)?;
    info!(
        "Built mesh with {} regions and {} triangles",
        mesh.num_solid_regions(),
        mesh.num_solid_triangles()
    );
    let peaks = mesh.peak_triangles(points.peak_regions());
    debug!("{} mountain peaks", peaks.len());

    let constraints =
        ElevationConstraints::procedural(parameters.elevation.seed, parameters.elevation.island);
    let fields = TerrainSimulator::new(&mesh, &peaks, parameters.spacing).run(
        &parameters.elevation,
        &constraints,
        &parameters.biomes,
        &parameters.rivers,
    )?;
    let land = (0..mesh.num_solid_regions())
        .filter(|r| !fields.is_water_r(*r))
        .count();
    info!("Simulated terrain, {} land regions", land);

    let region_index = RegionIndex::new(&mesh, parameters.spacing);
    Ok(Terrain {
        mesh,
        peaks,
        fields,
        region_index,
    })
}

fn towns(
    terrain: &Terrain,
    parameters: &Parameters,
    manual: &ManualOverrides,
) -> Result<Vec<TownSite>, GenerationError> {
    if !manual.manual_towns.is_empty() {
        return Ok(manual_towns(
            &terrain.mesh,
            &manual.manual_towns,
            &parameters.towns.zone,
        ));
    }
    if !parameters.towns.enabled {
        return Ok(vec![]);
    }
    let placer = TownPlacer {
        mesh: &terrain.mesh,
        fields: &terrain.fields,
        params: &parameters.towns,
        min_flow: parameters.rivers.min_flow(),
        mesh_seed: parameters.mesh_seed,
    };
    Ok(placer.place()?)
}

/// Towns, roads and railroad over a finished terrain. Cheap enough to rerun after every edit to
/// the transport parameters or manual overrides.
pub fn compute_transport(
    terrain: &Terrain,
    parameters: &Parameters,
    manual: &ManualOverrides,
) -> Result<Transport, GenerationError> {
    parameters.validate()?;
    let min_flow = parameters.rivers.min_flow();

    let towns = towns(terrain, parameters, manual)?;
    let town_regions: Vec<usize> = towns.iter().map(|town| town.region).collect();
    info!("Placed {} towns", towns.len());

    let roads = &parameters.roads;
    let road_segments = if roads.enabled && (towns.len() >= 2 || roads.coverage_grid_size >= 2) {
        build_roads(
            &terrain.mesh,
            &terrain.fields,
            roads,
            min_flow,
            &town_regions,
            parameters.mesh_seed,
        )?
    } else {
        vec![]
    };
    info!("Built {} road segments", road_segments.len());

    let railroad = if parameters.railroads.enabled {
        RailroadBuilder {
            mesh: &terrain.mesh,
            fields: &terrain.fields,
            params: &parameters.railroads,
            min_flow,
            towns: &town_regions,
            town_radius: parameters.towns.town_radius,
            manual_stations: &manual.manual_stations,
            waypoints: &manual.waypoints,
        }
        .build()?
    } else {
        Railroad::default()
    };
    info!(
        "Railroad through {} stations covers {} regions{}",
        railroad.station_ids.len(),
        railroad.path.len(),
        if railroad.is_closed() { " in a loop" } else { "" }
    );

    Ok(Transport {
        towns,
        road_segments,
        railroad,
    })
}

pub fn generate(saved: &SavedMap) -> Result<Generation, GenerationError> {
    let terrain = build_terrain(&saved.parameters)?;
    let transport = compute_transport(&terrain, &saved.parameters, &saved.manual)?;
    Ok(Generation { terrain, transport })
}
