use crate::constraints::ElevationConstraints;
use crate::downhill_map::{Downslope, DownhillMap};
use crate::elevation::{
    mountain_distance, region_elevation, triangle_elevation, ElevationParams, TriangleNoise,
};
use crate::error::FieldError;
use crate::flow_map::{moisture_t, FlowMap, RiverParams};
use crate::mesh::Mesh;
use crate::rain::{Rainfall, RainfallComputer, RainfallParams, WindOrder};
use commons::log::debug;

/// Per-region and per-triangle fields of a finished simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainFields {
    pub elevation_t: Vec<f32>,
    pub elevation_r: Vec<f32>,
    pub humidity_r: Vec<f32>,
    pub rainfall_r: Vec<f32>,
    pub moisture_t: Vec<f32>,
    pub flow_t: Vec<f32>,
    pub flow_s: Vec<f32>,
    pub downslope_t: Vec<Option<usize>>,
    pub order_t: Vec<usize>,
    pub mountain_distance_t: Vec<f32>,
}

impl TerrainFields {
    pub fn is_water_r(&self, r: usize) -> bool {
        self.elevation_r[r] < 0.0
    }

    /// Fails when any field was computed for a mesh of a different shape.
    pub fn check_mesh(&self, mesh: &Mesh) -> Result<(), FieldError> {
        check("elevation_t", self.elevation_t.len(), mesh.num_triangles())?;
        check("elevation_r", self.elevation_r.len(), mesh.num_regions())?;
        check("humidity_r", self.humidity_r.len(), mesh.num_regions())?;
        check("rainfall_r", self.rainfall_r.len(), mesh.num_regions())?;
        check("moisture_t", self.moisture_t.len(), mesh.num_triangles())?;
        check("flow_t", self.flow_t.len(), mesh.num_triangles())?;
        check("flow_s", self.flow_s.len(), mesh.num_sides())?;
        check("downslope_t", self.downslope_t.len(), mesh.num_triangles())?;
        check(
            "mountain_distance_t",
            self.mountain_distance_t.len(),
            mesh.num_triangles(),
        )
    }
}

fn check(name: &'static str, actual: usize, expected: usize) -> Result<(), FieldError> {
    if actual == expected {
        Ok(())
    } else {
        Err(FieldError::MeshMismatch {
            name,
            actual,
            expected,
        })
    }
}

struct Elevation {
    elevation_t: Vec<f32>,
    elevation_r: Vec<f32>,
}

struct Rivers {
    moisture_t: Vec<f32>,
    flow: FlowMap,
    downhill: DownhillMap,
}

fn update_noise<'c>(
    cache: &'c mut Option<(u32, TriangleNoise)>,
    mesh: &Mesh,
    seed: u32,
) -> &'c TriangleNoise {
    if !matches!(&*cache, Some((cached, _)) if *cached == seed) {
        debug!("Computing triangle noise for seed {}", seed);
        *cache = None;
    }
    &cache.get_or_insert_with(|| (seed, TriangleNoise::new(mesh, seed))).1
}

fn update_mountain_distance<'c>(
    cache: &'c mut Option<(u32, f32, Vec<f32>)>,
    mesh: &Mesh,
    peaks: &[usize],
    spacing: f32,
    seed: u32,
    jaggedness: f32,
) -> &'c [f32] {
    let fresh = matches!(
        &*cache,
        Some((cached_seed, cached_jaggedness, _))
            if *cached_seed == seed && *cached_jaggedness == jaggedness
    );
    if !fresh {
        debug!("Computing mountain distance from {} peaks", peaks.len());
        *cache = None;
    }
    &cache
        .get_or_insert_with(|| {
            let distance = mountain_distance(mesh, peaks, spacing, jaggedness, seed);
            (seed, jaggedness, distance)
        })
        .2
}

fn update_wind<'c>(cache: &'c mut Option<WindOrder>, mesh: &Mesh, angle_deg: f32) -> &'c WindOrder {
    if !matches!(&*cache, Some(wind) if wind.angle_deg() == angle_deg) {
        debug!("Computing wind order for {} degrees", angle_deg);
        *cache = None;
    }
    cache.get_or_insert_with(|| WindOrder::new(mesh, angle_deg))
}

/// Runs the terrain stages over one mesh. Noise, mountain distance and wind order are kept
/// between runs and only recomputed when the parameters they depend on change.
pub struct TerrainSimulator<'a> {
    mesh: &'a Mesh,
    peaks: &'a [usize],
    spacing: f32,
    noise: Option<(u32, TriangleNoise)>,
    mountain_distance: Option<(u32, f32, Vec<f32>)>,
    wind: Option<WindOrder>,
    elevation: Option<Elevation>,
    rainfall: Option<Rainfall>,
    rivers: Option<Rivers>,
}

impl<'a> TerrainSimulator<'a> {
    pub fn new(mesh: &'a Mesh, peaks: &'a [usize], spacing: f32) -> TerrainSimulator<'a> {
        TerrainSimulator {
            mesh,
            peaks,
            spacing,
            noise: None,
            mountain_distance: None,
            wind: None,
            elevation: None,
            rainfall: None,
            rivers: None,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        self.mesh
    }

    pub fn assign_elevation(
        &mut self,
        params: &ElevationParams,
        constraints: &ElevationConstraints,
    ) {
        let noise = update_noise(&mut self.noise, self.mesh, params.seed);
        let distance = update_mountain_distance(
            &mut self.mountain_distance,
            self.mesh,
            self.peaks,
            self.spacing,
            params.seed,
            params.mountain_jagged,
        );
        let elevation_t = triangle_elevation(self.mesh, params, constraints, noise, distance);
        let elevation_r = region_elevation(self.mesh, &elevation_t);
        self.elevation = Some(Elevation {
            elevation_t,
            elevation_r,
        });
        self.rainfall = None;
        self.rivers = None;
    }

    pub fn assign_rainfall(&mut self, params: &RainfallParams) -> Result<(), FieldError> {
        let elevation = self
            .elevation
            .as_ref()
            .ok_or(FieldError::NotBuilt("elevation"))?;
        let wind = update_wind(&mut self.wind, self.mesh, params.wind_angle_deg);
        let rainfall = RainfallComputer {
            params,
            mesh: self.mesh,
            wind,
            elevation_r: &elevation.elevation_r,
        }
        .compute();
        self.rainfall = Some(rainfall);
        self.rivers = None;
        Ok(())
    }

    pub fn assign_rivers(&mut self, params: &RiverParams) -> Result<(), FieldError> {
        let rainfall = self.rainfall.as_ref().ok_or(FieldError::NotBuilt("rainfall"))?;
        let elevation = self
            .elevation
            .as_mut()
            .ok_or(FieldError::NotBuilt("elevation"))?;
        let moisture = moisture_t(self.mesh, &rainfall.rainfall_r);
        let downhill = DownhillMap::new(self.mesh, &elevation.elevation_t);
        let flow = FlowMap::from(
            self.mesh,
            &downhill,
            &moisture,
            &mut elevation.elevation_t,
            params,
        );
        debug!(
            "Rivers assigned over {} triangles, max flow {}",
            downhill.order().len(),
            flow.get_max_flow()
        );
        self.rivers = Some(Rivers {
            moisture_t: moisture,
            flow,
            downhill,
        });
        Ok(())
    }

    pub fn fields(&self) -> Result<TerrainFields, FieldError> {
        let elevation = self
            .elevation
            .as_ref()
            .ok_or(FieldError::NotBuilt("elevation"))?;
        let rainfall = self.rainfall.as_ref().ok_or(FieldError::NotBuilt("rainfall"))?;
        let rivers = self.rivers.as_ref().ok_or(FieldError::NotBuilt("rivers"))?;
        let mountain_distance_t = self
            .mountain_distance
            .as_ref()
            .map(|(_, _, distance)| distance.clone())
            .ok_or(FieldError::NotBuilt("elevation"))?;
        Ok(TerrainFields {
            elevation_t: elevation.elevation_t.clone(),
            elevation_r: elevation.elevation_r.clone(),
            humidity_r: rainfall.humidity_r.clone(),
            rainfall_r: rainfall.rainfall_r.clone(),
            moisture_t: rivers.moisture_t.clone(),
            flow_t: rivers.flow.flow_t().to_vec(),
            flow_s: rivers.flow.flow_s().to_vec(),
            downslope_t: rivers.downhill.downslope_t().to_vec(),
            order_t: rivers.downhill.order().to_vec(),
            mountain_distance_t,
        })
    }

    /// All three stages in order.
    pub fn run(
        &mut self,
        elevation: &ElevationParams,
        constraints: &ElevationConstraints,
        rainfall: &RainfallParams,
        rivers: &RiverParams,
    ) -> Result<TerrainFields, FieldError> {
        self.assign_elevation(elevation, constraints);
        self.assign_rainfall(rainfall)?;
        self.assign_rivers(rivers)?;
        self.fields()
    }
}
