use crate::error::GenerationError;
use crate::generation::Generation;
use crate::parameters::Parameters;
use crate::spline::{build_strip_mesh, SplineSample, StripMesh};
use commons::v2;
use pioneer::{Mesh, MeshError, TerrainFields};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Mesh arrays as plain numbers. Vertex coordinates are interleaved `x, y`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatMesh {
    pub vertex_r: Vec<f32>,
    pub triangles: Vec<u32>,
    pub halfedges: Vec<u32>,
    pub num_solid_sides: u32,
    pub num_boundary_regions: u32,
}

impl From<&Mesh> for FlatMesh {
    fn from(mesh: &Mesh) -> FlatMesh {
        FlatMesh {
            vertex_r: mesh
                .vertex_r()
                .iter()
                .flat_map(|position| vec![position.x, position.y])
                .collect(),
            triangles: mesh.triangles().iter().map(|r| *r as u32).collect(),
            halfedges: mesh.halfedges().iter().map(|s| *s as u32).collect(),
            num_solid_sides: mesh.num_solid_sides() as u32,
            num_boundary_regions: mesh.num_boundary_regions() as u32,
        }
    }
}

impl TryFrom<&FlatMesh> for Mesh {
    type Error = MeshError;

    fn try_from(flat: &FlatMesh) -> Result<Mesh, MeshError> {
        if flat.vertex_r.len() % 2 != 0 {
            return Err(MeshError::InconsistentArrays {
                name: "vertex_r",
                actual: flat.vertex_r.len(),
                expected: flat.vertex_r.len() + 1,
            });
        }
        Mesh::from_parts(
            flat.vertex_r
                .chunks(2)
                .map(|pair| v2(pair[0], pair[1]))
                .collect(),
            flat.triangles.iter().map(|r| *r as usize).collect(),
            flat.halfedges.iter().map(|s| *s as usize).collect(),
            flat.num_solid_sides as usize,
            flat.num_boundary_regions as usize,
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatFields {
    pub elevation_r: Vec<f32>,
    pub elevation_t: Vec<f32>,
    pub humidity_r: Vec<f32>,
    pub rainfall_r: Vec<f32>,
    pub moisture_t: Vec<f32>,
    pub flow_t: Vec<f32>,
    pub flow_s: Vec<f32>,
    /// -1 where a triangle has no downslope side.
    pub downslope_t: Vec<i32>,
}

impl From<&TerrainFields> for FlatFields {
    fn from(fields: &TerrainFields) -> FlatFields {
        FlatFields {
            elevation_r: fields.elevation_r.clone(),
            elevation_t: fields.elevation_t.clone(),
            humidity_r: fields.humidity_r.clone(),
            rainfall_r: fields.rainfall_r.clone(),
            moisture_t: fields.moisture_t.clone(),
            flow_t: fields.flow_t.clone(),
            flow_s: fields.flow_s.clone(),
            downslope_t: fields
                .downslope_t
                .iter()
                .map(|s| s.map_or(-1, |s| s as i32))
                .collect(),
        }
    }
}

/// One run of railroad curve as parallel arrays, plus the strip mesh drawn along it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatSpline {
    pub positions: Vec<f32>,
    pub angles: Vec<f32>,
    pub cumulative_lengths: Vec<f32>,
    pub strip: StripMesh,
}

impl FlatSpline {
    fn new(samples: &[SplineSample], closed: bool) -> FlatSpline {
        FlatSpline {
            positions: samples
                .iter()
                .flat_map(|sample| vec![sample.position.x, sample.position.y])
                .collect(),
            angles: samples.iter().map(|sample| sample.angle).collect(),
            cumulative_lengths: samples
                .iter()
                .map(|sample| sample.cumulative_length)
                .collect(),
            strip: build_strip_mesh(samples, closed),
        }
    }
}

/// Everything a renderer needs from one generation, as flat numeric arrays.
///
/// Pairs (`road_segments`, `rail_crossings`) are interleaved `r1, r2`. Legs are concatenated in
/// `rail_legs`, with `rail_leg_lengths` giving the number of regions in each; `rail_runs` and
/// `rail_run_lengths` hold the unbroken runs of track the same way.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatBundle {
    pub mesh: FlatMesh,
    pub fields: FlatFields,
    pub peaks: Vec<u32>,
    pub bands: Vec<u32>,
    pub biomes: Vec<u32>,
    pub towns: Vec<u32>,
    pub road_segments: Vec<u32>,
    pub road_crosses_river: Vec<u32>,
    pub rail_path: Vec<u32>,
    pub rail_stations: Vec<u32>,
    pub rail_legs: Vec<u32>,
    pub rail_leg_lengths: Vec<u32>,
    pub rail_runs: Vec<u32>,
    pub rail_run_lengths: Vec<u32>,
    pub rail_crossings: Vec<u32>,
    pub rail_splines: Vec<FlatSpline>,
}

fn is_closed(samples: &[SplineSample]) -> bool {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => samples.len() >= 3 && first.position == last.position,
        _ => false,
    }
}

fn to_u32(values: &[usize]) -> Vec<u32> {
    values.iter().map(|value| *value as u32).collect()
}

impl FlatBundle {
    pub fn new(generation: &Generation, parameters: &Parameters) -> Result<FlatBundle, GenerationError> {
        let terrain = &generation.terrain;
        let transport = &generation.transport;
        let railroad = &transport.railroad;

        let bands = terrain.bands(&parameters.bands, parameters.rivers.min_flow())?;
        let biomes = terrain.biomes(parameters.mesh_seed);
        let splines = transport.railroad_splines(terrain);

        Ok(FlatBundle {
            mesh: FlatMesh::from(&terrain.mesh),
            fields: FlatFields::from(&terrain.fields),
            peaks: to_u32(&terrain.peaks),
            bands: bands.iter().map(|band| *band as u32).collect(),
            biomes: biomes.iter().map(|biome| *biome as u32).collect(),
            towns: to_u32(&transport.town_regions()),
            road_segments: transport
                .road_segments
                .iter()
                .flat_map(|segment| vec![segment.r1 as u32, segment.r2 as u32])
                .collect(),
            road_crosses_river: transport
                .road_segments
                .iter()
                .map(|segment| segment.crosses_river as u32)
                .collect(),
            rail_path: to_u32(&railroad.path),
            rail_stations: to_u32(&railroad.station_ids),
            rail_legs: railroad
                .legs
                .iter()
                .flat_map(|leg| to_u32(&leg.regions))
                .collect(),
            rail_leg_lengths: railroad
                .legs
                .iter()
                .map(|leg| leg.regions.len() as u32)
                .collect(),
            rail_runs: railroad.runs.iter().flat_map(|run| to_u32(run)).collect(),
            rail_run_lengths: railroad.runs.iter().map(|run| run.len() as u32).collect(),
            rail_crossings: railroad
                .crossings
                .iter()
                .flat_map(|crossing| vec![crossing.r1 as u32, crossing.r2 as u32])
                .collect(),
            rail_splines: splines
                .iter()
                .map(|samples| FlatSpline::new(samples, is_closed(samples)))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::fixtures::grid_mesh;
    use crate::generation::generate;
    use crate::parameters::SavedMap;

    #[test]
    fn mesh_should_survive_transfer() {
        let mesh = grid_mesh(7, 1000.0);

        let flat = FlatMesh::from(&mesh);

        assert_eq!(flat.vertex_r.len(), mesh.num_regions() * 2);
        assert_eq!(Mesh::try_from(&flat).unwrap(), mesh);
    }

    #[test]
    fn odd_vertex_array_should_be_rejected() {
        let mut flat = FlatMesh::from(&grid_mesh(5, 1000.0));
        flat.vertex_r.pop();

        assert!(matches!(
            Mesh::try_from(&flat),
            Err(MeshError::InconsistentArrays {
                name: "vertex_r",
                ..
            })
        ));
    }

    #[test]
    fn downslope_should_use_minus_one_for_none() {
        let mesh = grid_mesh(5, 1000.0);
        let mut fields = crate::fixtures::land(&mesh, 0.2);
        fields.downslope_t = vec![None; mesh.num_triangles()];
        fields.downslope_t[0] = Some(4);

        let flat = FlatFields::from(&fields);

        assert_eq!(flat.downslope_t[0], 4);
        assert!(flat.downslope_t[1..].iter().all(|s| *s == -1));
    }

    #[test]
    fn bundle_should_hold_every_array() {
        let saved = SavedMap {
            parameters: Parameters {
                spacing: 20.0,
                mountain_spacing: 80.0,
                ..Parameters::default()
            },
            ..SavedMap::default()
        };
        let generation = generate(&saved).unwrap();
        let terrain = &generation.terrain;

        let bundle = FlatBundle::new(&generation, &saved.parameters).unwrap();

        assert_eq!(bundle.fields.elevation_r.len(), terrain.mesh.num_regions());
        assert_eq!(bundle.fields.flow_s.len(), terrain.mesh.num_sides());
        assert_eq!(bundle.bands.len(), terrain.mesh.num_solid_regions());
        assert_eq!(bundle.biomes.len(), terrain.mesh.num_solid_regions());
        assert_eq!(
            bundle.road_segments.len(),
            generation.transport.road_segments.len() * 2
        );
        assert_eq!(
            bundle.rail_leg_lengths.iter().sum::<u32>() as usize,
            bundle.rail_legs.len()
        );
        assert_eq!(
            bundle.rail_splines.len(),
            generation.transport.railroad_splines(terrain).len()
        );
        for spline in bundle.rail_splines.iter() {
            assert_eq!(spline.angles.len() * 2, spline.positions.len());
        }
        assert_eq!(Mesh::try_from(&bundle.mesh).unwrap(), terrain.mesh);
    }
}
