use commons::log::debug;
use commons::random::Lcg;
use pioneer::biome::{Biome, BiomeLayout, BIOME_ORDER};
use pioneer::hops::{region_hops, river_regions};
use pioneer::{FieldError, Mesh, TerrainFields};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TownParams {
    pub enabled: bool,
    pub min_spacing: f32,
    pub town_radius: f32,
    pub zone: String,
    pub elevation_min: f32,
    pub elevation_max: f32,
    pub rainfall_min: f32,
    pub rainfall_max: f32,
    pub seed: Option<u32>,
    pub river_buffer_steps: u32,
    pub towns_per_biome: usize,
}

impl Default for TownParams {
    fn default() -> TownParams {
        TownParams {
            enabled: true,
            min_spacing: 80.0,
            town_radius: 20.0,
            zone: "civ_town".to_string(),
            elevation_min: 0.0,
            elevation_max: 0.35,
            rainfall_min: 0.2,
            rainfall_max: 1.0,
            seed: None,
            river_buffer_steps: 3,
            towns_per_biome: 2,
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TownSite {
    pub region: usize,
    pub zone: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    region: usize,
    biome: Biome,
}

pub struct TownPlacer<'a> {
    pub mesh: &'a Mesh,
    pub fields: &'a TerrainFields,
    pub params: &'a TownParams,
    pub min_flow: f32,
    pub mesh_seed: u32,
}

impl<'a> TownPlacer<'a> {
    fn candidates(&self) -> Vec<Candidate> {
        let rivers = river_regions(self.mesh, self.fields, self.min_flow);
        let near_river = region_hops(self.mesh, &rivers, Some(self.params.river_buffer_steps));
        let layout = BiomeLayout::new(self.mesh_seed);
        (0..self.mesh.num_solid_regions())
            .filter(|r| self.in_bounds(*r) && near_river[*r].is_none())
            .map(|region| Candidate {
                region,
                biome: layout.biome_at(
                    self.mesh.position_r(region),
                    Some(self.fields.elevation_r[region]),
                ),
            })
            .collect()
    }

    fn in_bounds(&self, r: usize) -> bool {
        let elevation = self.fields.elevation_r[r];
        let rainfall = self.fields.rainfall_r[r];
        elevation >= self.params.elevation_min
            && elevation <= self.params.elevation_max
            && rainfall >= self.params.rainfall_min
            && rainfall <= self.params.rainfall_max
    }

    fn far_from_towns(&self, region: usize, towns: &[TownSite]) -> bool {
        let position = self.mesh.position_r(region);
        towns.iter().all(|town| {
            (self.mesh.position_r(town.region) - position).norm() >= self.params.min_spacing
        })
    }

    /// Visits the biomes round robin, each slot picking a random candidate of its biome that is
    /// far enough from every town placed so far.
    pub fn place(&self) -> Result<Vec<TownSite>, FieldError> {
        self.fields.check_mesh(self.mesh)?;
        let candidates = self.candidates();
        debug!("{} town candidates", candidates.len());
        let mut out: Vec<TownSite> = vec![];
        if candidates.is_empty() {
            return Ok(out);
        }

        let mut rng = Lcg::new(self.params.seed.unwrap_or(self.mesh_seed));
        let mut used = HashSet::new();
        for _ in 0..self.params.towns_per_biome {
            for biome in BIOME_ORDER.iter() {
                let valid: Vec<usize> = candidates
                    .iter()
                    .filter(|candidate| candidate.biome == *biome)
                    .map(|candidate| candidate.region)
                    .filter(|region| !used.contains(region) && self.far_from_towns(*region, &out))
                    .collect();
                if valid.is_empty() {
                    continue;
                }
                let region = valid[rng.pick(valid.len())];
                used.insert(region);
                out.push(TownSite {
                    region,
                    zone: self.params.zone.clone(),
                });
            }
        }
        Ok(out)
    }
}

/// Towns at fixed regions. Regions that are not solid regions of `mesh` are dropped.
pub fn manual_towns(mesh: &Mesh, regions: &[usize], zone: &str) -> Vec<TownSite> {
    let mut seen = HashSet::new();
    regions
        .iter()
        .copied()
        .filter(|region| *region < mesh.num_solid_regions() && seen.insert(*region))
        .map(|region| TownSite {
            region,
            zone: zone.to_string(),
        })
        .collect()
}
