use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RainfallParams {
    pub wind_angle_deg: f32,
    pub raininess: f32,
    pub rain_shadow: f32,
    pub evaporation: f32,
}

impl Default for RainfallParams {
    fn default() -> RainfallParams {
        RainfallParams {
            wind_angle_deg: 0.0,
            raininess: 0.9,
            rain_shadow: 0.5,
            evaporation: 0.5,
        }
    }
}

/// Solid regions sorted upwind to downwind.
#[derive(Clone, Debug, PartialEq)]
pub struct WindOrder {
    angle_deg: f32,
    key: Vec<f32>,
    order: Vec<usize>,
}

impl WindOrder {
    pub fn new(mesh: &Mesh, angle_deg: f32) -> WindOrder {
        let radians = angle_deg.to_radians();
        let (sin, cos) = radians.sin_cos();
        let key: Vec<f32> = mesh
            .vertex_r()
            .iter()
            .map(|position| position.x * cos + position.y * sin)
            .collect();
        let mut order: Vec<usize> = (0..mesh.num_solid_regions()).collect();
        order.sort_by(|a, b| key[*a].total_cmp(&key[*b]));
        WindOrder {
            angle_deg,
            key,
            order,
        }
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_upwind_of(&self, a: usize, b: usize) -> bool {
        self.key[a] < self.key[b]
    }
}

/// Moisture carried into a region by the wind.
#[derive(Debug, PartialEq)]
struct Cloud {
    humidity: f32,
    rainfall: f32,
}

impl Cloud {
    fn arrive(upwind: &[f32], raininess: f32) -> Cloud {
        if upwind.is_empty() {
            return Cloud {
                humidity: 0.0,
                rainfall: 0.0,
            };
        }
        let humidity = upwind.iter().sum::<f32>() / upwind.len() as f32;
        Cloud {
            humidity,
            rainfall: raininess * humidity,
        }
    }

    fn saturate(&mut self) {
        self.humidity = 1.0;
    }

    fn evaporate(&mut self, elevation: f32, evaporation: f32) {
        if elevation < 0.0 {
            self.humidity += evaporation * -elevation;
        }
    }

    fn rain_over_capacity(&mut self, elevation: f32, params: &RainfallParams) {
        let capacity = 1.0 - elevation;
        if self.humidity > capacity {
            let orographic = params.rain_shadow * (self.humidity - capacity);
            self.rainfall += params.raininess * orographic;
            self.humidity -= orographic;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rainfall {
    pub humidity_r: Vec<f32>,
    pub rainfall_r: Vec<f32>,
}

pub struct RainfallComputer<'a> {
    pub params: &'a RainfallParams,
    pub mesh: &'a Mesh,
    pub wind: &'a WindOrder,
    pub elevation_r: &'a [f32],
}

impl<'a> RainfallComputer<'a> {
    pub fn compute(&self) -> Rainfall {
        let mesh = self.mesh;
        let mut out = Rainfall {
            humidity_r: vec![0.0; mesh.num_regions()],
            rainfall_r: vec![0.0; mesh.num_regions()],
        };
        let mut upwind = Vec::with_capacity(8);
        for r in self.wind.order().iter().copied() {
            upwind.clear();
            upwind.extend(
                mesh.solid_neighbours(r)
                    .filter(|(_, neighbour)| self.wind.is_upwind_of(*neighbour, r))
                    .map(|(_, neighbour)| out.humidity_r[neighbour]),
            );

            let elevation = self.elevation_r[r];
            let mut cloud = Cloud::arrive(&upwind, self.params.raininess);
            if mesh.is_boundary_r(r) {
                cloud.saturate();
            }
            cloud.evaporate(elevation, self.params.evaporation);
            cloud.rain_over_capacity(elevation, self.params);

            out.humidity_r[r] = cloud.humidity;
            out.rainfall_r[r] = cloud.rainfall;
        }
        out
    }
}
