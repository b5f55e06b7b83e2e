use crate::downhill_map::Downslope;
use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiverParams {
    pub lg_min_flow: f32,
    pub lg_river_width: f32,
    pub flow: f32,
}

impl Default for RiverParams {
    fn default() -> RiverParams {
        RiverParams {
            lg_min_flow: 2.7,
            lg_river_width: -2.4,
            flow: 0.2,
        }
    }
}

impl RiverParams {
    /// Sides carrying at least this much flow are rivers.
    pub fn min_flow(&self) -> f32 {
        self.lg_min_flow.exp()
    }

    pub fn river_width(&self) -> f32 {
        self.lg_river_width.exp()
    }
}

/// Mean rainfall of the three regions of each triangle.
pub fn moisture_t(mesh: &Mesh, rainfall_r: &[f32]) -> Vec<f32> {
    (0..mesh.num_triangles())
        .map(|t| {
            let regions = mesh.regions_of_t(t);
            regions.iter().map(|r| rainfall_r[*r]).sum::<f32>() / 3.0
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowMap {
    flow_t: Vec<f32>,
    flow_s: Vec<f32>,
}

impl FlowMap {
    pub fn new(num_triangles: usize, num_sides: usize) -> FlowMap {
        FlowMap {
            flow_t: vec![0.0; num_triangles],
            flow_s: vec![0.0; num_sides],
        }
    }

    pub fn flow_t(&self) -> &[f32] {
        &self.flow_t
    }

    pub fn flow_s(&self) -> &[f32] {
        &self.flow_s
    }

    pub fn get_max_flow(&self) -> f32 {
        self.flow_s.iter().copied().fold(0.0, f32::max)
    }

    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>) {
        (self.flow_t, self.flow_s)
    }

    /// Rains on every land triangle and carries the water down to the sea. Trunk triangles
    /// above one of their land tributaries are lowered to it, so rivers never run uphill.
    pub fn from<D: Downslope>(
        mesh: &Mesh,
        downhill_map: &D,
        moisture_t: &[f32],
        elevation_t: &mut [f32],
        params: &RiverParams,
    ) -> FlowMap {
        let mut out = FlowMap::new(mesh.num_triangles(), mesh.num_sides());
        out.rain_on_all(elevation_t, moisture_t, params.flow);
        out.accumulate(mesh, downhill_map, elevation_t);
        out
    }

    fn rain_on_all(&mut self, elevation_t: &[f32], moisture_t: &[f32], flow: f32) {
        for (t, volume) in self.flow_t.iter_mut().enumerate() {
            *volume = if elevation_t[t] >= 0.0 {
                flow * moisture_t[t] * moisture_t[t]
            } else {
                0.0
            };
        }
    }

    fn accumulate<D: Downslope>(&mut self, mesh: &Mesh, downhill_map: &D, elevation_t: &mut [f32]) {
        for tributary in downhill_map.order().iter().rev().copied() {
            let s = match downhill_map.downslope(tributary) {
                Some(s) => s,
                None => continue,
            };
            let trunk = mesh.t_outer_s(s);
            let volume = self.flow_t[tributary];
            self.flow_t[trunk] += volume;
            self.flow_s[s] += volume;
            if elevation_t[trunk] > elevation_t[tributary] && elevation_t[tributary] >= 0.0 {
                elevation_t[trunk] = elevation_t[tributary];
            }
        }
    }
}

/// Flow along the edge between the two regions of side `s`, whichever way it runs.
pub fn flow_across(mesh: &Mesh, flow_s: &[f32], s: usize) -> f32 {
    flow_s[s] + flow_s[mesh.opposite_s(s)]
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::downhill_map::{DownhillMap, MockDownhillMap};
    use crate::points::PointSet;
    use commons::{v2, Almost};

    /// Square with a centre point: four solid triangles around region 4.
    fn square() -> Mesh {
        Mesh::from_points(&PointSet {
            points: vec![
                v2(0.0, 0.0),
                v2(10.0, 0.0),
                v2(10.0, 10.0),
                v2(0.0, 10.0),
                v2(5.0, 5.0),
            ],
            exterior_boundary: 4,
            interior_boundary: 0,
            mountains: 0,
        })
        .unwrap()
    }

    fn side_towards(mesh: &Mesh, from: usize, to: usize) -> Option<usize> {
        (3 * from..3 * from + 3).find(|s| mesh.t_outer_s(*s) == to)
    }

    #[test]
    fn min_flow_should_be_exponential() {
        let params = RiverParams::default();
        assert!(params.min_flow().almost(&2.7f32.exp()));
    }

    #[test]
    fn moisture_should_be_mean_of_regions() {
        let mesh = square();
        let rainfall = vec![0.3; mesh.num_regions()];
        assert!(moisture_t(&mesh, &rainfall)
            .iter()
            .all(|m| (m - 0.3).abs() < 1e-6));
    }

    #[test]
    fn flow_should_accumulate_along_chain() {
        let mesh = square();
        let around: Vec<usize> = mesh.triangles_around(4).collect();
        let (a, b, c) = (around[0], around[1], around[2]);
        let to_b = side_towards(&mesh, a, b).unwrap();
        let to_c = side_towards(&mesh, b, c).unwrap();

        let mut downslope = vec![None; mesh.num_triangles()];
        downslope[a] = Some(to_b);
        downslope[b] = Some(to_c);
        let downhill = MockDownhillMap::new(downslope, vec![c, b, a]);

        let mut elevation = vec![-1.0; mesh.num_triangles()];
        elevation[a] = 0.5;
        elevation[b] = 0.7;
        elevation[c] = -0.5;
        let moisture = vec![1.0; mesh.num_triangles()];
        let params = RiverParams {
            flow: 1.0,
            ..RiverParams::default()
        };

        let flow = FlowMap::from(&mesh, &downhill, &moisture, &mut elevation, &params);

        assert!(flow.flow_t()[a].almost(&1.0));
        assert!(flow.flow_t()[b].almost(&2.0));
        assert!(flow.flow_t()[c].almost(&2.0));
        assert!(flow.flow_s()[to_b].almost(&1.0));
        assert!(flow.flow_s()[to_c].almost(&2.0));
        assert!(elevation[b].almost(&0.5));
        assert!(elevation[c].almost(&-0.5));
        assert!(flow_across(&mesh, flow.flow_s(), mesh.opposite_s(to_c)).almost(&2.0));
    }

    #[test]
    fn water_should_not_rain() {
        let mesh = square();
        let downhill = DownhillMap::new(&mesh, &vec![-0.5; mesh.num_triangles()]);
        let mut elevation = vec![-0.5; mesh.num_triangles()];
        let flow = FlowMap::from(
            &mesh,
            &downhill,
            &vec![1.0; mesh.num_triangles()],
            &mut elevation,
            &RiverParams::default(),
        );
        assert_eq!(flow.get_max_flow(), 0.0);
    }
}
