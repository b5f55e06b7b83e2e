use super::coverage::CoverageGrid;
use super::RoadParams;
use commons::random::Lcg;
use commons::V2;
use network::{ClosestTargetResult, Edge as NetworkEdge, Network};
use pioneer::flow_map::flow_across;
use pioneer::{Mesh, TerrainFields};
use std::collections::HashSet;
use std::iter::once;

#[derive(Clone, Debug, PartialEq)]
pub enum PathResult {
    Found(Vec<usize>),
    Unreachable,
}

impl PathResult {
    pub fn into_path(self) -> Vec<usize> {
        match self {
            PathResult::Found(path) => path,
            PathResult::Unreachable => vec![],
        }
    }
}

/// Ways of routing a road between two waypoints, tried in order until one is found.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strategy {
    ViaPoints,
    Direct,
}

/// Terrain-weighted graph over the regions of one mesh. Roads may only enter land below the
/// maximum elevation, apart from the regions listed as always enterable.
pub struct RoadContext<'a> {
    pub mesh: &'a Mesh,
    pub fields: &'a TerrainFields,
    pub params: &'a RoadParams,
    pub min_flow: f32,
    network: Network,
}

impl<'a> RoadContext<'a> {
    pub fn new(
        mesh: &'a Mesh,
        fields: &'a TerrainFields,
        params: &'a RoadParams,
        min_flow: f32,
        always_enterable: &[usize],
    ) -> RoadContext<'a> {
        let mut out = RoadContext {
            mesh,
            fields,
            params,
            min_flow,
            network: Network::new(mesh.num_regions(), &[]),
        };
        out.compute_network(always_enterable);
        out
    }

    fn compute_network(&mut self, always_enterable: &[usize]) {
        let always_enterable: HashSet<usize> = always_enterable.iter().copied().collect();
        let mut edges = vec![];
        for from in 0..self.mesh.num_solid_regions() {
            for (s, to) in self.mesh.solid_neighbours(from) {
                if self.is_passable(to) || always_enterable.contains(&to) {
                    edges.push(NetworkEdge::new(from, to, self.cost(s)));
                }
            }
        }
        edges.iter().for_each(|edge| self.network.add_edge(edge));
    }

    pub fn is_passable(&self, r: usize) -> bool {
        if self.mesh.is_ghost_r(r) {
            return false;
        }
        let elevation = self.fields.elevation_r[r];
        elevation >= 0.0 && elevation < self.params.max_elevation
    }

    pub fn crosses_river(&self, s: usize) -> bool {
        flow_across(self.mesh, &self.fields.flow_s, s) >= self.min_flow
    }

    /// Cost of travelling along side `s`, from its begin region to its end region.
    pub fn cost(&self, s: usize) -> f32 {
        let elevation = &self.fields.elevation_r;
        let slope = (elevation[self.mesh.r_end_s(s)] - elevation[self.mesh.r_begin_s(s)]).abs();
        let multiplier = if self.crosses_river(s) {
            self.params.river_crossing_cost
        } else {
            1.0
        };
        self.mesh.length_s(s) * multiplier + slope * self.params.slope_weight
    }

    /// The unconnected region closest to any connected region, with the path reaching it.
    pub fn nearest_unconnected(
        &self,
        connected: &[usize],
        unconnected: &[bool],
    ) -> Option<ClosestTargetResult> {
        self.network
            .closest_targets(connected, unconnected, 1)
            .into_iter()
            .next()
    }

    pub fn direct(&self, from: usize, to: usize) -> PathResult {
        match self.network.shortest_path(from, to) {
            Some(path) => PathResult::Found(path),
            None => PathResult::Unreachable,
        }
    }

    fn via_points(
        &self,
        from: usize,
        to: usize,
        grid: &CoverageGrid,
        rng: &mut Lcg,
    ) -> PathResult {
        let mut vias = vec![];
        for (t, sign) in [(1.0 / 3.0, 1.0), (2.0 / 3.0, -1.0)].iter() {
            if let Some(via) = self.via_region(from, to, grid, rng, *t, *sign) {
                if via != from && via != to && !vias.contains(&via) {
                    vias.push(via);
                }
            }
        }
        if vias.is_empty() {
            return PathResult::Unreachable;
        }

        let mut out = vec![from];
        let mut last = from;
        for target in vias.into_iter().chain(once(to)) {
            match self.direct(last, target) {
                PathResult::Found(path) => out.extend(path.into_iter().skip(1)),
                PathResult::Unreachable => return PathResult::Unreachable,
            }
            last = target;
        }
        PathResult::Found(out)
    }

    /// Passable region near the point `t` of the way from `from` to `to`, pushed sideways by a
    /// random share of the curviness.
    fn via_region(
        &self,
        from: usize,
        to: usize,
        grid: &CoverageGrid,
        rng: &mut Lcg,
        t: f32,
        sign: f32,
    ) -> Option<usize> {
        let a = self.mesh.position_r(from);
        let b = self.mesh.position_r(to);
        let delta = b - a;
        let distance = delta.norm();
        if distance < 1.0 {
            return None;
        }
        let middle = a + delta * t;
        let perpendicular = V2::new(-delta.y / distance, delta.x / distance);
        let offset = distance * self.params.curviness * (0.5 + rng.next_f64() as f32 * 0.5);
        grid.nearest_passable(self.mesh, &(middle + perpendicular * offset * sign))
    }

    fn try_strategy(
        &self,
        strategy: Strategy,
        from: usize,
        to: usize,
        grid: &CoverageGrid,
        rng: &mut Lcg,
    ) -> PathResult {
        match strategy {
            Strategy::ViaPoints => self.via_points(from, to, grid, rng),
            Strategy::Direct => self.direct(from, to),
        }
    }

    pub fn route(
        &self,
        from: usize,
        to: usize,
        strategies: &[Strategy],
        grid: &CoverageGrid,
        rng: &mut Lcg,
    ) -> PathResult {
        for strategy in strategies {
            if let PathResult::Found(path) = self.try_strategy(*strategy, from, to, grid, rng) {
                return PathResult::Found(path);
            }
        }
        PathResult::Unreachable
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::fixtures::{grid_mesh, land};

    fn is_connected(mesh: &Mesh, path: &[usize]) -> bool {
        path.windows(2)
            .all(|pair| mesh.side_between(pair[0], pair[1]).is_some())
    }

    #[test]
    fn cost_should_include_river_and_slope() {
        let mesh = grid_mesh(5, 400.0);
        let mut fields = land(&mesh, 0.1);
        fields.elevation_r[6] = 0.3;
        let s = mesh.side_between(5, 6).unwrap();
        fields.flow_s[s] = 50.0;
        let params = RoadParams::default();
        let context = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);

        let expected = mesh.length_s(s) * params.river_crossing_cost + 0.2 * params.slope_weight;
        assert!((context.cost(s) - expected).abs() < 1e-4);
        assert!(context.crosses_river(mesh.opposite_s(s)));
    }

    #[test]
    fn water_and_mountains_should_be_impassable() {
        let mesh = grid_mesh(5, 400.0);
        let mut fields = land(&mesh, 0.1);
        fields.elevation_r[1] = -0.1;
        fields.elevation_r[2] = 0.65;
        fields.elevation_r[3] = 0.64;
        let params = RoadParams::default();
        let context = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);

        assert!(!context.is_passable(1));
        assert!(!context.is_passable(2));
        assert!(context.is_passable(3));
        assert!(!context.is_passable(mesh.ghost_r()));
    }

    #[test]
    fn direct_path_should_avoid_water() {
        let mesh = grid_mesh(5, 400.0);
        let mut fields = land(&mesh, 0.1);
        for y in 0..4 {
            fields.elevation_r[y * 5 + 2] = -0.5;
        }
        let params = RoadParams::default();
        let context = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);

        let path = context.direct(10, 14).into_path();

        assert_eq!(path.first(), Some(&10));
        assert_eq!(path.last(), Some(&14));
        assert!(is_connected(&mesh, &path));
        assert!(path.iter().all(|r| fields.elevation_r[*r] >= 0.0));
    }

    #[test]
    fn walled_off_target_should_be_unreachable() {
        let mesh = grid_mesh(5, 400.0);
        let mut fields = land(&mesh, 0.1);
        for y in 0..5 {
            fields.elevation_r[y * 5 + 2] = -0.5;
        }
        let params = RoadParams::default();
        let context = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);

        assert_eq!(context.direct(10, 14), PathResult::Unreachable);
    }

    #[test]
    fn always_enterable_regions_should_be_reachable() {
        let mesh = grid_mesh(5, 400.0);
        let mut fields = land(&mesh, 0.1);
        fields.elevation_r[12] = 0.9;
        let params = RoadParams::default();

        let blocked = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);
        assert_eq!(blocked.direct(10, 12), PathResult::Unreachable);

        let open = RoadContext::new(&mesh, &fields, &params, 10.0, &[12]);
        assert!(matches!(open.direct(10, 12), PathResult::Found(_)));
    }

    #[test]
    fn via_route_should_join_ends() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.1);
        let params = RoadParams {
            curviness: 0.3,
            ..RoadParams::default()
        };
        let context = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);
        let grid = CoverageGrid::new(&context, 20);
        let mut rng = Lcg::new(1);

        let path = context
            .route(
                11,
                21,
                &[Strategy::ViaPoints, Strategy::Direct],
                &grid,
                &mut rng,
            )
            .into_path();

        assert_eq!(path.first(), Some(&11));
        assert_eq!(path.last(), Some(&21));
        assert!(is_connected(&mesh, &path));
    }

    #[test]
    fn short_roads_should_fall_back_to_direct() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.1);
        let params = RoadParams::default();
        let context = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);
        let grid = CoverageGrid::new(&context, 20);
        let mut rng = Lcg::new(1);

        let path = context.route(
            11,
            12,
            &[Strategy::ViaPoints, Strategy::Direct],
            &grid,
            &mut rng,
        );

        assert_eq!(path, PathResult::Found(vec![11, 12]));
    }

    #[test]
    fn nearest_unconnected_should_start_from_connected_region() {
        let mesh = grid_mesh(5, 400.0);
        let fields = land(&mesh, 0.1);
        let params = RoadParams::default();
        let context = RoadContext::new(&mesh, &fields, &params, 10.0, &[]);
        let mut unconnected = vec![false; mesh.num_regions()];
        unconnected[3] = true;
        unconnected[24] = true;

        let result = context.nearest_unconnected(&[0, 20], &unconnected).unwrap();

        assert_eq!(result.node, 3);
        assert_eq!(result.path.first(), Some(&0));
    }
}
