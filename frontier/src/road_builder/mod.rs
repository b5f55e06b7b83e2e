mod coverage;
mod pathfinder;

pub use coverage::CoverageGrid;
pub use pathfinder::{PathResult, RoadContext, Strategy};

use commons::edge::Edge;
use commons::log::debug;
use commons::random::Lcg;
use pioneer::{FieldError, Mesh, TerrainFields};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Grid used to snap via points onto passable land.
pub const COVERAGE_GRID_N: usize = 20;
/// Upper bound on shortcut attempts, however many waypoints there are.
pub const MAX_SHORTCUTS: usize = 24;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadParams {
    pub enabled: bool,
    pub shortcuts_per_town: usize,
    pub river_crossing_cost: f32,
    pub coverage_grid_size: usize,
    pub slope_weight: f32,
    pub curviness: f32,
    pub max_elevation: f32,
    pub seed: Option<u32>,
}

impl Default for RoadParams {
    fn default() -> RoadParams {
        RoadParams {
            enabled: true,
            shortcuts_per_town: 2,
            river_crossing_cost: 1.2,
            coverage_grid_size: 4,
            slope_weight: 4.0,
            curviness: 0.15,
            max_elevation: 0.65,
            seed: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub r1: usize,
    pub r2: usize,
    pub crosses_river: bool,
}

struct RoadBuilder<'a> {
    context: RoadContext<'a>,
    grid: CoverageGrid,
    towns: HashSet<usize>,
    rng: Lcg,
    edges: HashSet<Edge>,
    segments: Vec<RoadSegment>,
}

impl<'a> RoadBuilder<'a> {
    fn strategies(&self, from: usize, to: usize) -> &'static [Strategy] {
        let town_to_town = self.towns.contains(&from) && self.towns.contains(&to);
        if town_to_town || self.context.params.curviness <= 0.0 {
            &[Strategy::Direct]
        } else {
            &[Strategy::ViaPoints, Strategy::Direct]
        }
    }

    fn route(&mut self, from: usize, to: usize) -> Vec<usize> {
        let strategies = self.strategies(from, to);
        self.context
            .route(from, to, strategies, &self.grid, &mut self.rng)
            .into_path()
    }

    fn add_path(&mut self, path: &[usize]) {
        for pair in path.windows(2) {
            let (r1, r2) = (pair[0], pair[1]);
            if !self.edges.insert(Edge::new(r1, r2)) {
                continue;
            }
            let crosses_river = self
                .context
                .mesh
                .side_between(r1, r2)
                .map_or(false, |s| self.context.crosses_river(s));
            self.segments.push(RoadSegment {
                r1,
                r2,
                crosses_river,
            });
        }
    }

    /// Grows a tree from the first waypoint, each time joining whichever unconnected waypoint is
    /// cheapest to reach from the tree so far.
    fn connect(&mut self, waypoints: &[usize]) {
        let mut connected = vec![waypoints[0]];
        let mut unconnected = vec![false; self.context.mesh.num_regions()];
        waypoints[1..].iter().for_each(|r| unconnected[*r] = true);

        for _ in 1..waypoints.len() {
            let nearest = match self.context.nearest_unconnected(&connected, &unconnected) {
                Some(nearest) => nearest,
                None => {
                    debug!(
                        "{} waypoints cannot be reached",
                        waypoints.len() - connected.len()
                    );
                    return;
                }
            };
            let from = nearest.path[0];
            let path = self.route(from, nearest.node);
            self.add_path(&path);
            connected.push(nearest.node);
            unconnected[nearest.node] = false;
        }
    }

    fn add_shortcuts(&mut self, waypoints: &[usize], count: usize) {
        for _ in 0..count {
            let a = self.rng.pick(waypoints.len());
            let b = self.rng.pick(waypoints.len());
            if a == b {
                continue;
            }
            let (r1, r2) = (waypoints[a], waypoints[b]);
            if self.edges.contains(&Edge::new(r1, r2)) {
                continue;
            }
            let path = self.route(r1, r2);
            if path.len() >= 2 {
                self.add_path(&path);
            }
        }
    }
}

pub fn shortcut_count(params: &RoadParams, towns: usize, waypoints: usize) -> usize {
    let count = if towns >= 2 {
        (params.shortcuts_per_town * towns).max(1)
    } else {
        (waypoints / 10).max(1)
    };
    count.min(MAX_SHORTCUTS)
}

/// Road network joining the towns and, when `coverage_grid_size` is at least 2, an even spread of
/// passable regions across the map. Returns each mesh edge used by a road once.
pub fn build_roads(
    mesh: &Mesh,
    fields: &TerrainFields,
    params: &RoadParams,
    min_flow: f32,
    towns: &[usize],
    seed: u32,
) -> Result<Vec<RoadSegment>, FieldError> {
    fields.check_mesh(mesh)?;
    let context = RoadContext::new(mesh, fields, params, min_flow, towns);

    let mut waypoints: Vec<usize> = vec![];
    for r in towns.iter().copied() {
        if !waypoints.contains(&r) {
            waypoints.push(r);
        }
    }
    if params.coverage_grid_size >= 2 {
        let coverage = CoverageGrid::new(&context, params.coverage_grid_size);
        for r in coverage.waypoints(mesh) {
            if !waypoints.contains(&r) {
                waypoints.push(r);
            }
        }
    }
    if waypoints.len() < 2 {
        return Ok(vec![]);
    }
    debug!("Connecting {} road waypoints", waypoints.len());

    let mut builder = RoadBuilder {
        grid: CoverageGrid::new(&context, COVERAGE_GRID_N),
        context,
        towns: towns.iter().copied().collect(),
        rng: Lcg::new(params.seed.unwrap_or(seed)),
        edges: HashSet::new(),
        segments: vec![],
    };
    builder.connect(&waypoints);
    let shortcuts = shortcut_count(params, towns.len(), waypoints.len());
    debug!("Adding up to {} road shortcuts", shortcuts);
    builder.add_shortcuts(&waypoints, shortcuts);
    Ok(builder.segments)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::fixtures::{grid_mesh, land};
    use network::{Edge as NetworkEdge, Network};

    fn no_coverage() -> RoadParams {
        RoadParams {
            coverage_grid_size: 0,
            ..RoadParams::default()
        }
    }

    fn connected(mesh: &Mesh, segments: &[RoadSegment], from: usize, to: usize) -> bool {
        let edges: Vec<NetworkEdge> = segments
            .iter()
            .flat_map(|segment| {
                vec![
                    NetworkEdge::new(segment.r1, segment.r2, 1.0),
                    NetworkEdge::new(segment.r2, segment.r1, 1.0),
                ]
            })
            .collect();
        Network::new(mesh.num_regions(), &edges)
            .shortest_path(from, to)
            .is_some()
    }

    #[test]
    fn shortcut_count_should_follow_towns_or_waypoints() {
        let params = RoadParams::default();
        assert_eq!(shortcut_count(&params, 3, 20), 6);
        assert_eq!(shortcut_count(&params, 20, 40), MAX_SHORTCUTS);
        assert_eq!(shortcut_count(&params, 1, 35), 3);
        assert_eq!(shortcut_count(&params, 0, 5), 1);
    }

    #[test]
    fn one_town_without_coverage_should_have_no_roads() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.1);
        let roads = build_roads(&mesh, &fields, &no_coverage(), 10.0, &[12], 1).unwrap();
        assert!(roads.is_empty());
    }

    #[test]
    fn roads_should_join_all_towns() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.1);
        let towns = [12, 18, 100, 108];

        let roads = build_roads(&mesh, &fields, &no_coverage(), 10.0, &towns, 1).unwrap();

        for town in towns.iter().skip(1) {
            assert!(connected(&mesh, &roads, towns[0], *town));
        }
    }

    #[test]
    fn segments_should_be_unique_mesh_edges() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.1);

        let roads = build_roads(&mesh, &fields, &RoadParams::default(), 10.0, &[12, 108], 1)
            .unwrap();

        let edges: HashSet<Edge> = roads
            .iter()
            .map(|segment| Edge::new(segment.r1, segment.r2))
            .collect();
        assert_eq!(edges.len(), roads.len());
        assert!(roads
            .iter()
            .all(|segment| mesh.side_between(segment.r1, segment.r2).is_some()));
    }

    #[test]
    fn roads_should_stay_on_passable_land() {
        let mesh = grid_mesh(11, 1000.0);
        let mut fields = land(&mesh, 0.1);
        for y in 2..9 {
            fields.elevation_r[y * 11 + 5] = 0.9;
        }

        let roads = build_roads(&mesh, &fields, &RoadParams::default(), 10.0, &[56, 64], 1)
            .unwrap();

        assert!(connected(&mesh, &roads, 56, 64));
        assert!(roads
            .iter()
            .all(|segment| fields.elevation_r[segment.r1] < 0.65
                && fields.elevation_r[segment.r2] < 0.65));
    }

    #[test]
    fn river_crossings_should_be_flagged() {
        let mesh = grid_mesh(11, 1000.0);
        let mut fields = land(&mesh, 0.1);
        for s in 0..mesh.num_solid_sides() {
            if mesh.r_begin_s(s) % 11 == 5 && mesh.r_end_s(s) % 11 == 6 {
                fields.flow_s[s] = 100.0;
            }
        }

        let roads = build_roads(&mesh, &fields, &no_coverage(), 10.0, &[55, 65], 1).unwrap();

        assert!(roads.iter().any(|segment| segment.crosses_river));
        assert!(roads
            .iter()
            .filter(|segment| segment.crosses_river)
            .all(|segment| {
                let columns = (segment.r1 % 11, segment.r2 % 11);
                columns == (5, 6) || columns == (6, 5)
            }));
    }

    #[test]
    fn coverage_alone_should_build_roads() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.1);

        let roads = build_roads(&mesh, &fields, &RoadParams::default(), 10.0, &[], 1).unwrap();

        assert!(!roads.is_empty());
    }

    #[test]
    fn roads_should_be_deterministic() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.1);
        let build = || build_roads(&mesh, &fields, &RoadParams::default(), 10.0, &[12, 98], 7);
        assert_eq!(build(), build());
    }
}
