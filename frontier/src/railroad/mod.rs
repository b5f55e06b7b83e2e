mod blocked;
mod legs;
mod stations;

pub use blocked::{regions_inside_town, Blocked};
pub use legs::{leg_for_path_index, nearest_leg, waypoint_insertion_index};
pub use stations::{station_region, tour_order};

use commons::log::{debug, warn};
use network::{Edge as NetworkEdge, Network};
use pioneer::flow_map::flow_across;
use pioneer::{FieldError, Mesh, TerrainFields};
use serde::{Deserialize, Serialize};
use std::iter::once;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RailroadParams {
    pub enabled: bool,
    pub coastal_buffer_steps: u32,
}

impl Default for RailroadParams {
    fn default() -> RailroadParams {
        RailroadParams {
            enabled: true,
            coastal_buffer_steps: 2,
        }
    }
}

/// A station placed by hand. Stations are visited in increasing `order`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub region: usize,
    pub order: i32,
}

/// A region the leg from station `leg_index` to the next station must pass through.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub leg_index: usize,
    pub region: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RailLeg {
    pub index: usize,
    pub from: usize,
    pub to: usize,
    pub regions: Vec<usize>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RailroadCrossing {
    pub r1: usize,
    pub r2: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Railroad {
    /// Longest run of track. Consecutive regions always share a side.
    pub path: Vec<usize>,
    /// Every unbroken stretch of track, split wherever a leg could not be routed.
    pub runs: Vec<Vec<usize>>,
    pub legs: Vec<RailLeg>,
    pub crossings: Vec<RailroadCrossing>,
    pub station_ids: Vec<usize>,
}

impl Railroad {
    pub fn is_closed(&self) -> bool {
        self.path.len() >= 3 && self.path.first() == self.path.last()
    }
}

pub struct RailroadBuilder<'a> {
    pub mesh: &'a Mesh,
    pub fields: &'a TerrainFields,
    pub params: &'a RailroadParams,
    pub min_flow: f32,
    pub towns: &'a [usize],
    pub town_radius: f32,
    pub manual_stations: &'a [Station],
    pub waypoints: &'a [Waypoint],
}

/// Joins consecutive routed legs into unbroken runs. A loop with a missing leg is read starting
/// after the first gap, so a run may wrap past the last leg back to the first.
fn runs(legs: &[RailLeg]) -> Vec<Vec<usize>> {
    let start = legs
        .iter()
        .position(|leg| leg.regions.is_empty())
        .map_or(0, |gap| gap + 1);
    let mut out = vec![];
    let mut current: Vec<usize> = vec![];
    for i in 0..legs.len() {
        let leg = &legs[(start + i) % legs.len()];
        if leg.regions.is_empty() {
            if !current.is_empty() {
                out.push(current);
                current = vec![];
            }
            continue;
        }
        let joined = current.last() == leg.regions.first();
        let skip = if joined { 1 } else { 0 };
        current.extend(leg.regions.iter().skip(skip));
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

impl<'a> RailroadBuilder<'a> {
    fn stations(&self) -> Vec<usize> {
        if self.manual_stations.len() >= 2 {
            let mut manual = self.manual_stations.to_vec();
            manual.sort_by_key(|station| station.order);
            return manual.into_iter().map(|station| station.region).collect();
        }
        let stations: Vec<usize> = self
            .towns
            .iter()
            .map(|town| station_region(self.mesh, *town, self.town_radius))
            .collect();
        tour_order(self.mesh, self.towns, &stations)
            .into_iter()
            .map(|i| stations[i])
            .collect()
    }

    fn network(&self) -> Network {
        let mut edges = vec![];
        for from in 0..self.mesh.num_solid_regions() {
            for (_, to) in self.mesh.solid_neighbours(from) {
                edges.push(NetworkEdge::new(from, to, 1.0));
            }
        }
        Network::new(self.mesh.num_regions(), &edges)
    }

    /// Fewest-hop path through `stops` in order, or `None` if any hop is impossible.
    fn chain(&self, network: &Network, blocked: &Blocked, stops: &[usize]) -> Option<Vec<usize>> {
        let enterable = |r: usize| !blocked.is_blocked(r) || stops.contains(&r);
        let mut out = vec![stops[0]];
        for pair in stops.windows(2) {
            let path = network.breadth_first_path(pair[0], pair[1], &enterable)?;
            out.extend(path.into_iter().skip(1));
        }
        Some(out)
    }

    fn leg(&self, network: &Network, blocked: &Blocked, index: usize, from: usize, to: usize) -> RailLeg {
        let via: Vec<usize> = self
            .waypoints
            .iter()
            .filter(|waypoint| waypoint.leg_index == index)
            .map(|waypoint| waypoint.region)
            .collect();
        let regions = if via.is_empty() {
            None
        } else {
            let stops: Vec<usize> = once(from).chain(via).chain(once(to)).collect();
            self.chain(network, blocked, &stops)
        };
        let regions = regions
            .or_else(|| self.chain(network, blocked, &[from, to]))
            .unwrap_or_else(|| {
                warn!("No railroad route from {} to {}, leaving leg {} out", from, to, index);
                vec![]
            });
        RailLeg {
            index,
            from,
            to,
            regions,
        }
    }

    fn crossings(&self, path: &[usize]) -> Vec<RailroadCrossing> {
        path.windows(2)
            .filter_map(|pair| {
                let s = self.mesh.side_between(pair[0], pair[1])?;
                if flow_across(self.mesh, &self.fields.flow_s, s) >= self.min_flow {
                    Some(RailroadCrossing {
                        r1: pair[0],
                        r2: pair[1],
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// One leg per pair of consecutive stations, closing back to the first station when there
    /// are three or more. Legs that cannot be routed are left empty and break the track there.
    pub fn build(&self) -> Result<Railroad, FieldError> {
        self.fields.check_mesh(self.mesh)?;
        let station_ids = self.stations();
        let n = station_ids.len();
        if n < 2 {
            return Ok(Railroad::default());
        }
        let blocked = Blocked::new(
            self.mesh,
            self.fields,
            self.towns,
            self.town_radius,
            self.params.coastal_buffer_steps,
        );
        debug!("{} regions blocked for the railroad", blocked.count());
        let network = self.network();

        let leg_count = if n == 2 { 1 } else { n };
        let legs: Vec<RailLeg> = (0..leg_count)
            .map(|i| self.leg(&network, &blocked, i, station_ids[i], station_ids[(i + 1) % n]))
            .collect();

        let runs = runs(&legs);
        let path = runs
            .iter()
            .rev()
            .max_by_key(|run| run.len())
            .cloned()
            .unwrap_or_default();
        let crossings = runs.iter().flat_map(|run| self.crossings(run)).collect();
        debug!(
            "Railroad through {} stations covers {} regions",
            n,
            path.len()
        );

        Ok(Railroad {
            path,
            runs,
            legs,
            crossings,
            station_ids,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::fixtures::{grid_mesh, land};

    fn build(
        mesh: &Mesh,
        fields: &TerrainFields,
        towns: &[usize],
        manual_stations: &[Station],
        waypoints: &[Waypoint],
    ) -> Railroad {
        RailroadBuilder {
            mesh,
            fields,
            params: &RailroadParams::default(),
            min_flow: 10.0,
            towns,
            town_radius: 20.0,
            manual_stations,
            waypoints,
        }
        .build()
        .unwrap()
    }

    fn is_adjacent(mesh: &Mesh, path: &[usize]) -> bool {
        path.windows(2)
            .all(|pair| mesh.side_between(pair[0], pair[1]).is_some())
    }

    #[test]
    fn fewer_than_two_towns_should_give_empty_railroad() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.2);
        assert_eq!(build(&mesh, &fields, &[60], &[], &[]), Railroad::default());
    }

    #[test]
    fn two_towns_should_give_open_line() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.2);

        let railroad = build(&mesh, &fields, &[12, 108], &[], &[]);

        assert_eq!(railroad.legs.len(), 1);
        assert!(!railroad.is_closed());
        assert_eq!(railroad.path.first(), Some(&railroad.station_ids[0]));
        assert_eq!(railroad.path.last(), Some(&railroad.station_ids[1]));
        assert!(is_adjacent(&mesh, &railroad.path));
    }

    #[test]
    fn three_towns_should_give_closed_loop() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.2);
        let towns = [12, 20, 104];

        let railroad = build(&mesh, &fields, &towns, &[], &[]);

        assert!(railroad.is_closed());
        assert_eq!(railroad.legs.len(), 3);
        assert!(is_adjacent(&mesh, &railroad.path));
        assert!(railroad.path.iter().all(|r| !towns.contains(r)));
        for station in railroad.station_ids.iter() {
            assert!(railroad.path.contains(station));
        }
    }

    #[test]
    fn blocked_corridor_should_leave_legs_out() {
        let mesh = grid_mesh(21, 1000.0);
        let mut fields = land(&mesh, 0.2);
        for y in 0..21 {
            if y != 10 {
                fields.elevation_r[y * 21 + 10] = -0.5;
            }
        }
        let towns = [3 * 21 + 2, 17 * 21 + 2, 10 * 21 + 18];

        let railroad = build(&mesh, &fields, &towns, &[], &[]);

        let resolved: Vec<&RailLeg> = railroad
            .legs
            .iter()
            .filter(|leg| !leg.regions.is_empty())
            .collect();
        assert_eq!(railroad.legs.len(), 3);
        assert_eq!(resolved.len(), 1);
        assert!(!railroad.is_closed());
        assert_eq!(railroad.path, resolved[0].regions);
        assert!(railroad.path.iter().all(|r| r % 21 < 10));
    }

    #[test]
    fn missing_legs_should_break_track_into_adjacent_runs() {
        let mesh = grid_mesh(21, 1000.0);
        let mut fields = land(&mesh, 0.2);
        for y in 0..21 {
            fields.elevation_r[y * 21 + 10] = -0.5;
        }
        let towns = [3 * 21 + 3, 17 * 21 + 3, 3 * 21 + 17, 17 * 21 + 17];

        let railroad = build(&mesh, &fields, &towns, &[], &[]);

        let resolved = railroad
            .legs
            .iter()
            .filter(|leg| !leg.regions.is_empty())
            .count();
        assert_eq!(railroad.legs.len(), 4);
        assert_eq!(resolved, 2);
        assert_eq!(railroad.runs.len(), 2);
        assert!(!railroad.is_closed());
        assert!(is_adjacent(&mesh, &railroad.path));
        for run in railroad.runs.iter() {
            assert!(is_adjacent(&mesh, run));
            let west = run.iter().filter(|r| *r % 21 < 10).count();
            assert!(west == 0 || west == run.len());
        }
        assert!(railroad.runs.contains(&railroad.path));
    }

    #[test]
    fn complete_loop_should_be_single_run() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.2);

        let railroad = build(&mesh, &fields, &[12, 20, 104], &[], &[]);

        assert_eq!(railroad.runs, vec![railroad.path.clone()]);
    }

    #[test]
    fn runs_should_wrap_past_last_leg() {
        let leg = |index, regions: Vec<usize>| RailLeg {
            index,
            from: regions.first().copied().unwrap_or(0),
            to: regions.last().copied().unwrap_or(0),
            regions,
        };
        let legs = vec![
            leg(0, vec![5, 6, 7]),
            leg(1, vec![]),
            leg(2, vec![9, 10]),
            leg(3, vec![10, 4, 5]),
        ];

        assert_eq!(runs(&legs), vec![vec![9, 10, 4, 5, 6, 7]]);
    }

    #[test]
    fn manual_stations_should_follow_order() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.2);
        let stations = [
            Station {
                region: 108,
                order: 2,
            },
            Station {
                region: 12,
                order: 1,
            },
        ];

        let railroad = build(&mesh, &fields, &[], &stations, &[]);

        assert_eq!(railroad.station_ids, vec![12, 108]);
        assert_eq!(railroad.path.first(), Some(&12));
        assert_eq!(railroad.path.last(), Some(&108));
    }

    #[test]
    fn leg_should_pass_through_waypoints() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.2);
        let stations = [
            Station {
                region: 12,
                order: 0,
            },
            Station {
                region: 20,
                order: 1,
            },
        ];
        let waypoints = [Waypoint {
            leg_index: 0,
            region: 93,
        }];

        let railroad = build(&mesh, &fields, &[], &stations, &waypoints);

        assert!(railroad.path.contains(&93));
        assert!(is_adjacent(&mesh, &railroad.path));
    }

    #[test]
    fn unreachable_waypoint_should_fall_back_to_direct_route() {
        let mesh = grid_mesh(11, 1000.0);
        let mut fields = land(&mesh, 0.2);
        for r in [81, 82, 83, 92, 93, 94, 103, 104, 105].iter() {
            fields.elevation_r[*r] = -0.5;
        }
        let stations = [
            Station {
                region: 12,
                order: 0,
            },
            Station {
                region: 20,
                order: 1,
            },
        ];
        let waypoints = [Waypoint {
            leg_index: 0,
            region: 93,
        }];

        let railroad = build(&mesh, &fields, &[], &stations, &waypoints);

        assert!(!railroad.path.contains(&93));
        assert_eq!(railroad.path.first(), Some(&12));
        assert_eq!(railroad.path.last(), Some(&20));
    }

    #[test]
    fn river_crossings_should_be_recorded() {
        let mesh = grid_mesh(11, 1000.0);
        let mut fields = land(&mesh, 0.2);
        for s in 0..mesh.num_solid_sides() {
            if mesh.r_begin_s(s) % 11 == 5 && mesh.r_end_s(s) % 11 == 6 {
                fields.flow_s[s] = 100.0;
            }
        }

        let railroad = build(&mesh, &fields, &[55, 65], &[], &[]);

        assert!(!railroad.crossings.is_empty());
        for crossing in railroad.crossings.iter() {
            let columns = [crossing.r1 % 11, crossing.r2 % 11];
            assert!(columns.contains(&5) && columns.contains(&6));
        }
    }
}
