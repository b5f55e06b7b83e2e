use pioneer::hops::region_hops;
use pioneer::{Mesh, TerrainFields};
use std::collections::VecDeque;

/// Regions that track may not enter: the inside of every town, open water and a strip of coast.
pub struct Blocked {
    regions: Vec<bool>,
}

impl Blocked {
    pub fn new(
        mesh: &Mesh,
        fields: &TerrainFields,
        towns: &[usize],
        town_radius: f32,
        coastal_buffer_steps: u32,
    ) -> Blocked {
        let mut regions = vec![false; mesh.num_regions()];
        regions[mesh.ghost_r()] = true;
        for town in towns {
            for r in regions_inside_town(mesh, *town, town_radius) {
                regions[r] = true;
            }
        }
        let water: Vec<usize> = (0..mesh.num_solid_regions())
            .filter(|r| fields.is_water_r(*r))
            .collect();
        for (r, hops) in region_hops(mesh, &water, Some(coastal_buffer_steps))
            .into_iter()
            .enumerate()
        {
            if hops.is_some() {
                regions[r] = true;
            }
        }
        Blocked { regions }
    }

    pub fn is_blocked(&self, r: usize) -> bool {
        self.regions[r]
    }

    pub fn count(&self) -> usize {
        self.regions.iter().filter(|blocked| **blocked).count()
    }
}

/// The town centre and every region reachable from it without leaving the town radius.
pub fn regions_inside_town(mesh: &Mesh, centre: usize, radius: f32) -> Vec<usize> {
    let position = *mesh.position_r(centre);
    let radius_squared = radius * radius;
    let mut out = vec![centre];
    let mut queue = VecDeque::new();
    queue.push_back(centre);
    while let Some(r) = queue.pop_front() {
        for (_, next) in mesh.solid_neighbours(r) {
            if out.contains(&next) {
                continue;
            }
            if (mesh.position_r(next) - position).norm_squared() > radius_squared {
                continue;
            }
            out.push(next);
            queue.push_back(next);
        }
    }
    out
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::fixtures::{grid_mesh, land};
    use hamcrest::prelude::*;

    #[test]
    fn town_should_block_regions_within_radius() {
        let mesh = grid_mesh(11, 1000.0);
        let inside = regions_inside_town(&mesh, 60, 110.0);
        assert_that!(&inside, contains(vec![60, 49, 59, 61, 71]).exactly());
    }

    #[test]
    fn small_radius_should_block_only_centre() {
        let mesh = grid_mesh(11, 1000.0);
        assert_eq!(regions_inside_town(&mesh, 60, 20.0), vec![60]);
    }

    #[test]
    fn water_and_coast_should_be_blocked() {
        let mesh = grid_mesh(11, 1000.0);
        let mut fields = land(&mesh, 0.2);
        fields.elevation_r[5] = -0.3;

        let blocked = Blocked::new(&mesh, &fields, &[], 20.0, 2);

        assert!(blocked.is_blocked(5));
        assert!(blocked.is_blocked(16));
        assert!(blocked.is_blocked(27));
        assert!(!blocked.is_blocked(38));
        assert!(blocked.is_blocked(mesh.ghost_r()));
    }

    #[test]
    fn dry_land_should_only_block_towns() {
        let mesh = grid_mesh(11, 1000.0);
        let fields = land(&mesh, 0.2);

        let blocked = Blocked::new(&mesh, &fields, &[12, 100], 20.0, 2);

        assert!(blocked.is_blocked(12));
        assert!(blocked.is_blocked(100));
        assert_eq!(blocked.count(), 3);
    }
}
