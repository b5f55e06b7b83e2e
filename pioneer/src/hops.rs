use crate::error::FieldError;
use crate::flow_map::flow_across;
use crate::mesh::Mesh;
use crate::simulator::TerrainFields;
use std::collections::VecDeque;

/// Fewest steps from any source to each region, walking between solid neighbours. Regions
/// further than `max_steps` (when given) or unreachable are `None`.
pub fn region_hops(mesh: &Mesh, sources: &[usize], max_steps: Option<u32>) -> Vec<Option<u32>> {
    let mut out = vec![None; mesh.num_regions()];
    let mut queue = VecDeque::new();
    for source in sources {
        if mesh.is_ghost_r(*source) || out[*source].is_some() {
            continue;
        }
        out[*source] = Some(0);
        queue.push_back(*source);
    }
    while let Some(current) = queue.pop_front() {
        let steps = out[current].unwrap_or(0) + 1;
        if max_steps.map_or(false, |max| steps > max) {
            continue;
        }
        for (_, neighbour) in mesh.solid_neighbours(current) {
            if out[neighbour].is_none() {
                out[neighbour] = Some(steps);
                queue.push_back(neighbour);
            }
        }
    }
    out
}

pub fn distance_from_water(
    mesh: &Mesh,
    fields: &TerrainFields,
) -> Result<Vec<Option<u32>>, FieldError> {
    fields.check_mesh(mesh)?;
    let water: Vec<usize> = (0..mesh.num_solid_regions())
        .filter(|r| fields.is_water_r(*r))
        .collect();
    Ok(region_hops(mesh, &water, None))
}

/// True when any side of `r` carries at least `min_flow`.
pub fn is_river_region(mesh: &Mesh, fields: &TerrainFields, r: usize, min_flow: f32) -> bool {
    mesh.solid_neighbours(r)
        .any(|(s, _)| flow_across(mesh, &fields.flow_s, s) >= min_flow)
}

pub fn river_regions(mesh: &Mesh, fields: &TerrainFields, min_flow: f32) -> Vec<usize> {
    (0..mesh.num_solid_regions())
        .filter(|r| is_river_region(mesh, fields, *r, min_flow))
        .collect()
}
