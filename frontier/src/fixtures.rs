use commons::v2;
use pioneer::points::PointSet;
use pioneer::{Mesh, TerrainFields};

/// Square grid of `size` x `size` points spread over `extent`. Rows are nudged sideways a little
/// so the triangulation has no cocircular quads. Region `y * size + x` sits at column x, row y.
pub fn grid_mesh(size: usize, extent: f32) -> Mesh {
    let step = extent / (size - 1) as f32;
    let mut points = vec![];
    for y in 0..size {
        for x in 0..size {
            points.push(v2(x as f32 * step + 0.01 * y as f32, y as f32 * step));
        }
    }
    Mesh::from_points(&PointSet {
        points,
        exterior_boundary: 0,
        interior_boundary: 0,
        mountains: 0,
    })
    .unwrap()
}

/// Fields with the given region elevation, uniform rainfall and no rivers.
pub fn fields(mesh: &Mesh, elevation_r: Vec<f32>) -> TerrainFields {
    TerrainFields {
        elevation_t: vec![0.1; mesh.num_triangles()],
        elevation_r,
        humidity_r: vec![0.5; mesh.num_regions()],
        rainfall_r: vec![0.5; mesh.num_regions()],
        moisture_t: vec![0.5; mesh.num_triangles()],
        flow_t: vec![0.0; mesh.num_triangles()],
        flow_s: vec![0.0; mesh.num_sides()],
        downslope_t: vec![None; mesh.num_triangles()],
        order_t: vec![],
        mountain_distance_t: vec![0.0; mesh.num_triangles()],
    }
}

pub fn land(mesh: &Mesh, elevation: f32) -> TerrainFields {
    fields(mesh, vec![elevation; mesh.num_regions()])
}
