use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("need at least 3 points to triangulate, got {count}")]
    TooFewPoints { count: usize },
    #[error("spacing must be a positive number, got {spacing}")]
    InvalidSpacing { spacing: f32 },
    #[error("triangulation of {count} points produced no triangles")]
    DegenerateTriangulation { count: usize },
    #[error("mesh array {name} has length {actual}, expected {expected}")]
    InconsistentArrays {
        name: &'static str,
        actual: usize,
        expected: usize,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("{0} has not been computed yet")]
    NotBuilt(&'static str),
    #[error("field {name} has {actual} entries but the mesh needs {expected}")]
    MeshMismatch {
        name: &'static str,
        actual: usize,
        expected: usize,
    },
}
