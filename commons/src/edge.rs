use serde::{Deserialize, Serialize};

/// Undirected connection between two regions. The lower region id is always stored first so
/// that `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Edge {
    from: usize,
    to: usize,
}

impl Edge {
    pub fn new(from: usize, to: usize) -> Edge {
        if from <= to {
            Edge { from, to }
        } else {
            Edge { from: to, to: from }
        }
    }
}
