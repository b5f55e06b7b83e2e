use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::iter::once;
#[cfg(test)]
#[macro_use]
extern crate hamcrest;

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub cost: f32,
}

impl Edge {
    pub fn new(from: usize, to: usize, cost: f32) -> Edge {
        Edge { from, to, cost }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ClosestTargetResult {
    pub node: usize,
    pub path: Vec<usize>,
    pub cost: f32,
}

#[derive(PartialEq, Debug)]
pub struct Network {
    pub nodes: usize,
    edges_out: Vec<Vec<Edge>>,
}

impl Network {
    pub fn new(nodes: usize, edges: &[Edge]) -> Network {
        let mut out = Network {
            nodes,
            edges_out: vec![vec![]; nodes],
        };

        edges.iter().for_each(|edge| out.add_edge(edge));

        out
    }

    pub fn add_edge(&mut self, edge: &Edge) {
        self.edges_out[edge.from].push(*edge);
    }

    pub fn get_out(&self, node: usize) -> &Vec<Edge> {
        &self.edges_out[node]
    }

    /// Lowest cost path from `from` to `to` as a list of nodes including both ends.
    pub fn shortest_path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let mut targets = vec![false; self.nodes];
        targets[to] = true;
        self.closest_targets(&[from], &targets, 1)
            .into_iter()
            .next()
            .map(|result| result.path)
    }

    /// Searches outwards from all `start_nodes` at once. Returns the `n_closest` nearest targets
    /// (and any targets tied with the last of them), each with the path from whichever start node
    /// reached it first.
    pub fn closest_targets(
        &self,
        start_nodes: &[usize],
        targets: &[bool],
        n_closest: usize,
    ) -> Vec<ClosestTargetResult> {
        struct CTNode {
            index: usize,
            cost: f32,
            entry: Option<Edge>,
        }

        impl CTNode {
            fn new(index: usize, cost: f32, entry: Option<Edge>) -> CTNode {
                CTNode { index, cost, entry }
            }
        }

        impl Ord for CTNode {
            fn cmp(&self, other: &CTNode) -> Ordering {
                self.cost
                    .partial_cmp(&other.cost)
                    .unwrap_or(Ordering::Equal)
                    .reverse()
            }
        }

        impl PartialOrd for CTNode {
            fn partial_cmp(&self, other: &CTNode) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl PartialEq for CTNode {
            fn eq(&self, other: &CTNode) -> bool {
                self.cost == other.cost
            }
        }

        impl Eq for CTNode {}

        if targets.len() != self.nodes {
            panic!("Length of target slice must equal size of network");
        }

        if n_closest == 0 {
            return vec![];
        }

        let mut closed = vec![false; self.nodes];
        let mut edges = vec![None; self.nodes];
        let mut heap = BinaryHeap::new();
        let mut out = vec![];
        let mut last_cost = None;

        for node in start_nodes {
            heap.push(CTNode::new(*node, 0.0, None))
        }

        while let Some(CTNode { index, cost, entry }) = heap.pop() {
            if closed[index] {
                continue;
            }
            edges[index] = entry;
            if targets[index] {
                if let Some(last_cost) = last_cost {
                    if out.len() >= n_closest && last_cost < cost {
                        return out;
                    }
                }
                last_cost = Some(cost);
                out.push(ClosestTargetResult {
                    node: index,
                    cost,
                    path: get_path(start_nodes, index, &edges)
                        .drain(..)
                        .map(|edge| edge.from)
                        .chain(once(index))
                        .collect(),
                });
            }
            closed[index] = true;
            for edge in self.get_out(index) {
                let neighbour = edge.to;
                if closed[neighbour] {
                    continue;
                }
                heap.push(CTNode {
                    index: neighbour,
                    cost: cost + edge.cost,
                    entry: Some(*edge),
                });
            }
        }

        out
    }

    /// Path with the fewest edges from `from` to `to`, ignoring costs. Only nodes for which
    /// `enterable` holds are visited; `from` is always allowed.
    pub fn breadth_first_path(
        &self,
        from: usize,
        to: usize,
        enterable: &dyn Fn(usize) -> bool,
    ) -> Option<Vec<usize>> {
        if from == to {
            return Some(vec![from]);
        }
        let mut edges = vec![None; self.nodes];
        let mut visited = vec![false; self.nodes];
        let mut queue = VecDeque::new();
        visited[from] = true;
        queue.push_back(from);

        while let Some(index) = queue.pop_front() {
            for edge in self.get_out(index) {
                let neighbour = edge.to;
                if visited[neighbour] || !enterable(neighbour) {
                    continue;
                }
                visited[neighbour] = true;
                edges[neighbour] = Some(*edge);
                if neighbour == to {
                    return Some(
                        get_path(&[from], to, &edges)
                            .drain(..)
                            .map(|edge| edge.from)
                            .chain(once(to))
                            .collect(),
                    );
                }
                queue.push_back(neighbour);
            }
        }

        None
    }
}

fn get_path(from: &[usize], to: usize, edges: &[Option<Edge>]) -> Vec<Edge> {
    let mut out = vec![];
    let mut current = to;
    while !from.contains(&current) {
        if let Some(Some(edge)) = edges.get(current) {
            current = edge.from;
            out.push(*edge);
        } else {
            panic!("When building path after pathfinding, did not have an edge from {}. This is never expected to happen.", current);
        }
    }
    out.reverse();
    out
}

#[cfg(test)]
mod tests {

    use super::*;
    use hamcrest::prelude::*;

    fn get_test_edges() -> Vec<Edge> {
        vec![
            Edge::new(0, 1, 1.0),
            Edge::new(0, 2, 2.0),
            Edge::new(0, 2, 3.0),
            Edge::new(1, 3, 4.0),
            Edge::new(2, 3, 5.0),
            Edge::new(2, 3, 6.0),
            Edge::new(5, 6, 7.0),
            Edge::new(6, 5, 8.0),
            Edge::new(6, 5, 9.0),
            Edge::new(7, 7, 10.0),
        ]
    }

    fn get_test_network(edges: &[Edge]) -> Network {
        Network::new(8, edges)
    }

    /// Both directions of every horizontal and vertical link in a `width` x `height` grid.
    fn grid(width: usize, height: usize) -> Vec<Edge> {
        let index = |x: usize, y: usize| y * width + x;
        let mut out = vec![];
        for y in 0..height {
            for x in 0..width {
                if x + 1 < width {
                    out.push(Edge::new(index(x, y), index(x + 1, y), 1.0));
                    out.push(Edge::new(index(x + 1, y), index(x, y), 1.0));
                }
                if y + 1 < height {
                    out.push(Edge::new(index(x, y), index(x, y + 1), 1.0));
                    out.push(Edge::new(index(x, y + 1), index(x, y), 1.0));
                }
            }
        }
        out
    }

    #[test]
    fn test_add_edges() {
        let mut network = Network::new(7, &[]);
        network.add_edge(&Edge::new(1, 2, 4.0));
        network.add_edge(&Edge::new(3, 2, 5.0));
        assert_eq!(network.get_out(1), &vec![Edge::new(1, 2, 4.0)]);
        assert_eq!(network.get_out(3), &vec![Edge::new(3, 2, 5.0)]);
        assert_eq!(network.get_out(2), &vec![]);
    }

    #[test]
    fn test_get_out() {
        let edges = get_test_edges();
        let network = get_test_network(&edges);
        assert_that!(
            &network.get_out(0).iter().collect(),
            contains(vec![&edges[0], &edges[1], &edges[2]]).exactly()
        );
        assert_that!(
            &network.get_out(2).iter().collect(),
            contains(vec![&edges[4], &edges[5]]).exactly()
        );
        assert_eq!(network.get_out(4), &vec![]);
    }

    #[test]
    fn test_shortest_path_prefers_cheaper_route() {
        let edges = vec![
            Edge::new(0, 1, 10.0),
            Edge::new(0, 2, 1.0),
            Edge::new(2, 3, 1.0),
            Edge::new(3, 1, 1.0),
        ];
        let network = Network::new(4, &edges);
        assert_eq!(network.shortest_path(0, 1), Some(vec![0, 2, 3, 1]));
    }

    #[test]
    fn test_shortest_path_unreachable() {
        let edges = vec![Edge::new(0, 1, 1.0)];
        let network = Network::new(3, &edges);
        assert_eq!(network.shortest_path(1, 0), None);
        assert_eq!(network.shortest_path(0, 2), None);
    }

    #[test]
    fn test_shortest_path_from_equals_to() {
        let network = Network::new(2, &[]);
        assert_eq!(network.shortest_path(1, 1), Some(vec![1]));
    }

    #[test]
    fn test_closest_targets_no_closest_targets() {
        let edges = vec![Edge::new(0, 1, 1.0), Edge::new(0, 2, 1.0)];
        let network = Network::new(4, &edges);
        let actual = network.closest_targets(&[0], &[false, false, false, true], 1);
        assert!(actual.is_empty());
    }

    #[test]
    fn test_closest_targets_with_tie() {
        let edges = vec![Edge::new(0, 1, 1.0), Edge::new(0, 2, 2.0)];
        let network = Network::new(3, &edges);
        let actual = network.closest_targets(&[0], &[false, true, true], 1);
        let expected = vec![ClosestTargetResult {
            node: 1,
            path: vec![0, 1],
            cost: 1.0,
        }];
        assert_that!(&actual, contains(expected).exactly());
    }

    #[test]
    fn test_closest_targets_closest_target_more_edges() {
        let edges = vec![
            Edge::new(0, 1, 3.0),
            Edge::new(0, 2, 1.0),
            Edge::new(2, 3, 1.0),
        ];
        let network = Network::new(4, &edges);
        let actual = network.closest_targets(&[0], &[false, true, false, true], 1);
        let expected = vec![ClosestTargetResult {
            node: 3,
            path: vec![0, 2, 3],
            cost: 2.0,
        }];
        assert_that!(&actual, contains(expected).exactly());
    }

    #[test]
    fn test_closest_targets_path_starts_at_nearest_start_node() {
        let edges = vec![
            Edge::new(0, 1, 5.0),
            Edge::new(1, 2, 5.0),
            Edge::new(3, 2, 1.0),
        ];
        let network = Network::new(4, &edges);
        let actual = network.closest_targets(&[0, 3], &[false, false, true, false], 1);
        let expected = vec![ClosestTargetResult {
            node: 2,
            path: vec![3, 2],
            cost: 1.0,
        }];
        assert_that!(&actual, contains(expected).exactly());
    }

    #[test]
    fn test_closest_targets_start_node_is_target() {
        let edges = vec![Edge::new(0, 1, 1.0), Edge::new(0, 2, 2.0)];
        let network = Network::new(3, &edges);
        let actual = network.closest_targets(&[0], &[true, true, true], 1);
        let expected = vec![ClosestTargetResult {
            node: 0,
            path: vec![0],
            cost: 0.0,
        }];
        assert_that!(&actual, contains(expected).exactly());
    }

    #[test]
    fn test_breadth_first_path_ignores_cost() {
        let edges = vec![
            Edge::new(0, 1, 100.0),
            Edge::new(0, 2, 1.0),
            Edge::new(2, 3, 1.0),
            Edge::new(3, 1, 1.0),
        ];
        let network = Network::new(4, &edges);
        assert_eq!(
            network.breadth_first_path(0, 1, &|_| true),
            Some(vec![0, 1])
        );
    }

    #[test]
    fn test_breadth_first_path_avoids_unenterable_nodes() {
        let edges = grid(3, 3);
        let network = Network::new(9, &edges);
        let actual = network.breadth_first_path(3, 5, &|node| node != 4);
        let actual = actual.unwrap();
        assert_eq!(actual.len(), 5);
        assert_eq!(actual.first(), Some(&3));
        assert_eq!(actual.last(), Some(&5));
        assert!(!actual.contains(&4));
    }

    #[test]
    fn test_breadth_first_path_blocked() {
        let edges = grid(3, 1);
        let network = Network::new(3, &edges);
        assert_eq!(network.breadth_first_path(0, 2, &|node| node != 1), None);
    }

    #[test]
    fn test_breadth_first_path_from_equals_to() {
        let network = Network::new(2, &[]);
        assert_eq!(network.breadth_first_path(1, 1, &|_| false), Some(vec![1]));
    }
}
