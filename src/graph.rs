//! Random contact networks with an exact edge count, stored as a flat
//! adjacency array with per-vertex (start, end) offsets.

use rand::Rng;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Failure modes of the generate-until-connected loop.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(
        "no connected graph in {attempts} attempts (n = {n}, average degree = {average_degree})"
    )]
    RetryBudgetExhausted {
        attempts: usize,
        n: usize,
        average_degree: f64,
    },
}

/// An undirected simple graph, immutable once compiled.
///
/// Neighbors of vertex `v` live in `edges[start[v]..end[v]]`. Every accepted
/// edge (u, v) appears in both slices; no self-loops, no duplicate pairs.
#[derive(Debug, Clone)]
pub struct Graph {
    edges: Vec<u32>,
    start: Vec<usize>,
    end: Vec<usize>,
}

impl Graph {
    /// Number of vertices.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.start.len()
    }

    /// Number of undirected edges.
    #[inline(always)]
    pub fn m(&self) -> usize {
        self.edges.len() / 2
    }

    #[inline(always)]
    pub fn degree(&self, v: usize) -> usize {
        self.end[v] - self.start[v]
    }

    /// Neighbor slice of `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: usize) -> &[u32] {
        &self.edges[self.start[v]..self.end[v]]
    }

    /// Compile an explicit edge list into the flat adjacency layout.
    ///
    /// `pairs` must already be self-loop-free and duplicate-free; this is the
    /// shared compilation step behind `erdos_renyi` and is exposed so tests
    /// can build fixed topologies.
    pub fn from_edges(n: usize, pairs: &[(u32, u32)]) -> Self {
        let mut degree = vec![0usize; n];
        for &(u, v) in pairs {
            degree[u as usize] += 1;
            degree[v as usize] += 1;
        }

        // Prefix sums give each vertex its slice start; a mutable cursor per
        // vertex walks the slice during the fill and ends up at the end offset.
        let mut start = vec![0usize; n];
        for v in 1..n {
            start[v] = start[v - 1] + degree[v - 1];
        }
        let mut cursor = start.clone();

        let mut edges = vec![0u32; 2 * pairs.len()];
        for &(u, v) in pairs {
            edges[cursor[u as usize]] = v;
            cursor[u as usize] += 1;
            edges[cursor[v as usize]] = u;
            cursor[v as usize] += 1;
        }

        Self {
            edges,
            start,
            end: cursor,
        }
    }

    /// Erdős–Rényi style graph with exactly m = ⌊n·d/2⌋ edges.
    ///
    /// Unordered pairs are drawn uniformly and rejected on self-loop or
    /// repeat until m distinct edges are accepted. Precondition: the caller
    /// must guarantee m ≤ n(n−1)/2, otherwise this loop never terminates
    /// (enforced upstream by `SweepConfig::validate`).
    pub fn erdos_renyi(rng: &mut impl Rng, n: usize, average_degree: f64) -> Self {
        let m = target_edge_count(n, average_degree);
        let mut seen: HashSet<(u32, u32)> = HashSet::with_capacity(m);
        let mut pairs: Vec<(u32, u32)> = Vec::with_capacity(m);

        while pairs.len() < m {
            let u = rng.gen_range(0..n) as u32;
            let v = rng.gen_range(0..n) as u32;
            if u == v {
                continue;
            }
            let key = if u < v { (u, v) } else { (v, u) };
            if seen.insert(key) {
                pairs.push(key);
            }
        }

        Self::from_edges(n, &pairs)
    }

    /// Breadth-first reachability: true iff the graph is one connected
    /// component. A graph with no positive-degree vertex counts as
    /// disconnected.
    pub fn is_connected(&self) -> bool {
        let n = self.n();
        let root = match (0..n).find(|&v| self.degree(v) > 0) {
            Some(v) => v,
            None => return false,
        };

        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();
        visited[root] = true;
        queue.push_back(root);
        let mut count = 1usize;

        while let Some(v) = queue.pop_front() {
            for &w in self.neighbors(v) {
                let w = w as usize;
                if !visited[w] {
                    visited[w] = true;
                    queue.push_back(w);
                    count += 1;
                }
            }
        }
        count == n
    }
}

/// m = ⌊n · d / 2⌋.
pub fn target_edge_count(n: usize, average_degree: f64) -> usize {
    (n as f64 * average_degree / 2.0).floor() as usize
}

/// Generate graphs until one passes the connectivity gate, giving up after
/// `max_attempts` draws.
pub fn generate_connected(
    rng: &mut impl Rng,
    n: usize,
    average_degree: f64,
    max_attempts: usize,
) -> Result<Graph, GraphError> {
    for _ in 0..max_attempts {
        let g = Graph::erdos_renyi(rng, n, average_degree);
        if g.is_connected() {
            return Ok(g);
        }
    }
    Err(GraphError::RetryBudgetExhausted {
        attempts: max_attempts,
        n,
        average_degree,
    })
}
