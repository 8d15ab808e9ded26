/// Disjoint-set forest over grid cells, used by the Kruskal carver to test
/// and merge connectivity. One node per cell, addressed by row-major index.
///
/// `union` only ever attaches one root under another, so parent chains can
/// never form a cycle and `find` always terminates. Sets only merge, never
/// split. No path compression - grids are small enough that plain parent
/// chasing is fine.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parents: Vec<usize>,
}

impl DisjointSet {
    /// One singleton set per cell of a `width x height` grid.
    pub fn new_forest(width: usize, height: usize) -> DisjointSet {
        DisjointSet {
            parents: (0..width * height).collect(),
        }
    }

    /// The representative root of the set containing `node`.
    pub fn find(&self, node: usize) -> usize {
        let mut current = node;
        while self.parents[current] != current {
            current = self.parents[current];
        }
        current
    }

    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Merge the sets containing `a` and `b`, attaching `b`'s root under
    /// `a`'s. A no-op when they already share a root.
    pub fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parents[root_b] = root_a;
        }
    }
}
