//! Disjoint-set forest over a contiguous index range.
//!
//! Parent pointers are wrapped in [`Cell`]s so that [`UnionFind::find`] can
//! perform path compression through a shared reference; the live set count
//! is maintained incrementally by [`UnionFind::union`].

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UfIndex(pub usize);

impl From<usize> for UfIndex {
    fn from(x: usize) -> Self {
        UfIndex(x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UfNode {
    Root { rank: usize },
    Child(UfIndex),
}

/// Union-find over the elements `0..n`, with union by rank and path
/// compression.
#[derive(Debug, Clone)]
pub struct UnionFind {
    nodes: Vec<Cell<UfNode>>,
    sets: usize,
}

impl UnionFind {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        UnionFind {
            nodes: (0..n).map(|_| Cell::new(UfNode::Root { rank: 0 })).collect(),
            sets: n,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of disjoint sets currently alive.
    pub fn num_sets(&self) -> usize {
        self.sets
    }

    /// The representative of the set containing `x`, compressing the path
    /// along the way. Takes `&self`: the parent pointers are in `Cell`s.
    pub fn find(&self, x: UfIndex) -> UfIndex {
        match self.nodes[x.0].get() {
            UfNode::Root { .. } => x,
            UfNode::Child(parent) => {
                let root = self.find(parent);
                self.nodes[x.0].set(UfNode::Child(root));
                root
            }
        }
    }

    pub fn same_set(&self, x: UfIndex, y: UfIndex) -> bool {
        self.find(x) == self.find(y)
    }

    /// Merges the sets containing `x` and `y`. Returns `false` if they were
    /// already the same set.
    pub fn union(&mut self, x: UfIndex, y: UfIndex) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return false;
        }

        let rank = |r: UfIndex| match self.nodes[r.0].get() {
            UfNode::Root { rank } => rank,
            UfNode::Child(_) => unreachable!("find() should always return a root"),
        };
        let (rank_x, rank_y) = (rank(root_x), rank(root_y));

        let (winner, loser) = if rank_x < rank_y {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };
        if rank_x == rank_y {
            self.nodes[winner.0].set(UfNode::Root { rank: rank_x + 1 });
        }
        self.nodes[loser.0].set(UfNode::Child(winner));
        self.sets -= 1;
        true
    }
}

#[cfg(test)]
mod test;
