use ahash::AHashMap;
use bitvec::prelude::*;

use crate::graph::edge::{EdgeKey, EdgeKind, EdgeRef};
use crate::graph::Graph;

impl Graph {
    /// Whether a closed walk exists that uses every edge exactly once.
    ///
    /// A graph without edges has no Eulerian cycle. Otherwise the vertices
    /// touched by at least one edge must form a single component ignoring
    /// direction (isolated vertices are ignored), and the degree condition
    /// must hold: indegree equal to outdegree everywhere when any edge is
    /// directed, every degree even in the purely undirected case.
    ///
    /// When directed and undirected edges mix, balance is necessary but not
    /// sufficient: an undirected edge may be forced into an orientation that
    /// strands the walk at the wrong vertex. That case is settled by
    /// attempting the construction.
    pub fn has_eulerian_cycle(&self) -> bool {
        if !self.eulerian_preconditions() {
            return false;
        }
        if self.is_directed() && self.edges().any(|(_, e)| !e.is_directed()) {
            self.build_eulerian_tour().is_some()
        } else {
            true
        }
    }

    /// Connectivity of the edge span plus the degree condition.
    fn eulerian_preconditions(&self) -> bool {
        if self.num_edges() == 0 {
            return false;
        }
        if !self.edge_span_connected() {
            return false;
        }
        if self.is_directed() {
            // Undirected edges count toward both sides.
            self.vertices().all(|v| {
                let (indeg, outdeg) = self.vertex_in_out(v);
                indeg == outdeg
            })
        } else {
            self.vertices().all(|v| self.vertex_degree(v) % 2 == 0)
        }
    }

    /// Vertices touched by at least one edge all lie in one component.
    fn edge_span_connected(&self) -> bool {
        let comps = self.components();
        let mut label = None;
        for v in self.vertices() {
            if self.vertex_degree(v) == 0 {
                continue;
            }
            let c = comps.component_of(v.id());
            match label {
                None => label = c,
                Some(_) if label == c => {}
                Some(_) => return false,
            }
        }
        label.is_some()
    }

    /// Constructs an Eulerian cycle with Hierholzer's algorithm: walk unused
    /// edges until the walk closes, splicing in sub-tours discovered at
    /// revisited vertices, until every edge is used.
    ///
    /// Directed edges are traversed only in their stated direction. The
    /// result lists every edge exactly once, consecutive edges sharing a
    /// vertex, and the walk returns to its starting vertex; `None` if no
    /// Eulerian cycle exists.
    pub fn eulerian_cycle(&self) -> Option<Vec<EdgeRef>> {
        if !self.eulerian_preconditions() {
            return None;
        }
        self.build_eulerian_tour()
    }

    fn build_eulerian_tour(&self) -> Option<Vec<EdgeRef>> {
        // Adjacency by vertex position. An undirected edge is walkable from
        // both ends, a directed one only from its source, a loop is entered
        // once.
        let n = self.num_vertices();
        let mut adj: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        let mut slot_ends: AHashMap<usize, (usize, usize, bool)> = AHashMap::new();
        let mut start = None;
        for (r, e) in self.edges() {
            let (a, b) = e.endpoint_ids();
            let (pa, pb) = (self.position_of(a)?, self.position_of(b)?);
            adj[pa].push((r.key().0, pb));
            if e.kind() == EdgeKind::Undirected && pa != pb {
                adj[pb].push((r.key().0, pa));
            }
            slot_ends.insert(r.key().0, (pa, pb, e.is_directed()));
            start.get_or_insert(pa);
        }
        let start = start?;

        let mut used = bitvec![0; self.edge_slots()];
        let mut cursor = vec![0usize; n];
        let mut stack: Vec<(usize, Option<usize>)> = vec![(start, None)];
        let mut tour: Vec<usize> = Vec::with_capacity(self.num_edges());

        while let Some(&(v, entered_by)) = stack.last() {
            let mut advanced = false;
            while cursor[v] < adj[v].len() {
                let (slot, to) = adj[v][cursor[v]];
                cursor[v] += 1;
                if used[slot] {
                    continue;
                }
                used.set(slot, true);
                stack.push((to, Some(slot)));
                advanced = true;
                break;
            }
            if !advanced {
                stack.pop();
                // Emitting on retreat splices each sub-tour in front of the
                // edge that led into it; reversing yields the cycle.
                if let Some(slot) = entered_by {
                    tour.push(slot);
                }
            }
        }

        if tour.len() != self.num_edges() {
            return None;
        }
        tour.reverse();

        // The tour must replay as a closed walk from the start vertex.
        let mut cur = start;
        for slot in &tour {
            let &(pa, pb, directed) = slot_ends.get(slot)?;
            cur = if pa == cur {
                pb
            } else if !directed && pb == cur {
                pa
            } else {
                return None;
            };
        }
        if cur != start {
            return None;
        }

        let tag = self.tag();
        Some(
            tour.into_iter()
                .map(|slot| EdgeRef::new(tag, EdgeKey(slot)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use ahash::AHashSet;

    use crate::graph::edge::EdgeRef;
    use crate::graph::vertex::VertexId;
    use crate::graph::Graph;

    /// Replays the tour as a walk, checking direction and closure.
    fn is_closed_walk(g: &Graph, tour: &[EdgeRef]) -> bool {
        let first = match tour.first() {
            Some(r) => g.edge(*r).unwrap(),
            None => return false,
        };
        let (a, b) = first.endpoint_ids();
        [a.clone(), b.clone()]
            .iter()
            .any(|start| replay(g, tour, start))
    }

    fn replay(g: &Graph, tour: &[EdgeRef], start: &VertexId) -> bool {
        let mut cur = start.clone();
        for r in tour {
            let e = g.edge(*r).unwrap();
            let (from, to) = e.endpoint_ids();
            cur = if e.is_directed() {
                if *from != cur {
                    return false;
                }
                to.clone()
            } else if *from == cur {
                to.clone()
            } else if *to == cur {
                from.clone()
            } else {
                return false;
            };
        }
        cur == *start
    }

    fn assert_valid_cycle(g: &Graph) {
        let tour = g.eulerian_cycle().expect("cycle should exist");
        assert_eq!(tour.len(), g.num_edges());
        let distinct: AHashSet<_> = tour.iter().map(|r| r.key()).collect();
        assert_eq!(distinct.len(), tour.len());
        assert!(is_closed_walk(g, &tour));
    }

    #[test]
    fn triangle_has_cycle() {
        let mut g = Graph::new();
        let vs = g.add_vertices(3);
        g.add_edge(&vs[0], &vs[1]).unwrap();
        g.add_edge(&vs[1], &vs[2]).unwrap();
        g.add_edge(&vs[2], &vs[0]).unwrap();
        assert!(g.has_eulerian_cycle());
        assert_valid_cycle(&g);
    }

    #[test]
    fn path_has_no_cycle() {
        let mut g = Graph::new();
        let vs = g.add_vertices(3);
        g.add_edge(&vs[0], &vs[1]).unwrap();
        g.add_edge(&vs[1], &vs[2]).unwrap();
        // The endpoints have odd degree.
        assert!(!g.has_eulerian_cycle());
        assert!(g.eulerian_cycle().is_none());
    }

    #[test]
    fn empty_and_edgeless_graphs() {
        let g = Graph::new();
        assert!(!g.has_eulerian_cycle());

        let mut g = Graph::new();
        g.add_vertices(2);
        assert!(!g.has_eulerian_cycle());
        assert!(g.eulerian_cycle().is_none());
    }

    #[test]
    fn directed_triangle() {
        let mut g = Graph::new();
        let vs = g.add_vertices(3);
        g.add_arc(&vs[0], &vs[1]).unwrap();
        g.add_arc(&vs[1], &vs[2]).unwrap();
        g.add_arc(&vs[2], &vs[0]).unwrap();
        assert!(g.has_eulerian_cycle());
        assert_valid_cycle(&g);
    }

    #[test]
    fn directed_unbalanced() {
        let mut g = Graph::new();
        let vs = g.add_vertices(3);
        g.add_arc(&vs[0], &vs[1]).unwrap();
        g.add_arc(&vs[0], &vs[2]).unwrap();
        g.add_arc(&vs[1], &vs[2]).unwrap();
        assert!(!g.has_eulerian_cycle());
    }

    #[test]
    fn figure_eight() {
        // Two triangles sharing one vertex; the shared vertex has degree 4.
        let mut g = Graph::new();
        let vs = g.add_vertices(5);
        g.add_edge(&vs[0], &vs[1]).unwrap();
        g.add_edge(&vs[1], &vs[2]).unwrap();
        g.add_edge(&vs[2], &vs[0]).unwrap();
        g.add_edge(&vs[0], &vs[3]).unwrap();
        g.add_edge(&vs[3], &vs[4]).unwrap();
        g.add_edge(&vs[4], &vs[0]).unwrap();
        assert!(g.has_eulerian_cycle());
        assert_valid_cycle(&g);
    }

    #[test]
    fn single_loop_is_a_cycle() {
        let mut g = Graph::new();
        let v = g.add_vertex();
        g.add_edge(&v, &v).unwrap();
        assert!(g.has_eulerian_cycle());
        assert_valid_cycle(&g);
    }

    #[test]
    fn disconnected_edges_fail() {
        let mut g = Graph::new();
        let vs = g.add_vertices(4);
        g.add_edge(&vs[0], &vs[0]).unwrap();
        g.add_edge(&vs[2], &vs[3]).unwrap();
        g.add_edge(&vs[3], &vs[2]).unwrap();
        assert!(!g.has_eulerian_cycle());
    }

    #[test]
    fn isolated_vertices_are_ignored() {
        let mut g = Graph::new();
        let vs = g.add_vertices(3);
        g.add_edge(&vs[0], &vs[1]).unwrap();
        g.add_edge(&vs[1], &vs[0]).unwrap();
        // vs[2] is isolated; the edge span is still a single component.
        assert!(g.has_eulerian_cycle());
        assert_valid_cycle(&g);
        assert_eq!(g.num_components(), 2);
    }

    #[test]
    fn mixed_alternating_edges_have_no_cycle() {
        // Balanced and connected, yet every walk over the three edges
        // alternates between the two vertices and ends opposite its start.
        let mut g = Graph::new();
        let a = g.vertex_or_add("a");
        let b = g.vertex_or_add("b");
        g.add_arc(&a, &b).unwrap();
        g.add_arc(&b, &a).unwrap();
        g.add_edge(&a, &b).unwrap();
        assert!(g.is_balanced());
        assert!(g.is_connected());
        assert!(!g.has_eulerian_cycle());
        assert!(g.eulerian_cycle().is_none());
    }

    #[test]
    fn mixed_directed_and_undirected() {
        let mut g = Graph::new();
        let a = g.vertex_or_add("a");
        let b = g.vertex_or_add("b");
        g.add_arc(&a, &b).unwrap();
        g.add_arc(&b, &a).unwrap();
        g.add_edge(&a, &a).unwrap();
        assert!(g.has_eulerian_cycle());
        assert_valid_cycle(&g);
    }

    #[test]
    fn parallel_edges() {
        let mut g = Graph::new();
        let vs = g.add_vertices(2);
        g.add_edge(&vs[0], &vs[1]).unwrap();
        g.add_edge(&vs[0], &vs[1]).unwrap();
        assert!(g.has_eulerian_cycle());
        assert_valid_cycle(&g);
    }
}
