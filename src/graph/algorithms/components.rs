use ahash::AHashMap;
use indexmap::IndexMap;

use crate::graph::vertex::VertexId;
use crate::graph::Graph;
use crate::union_find::UnionFind;

/// Partition of a graph's vertices into connected components, every edge
/// treated as undirected.
///
/// Components are numbered densely in order of their first vertex by
/// insertion order; the empty graph has zero components.
#[derive(Debug, Clone)]
pub struct Components {
    membership: IndexMap<VertexId, usize>,
    count: usize,
}

impl Components {
    pub fn count(&self) -> usize {
        self.count
    }

    /// Exactly one component covering all vertices. False for the empty
    /// graph, which has zero components.
    pub fn is_single(&self) -> bool {
        self.count == 1
    }

    /// The component number of a vertex, if it was part of the analyzed
    /// graph.
    pub fn component_of(&self, id: &VertexId) -> Option<usize> {
        self.membership.get(id).copied()
    }

    /// Component membership lists: members keep insertion order, groups are
    /// ordered by their first member.
    pub fn groups(&self) -> Vec<Vec<&VertexId>> {
        let mut groups: Vec<Vec<&VertexId>> = vec![Vec::new(); self.count];
        for (id, &label) in &self.membership {
            groups[label].push(id);
        }
        groups
    }
}

impl Graph {
    /// Partitions the vertices into connected components, ignoring edge
    /// direction.
    pub fn components(&self) -> Components {
        let mut uf = UnionFind::new(self.num_vertices());
        for (_, e) in self.edges() {
            let (a, b) = e.endpoint_ids();
            if let (Some(pa), Some(pb)) = (self.position_of(a), self.position_of(b)) {
                uf.union(pa.into(), pb.into());
            }
        }

        let mut labels: AHashMap<usize, usize> = AHashMap::new();
        let mut membership = IndexMap::with_capacity(self.num_vertices());
        for (pos, id) in self.vertex_ids().enumerate() {
            let root = uf.find(pos.into()).0;
            let next = labels.len();
            let label = *labels.entry(root).or_insert(next);
            membership.insert(id.clone(), label);
        }
        Components {
            count: labels.len(),
            membership,
        }
    }

    pub fn num_components(&self) -> usize {
        self.components().count()
    }

    /// Whether the graph forms a single connected component. False for the
    /// empty graph.
    pub fn is_connected(&self) -> bool {
        self.components().is_single()
    }
}

#[cfg(test)]
mod test {
    use crate::graph::Graph;

    #[test]
    fn two_components_then_bridged() {
        let mut g = Graph::new();
        let v1 = g.vertex_or_add(1);
        let v2 = g.vertex_or_add(2);
        let v3 = g.vertex_or_add(3);
        let v4 = g.vertex_or_add(4);
        g.add_edge(&v1, &v2).unwrap();
        g.add_edge(&v3, &v4).unwrap();

        let comps = g.components();
        assert_eq!(comps.count(), 2);
        assert!(!comps.is_single());
        assert!(!g.is_connected());
        assert_eq!(comps.component_of(v1.id()), comps.component_of(v2.id()));
        assert_ne!(comps.component_of(v2.id()), comps.component_of(v3.id()));

        g.add_edge(&v2, &v3).unwrap();
        assert_eq!(g.num_components(), 1);
        assert!(g.is_connected());
    }

    #[test]
    fn empty_graph_has_zero_components() {
        let g = Graph::new();
        let comps = g.components();
        assert_eq!(comps.count(), 0);
        assert!(!comps.is_single());
        assert!(!g.is_connected());
        assert!(comps.groups().is_empty());
    }

    #[test]
    fn direction_is_ignored() {
        let mut g = Graph::new();
        let a = g.vertex_or_add("a");
        let b = g.vertex_or_add("b");
        let c = g.vertex_or_add("c");
        g.add_arc(&a, &b).unwrap();
        g.add_arc(&c, &b).unwrap();
        assert_eq!(g.num_components(), 1);
    }

    #[test]
    fn isolated_vertices_are_own_components() {
        let mut g = Graph::new();
        g.add_vertices(3);
        assert_eq!(g.num_components(), 3);

        let v = g.vertex_or_add(10);
        g.add_weighted_edge(&v, &v, 2.0).unwrap();
        // A loop connects nothing new.
        assert_eq!(g.num_components(), 4);
    }

    #[test]
    fn groups_follow_insertion_order() {
        let mut g = Graph::new();
        let a = g.vertex_or_add("a");
        let b = g.vertex_or_add("b");
        let c = g.vertex_or_add("c");
        let d = g.vertex_or_add("d");
        g.add_edge(&a, &c).unwrap();
        g.add_edge(&b, &d).unwrap();

        let comps = g.components();
        let groups = comps.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec![a.id(), c.id()]);
        assert_eq!(groups[1], vec![b.id(), d.id()]);
    }

    #[test]
    fn removal_splits_components() {
        let mut g = Graph::new();
        let refs = g.add_vertices(3);
        let e = g.add_edge(&refs[0], &refs[1]).unwrap();
        g.add_edge(&refs[1], &refs[2]).unwrap();
        assert_eq!(g.num_components(), 1);

        g.remove_edge(e).unwrap();
        assert_eq!(g.num_components(), 2);
    }
}
