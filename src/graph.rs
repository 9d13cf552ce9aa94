//! The multigraph model.
//!
//! A [`Graph`] owns an insertion-ordered set of vertices and an
//! identity-addressed arena of edges. Vertices and edges never hold
//! references to each other or to the graph; they refer to one another
//! through stable keys, so removal is an explicit key invalidation and no
//! ownership cycle exists.
//!
//! Handles returned by the mutating operations ([`VertexRef`], [`EdgeRef`])
//! are stamped with a process-unique graph tag. Feeding a handle to a graph
//! it does not belong to is reported as an error instead of silently mixing
//! two graphs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashSet;
use indexmap::IndexMap;
use itertools::Itertools;
use thiserror::Error;

use self::edge::{Edge, EdgeKey, EdgeKind, EdgeRef};
use self::vertex::{Vertex, VertexId, VertexRef};

pub mod algorithms;
pub mod edge;
pub mod vertex;

static NEXT_TAG: AtomicU64 = AtomicU64::new(0);

/// Process-unique stamp identifying one [`Graph`] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphTag(u64);

impl GraphTag {
    pub(crate) fn fresh() -> Self {
        GraphTag(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// An in-memory multigraph with optional edge weights.
///
/// Edges may be directed or undirected per edge, loops and parallel edges
/// are allowed. Iteration order over vertices and edges is insertion order.
///
/// `Graph` deliberately does not implement [`Clone`]; structural copies go
/// through [`Graph::clone_vertices_only`], [`Graph::clone_with_edges`] or
/// [`Graph::clone_full`].
#[derive(Debug)]
pub struct Graph {
    tag: GraphTag,
    vertices: IndexMap<VertexId, Vertex>,
    /// Identity-addressed arena. A removed edge leaves a tombstone so keys
    /// are never reused and stale handles stay detectable.
    edges: Vec<Option<Edge>>,
    live_edges: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Graph {
            tag: GraphTag::fresh(),
            vertices: IndexMap::new(),
            edges: Vec::new(),
            live_edges: 0,
        }
    }

    pub(crate) fn tag(&self) -> GraphTag {
        self.tag
    }

    // ---- vertex creation ----

    /// Adds a vertex with an automatically assigned integer id:
    /// `max(existing integer ids) + 1`, or `0` when no integer id exists.
    /// Name ids do not participate in the counter.
    pub fn add_vertex(&mut self) -> VertexRef {
        let id = VertexId::Int(self.next_auto_id());
        self.vertices.insert(id.clone(), Vertex::new(id.clone()));
        VertexRef::new(self.tag, id)
    }

    /// Adds `n` vertices using the auto-id rule, returning their handles in
    /// creation order.
    pub fn add_vertices(&mut self, n: usize) -> Vec<VertexRef> {
        (0..n).map(|_| self.add_vertex()).collect()
    }

    /// Adds a vertex under the given id.
    pub fn add_vertex_with_id(&mut self, id: impl Into<VertexId>) -> Result<VertexRef, GraphError> {
        let id = id.into();
        if self.vertices.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        self.vertices.insert(id.clone(), Vertex::new(id.clone()));
        Ok(VertexRef::new(self.tag, id))
    }

    /// Returns a handle to the vertex with the given id, creating it first
    /// if it does not exist yet.
    pub fn vertex_or_add(&mut self, id: impl Into<VertexId>) -> VertexRef {
        let id = id.into();
        if !self.vertices.contains_key(&id) {
            self.vertices.insert(id.clone(), Vertex::new(id.clone()));
        }
        VertexRef::new(self.tag, id)
    }

    fn next_auto_id(&self) -> i64 {
        self.vertices
            .keys()
            .filter_map(|id| match id {
                VertexId::Int(i) => Some(*i),
                VertexId::Name(_) => None,
            })
            .max()
            .map_or(0, |m| m + 1)
    }

    // ---- edge creation ----

    /// Adds an undirected, unweighted edge between `a` and `b`.
    pub fn add_edge(&mut self, a: &VertexRef, b: &VertexRef) -> Result<EdgeRef, GraphError> {
        self.insert_edge(EdgeKind::Undirected, a, b, None)
    }

    /// Adds a directed, unweighted edge from `from` to `to`.
    pub fn add_arc(&mut self, from: &VertexRef, to: &VertexRef) -> Result<EdgeRef, GraphError> {
        self.insert_edge(EdgeKind::Directed, from, to, None)
    }

    /// Adds an undirected edge carrying a weight. A weight of `0.0` is a
    /// weighted state, distinct from an unweighted edge.
    pub fn add_weighted_edge(
        &mut self,
        a: &VertexRef,
        b: &VertexRef,
        weight: f64,
    ) -> Result<EdgeRef, GraphError> {
        self.insert_edge(EdgeKind::Undirected, a, b, Some(weight))
    }

    /// Adds a directed edge carrying a weight.
    pub fn add_weighted_arc(
        &mut self,
        from: &VertexRef,
        to: &VertexRef,
        weight: f64,
    ) -> Result<EdgeRef, GraphError> {
        self.insert_edge(EdgeKind::Directed, from, to, Some(weight))
    }

    fn insert_edge(
        &mut self,
        kind: EdgeKind,
        from: &VertexRef,
        to: &VertexRef,
        weight: Option<f64>,
    ) -> Result<EdgeRef, GraphError> {
        if from.tag() != self.tag || to.tag() != self.tag {
            return Err(GraphError::CrossGraph);
        }
        self.insert_edge_by_ids(kind, from.id().clone(), to.id().clone(), weight)
    }

    /// Registers a new edge with the arena and both endpoint vertices in one
    /// step. Endpoints are resolved by id, which is what the clone
    /// operations need.
    fn insert_edge_by_ids(
        &mut self,
        kind: EdgeKind,
        from: VertexId,
        to: VertexId,
        weight: Option<f64>,
    ) -> Result<EdgeRef, GraphError> {
        if !self.vertices.contains_key(&from) {
            return Err(GraphError::VertexNotFound(from));
        }
        if !self.vertices.contains_key(&to) {
            return Err(GraphError::VertexNotFound(to));
        }
        let key = EdgeKey(self.edges.len());
        if let Some(v) = self.vertices.get_mut(&from) {
            v.register(key);
        }
        if to != from {
            if let Some(v) = self.vertices.get_mut(&to) {
                v.register(key);
            }
        }
        self.edges.push(Some(Edge::new(kind, from, to, weight)));
        self.live_edges += 1;
        Ok(EdgeRef::new(self.tag, key))
    }

    // ---- removal ----

    /// Removes an edge, deregistering it from both endpoint vertices and
    /// from the arena. The handle identifies the edge, not its value:
    /// parallel edges with equal endpoints and weight are distinct.
    pub fn remove_edge(&mut self, e: EdgeRef) -> Result<Edge, GraphError> {
        if e.tag() != self.tag {
            return Err(GraphError::EdgeNotFound);
        }
        let key = e.key();
        let edge = self
            .edges
            .get_mut(key.0)
            .and_then(Option::take)
            .ok_or(GraphError::EdgeNotFound)?;
        self.live_edges -= 1;
        let (from, to) = edge.endpoint_ids();
        if let Some(v) = self.vertices.get_mut(from) {
            v.deregister(key);
        }
        if to != from {
            if let Some(v) = self.vertices.get_mut(to) {
                v.deregister(key);
            }
        }
        Ok(edge)
    }

    /// Removes a vertex, cascading over its incident edges first. Returns
    /// the removed edges.
    pub fn remove_vertex(&mut self, id: &VertexId) -> Result<Vec<Edge>, GraphError> {
        let vertex = self
            .vertices
            .get(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.clone()))?;
        let keys = vertex.incident().to_vec();
        let mut removed = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(edge) = self.edges.get_mut(key.0).and_then(Option::take) {
                self.live_edges -= 1;
                let (from, to) = edge.endpoint_ids();
                let other = if from == id { to } else { from };
                if other != id {
                    if let Some(v) = self.vertices.get_mut(other) {
                        v.deregister(key);
                    }
                }
                removed.push(edge);
            }
        }
        self.vertices.shift_remove(id);
        Ok(removed)
    }

    // ---- lookup ----

    /// Looks up a vertex by id.
    pub fn vertex(&self, id: &VertexId) -> Result<&Vertex, GraphError> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::VertexNotFound(id.clone()))
    }

    /// Returns a handle to the vertex with the given id.
    pub fn vertex_ref(&self, id: &VertexId) -> Result<VertexRef, GraphError> {
        self.vertex(id)?;
        Ok(VertexRef::new(self.tag, id.clone()))
    }

    /// Returns an arbitrary vertex: the first one by insertion order.
    pub fn any_vertex(&self) -> Result<VertexRef, GraphError> {
        let id = self.vertices.keys().next().ok_or(GraphError::EmptyGraph)?;
        Ok(VertexRef::new(self.tag, id.clone()))
    }

    /// Looks up an edge through its handle.
    pub fn edge(&self, e: EdgeRef) -> Result<&Edge, GraphError> {
        if e.tag() != self.tag {
            return Err(GraphError::EdgeNotFound);
        }
        self.edges
            .get(e.key().0)
            .and_then(|slot| slot.as_ref())
            .ok_or(GraphError::EdgeNotFound)
    }

    fn edge_mut(&mut self, e: EdgeRef) -> Result<&mut Edge, GraphError> {
        if e.tag() != self.tag {
            return Err(GraphError::EdgeNotFound);
        }
        self.edges
            .get_mut(e.key().0)
            .and_then(|slot| slot.as_mut())
            .ok_or(GraphError::EdgeNotFound)
    }

    /// Sets the weight of an edge.
    pub fn set_weight(&mut self, e: EdgeRef, weight: f64) -> Result<(), GraphError> {
        self.edge_mut(e)?.set_weight(Some(weight));
        Ok(())
    }

    /// Makes an edge unweighted again.
    pub fn clear_weight(&mut self, e: EdgeRef) -> Result<(), GraphError> {
        self.edge_mut(e)?.set_weight(None);
        Ok(())
    }

    // ---- iteration & counts ----

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices.keys()
    }

    /// Live edges in insertion order, with their handles.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeRef, &Edge)> {
        let tag = self.tag;
        self.edges
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.as_ref().map(|e| (EdgeRef::new(tag, EdgeKey(i)), e)))
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.live_edges
    }

    /// Position of a vertex in insertion order.
    pub(crate) fn position_of(&self, id: &VertexId) -> Option<usize> {
        self.vertices.get_index_of(id)
    }

    /// Arena length, counting tombstones. Edge keys are always below this.
    pub(crate) fn edge_slots(&self) -> usize {
        self.edges.len()
    }

    // ---- degrees ----

    /// Number of edge-endpoints incident to the vertex; a loop counts twice.
    pub fn degree(&self, id: &VertexId) -> Result<usize, GraphError> {
        Ok(self.vertex_degree(self.vertex(id)?))
    }

    /// Number of incident edges ending at the vertex. Undirected edges count
    /// toward both the in- and outdegree; a loop counts once toward each.
    pub fn in_degree(&self, id: &VertexId) -> Result<usize, GraphError> {
        Ok(self.vertex_in_out(self.vertex(id)?).0)
    }

    /// Number of incident edges starting from the vertex.
    pub fn out_degree(&self, id: &VertexId) -> Result<usize, GraphError> {
        Ok(self.vertex_in_out(self.vertex(id)?).1)
    }

    pub(crate) fn vertex_degree(&self, v: &Vertex) -> usize {
        v.incident()
            .iter()
            .filter_map(|k| self.edges[k.0].as_ref())
            .map(|e| if e.is_loop() { 2 } else { 1 })
            .sum()
    }

    pub(crate) fn vertex_in_out(&self, v: &Vertex) -> (usize, usize) {
        let mut indeg = 0;
        let mut outdeg = 0;
        for e in v.incident().iter().filter_map(|k| self.edges[k.0].as_ref()) {
            match e.kind() {
                EdgeKind::Undirected => {
                    indeg += 1;
                    outdeg += 1;
                }
                EdgeKind::Directed => {
                    let (from, to) = e.endpoint_ids();
                    if to == v.id() {
                        indeg += 1;
                    }
                    if from == v.id() {
                        outdeg += 1;
                    }
                }
            }
        }
        (indeg, outdeg)
    }

    /// The k-regular check: takes the indegree of an arbitrary vertex and
    /// verifies every vertex has that same indegree and matching outdegree.
    /// Returns `k` on success.
    pub fn regular_degree(&self) -> Result<usize, GraphError> {
        let first = self.vertices.values().next().ok_or(GraphError::EmptyGraph)?;
        let (expected, _) = self.vertex_in_out(first);
        for v in self.vertices.values() {
            let (indegree, outdegree) = self.vertex_in_out(v);
            if indegree != expected || indegree != outdegree {
                return Err(GraphError::NotRegular {
                    id: v.id().clone(),
                    indegree,
                    outdegree,
                    expected,
                });
            }
        }
        Ok(expected)
    }

    pub fn is_regular(&self) -> bool {
        self.regular_degree().is_ok()
    }

    /// The vertex minimizing (or, with `want_max`, maximizing) the key, in a
    /// single scan. Ties break toward the earlier vertex in insertion order.
    pub fn extreme_by<K: Ord, F: Fn(&Vertex) -> K>(
        &self,
        want_max: bool,
        key: F,
    ) -> Result<&Vertex, GraphError> {
        let mut best: Option<(&Vertex, K)> = None;
        for v in self.vertices.values() {
            let k = key(v);
            let replace = match &best {
                None => true,
                Some((_, bk)) => {
                    if want_max {
                        k > *bk
                    } else {
                        k < *bk
                    }
                }
            };
            if replace {
                best = Some((v, k));
            }
        }
        best.map(|(v, _)| v).ok_or(GraphError::EmptyGraph)
    }

    pub fn min_degree(&self) -> Result<usize, GraphError> {
        self.extreme_by(false, |v| self.vertex_degree(v))
            .map(|v| self.vertex_degree(v))
    }

    pub fn max_degree(&self) -> Result<usize, GraphError> {
        self.extreme_by(true, |v| self.vertex_degree(v))
            .map(|v| self.vertex_degree(v))
    }

    // ---- structure queries ----

    /// Whether an edge runs from `from` to `to`: a directed edge counts only
    /// in its stated direction, an undirected edge counts both ways.
    pub fn has_edge_between(&self, from: &VertexId, to: &VertexId) -> Result<bool, GraphError> {
        let v = self.vertex(from)?;
        self.vertex(to)?;
        Ok(v.incident()
            .iter()
            .filter_map(|k| self.edges[k.0].as_ref())
            .any(|e| e.connects(from, to)))
    }

    /// Distinct out-neighbors, in the order they are first encountered.
    pub fn neighbors(&self, id: &VertexId) -> Result<Vec<&VertexId>, GraphError> {
        let v = self.vertex(id)?;
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        for e in v.incident().iter().filter_map(|k| self.edges[k.0].as_ref()) {
            let (from, to) = e.endpoint_ids();
            let next = match e.kind() {
                EdgeKind::Directed => (from == v.id()).then_some(to),
                EdgeKind::Undirected => Some(if from == v.id() { to } else { from }),
            };
            if let Some(n) = next {
                if seen.insert(n) {
                    out.push(n);
                }
            }
        }
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_edgeless(&self) -> bool {
        self.live_edges == 0
    }

    /// Exactly one vertex and no edges.
    pub fn is_trivial(&self) -> bool {
        self.vertices.len() == 1 && self.live_edges == 0
    }

    /// Whether every unordered pair of distinct vertices is connected by at
    /// least one edge, in either direction. Loops do not contribute.
    pub fn is_complete(&self) -> bool {
        fn ordered<'a>(a: &'a VertexId, b: &'a VertexId) -> (&'a VertexId, &'a VertexId) {
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        }
        let mut pairs: AHashSet<(&VertexId, &VertexId)> = AHashSet::new();
        for (_, e) in self.edges() {
            if e.is_loop() {
                continue;
            }
            let (a, b) = e.endpoint_ids();
            pairs.insert(ordered(a, b));
        }
        self.vertices
            .keys()
            .tuple_combinations::<(_, _)>()
            .all(|(u, v)| pairs.contains(&ordered(u, v)))
    }

    /// Indegree equals outdegree at every vertex. Vacuously true for the
    /// empty graph and for any purely undirected graph.
    pub fn is_balanced(&self) -> bool {
        self.vertices.values().all(|v| {
            let (indeg, outdeg) = self.vertex_in_out(v);
            indeg == outdeg
        })
    }

    /// At least one edge is directed.
    pub fn is_directed(&self) -> bool {
        self.edges().any(|(_, e)| e.is_directed())
    }

    /// At least one edge carries a weight.
    pub fn is_weighted(&self) -> bool {
        self.edges().any(|(_, e)| e.weight().is_some())
    }

    /// Sum of all present edge weights; `0.0` when none are present.
    pub fn total_weight(&self) -> f64 {
        self.edges().filter_map(|(_, e)| e.weight()).sum()
    }

    pub fn has_loop(&self) -> bool {
        self.edges().any(|(_, e)| e.is_loop())
    }

    // ---- clones ----

    /// A new graph with the same vertex ids and no edges.
    pub fn clone_vertices_only(&self) -> Graph {
        let mut g = Graph::new();
        for id in self.vertices.keys() {
            g.vertices.insert(id.clone(), Vertex::new(id.clone()));
        }
        g
    }

    /// Clones the vertices, then recreates each given edge between the
    /// corresponding new vertices. Endpoints are resolved through the ids
    /// recorded at edge creation, so the edges may come from any graph whose
    /// endpoint ids all exist here; directedness and weight are preserved,
    /// identity is not.
    pub fn clone_with_edges<'a, I>(&self, edges: I) -> Result<Graph, GraphError>
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let mut g = self.clone_vertices_only();
        for e in edges {
            let (from, to) = e.endpoint_ids();
            g.insert_edge_by_ids(e.kind(), from.clone(), to.clone(), e.weight())?;
        }
        Ok(g)
    }

    /// A full structural clone: all vertices and all live edges.
    pub fn clone_full(&self) -> Graph {
        let mut g = self.clone_vertices_only();
        for (_, e) in self.edges() {
            let (from, to) = e.endpoint_ids();
            let inserted = g.insert_edge_by_ids(e.kind(), from.clone(), to.clone(), e.weight());
            debug_assert!(inserted.is_ok(), "endpoints of live edges exist in the clone");
        }
        g
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "graph: {} vertices, {} edges",
            self.num_vertices(),
            self.num_edges()
        )?;
        for id in self.vertices.keys() {
            writeln!(f, "  {id}")?;
        }
        for (_, e) in self.edges() {
            writeln!(f, "  {e}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("invalid vertex id: {0:?}")]
    InvalidId(String),
    #[error("vertex id {0} is already in use")]
    DuplicateId(VertexId),
    #[error("no vertex with id {0}")]
    VertexNotFound(VertexId),
    #[error("edge is not part of this graph")]
    EdgeNotFound,
    #[error("operation requires a non-empty graph")]
    EmptyGraph,
    #[error("not regular: vertex {id} has indegree {indegree} and outdegree {outdegree}, expected {expected}")]
    NotRegular {
        id: VertexId,
        indegree: usize,
        outdegree: usize,
        expected: usize,
    },
    #[error("vertex belongs to a different graph")]
    CrossGraph,
}
