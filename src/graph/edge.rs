use std::fmt;

use derive_more::{From, Into};

use super::vertex::VertexId;
use super::GraphTag;

/// Index of an edge slot in the graph's arena. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, From, Into)]
pub struct EdgeKey(pub usize);

/// Handle to an edge of one specific [`Graph`](super::Graph) instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    tag: GraphTag,
    key: EdgeKey,
}

impl EdgeRef {
    pub(crate) fn new(tag: GraphTag, key: EdgeKey) -> Self {
        EdgeRef { tag, key }
    }

    pub(crate) fn tag(&self) -> GraphTag {
        self.tag
    }

    pub fn key(&self) -> EdgeKey {
        self.key
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Undirected,
    Directed,
}

/// An edge between two vertex slots.
///
/// The endpoint ids are recorded at creation and never looked up live; the
/// clone operations rely on this to re-resolve endpoints in a new graph.
/// `weight` of `None` means unweighted; `Some(0.0)` is weighted with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    kind: EdgeKind,
    from: VertexId,
    to: VertexId,
    weight: Option<f64>,
}

impl Edge {
    pub(crate) fn new(kind: EdgeKind, from: VertexId, to: VertexId, weight: Option<f64>) -> Self {
        Edge {
            kind,
            from,
            to,
            weight,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn is_directed(&self) -> bool {
        self.kind == EdgeKind::Directed
    }

    /// Both endpoint ids are the same vertex.
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }

    /// The ordered endpoint pair as recorded at creation: `(from, to)` for a
    /// directed edge, `(a, b)` treated symmetrically for an undirected one.
    pub fn endpoint_ids(&self) -> (&VertexId, &VertexId) {
        (&self.from, &self.to)
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: Option<f64>) {
        self.weight = weight;
    }

    /// Whether this edge runs from `from` to `to`, respecting direction.
    pub(crate) fn connects(&self, from: &VertexId, to: &VertexId) -> bool {
        match self.kind {
            EdgeKind::Directed => self.from == *from && self.to == *to,
            EdgeKind::Undirected => {
                (self.from == *from && self.to == *to) || (self.from == *to && self.to == *from)
            }
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EdgeKind::Undirected => write!(f, "{} -- {}", self.from, self.to)?,
            EdgeKind::Directed => write!(f, "{} -> {}", self.from, self.to)?,
        }
        if let Some(w) = self.weight {
            write!(f, " [{w}]")?;
        }
        Ok(())
    }
}
