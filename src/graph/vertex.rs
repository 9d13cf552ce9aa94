use std::fmt;
use std::str::FromStr;

use super::edge::EdgeKey;
use super::{GraphError, GraphTag};

/// Identifier of a vertex, unique within its graph.
///
/// Integer and name ids coexist in one graph; only integer ids participate
/// in the auto-assignment counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexId {
    Int(i64),
    Name(String),
}

impl From<i64> for VertexId {
    fn from(i: i64) -> Self {
        VertexId::Int(i)
    }
}

impl From<i32> for VertexId {
    fn from(i: i32) -> Self {
        VertexId::Int(i64::from(i))
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        VertexId::Name(s.to_owned())
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        VertexId::Name(s)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexId::Int(i) => write!(f, "{i}"),
            VertexId::Name(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for VertexId {
    type Err = GraphError;

    /// An integer literal parses as [`VertexId::Int`], anything else as
    /// [`VertexId::Name`]. The empty string is not a valid id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(GraphError::InvalidId(s.to_owned()));
        }
        Ok(match s.parse::<i64>() {
            Ok(i) => VertexId::Int(i),
            Err(_) => VertexId::Name(s.to_owned()),
        })
    }
}

/// Handle to a vertex of one specific [`Graph`](super::Graph) instance.
///
/// The embedded tag proves which graph the vertex was created in; edge
/// creation rejects handles stamped by another graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexRef {
    tag: GraphTag,
    id: VertexId,
}

impl VertexRef {
    pub(crate) fn new(tag: GraphTag, id: VertexId) -> Self {
        VertexRef { tag, id }
    }

    pub(crate) fn tag(&self) -> GraphTag {
        self.tag
    }

    pub fn id(&self) -> &VertexId {
        &self.id
    }
}

impl fmt::Display for VertexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A vertex: its id plus the keys of its incident edges.
///
/// The keys are non-owning back-references into the graph's edge arena; a
/// loop's key is stored once and weighted by the degree computations.
#[derive(Debug)]
pub struct Vertex {
    id: VertexId,
    incident: Vec<EdgeKey>,
}

impl Vertex {
    pub(crate) fn new(id: VertexId) -> Self {
        Vertex {
            id,
            incident: Vec::new(),
        }
    }

    pub fn id(&self) -> &VertexId {
        &self.id
    }

    /// Keys of the incident edges, in the order they were attached.
    pub fn incident(&self) -> &[EdgeKey] {
        &self.incident
    }

    pub(crate) fn register(&mut self, key: EdgeKey) {
        self.incident.push(key);
    }

    pub(crate) fn deregister(&mut self, key: EdgeKey) {
        self.incident.retain(|k| *k != key);
    }
}
