//! # Whole-graph structural analyses
//!
//! Stateless analyzers over a [`Graph`](super::Graph): each invocation is a
//! single read-only pass that returns a result value and never mutates the
//! graph. Every edge's direction is honored where it matters (Eulerian
//! traversal) and ignored where it does not (component membership).
//!
//! ## Available analyses
//!
//! - [`components`]: connected components via union-find, ignoring edge
//!   direction.
//! - [`eulerian`]: Eulerian-cycle existence and construction (Hierholzer).

pub mod components;
pub mod eulerian;
