//! # Siskin
//!
//! Siskin is a Rust library for in-memory multigraphs. It provides a graph
//! model supporting directed and undirected edges, self-loops, parallel
//! edges and optional edge weights, together with structural analyses:
//! connected components and Eulerian cycles.
//!
//! This library is useful for scenarios where you need to build a graph
//! incrementally, query its structure (degrees, regularity, completeness),
//! and run classic whole-graph analyses over it.

pub mod graph;
pub mod union_find;
