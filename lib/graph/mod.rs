//! Implements a directed graph.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub trait Vertex: Clone {
    /// The index of this vertex.
    fn index(&self) -> usize;
}

pub trait Edge: Clone {
    /// The index of the head vertex.
    fn head(&self) -> usize;
    /// The index of the tail vertex.
    fn tail(&self) -> usize;
}

/// A directed graph.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Graph<V: Vertex, E: Edge> {
    vertices: BTreeMap<usize, V>,
    edges: BTreeMap<(usize, usize), E>,
    successors: BTreeMap<usize, BTreeSet<usize>>,
    predecessors: BTreeMap<usize, BTreeSet<usize>>,
}

impl<V, E> Graph<V, E>
where
    V: Vertex,
    E: Edge,
{
    pub fn new() -> Graph<V, E> {
        Graph {
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            successors: BTreeMap::new(),
            predecessors: BTreeMap::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the vertex with the given index exists in this graph
    pub fn has_vertex(&self, index: usize) -> bool {
        self.vertices.contains_key(&index)
    }

    /// Returns true if the edge with the given head and tail index exists in
    /// this graph
    pub fn has_edge(&self, head: usize, tail: usize) -> bool {
        self.edges.contains_key(&(head, tail))
    }

    /// Inserts a vertex into the graph.
    /// # Errors
    /// Error if the vertex already exists by index.
    pub fn insert_vertex(&mut self, v: V) -> Result<(), Error> {
        if self.vertices.contains_key(&v.index()) {
            return Err(Error::GraphVertexExists(v.index()));
        }
        self.successors.insert(v.index(), BTreeSet::new());
        self.predecessors.insert(v.index(), BTreeSet::new());
        self.vertices.insert(v.index(), v);
        Ok(())
    }

    /// Inserts an edge into the graph.
    /// # Errors
    /// Error if either vertex does not exist, or the edge already exists.
    pub fn insert_edge(&mut self, edge: E) -> Result<(), Error> {
        if self.edges.contains_key(&(edge.head(), edge.tail())) {
            return Err(Error::GraphEdgeExists(edge.head(), edge.tail()));
        }
        if !self.vertices.contains_key(&edge.head()) {
            return Err(Error::GraphVertexNotFound(edge.head()));
        }
        if !self.vertices.contains_key(&edge.tail()) {
            return Err(Error::GraphVertexNotFound(edge.tail()));
        }

        self.successors
            .get_mut(&edge.head())
            .unwrap()
            .insert(edge.tail());
        self.predecessors
            .get_mut(&edge.tail())
            .unwrap()
            .insert(edge.head());
        self.edges.insert((edge.head(), edge.tail()), edge);

        Ok(())
    }

    /// Fetches a vertex from the graph by index.
    pub fn vertex(&self, index: usize) -> Result<&V, Error> {
        self.vertices
            .get(&index)
            .ok_or(Error::GraphVertexNotFound(index))
    }

    /// Fetches a mutable reference to a vertex by index.
    pub fn vertex_mut(&mut self, index: usize) -> Result<&mut V, Error> {
        self.vertices
            .get_mut(&index)
            .ok_or(Error::GraphVertexNotFound(index))
    }

    /// Get a reference to every vertex in this graph.
    pub fn vertices(&self) -> Vec<&V> {
        self.vertices.values().collect()
    }

    /// Get a mutable reference to every vertex in this graph.
    pub fn vertices_mut(&mut self) -> Vec<&mut V> {
        self.vertices.values_mut().collect()
    }

    /// Fetches an edge from the graph by the head and tail vertex indices.
    pub fn edge(&self, head: usize, tail: usize) -> Result<&E, Error> {
        self.edges
            .get(&(head, tail))
            .ok_or(Error::GraphEdgeNotFound(head, tail))
    }

    /// Get a reference to every edge in this graph.
    pub fn edges(&self) -> Vec<&E> {
        self.edges.values().collect()
    }

    /// Get every incoming edge to a vertex.
    pub fn edges_in(&self, index: usize) -> Result<Vec<&E>, Error> {
        Ok(self
            .predecessor_indices(index)?
            .into_iter()
            .map(|predecessor| &self.edges[&(predecessor, index)])
            .collect())
    }

    /// Get every outgoing edge from a vertex.
    pub fn edges_out(&self, index: usize) -> Result<Vec<&E>, Error> {
        Ok(self
            .successor_indices(index)?
            .into_iter()
            .map(|successor| &self.edges[&(index, successor)])
            .collect())
    }

    /// Returns all immediate successors of a vertex from the graph.
    pub fn successors(&self, index: usize) -> Result<Vec<&V>, Error> {
        Ok(self
            .successor_indices(index)?
            .into_iter()
            .map(|successor| &self.vertices[&successor])
            .collect())
    }

    /// Returns all immediate predecessors of a vertex from the graph.
    pub fn predecessors(&self, index: usize) -> Result<Vec<&V>, Error> {
        Ok(self
            .predecessor_indices(index)?
            .into_iter()
            .map(|predecessor| &self.vertices[&predecessor])
            .collect())
    }

    /// Returns the indices of all immediate successors of a vertex from the
    /// graph.
    pub fn successor_indices(&self, index: usize) -> Result<Vec<usize>, Error> {
        if !self.vertices.contains_key(&index) {
            return Err(Error::GraphVertexNotFound(index));
        }
        Ok(self.successors[&index].iter().cloned().collect())
    }

    /// Returns the indices of all immediate predecessors of a vertex from the
    /// graph.
    pub fn predecessor_indices(&self, index: usize) -> Result<Vec<usize>, Error> {
        if !self.vertices.contains_key(&index) {
            return Err(Error::GraphVertexNotFound(index));
        }
        Ok(self.predecessors[&index].iter().cloned().collect())
    }
}

impl<V: Vertex, E: Edge> Default for Graph<V, E> {
    fn default() -> Graph<V, E> {
        Graph::new()
    }
}
