//! Arena-based directed graph with a cycle-safe depth-first cursor.

use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::cursor::Cursor;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::optional::OptionalBox;

/// Handle of a node inside its [`Graph`].
pub type NodeId = Index;

/// Graph node in the arena.
#[derive(Debug)]
pub struct GraphNode<T> {
    pub data: T,
    /// Outgoing edges in insertion order
    pub edges: Vec<NodeId>,
    /// Nodes with an edge pointing here (bookkeeping only, never traversed)
    pub parents: Vec<NodeId>,
}

/// Directed graph; cycles are allowed.
#[derive(Debug)]
pub struct Graph<T> {
    arena: Arena<GraphNode<T>>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn add_node(&mut self, data: T) -> NodeId {
        self.arena.insert(GraphNode {
            data,
            edges: Vec::new(),
            parents: Vec::new(),
        })
    }

    pub fn get_node(&self, id: NodeId) -> Option<&GraphNode<T>> {
        self.arena.get(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Add an edge `from -> to`. Both ends must exist.
    #[instrument(level = "trace", skip(self))]
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> DomainResult<()> {
        if !self.arena.contains(to) {
            return Err(DomainError::structural(format!(
                "edge target {to:?} does not exist"
            )));
        }
        let source = self.arena.get_mut(from).ok_or_else(|| {
            DomainError::structural(format!("edge source {from:?} does not exist"))
        })?;
        source.edges.push(to);
        if let Some(target) = self.arena.get_mut(to) {
            target.parents.push(from);
        }
        Ok(())
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> OptionalBox<T> {
        let Some(node) = self.arena.remove(id) else {
            return OptionalBox::empty();
        };
        for (_, other) in self.arena.iter_mut() {
            other.edges.retain(|&e| e != id);
            other.parents.retain(|&p| p != id);
        }
        OptionalBox::of(node.data)
    }

    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(|node| node.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Depth-first cursor from `start`, visiting each reachable node once.
    ///
    /// Fails with a structural violation if `start` is not in the graph.
    pub fn cursor_from(&self, start: NodeId) -> DomainResult<GraphCursor<'_, T>> {
        if !self.arena.contains(start) {
            return Err(DomainError::structural(format!(
                "start node {start:?} does not exist"
            )));
        }
        Ok(GraphCursor::new(self, start))
    }
}

impl<T: fmt::Display> fmt::Display for Graph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, node) in self.arena.iter() {
            let targets: Vec<String> = node
                .edges
                .iter()
                .filter_map(|&e| self.arena.get(e))
                .map(|n| n.data.to_string())
                .collect();
            writeln!(f, "{} -> [{}]", node.data, targets.join(", "))?;
        }
        Ok(())
    }
}

/// Stack-based depth-first cursor with a visited set.
///
/// Neighbors are pushed in insertion order, so among siblings the last
/// inserted edge is visited first.
#[derive(Debug)]
pub struct GraphCursor<'a, T> {
    graph: &'a Graph<T>,
    stack: Vec<NodeId>,
    visited: HashSet<NodeId>,
}

impl<'a, T> GraphCursor<'a, T> {
    #[instrument(level = "trace", skip(graph))]
    fn new(graph: &'a Graph<T>, start: NodeId) -> Self {
        Self {
            graph,
            stack: vec![start],
            visited: HashSet::new(),
        }
    }

    // keeps the top of the stack unvisited so has_next stays exact
    fn settle(&mut self) {
        while let Some(top) = self.stack.last() {
            if !self.visited.contains(top) {
                break;
            }
            self.stack.pop();
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

impl<'a, T> Cursor for GraphCursor<'a, T> {
    type Item = &'a T;

    fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    fn next_value(&mut self) -> OptionalBox<&'a T> {
        let Some(id) = self.stack.pop() else {
            return OptionalBox::empty();
        };
        self.visited.insert(id);
        let graph = self.graph;
        let Some(node) = graph.get_node(id) else {
            self.settle();
            return OptionalBox::empty();
        };
        self.stack.extend(
            node.edges
                .iter()
                .copied()
                .filter(|e| !self.visited.contains(e)),
        );
        self.settle();
        OptionalBox::of(&node.data)
    }
}

impl<'a, T> Iterator for GraphCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value().into_option()
    }
}
