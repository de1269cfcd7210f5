//! Domain layer: values, trees, cursors and builders
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod component;
pub mod cursor;
pub mod error;
pub mod graph;
pub mod list;
pub mod maze;
pub mod optional;

pub use builder::TreeBuilder;
pub use component::{Component, CountPolicy, LeafCursor, PreOrderCursor, Removal};
pub use cursor::{Aggregate, ArrayCursor, BidirectionalCursor, Cursor};
pub use error::{DomainError, DomainResult};
pub use graph::{Graph, GraphCursor, GraphNode, NodeId};
pub use list::{LinkedList, ListCursor, ListNode};
pub use maze::{Door, Maze, MazeBuilder, Room, Side, Wall};
pub use optional::{OptionalBox, Truthy};
