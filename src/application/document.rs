//! Tree documents: TOML description of a `Component<i64>` tree.
//!
//! A table with a `children` key is a composite (its `value` is optional),
//! a table without it is a leaf and must carry a `value`:
//!
//! ```toml
//! [[children]]
//! value = 100
//!
//! [[children]]
//! children = []
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Component, DomainError, OptionalBox};

/// Serialized form of one tree node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeSpec>>,
}

impl NodeSpec {
    pub fn into_component(self) -> ApplicationResult<Component<i64>> {
        match self.children {
            None => {
                let value = self.value.ok_or_else(|| {
                    DomainError::structural("leaf node without a value")
                })?;
                Ok(Component::leaf(value))
            }
            Some(children) => {
                let mut node = Component::Composite {
                    value: OptionalBox::from(self.value),
                    children: Vec::with_capacity(children.len()),
                };
                for child in children {
                    node.add_child(child.into_component()?)?;
                }
                Ok(node)
            }
        }
    }

    pub fn from_component(component: &Component<i64>) -> Self {
        match component {
            Component::Leaf { value } => Self {
                value: Some(*value),
                children: None,
            },
            Component::Composite { value, children } => Self {
                value: value.as_ref().cloned().into_option(),
                children: Some(children.iter().map(Self::from_component).collect()),
            },
        }
    }
}

/// Parsing and rendering of tree documents.
pub struct TreeDocument;

impl TreeDocument {
    #[instrument(level = "debug", skip(content), fields(bytes = content.len()))]
    pub fn parse(content: &str) -> ApplicationResult<Component<i64>> {
        let spec: NodeSpec = toml::from_str(content).map_err(|e| ApplicationError::Document {
            message: e.to_string(),
        })?;
        // the document itself is the root table, so it is always a composite
        let root = NodeSpec {
            children: Some(spec.children.unwrap_or_default()),
            ..spec
        };
        let tree = root.into_component()?;
        debug!("parsed tree of depth {}", tree.depth());
        Ok(tree)
    }

    pub fn render(tree: &Component<i64>) -> ApplicationResult<String> {
        let spec = match tree {
            Component::Leaf { value } => NodeSpec {
                value: None,
                children: Some(vec![NodeSpec {
                    value: Some(*value),
                    children: None,
                }]),
            },
            composite => NodeSpec::from_component(composite),
        };
        toml::to_string_pretty(&spec).map_err(|e| ApplicationError::Document {
            message: format!("serialize tree: {e}"),
        })
    }
}
