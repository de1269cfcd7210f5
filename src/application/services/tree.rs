//! Tree document service
//!
//! Loads tree documents through the filesystem boundary and answers the
//! queries the CLI exposes.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, TreeDocument};
use crate::domain::{Component, CountPolicy, OptionalBox};
use crate::infrastructure::traits::FileSystem;

/// Value filter used by `count` and `first`. Unset bounds always match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeQuery {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub even: bool,
}

impl TreeQuery {
    pub fn matches(&self, value: &i64) -> bool {
        self.min.map_or(true, |min| *value >= min)
            && self.max.map_or(true, |max| *value <= max)
            && (!self.even || value % 2 == 0)
    }
}

/// Service for loading and querying tree documents.
pub struct TreeService {
    fs: Arc<dyn FileSystem>,
    policy: CountPolicy,
}

impl TreeService {
    pub fn new(fs: Arc<dyn FileSystem>, policy: CountPolicy) -> Self {
        Self { fs, policy }
    }

    pub fn policy(&self) -> CountPolicy {
        self.policy
    }

    /// Same service, different traversal policy.
    pub fn with_policy(&self, policy: CountPolicy) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            policy,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Component<i64>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree document", path)?;
        TreeDocument::parse(&content)
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn save(&self, path: &Path, tree: &Component<i64>) -> ApplicationResult<()> {
        let content = TreeDocument::render(tree)?;
        self.fs
            .write(path, &content)
            .with_path_context("write tree document", path)
    }

    /// Values in cursor order, optionally restricted to leaves.
    pub fn walk(&self, tree: &Component<i64>, leaves_only: bool) -> Vec<i64> {
        if leaves_only {
            tree.leaf_cursor().copied().collect()
        } else {
            tree.cursor().copied().collect()
        }
    }

    pub fn count(&self, tree: &Component<i64>, query: &TreeQuery) -> usize {
        let n = tree.count(self.policy, |v| query.matches(v));
        debug!("count: {} matches under {}", n, self.policy.as_str());
        n
    }

    pub fn first(&self, tree: &Component<i64>, query: &TreeQuery) -> OptionalBox<i64> {
        tree.first(self.policy, |v| query.matches(v)).cloned()
    }

    /// Sum of leaf values after multiplying each by `scale`.
    ///
    /// Fails with [`ApplicationError::Overflow`] instead of wrapping.
    pub fn sum(&self, tree: &Component<i64>, scale: i64) -> ApplicationResult<i64> {
        tree.leaf_cursor()
            .try_fold(0_i64, |acc, v| {
                v.checked_mul(scale).and_then(|scaled| acc.checked_add(scaled))
            })
            .ok_or_else(|| ApplicationError::Overflow {
                context: format!("sum of leaf values scaled by {scale}"),
            })
    }
}
