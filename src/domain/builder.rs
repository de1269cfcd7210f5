//! Fluent builder for composite trees.

use tracing::{debug, instrument};

use crate::domain::component::Component;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::optional::OptionalBox;

/// Assembles a [`Component`] tree through chained calls.
///
/// The builder keeps a stack of open composites; the bottom entry is the
/// root. `build()` closes whatever is still open, hands out the tree and
/// resets the builder so it can be reused.
pub struct TreeBuilder<T> {
    open: Vec<Component<T>>,
    error: Option<DomainError>,
}

impl<T> Default for TreeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeBuilder<T> {
    pub fn new() -> Self {
        Self {
            open: vec![Component::composite()],
            error: None,
        }
    }

    pub fn root_value(&mut self, value: T) -> &mut Self {
        if let Some(Component::Composite { value: slot, .. }) = self.open.first_mut() {
            *slot = OptionalBox::of(value);
        }
        self
    }

    pub fn leaf(&mut self, value: T) -> &mut Self {
        self.attach(Component::leaf(value));
        self
    }

    /// Start a nested composite without a value; children go into it until `close()`.
    pub fn open(&mut self) -> &mut Self {
        self.open.push(Component::composite());
        self
    }

    pub fn open_with(&mut self, value: T) -> &mut Self {
        self.open.push(Component::composite_with(value));
        self
    }

    /// Finish the innermost open composite.
    ///
    /// Closing the root is a structural violation, reported by `build()`.
    pub fn close(&mut self) -> &mut Self {
        if self.open.len() > 1 {
            if let Some(done) = self.open.pop() {
                self.attach(done);
            }
        } else {
            self.record(DomainError::structural("close() without an open composite"));
        }
        self
    }

    /// Number of composites opened and not yet closed (the root excluded).
    pub fn depth(&self) -> usize {
        self.open.len().saturating_sub(1)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build(&mut self) -> DomainResult<Component<T>> {
        let mut state = std::mem::take(self);
        if let Some(err) = state.error.take() {
            debug!("discarding tree: {}", err);
            return Err(err);
        }
        while state.open.len() > 1 {
            state.close();
        }
        state
            .open
            .pop()
            .ok_or_else(|| DomainError::structural("builder lost its root"))
    }

    fn attach(&mut self, child: Component<T>) {
        let result = match self.open.last_mut() {
            Some(top) => top.add_child(child).map(|_| ()),
            None => Err(DomainError::structural("builder lost its root")),
        };
        if let Err(err) = result {
            self.record(err);
        }
    }

    // first error wins
    fn record(&mut self, err: DomainError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
