use std::sync::Arc;

use crate::composable::mixin::{Mixin, MixinInstance};
use crate::composable::Composable;

/// Descriptor wrapping a composable with the ID used in export hints.
#[derive(Clone)]
pub struct ComposableDescriptor {
    pub(crate) id: String,
    pub(crate) inner: Arc<dyn Composable>,
}

impl ComposableDescriptor {
    /// Create a new descriptor with the given ID.
    pub fn new(id: impl Into<String>, inner: impl Composable + 'static) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(inner),
        }
    }

    /// Descriptor for a single mixin instance.
    pub fn mixin<T: Mixin>(id: impl Into<String>, instance: T) -> Self {
        Self::new(id, MixinInstance::new(instance))
    }

    /// Descriptor for a composable already shared elsewhere.
    pub fn shared(id: impl Into<String>, inner: Arc<dyn Composable>) -> Self {
        Self {
            id: id.into(),
            inner,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inner(&self) -> &dyn Composable {
        self.inner.as_ref()
    }
}

impl std::fmt::Debug for ComposableDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposableDescriptor")
            .field("id", &self.id)
            .field("ty", &self.inner.ty().name())
            .finish()
    }
}
