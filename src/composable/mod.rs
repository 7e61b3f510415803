pub mod composition;
pub mod filtered;
pub mod mixin;

use std::any::Any;
use std::sync::Arc;

use crate::capability::{CapabilitySet, Signature};
use crate::error::CompositionError;

/// Type signature of a composable: its name and the capability sets it declares.
#[derive(Clone, Debug, Default)]
pub struct ComposableType {
    name: String,
    capabilities: Vec<CapabilitySet>,
}

impl ComposableType {
    pub fn new(name: impl Into<String>, capabilities: Vec<CapabilitySet>) -> Self {
        Self {
            name: name.into(),
            capabilities,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> &[CapabilitySet] {
        &self.capabilities
    }

    /// Whether any declared capability set (or an ancestor of one) is `name`.
    pub fn implements(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.is_or_extends(name))
    }

    /// Whether `sig` belongs to one of the declared capability sets.
    pub fn declares(&self, sig: &Signature) -> bool {
        self.capabilities.iter().any(|c| c.contains(sig))
    }

    pub(crate) fn push_capability(&mut self, set: CapabilitySet) {
        if !self.capabilities.iter().any(|c| c.name() == set.name()) {
            self.capabilities.push(set);
        }
    }
}

/// Pre-resolved, type-erased handle to a method of one composable.
///
/// Obtained via [`Composable::get_func`]. The closure captures the owning
/// instance, so calls need no further lookup. Arguments arrive as the boxed
/// argument tuple and the result leaves as the boxed return value.
#[derive(Clone)]
pub struct ExportFunc(
    Arc<dyn Fn(Box<dyn Any>) -> Result<Box<dyn Any>, CompositionError> + Send + Sync>,
);

impl ExportFunc {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Box<dyn Any>) -> Result<Box<dyn Any>, CompositionError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: Box<dyn Any>) -> Result<Box<dyn Any>, CompositionError> {
        (self.0)(args)
    }
}

impl std::fmt::Debug for ExportFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExportFunc(..)")
    }
}

/// A unit that can contribute methods to a composition.
///
/// Implemented by single mixin instances, by [`Filtered`](filtered::Filtered)
/// wrappers and by [`Composition`](composition::Composition) itself, so
/// compositions nest.
pub trait Composable: Send + Sync {
    /// Name and declared capability sets.
    fn ty(&self) -> &ComposableType;

    /// Resolve `sig` into a handle on this composable, or `None` if it does
    /// not provide a method with exactly that signature.
    fn get_func(&self, sig: &Signature) -> Option<ExportFunc>;
}
