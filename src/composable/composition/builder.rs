use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::capability::{Capability, CapabilitySet, Signature, Target};
use crate::composable::composition::descriptor::ComposableDescriptor;
use crate::composable::composition::proxy::Proxy;
use crate::composable::composition::{Composition, Route};
use crate::composable::mixin::{IntoMixins, Mixin, MixinInstance};
use crate::composable::{Composable, ComposableType, ExportFunc};
use crate::error::CompositionError;

/// How to pick a provider when several children implement one signature
/// and no export hint names one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// The child registered first wins.
    #[default]
    FirstWins,
    /// The child registered last wins.
    LastWins,
    /// Fail the build with [`CompositionError::AmbiguousExport`].
    Reject,
}

/// Builder for creating a Composition.
#[derive(Clone, Debug, Default)]
pub struct CompositionBuilder {
    descriptors: Vec<ComposableDescriptor>,
    target: Option<Target>,
    export_hints: HashMap<String, String>,
    overlap: OverlapPolicy,
}

impl CompositionBuilder {
    /// Builder without a fixed target: the composition answers every
    /// capability set its children declare.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder fixed to `target`. Building fails unless it is a pure capability set.
    pub fn targeting(target: impl Into<Target>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Add a mixin instance under an ID derived from its type name.
    pub fn mixin<T: Mixin>(&mut self, instance: T) -> &mut Self {
        self.mixin_shared(Arc::new(instance))
    }

    /// Add a mixin instance the caller keeps a handle to.
    pub fn mixin_shared<T: Mixin>(&mut self, instance: Arc<T>) -> &mut Self {
        let composable = MixinInstance::from_arc(instance);
        let id = self.next_id(composable.ty().name());
        self.descriptors.push(ComposableDescriptor::new(id, composable));
        self
    }

    /// Add several mixin instances at once, e.g. a tuple `(a, b)`.
    pub fn mixins(&mut self, mixins: impl IntoMixins) -> &mut Self {
        mixins.add_to(self);
        self
    }

    /// Add a composable descriptor.
    pub fn add(&mut self, descriptor: ComposableDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add an export hint: when multiple children implement `method`,
    /// this hint selects which child answers it.
    pub fn with_export_hint(&mut self, method: impl Into<String>, provider_id: impl Into<String>) -> &mut Self {
        self.export_hints.insert(method.into(), provider_id.into());
        self
    }

    pub fn with_overlap_policy(&mut self, policy: OverlapPolicy) -> &mut Self {
        self.overlap = policy;
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Build the composition, resolving every method to its owner.
    ///
    /// The builder is left untouched, so building again yields an
    /// independent composition over the same instances.
    pub fn build(&self) -> Result<Composition, CompositionError> {
        self.compose(self.target.as_ref())
    }

    /// Build a typed proxy answering capability `C` directly.
    ///
    /// `C` replaces any target given to [`targeting`](Self::targeting).
    pub fn build_as<C: ?Sized + Capability>(&self) -> Result<Proxy<C>, CompositionError> {
        let target = Target::capability::<C>();
        self.compose(Some(&target)).map(Proxy::new)
    }

    fn compose(&self, target: Option<&Target>) -> Result<Composition, CompositionError> {
        let target = match target {
            Some(Target::Concrete(name)) => return Err(CompositionError::InvalidTarget(name.clone())),
            Some(Target::Capability(set)) => Some(set),
            None => None,
        };

        if self.descriptors.is_empty() {
            return Err(CompositionError::Empty);
        }

        // 1. Check for duplicate IDs
        let mut seen_ids: HashSet<&str> = HashSet::new();
        for descriptor in &self.descriptors {
            if !seen_ids.insert(descriptor.id()) {
                return Err(CompositionError::DuplicateId(descriptor.id().to_string()));
            }
        }

        // 2. Validate export hint references
        for (method, provider_id) in &self.export_hints {
            if !seen_ids.contains(provider_id.as_str()) {
                return Err(CompositionError::InvalidLinkReference {
                    method: method.clone(),
                    target_id: provider_id.clone(),
                });
            }
        }

        // 3. Declared capability sets: the target, or everything the children declare
        let declared: Vec<CapabilitySet> = match target {
            Some(set) => vec![set.clone()],
            None => {
                let mut ty = ComposableType::default();
                for descriptor in &self.descriptors {
                    for set in descriptor.inner.ty().capabilities() {
                        ty.push_capability(set.clone());
                    }
                }
                ty.capabilities().to_vec()
            }
        };

        // 4. Resolve an owner for every declared signature
        let mut routes: HashMap<String, Vec<Route>> = HashMap::new();
        let mut resolved: HashSet<Signature> = HashSet::new();

        for set in &declared {
            for (capability, sig) in set.signatures() {
                if !resolved.insert(sig.clone()) {
                    continue;
                }

                let candidates: Vec<(&str, ExportFunc)> = self
                    .descriptors
                    .iter()
                    .filter_map(|d| d.inner.get_func(sig).map(|func| (d.id(), func)))
                    .collect();

                let (provider, func) = self.select(capability, sig, candidates)?;
                tracing::trace!(method = %sig, provider = %provider, "route resolved");

                routes.entry(sig.name().to_string()).or_default().push(Route {
                    signature: sig.clone(),
                    capability: capability.to_string(),
                    provider,
                    func,
                });
            }
        }

        let name = target.map_or("Composition", |set| set.name());
        let ty = ComposableType::new(name, declared);

        tracing::debug!(
            capability = name,
            children = self.descriptors.len(),
            methods = resolved.len(),
            "composition built"
        );

        Ok(Composition::new(self.descriptors.clone(), routes, ty))
    }

    /// Pick the provider of `sig` among `candidates` (in registration order).
    fn select(
        &self,
        capability: &str,
        sig: &Signature,
        candidates: Vec<(&str, ExportFunc)>,
    ) -> Result<(String, ExportFunc), CompositionError> {
        if candidates.is_empty() {
            return Err(CompositionError::MissingImplementation {
                capability: capability.to_string(),
                signature: sig.to_string(),
            });
        }

        if let Some(hint) = self.export_hints.get(sig.name()) {
            return candidates
                .into_iter()
                .find(|(id, _)| *id == hint.as_str())
                .map(|(id, func)| (id.to_string(), func))
                .ok_or_else(|| CompositionError::ExportHintInvalid {
                    method: sig.name().to_string(),
                    target_id: hint.clone(),
                });
        }

        if candidates.len() > 1 {
            let ids: Vec<String> = candidates.iter().map(|(id, _)| id.to_string()).collect();
            if self.overlap == OverlapPolicy::Reject {
                return Err(CompositionError::AmbiguousExport {
                    method: sig.name().to_string(),
                    candidates: ids,
                });
            }
            tracing::debug!(method = %sig, candidates = ?ids, policy = ?self.overlap, "overlapping providers");
        }

        let chosen = match self.overlap {
            OverlapPolicy::LastWins => candidates.into_iter().last(),
            OverlapPolicy::FirstWins | OverlapPolicy::Reject => candidates.into_iter().next(),
        };

        chosen
            .map(|(id, func)| (id.to_string(), func))
            .ok_or_else(|| CompositionError::MissingImplementation {
                capability: capability.to_string(),
                signature: sig.to_string(),
            })
    }

    /// `base`, or `base#n` for the smallest free `n >= 2`.
    fn next_id(&self, base: &str) -> String {
        let taken = |id: &str| self.descriptors.iter().any(|d| d.id() == id);
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}#{n}"))
            .find(|id| !taken(id))
            .unwrap_or_else(|| base.to_string())
    }
}
