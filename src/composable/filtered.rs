use super::{Composable, ComposableType, ExportFunc};
use crate::capability::{CapabilitySet, Signature};

/// Decorator that wraps any `Composable` with pre-filtered capability sets.
///
/// Only methods belonging to a kept capability set are offered to a
/// composition. A kept set never has a filtered-out ancestor.
pub struct Filtered<C: Composable> {
    inner: C,
    ty: ComposableType,
}

impl<C: Composable> Filtered<C> {
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Composable> Composable for Filtered<C> {
    fn ty(&self) -> &ComposableType {
        &self.ty
    }

    fn get_func(&self, sig: &Signature) -> Option<ExportFunc> {
        if !self.ty.declares(sig) {
            return None;
        }
        self.inner.get_func(sig)
    }
}

/// Extension methods for filtering the capability sets of any `Composable`.
pub trait ExportFilter: Composable + Sized {
    /// Filter capability sets by predicate on their name.
    ///
    /// The predicate applies to supertraits too. A set that fails, or that
    /// extends a set that fails, is dropped and its parents are considered
    /// in its place: hiding `A` from a mixin declaring `AB: A + B` leaves it
    /// declaring only `B`.
    fn filter_capabilities(self, f: impl Fn(&str) -> bool) -> Filtered<Self> {
        let mut ty = ComposableType::new(self.ty().name(), Vec::new());
        for set in self.ty().capabilities() {
            retain(set, &f, &mut ty);
        }

        Filtered { inner: self, ty }
    }

    /// Keep only capability sets whose names are in `allow`.
    fn exposing(self, allow: &[&str]) -> Filtered<Self> {
        self.filter_capabilities(|name| allow.contains(&name))
    }

    /// Remove capability sets whose names are in `deny`, along with any set
    /// extending them; keep everything else.
    fn hiding(self, deny: &[&str]) -> Filtered<Self> {
        self.filter_capabilities(|name| !deny.contains(&name))
    }
}

impl<T: Composable + Sized> ExportFilter for T {}

fn passes(set: &CapabilitySet, f: &impl Fn(&str) -> bool) -> bool {
    f(set.name()) && set.parents().iter().all(|parent| passes(parent, f))
}

fn retain(set: &CapabilitySet, f: &impl Fn(&str) -> bool, ty: &mut ComposableType) {
    if passes(set, f) {
        ty.push_capability(set.clone());
        return;
    }
    for parent in set.parents() {
        retain(parent, f, ty);
    }
}
