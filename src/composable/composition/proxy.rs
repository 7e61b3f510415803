use std::any::type_name;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::capability::Signature;
use crate::composable::composition::Composition;
use crate::composable::{Composable, ComposableType, ExportFunc};

/// A [`Composition`] usable directly as capability `C`.
///
/// Built with [`CompositionBuilder::build_as`](super::builder::CompositionBuilder::build_as).
/// Every method of `C` was resolved at build time, so the trait methods
/// generated by [`capability!`](crate::capability!) return the delegate's
/// value directly.
pub struct Proxy<C: ?Sized> {
    composition: Composition,
    _capability: PhantomData<fn() -> Box<C>>,
}

impl<C: ?Sized> Proxy<C> {
    pub(crate) fn new(composition: Composition) -> Self {
        Self {
            composition,
            _capability: PhantomData,
        }
    }

    // Associated functions rather than methods, so they never shadow a
    // capability method of the same name.

    pub fn composition(this: &Self) -> &Composition {
        &this.composition
    }

    pub fn into_composition(this: Self) -> Composition {
        this.composition
    }

    /// Route a trait method to its owner. Used by code generated by
    /// [`capability!`](crate::capability!).
    #[doc(hidden)]
    pub fn forward<A: 'static, R: 'static>(this: &Self, method: &str, args: A) -> R {
        match this.composition.invoke::<A, R>(method, args) {
            Ok(out) => out,
            Err(err) => unreachable!(
                "build_as resolved every method of `{}`: {err}",
                type_name::<C>()
            ),
        }
    }
}

impl<C: ?Sized> Clone for Proxy<C> {
    fn clone(&self) -> Self {
        Self::new(self.composition.clone())
    }
}

impl<C: ?Sized> Deref for Proxy<C> {
    type Target = Composition;

    fn deref(&self) -> &Composition {
        &self.composition
    }
}

impl<C: ?Sized> Composable for Proxy<C> {
    fn ty(&self) -> &ComposableType {
        self.composition.ty()
    }

    fn get_func(&self, sig: &Signature) -> Option<ExportFunc> {
        self.composition.get_func(sig)
    }
}

impl<C: ?Sized> std::fmt::Debug for Proxy<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Proxy").field(&self.composition).finish()
    }
}
