pub mod builder;
pub mod descriptor;
pub mod proxy;

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::capability::{CapabilitySet, Signature, TypeInfo};
use crate::composable::{Composable, ComposableType, ExportFunc};
use crate::error::CompositionError;
use descriptor::ComposableDescriptor;

/// One resolved method: which child answers it, and the handle to call.
#[derive(Clone, Debug)]
pub(crate) struct Route {
    pub(crate) signature: Signature,
    pub(crate) capability: String,
    pub(crate) provider: String,
    pub(crate) func: ExportFunc,
}

/// An immutable proxy over a set of mixins.
///
/// Every method of the declared capability sets was resolved to its owner
/// when the composition was built. Cloning is cheap and clones share the
/// same mixin instances.
#[derive(Clone)]
pub struct Composition {
    children: Arc<Vec<ComposableDescriptor>>,
    /// Maps method name → routes, one per signature with that name.
    routes: Arc<HashMap<String, Vec<Route>>>,
    ty: ComposableType,
}

impl Composition {
    pub(crate) fn new(
        children: Vec<ComposableDescriptor>,
        routes: HashMap<String, Vec<Route>>,
        ty: ComposableType,
    ) -> Self {
        Self {
            children: Arc::new(children),
            routes: Arc::new(routes),
            ty,
        }
    }

    /// Call `method` with the argument tuple `args`, expecting `R` back.
    ///
    /// The delegate's return value is handed back as-is; a delegate that
    /// returns `Result` keeps its own error inside `Ok`. Errors from this
    /// call are routing errors only.
    pub fn invoke<A: 'static, R: 'static>(&self, method: &str, args: A) -> Result<R, CompositionError> {
        self.resolve::<A, R>(method)?.call(args)
    }

    /// Resolve `method` into a typed handle, so repeated calls skip the lookup.
    pub fn resolve<A: 'static, R: 'static>(&self, method: &str) -> Result<Method<A, R>, CompositionError> {
        let route = self.route(method, TypeInfo::of::<A>(), TypeInfo::of::<R>())?;
        Ok(Method {
            signature: route.signature.clone(),
            func: route.func.clone(),
            _marker: PhantomData,
        })
    }

    fn route(&self, method: &str, args: TypeInfo, ret: TypeInfo) -> Result<&Route, CompositionError> {
        let routes = self
            .routes
            .get(method)
            .ok_or_else(|| CompositionError::FuncNotFound(method.to_string()))?;

        routes
            .iter()
            .find(|route| route.signature.same_types(args, ret))
            .ok_or_else(|| CompositionError::SignatureMismatch {
                method: method.to_string(),
                found: Signature::new(method, args, ret).to_string(),
                available: routes.iter().map(|r| r.signature.to_string()).collect(),
            })
    }

    /// Capability sets this composition answers.
    pub fn capabilities(&self) -> &[CapabilitySet] {
        self.ty.capabilities()
    }

    pub fn implements(&self, capability: &str) -> bool {
        self.ty.implements(capability)
    }

    /// Every routed signature, in no particular order.
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.routes.values().flatten().map(|route| &route.signature)
    }

    /// ID of the child answering `method`. With overloads, the first one resolved.
    pub fn provider_of(&self, method: &str) -> Option<&str> {
        self.routes
            .get(method)
            .and_then(|routes| routes.first())
            .map(|route| route.provider.as_str())
    }

    /// Capability set that declared `method`, as resolved at build time.
    pub fn capability_of(&self, method: &str) -> Option<&str> {
        self.routes
            .get(method)
            .and_then(|routes| routes.first())
            .map(|route| route.capability.as_str())
    }

    /// Get a child composable by ID.
    pub fn get(&self, id: &str) -> Option<&dyn Composable> {
        self.children
            .iter()
            .find(|child| child.id() == id)
            .map(|child| child.inner())
    }

    /// IDs of all children, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|child| child.id())
    }
}

impl Composable for Composition {
    fn ty(&self) -> &ComposableType {
        &self.ty
    }

    fn get_func(&self, sig: &Signature) -> Option<ExportFunc> {
        self.route(sig.name(), sig.args(), sig.ret())
            .ok()
            .map(|route| route.func.clone())
    }
}

impl std::fmt::Debug for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let capabilities: Vec<&str> = self.capabilities().iter().map(|c| c.name()).collect();
        let ids: Vec<&str> = self.ids().collect();
        f.debug_struct("Composition")
            .field("capabilities", &capabilities)
            .field("children", &ids)
            .finish()
    }
}

/// Pre-resolved typed handle to one method of a [`Composition`].
pub struct Method<A, R> {
    signature: Signature,
    func: ExportFunc,
    _marker: PhantomData<fn(A) -> R>,
}

impl<A: 'static, R: 'static> Method<A, R> {
    pub fn call(&self, args: A) -> Result<R, CompositionError> {
        let out = self.func.call(Box::new(args))?;
        out.downcast::<R>()
            .map(|out| *out)
            .map_err(|_| CompositionError::SignatureMismatch {
                method: self.signature.name().to_string(),
                found: Signature::of::<A, R>(self.signature.name()).to_string(),
                available: vec![self.signature.to_string()],
            })
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl<A, R> Clone for Method<A, R> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            func: self.func.clone(),
            _marker: PhantomData,
        }
    }
}
