use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use crate::capability::{CapabilitySet, Provide, Signature};
use crate::composable::composition::builder::CompositionBuilder;
use crate::composable::{Composable, ComposableType, ExportFunc};
use crate::error::CompositionError;

/// Erased method bound to a concrete mixin type.
type BoundMethod<T> =
    Arc<dyn Fn(&T, Box<dyn Any>) -> Result<Box<dyn Any>, CompositionError> + Send + Sync>;

/// A type whose instances can be mixed into a composition.
///
/// `describe` lists the capabilities the type contributes. Most impls are a
/// single [`mixin!`](crate::mixin!) line:
///
/// ```ignore
/// mixin!(EnglishGreeter => Greeter);
/// ```
pub trait Mixin: Send + Sync + Sized + 'static {
    fn describe(ty: &mut MixinType<Self>);
}

/// Capability sets and bound methods of mixin type `T`.
pub struct MixinType<T> {
    ty: ComposableType,
    methods: HashMap<Signature, BoundMethod<T>>,
}

impl<T: Mixin> MixinType<T> {
    /// Describe `T` by running its [`Mixin::describe`].
    pub fn of() -> Self {
        let mut ty = Self {
            ty: ComposableType::new(short_type_name(type_name::<T>()), Vec::new()),
            methods: HashMap::new(),
        };
        T::describe(&mut ty);
        ty
    }

    /// Declare capability `C` and bind all of its methods, supertraits included.
    pub fn implements<C: ?Sized + Provide<T>>(&mut self) -> &mut Self {
        self.ty.push_capability(C::capability_set());
        C::provide(self);
        self
    }

    /// Declare a hand-built capability set. Its methods are bound with [`bind`](Self::bind).
    pub fn capability(&mut self, set: CapabilitySet) -> &mut Self {
        self.ty.push_capability(set);
        self
    }

    /// Bind method `name` taking the argument tuple `A` and returning `R`.
    ///
    /// Rebinding the same signature replaces the previous binding.
    pub fn bind<A, R, F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        A: 'static,
        R: 'static,
        F: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        let sig = Signature::of::<A, R>(name);
        let expected = sig.to_string();
        let method_name = sig.name().to_string();
        let method: BoundMethod<T> = Arc::new(
            move |this: &T, args: Box<dyn Any>| -> Result<Box<dyn Any>, CompositionError> {
                let args = args.downcast::<A>().map_err(|_| CompositionError::SignatureMismatch {
                    method: method_name.clone(),
                    found: "arguments of another type".to_string(),
                    available: vec![expected.clone()],
                })?;
                Ok(Box::new(f(this, *args)) as Box<dyn Any>)
            },
        );
        self.methods.insert(sig, method);
        self
    }

    pub fn ty(&self) -> &ComposableType {
        &self.ty
    }

    pub fn provides(&self, sig: &Signature) -> bool {
        self.methods.contains_key(sig)
    }
}

/// One mixin instance together with its dispatch table.
pub struct MixinInstance<T> {
    instance: Arc<T>,
    ty: Arc<MixinType<T>>,
}

impl<T: Mixin> MixinInstance<T> {
    pub fn new(instance: T) -> Self {
        Self::from_arc(Arc::new(instance))
    }

    /// Wrap an instance that stays shared with the caller.
    pub fn from_arc(instance: Arc<T>) -> Self {
        Self {
            instance,
            ty: Arc::new(MixinType::of()),
        }
    }

    pub fn instance(&self) -> &Arc<T> {
        &self.instance
    }
}

impl<T: Mixin> Composable for MixinInstance<T> {
    fn ty(&self) -> &ComposableType {
        self.ty.ty()
    }

    fn get_func(&self, sig: &Signature) -> Option<ExportFunc> {
        let method = self.ty.methods.get(sig)?.clone();
        let instance = self.instance.clone();
        Some(ExportFunc::new(move |args| method(&*instance, args)))
    }
}

/// One or more mixin instances, accepted by [`CompositionBuilder::mixins`].
pub trait IntoMixins {
    fn add_to(self, builder: &mut CompositionBuilder);
}

impl<T: Mixin> IntoMixins for Vec<T> {
    fn add_to(self, builder: &mut CompositionBuilder) {
        for instance in self {
            builder.mixin(instance);
        }
    }
}

macro_rules! impl_into_mixins_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Mixin),+> IntoMixins for ($($name,)+) {
            #[allow(non_snake_case)]
            fn add_to(self, builder: &mut CompositionBuilder) {
                let ($($name,)+) = self;
                $(builder.mixin($name);)+
            }
        }
    };
}

impl_into_mixins_for_tuple!(A);
impl_into_mixins_for_tuple!(A, B);
impl_into_mixins_for_tuple!(A, B, C);
impl_into_mixins_for_tuple!(A, B, C, D);
impl_into_mixins_for_tuple!(A, B, C, D, E);
impl_into_mixins_for_tuple!(A, B, C, D, E, F);
impl_into_mixins_for_tuple!(A, B, C, D, E, F, G);
impl_into_mixins_for_tuple!(A, B, C, D, E, F, G, H);

/// `my_crate::stubs::Wrapper<alloc::string::String>` -> `Wrapper<alloc::string::String>`
fn short_type_name(full: &str) -> String {
    let (path, generics) = full.split_at(full.find('<').unwrap_or(full.len()));
    let base = path.rsplit("::").next().unwrap_or(path);
    format!("{base}{generics}")
}
