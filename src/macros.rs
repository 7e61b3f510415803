/// Declare a capability: a trait that mixins implement and proxies answer.
///
/// ```ignore
/// capability! {
///     pub trait Greeter {
///         fn greet(&self, name: String) -> String;
///     }
/// }
///
/// capability! {
///     pub trait Host: Greeter + Clock {}
/// }
/// ```
///
/// Besides the trait itself this generates:
/// - `impl Capability for dyn Trait`, the runtime [`CapabilitySet`](crate::CapabilitySet);
/// - `impl Provide<T> for dyn Trait` for every mixin `T: Trait`, binding its methods;
/// - `impl Trait for Proxy<C>` for every target `C` implying `Trait`.
///
/// Methods take `&self` and owned `'static` arguments. Supertraits must be
/// capabilities themselves and must list every ancestor, e.g.
/// `trait Host: Greeter + Named` when `Greeter: Named`.
///
/// On a `Proxy`, capability methods take priority over the `Composition`
/// methods reached through `Deref`. Methods named `ty` or `get_func` become
/// ambiguous wherever `Composable` is also in scope; call them as
/// `Trait::method(&proxy)` there.
#[macro_export]
macro_rules! capability {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $sup0:ident $(+ $sup:ident)*)? {
            $(
                $(#[$mmeta:meta])*
                fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)* $(,)?) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $name $(: $sup0 $(+ $sup)*)? {
            $(
                $(#[$mmeta])*
                fn $method(&self $(, $arg: $arg_ty)*) -> $crate::__ret_ty!($($ret)?);
            )*
        }

        impl $crate::Capability for dyn $name {
            fn capability_set() -> $crate::CapabilitySet {
                $crate::CapabilitySet::new(stringify!($name))
                    $(
                        .extends(<dyn $sup0 as $crate::Capability>::capability_set())
                        $(.extends(<dyn $sup as $crate::Capability>::capability_set()))*
                    )?
                    $(.method::<($($arg_ty,)*), $crate::__ret_ty!($($ret)?)>(stringify!($method)))*
            }
        }

        impl<__T: $name + $crate::Mixin> $crate::Provide<__T> for dyn $name {
            #[allow(unused_variables)]
            fn provide(ty: &mut $crate::MixinType<__T>) {
                $(
                    <dyn $sup0 as $crate::Provide<__T>>::provide(ty);
                    $(<dyn $sup as $crate::Provide<__T>>::provide(ty);)*
                )?
                $(
                    ty.bind(
                        stringify!($method),
                        |this: &__T, ($($arg,)*): ($($arg_ty,)*)| -> $crate::__ret_ty!($($ret)?) {
                            <__T as $name>::$method(this $(, $arg)*)
                        },
                    );
                )*
            }
        }

        impl $crate::Implies<dyn $name> for dyn $name {}
        $(
            impl $crate::Implies<dyn $sup0> for dyn $name {}
            $(impl $crate::Implies<dyn $sup> for dyn $name {})*
        )?

        impl<__C> $name for $crate::Proxy<__C>
        where
            __C: ?Sized
                + $crate::Implies<dyn $name>
                $(+ $crate::Implies<dyn $sup0> $(+ $crate::Implies<dyn $sup>)*)?,
        {
            $(
                fn $method(&self $(, $arg: $arg_ty)*) -> $crate::__ret_ty!($($ret)?) {
                    $crate::Proxy::forward::<($($arg_ty,)*), $crate::__ret_ty!($($ret)?)>(
                        self,
                        stringify!($method),
                        ($($arg,)*),
                    )
                }
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ret_ty {
    () => { () };
    ($ret:ty) => { $ret };
}

/// Implement [`Mixin`](crate::Mixin) for a type from the capabilities it implements.
///
/// ```ignore
/// mixin!(ConsoleGreeter => Greeter, Clock);
/// ```
#[macro_export]
macro_rules! mixin {
    ($ty:ty => $($cap:ident),+ $(,)?) => {
        impl $crate::Mixin for $ty {
            fn describe(ty: &mut $crate::MixinType<Self>) {
                $(ty.implements::<dyn $cap>();)+
            }
        }
    };
}
