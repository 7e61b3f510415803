use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::composable::mixin::{Mixin, MixinType};
use crate::composable::ComposableType;

/// Runtime identity of a Rust type, compared by `TypeId` only.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity of a method: its name, argument tuple type and return type.
///
/// Two capability sets declaring the same name with the same types describe
/// one method, and one route serves both.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    name: String,
    args: TypeInfo,
    ret: TypeInfo,
}

impl Signature {
    pub fn new(name: impl Into<String>, args: TypeInfo, ret: TypeInfo) -> Self {
        Self {
            name: name.into(),
            args,
            ret,
        }
    }

    /// Signature of a method taking the argument tuple `A` and returning `R`.
    pub fn of<A: 'static, R: 'static>(name: impl Into<String>) -> Self {
        Self::new(name, TypeInfo::of::<A>(), TypeInfo::of::<R>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> TypeInfo {
        self.args
    }

    pub fn ret(&self) -> TypeInfo {
        self.ret
    }

    pub(crate) fn same_types(&self, args: TypeInfo, ret: TypeInfo) -> bool {
        self.args == args && self.ret == ret
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} -> {}", self.name, self.args.name, self.ret.name)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A named set of method signatures, optionally extending other sets.
///
/// This is the runtime face of an interface: it carries no state and no
/// behavior, only what a proxy must be able to answer.
#[derive(Clone, Debug)]
pub struct CapabilitySet {
    name: String,
    methods: Vec<Signature>,
    extends: Vec<CapabilitySet>,
}

impl CapabilitySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            extends: Vec::new(),
        }
    }

    /// Descriptor of a capability declared with [`capability!`](crate::capability!).
    pub fn of<C: ?Sized + Capability>() -> Self {
        C::capability_set()
    }

    /// Declare a method taking the argument tuple `A` and returning `R`.
    pub fn method<A: 'static, R: 'static>(mut self, name: impl Into<String>) -> Self {
        self.methods.push(Signature::of::<A, R>(name));
        self
    }

    pub fn extends(mut self, parent: CapabilitySet) -> Self {
        self.extends.push(parent);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods declared directly on this set.
    pub fn declared(&self) -> &[Signature] {
        &self.methods
    }

    pub fn parents(&self) -> &[CapabilitySet] {
        &self.extends
    }

    /// Every method of this set and its ancestors, each paired with the
    /// name of the set declaring it. Parents come first; duplicates are
    /// reported once.
    pub fn signatures(&self) -> Vec<(&str, &Signature)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_signatures(&mut seen, &mut out);
        out
    }

    fn collect_signatures<'a>(
        &'a self,
        seen: &mut HashSet<&'a Signature>,
        out: &mut Vec<(&'a str, &'a Signature)>,
    ) {
        for parent in &self.extends {
            parent.collect_signatures(seen, out);
        }
        for sig in &self.methods {
            if seen.insert(sig) {
                out.push((self.name.as_str(), sig));
            }
        }
    }

    /// Whether this set or any ancestor is called `name`.
    pub fn is_or_extends(&self, name: &str) -> bool {
        self.name == name || self.extends.iter().any(|p| p.is_or_extends(name))
    }

    pub fn contains(&self, sig: &Signature) -> bool {
        self.methods.contains(sig) || self.extends.iter().any(|p| p.contains(sig))
    }
}

/// A capability declared as a Rust trait, implemented for `dyn Trait`.
///
/// Normally written by [`capability!`](crate::capability!).
pub trait Capability: 'static {
    fn capability_set() -> CapabilitySet;
}

/// Binds the methods of capability `Self` on mixin type `T` into its
/// dispatch table. Written by [`capability!`](crate::capability!) for every
/// `T` implementing the trait.
pub trait Provide<T: Mixin>: Capability {
    fn provide(ty: &mut MixinType<T>);
}

/// Marker: a proxy targeting `Self` may be used as capability `C`.
///
/// Written by [`capability!`](crate::capability!) for the capability itself
/// and for each supertrait it lists.
pub trait Implies<C: ?Sized> {}

/// What a composition is asked to satisfy.
#[derive(Clone, Debug)]
pub enum Target {
    /// A pure capability set; the only valid target.
    Capability(CapabilitySet),
    /// A concrete type, named for error reporting.
    Concrete(String),
}

impl Target {
    pub fn capability<C: ?Sized + Capability>() -> Self {
        Target::Capability(C::capability_set())
    }

    pub fn concrete<T: ?Sized + 'static>() -> Self {
        Target::Concrete(type_name::<T>().to_string())
    }

    pub fn name(&self) -> &str {
        match self {
            Target::Capability(set) => set.name(),
            Target::Concrete(name) => name,
        }
    }
}

impl From<CapabilitySet> for Target {
    fn from(set: CapabilitySet) -> Self {
        Target::Capability(set)
    }
}

impl From<&ComposableType> for Target {
    fn from(ty: &ComposableType) -> Self {
        Target::Concrete(ty.name().to_string())
    }
}
