pub mod capability;
pub mod composable;
pub mod error;
mod macros;

pub use capability::{Capability, CapabilitySet, Implies, Provide, Signature, Target, TypeInfo};
pub use composable::{Composable, ComposableType, ExportFunc};
pub use composable::composition::{Composition, Method};
pub use composable::composition::builder::{CompositionBuilder, OverlapPolicy};
pub use composable::composition::descriptor::ComposableDescriptor;
pub use composable::composition::proxy::Proxy;
pub use composable::filtered::{ExportFilter, Filtered};
pub use composable::mixin::{IntoMixins, Mixin, MixinInstance, MixinType};
pub use error::CompositionError;
