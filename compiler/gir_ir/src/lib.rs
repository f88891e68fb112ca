//! GIR IR - Introspection Descriptor Model
//!
//! Plain data describing foreign functions as the binding generator sees them:
//! - [`TypeDescriptor`]: a closed tag set plus pointer-ness
//! - [`ArgumentDescriptor`]: type, direction, ownership transfer, caller-allocates
//! - [`FunctionDescriptor`]: symbol, name, owner, flags, arguments, return
//! - [`NamespaceEntity`] / [`TypeEntity`]: declaration-ordered containers
//!
//! Everything here is `serde`-serializable so metadata dumps and test fixtures
//! can be written as JSON. Declaration order is preserved everywhere because
//! the generator's numeric ids depend on it.

mod function;
mod namespace;
mod repository;
mod types;

pub use function::{ArgumentDescriptor, Direction, FunctionDescriptor, FunctionFlags, Transfer};
pub use namespace::{split_namespace_id, NamespaceEntity, TypeEntity};
pub use repository::{Repository, RepositoryError};
pub use types::{ArrayKind, ArrayType, EntityKind, EntityRef, Primitive, TypeDescriptor, TypeKind};
