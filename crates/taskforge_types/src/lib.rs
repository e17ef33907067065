//! Host-bound aggregate types for taskforge.
//!
//! The game host describes each DSL-visible class with a [`HostClass`]
//! (DSL name, exposed members, optional defaults) and registers it with the
//! [`TypeRegistry`], which derives an [`AggregateType`] whose origin is that
//! class. Host classes may additionally expose [`ExtensionProperty`]s: getter
//! and setter pairs that DSL code sees as ordinary members of another type.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregate;
pub mod host;
pub mod registry;
pub mod type_name;

pub use aggregate::{AggregateType, Extension, Member, MemberRef, OriginType};
pub use host::{ExtensionProperty, Getter, HostClass, HostKind, MemberDefault, MemberDesc, Setter};
pub use registry::TypeRegistry;
pub use type_name::TypeName;
