//! Descriptor helpers for protoc plugin development.
//!
//! This module works on the `prost-types` descriptor records produced by
//! parsing a compiled schema (`FileDescriptorSet`, `CodeGeneratorRequest`).
//! It never builds or mutates descriptors outside of [`testutils`]; it only
//! inspects them.
//!
//! ## Architecture
//!
//! - [`Descriptor`] is a borrowed, closed sum over the six descriptor kinds the
//!   helpers understand, plus `Unknown` for anything else.
//! - [`descriptor`] answers "what is this?" with `as_*`/`is_*` pairs.
//! - [`traversal`] finds named children and visits child collections in
//!   declaration order, built on top of the `as_*` checks.
//! - [`types`] holds the field type and label vocabulary.
//!
//! Every function accepts anything implementing [`IntoDescriptor`]: a typed
//! descriptor reference, a [`Descriptor`], or `None` for the absent value.
//!
//! ```
//! use protomcp_common::generator::{find_field, is_scalar_field, testutils::*, Type};
//!
//! let msg = new_message("User", vec![new_field("name", 1, Type::String)]);
//! let field = find_field(&msg, "name").unwrap();
//! assert!(is_scalar_field(field));
//! ```

pub mod descriptor;
pub mod testutils;
pub mod traversal;
pub mod types;

use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    MethodDescriptorProto, ServiceDescriptorProto,
};
use std::fmt;

pub use descriptor::*;
pub use traversal::*;
pub use types::{is_scalar_type, label_keyword, type_keyword, Label, Type, SCALAR_TYPES};

/// A borrowed view of one descriptor record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Descriptor<'a> {
    /// A `.proto` file
    File(&'a FileDescriptorProto),
    /// A message type
    Message(&'a DescriptorProto),
    /// A message field or extension
    Field(&'a FieldDescriptorProto),
    /// An enum type
    Enum(&'a EnumDescriptorProto),
    /// A service
    Service(&'a ServiceDescriptorProto),
    /// A service method
    Method(&'a MethodDescriptorProto),
    /// Any other record (oneofs, enum values, options, ...)
    Unknown,
}

/// The kind of a [`Descriptor`], without the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// See [`Descriptor::File`]
    File,
    /// See [`Descriptor::Message`]
    Message,
    /// See [`Descriptor::Field`]
    Field,
    /// See [`Descriptor::Enum`]
    Enum,
    /// See [`Descriptor::Service`]
    Service,
    /// See [`Descriptor::Method`]
    Method,
    /// See [`Descriptor::Unknown`]
    Unknown,
}

impl DescriptorKind {
    /// Returns the lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::File => "file",
            DescriptorKind::Message => "message",
            DescriptorKind::Field => "field",
            DescriptorKind::Enum => "enum",
            DescriptorKind::Service => "service",
            DescriptorKind::Method => "method",
            DescriptorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> Descriptor<'a> {
    /// Returns the kind of this descriptor
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::File(_) => DescriptorKind::File,
            Descriptor::Message(_) => DescriptorKind::Message,
            Descriptor::Field(_) => DescriptorKind::Field,
            Descriptor::Enum(_) => DescriptorKind::Enum,
            Descriptor::Service(_) => DescriptorKind::Service,
            Descriptor::Method(_) => DescriptorKind::Method,
            Descriptor::Unknown => DescriptorKind::Unknown,
        }
    }

    /// Returns the declared name, `""` when unset or for `Unknown`.
    ///
    /// No validity rule is applied; use the `as_*` functions for that.
    pub fn name(&self) -> &'a str {
        match *self {
            Descriptor::File(d) => d.name(),
            Descriptor::Message(d) => d.name(),
            Descriptor::Field(d) => d.name(),
            Descriptor::Enum(d) => d.name(),
            Descriptor::Service(d) => d.name(),
            Descriptor::Method(d) => d.name(),
            Descriptor::Unknown => "",
        }
    }
}

/// Conversion into an optional [`Descriptor`].
///
/// `None` is the absent value; it is a valid input everywhere and simply
/// never matches.
pub trait IntoDescriptor<'a> {
    /// Converts `self` into a descriptor view, or `None` when absent
    fn into_descriptor(self) -> Option<Descriptor<'a>>;
}

impl<'a> IntoDescriptor<'a> for Descriptor<'a> {
    fn into_descriptor(self) -> Option<Descriptor<'a>> {
        Some(self)
    }
}

impl<'a> IntoDescriptor<'a> for Option<Descriptor<'a>> {
    fn into_descriptor(self) -> Option<Descriptor<'a>> {
        self
    }
}

impl<'a, T> IntoDescriptor<'a> for Option<&'a T>
where
    &'a T: IntoDescriptor<'a>,
{
    fn into_descriptor(self) -> Option<Descriptor<'a>> {
        self.and_then(IntoDescriptor::into_descriptor)
    }
}

macro_rules! impl_into_descriptor {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> IntoDescriptor<'a> for &'a $ty {
                fn into_descriptor(self) -> Option<Descriptor<'a>> {
                    Some(Descriptor::$variant(self))
                }
            }

            impl<'a> From<&'a $ty> for Descriptor<'a> {
                fn from(desc: &'a $ty) -> Self {
                    Descriptor::$variant(desc)
                }
            }
        )*
    };
}

impl_into_descriptor! {
    FileDescriptorProto => File,
    DescriptorProto => Message,
    FieldDescriptorProto => Field,
    EnumDescriptorProto => Enum,
    ServiceDescriptorProto => Service,
    MethodDescriptorProto => Method,
}
