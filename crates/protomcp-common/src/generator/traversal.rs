//! Descriptor tree traversal.
//!
//! `find_*` functions scan one child collection for the first entry whose
//! name equals the given name exactly. `for_each_*` functions call a visitor
//! once per child in declaration order until it returns `false`; their
//! `try_for_each_*` twins accept a fallible visitor and stop at its first
//! error.
//!
//! The container must pass the matching `as_*` check from
//! [`super::descriptor`]. An absent or invalid container, the wrong kind of
//! container, or an empty name all mean "nothing found" / "nothing visited".

use super::descriptor::{as_file_type, as_message, as_service_type};
use super::IntoDescriptor;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, MethodDescriptorProto,
    ServiceDescriptorProto,
};
use std::convert::Infallible;

/// A descriptor record with a declared name
trait Named {
    fn declared_name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Named for $ty {
                fn declared_name(&self) -> &str {
                    self.name()
                }
            }
        )*
    };
}

impl_named!(
    DescriptorProto,
    FieldDescriptorProto,
    EnumDescriptorProto,
    ServiceDescriptorProto,
    MethodDescriptorProto,
);

fn find_by_name<'a, T: Named>(children: Option<&'a [T]>, name: &str) -> Option<&'a T> {
    if name.is_empty() {
        return None;
    }
    children?.iter().find(|child| child.declared_name() == name)
}

fn walk<'a, T, E, F>(children: Option<&'a [T]>, mut visit: F) -> Result<(), E>
where
    F: FnMut(&'a T) -> Result<bool, E>,
{
    for child in children.unwrap_or_default() {
        if !visit(child)? {
            break;
        }
    }
    Ok(())
}

fn infallible<T, F>(mut visit: F) -> impl FnMut(T) -> Result<bool, Infallible>
where
    F: FnMut(T) -> bool,
{
    move |item| Ok(visit(item))
}

fn unwrap_infallible(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Finds a top-level message of a file by name
pub fn find_message<'a>(file: impl IntoDescriptor<'a>, name: &str) -> Option<&'a DescriptorProto> {
    find_by_name(as_file_type(file).map(|f| f.message_type.as_slice()), name)
}

/// Finds a top-level enum of a file by name
pub fn find_enum<'a>(file: impl IntoDescriptor<'a>, name: &str) -> Option<&'a EnumDescriptorProto> {
    find_by_name(as_file_type(file).map(|f| f.enum_type.as_slice()), name)
}

/// Finds a service of a file by name
pub fn find_service<'a>(
    file: impl IntoDescriptor<'a>,
    name: &str,
) -> Option<&'a ServiceDescriptorProto> {
    find_by_name(as_file_type(file).map(|f| f.service.as_slice()), name)
}

/// Finds a field of a message by name
pub fn find_field<'a>(msg: impl IntoDescriptor<'a>, name: &str) -> Option<&'a FieldDescriptorProto> {
    find_by_name(as_message(msg).map(|m| m.field.as_slice()), name)
}

/// Finds a message declared inside a message by name
pub fn find_nested_message<'a>(
    msg: impl IntoDescriptor<'a>,
    name: &str,
) -> Option<&'a DescriptorProto> {
    find_by_name(as_message(msg).map(|m| m.nested_type.as_slice()), name)
}

/// Finds an enum declared inside a message by name
pub fn find_nested_enum<'a>(
    msg: impl IntoDescriptor<'a>,
    name: &str,
) -> Option<&'a EnumDescriptorProto> {
    find_by_name(as_message(msg).map(|m| m.enum_type.as_slice()), name)
}

/// Finds a method of a service by name
pub fn find_method<'a>(
    service: impl IntoDescriptor<'a>,
    name: &str,
) -> Option<&'a MethodDescriptorProto> {
    find_by_name(as_service_type(service).map(|s| s.method.as_slice()), name)
}

/// Visits the top-level messages of a file with a fallible visitor
pub fn try_for_each_message<'a, E, F>(file: impl IntoDescriptor<'a>, visit: F) -> Result<(), E>
where
    F: FnMut(&'a DescriptorProto) -> Result<bool, E>,
{
    walk(as_file_type(file).map(|f| f.message_type.as_slice()), visit)
}

/// Visits the top-level enums of a file with a fallible visitor
pub fn try_for_each_enum<'a, E, F>(file: impl IntoDescriptor<'a>, visit: F) -> Result<(), E>
where
    F: FnMut(&'a EnumDescriptorProto) -> Result<bool, E>,
{
    walk(as_file_type(file).map(|f| f.enum_type.as_slice()), visit)
}

/// Visits the services of a file with a fallible visitor
pub fn try_for_each_service<'a, E, F>(file: impl IntoDescriptor<'a>, visit: F) -> Result<(), E>
where
    F: FnMut(&'a ServiceDescriptorProto) -> Result<bool, E>,
{
    walk(as_file_type(file).map(|f| f.service.as_slice()), visit)
}

/// Visits the fields of a message with a fallible visitor
pub fn try_for_each_field<'a, E, F>(msg: impl IntoDescriptor<'a>, visit: F) -> Result<(), E>
where
    F: FnMut(&'a FieldDescriptorProto) -> Result<bool, E>,
{
    walk(as_message(msg).map(|m| m.field.as_slice()), visit)
}

/// Visits the messages nested in a message with a fallible visitor
pub fn try_for_each_nested_message<'a, E, F>(
    msg: impl IntoDescriptor<'a>,
    visit: F,
) -> Result<(), E>
where
    F: FnMut(&'a DescriptorProto) -> Result<bool, E>,
{
    walk(as_message(msg).map(|m| m.nested_type.as_slice()), visit)
}

/// Visits the enums nested in a message with a fallible visitor
pub fn try_for_each_nested_enum<'a, E, F>(msg: impl IntoDescriptor<'a>, visit: F) -> Result<(), E>
where
    F: FnMut(&'a EnumDescriptorProto) -> Result<bool, E>,
{
    walk(as_message(msg).map(|m| m.enum_type.as_slice()), visit)
}

/// Visits the methods of a service with a fallible visitor
pub fn try_for_each_method<'a, E, F>(service: impl IntoDescriptor<'a>, visit: F) -> Result<(), E>
where
    F: FnMut(&'a MethodDescriptorProto) -> Result<bool, E>,
{
    walk(as_service_type(service).map(|s| s.method.as_slice()), visit)
}

/// Visits the top-level messages of a file; return `false` to stop
pub fn for_each_message<'a, F>(file: impl IntoDescriptor<'a>, visit: F)
where
    F: FnMut(&'a DescriptorProto) -> bool,
{
    unwrap_infallible(try_for_each_message(file, infallible(visit)));
}

/// Visits the top-level enums of a file; return `false` to stop
pub fn for_each_enum<'a, F>(file: impl IntoDescriptor<'a>, visit: F)
where
    F: FnMut(&'a EnumDescriptorProto) -> bool,
{
    unwrap_infallible(try_for_each_enum(file, infallible(visit)));
}

/// Visits the services of a file; return `false` to stop
pub fn for_each_service<'a, F>(file: impl IntoDescriptor<'a>, visit: F)
where
    F: FnMut(&'a ServiceDescriptorProto) -> bool,
{
    unwrap_infallible(try_for_each_service(file, infallible(visit)));
}

/// Visits the fields of a message; return `false` to stop
pub fn for_each_field<'a, F>(msg: impl IntoDescriptor<'a>, visit: F)
where
    F: FnMut(&'a FieldDescriptorProto) -> bool,
{
    unwrap_infallible(try_for_each_field(msg, infallible(visit)));
}

/// Visits the messages nested in a message; return `false` to stop
pub fn for_each_nested_message<'a, F>(msg: impl IntoDescriptor<'a>, visit: F)
where
    F: FnMut(&'a DescriptorProto) -> bool,
{
    unwrap_infallible(try_for_each_nested_message(msg, infallible(visit)));
}

/// Visits the enums nested in a message; return `false` to stop
pub fn for_each_nested_enum<'a, F>(msg: impl IntoDescriptor<'a>, visit: F)
where
    F: FnMut(&'a EnumDescriptorProto) -> bool,
{
    unwrap_infallible(try_for_each_nested_enum(msg, infallible(visit)));
}

/// Visits the methods of a service; return `false` to stop
pub fn for_each_method<'a, F>(service: impl IntoDescriptor<'a>, visit: F)
where
    F: FnMut(&'a MethodDescriptorProto) -> bool,
{
    unwrap_infallible(try_for_each_method(service, infallible(visit)));
}
