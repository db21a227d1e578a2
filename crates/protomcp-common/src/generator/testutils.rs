//! Descriptor constructors for tests and fixtures.
//!
//! Building `prost-types` records by hand means spelling out every `Option`
//! and `as i32` conversion. These helpers produce the common shapes in one
//! call. Fields default to `LABEL_OPTIONAL` unless the helper name says
//! otherwise.

use super::types::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, OneofDescriptorProto, ServiceDescriptorProto,
};

fn field(name: &str, number: i32, label: Label, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

/// Creates an optional field of the given type
pub fn new_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    field(name, number, Label::Optional, ty)
}

/// Creates a repeated field of the given type
pub fn new_repeated_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    field(name, number, Label::Repeated, ty)
}

/// Creates a required (proto2) field of the given type
pub fn new_required_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    field(name, number, Label::Required, ty)
}

/// Creates an optional message field referencing `type_name`
pub fn new_message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, Label::Optional, Type::Message)
    }
}

/// Creates an optional enum field referencing `type_name`
pub fn new_enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, Label::Optional, Type::Enum)
    }
}

/// Creates a map-shaped field: repeated, message-typed, referencing
/// `entry_type_name`
pub fn new_map_field(name: &str, number: i32, entry_type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(entry_type_name.to_string()),
        ..field(name, number, Label::Repeated, Type::Message)
    }
}

/// Creates an optional field that is member `one_of_index` of a oneof
pub fn new_one_of_field(
    name: &str,
    number: i32,
    ty: Type,
    one_of_index: i32,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        oneof_index: Some(one_of_index),
        ..field(name, number, Label::Optional, ty)
    }
}

/// Creates a field with only its type set
pub fn new_field_with_type(ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

/// Creates a field with only its label set (and therefore no type)
pub fn new_field_with_label(label: Label) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(label as i32),
        ..Default::default()
    }
}

/// Creates an unnamed repeated message field; an empty `type_name` leaves the
/// type name unset
pub fn new_repeated_message_field(type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        r#type: Some(Type::Message as i32),
        type_name: (!type_name.is_empty()).then(|| type_name.to_string()),
        ..Default::default()
    }
}

/// Creates a message with the given fields
pub fn new_message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

/// Creates a message with fields, nested messages and nested enums
pub fn new_message_with_nested(
    name: &str,
    fields: Vec<FieldDescriptorProto>,
    nested_messages: Vec<DescriptorProto>,
    nested_enums: Vec<EnumDescriptorProto>,
) -> DescriptorProto {
    DescriptorProto {
        nested_type: nested_messages,
        enum_type: nested_enums,
        ..new_message(name, fields)
    }
}

/// Creates an enum whose values are numbered by position
pub fn new_enum(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .zip(0..)
            .map(|(value, number)| new_enum_value(value, number))
            .collect(),
        ..Default::default()
    }
}

/// Creates an enum value
pub fn new_enum_value(name: &str, number: i32) -> EnumValueDescriptorProto {
    EnumValueDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        ..Default::default()
    }
}

/// Creates a service with the given methods
pub fn new_service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods,
        ..Default::default()
    }
}

/// Creates a unary method
pub fn new_method(name: &str, input_type: &str, output_type: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input_type.to_string()),
        output_type: Some(output_type.to_string()),
        ..Default::default()
    }
}

/// Creates an empty file in package `package`
pub fn new_file(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        ..Default::default()
    }
}

/// Creates a file with top-level messages, enums and services
pub fn new_file_with_types(
    name: &str,
    package: &str,
    messages: Vec<DescriptorProto>,
    enums: Vec<EnumDescriptorProto>,
    services: Vec<ServiceDescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        message_type: messages,
        enum_type: enums,
        service: services,
        ..new_file(name, package)
    }
}

/// Creates a oneof declaration
pub fn new_one_of(name: &str) -> OneofDescriptorProto {
    OneofDescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}
