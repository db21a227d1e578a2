//! Field type and label vocabulary.

pub use prost_types::field_descriptor_proto::{Label, Type};

/// Every field type that is neither a message, a group nor an enum
pub const SCALAR_TYPES: [Type; 15] = [
    Type::Double,
    Type::Float,
    Type::Int64,
    Type::Uint64,
    Type::Int32,
    Type::Fixed64,
    Type::Fixed32,
    Type::Bool,
    Type::String,
    Type::Bytes,
    Type::Uint32,
    Type::Sfixed32,
    Type::Sfixed64,
    Type::Sint32,
    Type::Sint64,
];

/// Returns true for the scalar field types listed in [`SCALAR_TYPES`]
pub fn is_scalar_type(ty: Type) -> bool {
    !matches!(ty, Type::Message | Type::Group | Type::Enum)
}

/// Returns the `.proto` keyword for a field type.
///
/// Message, group and enum fields are spelled by their type name in source;
/// for those this returns the generic keyword (`"message"`, `"group"`,
/// `"enum"`).
pub fn type_keyword(ty: Type) -> &'static str {
    match ty {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}

/// Returns the `.proto` keyword for a label
pub fn label_keyword(label: Label) -> &'static str {
    match label {
        Label::Optional => "optional",
        Label::Required => "required",
        Label::Repeated => "repeated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_table_matches_predicate() {
        let all = (1..=18).filter_map(|code| Type::try_from(code).ok());
        let scalars: Vec<Type> = all.filter(|ty| is_scalar_type(*ty)).collect();

        assert_eq!(scalars.len(), SCALAR_TYPES.len());
        for ty in SCALAR_TYPES {
            assert!(scalars.contains(&ty));
        }
    }

    #[test]
    fn test_keywords() {
        assert_eq!(type_keyword(Type::Sfixed64), "sfixed64");
        assert_eq!(type_keyword(Type::Message), "message");
        assert_eq!(label_keyword(Label::Repeated), "repeated");
    }
}
