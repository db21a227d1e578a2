//! Descriptor classification.
//!
//! Each check comes as a pair: `as_x` returns the narrowed record when the
//! input is kind `x` and passes that kind's minimal validity rule, and `is_x`
//! only answers yes or no. None of them fail; a wrong kind, an invalid record
//! and the absent value all produce `None`/`false`.
//!
//! Minimal validity rules:
//!
//! | kind    | rule                                   |
//! |---------|----------------------------------------|
//! | file    | non-empty name                         |
//! | message | non-empty name                         |
//! | enum    | non-empty name                         |
//! | service | non-empty name                         |
//! | method  | non-empty name, input and output types |
//! | field   | type code present                      |

use super::types::{is_scalar_type, Label, Type};
use super::{Descriptor, IntoDescriptor};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    MethodDescriptorProto, ServiceDescriptorProto,
};

/// Type-name suffix protoc gives synthesized map entry messages
pub const MAP_ENTRY_SUFFIX: &str = "Entry";

fn is_non_empty(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(|s| !s.is_empty())
}

fn has_label(field: &FieldDescriptorProto, label: Label) -> bool {
    field.label == Some(label as i32)
}

fn has_type(field: &FieldDescriptorProto, ty: Type) -> bool {
    field.r#type == Some(ty as i32)
}

/// Returns the message when `desc` is a message with a non-empty name.
pub fn as_message<'a>(desc: impl IntoDescriptor<'a>) -> Option<&'a DescriptorProto> {
    match desc.into_descriptor()? {
        Descriptor::Message(msg) if is_non_empty(&msg.name) => Some(msg),
        _ => None,
    }
}

/// Checks if `desc` is a valid message descriptor
pub fn is_message<'a>(desc: impl IntoDescriptor<'a>) -> bool {
    as_message(desc).is_some()
}

/// Returns the message when `desc` is a valid message named `name`.
///
/// An empty `name` matches any valid message.
pub fn as_message_with_name<'a>(
    desc: impl IntoDescriptor<'a>,
    name: &str,
) -> Option<&'a DescriptorProto> {
    as_message(desc).filter(|msg| name.is_empty() || msg.name() == name)
}

/// Checks if `desc` is a valid message named `name` (empty matches any)
pub fn is_message_with_name<'a>(desc: impl IntoDescriptor<'a>, name: &str) -> bool {
    as_message_with_name(desc, name).is_some()
}

/// Returns the field when `desc` is a field with its type code set.
///
/// The raw code is not range-checked: a field carrying an unknown type code
/// is still a field, it just matches none of the type refinements below.
pub fn as_field_type<'a>(desc: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    match desc.into_descriptor()? {
        Descriptor::Field(field) if field.r#type.is_some() => Some(field),
        _ => None,
    }
}

/// Checks if `desc` is a valid field descriptor
pub fn is_field_type<'a>(desc: impl IntoDescriptor<'a>) -> bool {
    as_field_type(desc).is_some()
}

/// Returns the service when `desc` is a service with a non-empty name.
pub fn as_service_type<'a>(desc: impl IntoDescriptor<'a>) -> Option<&'a ServiceDescriptorProto> {
    match desc.into_descriptor()? {
        Descriptor::Service(svc) if is_non_empty(&svc.name) => Some(svc),
        _ => None,
    }
}

/// Checks if `desc` is a valid service descriptor
pub fn is_service_type<'a>(desc: impl IntoDescriptor<'a>) -> bool {
    as_service_type(desc).is_some()
}

/// Returns the method when `desc` is a method with non-empty name, input type
/// and output type.
pub fn as_method_type<'a>(desc: impl IntoDescriptor<'a>) -> Option<&'a MethodDescriptorProto> {
    match desc.into_descriptor()? {
        Descriptor::Method(method)
            if is_non_empty(&method.name)
                && is_non_empty(&method.input_type)
                && is_non_empty(&method.output_type) =>
        {
            Some(method)
        }
        _ => None,
    }
}

/// Checks if `desc` is a valid method descriptor
pub fn is_method_type<'a>(desc: impl IntoDescriptor<'a>) -> bool {
    as_method_type(desc).is_some()
}

/// Returns the enum when `desc` is an enum with a non-empty name.
pub fn as_enum_type<'a>(desc: impl IntoDescriptor<'a>) -> Option<&'a EnumDescriptorProto> {
    match desc.into_descriptor()? {
        Descriptor::Enum(en) if is_non_empty(&en.name) => Some(en),
        _ => None,
    }
}

/// Checks if `desc` is a valid enum descriptor
pub fn is_enum_type<'a>(desc: impl IntoDescriptor<'a>) -> bool {
    as_enum_type(desc).is_some()
}

/// Returns the file when `desc` is a file with a non-empty name.
pub fn as_file_type<'a>(desc: impl IntoDescriptor<'a>) -> Option<&'a FileDescriptorProto> {
    match desc.into_descriptor()? {
        Descriptor::File(file) if is_non_empty(&file.name) => Some(file),
        _ => None,
    }
}

/// Checks if `desc` is a valid file descriptor
pub fn is_file_type<'a>(desc: impl IntoDescriptor<'a>) -> bool {
    as_file_type(desc).is_some()
}

/// Returns the field when it is labelled `repeated`.
pub fn as_repeated_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| has_label(f, Label::Repeated))
}

/// Checks if the field is labelled `repeated`
pub fn is_repeated_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_repeated_field(field).is_some()
}

/// Returns the field when it looks like a map field.
///
/// protoc lowers `map<K, V>` to a repeated field of a synthesized message
/// type, so the field alone cannot tell the two apart. This check relies on
/// the naming convention for those synthesized types: the field must be
/// repeated, message-typed, and reference a type name ending in `"Entry"`.
/// A plain repeated field of a message that happens to be called `FooEntry`
/// matches too, and a map entry type with another name does not.
///
/// Use [`as_map_field_with_message`] when the entry message is at hand.
pub fn as_map_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_repeated_field(field).filter(|f| {
        has_type(f, Type::Message)
            && f.type_name
                .as_deref()
                .is_some_and(|name| !name.is_empty() && name.ends_with(MAP_ENTRY_SUFFIX))
    })
}

/// Checks if the field looks like a map field; see [`as_map_field`]
pub fn is_map_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_map_field(field).is_some()
}

/// Returns the field when it is a map field, confirmed by its entry message.
///
/// The field must first pass [`as_map_field`]. If `entry_msg` is absent the
/// heuristic result stands; otherwise `entry_msg` must be a valid message
/// whose options carry `map_entry = true`.
pub fn as_map_field_with_message<'a, 'b>(
    field: impl IntoDescriptor<'a>,
    entry_msg: impl IntoDescriptor<'b>,
) -> Option<&'a FieldDescriptorProto> {
    let field = as_map_field(field)?;

    let Some(entry) = entry_msg.into_descriptor() else {
        return Some(field);
    };

    as_message(entry)
        .and_then(|msg| msg.options.as_ref())
        .and_then(|opts| opts.map_entry)
        .filter(|&map_entry| map_entry)
        .map(|_| field)
}

/// Checks if the field is a map field confirmed by its entry message; see
/// [`as_map_field_with_message`]
pub fn is_map_field_with_message<'a, 'b>(
    field: impl IntoDescriptor<'a>,
    entry_msg: impl IntoDescriptor<'b>,
) -> bool {
    as_map_field_with_message(field, entry_msg).is_some()
}

/// Returns the field when it belongs to a oneof.
///
/// Any oneof index counts, including `0`. Proto3 `optional` fields are also
/// members of a (synthetic) oneof and therefore match.
pub fn as_one_of_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| f.oneof_index.is_some())
}

/// Checks if the field belongs to a oneof
pub fn is_one_of_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_one_of_field(field).is_some()
}

/// Returns the field when it is labelled `optional`.
///
/// The label alone decides. That covers proto2 `optional` fields, proto3
/// `optional` fields, and proto3 singular fields declared without the
/// keyword, since all of them carry `LABEL_OPTIONAL`. Check
/// `proto3_optional` to single out the explicit proto3 form.
pub fn as_optional_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| has_label(f, Label::Optional))
}

/// Checks if the field is labelled `optional`; see [`as_optional_field`]
pub fn is_optional_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_optional_field(field).is_some()
}

/// Returns the field when it is labelled `required` (proto2 only).
pub fn as_required_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| has_label(f, Label::Required))
}

/// Checks if the field is labelled `required`
pub fn is_required_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_required_field(field).is_some()
}

/// Returns the field when its type is one of the scalar types: every type
/// except message, group and enum.
pub fn as_scalar_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| {
        f.r#type
            .and_then(|code| Type::try_from(code).ok())
            .is_some_and(is_scalar_type)
    })
}

/// Checks if the field has a scalar type
pub fn is_scalar_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_scalar_field(field).is_some()
}

/// Returns the field when it is `TYPE_MESSAGE`.
///
/// Groups are excluded; see [`as_group_field`].
pub fn as_message_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| has_type(f, Type::Message))
}

/// Checks if the field is `TYPE_MESSAGE` (groups excluded)
pub fn is_message_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_message_field(field).is_some()
}

/// Returns the field when it is `TYPE_GROUP`.
///
/// Groups are a deprecated proto2 encoding of nested messages and are not
/// available in proto3.
pub fn as_group_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| has_type(f, Type::Group))
}

/// Checks if the field is `TYPE_GROUP`
pub fn is_group_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_group_field(field).is_some()
}

/// Returns the field when it is `TYPE_ENUM`.
pub fn as_enum_field<'a>(field: impl IntoDescriptor<'a>) -> Option<&'a FieldDescriptorProto> {
    as_field_type(field).filter(|f| has_type(f, Type::Enum))
}

/// Checks if the field is `TYPE_ENUM`
pub fn is_enum_field<'a>(field: impl IntoDescriptor<'a>) -> bool {
    as_enum_field(field).is_some()
}

#[cfg(test)]
mod tests {
    use super::super::testutils::*;
    use super::super::types::SCALAR_TYPES;
    use super::*;
    use prost_types::MessageOptions;

    fn none() -> Option<Descriptor<'static>> {
        None
    }

    #[test]
    fn test_kind_predicates_accept_only_their_kind() {
        let file = new_file("test.proto", "test");
        let msg = new_message("Msg", vec![]);
        let field = new_field("f", 1, Type::Int32);
        let en = new_enum("Color", &["RED"]);
        let svc = new_service("Svc", vec![]);
        let method = new_method("Call", ".test.Req", ".test.Resp");

        let all = [
            Descriptor::from(&file),
            Descriptor::from(&msg),
            Descriptor::from(&field),
            Descriptor::from(&en),
            Descriptor::from(&svc),
            Descriptor::from(&method),
            Descriptor::Unknown,
        ];

        for (i, desc) in all.iter().copied().enumerate() {
            assert_eq!(is_file_type(desc), i == 0, "file check on {:?}", desc.kind());
            assert_eq!(is_message(desc), i == 1, "message check on {:?}", desc.kind());
            assert_eq!(is_field_type(desc), i == 2, "field check on {:?}", desc.kind());
            assert_eq!(is_enum_type(desc), i == 3, "enum check on {:?}", desc.kind());
            assert_eq!(is_service_type(desc), i == 4, "service check on {:?}", desc.kind());
            assert_eq!(is_method_type(desc), i == 5, "method check on {:?}", desc.kind());
        }
    }

    #[test]
    fn test_kind_predicates_reject_absent() {
        assert!(!is_file_type(none()));
        assert!(!is_message(none()));
        assert!(!is_field_type(none()));
        assert!(!is_enum_type(none()));
        assert!(!is_service_type(none()));
        assert!(!is_method_type(none()));
        assert!(!is_message(None::<&DescriptorProto>));
    }

    #[test]
    fn test_name_validity() {
        let unnamed_msg = DescriptorProto::default();
        let empty_msg = DescriptorProto {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(as_message(&unnamed_msg).is_none());
        assert!(as_message(&empty_msg).is_none());

        assert!(!is_file_type(&FileDescriptorProto::default()));
        assert!(!is_enum_type(&EnumDescriptorProto::default()));
        assert!(!is_service_type(&ServiceDescriptorProto::default()));

        let msg = new_message("Msg", vec![]);
        assert_eq!(as_message(&msg), Some(&msg));
    }

    #[test]
    fn test_method_validity() {
        assert!(is_method_type(&new_method("Call", "In", "Out")));
        assert!(!is_method_type(&new_method("", "In", "Out")));
        assert!(!is_method_type(&new_method("Call", "", "Out")));
        assert!(!is_method_type(&new_method("Call", "In", "")));
        assert!(!is_method_type(&MethodDescriptorProto {
            name: Some("Call".into()),
            input_type: Some("In".into()),
            ..Default::default()
        }));
    }

    #[test]
    fn test_field_requires_type() {
        let untyped = new_field_with_label(Label::Optional);
        assert!(!is_field_type(&untyped));
        assert!(!is_optional_field(&untyped));

        let typed = new_field_with_type(Type::Bool);
        assert_eq!(as_field_type(&typed), Some(&typed));

        // unknown type codes still make a field, but no refinement matches
        let odd = FieldDescriptorProto {
            r#type: Some(99),
            ..Default::default()
        };
        assert!(is_field_type(&odd));
        assert!(!is_scalar_field(&odd));
        assert!(!is_message_field(&odd));
        assert!(!is_enum_field(&odd));
        assert!(!is_group_field(&odd));
    }

    #[test]
    fn test_message_with_name() {
        let msg = new_message("User", vec![]);
        assert!(is_message_with_name(&msg, "User"));
        assert!(is_message_with_name(&msg, ""));
        assert!(!is_message_with_name(&msg, "user"));
        assert!(!is_message_with_name(&msg, "Other"));
        assert!(!is_message_with_name(&DescriptorProto::default(), ""));
        assert!(!is_message_with_name(none(), ""));
    }

    #[test]
    fn test_scalar_fields() {
        for ty in SCALAR_TYPES {
            let field = new_field_with_type(ty);
            assert!(is_scalar_field(&field), "{ty:?} should be scalar");
            assert!(!is_message_field(&field));
            assert!(!is_enum_field(&field));
            assert!(!is_group_field(&field));
        }

        for ty in [Type::Message, Type::Group, Type::Enum] {
            assert!(!is_scalar_field(&new_field_with_type(ty)), "{ty:?} is not scalar");
        }
    }

    #[test]
    fn test_message_group_enum_fields() {
        let msg_field = new_message_field("user", 1, ".test.User");
        assert!(is_message_field(&msg_field));
        assert!(!is_group_field(&msg_field));

        let group_field = new_field_with_type(Type::Group);
        assert!(is_group_field(&group_field));
        assert!(!is_message_field(&group_field));

        let enum_field = new_enum_field("color", 2, ".test.Color");
        assert!(is_enum_field(&enum_field));
        assert!(!is_scalar_field(&enum_field));

        let msg = new_message("Msg", vec![]);
        assert!(!is_message_field(&msg));
        assert!(!is_enum_field(none()));
    }

    #[test]
    fn test_labels() {
        let repeated = new_repeated_field("tags", 1, Type::String);
        let optional = new_field("name", 2, Type::String);
        let required = new_required_field("id", 3, Type::Int64);

        assert!(is_repeated_field(&repeated));
        assert!(!is_optional_field(&repeated));
        assert!(!is_required_field(&repeated));

        assert!(is_optional_field(&optional));
        assert!(!is_repeated_field(&optional));

        assert!(is_required_field(&required));
        assert!(!is_optional_field(&required));

        // no label at all
        let unlabelled = new_field_with_type(Type::String);
        assert!(!is_repeated_field(&unlabelled));
        assert!(!is_optional_field(&unlabelled));
        assert!(!is_required_field(&unlabelled));
    }

    #[test]
    fn test_optional_ignores_proto3_optional_flag() {
        for flag in [Some(true), Some(false), None] {
            let mut field = new_field("name", 1, Type::String);
            field.proto3_optional = flag;
            assert!(is_optional_field(&field), "proto3_optional = {flag:?}");
        }
    }

    #[test]
    fn test_one_of_fields() {
        assert!(is_one_of_field(&new_one_of_field("a", 1, Type::String, 0)));
        assert!(is_one_of_field(&new_one_of_field("b", 2, Type::Int32, 3)));
        assert!(!is_one_of_field(&new_field("c", 3, Type::String)));

        // independent of label and type
        let mut repeated = new_repeated_field("d", 4, Type::Message);
        repeated.oneof_index = Some(1);
        assert!(is_one_of_field(&repeated));
    }

    #[test]
    fn test_map_field_heuristic() {
        assert!(is_map_field(&new_map_field("labels", 1, ".test.Msg.LabelsEntry")));
        assert!(is_map_field(&new_repeated_message_field("Entry")));
        assert!(!is_map_field(&new_repeated_message_field("MyMap")));
        assert!(!is_map_field(&new_repeated_message_field("")));

        // not repeated
        let mut single = new_map_field("labels", 1, "LabelsEntry");
        single.label = Some(Label::Optional as i32);
        assert!(!is_map_field(&single));

        // not a message
        let mut scalar = new_map_field("labels", 1, "LabelsEntry");
        scalar.r#type = Some(Type::String as i32);
        assert!(!is_map_field(&scalar));

        // a group named like an entry is still not a map
        let mut group = new_map_field("labels", 1, "LabelsEntry");
        group.r#type = Some(Type::Group as i32);
        assert!(!is_map_field(&group));

        assert!(!is_map_field(none()));
    }

    #[test]
    fn test_map_field_with_message() {
        let field = new_map_field("labels", 1, ".test.Msg.LabelsEntry");

        let mut entry = new_message("LabelsEntry", vec![]);
        entry.options = Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        });
        assert!(is_map_field_with_message(&field, &entry));

        // absent entry message falls back to the heuristic
        assert!(is_map_field_with_message(&field, none()));
        assert_eq!(
            is_map_field_with_message(&new_repeated_message_field("MyMap"), none()),
            is_map_field(&new_repeated_message_field("MyMap"))
        );

        let mut not_entry = entry.clone();
        not_entry.options = Some(MessageOptions {
            map_entry: Some(false),
            ..Default::default()
        });
        assert!(!is_map_field_with_message(&field, &not_entry));

        let mut no_flag = entry.clone();
        no_flag.options = Some(MessageOptions::default());
        assert!(!is_map_field_with_message(&field, &no_flag));

        let no_options = new_message("LabelsEntry", vec![]);
        assert!(!is_map_field_with_message(&field, &no_options));

        let wrong_kind = new_enum("LabelsEntry", &[]);
        assert!(!is_map_field_with_message(&field, &wrong_kind));

        // the heuristic still gates everything
        let plain = new_repeated_message_field("Labels");
        assert!(!is_map_field_with_message(&plain, &entry));
    }
}
