//! Listing, lookup and counting over loaded descriptor files.

use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    MethodDescriptorProto, ServiceDescriptorProto,
};
use protomcp_common::generator::{
    find_enum, find_field, find_message, find_method, find_nested_enum, find_nested_message,
    find_service, for_each_enum, for_each_field, for_each_message, for_each_method,
    for_each_nested_enum, for_each_nested_message, for_each_service, is_enum_field,
    is_group_field, is_map_field, is_map_field_with_message, is_message_field, is_one_of_field,
    is_scalar_field, label_keyword, type_keyword, Descriptor, Label, Type,
};
use protomcp_common::LazyBuffer;
use std::fmt;

const INDENT: &str = "  ";

/// Renders every definition of every file as an indented tree
pub(crate) fn list(files: &[FileDescriptorProto]) -> String {
    let mut out = LazyBuffer::new();
    for file in files {
        write_file(&mut out, file);
    }
    out.into_string()
}

/// A definition matched by [`find`]
#[derive(Debug)]
pub(crate) struct Found<'a> {
    pub(crate) file: &'a FileDescriptorProto,
    pub(crate) descriptor: Descriptor<'a>,
    /// Enclosing message, for fields
    pub(crate) parent: Option<&'a DescriptorProto>,
}

/// Resolves a dotted path in every file.
///
/// Accepted shapes are `Message`, `Outer.Inner`, `Message.field`,
/// `Message.Enum`, `Enum`, `Service` and `Service.Method`, optionally
/// qualified with the file's package and a leading dot.
pub(crate) fn find<'a>(files: &'a [FileDescriptorProto], path: &str) -> Vec<Found<'a>> {
    files
        .iter()
        .filter_map(|file| resolve(file, path))
        .collect()
}

/// Renders a [`Found`] definition with a one-line header
pub(crate) fn describe(found: &Found<'_>) -> String {
    let mut out = LazyBuffer::new();
    out.printf(format_args!(
        "{} {} in {}\n",
        found.descriptor.kind(),
        found.descriptor.name(),
        found.file.name()
    ));

    match found.descriptor {
        Descriptor::File(file) => write_file(&mut out, file),
        Descriptor::Message(msg) => write_message(&mut out, msg, 1),
        Descriptor::Field(field) => write_field(&mut out, found.parent, field, 1),
        Descriptor::Enum(en) => write_enum(&mut out, en, 1),
        Descriptor::Service(svc) => write_service(&mut out, svc, 1),
        Descriptor::Method(method) => write_method(&mut out, method, 1),
        Descriptor::Unknown => {}
    }
    out.into_string()
}

/// Definition counts across a set of files
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stats {
    pub(crate) files: usize,
    /// Messages at any depth, map entries included
    pub(crate) messages: usize,
    pub(crate) fields: usize,
    pub(crate) map_fields: usize,
    pub(crate) oneof_fields: usize,
    /// Top-level and nested enums
    pub(crate) enums: usize,
    pub(crate) services: usize,
    pub(crate) methods: usize,
}

impl Stats {
    pub(crate) fn collect(files: &[FileDescriptorProto]) -> Self {
        let mut stats = Stats {
            files: files.len(),
            ..Default::default()
        };

        for file in files {
            for_each_message(file, |msg| {
                stats.count_message(msg);
                true
            });
            for_each_enum(file, |_| {
                stats.enums += 1;
                true
            });
            for_each_service(file, |svc| {
                stats.services += 1;
                for_each_method(svc, |_| {
                    stats.methods += 1;
                    true
                });
                true
            });
        }
        stats
    }

    fn count_message(&mut self, msg: &DescriptorProto) {
        self.messages += 1;
        for_each_field(msg, |field| {
            self.fields += 1;
            if is_map_field(field) {
                self.map_fields += 1;
            }
            if is_one_of_field(field) {
                self.oneof_fields += 1;
            }
            true
        });
        for_each_nested_enum(msg, |_| {
            self.enums += 1;
            true
        });
        for_each_nested_message(msg, |nested| {
            self.count_message(nested);
            true
        });
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "files: {}", self.files)?;
        writeln!(f, "messages: {}", self.messages)?;
        writeln!(
            f,
            "fields: {} ({} map, {} oneof)",
            self.fields, self.map_fields, self.oneof_fields
        )?;
        writeln!(f, "enums: {}", self.enums)?;
        writeln!(f, "services: {}", self.services)?;
        writeln!(f, "methods: {}", self.methods)
    }
}

fn resolve<'a>(file: &'a FileDescriptorProto, path: &str) -> Option<Found<'a>> {
    let path = path.trim_start_matches('.');
    let relative = match file.package() {
        "" => path,
        package => path
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(path),
    };

    let segments: Vec<&str> = relative.split('.').collect();
    let (first, rest) = segments.split_first()?;
    let found = |descriptor, parent| Found {
        file,
        descriptor,
        parent,
    };

    if let Some(msg) = find_message(file, first) {
        return resolve_in_message(msg, rest).map(|(descriptor, parent)| found(descriptor, parent));
    }
    if let Some(svc) = find_service(file, first) {
        return match rest {
            [] => Some(found(Descriptor::Service(svc), None)),
            [method] => find_method(svc, method).map(|m| found(Descriptor::Method(m), None)),
            _ => None,
        };
    }
    match rest {
        [] => find_enum(file, first).map(|en| found(Descriptor::Enum(en), None)),
        _ => None,
    }
}

fn resolve_in_message<'a>(
    msg: &'a DescriptorProto,
    rest: &[&str],
) -> Option<(Descriptor<'a>, Option<&'a DescriptorProto>)> {
    let Some((name, tail)) = rest.split_first() else {
        return Some((Descriptor::Message(msg), None));
    };

    if let Some(nested) = find_nested_message(msg, name) {
        return resolve_in_message(nested, tail);
    }
    if !tail.is_empty() {
        return None;
    }
    find_field(msg, name)
        .map(|field| (Descriptor::Field(field), Some(msg)))
        .or_else(|| find_nested_enum(msg, name).map(|en| (Descriptor::Enum(en), None)))
}

fn indent(out: &mut LazyBuffer, depth: usize) {
    out.write_string(std::iter::repeat(INDENT).take(depth));
}

fn write_file(out: &mut LazyBuffer, file: &FileDescriptorProto) {
    out.printf(format_args!("file {}", file.name()));
    if !file.package().is_empty() {
        out.printf(format_args!(" (package {})", file.package()));
    }
    out.write_runes(['\n']);

    for_each_message(file, |msg| {
        write_message(out, msg, 1);
        true
    });
    for_each_enum(file, |en| {
        write_enum(out, en, 1);
        true
    });
    for_each_service(file, |svc| {
        write_service(out, svc, 1);
        true
    });
}

fn write_message(out: &mut LazyBuffer, msg: &DescriptorProto, depth: usize) {
    indent(out, depth);
    out.printf(format_args!("message {}\n", msg.name()));

    for_each_field(msg, |field| {
        write_field(out, Some(msg), field, depth + 1);
        true
    });
    for_each_nested_enum(msg, |en| {
        write_enum(out, en, depth + 1);
        true
    });
    // map entries are shown through their field
    for_each_nested_message(msg, |nested| {
        if !is_map_entry(nested) {
            write_message(out, nested, depth + 1);
        }
        true
    });
}

fn write_field(
    out: &mut LazyBuffer,
    parent: Option<&DescriptorProto>,
    field: &FieldDescriptorProto,
    depth: usize,
) {
    indent(out, depth);
    out.write_string(["field "]);
    if let Some(label) = field.label.and_then(|label| Label::try_from(label).ok()) {
        out.write_string([label_keyword(label), " "]);
    }
    out.printf(format_args!(
        "{} {} = {}",
        field_type_name(field),
        field.name(),
        field.number()
    ));

    let tags = field_tags(parent, field);
    if !tags.is_empty() {
        out.printf(format_args!(" [{}]", tags.join(", ")));
    }
    out.write_runes(['\n']);
}

fn write_enum(out: &mut LazyBuffer, en: &EnumDescriptorProto, depth: usize) {
    indent(out, depth);
    out.printf(format_args!("enum {}\n", en.name()));
    for value in &en.value {
        indent(out, depth + 1);
        out.printf(format_args!("{} = {}\n", value.name(), value.number()));
    }
}

fn write_service(out: &mut LazyBuffer, svc: &ServiceDescriptorProto, depth: usize) {
    indent(out, depth);
    out.printf(format_args!("service {}\n", svc.name()));
    for_each_method(svc, |method| {
        write_method(out, method, depth + 1);
        true
    });
}

fn write_method(out: &mut LazyBuffer, method: &MethodDescriptorProto, depth: usize) {
    let stream = |streaming: bool| if streaming { "stream " } else { "" };

    indent(out, depth);
    out.printf(format_args!(
        "rpc {}({}{}) returns ({}{})\n",
        method.name(),
        stream(method.client_streaming()),
        method.input_type(),
        stream(method.server_streaming()),
        method.output_type()
    ));
}

/// Message, enum and group fields show their referenced type name
fn field_type_name(field: &FieldDescriptorProto) -> &str {
    match field.r#type.and_then(|ty| Type::try_from(ty).ok()) {
        Some(Type::Message | Type::Enum | Type::Group) if !field.type_name().is_empty() => {
            field.type_name()
        }
        Some(ty) => type_keyword(ty),
        None => "<unknown>",
    }
}

fn field_tags(parent: Option<&DescriptorProto>, field: &FieldDescriptorProto) -> Vec<&'static str> {
    let mut tags = Vec::new();

    let entry = parent.and_then(|msg| map_entry_for(msg, field));
    if is_map_field_with_message(field, entry) {
        tags.push("map");
    }
    if field.proto3_optional() {
        tags.push("proto3-optional");
    } else if is_one_of_field(field) {
        tags.push("oneof");
    }

    if is_scalar_field(field) {
        tags.push("scalar");
    } else if is_message_field(field) {
        tags.push("message");
    } else if is_enum_field(field) {
        tags.push("enum");
    } else if is_group_field(field) {
        tags.push("group");
    }
    tags
}

/// Looks up the nested message a map field's type name points at
fn map_entry_for<'a>(
    msg: &'a DescriptorProto,
    field: &FieldDescriptorProto,
) -> Option<&'a DescriptorProto> {
    let short_name = field.type_name().rsplit('.').next()?;
    find_nested_message(msg, short_name)
}

fn is_map_entry(msg: &DescriptorProto) -> bool {
    msg.options
        .as_ref()
        .and_then(|opts| opts.map_entry)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::MessageOptions;
    use protomcp_common::generator::testutils::*;

    fn labels_entry() -> DescriptorProto {
        DescriptorProto {
            options: Some(MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..new_message(
                "LabelsEntry",
                vec![
                    new_field("key", 1, Type::String),
                    new_field("value", 2, Type::String),
                ],
            )
        }
    }

    fn user_file() -> FileDescriptorProto {
        let user = new_message_with_nested(
            "User",
            vec![
                new_field("id", 1, Type::Int64),
                new_field("name", 2, Type::String),
                new_repeated_field("tags", 3, Type::String),
                new_map_field("labels", 4, ".example.v1.User.LabelsEntry"),
                new_enum_field("role", 5, ".example.v1.User.Role"),
                new_one_of_field("email", 6, Type::String, 0),
            ],
            vec![labels_entry()],
            vec![new_enum("Role", &["ROLE_UNSPECIFIED", "ROLE_ADMIN"])],
        );
        let service = new_service(
            "UserService",
            vec![new_method(
                "GetUser",
                ".example.v1.GetUserRequest",
                ".example.v1.User",
            )],
        );
        new_file_with_types("user.proto", "example.v1", vec![user], vec![], vec![service])
    }

    #[test]
    fn test_list() {
        let expected = "\
file user.proto (package example.v1)
  message User
    field optional int64 id = 1 [scalar]
    field optional string name = 2 [scalar]
    field repeated string tags = 3 [scalar]
    field repeated .example.v1.User.LabelsEntry labels = 4 [map, message]
    field optional .example.v1.User.Role role = 5 [enum]
    field optional string email = 6 [oneof, scalar]
    enum Role
      ROLE_UNSPECIFIED = 0
      ROLE_ADMIN = 1
  service UserService
    rpc GetUser(.example.v1.GetUserRequest) returns (.example.v1.User)
";
        assert_eq!(list(&[user_file()]), expected);
    }

    #[test]
    fn test_list_empty() {
        assert_eq!(list(&[]), "");
    }

    #[test]
    fn test_field_tags() {
        let proto3_optional = FieldDescriptorProto {
            proto3_optional: Some(true),
            ..new_one_of_field("nick", 1, Type::String, 1)
        };
        assert_eq!(field_tags(None, &proto3_optional), vec!["proto3-optional", "scalar"]);

        // heuristic only, no entry message to confirm
        let map = new_map_field("attrs", 2, "AttrsEntry");
        assert_eq!(field_tags(None, &map), vec!["map", "message"]);

        // an entry message without the map_entry option vetoes the heuristic
        let parent = new_message_with_nested("M", vec![], vec![new_message("AttrsEntry", vec![])], vec![]);
        assert_eq!(field_tags(Some(&parent), &map), vec!["message"]);

        assert_eq!(field_tags(None, &new_field_with_type(Type::Group)), vec!["group"]);
    }

    #[test]
    fn test_find_paths() {
        let files = [user_file()];
        let kind_of = |path: &str| {
            let found = find(&files, path);
            assert!(found.len() <= 1, "ambiguous path {path}");
            found.first().map(|f| (f.descriptor.kind().as_str(), f.descriptor.name()))
        };

        assert_eq!(kind_of("User"), Some(("message", "User")));
        assert_eq!(kind_of("example.v1.User"), Some(("message", "User")));
        assert_eq!(kind_of(".example.v1.User.labels"), Some(("field", "labels")));
        assert_eq!(kind_of("User.Role"), Some(("enum", "Role")));
        assert_eq!(kind_of("User.LabelsEntry"), Some(("message", "LabelsEntry")));
        assert_eq!(kind_of("User.LabelsEntry.key"), Some(("field", "key")));
        assert_eq!(kind_of("UserService"), Some(("service", "UserService")));
        assert_eq!(kind_of("UserService.GetUser"), Some(("method", "GetUser")));

        assert_eq!(kind_of("Missing"), None);
        assert_eq!(kind_of("User.id.extra"), None);
        assert_eq!(kind_of("UserService.GetUser.extra"), None);
        assert_eq!(kind_of(""), None);
    }

    #[test]
    fn test_find_across_files() {
        let files = [
            user_file(),
            new_file_with_types(
                "other.proto",
                "other",
                vec![new_message("User", vec![])],
                vec![new_enum("Status", &["OK"])],
                vec![],
            ),
        ];

        let found = find(&files, "User");
        let in_files: Vec<&str> = found.iter().map(|f| f.file.name()).collect();
        assert_eq!(in_files, vec!["user.proto", "other.proto"]);

        let found = find(&files, "other.Status");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file.name(), "other.proto");
    }

    #[test]
    fn test_describe() {
        let files = [user_file()];

        let found = find(&files, "User.labels");
        assert_eq!(
            describe(&found[0]),
            "field labels in user.proto\n  field repeated .example.v1.User.LabelsEntry labels = 4 [map, message]\n"
        );

        let found = find(&files, "UserService.GetUser");
        assert_eq!(
            describe(&found[0]),
            "method GetUser in user.proto\n  rpc GetUser(.example.v1.GetUserRequest) returns (.example.v1.User)\n"
        );
    }

    #[test]
    fn test_write_streaming_method() {
        let method = MethodDescriptorProto {
            client_streaming: Some(true),
            server_streaming: Some(true),
            ..new_method("Chat", ".chat.Msg", ".chat.Msg")
        };
        let mut out = LazyBuffer::new();
        write_method(&mut out, &method, 0);
        assert_eq!(out.as_str(), "rpc Chat(stream .chat.Msg) returns (stream .chat.Msg)\n");
    }

    #[test]
    fn test_stats() {
        let stats = Stats::collect(&[user_file()]);
        assert_eq!(
            stats,
            Stats {
                files: 1,
                messages: 2,
                fields: 8,
                map_fields: 1,
                oneof_fields: 1,
                enums: 1,
                services: 1,
                methods: 1,
            }
        );
        assert!(stats.to_string().contains("fields: 8 (1 map, 1 oneof)"));
    }
}
