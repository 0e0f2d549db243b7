//! Identifier sanitization shared across normalization and emission.
//!
//! Every function here is pure: the same raw name always yields the same
//! identifier, which is what keeps one component mapped to one type name for
//! the whole run.

use crate::openapi::spec::SchemaKind;

/// Check if a name needs quoting to be used as an object key.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name.chars().all(is_identifier_char)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Escape a string for use inside a single-quoted TypeScript literal.
pub fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Wrap a string in single quotes, escaping as needed.
pub fn quote(s: &str) -> String {
    format!("'{}'", escape_single_quoted(s))
}

/// Convert a component key into a type name.
///
/// The first character is uppercased; when it cannot start an identifier it is
/// prefixed with `$` first. Every later character outside `[A-Za-z0-9_$]`
/// becomes `_`.
pub fn to_type_name(raw: &str) -> String {
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        return "_".to_string();
    };

    let mut name = String::with_capacity(raw.len() + 1);
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        name.push('$');
    }
    name.extend(first.to_uppercase());
    name.extend(chars.map(|c| if is_identifier_char(c) { c } else { '_' }));
    name
}

/// Object key for a raw property name: bare when it is a valid identifier,
/// single-quoted otherwise.
pub fn to_property_name(raw: &str) -> String {
    if needs_bracket_notation(raw) {
        quote(raw)
    } else {
        raw.to_string()
    }
}

/// Directory name for one URL path segment.
///
/// `declared` lists the path parameters visible to the path (name, schema kind
/// if one could be determined). A `{name}` segment becomes `_name@kind` so that
/// two same-named parameters of different kinds never share a directory.
pub fn to_path_segment(raw: &str, declared: &[(&str, Option<SchemaKind>)]) -> String {
    let Some(param) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return sanitize_literal_segment(raw);
    };

    let kind = declared
        .iter()
        .find(|(name, _)| *name == param)
        .and_then(|(_, kind)| *kind);

    format!(
        "_{}@{}",
        sanitize_literal_segment(param),
        segment_kind(kind)
    )
}

fn segment_kind(kind: Option<SchemaKind>) -> &'static str {
    match kind {
        Some(SchemaKind::Integer | SchemaKind::Number) => "number",
        Some(SchemaKind::Boolean) => "boolean",
        _ => "string",
    }
}

/// Replace characters that are unsafe in file and module names. A segment of
/// dots only would name the current or parent directory, so its dots become
/// `_` as well.
fn sanitize_literal_segment(raw: &str) -> String {
    if raw.chars().all(|c| c == '.') {
        return "_".repeat(raw.len());
    }
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | '$' | '~') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_bracket_notation() {
        // Valid identifiers
        assert!(!needs_bracket_notation("foo"));
        assert!(!needs_bracket_notation("_foo"));
        assert!(!needs_bracket_notation("$foo"));
        assert!(!needs_bracket_notation("foo123"));

        // Need quoting
        assert!(needs_bracket_notation(""));
        assert!(needs_bracket_notation("123foo"));
        assert!(needs_bracket_notation("foo-bar"));
        assert!(needs_bracket_notation("foo.bar"));
        assert!(needs_bracket_notation("foo bar"));
    }

    #[test]
    fn test_to_type_name() {
        assert_eq!(to_type_name("pet"), "Pet");
        assert_eq!(to_type_name("Pet"), "Pet");
        assert_eq!(to_type_name("user-settings.v2"), "User_settings_v2");
        assert_eq!(to_type_name("200_UserSettings"), "$200_UserSettings");
        assert_eq!(to_type_name("_private"), "_private");
        assert_eq!(to_type_name("$meta"), "$meta");
        assert_eq!(to_type_name(""), "_");
    }

    #[test]
    fn test_to_type_name_is_deterministic() {
        let raw = "weird key/with:stuff";
        assert_eq!(to_type_name(raw), to_type_name(raw));
        assert_eq!(to_type_name(raw), "Weird_key_with_stuff");
    }

    #[test]
    fn test_to_property_name() {
        assert_eq!(to_property_name("id"), "id");
        assert_eq!(to_property_name("x-correlator"), "'x-correlator'");
        assert_eq!(to_property_name("123"), "'123'");
        assert_eq!(to_property_name("it's"), "'it\\'s'");
    }

    #[test]
    fn test_literal_path_segments() {
        assert_eq!(to_path_segment("users", &[]), "users");
        assert_eq!(to_path_segment("phone-numbers", &[]), "phone-numbers");
        assert_eq!(to_path_segment("v1.json", &[]), "v1.json");
        assert_eq!(to_path_segment("a b:c", &[]), "a_b_c");
        assert_eq!(to_path_segment("..", &[]), "__");
        assert_eq!(to_path_segment(".", &[]), "_");
        assert_eq!(to_path_segment("...", &[]), "___");
        assert_eq!(to_path_segment("..x", &[]), "..x");
    }

    #[test]
    fn test_templated_path_segments_encode_kind() {
        let integer = [("id", Some(SchemaKind::Integer))];
        let string = [("id", Some(SchemaKind::String))];
        assert_eq!(to_path_segment("{id}", &integer), "_id@number");
        assert_eq!(to_path_segment("{id}", &string), "_id@string");
        assert_ne!(
            to_path_segment("{id}", &integer),
            to_path_segment("{id}", &string)
        );
    }

    #[test]
    fn test_templated_path_segment_defaults_to_string() {
        assert_eq!(to_path_segment("{user_id}", &[]), "_user_id@string");
        assert_eq!(to_path_segment("{user_id}", &[("user_id", None)]), "_user_id@string");
        assert_eq!(
            to_path_segment("{flag}", &[("flag", Some(SchemaKind::Boolean))]),
            "_flag@boolean"
        );
    }
}
