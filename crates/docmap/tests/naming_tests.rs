use docmap::naming::words;
use docmap::NamingPolicy;

#[test]
fn words_split_on_case_and_separators() {
    assert_eq!(words("firstName"), ["first", "name"]);
    assert_eq!(words("first_name"), ["first", "name"]);
    assert_eq!(words("first-name"), ["first", "name"]);
    assert_eq!(words("HTTPServer"), ["httpserver"]);
    assert_eq!(words("userID"), ["user", "id"]);
    assert_eq!(words("__private"), ["private"]);
}

#[test]
fn empty_identifier_yields_empty_key() {
    for policy in [
        NamingPolicy::None,
        NamingPolicy::CamelCase,
        NamingPolicy::PascalCase,
        NamingPolicy::SnakeCase,
        NamingPolicy::KebabCase,
    ] {
        assert_eq!(policy.to_tree_key(""), "", "{policy:?}");
    }
}

// ============================================================================
// to_tree_key
// ============================================================================

#[test]
fn snake_case() {
    assert_eq!(NamingPolicy::SnakeCase.to_tree_key("firstName"), "first_name");
    assert_eq!(NamingPolicy::SnakeCase.to_tree_key("first_name"), "first_name");
}

#[test]
fn kebab_case() {
    assert_eq!(NamingPolicy::KebabCase.to_tree_key("firstName"), "first-name");
}

#[test]
fn pascal_case() {
    assert_eq!(NamingPolicy::PascalCase.to_tree_key("firstName"), "FirstName");
    assert_eq!(NamingPolicy::PascalCase.to_tree_key("first_name"), "FirstName");
}

#[test]
fn camel_case() {
    assert_eq!(NamingPolicy::CamelCase.to_tree_key("first_name"), "firstName");
    assert_eq!(NamingPolicy::CamelCase.to_tree_key("FirstName"), "firstName");
}

#[test]
fn none_is_identity() {
    assert_eq!(NamingPolicy::None.to_tree_key("firstName"), "firstName");
    assert_eq!(NamingPolicy::None.to_tree_key("first_name"), "first_name");
}

// ============================================================================
// from_tree_key
// ============================================================================

#[test]
fn from_tree_key_finds_matching_candidate() {
    let candidates = ["id", "first_name", "last_name"];
    assert_eq!(
        NamingPolicy::CamelCase.from_tree_key("lastName", &candidates),
        "last_name"
    );
    assert_eq!(
        NamingPolicy::KebabCase.from_tree_key("first-name", &candidates),
        "first_name"
    );
}

#[test]
fn from_tree_key_falls_back_to_key() {
    let candidates = ["id"];
    assert_eq!(
        NamingPolicy::SnakeCase.from_tree_key("unknown_key", &candidates),
        "unknown_key"
    );
}

#[test]
fn from_tree_key_first_declared_wins() {
    let candidates = ["first_name", "firstName"];
    assert_eq!(
        NamingPolicy::SnakeCase.from_tree_key("first_name", &candidates),
        "first_name"
    );
    let reversed = ["firstName", "first_name"];
    assert_eq!(
        NamingPolicy::SnakeCase.from_tree_key("first_name", &reversed),
        "firstName"
    );
}

#[test]
fn policy_deserializes_from_snake_case_names() {
    let policy: NamingPolicy = serde_json::from_str("\"kebab_case\"").unwrap();
    assert_eq!(policy, NamingPolicy::KebabCase);
    assert_eq!(
        serde_json::to_string(&NamingPolicy::PascalCase).unwrap(),
        "\"pascal_case\""
    );
}
