//! Translation between native field identifiers and tree keys.

use serde::{Deserialize, Serialize};

/// Key naming convention applied to fields without an explicit name.
///
/// Identifiers are split into lowercase words at `_`, `-` and at every
/// lowercase→uppercase transition, then joined per policy:
///
/// | policy       | `first_name` / `firstName` |
/// |--------------|----------------------------|
/// | `None`       | unchanged                  |
/// | `CamelCase`  | `firstName`                |
/// | `PascalCase` | `FirstName`                |
/// | `SnakeCase`  | `first_name`               |
/// | `KebabCase`  | `first-name`               |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    #[default]
    None,
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
}

impl NamingPolicy {
    /// Render a native identifier as a tree key.
    pub fn to_tree_key(&self, ident: &str) -> String {
        match self {
            NamingPolicy::None => ident.to_string(),
            NamingPolicy::CamelCase => {
                let mut words = words(ident).into_iter();
                let mut key = words.next().unwrap_or_default();
                words.for_each(|w| key.push_str(&capitalize(&w)));
                key
            }
            NamingPolicy::PascalCase => words(ident).iter().map(|w| capitalize(w)).collect(),
            NamingPolicy::SnakeCase => words(ident).join("_"),
            NamingPolicy::KebabCase => words(ident).join("-"),
        }
    }

    /// Find the identifier among `candidates` whose tree key equals `key`.
    ///
    /// The first match wins. When nothing matches, `key` itself is returned.
    pub fn from_tree_key<'a>(&self, key: &'a str, candidates: &[&'a str]) -> &'a str {
        candidates
            .iter()
            .copied()
            .find(|candidate| self.to_tree_key(candidate) == key)
            .unwrap_or(key)
    }
}

/// Split an identifier into lowercase words.
pub fn words(ident: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;
    for c in ident.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = Some(c);
            continue;
        }
        if previous.is_some_and(char::is_lowercase) && c.is_uppercase() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
        previous = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
