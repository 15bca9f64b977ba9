//! Canonical identifier handling.
//!
//! Seed units are compared by exact string equality, so every name is
//! normalized to its fully-qualified form (`Database\Seeders\UserSeeder`,
//! no leading separator) before it reaches the resolver.

use std::collections::BTreeMap;

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Join `name` onto `namespace`, or strip the leading separator if `name`
/// is already fully qualified.
pub fn qualify(namespace: &str, name: &str) -> String {
    let name = name.trim();
    if let Some(absolute) = name.strip_prefix(NAMESPACE_SEPARATOR) {
        return absolute.to_string();
    }
    let namespace = namespace.trim_matches(NAMESPACE_SEPARATOR);
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}{NAMESPACE_SEPARATOR}{name}")
    }
}

/// Last segment of a qualified name (`UserSeeder` for `App\UserSeeder`).
pub fn short_name(identifier: &str) -> &str {
    identifier
        .rsplit(NAMESPACE_SEPARATOR)
        .next()
        .unwrap_or(identifier)
}

/// The namespace and imports in effect where a name is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameContext {
    namespace: String,
    /// Alias -> fully-qualified name.
    imports: BTreeMap<String, String>,
}

impl NameContext {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().trim_matches(NAMESPACE_SEPARATOR).to_string(),
            imports: BTreeMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Register an import. Without an alias the last segment is used.
    pub fn import(&mut self, qualified: &str, alias: Option<&str>) {
        let qualified = qualified.trim().trim_start_matches(NAMESPACE_SEPARATOR);
        let alias = alias.unwrap_or_else(|| short_name(qualified));
        self.imports.insert(alias.to_string(), qualified.to_string());
    }

    /// Resolve a class reference (`Name::class`): the first segment goes
    /// through the imports, otherwise the name is namespace-relative.
    pub fn resolve_class_ref(&self, name: &str) -> String {
        let name = name.trim();
        if name.starts_with(NAMESPACE_SEPARATOR) {
            return qualify("", name);
        }
        let (head, rest) = match name.split_once(NAMESPACE_SEPARATOR) {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        match (self.imports.get(head), rest) {
            (Some(target), Some(rest)) => format!("{target}{NAMESPACE_SEPARATOR}{rest}"),
            (Some(target), None) => target.clone(),
            (None, _) => qualify(&self.namespace, name),
        }
    }

    /// Resolve a quoted name: anything containing a separator is taken as
    /// fully qualified, a bare name is namespace-relative.
    pub fn resolve_string(&self, name: &str) -> String {
        let name = name.trim();
        if name.contains(NAMESPACE_SEPARATOR) {
            qualify("", name.trim_start_matches(NAMESPACE_SEPARATOR))
        } else {
            qualify(&self.namespace, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualify_relative_name() {
        assert_eq!(
            qualify("Database\\Seeders", "UserSeeder"),
            "Database\\Seeders\\UserSeeder"
        );
    }

    #[test]
    fn qualify_absolute_name_strips_separator() {
        assert_eq!(qualify("Database\\Seeders", "\\App\\Roles"), "App\\Roles");
    }

    #[test]
    fn qualify_global_namespace() {
        assert_eq!(qualify("", "UserSeeder"), "UserSeeder");
    }

    #[test]
    fn short_name_of_qualified() {
        assert_eq!(short_name("App\\Seeders\\UserSeeder"), "UserSeeder");
        assert_eq!(short_name("UserSeeder"), "UserSeeder");
    }
}
