//! Read seeder declarations out of PHP source text.
//!
//! A seeder is a concrete class inside a namespace carrying the marker
//! attribute:
//!
//! ```php
//! namespace Database\Seeders;
//!
//! use App\Modules\Auth\Seeders\RoleSeeder;
//!
//! #[Seeder(dependsOn: [RoleSeeder::class, 'Database\Seeders\TeamSeeder'])]
//! final class UserSeeder extends BaseSeeder { /* ... */ }
//! ```
//!
//! The source is never evaluated. Comments are blanked out first, then the
//! namespace, the top-level `use` imports and every attributed class
//! declaration are located with a small amount of bracket-aware scanning.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use seedgraph_core::identifier::{short_name, NameContext};
use seedgraph_core::unit::SeedUnit;

use crate::extractor::{ExtractError, MetadataExtractor};

/// Short name of the marker attribute.
pub const MARKER_ATTRIBUTE: &str = "Seeder";

/// Named argument carrying the dependency list.
const DEPENDS_ON_ARG: &str = "dependsOn";

static NAMESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bnamespace\s+([A-Za-z_\\][A-Za-z0-9_\\]*)\s*[;{]").expect("valid regex")
});

static USE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\buse\s+([^;]+);").expect("valid regex"));

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:(?:abstract|final|readonly)\s+)*)class\s+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid regex")
});

/// Extracts seeders from PHP classes tagged with `#[Seeder]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpAttributeExtractor;

impl MetadataExtractor for PhpAttributeExtractor {
    fn name(&self) -> &'static str {
        "php-attribute"
    }

    fn accepts(&self, _path: &Path) -> bool {
        true
    }

    fn extract(&self, path: &Path, source: &str) -> Result<Vec<SeedUnit>, ExtractError> {
        let code = strip_comments(source);
        let namespace = NAMESPACE_RE
            .captures(&code)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(ExtractError::NoNamespace)?;

        let classes = class_declarations(&code);
        let header_end = classes.first().map_or(code.len(), |c| c.start);
        let mut context = NameContext::new(namespace);
        parse_imports(&code[..header_end], &mut context);

        let attributes = attribute_blocks(&code)?;
        let mut units = Vec::new();
        for class in &classes {
            let attached = attached_attributes(&code, class.start, &attributes);
            let Some(args) = attached
                .iter()
                .copied()
                .find_map(|group| marker_arguments(group, &context))
            else {
                continue;
            };
            if class.is_abstract {
                tracing::debug!(
                    "Skipping abstract seeder {} in {}",
                    class.name,
                    path.display()
                );
                continue;
            }
            let identifier = context.resolve_class_ref(&class.name);
            let depends_on = dependency_list(args, &context);
            units.push(SeedUnit::new(identifier, depends_on).with_source(path));
        }
        Ok(units)
    }
}

/// A `class` declaration found in the source.
#[derive(Debug)]
struct ClassDecl {
    /// Offset of the first modifier (or of `class`).
    start: usize,
    name: String,
    is_abstract: bool,
}

/// An attribute group `#[...]`, as byte offsets into the source.
#[derive(Debug, Clone, Copy)]
struct AttributeBlock {
    start: usize,
    end: usize,
}

/// Replace comments with spaces, leaving string literals and attribute
/// groups intact and all byte offsets unchanged.
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\'' | b'"' => {
                let end = string_end(bytes, i);
                out.extend_from_slice(&bytes[i..end]);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find(bytes, i + 2, b"*/").map_or(bytes.len(), |p| p + 2);
                blank(&bytes[i..end], &mut out);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = line_end(bytes, i);
                blank(&bytes[i..end], &mut out);
                i = end;
            }
            b'#' if bytes.get(i + 1) != Some(&b'[') => {
                let end = line_end(bytes, i);
                blank(&bytes[i..end], &mut out);
                i = end;
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
    // Comment spans end on ASCII delimiters, so the result is still UTF-8.
    String::from_utf8(out).unwrap_or_default()
}

fn blank(span: &[u8], out: &mut Vec<u8>) {
    out.extend(span.iter().map(|&b| if b == b'\n' { b'\n' } else { b' ' }));
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| from + p)
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// Offset just past the string literal opening at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn class_declarations(code: &str) -> Vec<ClassDecl> {
    CLASS_RE
        .captures_iter(code)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let before = code[..whole.start()].trim_end();
            // `Foo::class` constants and `new class` anonymous classes
            if before.ends_with("::") || before.ends_with("new") {
                return None;
            }
            let name = caps.get(2)?.as_str();
            if matches!(name, "extends" | "implements") {
                return None;
            }
            let modifiers = caps.get(1).map_or("", |m| m.as_str());
            Some(ClassDecl {
                start: whole.start(),
                name: name.to_string(),
                is_abstract: modifiers.split_whitespace().any(|m| m == "abstract"),
            })
        })
        .collect()
}

/// Register the file-level `use` imports in `context`.
fn parse_imports(header: &str, context: &mut NameContext) {
    for caps in USE_RE.captures_iter(header) {
        let Some(clause) = caps.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        if clause.starts_with("function ") || clause.starts_with("const ") {
            continue;
        }
        match (clause.find('{'), clause.rfind('}')) {
            (Some(open), Some(close)) if open < close => {
                let prefix = clause[..open].trim().trim_end_matches('\\');
                for item in clause[open + 1..close].split(',') {
                    import_item(&format!("{prefix}\\{}", item.trim()), context);
                }
            }
            _ => {
                for item in clause.split(',') {
                    import_item(item, context);
                }
            }
        }
    }
}

fn import_item(item: &str, context: &mut NameContext) {
    let item = item.trim();
    if item.is_empty() || item.ends_with('\\') {
        return;
    }
    let mut parts = item.split_whitespace();
    let Some(qualified) = parts.next() else {
        return;
    };
    let alias = match (parts.next(), parts.next()) {
        (Some(kw), Some(alias)) if kw.eq_ignore_ascii_case("as") => Some(alias),
        _ => None,
    };
    context.import(qualified, alias);
}

/// Locate every `#[...]` attribute group.
fn attribute_blocks(code: &str) -> Result<Vec<AttributeBlock>, ExtractError> {
    let bytes = code.as_bytes();
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => i = string_end(bytes, i),
            b'#' if bytes.get(i + 1) == Some(&b'[') => {
                let end = matching_bracket(bytes, i + 1)
                    .ok_or(ExtractError::UnterminatedAttribute { offset: i })?;
                blocks.push(AttributeBlock { start: i, end: end + 1 });
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    Ok(blocks)
}

/// Offset of the bracket closing the one at `open`.
fn matching_bracket(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = string_end(bytes, i);
                continue;
            }
            b'[' | b'(' => depth += 1,
            b']' | b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Bodies (without `#[` and `]`) of the attribute groups directly in front
/// of the declaration starting at `decl_start`.
fn attached_attributes<'a>(
    code: &'a str,
    decl_start: usize,
    blocks: &[AttributeBlock],
) -> Vec<&'a str> {
    let mut bodies = Vec::new();
    let mut cursor = decl_start;
    loop {
        let trimmed_end = code[..cursor].trim_end().len();
        match blocks.iter().find(|b| b.end == trimmed_end) {
            Some(block) => {
                bodies.push(&code[block.start + 2..block.end - 1]);
                cursor = block.start;
            }
            None => break,
        }
    }
    bodies
}

/// Arguments of the marker attribute if `group` contains it: `Some("")`
/// for a bare `#[Seeder]`. Attribute names go through the file's imports,
/// so an aliased marker is recognized.
fn marker_arguments<'a>(group: &'a str, context: &NameContext) -> Option<&'a str> {
    split_top_level(group).into_iter().find_map(|attribute| {
        let attribute = attribute.trim();
        let (name, args) = match attribute.find('(') {
            Some(open) if attribute.ends_with(')') => {
                (&attribute[..open], &attribute[open + 1..attribute.len() - 1])
            }
            _ => (attribute, ""),
        };
        let resolved = context.resolve_class_ref(name.trim());
        (short_name(&resolved) == MARKER_ATTRIBUTE).then_some(args)
    })
}

/// Dependency identifiers declared in the marker's argument list.
fn dependency_list(args: &str, context: &NameContext) -> Vec<String> {
    let mut value = None;
    for (position, arg) in split_top_level(args).into_iter().enumerate() {
        match named_argument(arg) {
            Some((name, rest)) if name == DEPENDS_ON_ARG => {
                value = Some(rest);
                break;
            }
            Some(_) => {}
            None if position == 0 => value = Some(arg.trim()),
            None => {}
        }
    }
    let Some(value) = value else {
        return Vec::new();
    };

    let items = match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some(inner) => split_top_level(inner),
        None => vec![value],
    };
    items
        .into_iter()
        .filter_map(|item| dependency_name(item.trim(), context))
        .collect()
}

/// Split `name: value` named arguments. `Foo::class` is not one.
fn named_argument(arg: &str) -> Option<(&str, &str)> {
    let arg = arg.trim();
    let ident_len = arg
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(arg.len(), |(i, _)| i);
    if ident_len == 0 {
        return None;
    }
    let rest = arg[ident_len..].trim_start();
    let value = rest.strip_prefix(':')?;
    if value.starts_with(':') {
        return None;
    }
    Some((&arg[..ident_len], value.trim()))
}

fn dependency_name(item: &str, context: &NameContext) -> Option<String> {
    if item.is_empty() {
        return None;
    }
    if let Some(class) = item.strip_suffix("::class") {
        return Some(context.resolve_class_ref(class.trim()));
    }
    let quote = item.chars().next()?;
    if (quote == '\'' || quote == '"') && item.len() >= 2 && item.ends_with(quote) {
        let raw = item[1..item.len() - 1].replace("\\\\", "\\");
        return Some(context.resolve_string(&raw));
    }
    tracing::debug!("Ignoring unsupported dependency expression '{item}'");
    None
}

/// Split on commas that are not nested in brackets, parentheses or strings.
fn split_top_level(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = string_end(bytes, i);
                continue;
            }
            b'[' | b'(' | b'{' => depth += 1,
            b']' | b')' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&input[start..]);
    parts.retain(|p| !p.trim().is_empty());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Result<Vec<SeedUnit>, ExtractError> {
        PhpAttributeExtractor.extract(Path::new("Test.php"), source)
    }

    fn ids(units: &[SeedUnit]) -> Vec<&str> {
        units.iter().map(|u| u.identifier()).collect()
    }

    #[test]
    fn strip_comments_keeps_offsets_and_strings() {
        let src = "a // x\nb /* y */ c 'http://z' # q\n#[Seeder]";
        let out = strip_comments(src);
        assert_eq!(out.len(), src.len());
        assert!(out.contains("'http://z'"));
        assert!(out.contains("#[Seeder]"));
        assert!(!out.contains('x'));
        assert!(!out.contains('y'));
        assert!(!out.contains('q'));
    }

    #[test]
    fn split_top_level_respects_nesting() {
        let parts = split_top_level("a, [b, c], f(d, e), 'x,y'");
        assert_eq!(parts, vec!["a", " [b, c]", " f(d, e)", " 'x,y'"]);
    }

    #[test]
    fn named_argument_vs_class_constant() {
        assert_eq!(named_argument("dependsOn: [A::class]"), Some(("dependsOn", "[A::class]")));
        assert_eq!(named_argument("A::class"), None);
        assert_eq!(named_argument("[A::class]"), None);
    }

    #[test]
    fn bare_marker_has_no_dependencies() {
        let units = extract(
            "<?php\nnamespace Database\\Seeders;\n\n#[Seeder]\nclass RoleSeeder extends Seeder {}\n",
        )
        .unwrap();
        assert_eq!(ids(&units), vec!["Database\\Seeders\\RoleSeeder"]);
        assert!(units[0].is_root());
    }

    #[test]
    fn relative_qualified_and_imported_dependencies() {
        let src = r#"<?php
namespace Database\Seeders;

use App\Modules\Auth\Seeders\PermissionSeeder;
use App\Modules\Billing\{PlanSeeder, CouponSeeder as Coupons};

#[Seeder(dependsOn: [
    RoleSeeder::class,
    PermissionSeeder::class,
    Coupons::class,
    \Other\TeamSeeder::class,
    'App\Legacy\LegacySeeder',
    "Local",
])]
final class UserSeeder extends Seeder
{
    public function run(): void {}
}
"#;
        let units = extract(src).unwrap();
        assert_eq!(ids(&units), vec!["Database\\Seeders\\UserSeeder"]);
        assert_eq!(
            units[0].depends_on(),
            [
                "Database\\Seeders\\RoleSeeder",
                "App\\Modules\\Auth\\Seeders\\PermissionSeeder",
                "App\\Modules\\Billing\\CouponSeeder",
                "Other\\TeamSeeder",
                "App\\Legacy\\LegacySeeder",
                "Database\\Seeders\\Local",
            ]
        );
    }

    #[test]
    fn positional_list_argument() {
        let src = "<?php namespace App;\n#[Seeder([A::class, B::class])]\nclass C {}";
        let units = extract(src).unwrap();
        assert_eq!(units[0].depends_on(), ["App\\A", "App\\B"]);
    }

    #[test]
    fn fully_qualified_marker_and_sibling_attributes() {
        let src = "<?php namespace App;\n#[Other]\n#[\\App\\Attributes\\Seeder(dependsOn: A::class), Fast]\nclass C {}";
        let units = extract(src).unwrap();
        assert_eq!(ids(&units), vec!["App\\C"]);
        assert_eq!(units[0].depends_on(), ["App\\A"]);
    }

    #[test]
    fn aliased_marker_import() {
        let src = r#"<?php
namespace App\Seeders;

use App\Attributes\Seeder as SeedsAfter;

#[SeedsAfter(dependsOn: [RoleSeeder::class])]
class UserSeeder {}
"#;
        let units = extract(src).unwrap();
        assert_eq!(ids(&units), vec!["App\\Seeders\\UserSeeder"]);
        assert_eq!(units[0].depends_on(), ["App\\Seeders\\RoleSeeder"]);
    }

    #[test]
    fn untagged_and_abstract_classes_are_skipped() {
        let src = r#"<?php
namespace App\Seeders;

class Helper {}

#[Seeder]
abstract class BaseSeeder {}

#[Seeder(dependsOn: [Helper::class])]
class RealSeeder extends BaseSeeder {}
"#;
        let units = extract(src).unwrap();
        assert_eq!(ids(&units), vec!["App\\Seeders\\RealSeeder"]);
    }

    #[test]
    fn commented_out_marker_is_ignored() {
        let src = "<?php namespace App;\n// #[Seeder]\n/* #[Seeder] */\nclass C {}";
        assert!(extract(src).unwrap().is_empty());
    }

    #[test]
    fn class_constant_does_not_count_as_declaration() {
        let src = "<?php namespace App;\n#[Seeder(dependsOn: [B::class])]\nclass A { const X = B::class; }";
        let units = extract(src).unwrap();
        assert_eq!(ids(&units), vec!["App\\A"]);
    }

    #[test]
    fn missing_namespace_is_an_error() {
        let err = extract("<?php\n#[Seeder]\nclass Orphan {}").unwrap_err();
        assert!(matches!(err, ExtractError::NoNamespace));
    }

    #[test]
    fn unterminated_attribute_is_an_error() {
        let err = extract("<?php namespace App;\n#[Seeder(dependsOn: [A::class\nclass C {}").unwrap_err();
        assert!(matches!(err, ExtractError::UnterminatedAttribute { .. }));
    }

    #[test]
    fn records_source_path() {
        let units = PhpAttributeExtractor
            .extract(Path::new("/x/C.php"), "<?php namespace App; #[Seeder] class C {}")
            .unwrap();
        assert_eq!(units[0].source(), Some(Path::new("/x/C.php")));
    }
}
