//! Naming convention utilities for generated declarations.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `go-programming` | [`fragment`] | `GoProgramming` |
//! | `TagGoProgramming` | [`screaming_snake`] | `TAG_GO_PROGRAMMING` |
//! | `Category` | [`pluralize`] | `Categories` |
//! | `Person` | [`collection_name`] | `ALL_PEOPLE` |

/// Irregular English plurals, checked before the suffix rules
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("datum", "data"),
    ("index", "indices"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
];

/// Convert an arbitrary display string into a declaration-name fragment.
///
/// Splits on every run of non-alphanumeric characters, uppercases the first letter of
/// each piece and lowercases the rest.
///
/// # Examples
///
/// ```
/// use structgen_codegen::naming::fragment;
///
/// assert_eq!(fragment("go-programming"), "GoProgramming");
/// assert_eq!(fragment("Hello, WORLD!"), "HelloWorld");
/// assert_eq!(fragment("--"), "");
/// ```
pub fn fragment(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut out = String::with_capacity(word.len());
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
            }
            out.push_str(&chars.as_str().to_ascii_lowercase());
            out
        })
        .collect()
}

/// Split a PascalCase (or separator-delimited) name into its words.
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();

    for part in s.split(|c: char| !c.is_ascii_alphanumeric()) {
        let chars: Vec<char> = part.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && c.is_ascii_uppercase() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                let boundary = prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower);
                if boundary && !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }

        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

/// Convert a name to SCREAMING_SNAKE_CASE.
///
/// # Examples
///
/// ```
/// use structgen_codegen::naming::screaming_snake;
///
/// assert_eq!(screaming_snake("TagGoProgramming"), "TAG_GO_PROGRAMMING");
/// assert_eq!(screaming_snake("HTTPServer"), "HTTP_SERVER");
/// assert_eq!(screaming_snake("PostT1"), "POST_T1");
/// ```
pub fn screaming_snake(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Build a valid `static`/`const` item name from a prefix and parts.
///
/// Empty results become `UNNAMED`, and names starting with a digit get a leading underscore.
pub fn declaration_name(parts: &[&str]) -> String {
    let name = screaming_snake(&parts.concat());
    match name.chars().next() {
        None => "UNNAMED".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{name}"),
        Some(_) => name,
    }
}

/// Deterministic English pluralization.
///
/// Irregular nouns win first; then `s`/`x`/`z`/`sh`/`ch` take `es`, consonant + `y`
/// becomes `ies`, and everything else takes `s`. Only the last word of a PascalCase
/// name is inflected.
///
/// # Examples
///
/// ```
/// use structgen_codegen::naming::pluralize;
///
/// assert_eq!(pluralize("Tag"), "Tags");
/// assert_eq!(pluralize("BlogEntry"), "BlogEntries");
/// assert_eq!(pluralize("Person"), "People");
/// assert_eq!(pluralize("Box"), "Boxes");
/// ```
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let all_words = words(word);
    let last = all_words
        .last()
        .map(String::as_str)
        .filter(|last| word.ends_with(last))
        .unwrap_or(word);
    let stem = &word[..word.len() - last.len()];
    let lower = last.to_ascii_lowercase();

    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(s, _)| *s == lower) {
        return format!("{stem}{}", match_case(last, plural));
    }

    let plural = if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("sh")
        || lower.ends_with("ch")
    {
        format!("{last}es")
    } else if ends_with_consonant_y(&lower) {
        format!("{}ies", &last[..last.len() - 1])
    } else {
        format!("{last}s")
    };

    format!("{stem}{plural}")
}

fn ends_with_consonant_y(lower: &str) -> bool {
    let mut rev = lower.chars().rev();
    match (rev.next(), rev.next()) {
        (Some('y'), Some(prev)) => !matches!(prev, 'a' | 'e' | 'i' | 'o' | 'u'),
        _ => false,
    }
}

/// Give `replacement` the capitalization style of `original`
fn match_case(original: &str, replacement: &str) -> String {
    if original.len() > 1 && original.chars().all(|c| !c.is_ascii_lowercase()) {
        return replacement.to_ascii_uppercase();
    }
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(o), Some(first)) if o.is_ascii_uppercase() => {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        }
        _ => replacement.to_string(),
    }
}

/// Name of the "all records" collection for a record type.
///
/// # Examples
///
/// ```
/// use structgen_codegen::naming::collection_name;
///
/// assert_eq!(collection_name("Tag"), "ALL_TAGS");
/// assert_eq!(collection_name("Category"), "ALL_CATEGORIES");
/// ```
pub fn collection_name(type_name: &str) -> String {
    declaration_name(&["All", &pluralize(type_name)])
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test_case("go-programming", "GoProgramming")]
    #[test_case("t1", "T1")]
    #[test_case("Hello World", "HelloWorld")]
    #[test_case("ALLCAPS", "Allcaps")]
    #[test_case("  spaced  out  ", "SpacedOut")]
    #[test_case("café au lait", "CafAuLait" ; "non ascii separates")]
    #[test_case("", "" ; "empty")]
    #[test_case("!!!", "" ; "only separators")]
    fn fragment___input___converts(input: &str, expected: &str) {
        assert_eq!(fragment(input), expected);
    }

    #[test_case("Tag", "TAG")]
    #[test_case("TagGoProgramming", "TAG_GO_PROGRAMMING")]
    #[test_case("BlogPost", "BLOG_POST")]
    #[test_case("HTTPServer", "HTTP_SERVER")]
    #[test_case("Post2024Recap", "POST2024_RECAP")]
    #[test_case("my-prefix", "MY_PREFIX")]
    #[test_case("ALL", "ALL")]
    fn screaming_snake___input___converts(input: &str, expected: &str) {
        assert_eq!(screaming_snake(input), expected);
    }

    #[test]
    fn declaration_name___joins_parts() {
        assert_eq!(declaration_name(&["Tag", "T1", "Id"]), "TAG_T1_ID");
    }

    #[test]
    fn declaration_name___leading_digit___prefixed_with_underscore() {
        assert_eq!(declaration_name(&["", "2024"]), "_2024");
    }

    #[test]
    fn declaration_name___empty___placeholder_name() {
        assert_eq!(declaration_name(&["", ""]), "UNNAMED");
    }

    #[test_case("Tag", "Tags")]
    #[test_case("Bus", "Buses")]
    #[test_case("Box", "Boxes")]
    #[test_case("Quiz", "Quizes")]
    #[test_case("Dish", "Dishes")]
    #[test_case("Match", "Matches")]
    #[test_case("Category", "Categories")]
    #[test_case("Day", "Days")]
    #[test_case("Person", "People")]
    #[test_case("Child", "Children")]
    #[test_case("Datum", "Data")]
    #[test_case("Index", "Indices")]
    #[test_case("Mouse", "Mice")]
    #[test_case("SalesPerson", "SalesPeople")]
    #[test_case("BlogEntry", "BlogEntries")]
    #[test_case("person", "people" ; "lowercase irregular")]
    #[test_case("", "" ; "empty")]
    fn pluralize___word___inflects(input: &str, expected: &str) {
        assert_eq!(pluralize(input), expected);
    }

    #[test_case("Tag", "ALL_TAGS")]
    #[test_case("Author", "ALL_AUTHORS")]
    #[test_case("Person", "ALL_PEOPLE")]
    #[test_case("BlogEntry", "ALL_BLOG_ENTRIES")]
    fn collection_name___type___prefixed_plural(input: &str, expected: &str) {
        assert_eq!(collection_name(input), expected);
    }
}
