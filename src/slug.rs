// src/slug.rs
// =============================================================================
// Builds the URL slug of an article from its title.
//
// Rule: lower-case the title, turn every run of characters outside a-z/0-9
// into a single '-', then drop a leading or trailing '-'.
//
//   "¿Qué es Bitcoin? Guía 2024" -> "qu-es-bitcoin-gu-a-2024"
//
// Accented letters are not transliterated; they count as separators.
// =============================================================================

pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_collapses_and_trims_separators() {
        assert_eq!(slugify("  --Rust  &  AI!!  "), "rust-ai");
    }

    #[test]
    fn test_accents_are_separators() {
        assert_eq!(slugify("¿Qué es Bitcoin? Guía 2024"), "qu-es-bitcoin-gu-a-2024");
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("¿¡!?"), "");
    }
}
