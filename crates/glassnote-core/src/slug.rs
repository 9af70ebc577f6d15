//! Identifier-safe keys from free-form display names.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Convert a display name into a lowercase, underscore-separated slug.
///
/// Accents are stripped through NFD decomposition, everything outside
/// `a-z`, `0-9` and whitespace is dropped, and whitespace runs become a
/// single `_`. Underscores in the input count as separators, so feeding a
/// slug back in returns it unchanged.
///
/// An empty result means the name has nothing usable.
///
/// ```
/// use glassnote_core::slug::slugify;
///
/// assert_eq!(slugify("José da Silva"), "jose_da_silva");
/// assert_eq!(slugify("  "), "");
/// ```
pub fn slugify(name: &str) -> String {
    let kept: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == '_' { ' ' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_joins_words() {
        assert_eq!(slugify("José da Silva"), "jose_da_silva");
        assert_eq!(slugify("ÉBÈNÉZER  Comércio\tLtda"), "ebenezer_comercio_ltda");
        assert_eq!(slugify("São João"), "sao_joao");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("Acme, Corp."), "acme_corp");
        assert_eq!(slugify("R&D (North)"), "rd_north");
        assert_eq!(slugify("CONSTRUMOURA"), "construmoura");
    }

    #[test]
    fn empty_when_nothing_legal_remains() {
        assert_eq!(slugify("  "), "");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ---"), "");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn underscores_are_separators() {
        assert_eq!(slugify("acme_corp"), "acme_corp");
        assert_eq!(slugify("_acme__corp_"), "acme_corp");
        assert_eq!(slugify("acme _ corp"), "acme_corp");
    }

    #[test]
    fn idempotent() {
        let names = [
            "José da Silva",
            "  leading and trailing  ",
            "Mixed_Case With-Hyphen",
            "Ünïcödé ñame 42",
            "a _ b",
            "___",
            "tab\tseparated\tname",
            "",
        ];
        for name in names {
            let once = slugify(name);
            assert_eq!(slugify(&once), once, "slug of {name:?} is not idempotent");
        }
    }
}
