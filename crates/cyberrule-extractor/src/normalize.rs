//! Value normalization
//!
//! Maps a raw value (a rule label or matched text) to the canonical
//! identifier used for classes and relation endpoints.
//!
//! - Vulnerability types follow CWE-style casing: the value is split into
//!   words at every capital letter, known acronyms are recased from the
//!   naming table (`SQL` -> `Sql`) and all other words are capitalized.
//!   `SQLInjection` and `SQL injection` both become `SqlInjection`.
//! - Products, components and privileges are title-cased per
//!   whitespace-delimited word with the rest of each word kept as-is, so
//!   `admin panel` becomes `AdminPanel` and `PaloAlto_PAN-OS` is unchanged.
//!
//! Only ASCII letters, digits, `-` and `_` survive. Normalization is
//! idempotent.

use cyberrule_core::{Category, NamingConfig};

/// Per-category identifier normalizer
#[derive(Debug, Clone)]
pub struct Normalizer {
    version: String,
    /// Acronym table, longest key first so the longest acronym wins
    acronyms: Vec<(String, String)>,
}

impl Normalizer {
    /// Create a normalizer from a naming table
    pub fn new(naming: &NamingConfig) -> Self {
        let mut acronyms: Vec<(String, String)> = naming
            .acronyms
            .iter()
            .filter(|(token, _)| !token.is_empty())
            .map(|(token, canonical)| (token.clone(), canonical.clone()))
            .collect();
        acronyms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            version: naming.version.clone(),
            acronyms,
        }
    }

    /// Version label of the naming table in use
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Normalize a raw value for the given category
    pub fn normalize(&self, raw: &str, category: Category) -> String {
        match category {
            Category::VulnerabilityType => self.normalize_vulnerability(raw),
            Category::Product | Category::Component | Category::Privilege => title_case(raw),
        }
    }

    fn normalize_vulnerability(&self, raw: &str) -> String {
        // Capitalize word starts before tokenizing, so joining words never
        // creates a capital that was not a word boundary.
        let mut joined = String::with_capacity(raw.len());
        for word in clean_words(raw) {
            let mut at_start = true;
            for c in word.chars() {
                if is_separator(c) {
                    joined.push(c);
                    at_start = true;
                } else if at_start {
                    joined.push(c.to_ascii_uppercase());
                    at_start = false;
                } else {
                    joined.push(c);
                }
            }
        }

        let mut out = String::with_capacity(joined.len());
        let mut pos = 0;
        while pos < joined.len() {
            let c = joined.as_bytes()[pos] as char;
            if is_separator(c) {
                out.push(c);
                pos += 1;
                continue;
            }

            let end = self.word_end(&joined, pos);
            let word = &joined[pos..end];
            match self.acronym(word) {
                Some(canonical) => out.push_str(canonical),
                None => push_capitalized(word, &mut out),
            }
            pos = end;
        }

        out
    }

    /// End of the word starting at `start`: a table acronym not followed by
    /// a lowercase letter, else everything up to the next capital or
    /// separator
    fn word_end(&self, s: &str, start: usize) -> usize {
        let rest = &s[start..];
        for (token, _) in &self.acronyms {
            if rest.starts_with(token.as_str()) {
                let next = rest[token.len()..].chars().next();
                if !next.is_some_and(|c| c.is_ascii_lowercase()) {
                    return start + token.len();
                }
            }
        }

        rest.char_indices()
            .skip(1)
            .find(|&(_, c)| c.is_ascii_uppercase() || is_separator(c))
            .map_or(s.len(), |(idx, _)| start + idx)
    }

    fn acronym(&self, word: &str) -> Option<&str> {
        self.acronyms
            .iter()
            .find(|(token, _)| token == word)
            .map(|(_, canonical)| canonical.as_str())
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NamingConfig::default())
    }
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_'
}

/// Whitespace-delimited words with every character outside
/// `[A-Za-z0-9_-]` removed; words left empty are dropped
fn clean_words(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || is_separator(*c))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
}

/// First letter upper, rest lower
fn push_capitalized(word: &str, out: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.extend(chars.map(|c| c.to_ascii_lowercase()));
    }
}

/// First letter of each word upper, rest unchanged, words joined
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in clean_words(raw) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vuln(raw: &str) -> String {
        Normalizer::default().normalize(raw, Category::VulnerabilityType)
    }

    #[test]
    fn test_vulnerability_acronyms() {
        assert_eq!(vuln("SQLInjection"), "SqlInjection");
        assert_eq!(vuln("SQL injection"), "SqlInjection");
        assert_eq!(vuln("XSS"), "Xss");
        assert_eq!(vuln("XPathInjection"), "XpathInjection");
        assert_eq!(vuln("OAuthBypass"), "OauthBypass");
        assert_eq!(vuln("LDAPInjection"), "LdapInjection");
    }

    #[test]
    fn test_vulnerability_camel_case_labels() {
        assert_eq!(vuln("CrossSiteScripting"), "CrossSiteScripting");
        assert_eq!(vuln("BufferOverflow"), "BufferOverflow");
        assert_eq!(vuln("use after free"), "UseAfterFree");
        assert_eq!(vuln("buffer overflow"), "BufferOverflow");
    }

    #[test]
    fn test_vulnerability_unknown_capital_runs_kept() {
        // Each capital starts a word; single letters stay capitalized
        assert_eq!(vuln("TOCTOU"), "TOCTOU");
        assert_eq!(vuln("DLLHijacking"), "DLLHijacking");
        assert_eq!(vuln("iOSJailbreak"), "IOSJailbreak");
    }

    #[test]
    fn test_vulnerability_separators_kept() {
        assert_eq!(vuln("cross-site scripting"), "Cross-SiteScripting");
        assert_eq!(vuln("heap_overflow"), "Heap_Overflow");
    }

    #[test]
    fn test_strips_special_characters() {
        assert_eq!(vuln("  SQL | injection!  "), "SqlInjection");
        assert_eq!(title_case("admin|panel (v2)"), "AdminpanelV2");
        assert_eq!(vuln("!!!"), "");
        assert_eq!(vuln(""), "");
    }

    #[test]
    fn test_title_case_categories() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize("admin panel", Category::Component), "AdminPanel");
        assert_eq!(normalizer.normalize("Apache", Category::Product), "Apache");
        assert_eq!(normalizer.normalize("macOS", Category::Product), "MacOS");
        assert_eq!(
            normalizer.normalize("PaloAlto_PAN-OS", Category::Product),
            "PaloAlto_PAN-OS"
        );
        assert_eq!(normalizer.normalize("root", Category::Privilege), "Root");
    }

    #[test]
    fn test_idempotent_on_labels() {
        let normalizer = Normalizer::default();
        for raw in [
            "SQL injection",
            "CrossSiteScripting",
            "iOSJailbreak",
            "cross-site scripting",
            "OAuth bypass",
            "XSS",
        ] {
            let once = normalizer.normalize(raw, Category::VulnerabilityType);
            let twice = normalizer.normalize(&once, Category::VulnerabilityType);
            assert_eq!(once, twice, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_custom_naming_table() {
        let mut naming = NamingConfig::default();
        naming.version = "test".to_string();
        naming.acronyms.insert("NVD".to_string(), "Nvd".to_string());

        let normalizer = Normalizer::new(&naming);
        assert_eq!(normalizer.version(), "test");
        assert_eq!(
            normalizer.normalize("NVDParsing", Category::VulnerabilityType),
            "NvdParsing"
        );
    }
}
