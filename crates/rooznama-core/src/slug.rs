//! Slug normalization
//!
//! Turns an article title into a URL-safe base slug. Titles in Perso-Arabic
//! script keep their script (Persian slugs are served percent-encoded by the
//! host); Latin titles are lowercased and reduced to ASCII. Uniqueness within
//! a language partition is the allocator's job, not this module's.

/// Cleaned titles are truncated to this many characters before slugging.
const MAX_TITLE_CHARS: usize = 50;

/// Hard cap on the final slug length.
const MAX_SLUG_CHARS: usize = 100;

/// Whether the text contains Perso-Arabic script characters.
pub fn is_persian(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Derive the base slug for a title. Returns `None` when nothing usable
/// remains after cleanup (empty or markup-only titles).
pub fn base_slug(title: &str) -> Option<String> {
    let cleaned = clean_title(title);
    if cleaned.is_empty() {
        return None;
    }

    let short: String = cleaned.chars().take(MAX_TITLE_CHARS).collect();
    let short = short.trim();

    let slug = if is_persian(short) {
        slugify_persian(short)
    } else {
        slugify_latin(short)
    };

    if slug.is_empty() {
        return None;
    }

    Some(slug.chars().take(MAX_SLUG_CHARS).collect())
}

/// Strip markup and feed-generator artifacts from a raw title.
fn clean_title(title: &str) -> String {
    let mut text = strip_tags(title);

    while let Some(rest) = text.strip_prefix('#') {
        text = rest.to_string();
    }
    text = text.replace("...", "").replace('\u{2026}', "");

    text.trim().to_string()
}

/// Remove `<...>` tag spans, replacing each with a space.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Slugify Perso-Arabic text: normalize Arabic variants to Persian forms,
/// drop diacritics, map digits to ASCII, and hyphenate separators (including
/// the zero-width non-joiner).
fn slugify_persian(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            // Arabic yeh / kaf to their Persian forms
            '\u{064A}' => out.push('\u{06CC}'),
            '\u{0643}' => out.push('\u{06A9}'),
            // Harakat and tatweel carry no slug information
            '\u{064B}'..='\u{0652}' | '\u{0640}' => {}
            // ZWNJ joins compound words; a hyphen keeps them readable
            '\u{200C}' => out.push('-'),
            // Perso-Arabic digits to ASCII
            '\u{06F0}'..='\u{06F9}' => {
                out.push(char::from(b'0' + (c as u32 - 0x06F0) as u8));
            }
            '\u{0660}'..='\u{0669}' => {
                out.push(char::from(b'0' + (c as u32 - 0x0660) as u8));
            }
            c if is_arabic_script(c) || c.is_ascii_alphanumeric() => {
                out.push(c.to_ascii_lowercase());
            }
            _ => out.push('-'),
        }
    }
    collapse_hyphens(&out)
}

/// Slugify Latin text: lowercase ASCII alphanumerics, everything else
/// becomes a hyphen.
fn slugify_latin(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push('-');
        }
    }
    collapse_hyphens(&out)
}

fn is_arabic_script(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

fn collapse_hyphens(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_hyphen = false;
    for c in input.chars() {
        if c == '-' {
            if !prev_hyphen && !out.is_empty() {
                out.push('-');
            }
            prev_hyphen = true;
        } else {
            out.push(c);
            prev_hyphen = false;
        }
    }
    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persian_title_keeps_script() {
        let slug = base_slug("اخبار بورس امروز").unwrap();
        assert_eq!(slug, "اخبار-بورس-امروز");
    }

    #[test]
    fn test_latin_title_lowercased_and_hyphenated() {
        let slug = base_slug("Breaking News: Markets Rally!").unwrap();
        assert_eq!(slug, "breaking-news-markets-rally");
    }

    #[test]
    fn test_arabic_variants_normalized() {
        // Arabic yeh and kaf become Persian yeh and kaf
        let slug = base_slug("كيهان").unwrap();
        assert_eq!(slug, "کیهان");
    }

    #[test]
    fn test_zwnj_becomes_hyphen() {
        let slug = base_slug("می\u{200C}شود").unwrap();
        assert_eq!(slug, "می-شود");
    }

    #[test]
    fn test_persian_digits_become_ascii() {
        let slug = base_slug("سال ۱۴۰۳").unwrap();
        assert_eq!(slug, "سال-1403");
    }

    #[test]
    fn test_markup_and_artifacts_stripped() {
        let slug = base_slug("### <h1>Top Story</h1>...").unwrap();
        assert_eq!(slug, "top-story");
    }

    #[test]
    fn test_empty_and_markup_only_titles() {
        assert!(base_slug("").is_none());
        assert!(base_slug("   ").is_none());
        assert!(base_slug("<h1></h1>").is_none());
        assert!(base_slug("!!!").is_none());
    }

    #[test]
    fn test_long_title_truncated() {
        let title = "word ".repeat(40);
        let slug = base_slug(&title).unwrap();
        assert!(slug.chars().count() <= 100);
        assert!(slug.starts_with("word-word"));
    }

    #[test]
    fn test_consecutive_separators_collapse() {
        let slug = base_slug("a  --  b").unwrap();
        assert_eq!(slug, "a-b");
    }
}
