//! Deterministic SEO algorithm (Tier 2)
//!
//! Pure functions deriving meta title, meta description, and keywords from
//! the article text. All length arithmetic is in characters, not bytes —
//! Persian text is multi-byte throughout.

use regex::Regex;
use std::sync::LazyLock;

use rooznama_core::constants::{
    META_DESCRIPTION_MAX, META_DESCRIPTION_MIN, META_TITLE_MAX, META_TITLE_MIN,
};
use rooznama_core::models::Language;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Common words that carry no keyword signal.
const STOP_WORDS: &[&str] = &[
    // Persian
    "این", "که", "از", "به", "در", "با", "برای", "یا", "هم", "همه", "یک", "دو", "سه",
    "چهار", "پنج", "است", "بود", "شد", "می", "را",
    // English
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
    "by", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does",
    "did", "can", "could", "will", "would", "should", "may", "might", "must",
];

/// Replace markup with spaces and collapse the result.
pub fn strip_html(input: &str) -> String {
    let text = TAG_RE.replace_all(input, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Accumulate whole words until the budget runs out.
fn take_words(text: &str, max_chars: usize) -> String {
    let mut result = String::new();
    for word in text.split_whitespace() {
        let candidate_len = char_len(&result) + char_len(word) + usize::from(!result.is_empty());
        if candidate_len > max_chars {
            break;
        }
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

/// Build an optimized meta title (target 55-60 characters): the cleaned
/// title, shortened on a word boundary when long, topped up with the main
/// keyword when short.
pub fn meta_title(title: &str, main_keywords: &[String]) -> String {
    let mut clean = strip_html(title);

    if char_len(&clean) > META_TITLE_MAX {
        // Prefer a whole leading sentence when one fits
        let first = clean
            .split(|c| c == '.' || c == ':')
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        clean = if !first.is_empty() && char_len(&first) <= META_TITLE_MAX {
            first
        } else {
            let taken = take_words(&clean, META_TITLE_MAX - 3);
            if taken.is_empty() {
                truncate_chars(&clean, META_TITLE_MAX - 3)
            } else {
                taken
            }
        };
    }

    if char_len(&clean) < META_TITLE_MIN {
        if let Some(keyword) = main_keywords.first() {
            let candidate = format!("{} | {}", clean, keyword);
            if char_len(&candidate) <= META_TITLE_MAX {
                clean = candidate;
            }
        }
    }

    if char_len(&clean) > META_TITLE_MAX {
        clean = format!("{}...", truncate_chars(&clean, META_TITLE_MAX - 3));
    }

    clean
}

/// Normalize a candidate description into the 140-155 character window:
/// pad a short one with a missing keyword and a read-more suffix, cut a long
/// one on a sentence boundary.
pub fn optimize_description(
    description: &str,
    main_keywords: &[String],
    language: Language,
) -> String {
    let mut clean = strip_html(description);

    if char_len(&clean) < META_DESCRIPTION_MIN {
        let missing = main_keywords.iter().find(|kw| {
            !clean.to_lowercase().contains(&kw.to_lowercase())
        });
        if let Some(keyword) = missing {
            let candidate = format!("{} | {}", clean, keyword);
            if char_len(&candidate) <= META_DESCRIPTION_MAX {
                clean = candidate;
            }
        }

        if char_len(&clean) < META_DESCRIPTION_MIN {
            let suffix = match language {
                Language::Fa => " آخرین جزئیات را اینجا بخوانید.",
                Language::En => " Read more details here.",
            };
            let candidate = format!("{}{}", clean, suffix);
            if char_len(&candidate) <= META_DESCRIPTION_MAX {
                clean = candidate;
            }
        }
    }

    if char_len(&clean) > META_DESCRIPTION_MAX {
        let mut result = String::new();
        for sentence in clean.split_inclusive(['.', '!', '?']) {
            if char_len(&result) + char_len(sentence) > META_DESCRIPTION_MAX - 3 {
                break;
            }
            result.push_str(sentence);
        }
        let result = result.trim().to_string();
        clean = if result.is_empty() {
            format!("{}...", take_words(&clean, META_DESCRIPTION_MAX - 3))
        } else {
            result
        };
    }

    clean
}

/// Derive a meta description from the body: prefer a sentence carrying a
/// main keyword, fall back to the opening of the text.
pub fn meta_description(content: &str, main_keywords: &[String], language: Language) -> String {
    let text = strip_html(content);

    let mut best: Option<&str> = None;
    for sentence in text.split_inclusive(['.', '!', '?']) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let lower = sentence.to_lowercase();
        if main_keywords
            .iter()
            .any(|kw| lower.contains(&kw.to_lowercase()))
        {
            let len = char_len(sentence);
            if (META_DESCRIPTION_MIN..=META_DESCRIPTION_MAX).contains(&len) {
                return sentence.to_string();
            }
            if best.map_or(true, |b| char_len(b) < len) {
                best = Some(sentence);
            }
        }
    }

    let candidate = best
        .map(|s| s.to_string())
        .unwrap_or_else(|| take_words(&text, META_DESCRIPTION_MAX));

    optimize_description(&candidate, main_keywords, language)
}

/// The leading keywords used to weight titles and descriptions: supplied
/// keywords first, then words from the title.
pub fn main_keywords(supplied: &[String], title: &str) -> Vec<String> {
    if !supplied.is_empty() {
        return supplied.iter().take(3).cloned().collect();
    }

    strip_html(title)
        .split_whitespace()
        .filter(|w| char_len(w) >= 3)
        .take(3)
        .map(|w| w.to_string())
        .collect()
}

/// Frequency-ranked terms from the text, stop-words and already-known
/// keywords removed.
pub fn extract_keywords(text: &str, known: &[String], limit: usize) -> Vec<String> {
    let clean = strip_html(text).to_lowercase();
    let known_lower: Vec<String> = known.iter().map(|k| k.to_lowercase()).collect();

    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in clean.split_whitespace() {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        if char_len(&word) < 3 || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        if known_lower
            .iter()
            .any(|kw| kw.contains(&word) || word.contains(kw.as_str()))
        {
            continue;
        }
        match counts.iter_mut().find(|(w, _)| *w == word) {
            Some((_, n)) => *n += 1,
            None => counts.push((word, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(w, _)| w).collect()
}

/// Combine main keywords with extracted terms into the delimited
/// `meta_keywords` string.
pub fn keyword_string(main: &[String], extracted: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for kw in main.iter().chain(extracted.iter()) {
        let kw = kw.trim();
        if !kw.is_empty() && !seen.contains(&kw) {
            seen.push(kw);
        }
    }
    seen.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <b>world</b></p>"),
            "Hello world"
        );
    }

    #[test]
    fn test_meta_title_short_title_gets_keyword() {
        let title = meta_title("Short title", &["markets".to_string()]);
        assert_eq!(title, "Short title | markets");
    }

    #[test]
    fn test_meta_title_never_exceeds_limit() {
        let long = "word ".repeat(30);
        let title = meta_title(&long, &[]);
        assert!(title.chars().count() <= 60);
    }

    #[test]
    fn test_meta_title_persian_counts_chars_not_bytes() {
        let long = "خبر ".repeat(30);
        let title = meta_title(&long, &[]);
        assert!(title.chars().count() <= 60);
    }

    #[test]
    fn test_description_within_snippet_bound() {
        let content = format!("<p>{}</p>", "sentence about markets. ".repeat(30));
        let desc = meta_description(&content, &["markets".to_string()], Language::En);
        assert!(desc.chars().count() <= 155, "got {}", desc.chars().count());
        assert!(!desc.is_empty());
    }

    #[test]
    fn test_short_description_padded() {
        let desc = optimize_description("Tiny.", &["bourse".to_string()], Language::En);
        assert!(desc.contains("bourse") || desc.contains("Read more"));
    }

    #[test]
    fn test_main_keywords_prefers_supplied() {
        let supplied = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        assert_eq!(main_keywords(&supplied, "Some title"), supplied[..3].to_vec());
        assert_eq!(
            main_keywords(&[], "Tehran stock exchange news"),
            vec!["Tehran", "stock", "exchange"]
        );
    }

    #[test]
    fn test_extract_keywords_skips_stop_words() {
        let text = "the markets markets markets rally rally with the the bonds";
        let extracted = extract_keywords(text, &[], 5);
        assert_eq!(extracted[0], "markets");
        assert_eq!(extracted[1], "rally");
        assert!(!extracted.contains(&"the".to_string()));
        assert!(!extracted.contains(&"with".to_string()));
    }

    #[test]
    fn test_keyword_string_dedupes() {
        let main = vec!["bourse".to_string(), "tehran".to_string()];
        let extracted = vec!["tehran".to_string(), "index".to_string()];
        assert_eq!(keyword_string(&main, &extracted), "bourse, tehran, index");
    }
}
