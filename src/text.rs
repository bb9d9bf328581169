//! Text normalization for titles and artist names.
//!
//! The catalog mixes Cyrillic and Latin titles, and bilingual entries often
//! carry a redundant translated duplicate in parentheses ("Песня (Song)").
//! The heuristics here keep meaningful qualifiers like "(Remix)" while
//! stripping those duplicates. All functions map absent input to absent
//! output; nothing here ever fails.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Parenthesized qualifiers that are kept even on bilingual titles.
const KEEP_KEYWORDS: &[&str] = &[
    "freestyle", "spedup", "sped up", "speedup", "speed up", "slowed", "reverb", "leak", "remix",
    "cover", "bonus",
];

/// Role/language tags stripped from artist names: "(rus)", "(prod)", "(2)", ...
static ARTIST_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\((rus|ru|ukr|uk|prod|producer|0|1|2|3)\)").unwrap());

fn is_cyrillic(c: char) -> bool {
    let lower = c.to_lowercase().next().unwrap_or(c);
    ('а'..='я').contains(&lower) || lower == 'ё'
}

fn has_cyrillic(s: &str) -> bool {
    s.chars().any(is_cyrillic)
}

/// Basic cleanup shared by every text field: trim, drop zero-width spaces,
/// collapse the escaped non-breaking-space literal (payloads arrive
/// double-escaped) and the typographic apostrophe.
pub fn clean(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    Some(
        raw.replace('\u{200b}', "")
            .replace("\\xa0", " ")
            .replace('\u{a0}', " ")
            .replace('’', "'")
            .trim()
            .to_string(),
    )
}

/// Decide what to do with a parenthesized suffix.
///
/// A Cyrillic prefix marks a bilingual catalog entry: the suffix is kept
/// only when it is itself Cyrillic or one of the known qualifiers
/// ("remix", "slowed", ...). Titles without a Cyrillic prefix always lose
/// the suffix.
fn strip_or_keep_paren_suffix(text: &str) -> String {
    let Some(open) = text.find('(') else {
        return text.to_string();
    };

    let keep = has_cyrillic(&text[..open])
        && text
            .find(')')
            .filter(|close| *close > open)
            .map(|close| {
                let inner = text[open + 1..close].to_lowercase();
                has_cyrillic(&inner) || KEEP_KEYWORDS.iter().any(|k| inner.contains(k))
            })
            .unwrap_or(false);

    if keep {
        let close = text.find(')').unwrap();
        text[..=close].to_string()
    } else if let Some(pos) = text.rfind(" (") {
        text[..pos].to_string()
    } else {
        text[..open].trim_end().to_string()
    }
}

/// Normalize a track or album title.
pub fn clean_title(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    let title = strip_or_keep_paren_suffix(raw);
    clean(Some(&title))
}

/// Normalize a multi-artist string.
///
/// Splits "A, B & C" into individual names, strips role/language tags,
/// applies the parenthesis heuristic per artist and re-joins in the same
/// "A, B & C" list style.
pub fn clean_artists(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    let mut artists: Vec<String> = match raw.split_once(" & ") {
        Some((head, last)) => head
            .split(", ")
            .map(str::to_string)
            .chain([last.to_string()])
            .collect(),
        None => vec![raw.to_string()],
    };

    for artist in &mut artists {
        let untagged = ARTIST_TAG.replace_all(artist, "").into_owned();
        *artist = strip_or_keep_paren_suffix(&untagged);
    }

    let joined = match artists.split_last() {
        Some((last, head)) if !head.is_empty() => format!("{} & {}", head.join(", "), last),
        _ => artists[0].clone(),
    };

    clean(Some(&joined))
}

/// Display string for a track's credited artists: "A feat. B, C & D".
pub fn artists_to_str(primary: Option<&str>, featured: &[&str]) -> Option<String> {
    let primary = primary?;

    if featured.is_empty() {
        return Some(primary.to_string());
    }

    let featured = match featured.split_last() {
        Some((last, head)) if !head.is_empty() => format!("{} & {}", head.join(", "), last),
        _ => featured[0].to_string(),
    };

    Some(format!("{primary} feat. {featured}"))
}

/// Strip the query-string tail from an image URL.
pub fn parse_photo(url: Option<&str>) -> Option<String> {
    let url = url?;
    if url.is_empty() {
        return None;
    }

    Some(match url.rfind('?') {
        Some(pos) => url[..pos].to_string(),
        None => url.to_string(),
    })
}

/// Prefix `https://` when the URL carries no scheme.
pub fn https_url(url: &str) -> String {
    if url.contains("https://") || url.contains("http://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Unix seconds to a naive UTC timestamp. Out-of-range values yield absent.
pub fn unix_to_datetime(seconds: i64) -> Option<NaiveDateTime> {
    chrono::DateTime::from_timestamp(seconds, 0).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_absent() {
        assert_eq!(clean(None), None);
        assert_eq!(clean(Some("")), None);
    }

    #[test]
    fn test_clean_strips_zero_width_space() {
        assert_eq!(clean(Some("  a\u{200b}b ")), Some("ab".to_string()));
    }

    #[test]
    fn test_clean_replaces_escaped_nbsp_literal() {
        assert_eq!(clean(Some(r"a\xa0b")), Some("a b".to_string()));
    }

    #[test]
    fn test_clean_normalizes_apostrophe() {
        assert_eq!(clean(Some("don’t")), Some("don't".to_string()));
    }

    #[test]
    fn test_title_keeps_cyrillic_suffix() {
        assert_eq!(
            clean_title(Some("Песня (Ремикс)")),
            Some("Песня (Ремикс)".to_string())
        );
    }

    #[test]
    fn test_title_keeps_keyword_suffix_on_cyrillic_prefix() {
        assert_eq!(
            clean_title(Some("Песня (Remix)")),
            Some("Песня (Remix)".to_string())
        );
        assert_eq!(
            clean_title(Some("Девочка (sped up)")),
            Some("Девочка (sped up)".to_string())
        );
    }

    #[test]
    fn test_title_strips_translated_duplicate() {
        assert_eq!(
            clean_title(Some("Песня (Song)")),
            Some("Песня".to_string())
        );
    }

    #[test]
    fn test_title_strips_suffix_on_latin_prefix() {
        assert_eq!(clean_title(Some("Song (Remix)")), Some("Song".to_string()));
    }

    #[test]
    fn test_title_without_parens_untouched() {
        assert_eq!(
            clean_title(Some("Plain Title")),
            Some("Plain Title".to_string())
        );
    }

    #[test]
    fn test_title_keeps_text_after_kept_suffix_out() {
        // Truncates after the closing paren, dropping any tail.
        assert_eq!(
            clean_title(Some("Песня (Ремикс) official")),
            Some("Песня (Ремикс)".to_string())
        );
    }

    #[test]
    fn test_artists_strip_role_tags() {
        assert_eq!(
            clean_artists(Some("MORGENSHTERN (prod)")),
            Some("MORGENSHTERN".to_string())
        );
        assert_eq!(clean_artists(Some("Imanbek (RUS)")), Some("Imanbek".to_string()));
    }

    #[test]
    fn test_artists_split_and_rejoin() {
        assert_eq!(
            clean_artists(Some("A, B & C")),
            Some("A, B & C".to_string())
        );
    }

    #[test]
    fn test_artists_bilingual_duplicate_stripped() {
        assert_eq!(
            clean_artists(Some("Скриптонит (Skryptonite)")),
            Some("Скриптонит".to_string())
        );
    }

    #[test]
    fn test_artists_single() {
        assert_eq!(clean_artists(Some("Oxxxymiron")), Some("Oxxxymiron".to_string()));
        assert_eq!(clean_artists(None), None);
    }

    #[test]
    fn test_artists_to_str() {
        assert_eq!(artists_to_str(None, &[]), None);
        assert_eq!(artists_to_str(Some("A"), &[]), Some("A".to_string()));
        assert_eq!(
            artists_to_str(Some("A"), &["B"]),
            Some("A feat. B".to_string())
        );
        assert_eq!(
            artists_to_str(Some("A"), &["B", "C", "D"]),
            Some("A feat. B, C & D".to_string())
        );
    }

    #[test]
    fn test_parse_photo() {
        assert_eq!(
            parse_photo(Some("https://images.example/cover.jpg?w=600")),
            Some("https://images.example/cover.jpg".to_string())
        );
        assert_eq!(
            parse_photo(Some("https://images.example/cover.jpg")),
            Some("https://images.example/cover.jpg".to_string())
        );
        assert_eq!(parse_photo(None), None);
    }

    #[test]
    fn test_https_url() {
        assert_eq!(https_url("genius.com/x"), "https://genius.com/x");
        assert_eq!(https_url("http://genius.com/x"), "http://genius.com/x");
    }

    #[test]
    fn test_unix_to_datetime() {
        let dt = unix_to_datetime(0).unwrap();
        assert_eq!(dt.format("%d/%m/%Y %H:%M:%S").to_string(), "01/01/1970 00:00:00");
    }

    proptest! {
        /// A second pass over already-clean text changes nothing.
        #[test]
        fn clean_is_idempotent(s in "\\PC{0,40}") {
            if let Some(once) = clean(Some(&s)) {
                if !once.is_empty() {
                    prop_assert_eq!(clean(Some(&once)), Some(once.clone()));
                }
            }
        }
    }
}
