//! Lyric-page extraction pipeline.
//!
//! Takes the raw HTML of a lyric page and produces parallel text
//! representations: sanitized HTML, plain text and two markdown dialects
//! (consumers disagree on whether `*` or `_` denotes italics). The pipeline
//! is a fixed sequence - DOM phase first (locate the lyrics container,
//! drop non-content subtrees, unwrap stanza wrappers), then a string phase
//! of regex rewrites carried over from the page structure:
//!
//! 1. `<br/>` tags become newlines before parsing.
//! 2. The root container is the first `div` whose class is `lyrics` or
//!    starts with `Lyrics__Root`; no container means no lyrics (a valid
//!    state, not an error).
//! 3. Footer/header/pyong widgets, ad containers and "You might also
//!    like"/"Embed" blocks are dropped.
//! 4. `Lyrics__Container` wrappers are unwrapped with a newline in front,
//!    preserving stanza boundaries.
//! 5. Referent highlight links collapse to their inner text, empty styled
//!    spans disappear, the outer wrapper tag remnants are trimmed.
//! 6. The instrumental placeholder short-circuits to a text-less result.

use once_cell::sync::Lazy;
use regex::Regex;
use ego_tree::NodeRef;
use scraper::node::Element;
use scraper::{Html, Node};
use tracing::debug;

use crate::text::clean;

/// Marker fragment a page carries instead of lyrics for instrumentals.
const INSTRUMENTAL_MARKER: &str =
    r#"<div class="LyricsPlaceholder__Message-uen8er-2 gotKKY">This song is an instrumental</div>"#;

/// Ad container class fragments; any element carrying one is dropped.
const AD_CLASS_FRAGMENTS: &[&str] = &[
    "DfpAd__Container",
    "SidebarAd__Container",
    "SidebarAd__StickyContainer",
    "RightSidebar__Container",
    "InreadContainer__Container",
];

/// Widget containers dropped from the lyrics subtree.
const WIDGET_CLASS_PREFIXES: &[&str] = &[
    "Pyong__Container",
    "LyricsFooter__Container",
    "LyricsHeader__Container",
];

/// Text fragments whose containing element is dropped.
const NON_CONTENT_TEXT: &[&str] = &["You might also like", "Embed"];

static REFERENT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<a class="ReferentFragmentdesktop__ClickTarget.*?" href=".*?(/|.*?)"><span class="ReferentFragmentdesktop__Highlight.*?">(.*?)</span></a>"#,
    )
    .unwrap()
});

static EMPTY_STYLED_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span style=".*".*></span>"#).unwrap());

/// Bracketed section header occupying its own line.
static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\n\n|\A)\[[^\[\]?]+\]\n").unwrap());

static MARKDOWN_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([_*~`#+|{}\\])").unwrap());
static BOLD_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<b>(.*?)</b>").unwrap());
static ITALIC_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<i>(.*?)</i>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Pipeline switches.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Strip `[Verse]`-style section headers.
    pub remove_sections: bool,
    /// Collapse triple blank lines and drop a duplicated title header.
    pub enhance: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            remove_sections: false,
            enhance: true,
        }
    }
}

/// Extraction result: parallel text representations, or just the
/// instrumental flag.
#[derive(Debug, Clone, Default)]
pub struct ExtractedLyrics {
    pub plain: Option<String>,
    pub html: Option<String>,
    pub markdown: Option<String>,
    pub markdown_v2: Option<String>,
    pub instrumental: bool,
}

impl ExtractedLyrics {
    /// The instrumental sentinel: no text fields at all.
    pub fn instrumental() -> Self {
        Self {
            instrumental: true,
            ..Self::default()
        }
    }
}

/// Run the pipeline over a lyric page. `None` means the page has no lyrics
/// container.
pub fn extract(page_html: &str, options: ExtractOptions) -> Option<ExtractedLyrics> {
    let page_html = page_html.replace("<br/>", "\n");
    let document = Html::parse_document(&page_html);

    let root = find_lyrics_root(&document)?;

    let mut serialized = String::new();
    render_node(root, &mut serialized);

    let serialized = serialized.replace("  ", " ");
    let serialized = REFERENT_LINK.replace_all(&serialized, "$2");
    let serialized = EMPTY_STYLED_SPAN.replace_all(&serialized, "");
    let inner = trim_wrapper(&serialized);

    let mut html = clean(Some(inner)).unwrap_or_default();

    if html.contains(INSTRUMENTAL_MARKER) {
        debug!("instrumental placeholder found");
        return Some(ExtractedLyrics::instrumental());
    }

    if options.enhance {
        html = html.replace("\n\n\n", "\n\n");
        html = drop_duplicated_title(html);
    }

    if options.remove_sections {
        html = SECTION_HEADER
            .replace_all(&html, |caps: &regex::Captures| {
                if caps.get(0).unwrap().start() == 0 {
                    String::new()
                } else {
                    "\n\n".to_string()
                }
            })
            .into_owned();
    }

    let escaped = MARKDOWN_ESCAPE.replace_all(&html, r"\$1");
    let bolded = BOLD_TAG.replace_all(&escaped, "**$1**");
    let markdown = ITALIC_TAG.replace_all(&bolded, "*$1*").into_owned();
    let markdown_v2 = ITALIC_TAG.replace_all(&bolded, "__$1__").into_owned();

    let plain = unescape_entities(&ANY_TAG.replace_all(&html, ""));

    Some(ExtractedLyrics {
        plain: Some(plain),
        html: Some(html),
        markdown: Some(markdown),
        markdown_v2: Some(markdown_v2),
        instrumental: false,
    })
}

/// First `div` in document order whose class marks the lyrics root.
fn find_lyrics_root(document: &Html) -> Option<NodeRef<'_, Node>> {
    document.tree.root().descendants().find(|node| {
        matches!(
            node.value(),
            Node::Element(el) if el.name() == "div"
                && el.classes().any(|class| class == "lyrics" || class.contains("Lyrics__Root"))
        )
    })
}

fn is_widget_container(el: &Element) -> bool {
    el.name() == "div"
        && el.classes().any(|class| {
            WIDGET_CLASS_PREFIXES
                .iter()
                .any(|prefix| class.starts_with(prefix))
        })
}

fn is_ad_block(el: &Element) -> bool {
    el.classes().any(|class| {
        AD_CLASS_FRAGMENTS
            .iter()
            .any(|fragment| class.contains(fragment))
    })
}

fn is_stanza_wrapper(el: &Element) -> bool {
    el.name() == "div" && el.classes().any(|class| class.starts_with("Lyrics__Container"))
}

/// Whether any direct text child marks this element as non-content.
fn has_non_content_text(node: NodeRef<'_, Node>) -> bool {
    node.children().any(|child| {
        matches!(
            child.value(),
            Node::Text(text) if NON_CONTENT_TEXT.iter().any(|k| text.text.contains(k))
        )
    })
}

/// Serialize the subtree, applying removals and stanza unwrapping inline.
fn render_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => push_escaped_text(&text.text, out),
        Node::Element(el) => {
            if is_widget_container(el) || is_ad_block(el) || has_non_content_text(node) {
                return;
            }

            if is_stanza_wrapper(el) {
                out.push('\n');
                for child in node.children() {
                    render_node(child, out);
                }
                return;
            }

            out.push('<');
            out.push_str(el.name());
            for (name, value) in el.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                push_escaped_attr(value, out);
                out.push('"');
            }
            out.push('>');

            for child in node.children() {
                render_node(child, out);
            }

            out.push_str("</");
            out.push_str(el.name());
            out.push('>');
        }
        _ => {}
    }
}

fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Isolate the inner payload from the outer wrapper tag remnants: drop
/// everything through the first `>` (plus the newline that follows it on
/// real pages) and from the last closing `</div>` on.
fn trim_wrapper(serialized: &str) -> &str {
    let start = match serialized.find('>') {
        Some(gt) => {
            let rest = &serialized[gt + 1..];
            gt + 1 + (rest.starts_with('\n') as usize)
        }
        None => 0,
    };
    let end = serialized.rfind("</div>").unwrap_or(serialized.len());
    if start <= end { &serialized[start..end] } else { "" }
}

/// Some pages inject "<Artist> - <Title> текст песни" as a first line with
/// a blank line after it; drop both.
fn drop_duplicated_title(html: String) -> String {
    let lines: Vec<&str> = html.split('\n').collect();
    if lines.len() >= 2 && lines[0].to_lowercase().contains("текст песни") && lines[1].trim().is_empty()
    {
        lines[2..].join("\n")
    } else {
        html
    }
}

fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_enhance() -> ExtractOptions {
        ExtractOptions {
            remove_sections: false,
            enhance: false,
        }
    }

    #[test]
    fn test_simple_root_with_br() {
        let html = r#"<div class="Lyrics__Root">Line one<br/>Line two</div>"#;
        let lyrics = extract(html, no_enhance()).unwrap();
        assert!(!lyrics.instrumental);
        assert_eq!(lyrics.plain.as_deref(), Some("Line one\nLine two"));
    }

    #[test]
    fn test_no_container_is_absent() {
        let html = "<html><body><p>nothing here</p></body></html>";
        assert!(extract(html, no_enhance()).is_none());
    }

    #[test]
    fn test_legacy_lyrics_class() {
        let html = r#"<div class="lyrics">Old style</div>"#;
        let lyrics = extract(html, no_enhance()).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("Old style"));
    }

    #[test]
    fn test_instrumental_placeholder() {
        let html = concat!(
            r#"<div class="Lyrics__Root">"#,
            r#"<div class="LyricsPlaceholder__Message-uen8er-2 gotKKY">This song is an instrumental</div>"#,
            r#"</div>"#,
        );
        let lyrics = extract(html, no_enhance()).unwrap();
        assert!(lyrics.instrumental);
        assert!(lyrics.plain.is_none());
        assert!(lyrics.html.is_none());
        assert!(lyrics.markdown.is_none());
    }

    #[test]
    fn test_stanza_wrappers_unwrap_with_newlines() {
        let html = concat!(
            r#"<div class="Lyrics__Root">"#,
            r#"<div class="Lyrics__Container-sc-1">First A<br/>First B</div>"#,
            r#"<div class="Lyrics__Container-sc-1">Second</div>"#,
            r#"</div>"#,
        );
        let lyrics = extract(html, no_enhance()).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("First A\nFirst B\nSecond"));
    }

    #[test]
    fn test_widgets_and_ads_removed() {
        let html = concat!(
            r#"<div class="Lyrics__Root">"#,
            r#"<div class="LyricsHeader__Container-abc">header junk</div>"#,
            r#"<div class="Lyrics__Container-sc-1">Real line</div>"#,
            r#"<span class="DfpAd__Container-xyz">buy things</span>"#,
            r#"<div class="Pyong__Container-q">pyong</div>"#,
            r#"</div>"#,
        );
        let lyrics = extract(html, no_enhance()).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("Real line"));
    }

    #[test]
    fn test_non_content_text_blocks_removed() {
        let html = concat!(
            r#"<div class="Lyrics__Root">"#,
            r#"<div class="Lyrics__Container-a">Keep me</div>"#,
            r#"<span>You might also like</span>"#,
            r#"<span>123Embed</span>"#,
            r#"</div>"#,
        );
        let lyrics = extract(html, no_enhance()).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("Keep me"));
    }

    #[test]
    fn test_referent_links_collapse_to_text() {
        let html = concat!(
            r#"<div class="Lyrics__Root"><div class="Lyrics__Container-a">"#,
            r#"<a class="ReferentFragmentdesktop__ClickTarget-sc-1" href="/123">"#,
            r#"<span class="ReferentFragmentdesktop__Highlight-sc-2">annotated line</span></a>"#,
            r#"</div></div>"#,
        );
        let lyrics = extract(html, no_enhance()).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("annotated line"));
        assert_eq!(lyrics.html.as_deref(), Some("annotated line"));
    }

    #[test]
    fn test_enhance_collapses_triple_newlines_and_title_header() {
        let html = concat!(
            r#"<div class="Lyrics__Root">"#,
            r#"<div class="Lyrics__Container-a">Исполнитель - Песня текст песни<br/><br/>Первая строка</div>"#,
            r#"</div>"#,
        );
        let options = ExtractOptions {
            remove_sections: false,
            enhance: true,
        };
        let lyrics = extract(html, options).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("Первая строка"));
    }

    #[test]
    fn test_remove_sections() {
        let html = concat!(
            r#"<div class="Lyrics__Root">"#,
            r#"<div class="Lyrics__Container-a">[Verse 1]<br/>Line A<br/><br/>[Chorus]<br/>Line B</div>"#,
            r#"</div>"#,
        );
        let options = ExtractOptions {
            remove_sections: true,
            enhance: false,
        };
        let lyrics = extract(html, options).unwrap();
        assert_eq!(lyrics.plain.as_deref(), Some("Line A\n\nLine B"));
    }

    #[test]
    fn test_markdown_dialects() {
        let html = concat!(
            r#"<div class="Lyrics__Root"><div class="Lyrics__Container-a">"#,
            r#"<b>loud</b> and <i>soft</i> 100%_done"#,
            r#"</div></div>"#,
        );
        let lyrics = extract(html, no_enhance()).unwrap();
        assert_eq!(
            lyrics.markdown.as_deref(),
            Some(r"**loud** and *soft* 100%\_done")
        );
        assert_eq!(
            lyrics.markdown_v2.as_deref(),
            Some(r"**loud** and __soft__ 100%\_done")
        );
        assert_eq!(lyrics.plain.as_deref(), Some("loud and soft 100%_done"));
    }

    #[test]
    fn test_ampersand_round_trip() {
        let html = r#"<div class="Lyrics__Root"><div class="Lyrics__Container-a">Me & You</div></div>"#;
        let lyrics = extract(html, no_enhance()).unwrap();
        assert_eq!(lyrics.html.as_deref(), Some("Me &amp; You"));
        assert_eq!(lyrics.plain.as_deref(), Some("Me & You"));
    }
}
