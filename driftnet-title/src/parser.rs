//! Release-name parser for scene-style torrent titles
//!
//! Parses names like:
//! - "Show.S02E05.1080p.WEB.x264-GRP"
//! - "Show S01-S03 Complete 720p"
//! - "Movie.2020.FRENCH.2160p.BluRay-GRP"

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use driftnet_core::torrent::{ParsedTitle, TitleParser};

/// Pattern for SxxEyy, optionally spanning a range (S01E01-E03, S01E01E02)
static SEASON_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})\s?E(\d{1,3})(?:\s?-?\s?E(\d{1,3}))?").unwrap());

/// Pattern for season ranges (S01-S03, S01-03)
static SEASON_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})\s?-\s?S?(\d{1,2})\b").unwrap());

/// Pattern for 1x01 format
static NXNN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{1,3})\b").unwrap());

/// Pattern for "Season 1" / "Season 1 Episode 4"
static VERBOSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bSeason\s+(\d{1,2})(?:\s+Episode\s+(\d{1,3}))?").unwrap()
});

/// Pattern for a bare season pack marker (S01)
static SEASON_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})\b").unwrap());

/// Pattern for a bare episode marker (E05, Ep05, Episode 5)
static EPISODE_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:E|Ep|Episode)\s?(\d{1,3})\b").unwrap());

/// Pattern for release years
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

/// Pattern marking where quality/source tags begin, ending the title
static QUALITY_BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(2160p|1080p|720p|576p|480p|4K|UHD|HDR|BluRay|WEB[\s-]?DL|WEBRip|WEB|HDTV|DVDRip|BRRip|x264|x265|h\.?264|h\.?265|HEVC|XviD)\b")
        .unwrap()
});

/// Pattern for multiple spaces cleanup
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Language keywords recognized in release names, mapped to ISO 639-1 codes
/// ("multi" stands in for multi-audio releases).
const LANGUAGE_KEYWORDS: [(&str, &str); 10] = [
    ("english", "en"),
    ("french", "fr"),
    ("german", "de"),
    ("spanish", "es"),
    ("italian", "it"),
    ("hindi", "hi"),
    ("korean", "ko"),
    ("japanese", "ja"),
    ("russian", "ru"),
    ("multi", "multi"),
];

/// Regex-based [`TitleParser`] for scene-style release names.
///
/// Best-effort by contract: anything unrecognized parses to an empty
/// [`ParsedTitle`] rather than failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneTitleParser;

impl SceneTitleParser {
    /// Creates a parser. All patterns are compiled once per process.
    pub fn new() -> Self {
        Self
    }
}

impl TitleParser for SceneTitleParser {
    fn parse(&self, raw: &str) -> ParsedTitle {
        let cleaned = raw.replace(['.', '_'], " ");

        let mut seasons: Vec<u32> = Vec::new();
        let mut episodes: Vec<u32> = Vec::new();
        // Earliest structural marker; the title is whatever precedes it.
        let mut title_end = cleaned.len();

        // Patterns in order of specificity; the first family that matches
        // owns the season/episode numbers.
        if let Some(caps) = SEASON_EPISODE_RE.captures(&cleaned) {
            title_end = title_end.min(caps.get(0).unwrap().start());
            push_number(&mut seasons, caps.get(1));
            let first = parse_number(caps.get(2));
            let last = parse_number(caps.get(3));
            push_range(&mut episodes, first, last);
        } else if let Some(caps) = SEASON_RANGE_RE.captures(&cleaned) {
            title_end = title_end.min(caps.get(0).unwrap().start());
            push_range(&mut seasons, parse_number(caps.get(1)), parse_number(caps.get(2)));
        } else if let Some(caps) = NXNN_RE.captures(&cleaned) {
            title_end = title_end.min(caps.get(0).unwrap().start());
            push_number(&mut seasons, caps.get(1));
            push_number(&mut episodes, caps.get(2));
        } else if let Some(caps) = VERBOSE_RE.captures(&cleaned) {
            title_end = title_end.min(caps.get(0).unwrap().start());
            push_number(&mut seasons, caps.get(1));
            push_number(&mut episodes, caps.get(2));
        } else if let Some(caps) = SEASON_ONLY_RE.captures(&cleaned) {
            title_end = title_end.min(caps.get(0).unwrap().start());
            push_number(&mut seasons, caps.get(1));
            // A season pack may still name a single episode elsewhere.
            if let Some(ep) = EPISODE_ONLY_RE.captures(&cleaned) {
                push_number(&mut episodes, ep.get(1));
            }
        } else if let Some(caps) = EPISODE_ONLY_RE.captures(&cleaned) {
            title_end = title_end.min(caps.get(0).unwrap().start());
            push_number(&mut episodes, caps.get(1));
        }

        let year = YEAR_RE.captures(&cleaned).and_then(|caps| {
            let matched = caps.get(1).unwrap();
            // A leading year is part of the title ("2012"), not a tag.
            if matched.start() > 0 {
                title_end = title_end.min(matched.start());
            }
            matched.as_str().parse::<u16>().ok()
        });

        if let Some(boundary) = QUALITY_BOUNDARY_RE.find(&cleaned) {
            title_end = title_end.min(boundary.start());
        }

        let lowercase = cleaned.to_lowercase();
        let languages: Vec<String> = LANGUAGE_KEYWORDS
            .iter()
            .filter(|(keyword, _)| contains_word(&lowercase, keyword))
            .map(|(_, code)| (*code).to_string())
            .collect();

        let title = clean_title(&cleaned[..title_end]);
        debug!(
            "Parsed '{}': title='{}' seasons={:?} episodes={:?}",
            raw, title, seasons, episodes
        );

        ParsedTitle {
            title,
            seasons,
            episodes,
            languages,
            year,
        }
    }
}

fn parse_number(group: Option<regex::Match<'_>>) -> Option<u32> {
    group.and_then(|m| m.as_str().parse().ok())
}

fn push_number(into: &mut Vec<u32>, group: Option<regex::Match<'_>>) {
    if let Some(number) = parse_number(group) {
        into.push(number);
    }
}

/// Pushes `first..=last` when both ends are present and sane, else whatever
/// endpoints exist.
fn push_range(into: &mut Vec<u32>, first: Option<u32>, last: Option<u32>) {
    match (first, last) {
        (Some(first), Some(last)) if first <= last && last - first < 100 => {
            into.extend(first..=last);
        }
        (first, last) => {
            into.extend(first);
            into.extend(last);
        }
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.split(|c: char| !c.is_alphanumeric()).any(|token| token == word)
}

fn clean_title(raw: &str) -> String {
    let collapsed = MULTI_SPACE_RE.replace_all(raw, " ");
    collapsed.trim().trim_matches(['-', ' ', '(', '[']).to_string()
}
