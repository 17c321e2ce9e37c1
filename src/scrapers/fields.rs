//! Declarative infobox field extraction.
//!
//! Each metadata slot is described by a rule: which label substrings mark
//! its table row, how candidate strings are collected from the value cell,
//! how each candidate is cleaned, and how the survivors are combined. The
//! rules live in one table so locale-specific wording can change without
//! touching the extraction walk itself.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Language-abbreviation markers that appear as sibling text next to
/// language-tagged names. Lowercase; matched against the lowercased
/// candidate.
const LANGUAGE_MARKERS: &[&str] = &["нем.", "англ.", "фр.", "ит.", "исп.", "рус."];

/// Film-category words that leak in from unrelated infobox rows.
const CATEGORY_WORDS: &[&str] = &["Полнометражные", "Короткометражные", "Документальные"];

static TABLE_HEADER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("static selector"));
static ANCHOR_OR_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a, span").expect("static selector"));
static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(19|20)\d{2}$").expect("static regex"));

/// Search scope for label rows: the infobox table when the page has one,
/// the whole document otherwise.
#[derive(Clone, Copy)]
pub(crate) enum Scope<'a> {
    Table(ElementRef<'a>),
    Document(&'a Html),
}

impl<'a> Scope<'a> {
    fn header_cells(&self) -> Vec<ElementRef<'a>> {
        match self {
            Scope::Table(element) => element.select(&TABLE_HEADER).collect(),
            Scope::Document(doc) => doc.select(&TABLE_HEADER).collect(),
        }
    }
}

/// How candidate strings are pulled from a value cell.
#[derive(Clone, Copy)]
enum Collect {
    /// Text nodes directly inside anchor and span descendants.
    AnchorAndSpanText,
    /// Every descendant text node, in document order.
    AllText,
    /// Descendant text nodes outside navigation boxes, styles and scripts.
    TextOutsideNav,
}

/// Per-candidate cleaning applied before filtering.
#[derive(Clone, Copy)]
enum Clean {
    /// Remove commas and parentheses, then trim.
    StripListPunctuation,
    /// Trim, strip leading/trailing commas, trim again.
    TrimEdgeCommas,
    /// Remove parentheses, then trim.
    StripParens,
    /// Trim only.
    Trim,
}

/// How the surviving candidates become the slot value.
#[derive(Clone, Copy)]
enum Combine {
    /// Deduplicate case-insensitively, keep the first occurrence
    /// capitalized, join with ", ".
    CapitalizedSet,
    /// Deduplicate exact strings in first-occurrence order, optionally cap
    /// the count, join with ", ".
    ExactSet { cap: Option<usize> },
    /// First candidate that is a four-digit year.
    FirstYear,
}

/// One slot's extraction recipe.
pub(crate) struct FieldRule {
    labels: &'static [&'static str],
    collect: Collect,
    clean: Clean,
    /// Candidates with this many characters or fewer are dropped.
    min_chars: usize,
    deny_markers: &'static [&'static str],
    deny_exact: &'static [&'static str],
    combine: Combine,
}

pub(crate) const GENRE: FieldRule = FieldRule {
    labels: &["Жанр"],
    collect: Collect::AnchorAndSpanText,
    clean: Clean::StripListPunctuation,
    min_chars: 2,
    deny_markers: &[],
    deny_exact: &[],
    combine: Combine::CapitalizedSet,
};

pub(crate) const COUNTRY: FieldRule = FieldRule {
    labels: &["Стран"],
    collect: Collect::AllText,
    clean: Clean::TrimEdgeCommas,
    min_chars: 2,
    deny_markers: &[],
    deny_exact: &[],
    combine: Combine::ExactSet { cap: None },
};

pub(crate) const DIRECTOR: FieldRule = FieldRule {
    labels: &["Режисс"],
    collect: Collect::TextOutsideNav,
    clean: Clean::StripParens,
    min_chars: 1,
    deny_markers: LANGUAGE_MARKERS,
    deny_exact: CATEGORY_WORDS,
    combine: Combine::ExactSet { cap: Some(3) },
};

pub(crate) const YEAR: FieldRule = FieldRule {
    labels: &["Год", "Дата выхода"],
    collect: Collect::AllText,
    clean: Clean::Trim,
    min_chars: 0,
    deny_markers: &[],
    deny_exact: &[],
    combine: Combine::FirstYear,
};

/// Extract one slot value from the scope.
///
/// Returns `None` when no label row matches; a matched row whose candidates
/// are all filtered out still yields a (possibly empty) joined value.
pub(crate) fn extract(scope: Scope<'_>, rule: &FieldRule) -> Option<String> {
    let cells = label_value_cells(scope, rule.labels);
    if cells.is_empty() {
        return None;
    }

    let mut candidates = Vec::new();
    for cell in cells {
        collect_candidates(cell, rule.collect, &mut candidates);
    }

    combine(&candidates, rule)
}

/// Value cells for every label row matching one of the label substrings,
/// in document order.
fn label_value_cells<'a>(scope: Scope<'a>, labels: &[&str]) -> Vec<ElementRef<'a>> {
    let mut cells = Vec::new();
    for header in scope.header_cells() {
        let text: String = header.text().collect();
        if !labels.iter().any(|label| text.contains(label)) {
            continue;
        }
        for sibling in header.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if element.value().name() == "td" {
                    cells.push(element);
                }
            }
        }
    }
    cells
}

fn collect_candidates(cell: ElementRef<'_>, strategy: Collect, out: &mut Vec<String>) {
    match strategy {
        Collect::AnchorAndSpanText => {
            for element in cell.select(&ANCHOR_OR_SPAN) {
                for child in element.children() {
                    if let Some(text) = child.value().as_text() {
                        out.push(text.to_string());
                    }
                }
            }
        }
        Collect::AllText => {
            out.extend(cell.text().map(str::to_string));
        }
        Collect::TextOutsideNav => {
            for node in cell.descendants() {
                let Some(text) = node.value().as_text() else {
                    continue;
                };
                let boxed = node
                    .ancestors()
                    .take_while(|ancestor| ancestor.id() != cell.id())
                    .any(|ancestor| {
                        ancestor.value().as_element().is_some_and(|element| {
                            element.name() == "style"
                                || element.name() == "script"
                                || element
                                    .attr("class")
                                    .is_some_and(|class| class.contains("navbox"))
                        })
                    });
                if !boxed {
                    out.push(text.to_string());
                }
            }
        }
    }
}

fn combine(candidates: &[String], rule: &FieldRule) -> Option<String> {
    match rule.combine {
        Combine::CapitalizedSet => {
            let mut seen = HashSet::new();
            let mut values = Vec::new();
            for raw in candidates {
                let cleaned = clean_candidate(raw, rule.clean);
                if !keeps(&cleaned, rule) {
                    continue;
                }
                if seen.insert(cleaned.to_lowercase()) {
                    values.push(capitalize(&cleaned));
                }
            }
            Some(values.join(", "))
        }
        Combine::ExactSet { cap } => {
            let mut seen = HashSet::new();
            let mut values = Vec::new();
            for raw in candidates {
                let cleaned = clean_candidate(raw, rule.clean);
                if !keeps(&cleaned, rule) {
                    continue;
                }
                if seen.insert(cleaned.clone()) {
                    values.push(cleaned);
                }
            }
            if let Some(cap) = cap {
                values.truncate(cap);
            }
            Some(values.join(", "))
        }
        Combine::FirstYear => candidates
            .iter()
            .map(|raw| clean_candidate(raw, rule.clean))
            .find(|cleaned| YEAR_TOKEN.is_match(cleaned)),
    }
}

fn clean_candidate(raw: &str, clean: Clean) -> String {
    match clean {
        Clean::StripListPunctuation => raw
            .chars()
            .filter(|c| !matches!(c, ',' | '(' | ')'))
            .collect::<String>()
            .trim()
            .to_string(),
        Clean::TrimEdgeCommas => raw.trim().trim_matches(',').trim().to_string(),
        Clean::StripParens => raw
            .chars()
            .filter(|c| !matches!(c, '(' | ')'))
            .collect::<String>()
            .trim()
            .to_string(),
        Clean::Trim => raw.trim().to_string(),
    }
}

/// Filter applied after cleaning. Thresholds count characters, not bytes,
/// because the source text is Cyrillic.
fn keeps(cleaned: &str, rule: &FieldRule) -> bool {
    if cleaned.chars().count() <= rule.min_chars {
        return false;
    }
    // Wiki footnote markers survive text extraction as bracketed indexes.
    if cleaned.contains('[') {
        return false;
    }
    let lowered = cleaned.to_lowercase();
    if rule.deny_markers.iter().any(|marker| lowered.contains(marker)) {
        return false;
    }
    if rule.deny_exact.iter().any(|word| cleaned == *word) {
        return false;
    }
    true
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
