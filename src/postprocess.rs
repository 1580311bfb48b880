//! Derivation of key points, action items, priority, and severity.
//!
//! All heuristics are pure functions over the produced summary (and, for
//! severity, the original content). Priority ranks documents within a role;
//! severity is a document-level triage tier taken as a max over matched
//! keyword tiers, never a sum.

use crate::roles::RoleCode;
use regex::Regex;
use std::sync::OnceLock;

/// Maximum number of key points retained.
const MAX_KEY_POINTS: usize = 5;

/// Maximum number of action items retained.
const MAX_ACTION_ITEMS: usize = 3;

/// Keywords that qualify a sentence as a key point when no list items exist.
const KEY_POINT_KEYWORDS: [&str; 7] = [
    "important", "critical", "urgent", "required", "must", "should", "deadline",
];

/// Imperative verbs that mark a sentence as an action item.
const IMPERATIVE_VERBS: [&str; 8] = [
    "implement", "review", "update", "complete", "submit", "approve", "schedule", "contact",
];

/// Keywords adding 3 to the priority score when present.
const HIGH_PRIORITY_KEYWORDS: [&str; 5] = ["urgent", "critical", "emergency", "immediate", "asap"];

/// Keywords adding 2 to the priority score when present.
const MEDIUM_PRIORITY_KEYWORDS: [&str; 4] = ["important", "priority", "deadline", "required"];

/// Severity keyword tiers, highest first.
const SEVERITY_TIERS: [(u8, &[&str]); 3] = [
    (5, &["critical", "severe", "major", "emergency"]),
    (4, &["high", "significant", "important", "urgent"]),
    (3, &["moderate", "medium", "notable"]),
];

/// Everything derived from one role summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    /// Ordered key points, at most five.
    pub key_points: Vec<String>,
    /// Ordered action items, at most three.
    pub action_items: Vec<String>,
    /// Role-weighted urgency score in [1, 10].
    pub priority_score: u8,
    /// Document severity tier in [1, 5].
    pub severity_score: u8,
}

/// Run every heuristic over a summary and the original content.
pub fn derive(summary: &str, content: &str, role: RoleCode) -> Digest {
    Digest {
        key_points: key_points(summary),
        action_items: action_items(summary),
        priority_score: priority_score(summary, role),
        severity_score: severity_score(summary, content),
    }
}

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*[•\-\*]\s+(.+)$").expect("bullet regex compiles"))
}

fn numbered_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*\d+[.)]\s+(.+)$").expect("numbered regex compiles"))
}

fn action_leadin_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:must|should|need to|required to|action:|todo:|follow up:)\s+([^.!?\n]+)")
            .expect("action regex compiles")
    })
}

/// Extract ordered key points from a summary.
///
/// Bulleted items come first, then numbered items; only when neither exists
/// do keyword-bearing sentences qualify. Capped at five entries.
pub fn key_points(summary: &str) -> Vec<String> {
    let mut points = Vec::new();

    for capture in bullet_regex().captures_iter(summary) {
        if let Some(item) = capture.get(1) {
            points.push(item.as_str().trim().to_string());
        }
    }
    for capture in numbered_regex().captures_iter(summary) {
        if let Some(item) = capture.get(1) {
            points.push(item.as_str().trim().to_string());
        }
    }

    if points.is_empty() {
        for sentence in sentences(summary) {
            let lower = sentence.to_lowercase();
            if KEY_POINT_KEYWORDS
                .iter()
                .any(|keyword| lower.contains(keyword))
            {
                points.push(sentence.to_string());
            }
        }
    }

    points.truncate(MAX_KEY_POINTS);
    points
}

/// Extract ordered action items from a summary.
///
/// Modal/lead-in matches come first, then sentences opening with an
/// imperative verb. Capped at three entries.
pub fn action_items(summary: &str) -> Vec<String> {
    let mut items = Vec::new();

    for capture in action_leadin_regex().captures_iter(summary) {
        if let Some(rest) = capture.get(1) {
            let item = rest.as_str().trim();
            if !item.is_empty() {
                items.push(item.to_string());
            }
        }
    }

    for sentence in sentences(summary) {
        let Some(first_word) = sentence.split_whitespace().next() else {
            continue;
        };
        let lowered = first_word.to_lowercase();
        if IMPERATIVE_VERBS.contains(&lowered.as_str()) {
            items.push(sentence.to_string());
        }
    }

    items.truncate(MAX_ACTION_ITEMS);
    items
}

/// Compute the role-weighted priority score for a summary.
///
/// Starts at 1; each distinct high keyword present adds 3 and each distinct
/// medium keyword adds 2, plus role-specific bonuses. Clamped to [1, 10].
pub fn priority_score(summary: &str, role: RoleCode) -> u8 {
    let lower = summary.to_lowercase();
    let mut score: u32 = 1;

    for keyword in HIGH_PRIORITY_KEYWORDS {
        if lower.contains(keyword) {
            score += 3;
        }
    }
    for keyword in MEDIUM_PRIORITY_KEYWORDS {
        if lower.contains(keyword) {
            score += 2;
        }
    }

    score += match role {
        RoleCode::StationCtrl if lower.contains("incident") => 2,
        RoleCode::Safety if lower.contains("safety") => 2,
        RoleCode::Executive if lower.contains("risk") => 1,
        _ => 0,
    };

    score.clamp(1, 10) as u8
}

/// Compute the severity tier for a document.
///
/// Scans the summary and original content together and returns the highest
/// tier any keyword triggers; 1 when nothing matches.
pub fn severity_score(summary: &str, content: &str) -> u8 {
    let haystack = format!("{summary} {content}").to_lowercase();
    for (tier, keywords) in SEVERITY_TIERS {
        if keywords.iter().any(|keyword| haystack.contains(keyword)) {
            return tier;
        }
    }
    1
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
}
