//! Script validation and repair.
//!
//! Raw backend output moves through exactly one of three paths: accepted as-is
//! (validated), lightly repaired (structure intact but formatting or contact
//! details off), or replaced wholesale by the profile's deterministic fallback
//! script. The caller always receives a complete six-section script; quality
//! problems degrade the outcome label, never the response.

use serde::Serialize;

use crate::parsers::ResumeRecord;
use crate::profiles::IndustryProfile;

/// Section headers every script must carry, in order.
pub const REQUIRED_SECTIONS: [&str; 6] = [
    "1. Introduction",
    "2. Experience",
    "3. Skills",
    "4. Achievement",
    "5. Goals",
    "6. Contact",
];

const MIN_SCRIPT_WORDS: usize = 20;
const MAX_SCRIPT_WORDS: usize = 500;

/// How the final script text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationOutcome {
    Validated,
    Repaired,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedScript {
    pub text: String,
    pub outcome: ValidationOutcome,
}

/// Turns raw backend output (or its absence) into the final script.
///
/// `raw = None` means generation failed or timed out; the fallback script is
/// rendered directly. This function never fails: the fallback template always
/// produces a complete script.
pub fn finalize(
    raw: Option<&str>,
    record: &ResumeRecord,
    profile: &IndustryProfile,
) -> GeneratedScript {
    let Some(raw) = raw else {
        return fallback(record, profile);
    };

    let text = preprocess(raw, record);

    if !sections_in_order(&text) {
        return fallback(record, profile);
    }

    let words = word_count(&text);
    if (MIN_SCRIPT_WORDS..=MAX_SCRIPT_WORDS).contains(&words) && has_contact(&text, record) {
        return GeneratedScript {
            text,
            outcome: ValidationOutcome::Validated,
        };
    }

    match repair(&text, record) {
        Some(text) => GeneratedScript {
            text,
            outcome: ValidationOutcome::Repaired,
        },
        None => fallback(record, profile),
    }
}

fn fallback(record: &ResumeRecord, profile: &IndustryProfile) -> GeneratedScript {
    GeneratedScript {
        text: profile.template.render(record),
        outcome: ValidationOutcome::Fallback,
    }
}

/// Strips echoed prompt text before the first section header and fills any
/// literal placeholders the model left in.
fn preprocess(raw: &str, record: &ResumeRecord) -> String {
    let trimmed = match raw.find(REQUIRED_SECTIONS[0]) {
        Some(idx) => &raw[idx..],
        None => raw,
    };

    trimmed
        .replace("[Name]", &record.name)
        .replace("[Email]", record.contact.email.as_deref().unwrap_or(""))
        .replace("[Phone]", record.contact.phone.as_deref().unwrap_or(""))
        .trim()
        .to_string()
}

/// All six section headers present, each after the previous one.
fn sections_in_order(text: &str) -> bool {
    let mut cursor = 0;
    for header in REQUIRED_SECTIONS {
        match text[cursor..].find(header) {
            Some(idx) => cursor += idx + header.len(),
            None => return false,
        }
    }
    true
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The script must restate at least one contact field verbatim.
fn has_contact(text: &str, record: &ResumeRecord) -> bool {
    let email_ok = record
        .contact
        .email
        .as_deref()
        .is_some_and(|e| text.contains(e));
    let phone_ok = record
        .contact
        .phone
        .as_deref()
        .is_some_and(|p| text.contains(p));
    email_ok || phone_ok
}

/// Repairs a structurally sound script: normalizes formatting, trims runaway
/// length, restores the contact line. Truncation runs before the contact
/// restore so the cut can never remove it, and a cut that loses a required
/// section header rejects the script. Returns `None` when the result is too
/// thin or too broken to publish.
fn repair(text: &str, record: &ResumeRecord) -> Option<String> {
    let mut repaired = normalize_formatting(text);

    if word_count(&repaired) > MAX_SCRIPT_WORDS {
        repaired = truncate_words(&repaired, MAX_SCRIPT_WORDS);
        if !sections_in_order(&repaired) {
            return None;
        }
    }

    if !has_contact(&repaired, record) {
        let contact = record.contact_line();
        let budget = MAX_SCRIPT_WORDS - word_count(&contact);
        if word_count(&repaired) > budget {
            repaired = truncate_words(&repaired, budget);
            if !sections_in_order(&repaired) {
                return None;
            }
        }
        repaired.push('\n');
        repaired.push_str(&contact);
    }

    (word_count(&repaired) >= MIN_SCRIPT_WORDS).then_some(repaired)
}

/// Collapses blank-line runs and standardizes bullet characters.
fn normalize_formatting(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut prev_blank = false;
    for line in text.lines() {
        let line = line.trim_end();
        let blank = line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        prev_blank = blank;

        let trimmed = line.trim_start();
        if let Some(rest) = trimmed
            .strip_prefix(['•', '*', '·', '–'])
            .map(str::trim_start)
        {
            lines.push(format!("- {rest}"));
        } else {
            lines.push(line.to_string());
        }
    }
    lines.join("\n").trim().to_string()
}

/// Cuts the text after `limit` words, keeping line structure.
fn truncate_words(text: &str, limit: usize) -> String {
    let mut budget = limit;
    let mut kept: Vec<String> = Vec::new();
    for line in text.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() <= budget {
            budget -= words.len();
            kept.push(line.to_string());
        } else {
            if budget > 0 {
                kept.push(words[..budget].join(" "));
            }
            break;
        }
    }
    kept.join("\n").trim().to_string()
}
