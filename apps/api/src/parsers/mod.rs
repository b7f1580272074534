//! Résumé parser: turns paragraph records plus a section map into a
//! structured `ResumeRecord`.
//!
//! Two strategies share one contract: `AtsParser` for the ATS/HR layout and
//! `IndustryManagerParser` for the industry-manager layout. The variant is
//! chosen explicitly by the caller's template type, never inferred from the
//! document.
//!
//! Failure policy: missing optional fields become `None`/empty collections.
//! Only a missing name, or missing both contact fields, aborts the parse.

pub mod ats;
pub mod industry;

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::loader::ParagraphRecord;
use crate::sections::{SectionKind, SectionMap};

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// Caller-chosen résumé variant. Selects both the parser strategy and the
/// script structure downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    Ats,
    Industry,
}

impl TemplateType {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim().to_lowercase().as_str() {
            "ats" => Ok(TemplateType::Ats),
            "industry" => Ok(TemplateType::Industry),
            other => Err(AppError::InvalidTemplate(format!(
                "'{other}' is not a recognized template type; expected 'ats' or 'industry'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Ats => "ats",
            TemplateType::Industry => "industry",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: Option<String>,
}

/// Normalized structured output of résumé parsing.
///
/// Invariant: `name` is non-empty and at least one of `contact.email` /
/// `contact.phone` is present; both are enforced at parse time.
/// The `management_level` / `team_size` / `budget_responsibility` extras are
/// only populated by the IndustryManager variant and are additive; they never
/// replace the common fields. There is deliberately no `industry` field here:
/// industry is always derived by the classifier downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: String,
    pub contact: Contact,
    pub current_role: String,
    pub years_experience: Option<u32>,
    pub skills: Vec<String>,
    pub companies: Vec<String>,
    pub achievements: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub management_level: Option<String>,
    pub team_size: Option<u32>,
    pub budget_responsibility: Option<String>,
}

impl ResumeRecord {
    /// First (most recent) company, if any.
    pub fn primary_company(&self) -> Option<&str> {
        self.companies.first().map(String::as_str)
    }

    /// Contact fields joined for display: "email, phone" / "email" / "phone".
    pub fn contact_line(&self) -> String {
        match (&self.contact.email, &self.contact.phone) {
            (Some(e), Some(p)) => format!("{e}, {p}"),
            (Some(e), None) => e.clone(),
            (None, Some(p)) => p.clone(),
            (None, None) => String::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy contract
// ────────────────────────────────────────────────────────────────────────────

/// The parser strategy contract shared by both variants.
pub trait ResumeParser: Send + Sync {
    fn parse(
        &self,
        paragraphs: &[ParagraphRecord],
        sections: &SectionMap,
    ) -> Result<ResumeRecord, AppError>;
}

/// Returns the parser strategy for the caller-supplied template type.
pub fn parser_for(template_type: TemplateType) -> Box<dyn ResumeParser> {
    match template_type {
        TemplateType::Ats => Box::new(ats::AtsParser),
        TemplateType::Industry => Box::new(industry::IndustryManagerParser),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared extraction helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

pub(crate) static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,2}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").expect("phone regex")
});

/// Explicit "N years" / "N+ yrs" mentions.
static YEARS_EXPLICIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\+?\s*(?:years?|yrs?)\b").expect("years regex"));

/// Four-digit calendar years.
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year regex"));

static DEGREE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:bachelor(?:'s)?|master(?:'s)?|ph\.?\s?d|mba|b\.\s?[as]\.?|m\.\s?[as]\.?|associate(?:'s)?|diploma)\b",
    )
    .expect("degree regex")
});

/// Verbs that open achievement-style lines in the supported layouts.
const ACTION_VERBS: &[&str] = &[
    "led",
    "managed",
    "created",
    "developed",
    "implemented",
    "improved",
    "increased",
    "reduced",
    "achieved",
    "delivered",
    "launched",
    "designed",
    "established",
    "streamlined",
    "optimized",
    "trained",
];

/// Extracts the candidate name from the first non-empty document line.
///
/// Banner lines ("Resume", "Curriculum Vitae") are skipped, and a
/// "Name | email | phone" header yields the segment before the first pipe.
/// A line that is itself contact information does not qualify.
pub(crate) fn name_from_first_line(paragraphs: &[ParagraphRecord]) -> Result<String, AppError> {
    for para in paragraphs.iter().take(3) {
        let line = para.text.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        if lower.contains("resume") || lower.contains("curriculum vitae") || lower == "cv" {
            continue;
        }
        // A section heading means the header is over; nothing below it can
        // be the name.
        if crate::sections::match_heading(line).is_some() {
            break;
        }
        let candidate = line.split('|').next().unwrap_or(line).trim();
        if candidate.is_empty()
            || EMAIL_RE.is_match(candidate)
            || PHONE_RE.is_match(candidate)
        {
            continue;
        }
        return Ok(candidate.to_string());
    }
    Err(AppError::Parse("name not found".to_string()))
}

/// Recovers a display name from the email local part of the document's first
/// line, e.g. `m.riley@example.com` → `M. Riley`. Used by the
/// industry-manager layout, whose header is a contact banner.
pub(crate) fn name_from_email_banner(paragraphs: &[ParagraphRecord]) -> Option<String> {
    let first = paragraphs.iter().find(|p| !p.text.trim().is_empty())?;
    let email = EMAIL_RE.find(&first.text)?;
    let local = email.as_str().split('@').next()?;
    let parts: Vec<&str> = local.split('.').collect();
    match parts.as_slice() {
        [first_part, last]
            if first_part.chars().all(char::is_alphabetic)
                && last.chars().all(char::is_alphabetic) =>
        {
            let initial = first_part.chars().next()?.to_ascii_uppercase();
            Some(format!("{initial}. {}", capitalize(last)))
        }
        [single] if single.chars().all(char::is_alphabetic) => Some(capitalize(single)),
        _ => None,
    }
}

/// Extracts email/phone from the Contact section, or from the whole document
/// when no Contact section exists (both layouts put contact in the header).
/// Each field is optional individually; both missing is a parse failure.
pub(crate) fn extract_contact(
    sections: &SectionMap,
    paragraphs: &[ParagraphRecord],
) -> Result<Contact, AppError> {
    let text: Cow<'_, str> = match sections.get(&SectionKind::Contact) {
        Some(body) => Cow::Borrowed(body.as_str()),
        None => Cow::Owned(
            paragraphs
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    };

    let email = EMAIL_RE.find(&text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(&text).map(|m| normalize_phone(m.as_str()));

    if email.is_none() && phone.is_none() {
        return Err(AppError::Parse(
            "no contact information (email or phone) found".to_string(),
        ));
    }
    Ok(Contact { email, phone })
}

/// Normalizes a matched phone number to `(XXX) XXX-XXXX` using its last ten
/// digits; shorter matches are returned as seen.
pub(crate) fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 10 {
        let d = &digits[digits.len() - 10..];
        format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..])
    } else {
        raw.trim().to_string()
    }
}

/// Splits a skills blob on commas/semicolons/newlines/bullets, trimming and
/// deduplicating case-insensitively while preserving first-seen order.
pub(crate) fn split_skills(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();
    for raw in text.split(|c| matches!(c, ',' | ';' | '\n' | '•')) {
        let skill = raw.trim().trim_start_matches(['-', '*', '·']).trim();
        if skill.is_empty() {
            continue;
        }
        if seen.insert(skill.to_lowercase()) {
            skills.push(skill.to_string());
        }
    }
    skills
}

/// Explicit "N years" mention, if any.
pub(crate) fn explicit_years(text: &str) -> Option<u32> {
    YEARS_EXPLICIT_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// All distinct calendar years mentioned, ascending.
pub(crate) fn year_mentions(text: &str) -> Vec<i32> {
    let mut years: Vec<i32> = YEAR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Splits an experience header line of the form "Role | Company | Dates"
/// (or "Role at Company") into role and company.
pub(crate) fn role_and_company(line: &str) -> (String, Option<String>) {
    if line.contains('|') {
        let mut segments = line.split('|').map(str::trim);
        let role = segments.next().unwrap_or_default().to_string();
        let company = segments
            .next()
            .filter(|s| !s.is_empty() && !YEAR_RE.is_match(s))
            .map(str::to_string);
        return (role, company);
    }
    if let Some((role, company)) = line.split_once(" at ") {
        return (role.trim().to_string(), Some(company.trim().to_string()));
    }
    (line.trim().to_string(), None)
}

/// Non-empty lines of an Achievements-style section, bullets stripped.
pub(crate) fn section_achievements(text: &str, cap: usize) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().trim_start_matches(['-', '*', '·', '•']).trim())
        .filter(|l| !l.is_empty())
        .take(cap)
        .map(str::to_string)
        .collect()
}

/// Fallback achievement mining: lines in Experience text that open with an
/// achievement verb and carry enough substance to narrate.
pub(crate) fn experience_achievements(text: &str, cap: usize) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().trim_start_matches(['-', '*', '·', '•']).trim())
        .filter(|l| l.len() > 20)
        .filter(|l| {
            l.split_whitespace()
                .next()
                .map(|w| ACTION_VERBS.contains(&w.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .take(cap)
        .map(str::to_string)
        .collect()
}

/// Parses Education lines into degree/institution pairs. Lines without a
/// degree keyword are skipped; a missing comma leaves the institution unset.
pub(crate) fn education_entries(text: &str) -> Vec<EducationEntry> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && DEGREE_RE.is_match(l))
        .map(|line| match line.split_once(',') {
            Some((degree, institution)) if !institution.trim().is_empty() => EducationEntry {
                degree: degree.trim().to_string(),
                institution: Some(institution.trim().to_string()),
            },
            _ => EducationEntry {
                degree: line.to_string(),
                institution: None,
            },
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
