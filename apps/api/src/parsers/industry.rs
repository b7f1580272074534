//! IndustryManager layout parser.
//!
//! Handles the manager-profile résumé shape: a contact banner header (often
//! with no standalone name line), a position history of "Role | Company |
//! Dates" lines, and management signals scattered through the text. On top of
//! the common fields it mines management level, team size, and budget
//! responsibility; each stays unset when the signal is absent.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use super::{
    education_entries, explicit_years, extract_contact, name_from_email_banner,
    name_from_first_line, role_and_company, section_achievements, split_skills, year_mentions,
    EducationEntry, ResumeParser, ResumeRecord,
};
use crate::errors::AppError;
use crate::loader::ParagraphRecord;
use crate::sections::{SectionKind, SectionMap};

const MAX_SKILLS: usize = 10;
const MAX_COMPANIES: usize = 3;
const MAX_ACHIEVEMENTS: usize = 3;

static TEAM_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:team|staff)\s+of\s+(\d+)").expect("team size regex"));

static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*\d[\d,]*(?:\.\d+)?\s*(?:[km]\b|million|thousand|billion)?")
        .expect("money regex")
});

/// Lines carrying a number, percentage, or dollar figure read as quantified
/// results.
static QUANTIFIED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*%|\$\s*\d|\b\d+\b").expect("quantified regex"));

/// Most senior match wins, so ordering here matters.
const MANAGEMENT_LEVELS: &[(&str, &str)] = &[
    ("vice president", "VP"),
    ("vp", "VP"),
    ("director", "Director"),
    ("head of", "Head"),
    ("manager", "Manager"),
];

pub struct IndustryManagerParser;

impl ResumeParser for IndustryManagerParser {
    fn parse(
        &self,
        paragraphs: &[ParagraphRecord],
        sections: &SectionMap,
    ) -> Result<ResumeRecord, AppError> {
        let name = match name_from_first_line(paragraphs) {
            Ok(name) => name,
            // Banner headers like "(555) 987-1234 | m.riley@example.com"
            // still identify the candidate through the email local part.
            Err(e) => name_from_email_banner(paragraphs).ok_or(e)?,
        };
        let contact = extract_contact(sections, paragraphs)?;

        let full_text = paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let experience = sections
            .get(&SectionKind::Experience)
            .map(String::as_str)
            .unwrap_or_default();

        let skills = sections
            .get(&SectionKind::Skills)
            .map(|s| {
                let mut skills = split_skills(s);
                skills.truncate(MAX_SKILLS);
                skills
            })
            .unwrap_or_default();

        let achievements = match sections.get(&SectionKind::Achievements) {
            Some(body) => section_achievements(body, MAX_ACHIEVEMENTS),
            None => quantified_achievements(experience, MAX_ACHIEVEMENTS),
        };

        let education: Vec<EducationEntry> = sections
            .get(&SectionKind::Education)
            .map(|body| education_entries(body))
            .unwrap_or_default();

        Ok(ResumeRecord {
            name,
            contact,
            current_role: current_role(experience),
            years_experience: years_of_experience(&full_text, experience),
            skills,
            companies: companies(experience),
            achievements,
            education,
            management_level: management_level(&full_text),
            team_size: team_size(&full_text),
            budget_responsibility: budget_responsibility(&full_text),
        })
    }
}

/// The position header naming an ongoing role ("... - Present") is the
/// current one; with none, the first header line stands in.
fn current_role(experience: &str) -> String {
    let headers: Vec<&str> = experience
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(['-', '*', '·', '•']))
        .collect();

    let line = headers
        .iter()
        .find(|l| l.to_lowercase().contains("present"))
        .or_else(|| headers.first());

    line.map(|l| role_and_company(l).0).unwrap_or_default()
}

fn companies(experience: &str) -> Vec<String> {
    let mut companies: Vec<String> = Vec::new();
    for line in experience.lines().map(str::trim) {
        if line.is_empty() || line.starts_with(['-', '*', '·', '•']) {
            continue;
        }
        if let (_, Some(company)) = role_and_company(line) {
            if !companies.iter().any(|c| c.eq_ignore_ascii_case(&company)) {
                companies.push(company);
            }
        }
        if companies.len() == MAX_COMPANIES {
            break;
        }
    }
    companies
}

/// Explicit "N years" wins; otherwise tenure is counted from the earliest
/// calendar year in the experience text to today.
fn years_of_experience(full_text: &str, experience: &str) -> Option<u32> {
    if let Some(years) = explicit_years(full_text) {
        return Some(years);
    }
    let earliest = year_mentions(experience).into_iter().next()?;
    let current = chrono::Utc::now().year();
    (current > earliest).then(|| (current - earliest) as u32)
}

fn quantified_achievements(experience: &str, cap: usize) -> Vec<String> {
    experience
        .lines()
        .map(|l| l.trim().trim_start_matches(['-', '*', '·', '•']).trim())
        .filter(|l| l.len() > 20 && QUANTIFIED_RE.is_match(l))
        // Position headers carry dates, which also look quantified.
        .filter(|l| !l.contains('|'))
        .take(cap)
        .map(str::to_string)
        .collect()
}

fn management_level(text: &str) -> Option<String> {
    let haystack = text.to_lowercase();
    MANAGEMENT_LEVELS
        .iter()
        .find(|(needle, _)| haystack.contains(needle))
        .map(|(_, level)| level.to_string())
}

fn team_size(text: &str) -> Option<u32> {
    TEAM_SIZE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The dollar figure on a line that mentions a budget.
fn budget_responsibility(text: &str) -> Option<String> {
    text.lines()
        .filter(|l| l.to_lowercase().contains("budget"))
        .find_map(|l| MONEY_RE.find(l))
        .map(|m| m.as_str().trim().to_string())
}
