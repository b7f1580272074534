//! ATS/HR layout parser.
//!
//! Expects the conventional ATS résumé shape: name on the first line, a
//! contact block near the top, and headed Experience/Skills/Education
//! sections. Experience headers follow "Role | Company | Dates" or
//! "Role at Company".

use super::{
    education_entries, experience_achievements, explicit_years, extract_contact,
    name_from_first_line, role_and_company, section_achievements, split_skills, EducationEntry,
    ResumeParser, ResumeRecord,
};
use crate::errors::AppError;
use crate::loader::ParagraphRecord;
use crate::sections::{SectionKind, SectionMap};

const MAX_SKILLS: usize = 10;
const MAX_COMPANIES: usize = 3;
const MAX_ACHIEVEMENTS: usize = 5;

pub struct AtsParser;

impl ResumeParser for AtsParser {
    fn parse(
        &self,
        paragraphs: &[ParagraphRecord],
        sections: &SectionMap,
    ) -> Result<ResumeRecord, AppError> {
        let name = name_from_first_line(paragraphs)?;
        let contact = extract_contact(sections, paragraphs)?;

        let experience = sections
            .get(&SectionKind::Experience)
            .map(String::as_str)
            .unwrap_or_default();

        let (current_role, companies) = role_and_companies(experience);

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
            None => experience_achievements(experience, MAX_ACHIEVEMENTS),
        };

        let education = education(sections);

        Ok(ResumeRecord {
            name,
            contact,
            current_role,
            years_experience: years_of_experience(paragraphs, experience),
            skills,
            companies,
            achievements,
            education,
            management_level: None,
            team_size: None,
            budget_responsibility: None,
        })
    }
}

/// Current role from the first experience header line, plus every company
/// mentioned in header lines, most recent first.
fn role_and_companies(experience: &str) -> (String, Vec<String>) {
    let mut current_role = String::new();
    let mut companies: Vec<String> = Vec::new();

    for line in experience.lines().map(str::trim).filter(|l| !l.is_empty()) {
        // Bullet lines are accomplishments, not position headers.
        if line.starts_with(['-', '*', '·', '•']) {
            continue;
        }
        let (role, company) = role_and_company(line);
        if current_role.is_empty() && !role.is_empty() {
            current_role = role;
        }
        if let Some(company) = company {
            if !companies.iter().any(|c| c.eq_ignore_ascii_case(&company)) {
                companies.push(company);
            }
        }
        if companies.len() == MAX_COMPANIES {
            break;
        }
    }

    (current_role, companies)
}

/// Explicit "N years" mention anywhere in the document wins; otherwise the
/// spread of calendar years in the experience section is used.
fn years_of_experience(paragraphs: &[ParagraphRecord], experience: &str) -> Option<u32> {
    let full_text = paragraphs
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(years) = explicit_years(&full_text) {
        return Some(years);
    }

    let years = super::year_mentions(experience);
    match (years.first(), years.last()) {
        (Some(first), Some(last)) if last > first => Some((last - first) as u32),
        _ => None,
    }
}

fn education(sections: &SectionMap) -> Vec<EducationEntry> {
    sections
        .get(&SectionKind::Education)
        .map(|body| education_entries(body))
        .unwrap_or_default()
}
