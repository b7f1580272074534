//! Section extractor: groups paragraph records into named résumé sections.
//!
//! Single deterministic left-to-right pass: a heading-styled paragraph whose
//! text matches the synonym table opens a section; body/bullet paragraphs are
//! appended to whichever section is open. Text before the first recognized
//! heading is dropped, and unrecognized headings neither open nor close a
//! section (their body joins the previous open section, if any).

use std::collections::BTreeMap;

use crate::loader::{ParagraphRecord, ParagraphStyle};

/// The fixed set of résumé sections the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Achievements,
    Contact,
}

/// Section name → newline-joined body text. A section that was not found is
/// an absent key, never an empty-string placeholder.
pub type SectionMap = BTreeMap<SectionKind, String>;

/// Heading synonyms, matched case-insensitively after trimming a trailing
/// colon. Sourced from the heading vocabulary of the two supported layouts.
const SECTION_SYNONYMS: &[(&str, SectionKind)] = &[
    ("summary", SectionKind::Summary),
    ("professional summary", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("about", SectionKind::Summary),
    ("objective", SectionKind::Summary),
    ("skills", SectionKind::Skills),
    ("skills & abilities", SectionKind::Skills),
    ("skills and abilities", SectionKind::Skills),
    ("core competencies", SectionKind::Skills),
    ("expertise", SectionKind::Skills),
    ("proficiencies", SectionKind::Skills),
    ("experience", SectionKind::Experience),
    ("work experience", SectionKind::Experience),
    ("work history", SectionKind::Experience),
    ("professional experience", SectionKind::Experience),
    ("employment", SectionKind::Experience),
    ("employment history", SectionKind::Experience),
    ("education", SectionKind::Education),
    ("academic background", SectionKind::Education),
    ("qualifications", SectionKind::Education),
    ("achievements", SectionKind::Achievements),
    ("accomplishments", SectionKind::Achievements),
    ("key accomplishments", SectionKind::Achievements),
    ("awards", SectionKind::Achievements),
    ("contact", SectionKind::Contact),
    ("contact information", SectionKind::Contact),
    ("contact info", SectionKind::Contact),
];

/// Resolves a heading paragraph's text to a section, if recognized.
pub fn match_heading(text: &str) -> Option<SectionKind> {
    let normalized = text.trim().trim_end_matches(':').trim().to_lowercase();
    SECTION_SYNONYMS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, kind)| *kind)
}

/// Groups paragraphs into a `SectionMap` in one pass.
pub fn extract(paragraphs: &[ParagraphRecord]) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current: Option<SectionKind> = None;

    for para in paragraphs {
        match para.style {
            ParagraphStyle::Heading1 | ParagraphStyle::Heading2 => {
                if let Some(kind) = match_heading(&para.text) {
                    current = Some(kind);
                    // Duplicate headings re-open the same section; the key
                    // stays unique and new body text appends below.
                    sections.entry(kind).or_default();
                }
            }
            ParagraphStyle::Body | ParagraphStyle::Bullet => {
                if let Some(kind) = current {
                    let body = sections.entry(kind).or_default();
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(&para.text);
                }
            }
        }
    }

    // A heading with no body counts as "not found".
    sections.retain(|_, body| !body.is_empty());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str, style: ParagraphStyle, order: usize) -> ParagraphRecord {
        ParagraphRecord {
            text: text.to_string(),
            style,
            order,
        }
    }

    fn resume_paragraphs() -> Vec<ParagraphRecord> {
        vec![
            para("Jordan Smith", ParagraphStyle::Body, 0),
            para("Work History", ParagraphStyle::Heading1, 1),
            para("Senior Software Engineer | Acme Corp | 2019 - Present", ParagraphStyle::Body, 2),
            para("Led the platform team", ParagraphStyle::Bullet, 3),
            para("Skills", ParagraphStyle::Heading1, 4),
            para("Python, Docker, Kubernetes", ParagraphStyle::Body, 5),
        ]
    }

    #[test]
    fn test_heading_synonyms_map_case_insensitively() {
        assert_eq!(match_heading("EXPERIENCE"), Some(SectionKind::Experience));
        assert_eq!(match_heading("Work History"), Some(SectionKind::Experience));
        assert_eq!(
            match_heading("Professional Experience"),
            Some(SectionKind::Experience)
        );
        assert_eq!(match_heading("Skills & Abilities"), Some(SectionKind::Skills));
        assert_eq!(match_heading("Profile"), Some(SectionKind::Summary));
        assert_eq!(match_heading("Education:"), Some(SectionKind::Education));
        assert_eq!(match_heading("Hobbies"), None);
    }

    #[test]
    fn test_extract_groups_body_under_open_section() {
        let sections = extract(&resume_paragraphs());
        let experience = sections.get(&SectionKind::Experience).unwrap();
        assert!(experience.contains("Senior Software Engineer"));
        assert!(experience.contains("Led the platform team"));
        assert_eq!(
            sections.get(&SectionKind::Skills).unwrap(),
            "Python, Docker, Kubernetes"
        );
    }

    #[test]
    fn test_text_before_first_heading_is_discarded() {
        let sections = extract(&resume_paragraphs());
        for body in sections.values() {
            assert!(!body.contains("Jordan Smith"));
        }
    }

    #[test]
    fn test_unrecognized_heading_keeps_previous_section_open() {
        let paragraphs = vec![
            para("Skills", ParagraphStyle::Heading1, 0),
            para("Python", ParagraphStyle::Body, 1),
            para("Hobbies", ParagraphStyle::Heading1, 2),
            para("Chess", ParagraphStyle::Body, 3),
        ];
        let sections = extract(&paragraphs);
        let skills = sections.get(&SectionKind::Skills).unwrap();
        assert!(skills.contains("Python"));
        // Unrecognized heading is ignored; its body joins the open section.
        assert!(skills.contains("Chess"));
    }

    #[test]
    fn test_body_with_no_open_section_is_discarded() {
        let paragraphs = vec![
            para("Hobbies", ParagraphStyle::Heading1, 0),
            para("Chess", ParagraphStyle::Body, 1),
        ];
        let sections = extract(&paragraphs);
        assert!(sections.is_empty());
    }

    #[test]
    fn test_missing_section_is_absent_not_empty() {
        let sections = extract(&resume_paragraphs());
        assert!(!sections.contains_key(&SectionKind::Education));
        assert!(!sections.contains_key(&SectionKind::Contact));
    }

    #[test]
    fn test_heading_with_no_body_is_absent() {
        let paragraphs = vec![para("Education", ParagraphStyle::Heading1, 0)];
        let sections = extract(&paragraphs);
        assert!(!sections.contains_key(&SectionKind::Education));
    }

    #[test]
    fn test_duplicate_heading_appends_to_same_key() {
        let paragraphs = vec![
            para("Skills", ParagraphStyle::Heading1, 0),
            para("Python", ParagraphStyle::Body, 1),
            para("Skills", ParagraphStyle::Heading1, 2),
            para("Docker", ParagraphStyle::Body, 3),
        ];
        let sections = extract(&paragraphs);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get(&SectionKind::Skills).unwrap(), "Python\nDocker");
    }
}
