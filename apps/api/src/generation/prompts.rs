//! Prompt assembly for the script generation backend.

use crate::parsers::ResumeRecord;
use crate::profiles::IndustryProfile;

const MAX_VOCABULARY_TERMS: usize = 10;

/// Builds the generation prompt from a parsed record and its classified
/// industry profile. Deterministic: the same record and profile always yield
/// the same prompt.
pub fn build_prompt(record: &ResumeRecord, profile: &IndustryProfile) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are writing a first-person narrated video script presenting a candidate to employers.\n\n");
    // Fixed block: every label appears on every request, empty when the
    // parse produced nothing for it.
    prompt.push_str("RESUME INFORMATION\n");
    push_field(&mut prompt, "Name", &record.name);
    push_field(&mut prompt, "Current Role", &record.current_role);
    push_field(
        &mut prompt,
        "Years of Experience",
        &record
            .years_experience
            .map(|y| y.to_string())
            .unwrap_or_default(),
    );
    push_field(&mut prompt, "Company", record.primary_company().unwrap_or_default());
    push_field(&mut prompt, "Skills", &record.skills.join(", "));
    push_field(
        &mut prompt,
        "Key Achievement",
        record.achievements.first().map(String::as_str).unwrap_or_default(),
    );
    push_field(&mut prompt, "Contact", &record.contact_line());

    prompt.push_str(&format!("\nIndustry: {}\n", profile.display_name));
    if !profile.vocabulary.is_empty() {
        let terms: Vec<&str> = profile
            .vocabulary
            .iter()
            .take(MAX_VOCABULARY_TERMS)
            .map(String::as_str)
            .collect();
        prompt.push_str(&format!(
            "Where natural, use industry terms such as: {}.\n",
            terms.join(", ")
        ));
    }

    prompt.push_str(
        "\nWrite the script in exactly six numbered sections with these headers:\n\
         1. Introduction\n\
         2. Experience\n\
         3. Skills\n\
         4. Achievement\n\
         5. Goals\n\
         6. Contact\n\n\
         Speak as the candidate, in a warm professional tone. Use only the resume \
         information above; do not invent employers, dates, or credentials. Close \
         with the contact details exactly as given.\n\n\
         Begin the script now:\n",
    );

    prompt
}

fn push_field(prompt: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        prompt.push_str(&format!("{label}:\n"));
    } else {
        prompt.push_str(&format!("{label}: {value}\n"));
    }
}
