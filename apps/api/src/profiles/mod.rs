//! Industry profiles: classification vocabulary plus the deterministic
//! fallback script template for each supported industry.
//!
//! Profiles are declared in YAML, either from `PROFILES_PATH` or the embedded
//! default set. Declaration order is significant: classification ties break
//! toward the profile declared first, which is why the raw file keeps its
//! `serde_yaml::Mapping` (insertion-ordered) before conversion.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::parsers::ResumeRecord;

/// Default profile set compiled into the binary.
const DEFAULT_PROFILES: &str = include_str!("../../profiles.yaml");

/// Per-section fallback script text with `{placeholder}` slots.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptTemplate {
    pub intro: String,
    pub experience: String,
    pub skills: String,
    pub achievement: String,
    pub goals: String,
    pub contact: String,
}

#[derive(Debug, Deserialize)]
struct ProfileConfig {
    display_name: Option<String>,
    #[serde(default)]
    vocabulary: Vec<String>,
    template: ScriptTemplate,
}

#[derive(Debug, Deserialize)]
struct ProfilesFile {
    profiles: serde_yaml::Mapping,
    fallback: String,
}

#[derive(Debug, Clone)]
pub struct IndustryProfile {
    pub id: String,
    pub display_name: String,
    pub vocabulary: Vec<String>,
    pub template: ScriptTemplate,
}

/// The loaded profile set, in declaration order.
#[derive(Debug)]
pub struct ProfileSet {
    profiles: Vec<IndustryProfile>,
    fallback_idx: usize,
}

impl ProfileSet {
    /// Loads profiles from `path` when given, or the embedded defaults.
    /// Any problem here is a startup failure, not a request error.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read profiles file '{path}'"))?;
                Self::from_yaml(&yaml)
                    .with_context(|| format!("invalid profiles file '{path}'"))
            }
            None => Self::from_yaml(DEFAULT_PROFILES).context("invalid embedded profile set"),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: ProfilesFile =
            serde_yaml::from_str(yaml).context("profiles YAML does not match expected shape")?;

        let mut profiles = Vec::with_capacity(file.profiles.len());
        for (key, value) in file.profiles {
            let id: String = serde_yaml::from_value(key).context("profile id must be a string")?;
            let config: ProfileConfig = serde_yaml::from_value(value)
                .with_context(|| format!("profile '{id}' is malformed"))?;
            profiles.push(IndustryProfile {
                display_name: config.display_name.clone().unwrap_or_else(|| id.clone()),
                vocabulary: config
                    .vocabulary
                    .iter()
                    .map(|t| t.to_lowercase())
                    .collect(),
                template: config.template,
                id,
            });
        }

        if profiles.is_empty() {
            bail!("profile set declares no profiles");
        }
        let fallback_idx = profiles
            .iter()
            .position(|p| p.id == file.fallback)
            .with_context(|| format!("fallback profile '{}' is not declared", file.fallback))?;

        Ok(ProfileSet {
            profiles,
            fallback_idx,
        })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn fallback(&self) -> &IndustryProfile {
        &self.profiles[self.fallback_idx]
    }

    /// Picks the profile whose vocabulary scores the most substring hits
    /// against the candidate's role and skills. Ties keep the earlier
    /// declaration; zero hits means the fallback profile.
    pub fn classify(&self, record: &ResumeRecord) -> &IndustryProfile {
        let haystack = format!(
            "{} {}",
            record.current_role.to_lowercase(),
            record.skills.join(" ").to_lowercase()
        );

        let mut best: Option<(&IndustryProfile, usize)> = None;
        for profile in &self.profiles {
            let hits = profile
                .vocabulary
                .iter()
                .filter(|term| haystack.contains(term.as_str()))
                .count();
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((profile, hits));
            }
        }

        match best {
            Some((profile, _)) => profile,
            None => self.fallback(),
        }
    }
}

impl ScriptTemplate {
    /// Renders the six-section fallback script for a record. Always produces
    /// a complete script regardless of how sparse the record is.
    pub fn render(&self, record: &ResumeRecord) -> String {
        let sections = [
            ("1. Introduction", &self.intro),
            ("2. Experience", &self.experience),
            ("3. Skills", &self.skills),
            ("4. Achievement", &self.achievement),
            ("5. Goals", &self.goals),
            ("6. Contact", &self.contact),
        ];
        sections
            .iter()
            .map(|(header, body)| format!("{header}\n{}", substitute(body.trim(), record)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Fills `{placeholder}` slots from the record, with neutral wording for
/// anything the parse could not determine.
fn substitute(template: &str, record: &ResumeRecord) -> String {
    let years = record
        .years_experience
        .map(|y| y.to_string())
        .unwrap_or_else(|| "several".to_string());
    let role = if record.current_role.is_empty() {
        "professional".to_string()
    } else {
        record.current_role.clone()
    };
    let company = record
        .primary_company()
        .unwrap_or("my current company")
        .to_string();
    let skills = if record.skills.is_empty() {
        "a broad professional toolkit".to_string()
    } else {
        record.skills[..record.skills.len().min(3)].join(", ")
    };
    let achievement = record
        .achievements
        .first()
        .map(String::as_str)
        .unwrap_or("consistently delivering for my teams")
        .to_string();
    let email = record.contact.email.clone().unwrap_or_default();
    let phone = record.contact.phone.clone().unwrap_or_default();

    template
        .replace("{name}", &record.name)
        .replace("{role}", &role)
        .replace("{years}", &years)
        .replace("{company}", &company)
        .replace("{skills}", &skills)
        .replace("{achievement}", &achievement)
        .replace("{email}", &email)
        .replace("{phone}", &phone)
}
