//! Candidate profile: the form a candidate fills in before the interview,
//! validated all at once into an immutable `CandidateProfile`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value of the experience selector before the candidate picks a bucket.
pub const EXPERIENCE_UNSELECTED: &str = "Select...";

/// Choice that unlocks the free-text field of a multi-select list.
pub const OTHER: &str = "Other";

pub const EXPERIENCE_BUCKETS: &[&str] = &[
    "0-1 years",
    "1-2 years",
    "2-3 years",
    "3-5 years",
    "5-7 years",
    "7-10 years",
    "10+ years",
];

pub const POSITION_OPTIONS: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "ML Engineer",
    "AI Researcher",
    "Full Stack Developer",
    "Backend Developer",
    "Frontend Developer",
    "DevOps Engineer",
    "Product Manager",
    "Tech Lead",
    OTHER,
];

pub const TECH_STACK_OPTIONS: &[&str] = &[
    "Python", "JavaScript", "Java", "C++", "C#", "Go", "Rust", "Ruby", "PHP", "Swift", "Kotlin",
    "React", "Angular", "Vue.js", "Node.js", "Django", "Flask", "Spring", "Laravel", ".NET", OTHER,
];

pub const KEY_TECHNOLOGY_OPTIONS: &[&str] = &[
    "Machine Learning",
    "Deep Learning",
    "Natural Language Processing",
    "Computer Vision",
    "Data Science",
    "Big Data",
    "Cloud Computing (AWS)",
    "Cloud Computing (Azure)",
    "Cloud Computing (GCP)",
    "DevOps",
    "Microservices",
    "Blockchain",
    "IoT",
    "Cybersecurity",
    "Mobile Development",
    "Web Development",
    "Database Management",
    "API Development",
    OTHER,
];

/// Seniority the question generator pitches its questions at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

/// Maps an experience bucket to a level. Unknown buckets count as Mid.
pub fn experience_level(experience_years: &str) -> ExperienceLevel {
    match experience_years {
        "0-1 years" | "1-2 years" | "2-3 years" => ExperienceLevel::Junior,
        "3-5 years" | "5-7 years" => ExperienceLevel::Mid,
        "7-10 years" | "10+ years" => ExperienceLevel::Senior,
        _ => ExperienceLevel::Mid,
    }
}

/// Raw form submission, as the client sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub experience_years: String,
    pub desired_positions: Vec<String>,
    pub other_position: Option<String>,
    pub tech_stack: Vec<String>,
    pub other_tech: Option<String>,
    pub key_technologies: Vec<String>,
    pub other_key_technology: Option<String>,
}

/// A validated profile. Only constructed through `ProfileForm::validate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub experience_years: String,
    pub desired_positions: Vec<String>,
    pub tech_stack: Vec<String>,
    pub key_technologies: Vec<String>,
}

impl CandidateProfile {
    pub fn experience_level(&self) -> ExperienceLevel {
        experience_level(&self.experience_years)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field,
                message: message.into(),
            }],
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProfileForm {
    /// Checks every field and reports all violations together.
    pub fn validate(self) -> Result<CandidateProfile, ValidationError> {
        let mut violations = Vec::new();

        let full_name = required_text(&mut violations, "full_name", "Full name", self.full_name);
        let email = required_text(&mut violations, "email", "Email address", self.email);
        let phone = required_text(&mut violations, "phone", "Phone number", self.phone);
        let location = required_text(&mut violations, "location", "Current location", self.location);

        let experience_years = self.experience_years.trim().to_string();
        if experience_years.is_empty() || experience_years == EXPERIENCE_UNSELECTED {
            violations.push(FieldViolation {
                field: "experience_years",
                message: "Please select years of experience".to_string(),
            });
        } else if !EXPERIENCE_BUCKETS.contains(&experience_years.as_str()) {
            violations.push(FieldViolation {
                field: "experience_years",
                message: format!("Unknown experience range '{experience_years}'"),
            });
        }

        let desired_positions = required_choices(
            &mut violations,
            "desired_positions",
            "Please select at least one desired position",
            self.desired_positions,
            self.other_position,
        );
        let tech_stack = required_choices(
            &mut violations,
            "tech_stack",
            "Please select your technology stack",
            self.tech_stack,
            self.other_tech,
        );
        let key_technologies = required_choices(
            &mut violations,
            "key_technologies",
            "Please select your key technologies",
            self.key_technologies,
            self.other_key_technology,
        );

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(CandidateProfile {
            full_name,
            email,
            phone,
            location,
            experience_years,
            desired_positions,
            tech_stack,
            key_technologies,
        })
    }
}

fn required_text(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    label: &str,
    value: String,
) -> String {
    let value = value.trim().to_string();
    if value.is_empty() {
        violations.push(FieldViolation {
            field,
            message: format!("{label} is required"),
        });
    }
    value
}

/// Non-empty selection, with the free-text value appended when "Other" was picked.
fn required_choices(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    message: &str,
    selected: Vec<String>,
    other: Option<String>,
) -> Vec<String> {
    let mut choices: Vec<String> = selected
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if choices.iter().any(|c| c == OTHER) {
        if let Some(extra) = other.map(|o| o.trim().to_string()).filter(|o| !o.is_empty()) {
            choices.push(extra);
        }
    }

    if choices.is_empty() {
        violations.push(FieldViolation {
            field,
            message: message.to_string(),
        });
    }
    choices
}

/// The fixed option lists the profile form offers.
#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub experience_unselected: &'static str,
    pub experience_years: &'static [&'static str],
    pub desired_positions: &'static [&'static str],
    pub tech_stack: &'static [&'static str],
    pub key_technologies: &'static [&'static str],
}

pub fn form_options() -> FormOptions {
    FormOptions {
        experience_unselected: EXPERIENCE_UNSELECTED,
        experience_years: EXPERIENCE_BUCKETS,
        desired_positions: POSITION_OPTIONS,
        tech_stack: TECH_STACK_OPTIONS,
        key_technologies: KEY_TECHNOLOGY_OPTIONS,
    }
}

#[cfg(test)]
pub(crate) fn sample_form() -> ProfileForm {
    ProfileForm {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+44 20 7946 0000".to_string(),
        location: "London, UK".to_string(),
        experience_years: "3-5 years".to_string(),
        desired_positions: vec!["Software Engineer".to_string()],
        tech_stack: vec!["Python".to_string()],
        key_technologies: vec!["Machine Learning".to_string()],
        ..ProfileForm::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_junior_buckets() {
        for bucket in ["0-1 years", "1-2 years", "2-3 years"] {
            assert_eq!(experience_level(bucket), ExperienceLevel::Junior, "{bucket}");
        }
    }

    #[test]
    fn test_mid_buckets() {
        for bucket in ["3-5 years", "5-7 years"] {
            assert_eq!(experience_level(bucket), ExperienceLevel::Mid, "{bucket}");
        }
    }

    #[test]
    fn test_senior_buckets() {
        for bucket in ["7-10 years", "10+ years"] {
            assert_eq!(experience_level(bucket), ExperienceLevel::Senior, "{bucket}");
        }
    }

    #[test]
    fn test_unknown_bucket_defaults_to_mid() {
        assert_eq!(experience_level("forever"), ExperienceLevel::Mid);
        assert_eq!(experience_level(""), ExperienceLevel::Mid);
        assert_eq!(experience_level(EXPERIENCE_UNSELECTED), ExperienceLevel::Mid);
    }

    #[test]
    fn test_every_offered_bucket_is_mapped() {
        // The explicit arms cover all offered buckets; only free text falls through.
        let levels: Vec<_> = EXPERIENCE_BUCKETS.iter().map(|b| experience_level(b)).collect();
        assert_eq!(levels.iter().filter(|l| **l == ExperienceLevel::Junior).count(), 3);
        assert_eq!(levels.iter().filter(|l| **l == ExperienceLevel::Mid).count(), 2);
        assert_eq!(levels.iter().filter(|l| **l == ExperienceLevel::Senior).count(), 2);
    }

    #[test]
    fn test_valid_form_passes() {
        let profile = sample_form().validate().unwrap();
        assert_eq!(profile.full_name, "Ada Lovelace");
        assert_eq!(profile.experience_level(), ExperienceLevel::Mid);
    }

    #[test]
    fn test_all_missing_contact_fields_reported_together() {
        let form = ProfileForm {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            ..sample_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.fields(), vec!["full_name", "email", "phone", "location"]);
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let err = ProfileForm::default().validate().unwrap_err();
        assert_eq!(
            err.fields(),
            vec![
                "full_name",
                "email",
                "phone",
                "location",
                "experience_years",
                "desired_positions",
                "tech_stack",
                "key_technologies"
            ]
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let form = ProfileForm {
            email: "   ".to_string(),
            ..sample_form()
        };
        assert_eq!(form.validate().unwrap_err().fields(), vec!["email"]);
    }

    #[test]
    fn test_unselected_experience_rejected() {
        let form = ProfileForm {
            experience_years: EXPERIENCE_UNSELECTED.to_string(),
            ..sample_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.fields(), vec!["experience_years"]);
        assert!(err.to_string().contains("select years of experience"));
    }

    #[test]
    fn test_unknown_experience_rejected() {
        let form = ProfileForm {
            experience_years: "a while".to_string(),
            ..sample_form()
        };
        assert_eq!(form.validate().unwrap_err().fields(), vec!["experience_years"]);
    }

    #[test]
    fn test_other_text_appended_when_other_selected() {
        let form = ProfileForm {
            tech_stack: vec!["Rust".to_string(), OTHER.to_string()],
            other_tech: Some(" Elixir ".to_string()),
            ..sample_form()
        };
        let profile = form.validate().unwrap();
        assert_eq!(profile.tech_stack, vec!["Rust", OTHER, "Elixir"]);
    }

    #[test]
    fn test_other_text_ignored_without_other_selected() {
        let form = ProfileForm {
            desired_positions: vec!["Tech Lead".to_string()],
            other_position: Some("Blockchain Developer".to_string()),
            ..sample_form()
        };
        let profile = form.validate().unwrap();
        assert_eq!(profile.desired_positions, vec!["Tech Lead"]);
    }

    #[test]
    fn test_blank_selections_do_not_satisfy_requirement() {
        let form = ProfileForm {
            key_technologies: vec!["  ".to_string()],
            ..sample_form()
        };
        assert_eq!(form.validate().unwrap_err().fields(), vec!["key_technologies"]);
    }

    #[test]
    fn test_form_options_offer_other_everywhere() {
        let options = form_options();
        assert!(options.desired_positions.contains(&OTHER));
        assert!(options.tech_stack.contains(&OTHER));
        assert!(options.key_technologies.contains(&OTHER));
        assert_eq!(options.experience_years.len(), 7);
    }
}
