//! FieldSpec registry — the fixed list of candidate details collected before
//! technical questioning, in the order they are asked.

/// Deterministic, local validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRule {
    /// Letters, spaces, hyphens and apostrophes; at least two letters.
    PersonName,
    Email,
    /// Exactly ten ASCII digits.
    Phone,
    /// A whole number of years between 0 and 60.
    YearsOfExperience,
}

/// A yes/no question put to the collaborator, with few-shot examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCheck {
    /// What a valid answer looks like, phrased for the model.
    pub criterion: &'static str,
    pub valid_examples: &'static [&'static str],
    pub invalid_examples: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationPolicy {
    LocalPattern { rule: PatternRule },
    RemoteYesNo { check: RemoteCheck },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    /// Short human name used in retry and skip notices.
    pub label: &'static str,
    pub prompt_text: &'static str,
    pub validation_policy: ValidationPolicy,
}

pub const TECH_STACK_KEY: &str = "tech_stack";

/// The standard screening fields. Keys are unique.
pub fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            key: "full_name",
            label: "full name",
            prompt_text: "What is your full name?",
            validation_policy: ValidationPolicy::LocalPattern {
                rule: PatternRule::PersonName,
            },
        },
        FieldSpec {
            key: "email",
            label: "email address",
            prompt_text: "What is your email address?",
            validation_policy: ValidationPolicy::LocalPattern {
                rule: PatternRule::Email,
            },
        },
        FieldSpec {
            key: "phone",
            label: "phone number",
            prompt_text: "What is your phone number? Please enter 10 digits.",
            validation_policy: ValidationPolicy::LocalPattern {
                rule: PatternRule::Phone,
            },
        },
        FieldSpec {
            key: "location",
            label: "current location",
            prompt_text: "Where are you currently located (city and country)?",
            validation_policy: ValidationPolicy::RemoteYesNo {
                check: RemoteCheck {
                    criterion: "a real-world location such as a city, region, or country",
                    valid_examples: &["Berlin, Germany", "Austin TX", "Bangalore"],
                    invalid_examples: &["asdf", "my house", "12345"],
                },
            },
        },
        FieldSpec {
            key: "years_experience",
            label: "years of experience",
            prompt_text: "How many years of professional experience do you have?",
            validation_policy: ValidationPolicy::LocalPattern {
                rule: PatternRule::YearsOfExperience,
            },
        },
        FieldSpec {
            key: "desired_position",
            label: "desired position",
            prompt_text: "Which position(s) are you applying for?",
            validation_policy: ValidationPolicy::RemoteYesNo {
                check: RemoteCheck {
                    criterion: "a plausible job title or role in the technology industry",
                    valid_examples: &["Backend Engineer", "Data Scientist", "SRE"],
                    invalid_examples: &["pizza", "anything", "lol"],
                },
            },
        },
        FieldSpec {
            key: TECH_STACK_KEY,
            label: "tech stack",
            prompt_text: "Please list your tech stack: languages, frameworks, databases, and tools you are proficient in.",
            validation_policy: ValidationPolicy::RemoteYesNo {
                check: RemoteCheck {
                    criterion: "one or more real programming languages, frameworks, databases, or developer tools",
                    valid_examples: &["Rust, Tokio, PostgreSQL", "Python and Django", "React, TypeScript"],
                    invalid_examples: &["good at computers", "everything", "blue"],
                },
            },
        },
    ]
}
