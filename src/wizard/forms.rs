//! Form definitions for the job-posting and registration wizards.
//!
//! A form is a fixed ordered list of steps, each owning a slice of
//! fields. Field names match the server-side form field names so the
//! collected values can be posted as-is.

/// The user-type discriminant that drives conditional steps and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserType {
    #[default]
    Candidate,
    Company,
}

impl UserType {
    pub fn from_value(value: &str) -> Self {
        match value {
            "company" | "empresa" => UserType::Company,
            _ => UserType::Candidate,
        }
    }

    pub fn as_value(self) -> &'static str {
        match self {
            UserType::Candidate => "candidate",
            UserType::Company => "company",
        }
    }
}

/// What the submit control does, used for its label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitIntent {
    /// Creating a new job posting
    Publish,
    /// Editing an existing posting
    Update,
    /// Creating an account
    Register,
}

impl SubmitIntent {
    pub fn label(self) -> &'static str {
        match self {
            SubmitIntent::Publish => "Publish posting",
            SubmitIntent::Update => "Update posting",
            SubmitIntent::Register => "Create account",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text input
    Text,
    /// Multi-line text area (gets a character counter)
    TextArea,
    /// Numeric input
    Number,
    /// One-of selection (used for the user-type cards)
    Select,
    /// Masked single-line input
    Password,
}

/// One selectable option of a Select field
#[derive(Debug, Clone, Copy)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Server-side field name
    pub name: &'static str,
    pub label: &'static str,
    /// Replacement label while the company user type is selected
    pub company_label: Option<&'static str>,
    pub kind: FieldKind,
    pub required: bool,
    /// Legal-compliance minimum character count
    pub min_chars: Option<usize>,
    /// Whether the field's text goes through the remote language check
    pub language_checked: bool,
    /// 1-based physical step this field belongs to
    pub step: usize,
    pub options: &'static [SelectOption],
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, kind: FieldKind, step: usize) -> Self {
        Self {
            name,
            label,
            company_label: None,
            kind,
            required: false,
            min_chars: None,
            language_checked: false,
            step,
            options: &[],
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn language_checked(mut self) -> Self {
        self.language_checked = true;
        self
    }

    fn min_chars(mut self, min: usize) -> Self {
        self.min_chars = Some(min);
        self
    }

    fn company_label(mut self, label: &'static str) -> Self {
        self.company_label = Some(label);
        self
    }

    fn options(mut self, options: &'static [SelectOption]) -> Self {
        self.options = options;
        self
    }

    /// Label to display for the given user type
    pub fn label_for(&self, user_type: UserType) -> &'static str {
        match user_type {
            UserType::Company => self.company_label.unwrap_or(self.label),
            UserType::Candidate => self.label,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepSpec {
    pub title: &'static str,
}

#[derive(Debug, Clone)]
pub struct FormSpec {
    pub title: &'static str,
    pub intent: SubmitIntent,
    pub steps: Vec<StepSpec>,
    pub fields: Vec<FieldSpec>,
    /// Physical step excluded while the company user type is selected
    pub skip_step_for_company: Option<usize>,
    /// Name of the discriminant field, if the form has one
    pub discriminant: Option<&'static str>,
}

impl FormSpec {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Fields of one physical step, in declaration order
    pub fn fields_of_step(&self, step: usize) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |f| f.step == step)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields that go through the remote language check
    pub fn language_checked_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.language_checked)
            .map(|f| f.name)
            .collect()
    }
}

const USER_TYPE_OPTIONS: &[SelectOption] = &[
    SelectOption {
        value: "candidate",
        label: "Job seeker",
        description: "Looking for inclusive employment opportunities",
    },
    SelectOption {
        value: "company",
        label: "Company",
        description: "Hiring and improving workplace inclusion",
    },
];

const DISABILITY_TYPE_OPTIONS: &[SelectOption] = &[
    SelectOption {
        value: "physical",
        label: "Physical",
        description: "",
    },
    SelectOption {
        value: "visual",
        label: "Visual",
        description: "",
    },
    SelectOption {
        value: "hearing",
        label: "Hearing",
        description: "",
    },
    SelectOption {
        value: "cognitive",
        label: "Cognitive",
        description: "",
    },
    SelectOption {
        value: "none",
        label: "Prefer not to say",
        description: "",
    },
];

/// The job-posting form: four sections, language checks on every
/// free-text field, minimum character counts on the legal-compliance
/// fields.
pub fn job_posting(intent: SubmitIntent) -> FormSpec {
    use FieldKind::*;

    FormSpec {
        title: "Job posting",
        intent,
        steps: vec![
            StepSpec { title: "Basics" },
            StepSpec { title: "Role" },
            StepSpec {
                title: "Accessibility",
            },
            StepSpec {
                title: "Legal compliance",
            },
        ],
        fields: vec![
            FieldSpec::new("title", "Job title", Text, 1)
                .required()
                .language_checked(),
            FieldSpec::new("description", "Description", TextArea, 1)
                .required()
                .language_checked(),
            FieldSpec::new("responsibilities", "Responsibilities", TextArea, 2)
                .required()
                .language_checked(),
            FieldSpec::new("requirements", "Requirements", TextArea, 2)
                .required()
                .language_checked(),
            FieldSpec::new("salary_min", "Minimum salary", Number, 2),
            FieldSpec::new("salary_max", "Maximum salary", Number, 2),
            FieldSpec::new(
                "accessibility_features",
                "Accessibility features",
                TextArea,
                3,
            )
            .language_checked(),
            FieldSpec::new("benefits", "Benefits", TextArea, 3).language_checked(),
            FieldSpec::new(
                "reasonable_accommodations",
                "Reasonable accommodations",
                TextArea,
                4,
            )
            .required()
            .language_checked()
            .min_chars(50),
            FieldSpec::new(
                "workplace_accessibility",
                "Workplace accessibility",
                TextArea,
                4,
            )
            .required()
            .language_checked()
            .min_chars(50),
            FieldSpec::new(
                "non_discrimination_statement",
                "Non-discrimination statement",
                TextArea,
                4,
            )
            .required()
            .language_checked()
            .min_chars(40),
        ],
        skip_step_for_company: None,
        discriminant: None,
    }
}

/// The registration form: five steps, the accessibility profile step is
/// excluded for companies and the identity labels switch meaning.
pub fn registration() -> FormSpec {
    use FieldKind::*;

    FormSpec {
        title: "Registration",
        intent: SubmitIntent::Register,
        steps: vec![
            StepSpec {
                title: "Account type",
            },
            StepSpec {
                title: "Personal data",
            },
            StepSpec {
                title: "Accessibility profile",
            },
            StepSpec {
                title: "Credentials",
            },
            StepSpec { title: "Review" },
        ],
        fields: vec![
            FieldSpec::new("user_type", "I am a", Select, 1)
                .required()
                .options(USER_TYPE_OPTIONS),
            FieldSpec::new("first_name", "First name", Text, 2)
                .required()
                .company_label("Company name"),
            FieldSpec::new("last_name", "Last name", Text, 2)
                .required()
                .company_label("Tax ID"),
            FieldSpec::new("username", "Username", Text, 2)
                .required()
                .company_label("Company username"),
            FieldSpec::new("disability_type", "Disability type", Select, 3)
                .options(DISABILITY_TYPE_OPTIONS),
            FieldSpec::new(
                "accommodation_needs",
                "Accommodations that would help you",
                TextArea,
                3,
            ),
            FieldSpec::new("email", "Email", Text, 4).required(),
            FieldSpec::new("password", "Password", Password, 4).required(),
            FieldSpec::new("password_confirm", "Confirm password", Password, 4).required(),
        ],
        skip_step_for_company: Some(3),
        discriminant: Some("user_type"),
    }
}
