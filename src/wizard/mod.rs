//! The form wizard: step navigation, per-field validation and the
//! debounced inclusive-language checks, driven by key events and ticks.

pub mod forms;
pub mod navigator;
pub mod validation;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{ApiError, LanguageIssue};
use crate::ui::field::FormField;
use forms::{FormSpec, UserType};
use navigator::StepNavigator;
use validation::{Debouncer, LanguageRequest, SubmitCheck, ValidationState};

/// What the event loop should do after a key was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    None,
    Quit,
    /// The guard passed; `values` holds the collected form data
    Submitted { values: Vec<(String, String)> },
}

/// Modal alert shown over the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Submission blocked by non-inclusive language
    LanguageBlocked { field_count: usize },
    /// Submission blocked by invalid fields
    InvalidFields { count: usize },
}

impl Alert {
    pub fn message(&self) -> String {
        match self {
            Alert::LanguageBlocked { field_count } => format!(
                "Please correct the non-inclusive language in {field_count} field(s) before submitting."
            ),
            Alert::InvalidFields { count } => {
                format!("Please correct {count} invalid field(s) before submitting.")
            }
        }
    }
}

pub struct WizardScreen {
    form: FormSpec,
    navigator: StepNavigator,
    fields: HashMap<&'static str, FormField>,
    /// Focus index within the current step's field list
    focused: usize,
    validation: ValidationState,
    debouncer: Debouncer,
    alert: Option<Alert>,
    confirm_quit: bool,
    /// Focus moves to the first field this long after a step change
    focus_settle: Duration,
    pending_focus: Option<Instant>,
    user_type: UserType,
}

impl WizardScreen {
    pub fn new(form: FormSpec, debounce: Duration, focus_settle: Duration) -> Self {
        let fields = form
            .fields
            .iter()
            .map(|spec| (spec.name, FormField::from_spec(spec)))
            .collect();
        let navigator = StepNavigator::new(form.total_steps(), form.skip_step_for_company);

        Self {
            form,
            navigator,
            fields,
            focused: 0,
            validation: ValidationState::new(),
            debouncer: Debouncer::new(debounce),
            alert: None,
            confirm_quit: false,
            focus_settle,
            pending_focus: None,
            user_type: UserType::default(),
        }
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn confirm_quit(&self) -> bool {
        self.confirm_quit
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.get_mut(name)
    }

    /// Names of the current step's fields, in declaration order
    pub fn current_step_fields(&self) -> Vec<&'static str> {
        let step = self.navigator.current_physical();
        self.form.fields_of_step(step).map(|f| f.name).collect()
    }

    fn focused_field_name(&self) -> Option<&'static str> {
        self.current_step_fields().get(self.focused).copied()
    }

    /// All navigable field names in form order, excluding fields of a
    /// step hidden by the skip rule.
    fn active_field_order(&self) -> Vec<&'static str> {
        self.form
            .fields
            .iter()
            .filter(|f| self.navigator.logical_of_physical(f.step).is_some())
            .map(|f| f.name)
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> WizardAction {
        // modals take the keyboard first
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return WizardAction::None;
        }
        if self.confirm_quit {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => WizardAction::Quit,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_quit = false;
                    WizardAction::None
                }
                _ => WizardAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => {
                if self.validation.modified() {
                    self.confirm_quit = true;
                    WizardAction::None
                } else {
                    WizardAction::Quit
                }
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.navigator.is_last() {
                    self.try_submit()
                } else {
                    WizardAction::None
                }
            }
            KeyCode::Tab => {
                self.blur_focused();
                let count = self.current_step_fields().len();
                if count > 0 {
                    self.focused = (self.focused + 1) % count;
                }
                WizardAction::None
            }
            KeyCode::BackTab => {
                self.blur_focused();
                let count = self.current_step_fields().len();
                if count > 0 {
                    self.focused = (self.focused + count - 1) % count;
                }
                WizardAction::None
            }
            KeyCode::Right if self.step_nav_allowed(key.modifiers) => {
                self.change_step(true, now);
                WizardAction::None
            }
            KeyCode::Left if self.step_nav_allowed(key.modifiers) => {
                self.change_step(false, now);
                WizardAction::None
            }
            code => {
                self.feed_focused(code, now);
                WizardAction::None
            }
        }
    }

    /// Left/Right change steps with Ctrl always, and bare while the
    /// focused widget does not use them for cursor movement.
    fn step_nav_allowed(&self, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.focused_field_name()
            .and_then(|name| self.fields.get(name))
            .map_or(true, |field| !field.is_text_entry())
    }

    fn change_step(&mut self, forward: bool, now: Instant) {
        self.blur_focused();
        let before = self.navigator.current_logical();
        if forward {
            self.navigator.next();
        } else {
            self.navigator.prev();
        }
        if self.navigator.current_logical() != before {
            self.focused = 0;
            self.pending_focus = Some(now + self.focus_settle);
        }
    }

    /// Feed a key to the focused widget and run the input hooks.
    fn feed_focused(&mut self, code: KeyCode, now: Instant) {
        let Some(name) = self.focused_field_name() else {
            return;
        };
        let Some(field) = self.fields.get_mut(name) else {
            return;
        };
        if !field.handle_key(code) {
            return;
        }

        let value = field.value();
        self.validation.set_modified();

        if let Some(spec) = self.form.field(name) {
            if let Some(min) = spec.min_chars {
                self.validation
                    .apply_legal_length(name, value.chars().count(), min);
            }
            if spec.language_checked {
                self.debouncer.record_input(name, value.clone(), now);
            }
        }

        if self.form.discriminant == Some(name) {
            self.apply_discriminant(&value);
        }
    }

    /// React to a discriminant change: relabel, toggle the skip rule.
    /// The current logical step is preserved by the navigator.
    fn apply_discriminant(&mut self, value: &str) {
        let user_type = UserType::from_value(value);
        if user_type != self.user_type {
            self.user_type = user_type;
            self.navigator
                .set_skip_active(user_type == UserType::Company);
        }
    }

    /// Blur hooks for the field losing focus
    fn blur_focused(&mut self) {
        let Some(name) = self.focused_field_name() else {
            return;
        };
        let Some(spec) = self.form.field(name) else {
            return;
        };
        let value = self
            .fields
            .get(name)
            .map(FormField::value)
            .unwrap_or_default();

        // min-length fields are governed by their length rule alone
        if spec.required && spec.min_chars.is_none() {
            self.validation.mark_filled_on_blur(name, &value);
        }

        if name == "salary_min" || name == "salary_max" {
            let min = self
                .fields
                .get("salary_min")
                .map(FormField::value)
                .unwrap_or_default();
            let max = self
                .fields
                .get("salary_max")
                .map(FormField::value)
                .unwrap_or_default();
            self.validation.apply_salary_range("salary_max", &min, &max);
        }
    }

    /// Fire due language checks and settle focus after step changes.
    /// Checks on now-empty text are resolved locally; clearing the
    /// field clears its errors without a round trip.
    pub fn on_tick(&mut self, now: Instant) -> Vec<LanguageRequest> {
        if let Some(deadline) = self.pending_focus {
            if deadline <= now {
                self.pending_focus = None;
                self.focused = 0;
            }
        }

        self.debouncer
            .due(now)
            .into_iter()
            .filter(|request| {
                if request.text.trim().is_empty() {
                    self.validation.clear_language_errors(&request.field);
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    /// Apply a language-check response. Responses superseded by a later
    /// request for the same field are dropped; a failed check leaves
    /// the field's recorded issues exactly as they were, so an outage
    /// neither adds nor lifts a block.
    pub fn apply_language_result(
        &mut self,
        field: &str,
        seq: u64,
        result: Result<Vec<LanguageIssue>, ApiError>,
    ) {
        if !self.debouncer.is_latest(field, seq) {
            tracing::debug!(field, seq, "discarding stale language check response");
            return;
        }
        match result {
            Ok(issues) => self.validation.record_language_result(field, issues),
            Err(err) => {
                tracing::warn!(field, error = %err, "language check failed, keeping previous result");
            }
        }
    }

    /// Submit-time guard: language errors block outright, then invalid
    /// fields get an alert and a focus jump to the first offender.
    fn try_submit(&mut self) -> WizardAction {
        match self.validation.submit_check(&self.active_field_order()) {
            SubmitCheck::BlockedByLanguage { field_count } => {
                self.alert = Some(Alert::LanguageBlocked { field_count });
                WizardAction::None
            }
            SubmitCheck::BlockedByInvalid { first_field, count } => {
                self.alert = Some(Alert::InvalidFields { count });
                self.focus_field(&first_field);
                WizardAction::None
            }
            SubmitCheck::Ready => {
                let values = self.collect_values();
                self.validation.clear_modified();
                WizardAction::Submitted { values }
            }
        }
    }

    /// Move step and focus to a named field
    fn focus_field(&mut self, name: &str) {
        let Some(spec) = self.form.field(name) else {
            return;
        };
        let Some(logical) = self.navigator.logical_of_physical(spec.step) else {
            return;
        };
        self.navigator.go_to_logical(logical);
        self.focused = self
            .current_step_fields()
            .iter()
            .position(|n| *n == name)
            .unwrap_or(0);
        self.pending_focus = None;
    }

    /// Collected values in form order, skipped-step fields excluded
    fn collect_values(&self) -> Vec<(String, String)> {
        self.active_field_order()
            .into_iter()
            .filter_map(|name| {
                self.fields
                    .get(name)
                    .map(|f| (name.to_string(), f.value()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::forms::SubmitIntent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn type_text(wizard: &mut WizardScreen, text: &str, now: Instant) {
        for c in text.chars() {
            wizard.handle_key(key(KeyCode::Char(c)), now);
        }
    }

    fn posting_wizard() -> WizardScreen {
        WizardScreen::new(
            forms::job_posting(SubmitIntent::Publish),
            Duration::from_millis(500),
            Duration::from_millis(300),
        )
    }

    fn registration_wizard() -> WizardScreen {
        WizardScreen::new(
            forms::registration(),
            Duration::from_millis(500),
            Duration::from_millis(300),
        )
    }

    #[test]
    fn test_typing_schedules_debounced_check() {
        let mut wizard = posting_wizard();
        let start = Instant::now();

        type_text(&mut wizard, "Dev", start);

        assert!(wizard.on_tick(start + Duration::from_millis(400)).is_empty());
        let fired = wizard.on_tick(start + Duration::from_millis(600));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].field, "title");
        assert_eq!(fired[0].text, "Dev");
    }

    #[test]
    fn test_cleared_field_resolves_locally() {
        let mut wizard = posting_wizard();
        let start = Instant::now();

        type_text(&mut wizard, "a", start);
        let fired = wizard.on_tick(start + Duration::from_secs(1));
        let seq = fired[0].seq;
        wizard.apply_language_result(
            "title",
            seq,
            Ok(vec![LanguageIssue {
                term: "discapacitado".into(),
                suggestion: "persona con discapacidad".into(),
            }]),
        );
        assert_eq!(wizard.validation().language_error_count(), 1);

        // deleting the text clears the error without any request
        wizard.handle_key(key(KeyCode::Backspace), start + Duration::from_secs(2));
        let fired = wizard.on_tick(start + Duration::from_secs(3));
        assert!(fired.is_empty());
        assert_eq!(wizard.validation().language_error_count(), 0);
    }

    #[test]
    fn test_stale_response_does_not_resurrect_errors() {
        let mut wizard = posting_wizard();
        let start = Instant::now();

        type_text(&mut wizard, "x", start);
        let old_seq = wizard.on_tick(start + Duration::from_secs(1))[0].seq;

        type_text(&mut wizard, "y", start + Duration::from_secs(2));
        let new_seq = wizard.on_tick(start + Duration::from_secs(3))[0].seq;

        wizard.apply_language_result(
            "title",
            old_seq,
            Ok(vec![LanguageIssue {
                term: "viejo".into(),
                suggestion: "persona mayor".into(),
            }]),
        );
        assert_eq!(wizard.validation().language_error_count(), 0);

        wizard.apply_language_result("title", new_seq, Ok(vec![]));
        assert_eq!(wizard.validation().language_error_count(), 0);
    }

    #[test]
    fn test_failed_check_adds_no_errors() {
        let mut wizard = posting_wizard();
        let start = Instant::now();

        type_text(&mut wizard, "z", start);
        let seq = wizard.on_tick(start + Duration::from_secs(1))[0].seq;
        wizard.apply_language_result("title", seq, Err(ApiError::http("language", 500)));
        assert_eq!(wizard.validation().language_error_count(), 0);
    }

    #[test]
    fn test_failed_recheck_keeps_prior_errors() {
        let mut wizard = posting_wizard();
        let start = Instant::now();

        type_text(&mut wizard, "bad", start);
        let seq = wizard.on_tick(start + Duration::from_secs(1))[0].seq;
        wizard.apply_language_result(
            "title",
            seq,
            Ok(vec![LanguageIssue {
                term: "discapacitado".into(),
                suggestion: "persona con discapacidad".into(),
            }]),
        );
        assert_eq!(wizard.validation().language_error_count(), 1);

        // a later check fails; the recorded block must survive
        type_text(&mut wizard, "x", start + Duration::from_secs(2));
        let seq = wizard.on_tick(start + Duration::from_secs(3))[0].seq;
        wizard.apply_language_result("title", seq, Err(ApiError::http("language", 500)));
        assert_eq!(wizard.validation().language_error_count(), 1);
    }

    #[test]
    fn test_discriminant_toggles_skip_without_moving() {
        let mut wizard = registration_wizard();
        let now = Instant::now();

        assert_eq!(wizard.navigator().total_logical(), 5);
        // user_type is the only field on step 1
        wizard.handle_key(key(KeyCode::Down), now);
        assert_eq!(wizard.user_type(), UserType::Company);
        assert_eq!(wizard.navigator().total_logical(), 4);
        assert_eq!(wizard.navigator().current_logical(), 1);

        wizard.handle_key(key(KeyCode::Up), now);
        assert_eq!(wizard.user_type(), UserType::Candidate);
        assert_eq!(wizard.navigator().total_logical(), 5);
    }

    #[test]
    fn test_company_path_skips_accessibility_step() {
        let mut wizard = registration_wizard();
        let now = Instant::now();

        wizard.handle_key(key(KeyCode::Down), now);
        // select fields leave Left/Right for step navigation
        wizard.handle_key(key(KeyCode::Right), now);
        assert_eq!(wizard.navigator().current_physical(), 2);
        wizard.handle_key(ctrl(KeyCode::Right), now);
        // physical 3 is skipped for companies
        assert_eq!(wizard.navigator().current_physical(), 4);
    }

    #[test]
    fn test_esc_without_changes_quits_directly() {
        let mut wizard = posting_wizard();
        let action = wizard.handle_key(key(KeyCode::Esc), Instant::now());
        assert_eq!(action, WizardAction::Quit);
    }

    #[test]
    fn test_esc_with_changes_asks_first() {
        let mut wizard = posting_wizard();
        let now = Instant::now();
        type_text(&mut wizard, "x", now);

        assert_eq!(wizard.handle_key(key(KeyCode::Esc), now), WizardAction::None);
        assert!(wizard.confirm_quit());

        // declining keeps the wizard alive
        assert_eq!(
            wizard.handle_key(key(KeyCode::Char('n')), now),
            WizardAction::None
        );
        assert!(!wizard.confirm_quit());

        wizard.handle_key(key(KeyCode::Esc), now);
        assert_eq!(
            wizard.handle_key(key(KeyCode::Char('y')), now),
            WizardAction::Quit
        );
    }

    #[test]
    fn test_submit_blocked_by_language_shows_alert() {
        let mut wizard = posting_wizard();
        let start = Instant::now();

        type_text(&mut wizard, "bad", start);
        let seq = wizard.on_tick(start + Duration::from_secs(1))[0].seq;
        wizard.apply_language_result(
            "title",
            seq,
            Ok(vec![LanguageIssue {
                term: "minusválido".into(),
                suggestion: "persona con discapacidad".into(),
            }]),
        );

        for _ in 0..3 {
            wizard.handle_key(ctrl(KeyCode::Right), start);
        }
        assert!(wizard.navigator().is_last());

        let action = wizard.handle_key(ctrl(KeyCode::Char('s')), start);
        assert_eq!(action, WizardAction::None);
        assert!(matches!(
            wizard.alert(),
            Some(Alert::LanguageBlocked { field_count: 1 })
        ));
    }

    #[test]
    fn test_submit_jumps_to_first_invalid_field() {
        let mut wizard = posting_wizard();
        let now = Instant::now();

        // walk to the legal step and leave a too-short statement
        for _ in 0..3 {
            wizard.handle_key(ctrl(KeyCode::Right), now);
        }
        wizard.handle_key(key(KeyCode::Tab), now);
        wizard.handle_key(key(KeyCode::Tab), now);
        type_text(&mut wizard, "short", now);

        let action = wizard.handle_key(ctrl(KeyCode::Char('s')), now);
        assert_eq!(action, WizardAction::None);
        assert!(matches!(wizard.alert(), Some(Alert::InvalidFields { count: 1 })));

        // dismiss and check focus landed on the offending field
        wizard.handle_key(key(KeyCode::Enter), now);
        assert_eq!(
            wizard.current_step_fields()[wizard.focused_index()],
            "non_discrimination_statement"
        );
    }

    #[test]
    fn test_clean_submit_collects_values() {
        let mut wizard = registration_wizard();
        let now = Instant::now();

        wizard.handle_key(key(KeyCode::Down), now); // company
        for _ in 0..3 {
            wizard.handle_key(ctrl(KeyCode::Right), now);
        }
        assert!(wizard.navigator().is_last());

        let action = wizard.handle_key(ctrl(KeyCode::Char('s')), now);
        let WizardAction::Submitted { values } = action else {
            panic!("expected submission");
        };
        let names: Vec<&str> = values.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"user_type"));
        // skipped-step fields are not posted
        assert!(!names.contains(&"disability_type"));
        assert_eq!(
            values.iter().find(|(n, _)| n == "user_type").unwrap().1,
            "company"
        );
        assert!(!wizard.validation().modified());
    }

    #[test]
    fn test_focus_settles_after_step_change() {
        let mut wizard = posting_wizard();
        let now = Instant::now();

        wizard.handle_key(key(KeyCode::Tab), now);
        assert_eq!(wizard.focused_index(), 1);

        wizard.handle_key(ctrl(KeyCode::Right), now);
        wizard.on_tick(now + Duration::from_millis(350));
        assert_eq!(wizard.focused_index(), 0);
    }
}
