//! Client-side validation state for a single form.
//!
//! Three concerns share this module: the legal minimum-length rules,
//! the salary-range consistency check, and the blocking-error map fed
//! by the remote inclusive-language check. The map holds only fields
//! that currently fail the language check; a clean field is absent,
//! never present with an empty issue list.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use crate::api::LanguageIssue;
use crate::wizard::forms::SubmitIntent;

/// Inline validity marker on a field, the equivalent of the
/// is-valid / is-invalid visual classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Valid,
    Invalid,
}

/// State of a minimum-length field. Zero length is deliberately
/// neither valid nor invalid so empty fields are not flagged before
/// first interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthState {
    Untouched,
    Invalid,
    Valid,
}

/// Classify a value length against a legal minimum.
pub fn legal_length_state(len: usize, min: usize) -> LengthState {
    if len == 0 {
        LengthState::Untouched
    } else if len < min {
        LengthState::Invalid
    } else {
        LengthState::Valid
    }
}

/// Salary range validity: both values present implies max must be
/// strictly greater than min. Returns None when either side is empty
/// or unparseable (no judgement).
pub fn salary_range_valid(min: &str, max: &str) -> Option<bool> {
    let min: f64 = min.trim().parse().ok()?;
    let max: f64 = max.trim().parse().ok()?;
    Some(max > min)
}

/// Character-counter color step for multi-line fields (informational)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Long,
    VeryLong,
}

pub fn counter_level(len: usize) -> CounterLevel {
    if len > 500 {
        CounterLevel::VeryLong
    } else if len > 300 {
        CounterLevel::Long
    } else {
        CounterLevel::Normal
    }
}

/// Outcome of the submit-time guard, checked in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitCheck {
    /// Non-inclusive language issues block submission outright
    BlockedByLanguage { field_count: usize },
    /// Some field carries the invalid marker (length, salary)
    BlockedByInvalid { first_field: String, count: usize },
    Ready,
}

#[derive(Debug, Default)]
pub struct ValidationState {
    /// Blocking-error map: field name -> current language issues.
    /// Presence of a key gates submission.
    language_errors: BTreeMap<String, Vec<LanguageIssue>>,
    /// Inline validity markers by field name
    markers: BTreeMap<String, Marker>,
    /// Inline message attached to the salary max field
    salary_message: Option<String>,
    /// Set on any edit, cleared only on the successful submit path
    modified: bool,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self) {
        self.modified = true;
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn marker(&self, field: &str) -> Option<Marker> {
        self.markers.get(field).copied()
    }

    pub fn language_issues(&self, field: &str) -> Option<&[LanguageIssue]> {
        self.language_errors.get(field).map(Vec::as_slice)
    }

    pub fn language_error_count(&self) -> usize {
        self.language_errors.len()
    }

    pub fn salary_message(&self) -> Option<&str> {
        self.salary_message.as_deref()
    }

    /// Record the outcome of a language check. An empty issue list
    /// removes the field from the blocking map entirely.
    pub fn record_language_result(&mut self, field: &str, issues: Vec<LanguageIssue>) {
        if issues.is_empty() {
            self.language_errors.remove(field);
        } else {
            self.language_errors.insert(field.to_string(), issues);
        }
    }

    pub fn clear_language_errors(&mut self, field: &str) {
        self.language_errors.remove(field);
    }

    /// Apply the minimum-length rule on input. Untouched removes any
    /// marker previously set by this rule.
    pub fn apply_legal_length(&mut self, field: &str, len: usize, min: usize) {
        match legal_length_state(len, min) {
            LengthState::Untouched => {
                self.markers.remove(field);
            }
            LengthState::Invalid => {
                self.markers.insert(field.to_string(), Marker::Invalid);
            }
            LengthState::Valid => {
                self.markers.insert(field.to_string(), Marker::Valid);
            }
        }
    }

    /// Blur rule: a field holding a non-empty trimmed value is marked
    /// valid when focus leaves it. Fields under a minimum-length rule
    /// are left to that rule.
    pub fn mark_filled_on_blur(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && self.marker(field) != Some(Marker::Invalid) {
            self.markers.insert(field.to_string(), Marker::Valid);
        }
    }

    /// Apply the salary-range rule when focus leaves either salary
    /// field. `max_field` receives the marker and the inline message.
    pub fn apply_salary_range(&mut self, max_field: &str, min: &str, max: &str) {
        let Some(valid) = salary_range_valid(min, max) else {
            return;
        };
        if valid {
            self.markers.insert(max_field.to_string(), Marker::Valid);
            self.salary_message = None;
        } else {
            self.markers.insert(max_field.to_string(), Marker::Invalid);
            self.salary_message =
                Some("Maximum salary must be greater than the minimum".to_string());
        }
    }

    /// Submit-time guard. `field_order` determines which invalid field
    /// counts as first for the focus jump.
    pub fn submit_check(&self, field_order: &[&'static str]) -> SubmitCheck {
        if !self.language_errors.is_empty() {
            return SubmitCheck::BlockedByLanguage {
                field_count: self.language_errors.len(),
            };
        }

        let invalid: Vec<&'static str> = field_order
            .iter()
            .copied()
            .filter(|name| self.markers.get(*name) == Some(&Marker::Invalid))
            .collect();

        match invalid.first() {
            Some(first) => SubmitCheck::BlockedByInvalid {
                first_field: (*first).to_string(),
                count: invalid.len(),
            },
            None => SubmitCheck::Ready,
        }
    }

    /// Submit control state: disabled with an error-count label while
    /// the blocking map is non-empty, otherwise the intent label.
    pub fn submit_label(&self, intent: SubmitIntent) -> (bool, String) {
        let errors = self.language_errors.len();
        if errors > 0 {
            (
                false,
                format!("Fix {errors} field(s) with non-inclusive language"),
            )
        } else {
            (true, intent.label().to_string())
        }
    }
}

/// An issued language-check request, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRequest {
    pub field: String,
    pub seq: u64,
    pub text: String,
}

#[derive(Debug)]
struct PendingCheck {
    deadline: Instant,
    text: String,
}

/// Per-field debounce of the remote language check.
///
/// Each keystroke replaces the field's pending timer, so at most one
/// timer exists per field and a check fires only after the quiescence
/// window elapses. Every fired request gets a monotonically increasing
/// sequence number; responses that are not the latest issued for their
/// field are discarded, so a slow stale response can never overwrite a
/// fresher one.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: HashMap<String, PendingCheck>,
    latest_seq: HashMap<String, u64>,
    next_seq: u64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
            latest_seq: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Record an input event: cancel any pending timer for the field
    /// and restart the quiescence window.
    pub fn record_input(&mut self, field: &str, text: String, now: Instant) {
        self.pending.insert(
            field.to_string(),
            PendingCheck {
                deadline: now + self.window,
                text,
            },
        );
    }

    /// Collect the requests whose window has elapsed. Each gets a
    /// fresh sequence number, which also invalidates any response
    /// still in flight for the same field.
    pub fn due(&mut self, now: Instant) -> Vec<LanguageRequest> {
        let expired: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, check)| check.deadline <= now)
            .map(|(field, _)| field.clone())
            .collect();

        let mut fired = Vec::with_capacity(expired.len());
        for field in expired {
            if let Some(check) = self.pending.remove(&field) {
                self.next_seq += 1;
                self.latest_seq.insert(field.clone(), self.next_seq);
                fired.push(LanguageRequest {
                    field,
                    seq: self.next_seq,
                    text: check.text,
                });
            }
        }
        fired
    }

    /// Whether a response with this sequence number is still current.
    pub fn is_latest(&self, field: &str, seq: u64) -> bool {
        self.latest_seq.get(field) == Some(&seq)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(term: &str) -> LanguageIssue {
        LanguageIssue {
            term: term.to_string(),
            suggestion: "persona con discapacidad".to_string(),
        }
    }

    #[test]
    fn test_legal_length_boundaries() {
        assert_eq!(legal_length_state(0, 50), LengthState::Untouched);
        assert_eq!(legal_length_state(49, 50), LengthState::Invalid);
        assert_eq!(legal_length_state(50, 50), LengthState::Valid);
        assert_eq!(legal_length_state(51, 50), LengthState::Valid);
        assert_eq!(legal_length_state(1, 40), LengthState::Invalid);
    }

    #[test]
    fn test_salary_range_strict() {
        assert_eq!(salary_range_valid("1000", "2000"), Some(true));
        assert_eq!(salary_range_valid("2000", "2000"), Some(false));
        assert_eq!(salary_range_valid("3000", "2000"), Some(false));
        assert_eq!(salary_range_valid("", "2000"), None);
        assert_eq!(salary_range_valid("abc", "2000"), None);
    }

    #[test]
    fn test_counter_levels() {
        assert_eq!(counter_level(100), CounterLevel::Normal);
        assert_eq!(counter_level(301), CounterLevel::Long);
        assert_eq!(counter_level(501), CounterLevel::VeryLong);
    }

    #[test]
    fn test_clean_field_absent_from_blocking_map() {
        let mut state = ValidationState::new();
        state.record_language_result("title", vec![issue("discapacitado")]);
        assert_eq!(state.language_error_count(), 1);

        // empty result removes the key entirely
        state.record_language_result("title", vec![]);
        assert_eq!(state.language_error_count(), 0);
        assert!(state.language_issues("title").is_none());
    }

    #[test]
    fn test_submit_blocked_by_language_regardless_of_markers() {
        let mut state = ValidationState::new();
        state.record_language_result("description", vec![issue("ciego")]);
        state.apply_legal_length("workplace_accessibility", 60, 50);

        match state.submit_check(&["description", "workplace_accessibility"]) {
            SubmitCheck::BlockedByLanguage { field_count } => assert_eq!(field_count, 1),
            other => panic!("expected language block, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_blocked_by_first_invalid_field() {
        let mut state = ValidationState::new();
        state.apply_legal_length("reasonable_accommodations", 10, 50);
        state.apply_legal_length("non_discrimination_statement", 10, 40);

        match state.submit_check(&[
            "title",
            "reasonable_accommodations",
            "non_discrimination_statement",
        ]) {
            SubmitCheck::BlockedByInvalid { first_field, count } => {
                assert_eq!(first_field, "reasonable_accommodations");
                assert_eq!(count, 2);
            }
            other => panic!("expected invalid block, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_ready_when_clean() {
        let mut state = ValidationState::new();
        state.apply_legal_length("workplace_accessibility", 55, 50);
        state.mark_filled_on_blur("title", "Accessible support engineer");
        assert_eq!(state.submit_check(&["title", "workplace_accessibility"]), SubmitCheck::Ready);
    }

    #[test]
    fn test_submit_label_tracks_blocking_map() {
        let mut state = ValidationState::new();
        let (enabled, label) = state.submit_label(SubmitIntent::Publish);
        assert!(enabled);
        assert_eq!(label, "Publish posting");

        state.record_language_result("title", vec![issue("invidente")]);
        let (enabled, label) = state.submit_label(SubmitIntent::Publish);
        assert!(!enabled);
        assert!(label.contains('1'));

        let (_, label) = {
            state.record_language_result("title", vec![]);
            state.submit_label(SubmitIntent::Update)
        };
        assert_eq!(label, "Update posting");
    }

    #[test]
    fn test_untouched_clears_length_marker() {
        let mut state = ValidationState::new();
        state.apply_legal_length("workplace_accessibility", 10, 50);
        assert_eq!(state.marker("workplace_accessibility"), Some(Marker::Invalid));

        state.apply_legal_length("workplace_accessibility", 0, 50);
        assert_eq!(state.marker("workplace_accessibility"), None);
    }

    #[test]
    fn test_debounce_single_fire_after_quiescence() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();

        // rapid keystrokes inside the window
        debouncer.record_input("title", "a".to_string(), start);
        debouncer.record_input("title", "ab".to_string(), start + Duration::from_millis(100));
        debouncer.record_input("title", "abc".to_string(), start + Duration::from_millis(200));
        assert_eq!(debouncer.pending_count(), 1);

        // nothing fires before 500ms after the LAST keystroke
        assert!(debouncer.due(start + Duration::from_millis(650)).is_empty());

        let fired = debouncer.due(start + Duration::from_millis(700));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].text, "abc");
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();

        debouncer.record_input("title", "first".to_string(), start);
        let first = debouncer.due(start + Duration::from_secs(1)).remove(0);

        debouncer.record_input("title", "second".to_string(), start + Duration::from_secs(2));
        let second = debouncer.due(start + Duration::from_secs(3)).remove(0);

        // the earlier request's response arrives late
        assert!(!debouncer.is_latest("title", first.seq));
        assert!(debouncer.is_latest("title", second.seq));
    }

    #[test]
    fn test_debounce_fields_independent() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();

        debouncer.record_input("title", "t".to_string(), start);
        debouncer.record_input("benefits", "b".to_string(), start);
        assert_eq!(debouncer.pending_count(), 2);

        let mut fired = debouncer.due(start + Duration::from_secs(1));
        fired.sort_by(|a, b| a.field.cmp(&b.field));
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].field, "benefits");
        assert_eq!(fired[1].field, "title");
        assert_ne!(fired[0].seq, fired[1].seq);
    }
}
