//! Step navigation for multi-section forms.
//!
//! A form has N physical steps laid out in fixed order. At most one of
//! them (the registration accessibility step) can be excluded from the
//! navigable sequence depending on the selected user type, which makes
//! the user-facing "logical" step numbering diverge from the physical
//! one. All indices here are 1-based, matching the step indicators the
//! user sees.

/// Visual state of one physical step indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Active,
    Completed,
    Upcoming,
    /// Indicator is not shown at all (step excluded by the skip rule)
    Hidden,
}

/// Which navigation controls are visible for the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub prev_visible: bool,
    pub next_visible: bool,
    pub submit_visible: bool,
}

#[derive(Debug, Clone)]
pub struct StepNavigator {
    total_physical: usize,
    /// Physical position of the skippable step, if the form has one
    skip_physical: Option<usize>,
    skip_active: bool,
    current_logical: usize,
}

impl StepNavigator {
    /// Create a navigator over `total_physical` steps. `skip_physical`
    /// names the step excluded while the skip rule is active; positions
    /// outside [1, N] are treated as no skip step.
    pub fn new(total_physical: usize, skip_physical: Option<usize>) -> Self {
        let skip_physical =
            skip_physical.filter(|&s| s >= 1 && s <= total_physical && total_physical > 1);
        Self {
            total_physical,
            skip_physical,
            skip_active: false,
            current_logical: 1,
        }
    }

    pub fn current_logical(&self) -> usize {
        self.current_logical
    }

    /// Physical index of the currently displayed step
    pub fn current_physical(&self) -> usize {
        // current_logical always resolves: go_to_logical and
        // set_skip_active maintain the invariant
        self.resolve(self.current_logical)
            .unwrap_or(self.current_logical)
    }

    pub fn total_physical(&self) -> usize {
        self.total_physical
    }

    /// Number of steps in the user-facing sequence
    pub fn total_logical(&self) -> usize {
        if self.skip_active && self.skip_physical.is_some() {
            self.total_physical - 1
        } else {
            self.total_physical
        }
    }

    pub fn skip_active(&self) -> bool {
        self.skip_active
    }

    /// Resolve a logical step to its physical index, or None when the
    /// resolution falls outside [1, N].
    fn resolve(&self, logical: usize) -> Option<usize> {
        if logical < 1 {
            return None;
        }
        let physical = match self.skip_physical {
            Some(s) if self.skip_active && logical >= s => logical + 1,
            _ => logical,
        };
        (physical <= self.total_physical).then_some(physical)
    }

    /// Logical position of a physical step, or None while that step is
    /// excluded by the skip rule.
    pub fn logical_of_physical(&self, physical: usize) -> Option<usize> {
        if physical < 1 || physical > self.total_physical {
            return None;
        }
        match self.skip_physical {
            Some(s) if self.skip_active && physical == s => None,
            Some(s) if self.skip_active && physical > s => Some(physical - 1),
            _ => Some(physical),
        }
    }

    /// Navigate to a logical step. Out-of-range targets are silently
    /// ignored, matching the defensive guards of the form contract.
    pub fn go_to_logical(&mut self, logical: usize) {
        if logical > self.total_logical() {
            return;
        }
        if self.resolve(logical).is_some() {
            self.current_logical = logical;
        }
    }

    pub fn next(&mut self) {
        self.go_to_logical(self.current_logical + 1);
    }

    pub fn prev(&mut self) {
        if self.current_logical > 1 {
            self.go_to_logical(self.current_logical - 1);
        }
    }

    /// Toggle the skip rule (the discriminant changed). The current
    /// logical step is preserved where possible and clamped when it no
    /// longer resolves to a visible physical step.
    pub fn set_skip_active(&mut self, active: bool) {
        self.skip_active = active;
        let total = self.total_logical();
        if self.current_logical > total {
            self.current_logical = total.max(1);
        }
    }

    /// Progress through the logical sequence as a percentage.
    /// A single-step form reports 100 (its only step is also the last).
    pub fn progress_percent(&self) -> f64 {
        let total = self.total_logical();
        if total <= 1 {
            return 100.0;
        }
        ((self.current_logical - 1) as f64 / (total - 1) as f64) * 100.0
    }

    /// Indicator state for every physical step, in physical order.
    pub fn indicator_states(&self) -> Vec<IndicatorState> {
        let current = self.current_physical();
        (1..=self.total_physical)
            .map(|physical| {
                if self.skip_active && self.skip_physical == Some(physical) {
                    IndicatorState::Hidden
                } else if physical == current {
                    IndicatorState::Active
                } else if physical < current {
                    IndicatorState::Completed
                } else {
                    IndicatorState::Upcoming
                }
            })
            .collect()
    }

    pub fn is_first(&self) -> bool {
        self.current_logical == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_logical == self.total_logical()
    }

    pub fn controls(&self) -> NavControls {
        NavControls {
            prev_visible: !self.is_first(),
            next_visible: !self.is_last(),
            submit_visible: self.is_last(),
        }
    }
}
