use std::collections::BTreeSet;

/// How much freedom the sidebar gives the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationPolicy {
    /// Jump to any step at any time.
    #[default]
    Free,
    /// Only completed steps and the first uncompleted one are reachable.
    Linear,
}

/// Position and progress through the wizard. Steps are numbered from 1,
/// the completed set only ever grows.
#[derive(Debug, Clone)]
pub struct WizardState {
    current: usize,
    total: usize,
    completed: BTreeSet<usize>,
    policy: NavigationPolicy,
}

impl WizardState {
    pub fn new(total: usize, policy: NavigationPolicy) -> Self {
        assert!(total > 0);
        Self {
            current: 1,
            total,
            completed: BTreeSet::new(),
            policy,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_completed(&self, step: usize) -> bool {
        self.completed.contains(&step)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// First step not yet completed, or the last step when everything is.
    fn frontier(&self) -> usize {
        (1..=self.total)
            .find(|s| !self.completed.contains(s))
            .unwrap_or(self.total)
    }

    pub fn is_reachable(&self, step: usize) -> bool {
        if step < 1 || step > self.total {
            return false;
        }
        match self.policy {
            NavigationPolicy::Free => true,
            NavigationPolicy::Linear => self.completed.contains(&step) || step <= self.frontier(),
        }
    }

    /// Move to `step` if the policy allows it. Out-of-range targets are
    /// clamped into [1, total] before the policy check.
    pub fn go_to(&mut self, step: usize) -> bool {
        let step = step.clamp(1, self.total);
        if self.is_reachable(step) {
            self.current = step;
            true
        } else {
            false
        }
    }

    /// Mark the current step done and move forward. On the last step the
    /// position stays put, only the completion is recorded.
    pub fn advance(&mut self) {
        self.completed.insert(self.current);
        if self.current < self.total {
            self.current += 1;
        }
    }

    pub fn retreat(&mut self) {
        if self.current > 1 {
            self.current -= 1;
        }
    }

    pub fn mark_completed(&mut self, step: usize) {
        if (1..=self.total).contains(&step) {
            self.completed.insert(step);
        }
    }

    pub fn reset(&mut self) {
        self.current = 1;
        self.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_records_completion_and_moves_forward() {
        let mut state = WizardState::new(6, NavigationPolicy::Free);
        state.advance();
        assert_eq!(state.current(), 2);
        assert!(state.is_completed(1));
        assert!(!state.is_completed(2));
    }

    #[test]
    fn advance_on_the_last_step_stays_put() {
        let mut state = WizardState::new(3, NavigationPolicy::Free);
        assert!(state.go_to(3));
        state.advance();
        assert_eq!(state.current(), 3);
        assert!(state.is_completed(3));
    }

    #[test]
    fn retreat_never_leaves_the_range() {
        let mut state = WizardState::new(3, NavigationPolicy::Free);
        state.retreat();
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn go_to_clamps_out_of_range_targets() {
        let mut state = WizardState::new(4, NavigationPolicy::Free);
        assert!(state.go_to(99));
        assert_eq!(state.current(), 4);
        assert!(state.go_to(0));
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn completion_survives_revisiting_a_step() {
        let mut state = WizardState::new(4, NavigationPolicy::Free);
        state.advance();
        assert!(state.go_to(1));
        assert!(state.is_completed(1));
        state.advance();
        assert_eq!(state.current(), 2);
        assert_eq!(state.completed_count(), 1);
    }

    #[test]
    fn linear_policy_blocks_jumps_past_the_frontier() {
        let mut state = WizardState::new(4, NavigationPolicy::Linear);
        assert!(!state.go_to(3));
        assert_eq!(state.current(), 1);
        state.advance();
        // step 2 is the frontier now, 3 still is not reachable.
        assert!(state.go_to(2));
        assert!(!state.go_to(3));
        state.advance();
        assert!(state.go_to(3));
    }

    #[test]
    fn linear_policy_always_allows_going_back() {
        let mut state = WizardState::new(4, NavigationPolicy::Linear);
        state.advance();
        state.advance();
        assert_eq!(state.current(), 3);
        assert!(state.go_to(1));
    }

    #[test]
    fn reset_clears_position_and_progress() {
        let mut state = WizardState::new(4, NavigationPolicy::Free);
        state.advance();
        state.advance();
        state.reset();
        assert_eq!(state.current(), 1);
        assert_eq!(state.completed_count(), 0);
    }
}
