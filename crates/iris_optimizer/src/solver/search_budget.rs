use jiff::{SignedDuration, Timestamp};

use super::optimizer_params::Termination;

/// Iteration and wall-clock limits shared by every search phase of one
/// optimization run.
#[derive(Debug)]
pub struct SearchBudget {
    start: Timestamp,
    max_duration: Option<SignedDuration>,
    max_iterations: Option<usize>,
    iterations: usize,
    exhausted: bool,
}

impl SearchBudget {
    pub fn new(terminations: &[Termination]) -> Self {
        let mut max_duration = None;
        let mut max_iterations = None;

        for termination in terminations {
            match termination {
                Termination::Duration(duration) => {
                    max_duration = Some(match max_duration {
                        Some(current) if current < *duration => current,
                        _ => *duration,
                    });
                }
                Termination::Iterations(iterations) => {
                    max_iterations = Some(match max_iterations {
                        Some(current) if current < *iterations => current,
                        _ => *iterations,
                    });
                }
            }
        }

        SearchBudget {
            start: Timestamp::now(),
            max_duration,
            max_iterations,
            iterations: 0,
            exhausted: false,
        }
    }

    /// Consumes one iteration. Returns false, and remembers it, once a limit is hit.
    pub fn tick(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }

        self.iterations += 1;
        true
    }

    /// Checks both limits without consuming an iteration.
    pub fn is_exhausted(&mut self) -> bool {
        let out_of_iterations = self
            .max_iterations
            .is_some_and(|max_iterations| self.iterations >= max_iterations);

        if out_of_iterations || self.is_past_deadline() {
            self.exhausted = true;
        }

        self.exhausted
    }

    /// Checks the wall-clock limit only. Construction phases stop here, the
    /// iteration limit applies to improving moves.
    pub fn is_past_deadline(&mut self) -> bool {
        let past_deadline = self
            .max_duration
            .is_some_and(|max_duration| self.elapsed() >= max_duration);

        if past_deadline {
            self.exhausted = true;
        }

        past_deadline
    }

    pub fn elapsed(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.start)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether a search phase was cut short by the budget.
    pub fn was_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_limit() {
        let mut budget = SearchBudget::new(&[Termination::Iterations(2)]);

        assert!(budget.tick());
        assert!(budget.tick());
        assert!(!budget.was_exhausted());
        assert!(!budget.tick());
        assert!(budget.was_exhausted());
        assert_eq!(budget.iterations(), 2);
    }

    #[test]
    fn test_smallest_limit_wins() {
        let mut budget = SearchBudget::new(&[
            Termination::Iterations(10),
            Termination::Iterations(1),
        ]);

        assert!(budget.tick());
        assert!(!budget.tick());
    }

    #[test]
    fn test_zero_duration_is_exhausted_immediately() {
        let mut budget = SearchBudget::new(&[Termination::Duration(SignedDuration::ZERO)]);

        assert!(!budget.tick());
        assert!(budget.was_exhausted());
    }

    #[test]
    fn test_deadline_ignores_iteration_limit() {
        let mut budget = SearchBudget::new(&[Termination::Iterations(0)]);

        assert!(!budget.is_past_deadline());
        assert!(budget.is_exhausted());
        assert!(!budget.is_past_deadline());
        assert_eq!(budget.iterations(), 0);
    }

    #[test]
    fn test_zero_duration_stops_construction() {
        let mut budget = SearchBudget::new(&[Termination::Duration(SignedDuration::ZERO)]);

        assert!(budget.is_past_deadline());
        assert!(budget.was_exhausted());
    }

    #[test]
    fn test_unbounded_budget() {
        let mut budget = SearchBudget::new(&[]);

        for _ in 0..100 {
            assert!(budget.tick());
        }
    }
}
