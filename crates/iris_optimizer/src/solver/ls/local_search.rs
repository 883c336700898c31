use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::solver::{
    construction::insertion::best_insertion,
    search_budget::SearchBudget,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
};

use super::{
    r#move::{EvaluatedMove, LocalSearchMove},
    relocate::RelocateOperator,
    swap::SwapOperator,
    two_opt::TwoOptOperator,
    two_opt_star::TwoOptStarOperator,
};

type RoutePair = (RouteIdx, RouteIdx);

/// First-improvement descent over relocate, swap, 2-opt and 2-opt* moves.
///
/// Every iteration scans route pairs in order and applies the best move of the
/// first pair that has an improving one. Pairs are scanned in parallel when
/// `parallel` is set, the chosen move does not depend on it.
pub struct LocalSearch {
    parallel: bool,
}

impl LocalSearch {
    pub fn new(parallel: bool) -> Self {
        LocalSearch { parallel }
    }

    /// Runs until no pair improves or the budget runs out. Returns the number of
    /// applied moves.
    #[instrument(skip_all, level = "debug")]
    pub fn run(&self, solution: &mut WorkingSolution, budget: &mut SearchBudget) -> usize {
        let pairs = Self::build_pairs(solution);
        let mut applied = 0;

        loop {
            if !budget.tick() {
                debug!(applied, "Local search stopped by the search budget");
                break;
            }

            let Some(best) = self.find_improving_move(solution, &pairs) else {
                break;
            };

            debug!(
                operator = best.operator.operator_name(),
                delta = ?best.delta,
                "Applying move"
            );
            best.apply(solution);
            applied += 1;
        }

        applied
    }

    /// Local search followed by re-insertion of unassigned customers, repeated
    /// while re-insertion makes progress.
    pub fn intensify(&self, solution: &mut WorkingSolution, budget: &mut SearchBudget) -> usize {
        let mut applied = self.run(solution, budget);

        while !solution.unassigned().is_empty() && !budget.was_exhausted() {
            let inserted = Self::reinsert_unassigned(solution, self.parallel, budget);
            if inserted == 0 {
                break;
            }
            debug!(inserted, "Re-inserted unassigned customers");
            applied += self.run(solution, budget);
        }

        applied
    }

    fn reinsert_unassigned(
        solution: &mut WorkingSolution,
        parallel: bool,
        budget: &mut SearchBudget,
    ) -> usize {
        let mut inserted = 0;
        for customer_id in solution.unassigned().to_vec() {
            if budget.is_past_deadline() {
                break;
            }
            if let Some(insertion) = best_insertion(solution, customer_id, parallel) {
                insertion.apply(solution);
                inserted += 1;
            }
        }
        inserted
    }

    fn build_pairs(solution: &WorkingSolution) -> Vec<RoutePair> {
        let route_ids: Vec<RouteIdx> = solution.route_ids().collect();
        let mut pairs = Vec::with_capacity(route_ids.len() * route_ids.len());
        for &r1 in &route_ids {
            for &r2 in &route_ids {
                pairs.push((r1, r2));
            }
        }
        pairs
    }

    fn find_improving_move(
        &self,
        solution: &WorkingSolution,
        pairs: &[RoutePair],
    ) -> Option<EvaluatedMove> {
        if self.parallel {
            pairs
                .par_iter()
                .find_map_first(|&pair| Self::best_move_for_pair(solution, pair))
        } else {
            pairs
                .iter()
                .find_map(|&pair| Self::best_move_for_pair(solution, pair))
        }
    }

    fn best_move_for_pair(solution: &WorkingSolution, (r1, r2): RoutePair) -> Option<EvaluatedMove> {
        if solution.route(r1).is_empty() && solution.route(r2).is_empty() {
            return None;
        }

        let mut best: Option<EvaluatedMove> = None;
        let mut consider = |candidate: LocalSearchMove| {
            let Some(evaluated) = candidate.evaluate(solution) else {
                return;
            };
            if !evaluated.delta.is_improvement() {
                return;
            }
            if best
                .as_ref()
                .is_none_or(|best| evaluated.delta < best.delta)
            {
                best = Some(evaluated);
            }
        };

        RelocateOperator::generate_moves(solution, (r1, r2), |op| {
            consider(LocalSearchMove::Relocate(op))
        });
        SwapOperator::generate_moves(solution, (r1, r2), |op| {
            consider(LocalSearchMove::Swap(op))
        });
        TwoOptOperator::generate_moves(solution, (r1, r2), |op| {
            consider(LocalSearchMove::TwoOpt(op))
        });
        TwoOptStarOperator::generate_moves(solution, (r1, r2), |op| {
            consider(LocalSearchMove::TwoOptStar(op))
        });

        best
    }
}
