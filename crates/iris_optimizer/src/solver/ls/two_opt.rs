use crate::solver::solution::{
    route_id::RouteIdx,
    working_solution::{RouteUpdate, WorkingSolution},
};

use super::r#move::LocalSearchOperator;

/// Reverses the segment `[from, to]` of a route.
#[derive(Debug, Clone)]
pub struct TwoOptOperator {
    pub route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(TwoOptOperator),
    {
        if r1 != r2 {
            return;
        }

        let route = solution.route(r1);
        for from in 0..route.len() {
            // Reversing two neighbours is already covered by swap.
            for to in (from + 2)..route.len() {
                consumer(TwoOptOperator {
                    route_id: r1,
                    from,
                    to,
                });
            }
        }
    }
}

impl LocalSearchOperator for TwoOptOperator {
    fn route_updates(&self, solution: &WorkingSolution) -> Vec<RouteUpdate> {
        let mut customers = solution.route(self.route_id).customers().to_vec();
        customers[self.from..=self.to].reverse();
        vec![(self.route_id, customers)]
    }
}
