use serde::{Deserialize, Serialize};

use crate::problem::travel_cost_matrix::Cost;

use super::{solution::working_solution::WorkingSolution, state::keys::ROUTE_COSTS};

/// Parts of a solution cost.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Transport and activity costs of every route.
    pub variable_costs: Cost,
    /// Fixed costs of the used vehicles.
    pub fixed_costs: Cost,
    /// Penalties of the unassigned jobs.
    pub unassigned_costs: Cost,
}

impl CostBreakdown {
    pub fn total(&self) -> Cost {
        self.variable_costs + self.fixed_costs + self.unassigned_costs
    }
}

/// Objective minimized by the search.
pub trait SolutionCostCalculator: Send + Sync {
    fn breakdown(&self, solution: &WorkingSolution) -> CostBreakdown;

    fn calculate(&self, solution: &WorkingSolution) -> Cost {
        self.breakdown(solution).total()
    }
}

/// Route costs from the states, fixed costs of non-empty routes and the priority weighted
/// penalty of every unassigned job.
#[derive(Default, Clone, Debug)]
pub struct DefaultSolutionCostCalculator {
    unassigned_job_cost: Option<Cost>,
}

impl DefaultSolutionCostCalculator {
    /// `unassigned_job_cost` replaces the base penalty of the problem when set.
    pub fn new(unassigned_job_cost: Option<Cost>) -> Self {
        DefaultSolutionCostCalculator {
            unassigned_job_cost,
        }
    }
}

impl SolutionCostCalculator for DefaultSolutionCostCalculator {
    fn breakdown(&self, solution: &WorkingSolution) -> CostBreakdown {
        let problem = solution.problem();
        let mut breakdown = CostBreakdown::default();

        for (route_id, route) in solution.non_empty_routes_iter() {
            breakdown.variable_costs += solution.route_state(route_id, ROUTE_COSTS);
            breakdown.fixed_costs += problem.vehicle_type_of(route.vehicle_id()).fixed_cost();
        }

        breakdown.unassigned_costs = solution
            .unassigned_jobs()
            .map(|job_id| match self.unassigned_job_cost {
                Some(cost) => cost * problem.job_priority_weight(job_id),
                None => problem.unassigned_job_cost(job_id),
            })
            .sum();

        breakdown
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test_utils::{TestProblem, TestRoute, create_test_working_solution};

    use super::*;

    #[test]
    fn test_breakdown_sums_routes_fixed_costs_and_penalties() {
        let mut problem = TestProblem::grid(1, 10);
        problem.vehicle_locations = vec![0, 0];
        problem.fixed_cost = 20.0;
        problem.unassigned_job_cost = Some(100.0);
        problem.add_service(3, |_| {});
        problem.add_service(5, |service| {
            service.set_priority(1);
        });
        let problem = Arc::new(problem.build());

        let solution = create_test_working_solution(
            problem,
            vec![TestRoute {
                vehicle_id: 0,
                job_ids: vec![0],
            }],
        );

        let breakdown = DefaultSolutionCostCalculator::default().breakdown(&solution);
        assert_eq!(breakdown.variable_costs, 6.0);
        // The empty second route has no fixed cost.
        assert_eq!(breakdown.fixed_costs, 20.0);
        assert!((breakdown.unassigned_costs - 1000.0 / 9.0).abs() < 1e-9);
        assert!((breakdown.total() - (26.0 + 1000.0 / 9.0)).abs() < 1e-9);

        let overridden = DefaultSolutionCostCalculator::new(Some(9.0)).breakdown(&solution);
        assert!((overridden.unassigned_costs - 10.0).abs() < 1e-9);
    }
}
