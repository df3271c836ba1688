use std::{fmt::Display, str::FromStr};

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigurationError, problem::travel_cost_matrix::Cost};

use super::{
    recreate::{recreate_params::RecreateParams, recreate_strategy::RecreateStrategy},
    ruin::{ruin_params::RuinParams, ruin_strategy::RuinStrategy},
};

/// Resolved configuration of a solver.
///
/// Every field has a default, [`SolverParams::set_property`] applies flat `name = value` pairs on
/// top of it and [`SolverParams::validate`] is run before the search starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// The search stops as soon as one of them is met.
    pub terminations: Vec<Termination>,

    /// Builds the initial solution.
    pub construction: RecreateStrategy,

    pub ruin: RuinParams,
    pub recreate: RecreateParams,

    pub solver_acceptor: SolverAcceptorStrategy,
    /// Fraction of the search after which the Schrimpf threshold is halved.
    pub schrimpf_alpha: f64,
    /// Estimated with a random walk from the initial solution when missing.
    pub schrimpf_initial_threshold: Option<f64>,
    pub random_walk_iterations: usize,
    /// Derived from the cost of the initial solution when missing.
    pub annealing_initial_temperature: Option<f64>,
    pub annealing_cooling_rate: f64,

    pub seed: u64,
    /// Independent searches, the best result wins.
    pub runs: usize,
    pub threads: Threads,

    /// Replaces the base penalty of an unassigned job set on the problem.
    pub unassigned_job_cost: Option<Cost>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
    /// Best cost at or below the target.
    Cost(Cost),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl FromStr for Threads {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single" => Ok(Threads::Single),
            "auto" => Ok(Threads::Auto),
            value => value.parse().map(Threads::Multi).map_err(|_| {
                ConfigurationError::InvalidValue {
                    parameter: "threads".to_owned(),
                    value: s.to_owned(),
                }
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverAcceptorStrategy {
    Greedy,
    Schrimpf,
    SimulatedAnnealing,
    Any,
}

impl Display for SolverAcceptorStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Schrimpf => write!(f, "schrimpf"),
            Self::SimulatedAnnealing => write!(f, "simulated_annealing"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl FromStr for SolverAcceptorStrategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "greedy" => Ok(Self::Greedy),
            "schrimpf" | "threshold" => Ok(Self::Schrimpf),
            "simulated_annealing" => Ok(Self::SimulatedAnnealing),
            "any" => Ok(Self::Any),
            _ => Err(ConfigurationError::UnknownStrategy {
                kind: "acceptor",
                name: s.to_owned(),
            }),
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::IterationsWithoutImprovement(2000),
                Termination::Iterations(10000),
                Termination::Duration(SignedDuration::from_mins(2)),
            ],
            construction: RecreateStrategy::BestInsertion,
            ruin: RuinParams::default(),
            recreate: RecreateParams::default(),
            solver_acceptor: SolverAcceptorStrategy::Schrimpf,
            schrimpf_alpha: 0.1,
            schrimpf_initial_threshold: None,
            random_walk_iterations: 100,
            annealing_initial_temperature: None,
            annealing_cooling_rate: 0.99999,
            seed: 2427121,
            runs: 1,
            threads: Threads::Auto,
            unassigned_job_cost: None,
        }
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigurationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidValue {
            parameter: name.to_owned(),
            value: value.to_owned(),
        })
}

/// Parses `name:weight` pairs separated by commas, a missing weight counts as 1.
fn parse_weighted<T>(name: &str, value: &str) -> Result<Vec<(T, u64)>, ConfigurationError>
where
    T: FromStr<Err = ConfigurationError>,
{
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.rsplit_once(':') {
            Some((strategy, weight)) => Ok((strategy.parse()?, parse_value(name, weight)?)),
            None => Ok((entry.parse()?, 1)),
        })
        .collect()
}

fn check_range(
    parameter: &'static str,
    value: f64,
    valid: bool,
    expected: &'static str,
) -> Result<(), ConfigurationError> {
    if valid {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange {
            parameter,
            value,
            expected,
        })
    }
}

impl SolverParams {
    pub fn ruin_strategies(&self) -> &[(RuinStrategy, u64)] {
        &self.ruin.ruin_strategies
    }

    pub fn recreate_strategies(&self) -> &[(RecreateStrategy, u64)] {
        &self.recreate.recreate_strategies
    }

    /// Limit of the `Iterations` termination, if any.
    pub fn max_iterations(&self) -> Option<usize> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Iterations(max_iterations) => Some(*max_iterations),
                _ => None,
            })
            .min()
    }

    /// Adds `termination`, replacing the termination of the same kind.
    pub fn set_termination(&mut self, termination: Termination) -> &mut Self {
        self.terminations
            .retain(|existing| std::mem::discriminant(existing) != std::mem::discriminant(&termination));
        self.terminations.push(termination);
        self
    }

    /// Applies one named parameter, e.g. `"construction" = "regret_insertion(3)"`,
    /// `"ruin.strategies" = "radial:2,string:1"` or `"iterations" = "2000"`.
    /// Durations are in seconds.
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<&mut Self, ConfigurationError> {
        match name.trim() {
            "construction" => self.construction = value.trim().parse()?,

            "iterations" | "max_iterations" => {
                self.set_termination(Termination::Iterations(parse_value(name, value)?));
            }
            "duration" | "max_duration" => {
                let seconds: f64 = parse_value(name, value)?;
                let duration = SignedDuration::try_from_secs_f64(seconds).map_err(|_| {
                    ConfigurationError::InvalidValue {
                        parameter: name.to_owned(),
                        value: value.to_owned(),
                    }
                })?;
                self.set_termination(Termination::Duration(duration));
            }
            "iterations_without_improvement" => {
                self.set_termination(Termination::IterationsWithoutImprovement(parse_value(
                    name, value,
                )?));
            }
            "target_cost" => {
                self.set_termination(Termination::Cost(parse_value(name, value)?));
            }

            "ruin.strategies" => self.ruin.ruin_strategies = parse_weighted(name, value)?,
            "ruin.minimum_ratio" => self.ruin.ruin_minimum_ratio = parse_value(name, value)?,
            "ruin.maximum_ratio" => self.ruin.ruin_maximum_ratio = parse_value(name, value)?,
            "ruin.worst_determinism" => {
                self.ruin.ruin_worst_determinism = parse_value(name, value)?
            }
            "ruin.string_maximum_strings" => {
                self.ruin.string_maximum_strings = parse_value(name, value)?
            }
            "ruin.string_maximum_length" => {
                self.ruin.string_maximum_length = parse_value(name, value)?
            }
            "ruin.string_split_probability" => {
                self.ruin.string_split_probability = parse_value(name, value)?
            }

            "recreate.strategies" => {
                self.recreate.recreate_strategies = parse_weighted(name, value)?
            }
            "recreate.blink_rate" => self.recreate.blink_rate = parse_value(name, value)?,
            "recreate.reinsert_unassigned" => {
                self.recreate.reinsert_unassigned = parse_value(name, value)?
            }

            "acceptor" => self.solver_acceptor = value.parse()?,
            "acceptor.schrimpf_alpha" => self.schrimpf_alpha = parse_value(name, value)?,
            "acceptor.schrimpf_initial_threshold" => {
                self.schrimpf_initial_threshold = Some(parse_value(name, value)?)
            }
            "acceptor.random_walk_iterations" => {
                self.random_walk_iterations = parse_value(name, value)?
            }
            "acceptor.annealing_initial_temperature" => {
                self.annealing_initial_temperature = Some(parse_value(name, value)?)
            }
            "acceptor.annealing_cooling_rate" => {
                self.annealing_cooling_rate = parse_value(name, value)?
            }

            "seed" => self.seed = parse_value(name, value)?,
            "runs" => self.runs = parse_value(name, value)?,
            "threads" => self.threads = value.parse()?,
            "unassigned_job_cost" => self.unassigned_job_cost = Some(parse_value(name, value)?),

            _ => return Err(ConfigurationError::UnknownParameter(name.to_owned())),
        }

        Ok(self)
    }

    /// Checks that the search can run with these parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.terminations.is_empty() {
            return Err(ConfigurationError::MissingTermination);
        }

        for termination in &self.terminations {
            if let Termination::Duration(duration) = termination {
                check_range(
                    "duration",
                    duration.as_secs_f64(),
                    !duration.is_negative(),
                    "a positive duration",
                )?;
            }
        }

        if !self.ruin_strategies().iter().any(|(_, weight)| *weight > 0) {
            return Err(ConfigurationError::EmptyStrategySet { kind: "ruin" });
        }
        if !self.recreate_strategies().iter().any(|(_, weight)| *weight > 0) {
            return Err(ConfigurationError::EmptyStrategySet { kind: "recreate" });
        }

        for strategy in std::iter::once(&self.construction)
            .chain(self.recreate_strategies().iter().map(|(strategy, _)| strategy))
        {
            if let RecreateStrategy::RegretInsertion(k) = strategy {
                check_range("regret_insertion.k", *k as f64, *k >= 2, "at least 2")?;
            }
        }

        let ruin = &self.ruin;
        check_range(
            "ruin.minimum_ratio",
            ruin.ruin_minimum_ratio,
            (0.0..=1.0).contains(&ruin.ruin_minimum_ratio),
            "between 0 and 1",
        )?;
        check_range(
            "ruin.maximum_ratio",
            ruin.ruin_maximum_ratio,
            (ruin.ruin_minimum_ratio..=1.0).contains(&ruin.ruin_maximum_ratio),
            "between the minimum ratio and 1",
        )?;
        check_range(
            "ruin.worst_determinism",
            ruin.ruin_worst_determinism,
            ruin.ruin_worst_determinism >= 1.0,
            "at least 1",
        )?;
        check_range(
            "ruin.string_maximum_strings",
            ruin.string_maximum_strings as f64,
            ruin.string_maximum_strings >= 1,
            "at least 1",
        )?;
        check_range(
            "ruin.string_maximum_length",
            ruin.string_maximum_length as f64,
            ruin.string_maximum_length >= 1,
            "at least 1",
        )?;
        check_range(
            "ruin.string_split_probability",
            ruin.string_split_probability,
            (0.0..=1.0).contains(&ruin.string_split_probability),
            "between 0 and 1",
        )?;

        check_range(
            "recreate.blink_rate",
            self.recreate.blink_rate,
            (0.0..1.0).contains(&self.recreate.blink_rate),
            "at least 0 and below 1",
        )?;

        check_range(
            "acceptor.schrimpf_alpha",
            self.schrimpf_alpha,
            self.schrimpf_alpha > 0.0,
            "positive",
        )?;
        if let Some(threshold) = self.schrimpf_initial_threshold {
            check_range(
                "acceptor.schrimpf_initial_threshold",
                threshold,
                threshold >= 0.0,
                "at least 0",
            )?;
        }
        if let Some(temperature) = self.annealing_initial_temperature {
            check_range(
                "acceptor.annealing_initial_temperature",
                temperature,
                temperature >= 0.0,
                "at least 0",
            )?;
        }
        check_range(
            "acceptor.annealing_cooling_rate",
            self.annealing_cooling_rate,
            self.annealing_cooling_rate > 0.0 && self.annealing_cooling_rate <= 1.0,
            "in ]0, 1]",
        )?;

        check_range("runs", self.runs as f64, self.runs >= 1, "at least 1")?;
        check_range(
            "threads",
            self.threads.number_of_threads() as f64,
            self.threads.number_of_threads() >= 1,
            "at least 1",
        )?;
        if let Some(cost) = self.unassigned_job_cost {
            check_range("unassigned_job_cost", cost, cost >= 0.0, "at least 0")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::solver::recreate::sequential_best_insertion::BestInsertionSortStrategy;

    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert_eq!(SolverParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_set_property() {
        let mut params = SolverParams::default();

        params
            .set_property("construction", "regret_insertion(3)")
            .unwrap()
            .set_property("ruin.strategies", "radial:2, string")
            .unwrap()
            .set_property("ruin.maximum_ratio", "0.4")
            .unwrap()
            .set_property("acceptor", "simulated_annealing")
            .unwrap()
            .set_property("iterations", "2000")
            .unwrap()
            .set_property("duration", "1.5")
            .unwrap()
            .set_property("threads", "single")
            .unwrap();

        assert_eq!(params.construction, RecreateStrategy::RegretInsertion(3));
        assert_eq!(
            params.ruin.ruin_strategies,
            vec![(RuinStrategy::Radial, 2), (RuinStrategy::String, 1)]
        );
        assert_eq!(params.ruin.ruin_maximum_ratio, 0.4);
        assert_eq!(params.solver_acceptor, SolverAcceptorStrategy::SimulatedAnnealing);
        assert_eq!(params.max_iterations(), Some(2000));
        assert_eq!(params.threads, Threads::Single);

        // Replaced, not added.
        assert_eq!(
            params
                .terminations
                .iter()
                .filter(|termination| matches!(termination, Termination::Iterations(_)))
                .count(),
            1
        );
        assert!(params
            .terminations
            .contains(&Termination::Duration(SignedDuration::from_millis(1500))));
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_set_property_rejects_unknown_names_and_values() {
        let mut params = SolverParams::default();

        assert_eq!(
            params.set_property("ruin.ratio", "0.3").err(),
            Some(ConfigurationError::UnknownParameter("ruin.ratio".to_owned()))
        );
        assert!(matches!(
            params.set_property("iterations", "many"),
            Err(ConfigurationError::InvalidValue { .. })
        ));
        assert!(matches!(
            params.set_property("acceptor", "record_to_record"),
            Err(ConfigurationError::UnknownStrategy { kind: "acceptor", .. })
        ));
        assert!(matches!(
            params.set_property("recreate.strategies", "sequential_best_insertion(nearest)"),
            Err(ConfigurationError::UnknownStrategy { kind: "insertion sort", .. })
        ));
    }

    #[test]
    fn test_validate() {
        let params = SolverParams {
            terminations: vec![],
            ..SolverParams::default()
        };
        assert_eq!(params.validate(), Err(ConfigurationError::MissingTermination));

        let mut params = SolverParams::default();
        params.ruin.ruin_strategies = vec![(RuinStrategy::Random, 0)];
        assert_eq!(
            params.validate(),
            Err(ConfigurationError::EmptyStrategySet { kind: "ruin" })
        );

        let mut params = SolverParams::default();
        params.ruin.ruin_minimum_ratio = 0.5;
        params.ruin.ruin_maximum_ratio = 0.2;
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::OutOfRange {
                parameter: "ruin.maximum_ratio",
                ..
            })
        ));

        let params = SolverParams {
            construction: RecreateStrategy::RegretInsertion(1),
            ..SolverParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::OutOfRange {
                parameter: "regret_insertion.k",
                ..
            })
        ));
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: SolverParams = serde_json::from_str(
            r#"{
                "terminations": [{ "iterations": 50 }],
                "construction": "sequential_best_insertion(demand)",
                "solver_acceptor": "greedy",
                "runs": 4
            }"#,
        )
        .unwrap();

        assert_eq!(params.terminations, vec![Termination::Iterations(50)]);
        assert_eq!(
            params.construction,
            RecreateStrategy::SequentialBestInsertion(BestInsertionSortStrategy::Demand)
        );
        assert_eq!(params.solver_acceptor, SolverAcceptorStrategy::Greedy);
        assert_eq!(params.runs, 4);
        assert_eq!(params.ruin, RuinParams::default());
    }
}
