use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    error::ConfigurationError, problem::job::JobIdx,
    solver::solution::working_solution::WorkingSolution,
};

use super::{
    best_insertion::BestInsertion,
    recreate_context::RecreateContext,
    recreate_solution::RecreateSolution,
    regret_insertion::RegretInsertion,
    sequential_best_insertion::{
        BestInsertionParams, BestInsertionSortStrategy, SequentialBestInsertion,
    },
};

/// Construction heuristics, written `best_insertion`, `regret_insertion(k)` and
/// `sequential_best_insertion(sort)` in parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecreateStrategy {
    BestInsertion,
    RegretInsertion(usize),
    SequentialBestInsertion(BestInsertionSortStrategy),
}

impl Display for RecreateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BestInsertion => write!(f, "best_insertion"),
            Self::RegretInsertion(k) => write!(f, "regret_insertion({k})"),
            Self::SequentialBestInsertion(sort) => write!(f, "sequential_best_insertion({sort})"),
        }
    }
}

/// Splits `name(argument)` into its parts.
pub(crate) fn split_argument(s: &str) -> (&str, Option<&str>) {
    match s.strip_suffix(')').and_then(|rest| rest.split_once('(')) {
        Some((name, argument)) => (name.trim(), Some(argument.trim())),
        None => (s.trim(), None),
    }
}

impl FromStr for RecreateStrategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigurationError::UnknownStrategy {
            kind: "recreate",
            name: s.to_owned(),
        };

        match split_argument(s) {
            ("best_insertion", None) => Ok(Self::BestInsertion),
            ("regret_insertion", None) => Ok(Self::RegretInsertion(2)),
            ("regret_insertion", Some(k)) => {
                let k = k.parse::<usize>().map_err(|_| unknown())?;
                if k < 2 {
                    return Err(ConfigurationError::OutOfRange {
                        parameter: "regret_insertion.k",
                        value: k as f64,
                        expected: "at least 2",
                    });
                }
                Ok(Self::RegretInsertion(k))
            }
            ("sequential_best_insertion", None) => {
                Ok(Self::SequentialBestInsertion(BestInsertionSortStrategy::Random))
            }
            ("sequential_best_insertion", Some(sort)) => {
                Ok(Self::SequentialBestInsertion(sort.parse()?))
            }
            _ => Err(unknown()),
        }
    }
}

impl Serialize for RecreateStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecreateStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl RecreateSolution for RecreateStrategy {
    fn recreate_solution(
        &self,
        solution: &mut WorkingSolution,
        jobs: &[JobIdx],
        context: RecreateContext,
    ) -> Vec<JobIdx> {
        match self {
            RecreateStrategy::BestInsertion => BestInsertion.recreate_solution(solution, jobs, context),
            RecreateStrategy::RegretInsertion(k) => {
                RegretInsertion::new(*k).recreate_solution(solution, jobs, context)
            }
            RecreateStrategy::SequentialBestInsertion(sort_strategy) => {
                let strategy = SequentialBestInsertion::new(BestInsertionParams {
                    sort_strategy: *sort_strategy,
                    blink_rate: context.params.blink_rate,
                });
                strategy.recreate_solution(solution, jobs, context)
            }
        }
    }
}
