use std::{fmt::Display, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    error::ConfigurationError, problem::job::JobIdx,
    solver::solution::working_solution::WorkingSolution,
};

use super::{
    ruin_context::RuinContext, ruin_radial::RuinRadial, ruin_random::RuinRandom,
    ruin_solution::RuinSolution, ruin_string::RuinString, ruin_worst::RuinWorst,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuinStrategy {
    Random,
    Worst,
    Radial,
    String,
}

impl Display for RuinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Worst => write!(f, "worst"),
            Self::Radial => write!(f, "radial"),
            Self::String => write!(f, "string"),
        }
    }
}

impl FromStr for RuinStrategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "random" => Ok(Self::Random),
            "worst" => Ok(Self::Worst),
            "radial" => Ok(Self::Radial),
            "string" => Ok(Self::String),
            _ => Err(ConfigurationError::UnknownStrategy {
                kind: "ruin",
                name: s.to_owned(),
            }),
        }
    }
}

impl Serialize for RuinStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RuinStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl RuinSolution for RuinStrategy {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        match self {
            RuinStrategy::Random => RuinRandom.ruin_solution(solution, context),
            RuinStrategy::Worst => RuinWorst.ruin_solution(solution, context),
            RuinStrategy::Radial => RuinRadial.ruin_solution(solution, context),
            RuinStrategy::String => RuinString.ruin_solution(solution, context),
        }
    }
}
