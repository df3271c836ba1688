use thiserror::Error;

/// Raised while building and validating a [`VehicleRoutingProblem`](crate::problem::vehicle_routing_problem::VehicleRoutingProblem).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Missing field `{0}`")]
    MissingField(&'static str),
    #[error("Unknown location {location} referenced by `{referenced_by}`")]
    UnknownLocation {
        location: usize,
        referenced_by: String,
    },
    #[error("Unknown vehicle type {vehicle_type} referenced by vehicle `{vehicle}`")]
    UnknownVehicleType { vehicle_type: usize, vehicle: String },
    #[error("Unknown travel profile {profile} referenced by vehicle type `{vehicle_type}`")]
    UnknownProfile { profile: usize, vehicle_type: String },
    #[error("Problem has no vehicles")]
    NoVehicles,
    #[error("Job `{job_id}` cannot be served by any vehicle: {reason}")]
    InfeasibleProblem {
        job_id: String,
        reason: InfeasibilityReason,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibilityReason {
    #[error("demand exceeds every vehicle capacity")]
    Capacity,
    #[error("no vehicle has the required skills")]
    Skills,
    #[error("no time window is reachable within any vehicle shift")]
    TimeWindows,
    #[error("the job has more activities than any vehicle may serve")]
    MaximumActivities,
    #[error("no vehicle satisfies every requirement of the job at once")]
    Combined,
}

/// Raised while resolving solver parameters, always before the first iteration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unknown {kind} strategy `{name}`")]
    UnknownStrategy { kind: &'static str, name: String },
    #[error("Unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("Invalid value `{value}` for parameter `{parameter}`")]
    InvalidValue { parameter: String, value: String },
    #[error("Parameter `{parameter}` is {value}, expected {expected}")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("At least one termination is required")]
    MissingTermination,
    #[error("No {kind} strategy with a positive weight")]
    EmptyStrategySet { kind: &'static str },
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid problem: {0}")]
    Problem(#[from] ProblemError),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("State inconsistency: {0}")]
    StateInconsistency(String),
}
