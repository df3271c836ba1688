use crate::{problem::job::JobIdx, solver::solution::route_id::RouteIdx};

/// Places a service before the job activity currently at `position`, `position == route.len()`
/// appends it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInsertion {
    pub route_id: RouteIdx,
    pub job_index: JobIdx,
    pub position: usize,
}

/// Places a shipment, both positions refer to the route before the insertion and
/// `pickup_position <= delivery_position`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentInsertion {
    pub route_id: RouteIdx,
    pub job_index: JobIdx,
    pub pickup_position: usize,
    pub delivery_position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Insertion {
    Service(ServiceInsertion),
    Shipment(ShipmentInsertion),
}

impl Insertion {
    pub fn route_id(&self) -> RouteIdx {
        match self {
            Insertion::Service(insertion) => insertion.route_id,
            Insertion::Shipment(insertion) => insertion.route_id,
        }
    }

    pub fn job_index(&self) -> JobIdx {
        match self {
            Insertion::Service(insertion) => insertion.job_index,
            Insertion::Shipment(insertion) => insertion.job_index,
        }
    }
}

/// A feasible insertion with its marginal cost.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionData {
    pub insertion: Insertion,
    pub cost: f64,
}

impl InsertionData {
    /// Strictly cheaper, so the first candidate found wins ties.
    #[inline]
    pub fn is_better_than(&self, other: Option<&InsertionData>) -> bool {
        other.is_none_or(|other| self.cost < other.cost)
    }
}
