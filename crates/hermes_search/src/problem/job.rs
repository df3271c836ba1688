use std::fmt::Display;

use serde::Serialize;

use crate::{
    define_index_newtype,
    problem::{
        capacity::Capacity,
        location::LocationIdx,
        service::{Service, ServiceType},
        shipment::Shipment,
        skill::Skill,
        time_window::TimeWindows,
    },
};

define_index_newtype!(JobIdx, Job);

/// Identifies one stop of a job inside a route.
#[derive(Serialize, Hash, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ActivityId {
    Service(JobIdx),
    ShipmentPickup(JobIdx),
    ShipmentDelivery(JobIdx),
}

impl ActivityId {
    pub fn job_id(&self) -> JobIdx {
        match self {
            ActivityId::Service(id)
            | ActivityId::ShipmentPickup(id)
            | ActivityId::ShipmentDelivery(id) => *id,
        }
    }

    pub fn is_shipment(&self) -> bool {
        matches!(
            self,
            ActivityId::ShipmentPickup(_) | ActivityId::ShipmentDelivery(_)
        )
    }
}

impl Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityId::Service(id) => write!(f, "Service({id})"),
            ActivityId::ShipmentPickup(id) => write!(f, "ShipmentPickup({id})"),
            ActivityId::ShipmentDelivery(id) => write!(f, "ShipmentDelivery({id})"),
        }
    }
}

/// Borrowed view over the data of a single job stop.
pub enum JobStop<'a> {
    Service(&'a Service),
    ShipmentPickup(&'a Shipment),
    ShipmentDelivery(&'a Shipment),
}

impl<'a> JobStop<'a> {
    pub fn location_id(&self) -> LocationIdx {
        match self {
            JobStop::Service(service) => service.location_id(),
            JobStop::ShipmentPickup(shipment) => shipment.pickup().location_id(),
            JobStop::ShipmentDelivery(shipment) => shipment.delivery().location_id(),
        }
    }

    pub fn time_windows(&self) -> &'a TimeWindows {
        match *self {
            JobStop::Service(service) => service.time_windows(),
            JobStop::ShipmentPickup(shipment) => shipment.pickup().time_windows(),
            JobStop::ShipmentDelivery(shipment) => shipment.delivery().time_windows(),
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            JobStop::Service(service) => service.duration(),
            JobStop::ShipmentPickup(shipment) => shipment.pickup().duration(),
            JobStop::ShipmentDelivery(shipment) => shipment.delivery().duration(),
        }
    }

    /// Signed change of the vehicle load when the stop is served.
    pub fn load_change(&self) -> Capacity {
        match self {
            JobStop::Service(service) => match service.service_type() {
                ServiceType::Service | ServiceType::Pickup => service.demand().clone(),
                ServiceType::Delivery => -service.demand(),
            },
            JobStop::ShipmentPickup(shipment) => shipment.demand().clone(),
            JobStop::ShipmentDelivery(shipment) => -shipment.demand(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Service,
    Pickup,
    Delivery,
    Shipment,
}

#[derive(Debug, Clone)]
pub enum Job {
    Service(Service),
    Shipment(Shipment),
}

impl Job {
    pub fn external_id(&self) -> &str {
        match self {
            Job::Service(service) => service.external_id(),
            Job::Shipment(shipment) => shipment.external_id(),
        }
    }

    pub fn kind(&self) -> JobKind {
        match self {
            Job::Service(service) => match service.service_type() {
                ServiceType::Service => JobKind::Service,
                ServiceType::Pickup => JobKind::Pickup,
                ServiceType::Delivery => JobKind::Delivery,
            },
            Job::Shipment(_) => JobKind::Shipment,
        }
    }

    pub fn demand(&self) -> &Capacity {
        match self {
            Job::Service(service) => service.demand(),
            Job::Shipment(shipment) => shipment.demand(),
        }
    }

    pub fn skills(&self) -> &[Skill] {
        match self {
            Job::Service(service) => service.skills(),
            Job::Shipment(shipment) => shipment.skills(),
        }
    }

    pub fn priority(&self) -> u8 {
        match self {
            Job::Service(service) => service.priority(),
            Job::Shipment(shipment) => shipment.priority(),
        }
    }

    pub fn is_shipment(&self) -> bool {
        matches!(self, Job::Shipment(_))
    }

    /// The first stop of the job, used to measure distances between jobs.
    pub fn primary_location_id(&self) -> LocationIdx {
        match self {
            Job::Service(service) => service.location_id(),
            Job::Shipment(shipment) => shipment.pickup().location_id(),
        }
    }

    pub fn activity_ids(&self, job_id: JobIdx) -> Vec<ActivityId> {
        match self {
            Job::Service(_) => vec![ActivityId::Service(job_id)],
            Job::Shipment(_) => vec![
                ActivityId::ShipmentPickup(job_id),
                ActivityId::ShipmentDelivery(job_id),
            ],
        }
    }

    /// Resolves a stop of this job, panics if the activity belongs to another kind of job.
    pub fn stop(&self, activity_id: ActivityId) -> JobStop<'_> {
        match (self, activity_id) {
            (Job::Service(service), ActivityId::Service(_)) => JobStop::Service(service),
            (Job::Shipment(shipment), ActivityId::ShipmentPickup(_)) => {
                JobStop::ShipmentPickup(shipment)
            }
            (Job::Shipment(shipment), ActivityId::ShipmentDelivery(_)) => {
                JobStop::ShipmentDelivery(shipment)
            }
            _ => panic!("Activity {activity_id} does not match job {}", self.external_id()),
        }
    }

    /// Earliest moment any stop of the job may be served.
    pub fn earliest_start(&self) -> f64 {
        match self {
            Job::Service(service) => service.time_windows().earliest_start(),
            Job::Shipment(shipment) => shipment.pickup().time_windows().earliest_start(),
        }
    }

    pub fn has_time_windows(&self) -> bool {
        match self {
            Job::Service(service) => !service.time_windows().is_empty(),
            Job::Shipment(shipment) => {
                !shipment.pickup().time_windows().is_empty()
                    || !shipment.delivery().time_windows().is_empty()
            }
        }
    }
}

impl From<Service> for Job {
    fn from(service: Service) -> Self {
        Job::Service(service)
    }
}

impl From<Shipment> for Job {
    fn from(shipment: Shipment) -> Self {
        Job::Shipment(shipment)
    }
}
