mod activity_times;
mod departure_time;
mod loads;
mod time_slack;
mod variable_costs;

pub use activity_times::UpdateActivityTimes;
pub use departure_time::UpdateDepartureTime;
pub use loads::UpdateLoads;
pub use time_slack::UpdateTimeSlack;
pub use variable_costs::UpdateVariableCosts;
