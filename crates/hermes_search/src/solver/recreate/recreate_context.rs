use rand::rngs::SmallRng;

use crate::solver::constraints::ConstraintManager;

use super::recreate_params::RecreateParams;

pub struct RecreateContext<'a> {
    pub rng: &'a mut SmallRng,
    pub constraints: &'a ConstraintManager,
    pub params: &'a RecreateParams,
}
