use rand::Rng;

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Metropolis acceptance with a geometric cooling schedule: at iteration `i` the temperature is
/// `initial_temperature * cooling_rate^i` and a candidate `delta` worse than the current
/// solution is accepted with probability `exp(-delta / temperature)`.
pub struct SimulatedAnnealingAcceptor {
    initial_temperature: f64,
    cooling_rate: f64,
}

impl SimulatedAnnealingAcceptor {
    pub fn new(initial_temperature: f64, cooling_rate: f64) -> Self {
        SimulatedAnnealingAcceptor {
            initial_temperature,
            cooling_rate,
        }
    }

    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    fn temperature(&self, iteration: usize) -> f64 {
        let exponent = i32::try_from(iteration).unwrap_or(i32::MAX);
        self.initial_temperature * self.cooling_rate.powi(exponent)
    }
}

impl AcceptSolution for SimulatedAnnealingAcceptor {
    fn accept(&self, current_cost: f64, candidate_cost: f64, context: AcceptSolutionContext) -> bool {
        if candidate_cost <= current_cost {
            return true;
        }

        let temperature = self.temperature(context.iteration);
        if temperature <= 0.0 || !temperature.is_finite() {
            return false;
        }

        let probability = (-(candidate_cost - current_cost) / temperature).exp();
        context.rng.random::<f64>() < probability
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    fn context(rng: &mut SmallRng, iteration: usize) -> AcceptSolutionContext<'_> {
        AcceptSolutionContext {
            iteration,
            max_iterations: None,
            rng,
        }
    }

    #[test]
    fn test_temperature_cools_geometrically() {
        let acceptor = SimulatedAnnealingAcceptor::new(100.0, 0.5);

        assert_eq!(acceptor.temperature(0), 100.0);
        assert_eq!(acceptor.temperature(2), 25.0);
    }

    #[test]
    fn test_always_accepts_improvements() {
        let acceptor = SimulatedAnnealingAcceptor::new(0.0, 0.99);
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(acceptor.accept(10.0, 9.0, context(&mut rng, 0)));
        assert!(!acceptor.accept(10.0, 11.0, context(&mut rng, 0)));
    }

    #[test]
    fn test_acceptance_rate_drops_when_cold() {
        let acceptor = SimulatedAnnealingAcceptor::new(10.0, 0.9);
        let mut rng = SmallRng::seed_from_u64(42);

        let hot = (0..1000)
            .filter(|_| acceptor.accept(100.0, 105.0, context(&mut rng, 0)))
            .count();
        let cold = (0..1000)
            .filter(|_| acceptor.accept(100.0, 105.0, context(&mut rng, 100)))
            .count();

        // exp(-0.5) ~ 0.61 when hot, practically zero after 100 iterations.
        assert!(hot > 500 && hot < 700);
        assert_eq!(cold, 0);
    }
}
