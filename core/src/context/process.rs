use std::sync::{Mutex, MutexGuard};

use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ProcessResolver;

/// Number of per-seed generators a scope keeps before starting over.
pub const MAX_SEEDED_GENERATORS: usize = 4096;

/// Operator parameters and random number generators of a running process.
///
/// Every seed owns its own generator, so `rand(seed)` yields a reproducible sequence per
/// seed no matter how calls with different seeds interleave. At most
/// [`MAX_SEEDED_GENERATORS`] generators are kept; when a new seed arrives at the cap, all
/// of them are dropped and every seed restarts its sequence.
#[derive(Debug)]
pub struct ProcessScope {
    parameters: HashMap<(String, String), String>,
    rng: Mutex<StdRng>,
    seeded: Mutex<HashMap<i64, StdRng>>,
}

impl Default for ProcessScope {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a generator in an invalid state.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ProcessScope {
    /// A scope with an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A scope whose unseeded `rand()` calls are reproducible too.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            parameters: HashMap::new(),
            rng: Mutex::new(rng),
            seeded: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_parameter(
        mut self,
        operator: impl Into<String>,
        parameter: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set_parameter(operator, parameter, value);
        self
    }

    pub fn set_parameter(
        &mut self,
        operator: impl Into<String>,
        parameter: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.parameters
            .insert((operator.into(), parameter.into()), value.into());
    }

    /// One random draw without any process state.
    pub fn fresh_random(seed: Option<i64>) -> f64 {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed as u64).gen_range(0.0..1.0),
            None => rand::thread_rng().gen_range(0.0..1.0),
        }
    }
}

impl ProcessResolver for ProcessScope {
    fn parameter(&self, operator: &str, parameter: &str) -> Option<String> {
        self.parameters
            .get(&(operator.to_string(), parameter.to_string()))
            .cloned()
    }

    fn random(&self, seed: Option<i64>) -> f64 {
        match seed {
            Some(seed) => {
                let mut seeded = lock(&self.seeded);
                if seeded.len() >= MAX_SEEDED_GENERATORS && !seeded.contains_key(&seed) {
                    tracing::debug!(
                        generators = seeded.len(),
                        "dropping seeded generators"
                    );
                    seeded.clear();
                }
                seeded
                    .entry(seed)
                    .or_insert_with(|| StdRng::seed_from_u64(seed as u64))
                    .gen_range(0.0..1.0)
            }
            None => lock(&self.rng).gen_range(0.0..1.0),
        }
    }
}
