use rand::Rng;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RuinParams {
    /// Smallest share of the jobs removed by one ruin.
    pub ruin_minimum_ratio: f64,
    /// Largest share of the jobs removed by one ruin.
    pub ruin_maximum_ratio: f64,
    pub ruin_minimum_size: usize,
    /// Exponent applied to the random draw of worst ruin, higher values stick to the worst jobs.
    pub ruin_worst_determinism: f64,
}

impl Default for RuinParams {
    fn default() -> Self {
        RuinParams {
            ruin_minimum_ratio: 0.05,
            ruin_maximum_ratio: 0.3,
            ruin_minimum_size: 1,
            ruin_worst_determinism: 3.0,
        }
    }
}

impl RuinParams {
    /// Random ruin size for a problem with `num_jobs` jobs.
    pub fn num_jobs_to_remove<R>(&self, num_jobs: usize, rng: &mut R) -> usize
    where
        R: Rng,
    {
        let minimum_ruin_size = ((self.ruin_minimum_ratio * num_jobs as f64).ceil() as usize)
            .max(self.ruin_minimum_size)
            .min(num_jobs);
        let maximum_ruin_size = ((self.ruin_maximum_ratio * num_jobs as f64).floor() as usize)
            .max(minimum_ruin_size);

        rng.random_range(minimum_ruin_size..=maximum_ruin_size)
    }
}
