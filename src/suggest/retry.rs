use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::{MacroError, Result};
use crate::planner::constants::{RETRY_DELAY_MAX_SECS, RETRY_DELAY_MIN_SECS};
use crate::suggest::source::SuggestionSource;

/// Randomized delay before the single retry of a rate-limited call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs_f64(RETRY_DELAY_MIN_SECS),
            max_delay: Duration::from_secs_f64(RETRY_DELAY_MAX_SECS),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// A uniformly random delay within the configured bounds.
    pub fn jittered_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min_delay.as_secs_f64();
        let max = self.max_delay.as_secs_f64().max(min);
        Duration::from_secs_f64(rng.gen_range(min..=max))
    }
}

const MAX_ATTEMPTS: usize = 2;

/// Call the source, retrying exactly once after a rate-limit error.
///
/// Any other error, or a second rate limit, is returned as is.
pub fn generate_with_retry(
    source: &dyn SuggestionSource,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<String> {
    let mut attempt = 1;
    loop {
        match source.generate(prompt) {
            Err(MacroError::RateLimited) if attempt < MAX_ATTEMPTS => {
                let delay = policy.jittered_delay(&mut rand::thread_rng());
                warn!(attempt, delay_secs = delay.as_secs_f64(), "rate limited; retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            result => return result,
        }
    }
}
