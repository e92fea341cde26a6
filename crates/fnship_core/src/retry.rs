use std::time::Duration;

/// Fixed-interval bound for a retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocking sleeper for real runs. The whole deployment is one sequential
/// workflow, so parking the thread is the intended behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed a retryable way; carries the final failure.
    Exhausted { attempts: u32, last: E },
    /// An attempt failed a non-retryable way and the loop stopped at once.
    Fatal(E),
}

/// Runs `operation` until it succeeds, fails a non-retryable way, or the
/// attempt ceiling is reached. The operation receives the 1-based attempt
/// number. The delay applies between attempts, never after the last one, so
/// total sleep time stays under `max_attempts * delay`.
pub fn retry<T, E>(
    policy: RetryPolicy,
    sleeper: &dyn Sleeper,
    is_retryable: impl Fn(&E) -> bool,
    mut operation: impl FnMut(u32) -> Result<T, E>,
) -> Result<T, RetryError<E>> {
    debug_assert!(policy.max_attempts > 0, "retry needs at least one attempt");
    let max_attempts = policy.max_attempts.max(1);

    let mut attempt = 1;
    loop {
        match operation(attempt) {
            Ok(value) => return Ok(value),
            Err(error) if !is_retryable(&error) => return Err(RetryError::Fatal(error)),
            Err(error) => {
                if attempt == max_attempts {
                    return Err(RetryError::Exhausted {
                        attempts: max_attempts,
                        last: error,
                    });
                }
                sleeper.sleep(policy.delay);
                attempt += 1;
            }
        }
    }
}
