//! Simulated processing delay.
//!
//! The site has no mail or payment backend. Submissions pause for the
//! configured latency so the pending state is visible, then succeed.

use std::time::Duration;

/// Wait out the simulated processing time. A zero delay returns immediately.
pub async fn simulate_processing(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    tracing::debug!(delay_ms = delay.as_millis(), "Simulating processing");
    tokio::time::sleep(delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulate_processing_waits() {
        let start = tokio::time::Instant::now();
        simulate_processing(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        simulate_processing(Duration::ZERO).await;
    }
}
