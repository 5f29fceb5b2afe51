use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sleeps for `duration` unless `token` is cancelled first.
///
/// Returns `true` when the full delay elapsed.
pub async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> bool {
    if token.is_cancelled() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = token.cancelled() => false,
    }
}

/// Uniformly random whole-second delay in `min_secs..=max_secs`.
pub fn random_delay(min_secs: u64, max_secs: u64) -> Duration {
    let (low, high) = if min_secs <= max_secs {
        (min_secs, max_secs)
    } else {
        (max_secs, min_secs)
    };
    Duration::from_secs(rand::thread_rng().gen_range(low..=high))
}
