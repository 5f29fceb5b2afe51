use anyhow::Result;
use std::future::Future;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct WorkerRunner;

impl WorkerRunner {
    /// Runs a long-lived worker until it returns or Ctrl+C is pressed.
    ///
    /// The worker receives a token that is cancelled on Ctrl+C; it is
    /// expected to wind down at its next suspension point.
    pub async fn run<F, Fut>(worker: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let token = CancellationToken::new();
        let cloned_token = token.clone();

        // Spawn a task to listen for Ctrl+C
        let listener = tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("🛑 Received Ctrl+C. Initiating graceful shutdown...");
                    cloned_token.cancel();
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });

        let start_time = std::time::Instant::now();
        let result = worker(token).await;
        listener.abort();

        match &result {
            Ok(()) => info!(
                "🛑 Shutdown Complete. Total Time: {:.1}s",
                start_time.elapsed().as_secs_f64()
            ),
            Err(e) => error!("Fatal error: {:#}", e),
        }

        result
    }
}
