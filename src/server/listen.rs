use crate::server::ingest::Ingestor;
use crate::server::transport::{ReplyEndpoint, Transport};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use zeromq::ZmqError;

#[derive(Clone, Debug)]
pub struct Config {
    pub endpoint: String,
    pub retry_ms: u64,
    pub retry_max_delay: Duration,
    /// Number of times the endpoint is rebound after consecutive transport failures, unbounded if `None`.
    pub max_restarts: Option<usize>,
}

/// Request/reply endpoint feeding every request through an [`Ingestor`].
///
/// Requests are handled strictly one at a time: the next request is only received after the reply to the previous
/// one has been sent.
pub struct Server {
    ingestor: Ingestor,
    config: Config,
    transport: Box<dyn Transport>,
    bound_tx: watch::Sender<Option<String>>,
}

impl Server {
    pub fn new(ingestor: Ingestor, config: Config, transport: Box<dyn Transport>) -> Self {
        let (bound_tx, _) = watch::channel(None);
        Server {
            ingestor,
            config,
            transport,
            bound_tx,
        }
    }

    /// The endpoint the server is currently bound to, with the port resolved, or `None` while it is not bound.
    #[cfg(test)]
    pub fn bound_endpoint(&self) -> watch::Receiver<Option<String>> {
        self.bound_tx.subscribe()
    }

    /// Serves requests until `shutdown` is cancelled.
    ///
    /// A transport failure drops the endpoint, which is bound again after a backoff. The backoff and the restart budget
    /// start over after every session that answered at least one request, so `max_restarts` bounds consecutive
    /// failures only. Once it is exhausted the last failure is returned. A request that is being handled when
    /// `shutdown` is cancelled is still answered.
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint))]
    pub async fn listen(&self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let mut delays = self.backoff();

        info!("📡 Starting ingestion server on {}...", self.config.endpoint);
        loop {
            let mut exchanges = 0;
            let result = self.serve(&shutdown, &mut exchanges).await;
            self.bound_tx.send_replace(None);

            let error = match result {
                Ok(()) => {
                    info!("🛑 Ingestion server stopped");
                    return Ok(());
                }
                Err(error) => error,
            };

            self.ingestor.stats().record_transport_failure();
            if exchanges > 0 {
                delays = self.backoff();
            }

            let Some(delay) = delays.next() else {
                error!("❌ Transport error: {}. Giving up", error);
                return Err(error);
            };

            warn!(exchanges, "⚠️ Transport error: {}. Restarting endpoint in {:?}...", error, delay);
            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.cancelled() => {
                    info!("🛑 Ingestion server stopped while waiting to restart");
                    return Ok(());
                }
            }
        }
    }

    fn backoff(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(self.config.retry_ms)
            .factor(2)
            .max_delay(self.config.retry_max_delay)
            .map(jitter)
            .take(self.config.max_restarts.unwrap_or(usize::MAX))
    }

    async fn serve(&self, shutdown: &CancellationToken, exchanges: &mut u64) -> Result<(), ServerError> {
        let mut endpoint = self.transport.bind(&self.config.endpoint).await.map_err(|source| ServerError::Bind {
            endpoint: self.config.endpoint.clone(),
            source,
        })?;

        info!("📡 Listening on {}... OK", endpoint.endpoint());
        self.bound_tx.send_replace(Some(endpoint.endpoint().to_string()));

        let result = self.exchange(endpoint.as_mut(), shutdown, exchanges).await;
        endpoint.close().await;

        result
    }

    async fn exchange(&self, endpoint: &mut dyn ReplyEndpoint, shutdown: &CancellationToken, exchanges: &mut u64) -> Result<(), ServerError> {
        loop {
            let payload = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Ok(()),
                payload = endpoint.recv() => payload.map_err(ServerError::Receive)?,
            };

            let reply = self.ingestor.handle(&payload).await;
            endpoint.send(reply).await.map_err(ServerError::Send)?;
            *exchanges += 1;
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("could not bind '{endpoint}': {source}")]
    Bind { endpoint: String, source: ZmqError },
    #[error("receive failed: {0}")]
    Receive(#[source] ZmqError),
    #[error("send failed: {0}")]
    Send(#[source] ZmqError),
}
