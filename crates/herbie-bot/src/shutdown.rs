//! Process shutdown signals.

use anyhow::Context;

/// Which signal asked the service to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
}

/// Listens for Ctrl+C (SIGINT) and, on Unix, SIGTERM.
///
/// The SIGTERM handler is registered by [`ShutdownSignal::install`], so a
/// signal delivered between install and [`ShutdownSignal::recv`] is not lost.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    pub fn install() -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .context("Failed to install SIGTERM handler")?,
        })
    }

    /// Wait for the next shutdown signal.
    pub async fn recv(&mut self) -> anyhow::Result<ShutdownReason> {
        #[cfg(unix)]
        let terminate = self.terminate.recv();
        #[cfg(not(unix))]
        let terminate = std::future::pending::<Option<()>>();

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl+C")?;
                tracing::info!("Received Ctrl+C signal");
                Ok(ShutdownReason::Interrupt)
            }
            _ = terminate => {
                tracing::info!("Received terminate signal");
                Ok(ShutdownReason::Terminate)
            }
        }
    }
}
