//! Structured logging for simulation runs.
//!
//! The engine emits [`tracing`] events at these levels:
//!
//! - **TRACE**: every processed event, with clock, queue length and server state (very verbose)
//! - **DEBUG**: scheduling of the first arrival
//! - **INFO**: run start and completion
//! - **WARN**: the stability diagnostic, when the arrival rate is at least the service rate
//! - **ERROR**: runs aborted by a full waiting line, and unreadable configuration files
//!
//! Nothing is printed unless a subscriber is installed; [`init_logging()`] installs one that writes to stderr so a
//! report on stdout stays clean. `RUST_LOG` overrides the level passed in:
//!
//! ```bash
//! RUST_LOG=mmone=trace mmone --arrival-rate 0.5 --service-rate 0.7 --horizon 50
//! ```

use tracing::Subscriber;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build a formatting subscriber that writes events passing `filter` to `writer`.
fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_target(true))
        .with(filter)
}

/// Install a global stderr subscriber filtered at `level` ("trace", "debug", "info", "warn" or "error") unless
/// `RUST_LOG` says otherwise.
///
/// Calling this more than once, or after another subscriber has been installed, leaves the existing subscriber in
/// place.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if subscriber(filter, std::io::stderr).try_init().is_ok() {
        tracing::debug!(level, "logging initialized");
    }
}
