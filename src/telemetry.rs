use std::env;
use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set. Output goes to stderr so payloads
/// printed on stdout stay machine-readable. Calling this twice is harmless.
pub fn init_subscriber(level: &str) {
  let env_filter = env::var("RUST_LOG")
    .map_or_else(|_| EnvFilter::new(level), |directive| EnvFilter::new(&directive))
    .add_directive(
      "sqlx=warn"
        .parse()
        .unwrap_or_else(|_| tracing::Level::WARN.into()),
    );

  let layer = fmt::layer()
    .compact()
    .with_target(true)
    .with_writer(io::stderr);

  if tracing_subscriber::registry().with(env_filter).with(layer).try_init().is_err() {
    tracing::debug!("tracing subscriber already installed");
  }
}
