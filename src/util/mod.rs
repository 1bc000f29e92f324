//! Utility functions: tracing setup and HTML escaping.

use tracing::{Level, Subscriber};
use tracing_subscriber::{
  EnvFilter, Layer,
  filter::{Filtered, Targets},
  fmt,
  layer::SubscriberExt,
  registry::LookupSpan,
  util::SubscriberInitExt,
};

use crate::logship::{BufferLayer, LogBuffer};

/// Initialize pretty CLI logging, plus the log shipping layer when a buffer
/// is given. Only this crate's events at INFO and above are shipped.
pub fn init_tracing(buffer: Option<LogBuffer>) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let console = fmt::layer()
    .with_target(false)
    .pretty()
    .with_filter(filter);
  let shipped = buffer.map(shipping_layer);
  tracing_subscriber::registry()
    .with(console)
    .with(shipped)
    .init();
}

/// Buffer layer restricted to this crate's events at INFO and above.
pub fn shipping_layer<S>(buffer: LogBuffer) -> Filtered<BufferLayer, Targets, S>
where
  S: Subscriber + for<'a> LookupSpan<'a>,
{
  BufferLayer::new(buffer).with_filter(
    Targets::new().with_target(env!("CARGO_CRATE_NAME"), Level::INFO),
  )
}

/// Minimal HTML escaping for text display.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
}
