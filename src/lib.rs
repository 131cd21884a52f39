//! Keeps auction listing pages current after they load: the "last updated"
//! stamp reads as a relative time, and listings are struck through once their
//! auction has ended or flagged with an alarm while they are about to.

pub mod annotator;
pub mod clock;
pub mod config;
pub mod dom;
pub mod error;
pub mod expiry;
pub mod scheduler;
pub mod time_ago;
pub mod timestamp;

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(test)]
pub(crate) mod fake_dom;

pub use annotator::Annotator;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AnnotatorConfig;
pub use dom::Dom;
pub use error::AnnotateError;
pub use expiry::{classify, ExpiryReport, ExpiryState, LinkAssociation, StrikeStyle};
pub use time_ago::{format_elapsed, Granularity};

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    browser::on_ready(|| {
        if let Err(err) = browser::launch() {
            tracing::warn!("annotator not started: {}", err);
        }
    });
}

/// Relative time of an ISO-8601 timestamp, e.g. `"3 minutes ago"`.
/// Returns `undefined` to JS when the value cannot be parsed.
#[wasm_bindgen(js_name = timeAgo)]
pub fn format_time_ago(datetime: &str) -> Option<String> {
    let clock = SystemClock;
    let then = timestamp::parse_timestamp(datetime, clock.local_offset()).ok()?;
    Some(time_ago::time_ago(clock.now(), then, Granularity::Fine))
}
