use std::rc::Rc;
use std::time::Duration;

use crate::annotator::Annotator;
use crate::clock::Clock;
use crate::dom::Dom;

/// Something that can call a closure repeatedly. Registered callbacks live
/// until the page goes away.
pub trait Timers {
    fn every(&mut self, period: Duration, tick: Box<dyn FnMut()>);
}

/// Run `tick` now, then every `period`.
pub fn start_repeating<T, F>(timers: &mut T, period: Duration, mut tick: F)
where
    T: Timers + ?Sized,
    F: FnMut() + 'static,
{
    tick();
    timers.every(period, Box::new(tick));
}

/// Start both refresh ticks: the last-updated text and the listing expiry marks.
pub fn start<D, C, T>(annotator: Rc<Annotator<D, C>>, timers: &mut T)
where
    D: Dom + 'static,
    C: Clock + 'static,
    T: Timers + ?Sized,
{
    let time_ago_every = annotator.config().time_ago_interval();
    let expiry_every = annotator.config().expiry_interval();

    let last_updated = Rc::clone(&annotator);
    start_repeating(timers, time_ago_every, move || last_updated.tick_last_updated());

    start_repeating(timers, expiry_every, move || annotator.tick_expiry());

    tracing::debug!(
        time_ago_secs = time_ago_every.as_secs(),
        expiry_secs = expiry_every.as_secs(),
        "annotator started"
    );
}
