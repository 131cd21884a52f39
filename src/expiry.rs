use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryState {
    Expired,
    EndingSoon,
    Active,
}

/// Where the link belonging to an end-time marker sits in the page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkAssociation {
    /// `<a>Title <time class="auction-end-time" ...></time></a>`
    #[default]
    EnclosingAnchor,
    /// `<a>Title</a> <time class="endtime" ...></time>`
    PrecedingSibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrikeStyle {
    /// Wrap the link's contents in `<s>`.
    #[default]
    Markup,
    /// Set `text-decoration: line-through` on the link.
    InlineStyle,
}

pub fn classify(now: DateTime<Utc>, end: DateTime<Utc>, ending_window: Duration) -> ExpiryState {
    let remaining = end - now;
    if remaining <= Duration::zero() {
        ExpiryState::Expired
    } else if remaining <= ending_window {
        ExpiryState::EndingSoon
    } else {
        ExpiryState::Active
    }
}

/// Outcome of one pass over the end-time markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    pub expired: usize,
    pub ending: usize,
    pub active: usize,
    pub skipped: usize,
}

impl ExpiryReport {
    pub fn record(&mut self, state: ExpiryState) {
        match state {
            ExpiryState::Expired => self.expired += 1,
            ExpiryState::EndingSoon => self.ending += 1,
            ExpiryState::Active => self.active += 1,
        }
    }
}
