use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::config::AnnotatorConfig;
use crate::dom::Dom;
use crate::error::{AnnotateError, Result};
use crate::expiry::{classify, ExpiryReport, ExpiryState, LinkAssociation, StrikeStyle};
use crate::time_ago::time_ago;
use crate::timestamp::parse_timestamp;

/// Rewrites the last-updated stamp and the listing links of one page.
///
/// Every pass recomputes the desired presentation from the `datetime`
/// attributes and the current time, and skips elements that already show it.
pub struct Annotator<D: Dom, C: Clock> {
    dom: D,
    clock: C,
    config: AnnotatorConfig,
}

impl<D: Dom, C: Clock> Annotator<D, C> {
    pub fn new(dom: D, clock: C, config: AnnotatorConfig) -> Self {
        Self { dom, clock, config }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    fn datetime_of(&self, element: &D::Element) -> Result<DateTime<Utc>> {
        let value = self
            .dom
            .attribute(element, "datetime")
            .ok_or(AnnotateError::MissingAttribute("datetime"))?;
        parse_timestamp(&value, self.clock.local_offset())
    }

    /// Write the relative age of the last-updated stamp into its element.
    /// Returns the text written.
    pub fn refresh_last_updated(&self) -> Result<String> {
        let element = self
            .dom
            .element_by_id(&self.config.last_updated_id)
            .ok_or_else(|| AnnotateError::MissingElement(format!("#{}", self.config.last_updated_id)))?;
        let updated_at = self.datetime_of(&element)?;
        let text = time_ago(self.clock.now(), updated_at, self.config.granularity);
        self.dom.set_text(&element, &text)?;
        Ok(text)
    }

    /// Mark every listing link whose auction has ended or is about to.
    pub fn refresh_expiry(&self) -> ExpiryReport {
        let now = self.clock.now();
        let window = self.config.ending_window();
        let mut report = ExpiryReport::default();

        for marker in self.dom.query_all(&self.config.end_time_selector) {
            match self.mark_listing(&marker, now, window) {
                Ok(state) => report.record(state),
                Err(err) => {
                    tracing::debug!("skipping end-time marker: {}", err);
                    report.skipped += 1;
                }
            }
        }

        report
    }

    fn mark_listing(
        &self,
        marker: &D::Element,
        now: DateTime<Utc>,
        window: chrono::Duration,
    ) -> Result<ExpiryState> {
        let end = self.datetime_of(marker)?;
        let state = classify(now, end, window);
        if state == ExpiryState::Active {
            return Ok(state);
        }

        let link = self
            .associated_link(marker)
            .ok_or_else(|| AnnotateError::MissingElement("listing link".to_string()))?;
        match state {
            ExpiryState::Expired => self.mark_ended(&link)?,
            ExpiryState::EndingSoon => self.mark_ending(&link)?,
            ExpiryState::Active => {}
        }
        Ok(state)
    }

    fn associated_link(&self, marker: &D::Element) -> Option<D::Element> {
        match self.config.link_association {
            LinkAssociation::EnclosingAnchor => self.dom.closest(marker, "a"),
            LinkAssociation::PrecedingSibling => self.dom.previous_element_sibling(marker),
        }
    }

    fn mark_ended(&self, link: &D::Element) -> Result<()> {
        let config = &self.config;
        if self.dom.has_class(link, &config.ended_class) {
            return Ok(());
        }

        // class first; later passes key off it
        let was_ending = self.dom.has_class(link, &config.ending_class);
        self.dom.add_class(link, &config.ended_class)?;

        if was_ending {
            self.dom.strip_leading_text(link, &config.alarm_prefix())?;
            self.dom.remove_class(link, &config.ending_class)?;
        }

        match config.strike_style {
            StrikeStyle::Markup => self.dom.wrap_children(link, "s"),
            StrikeStyle::InlineStyle => self.dom.set_style(link, "text-decoration", "line-through"),
        }
    }

    fn mark_ending(&self, link: &D::Element) -> Result<()> {
        let config = &self.config;
        if self.dom.has_class(link, &config.ending_class) || self.dom.has_class(link, &config.ended_class) {
            return Ok(());
        }

        self.dom.add_class(link, &config.ending_class)?;
        self.dom.prepend_text(link, &config.alarm_prefix())
    }

    /// Tick body for the last-updated refresh: failures leave the page as is.
    pub fn tick_last_updated(&self) {
        match self.refresh_last_updated() {
            Ok(text) => tracing::debug!("last updated: {}", text),
            Err(err) => tracing::debug!("last-updated refresh skipped: {}", err),
        }
    }

    pub fn tick_expiry(&self) {
        let report = self.refresh_expiry();
        tracing::debug!(
            expired = report.expired,
            ending = report.ending,
            active = report.active,
            skipped = report.skipped,
            "expiry refresh"
        );
    }
}
