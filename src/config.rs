use std::time::Duration;

use serde::Deserialize;

use crate::dom::Dom;
use crate::error::{AnnotateError, Result};
use crate::expiry::{LinkAssociation, StrikeStyle};
use crate::time_ago::Granularity;

/// Id of the optional `<script type="application/json">` element holding
/// page-level overrides.
pub const CONFIG_ELEMENT_ID: &str = "annotator-config";

/// Longest tick period a browser timer accepts; `setInterval` takes a signed
/// 32-bit millisecond delay.
pub const MAX_INTERVAL_SECS: u64 = i32::MAX as u64 / 1000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnnotatorConfig {
    pub last_updated_id: String,
    pub end_time_selector: String,
    pub link_association: LinkAssociation,
    pub strike_style: StrikeStyle,
    pub granularity: Granularity,
    pub ending_soon_secs: u64,
    pub time_ago_interval_secs: u64,
    pub expiry_interval_secs: u64,
    pub ended_class: String,
    pub ending_class: String,
    pub alarm_glyph: String,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            last_updated_id: "last-updated".to_string(),
            end_time_selector: "time.auction-end-time".to_string(),
            link_association: LinkAssociation::default(),
            strike_style: StrikeStyle::default(),
            granularity: Granularity::default(),
            ending_soon_secs: 60 * 60,
            time_ago_interval_secs: 60,
            expiry_interval_secs: 5 * 60,
            ended_class: "ended".to_string(),
            ending_class: "ending".to_string(),
            alarm_glyph: "⏰".to_string(),
        }
    }
}

impl AnnotatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Class names end up in `classList.add`, which throws on empty tokens and
    /// tokens containing whitespace.
    pub fn validate(&self) -> Result<()> {
        for class in [&self.ended_class, &self.ending_class] {
            if class.is_empty() || class.chars().any(char::is_whitespace) {
                return Err(AnnotateError::InvalidClassName(class.clone()));
            }
        }
        Ok(())
    }

    /// Read overrides from the page, falling back to defaults when the config
    /// element is absent or unreadable.
    pub fn from_dom<D: Dom>(dom: &D) -> Self {
        let Some(element) = dom.element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        match Self::from_json(&dom.text(&element)) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring page config: {}", err);
                Self::default()
            }
        }
    }

    pub fn time_ago_interval(&self) -> Duration {
        Duration::from_secs(self.time_ago_interval_secs.clamp(1, MAX_INTERVAL_SECS))
    }

    pub fn expiry_interval(&self) -> Duration {
        Duration::from_secs(self.expiry_interval_secs.clamp(1, MAX_INTERVAL_SECS))
    }

    pub fn ending_window(&self) -> chrono::Duration {
        i64::try_from(self.ending_soon_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// The glyph plus separating space, as it appears in front of a label.
    pub fn alarm_prefix(&self) -> String {
        format!("{} ", self.alarm_glyph)
    }
}
