//! AHR999 valuation index feed and zone classification.
//!
//! The index is an opaque number supplied by an external service. We only
//! classify it into the three conventional zones and map it onto a
//! 0–100% gauge split into equal thirds.

use super::{get_text, http_client, FeedError, IndexFeed};
use crate::domain::FeedSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_INDEX_URL: &str = "https://ahr999.btchao.com/api/ahr999/calculate";

/// Upper bound (exclusive) of the accumulate zone.
pub const ACCUMULATE_BELOW: f64 = 0.45;
/// Upper bound (inclusive) of the dollar-cost-average zone.
pub const DCA_UP_TO: f64 = 1.2;

const THIRD: f64 = 33.33;

/// Valuation zone for an AHR999 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexZone {
    /// Below 0.45: historically cheap, buy zone.
    Accumulate,
    /// 0.45 to 1.2: regular dollar-cost averaging.
    DollarCostAverage,
    /// Above 1.2: wait and observe.
    Wait,
}

impl IndexZone {
    pub fn classify(value: f64) -> Self {
        if value < ACCUMULATE_BELOW {
            IndexZone::Accumulate
        } else if value <= DCA_UP_TO {
            IndexZone::DollarCostAverage
        } else {
            IndexZone::Wait
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndexZone::Accumulate => "accumulate",
            IndexZone::DollarCostAverage => "dollar-cost average",
            IndexZone::Wait => "wait",
        }
    }
}

/// An index value with its zone and gauge position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexReading {
    pub value: f64,
    pub zone: IndexZone,
    /// Gauge fill in percent, 0..=100.
    pub fill_pct: f64,
    pub source: FeedSource,
}

impl IndexReading {
    pub fn from_value(value: f64, source: FeedSource) -> Self {
        Self {
            value,
            zone: IndexZone::classify(value),
            fill_pct: gauge_fill(value),
            source,
        }
    }

    /// Displayed when the index feed is down: the value sits in the
    /// middle zone with the gauge at half.
    pub fn fallback(value: f64) -> Self {
        Self {
            value,
            zone: IndexZone::classify(value),
            fill_pct: 50.0,
            source: FeedSource::Fallback,
        }
    }
}

/// Gauge position: each zone fills its own third, the last third
/// saturating two index points above the DCA ceiling.
pub fn gauge_fill(value: f64) -> f64 {
    let fill = match IndexZone::classify(value) {
        IndexZone::Accumulate => value / ACCUMULATE_BELOW * THIRD,
        IndexZone::DollarCostAverage => {
            THIRD + (value - ACCUMULATE_BELOW) / (DCA_UP_TO - ACCUMULATE_BELOW) * THIRD
        }
        IndexZone::Wait => 66.66 + ((value - DCA_UP_TO) / 2.0 * THIRD).min(THIRD),
    };
    fill.min(100.0)
}

#[derive(Debug, Deserialize)]
struct CalculateResponse {
    #[serde(default)]
    success: bool,
    data: Option<CalculateData>,
}

#[derive(Debug, Deserialize)]
struct CalculateData {
    ahr999: Option<f64>,
}

pub struct Ahr999Feed {
    client: reqwest::blocking::Client,
    url: String,
}

impl Ahr999Feed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
        })
    }

    /// Parse a `/calculate` response. Anything but `success: true` with a
    /// finite, non-zero `data.ahr999` is a format error.
    pub fn parse_response(body: &str) -> Result<IndexReading, FeedError> {
        let resp: CalculateResponse = serde_json::from_str(body)
            .map_err(|e| FeedError::ResponseFormatChanged(e.to_string()))?;

        if !resp.success {
            return Err(FeedError::ResponseFormatChanged("success flag not set".into()));
        }

        let value = resp
            .data
            .and_then(|d| d.ahr999)
            .filter(|v| v.is_finite() && *v != 0.0)
            .ok_or_else(|| FeedError::ResponseFormatChanged("no ahr999 value".into()))?;

        Ok(IndexReading::from_value(value, FeedSource::Live))
    }
}

impl IndexFeed for Ahr999Feed {
    fn name(&self) -> &str {
        "ahr999"
    }

    fn fetch_index(&self) -> Result<IndexReading, FeedError> {
        let body = get_text(&self.client, &self.url)?;
        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zone_boundaries() {
        assert_eq!(IndexZone::classify(0.2), IndexZone::Accumulate);
        assert_eq!(IndexZone::classify(0.45), IndexZone::DollarCostAverage);
        assert_eq!(IndexZone::classify(1.2), IndexZone::DollarCostAverage);
        assert_eq!(IndexZone::classify(1.2001), IndexZone::Wait);
    }

    #[test]
    fn gauge_positions() {
        assert!(approx(gauge_fill(0.0), 0.0));
        assert!(approx(gauge_fill(0.225), THIRD / 2.0));
        assert!(approx(gauge_fill(0.45), THIRD));
        assert!(approx(gauge_fill(1.2), 2.0 * THIRD));
        assert!(approx(gauge_fill(2.2), 66.66 + THIRD / 2.0));
        // saturates at the top of the last third
        assert!(approx(gauge_fill(10.0), 66.66 + THIRD));
    }

    #[test]
    fn parses_success_response() {
        let body = r#"{"success":true,"data":{"ahr999":0.8123,"price":64000}}"#;
        let reading = Ahr999Feed::parse_response(body).unwrap();
        assert_eq!(reading.value, 0.8123);
        assert_eq!(reading.zone, IndexZone::DollarCostAverage);
        assert_eq!(reading.source, FeedSource::Live);
    }

    #[test]
    fn unsuccessful_response_is_rejected() {
        let body = r#"{"success":false,"data":{"ahr999":0.8}}"#;
        assert!(Ahr999Feed::parse_response(body).is_err());
        assert!(Ahr999Feed::parse_response(r#"{"success":true,"data":{}}"#).is_err());
        assert!(Ahr999Feed::parse_response(r#"{"success":true}"#).is_err());
    }

    #[test]
    fn fallback_reading() {
        let reading = IndexReading::fallback(1.05);
        assert_eq!(reading.zone, IndexZone::DollarCostAverage);
        assert_eq!(reading.fill_pct, 50.0);
        assert_eq!(reading.source, FeedSource::Fallback);
    }
}
