use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Bar {
    /// Bar open time (epoch ms)
    #[serde(rename = "t")]
    #[schema(rename = "t")]
    pub time: i64,
    /// Open price
    #[serde(rename = "o")]
    #[schema(rename = "o")]
    pub open: f64,
    /// High price
    #[serde(rename = "h")]
    #[schema(rename = "h")]
    pub high: f64,
    /// Low price
    #[serde(rename = "l")]
    #[schema(rename = "l")]
    pub low: f64,
    /// Close price
    #[serde(rename = "c")]
    #[schema(rename = "c")]
    pub close: f64,
    /// Volume (0 when the upstream omits it)
    #[serde(rename = "v", default)]
    #[schema(rename = "v")]
    pub volume: f64,
}

impl Bar {
    /// True when every price field is a usable number. Bars failing this are
    /// dropped at ingestion so they never reach the detector.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}
