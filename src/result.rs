use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status code oppai-ng reports on success.
pub const SUCCESS_CODE: i64 = 200;

/// JSON output of a single calculator run.
///
/// Every field is optional because the calculator omits fields that do not
/// apply to the given mode or mods. The numeric accessors fall back to `0.0`
/// when the field is absent, which is also what an empty result (no
/// calculation performed) reports.
#[derive(Clone, PartialEq, Debug, Default, Getters, Serialize, Deserialize)]
pub struct CalculationResult {
    #[getset(get = "pub")]
    code: Option<i64>,
    #[getset(get = "pub")]
    errstr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acc_pp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aim_pp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed_pp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stars: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acc_stars: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aim_stars: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed_stars: Option<f64>,
    /// Everything else the calculator printed (map metadata, hit counts, ...).
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl CalculationResult {
    pub fn pp(&self) -> f64 {
        self.pp.unwrap_or(0.0)
    }

    pub fn acc_pp(&self) -> f64 {
        self.acc_pp.unwrap_or(0.0)
    }

    pub fn aim_pp(&self) -> f64 {
        self.aim_pp.unwrap_or(0.0)
    }

    pub fn speed_pp(&self) -> f64 {
        self.speed_pp.unwrap_or(0.0)
    }

    pub fn stars(&self) -> f64 {
        self.stars.unwrap_or(0.0)
    }

    pub fn acc_stars(&self) -> f64 {
        self.acc_stars.unwrap_or(0.0)
    }

    pub fn aim_stars(&self) -> f64 {
        self.aim_stars.unwrap_or(0.0)
    }

    pub fn speed_stars(&self) -> f64 {
        self.speed_stars.unwrap_or(0.0)
    }

    /// Looks up a field without a dedicated accessor.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the required fields are all present and the status code is a success.
    pub fn is_valid(&self) -> bool {
        self.errstr.is_some()
            && self.pp.is_some()
            && self.stars.is_some()
            && self.code == Some(SUCCESS_CODE)
    }
}
