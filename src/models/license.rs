use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

const SECONDS_PER_MINUTE: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub id: i64,
    pub key: String,
    pub expiration_minutes: i64,
    pub created_at: i64,
    pub is_logged_in: bool,
    /// Device currently holding the license; always set while `is_logged_in`
    pub device_id: Option<String>,
}

impl LicenseRecord {
    /// Unix timestamp after which the key no longer validates.
    pub fn expires_at(&self) -> i64 {
        self.created_at + self.expiration_minutes * SECONDS_PER_MINUTE
    }

    /// Expired from the `expires_at` second onward, inclusive.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at()
    }

    /// True when another device holds the binding.
    pub fn is_held_by_other(&self, device_id: &str) -> bool {
        self.is_logged_in && self.device_id.as_deref() != Some(device_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewLicense {
    pub key: String,
    pub expiration_minutes: i64,
    pub created_at: i64,
}

/// Symbolic expiration lengths offered by the admin form.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub enum DurationCode {
    #[default]
    #[serde(rename = "2_minutes")]
    #[strum(serialize = "2_minutes")]
    TwoMinutes,
    #[serde(rename = "2_hours")]
    #[strum(serialize = "2_hours")]
    TwoHours,
    #[serde(rename = "1_day")]
    #[strum(serialize = "1_day")]
    OneDay,
}

impl DurationCode {
    pub fn minutes(self) -> i64 {
        match self {
            DurationCode::TwoMinutes => 2,
            DurationCode::TwoHours => 120,
            DurationCode::OneDay => 1440,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationCode::TwoMinutes => "2 Minutes",
            DurationCode::TwoHours => "2 Hours",
            DurationCode::OneDay => "1 Day",
        }
    }
}

/// Result of an atomic bind attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The record is now bound to the requesting device.
    Bound(LicenseRecord),
    /// Another device won the binding.
    Conflict { bound_to: Option<String> },
}
