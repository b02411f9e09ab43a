use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Timestamp format used throughout the schedule document.
pub const STAGE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule record missing field {0}")]
    MissingField(&'static str),
    #[error("malformed timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("malformed timezone offset {0:?}")]
    Offset(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed remote schedule document, keyed by region code. Field-level
/// validation happens here at the serde boundary; all record fields are
/// optional strings so a sparse document still parses and the builder
/// decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleDoc {
    #[serde(flatten)]
    pub regions: HashMap<String, RegionSchedule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionSchedule {
    #[serde(default, rename = "resourceCollection")]
    pub resource_collection: Option<ResourceCollectionRecord>,
    #[serde(default, rename = "sideStoryStage")]
    pub side_story_stage: Vec<SideStoryRecord>,
}

/// Region-wide bonus window: while it is active every resource stage is open.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceCollectionRecord {
    #[serde(default, rename = "Tip")]
    pub tip: Option<String>,
    #[serde(default, rename = "UtcStartTime")]
    pub utc_start_time: Option<String>,
    #[serde(default, rename = "UtcExpireTime")]
    pub utc_expire_time: Option<String>,
    #[serde(default, rename = "TimeZone")]
    pub time_zone: Option<String>,
}

/// One time-boxed event stage as published by the schedule document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SideStoryRecord {
    /// Lowest automation-core version able to run this stage.
    #[serde(default, rename = "MinimumRequired")]
    pub minimum_required: Option<String>,
    #[serde(default, rename = "Display")]
    pub display: Option<String>,
    #[serde(default, rename = "Value")]
    pub value: Option<String>,
    #[serde(default, rename = "Drop")]
    pub drop: Option<String>,
    #[serde(default, rename = "Activity")]
    pub activity: Option<ActivityRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityRecord {
    #[serde(default, rename = "Tip")]
    pub tip: Option<String>,
    #[serde(default, rename = "StageName")]
    pub stage_name: Option<String>,
    #[serde(default, rename = "UtcStartTime")]
    pub utc_start_time: Option<String>,
    #[serde(default, rename = "UtcExpireTime")]
    pub utc_expire_time: Option<String>,
    #[serde(default, rename = "TimeZone")]
    pub time_zone: Option<String>,
}

pub fn parse_document(raw: &str) -> Result<ScheduleDoc, ScheduleError> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode a `yyyy/MM/dd HH:mm:ss` document timestamp into UTC. The document
/// states times in the region's local clock together with an hour offset, so
/// the offset is subtracted to normalize.
pub fn decode_utc(
    value: Option<&str>,
    field: &'static str,
    time_zone: Option<&str>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let raw = value.ok_or(ScheduleError::MissingField(field))?;
    let naive =
        NaiveDateTime::parse_from_str(raw, STAGE_TIME_FORMAT).map_err(|source| {
            ScheduleError::Timestamp {
                value: raw.to_string(),
                source,
            }
        })?;
    let offset = offset_hours(time_zone)?;
    let shift = Duration::try_hours(offset)
        .ok_or_else(|| ScheduleError::Offset(offset.to_string()))?;
    Ok(naive.and_utc() - shift)
}

fn offset_hours(time_zone: Option<&str>) -> Result<i64, ScheduleError> {
    match time_zone {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ScheduleError::Offset(raw.to_string())),
    }
}
