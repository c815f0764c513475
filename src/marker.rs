//! Marker time lookup.
//!
//! A marker is stored as a seconds offset from the file timestamp. The query
//! converts it to that offset, to an absolute time, or to a sample index.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::channel::FsfChannel;
use crate::error::{Error, Result};
use crate::header::FsfHeader;

/// Requested representation of a marker time.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Seconds after the file timestamp.
    #[default]
    Relative,
    /// File timestamp plus the relative time.
    Absolute,
    /// Relative time times sample rate, rounded half away from zero.
    Index,
}

impl FromStr for TimeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relative" => Ok(TimeMode::Relative),
            "absolute" => Ok(TimeMode::Absolute),
            "index" => Ok(TimeMode::Index),
            _ => Err(Error::InvalidRequestMode(s.to_string())),
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMode::Relative => write!(f, "relative"),
            TimeMode::Absolute => write!(f, "absolute"),
            TimeMode::Index => write!(f, "index"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum MarkerTime {
    Relative(f64),
    Absolute(NaiveDateTime),
    Index(i64),
}

impl fmt::Display for MarkerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerTime::Relative(s) => write!(f, "{}", s),
            MarkerTime::Absolute(t) => write!(f, "{}", t),
            MarkerTime::Index(i) => write!(f, "{}", i),
        }
    }
}

/// `epoch + seconds`, the offset rounded to the nearest nanosecond.
pub fn offset_time(epoch: NaiveDateTime, seconds: f64) -> Result<NaiveDateTime> {
    let overflow = || Error::InvalidTimestamp(format!("{} + {} s", epoch, seconds));
    let nanos = (seconds * 1e9).round();
    if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
        return Err(overflow());
    }
    epoch
        .checked_add_signed(TimeDelta::nanoseconds(nanos as i64))
        .ok_or_else(overflow)
}

/// `seconds * sample_rate` rounded half away from zero.
pub fn sample_index(seconds: f64, sample_rate: i32) -> Result<i64> {
    let index = (seconds * sample_rate as f64).round();
    // i64::MAX as f64 rounds up to 2^63, which no longer fits
    if !index.is_finite() || index < i64::MIN as f64 || index >= i64::MAX as f64 {
        return Err(Error::InvalidTimestamp(format!(
            "{} s at {} Hz is not a sample index",
            seconds, sample_rate
        )));
    }
    Ok(index as i64)
}

/// Convert the time of the first marker with type `code` on `channel`.
///
/// Returns `Ok(None)` when no slot of the channel carries `code`.
pub fn query_channel_marker(
    header: &FsfHeader,
    channel: &FsfChannel,
    code: i32,
    mode: TimeMode,
) -> Result<Option<MarkerTime>> {
    let Some((slot, marker)) = channel.find_marker(code) else {
        return Ok(None);
    };
    log::trace!(
        "marker {} on {}:{} at slot {}: {} s",
        code,
        channel.name,
        channel.component,
        slot,
        marker.time
    );
    let time = match mode {
        TimeMode::Relative => MarkerTime::Relative(marker.time),
        TimeMode::Absolute => MarkerTime::Absolute(offset_time(header.datetime, marker.time)?),
        TimeMode::Index => MarkerTime::Index(sample_index(marker.time, channel.sample_rate)?),
    };
    Ok(Some(time))
}

/// Look up marker `code` on channel `channel` of a decoded file.
pub fn query_marker(
    header: &FsfHeader,
    channels: &[FsfChannel],
    channel: usize,
    code: i32,
    mode: TimeMode,
) -> Result<Option<MarkerTime>> {
    let ch = channels.get(channel).ok_or(Error::ChannelOutOfRange {
        index: channel,
        count: channels.len(),
    })?;
    query_channel_marker(header, ch, code, mode)
}

/// As [`query_marker`], with the mode given by name.
pub fn query_marker_str(
    header: &FsfHeader,
    channels: &[FsfChannel],
    channel: usize,
    code: i32,
    mode: &str,
) -> Result<Option<MarkerTime>> {
    query_marker(header, channels, channel, code, mode.parse()?)
}
