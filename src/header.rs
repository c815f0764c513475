use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

/// Length of the opaque preamble preceding the version tag.
pub const PREAMBLE_LEN: usize = 13;

/// FSF format revision, read from the 3-byte ASCII tag after the preamble.
///
/// The revision decides which optional fields a file carries, so it is
/// resolved once here and handed to the channel decoder.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.3")]
    V1_3,
}

impl FormatVersion {
    pub fn from_tag(tag: &[u8]) -> Result<Self> {
        match tag {
            b"1.1" => Ok(FormatVersion::V1_1),
            b"1.3" => Ok(FormatVersion::V1_3),
            _ => Err(Error::UnsupportedVersion(
                String::from_utf8_lossy(tag).into_owned(),
            )),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FormatVersion::V1_1 => "1.1",
            FormatVersion::V1_3 => "1.3",
        }
    }

    /// Whether channel records carry the 50-slot marker arrays.
    pub fn has_markers(&self) -> bool {
        matches!(self, FormatVersion::V1_1 | FormatVersion::V1_3)
    }

    /// Whether header and channel records end with longitude, latitude and depth.
    pub fn has_geographic(&self) -> bool {
        matches!(self, FormatVersion::V1_3)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raw timestamp fields as stored in the file.
///
/// On disk the order is day, month, year, hour, minute, second, millisecond.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsfTime {
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub millisecond: i32,
}

impl FsfTime {
    pub(crate) fn decode(cur: &mut ByteCursor) -> Result<Self> {
        let f = cur.read_i32_array::<7>()?;
        Ok(Self {
            day: f[0],
            month: f[1],
            year: f[2],
            hour: f[3],
            minute: f[4],
            second: f[5],
            millisecond: f[6],
        })
    }

    /// Compose the fields into one absolute time.
    pub fn to_datetime(&self) -> Result<NaiveDateTime> {
        let invalid = || Error::InvalidTimestamp(self.to_string());
        let unsigned = |v: i32| u32::try_from(v).map_err(|_| invalid());
        let ms = unsigned(self.millisecond)?;
        if ms > 999 {
            return Err(invalid());
        }
        NaiveDate::from_ymd_opt(self.year, unsigned(self.month)?, unsigned(self.day)?)
            .and_then(|d| {
                d.and_hms_milli_opt(
                    unsigned(self.hour).ok()?,
                    unsigned(self.minute).ok()?,
                    unsigned(self.second).ok()?,
                    ms,
                )
            })
            .ok_or_else(invalid)
    }
}

impl fmt::Display for FsfTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// The global header of an FSF file.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FsfHeader {
    /// File name as declared inside the file; may differ from the path it was read from.
    pub filename: String,
    pub version: FormatVersion,
    pub channel_count: usize,
    /// Event coordinates.
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub time: FsfTime,
    /// `time` composed into an absolute value. Marker times are relative to it.
    pub datetime: NaiveDateTime,
    /// Zero for version 1.1 files.
    pub longitude: f64,
    pub latitude: f64,
    pub depth: f64,
}

impl FsfHeader {
    pub(crate) fn decode(cur: &mut ByteCursor) -> Result<Self> {
        cur.skip(PREAMBLE_LEN)?;
        let version = FormatVersion::from_tag(cur.read_fixed(3)?)?;
        let filename = cur.read_string("filename")?;
        let count = cur.read_i32()?;
        let channel_count = usize::try_from(count)
            .map_err(|_| Error::MalformedHeader(format!("negative channel count {}", count)))?;
        let (x, y, z) = cur.read_f64_triple()?;
        let time = FsfTime::decode(cur)?;
        let (longitude, latitude, depth) = if version.has_geographic() {
            cur.read_f64_triple()?
        } else {
            (0.0, 0.0, 0.0)
        };
        let datetime = time.to_datetime()?;
        log::trace!(
            "header: version={} filename={:?} channels={} time={}",
            version,
            filename,
            channel_count,
            datetime
        );
        Ok(Self {
            filename,
            version,
            channel_count,
            x,
            y,
            z,
            time,
            datetime,
            longitude,
            latitude,
            depth,
        })
    }
}
