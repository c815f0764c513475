use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::header::FormatVersion;

/// Number of marker slots in every channel record.
pub const MARKER_SLOTS: usize = 50;

/// One time pick on a channel: the type code from the marker-type array and
/// the time (seconds after the file timestamp) from the same slot of the
/// marker-time array.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Marker {
    pub code: i32,
    pub time: f64,
}

impl Marker {
    /// Code conventionally written into slots that hold no pick.
    pub const UNUSED: i32 = 0;

    pub fn is_unused(&self) -> bool {
        self.code == Self::UNUSED
    }
}

// serde has no impls for arrays this long; unused slots are left out
fn serialize_markers<S: Serializer>(
    markers: &[Marker; MARKER_SLOTS],
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_seq(markers.iter().filter(|m| !m.is_unused()))
}

/// Metadata of one recording channel.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FsfChannel {
    pub name: String,
    pub id: i32,
    pub component: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub calibration: f64,
    /// Declared number of samples in this channel's waveform.
    pub length: usize,
    /// Sample encoding tag as declared in the file, see [`crate::SampleType`].
    pub datatype: String,
    pub active: i32,
    pub gain: f64,
    pub sensitivity: f64,
    pub damping: f64,
    /// Samples per second.
    pub sample_rate: i32,
    #[serde(serialize_with = "serialize_markers")]
    pub markers: [Marker; MARKER_SLOTS],
    /// Zero for version 1.1 files.
    pub longitude: f64,
    pub latitude: f64,
    pub depth: f64,
    /// Copy of the file timestamp.
    pub datetime: NaiveDateTime,
}

impl FsfChannel {
    pub(crate) fn decode(
        cur: &mut ByteCursor,
        index: usize,
        version: FormatVersion,
        datetime: NaiveDateTime,
    ) -> Result<Self> {
        let start = cur.position();
        let name = cur.read_string("channel name")?;
        let id = cur.read_i32()?;
        let component = cur.read_string("component")?;
        let (x, y, z) = cur.read_f64_triple()?;
        let calibration = cur.read_f64()?;
        let length = cur.read_i32()?;
        let length = usize::try_from(length).map_err(|_| Error::MalformedLength {
            field: "sample count",
            value: length,
        })?;
        let datatype = cur.read_string("datatype")?;
        let active = cur.read_i32()?;
        let (gain, sensitivity, damping) = cur.read_f64_triple()?;
        let sample_rate = cur.read_i32()?;
        if sample_rate <= 0 {
            return Err(Error::InvalidSampleRate {
                channel: index,
                value: sample_rate,
            });
        }

        let mut markers = [Marker::default(); MARKER_SLOTS];
        if version.has_markers() {
            let codes = cur.read_i32_array::<MARKER_SLOTS>()?;
            let times = cur.read_f64_array::<MARKER_SLOTS>()?;
            for (m, (code, time)) in markers.iter_mut().zip(codes.into_iter().zip(times)) {
                *m = Marker { code, time };
            }
        }

        let (longitude, latitude, depth) = if version.has_geographic() {
            cur.read_f64_triple()?
        } else {
            (0.0, 0.0, 0.0)
        };

        log::trace!(
            "channel {}: {}:{} id={} length={} datatype={:?} sr={} ({} bytes at {})",
            index,
            name,
            component,
            id,
            length,
            datatype,
            sample_rate,
            cur.position() - start,
            start
        );

        Ok(Self {
            name,
            id,
            component,
            x,
            y,
            z,
            calibration,
            length,
            datatype,
            active,
            gain,
            sensitivity,
            damping,
            sample_rate,
            markers,
            longitude,
            latitude,
            depth,
            datetime,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active != 0
    }

    /// The on-disk marker-type array.
    pub fn marker_types(&self) -> [i32; MARKER_SLOTS] {
        self.markers.map(|m| m.code)
    }

    /// The on-disk marker-time array.
    pub fn marker_times(&self) -> [f64; MARKER_SLOTS] {
        self.markers.map(|m| m.time)
    }

    /// First slot holding `code`.
    pub fn find_marker(&self, code: i32) -> Option<(usize, &Marker)> {
        self.markers.iter().enumerate().find(|(_, m)| m.code == code)
    }

    /// Markers whose code is not the unused sentinel, with their slot index.
    pub fn used_markers(&self) -> impl Iterator<Item = (usize, &Marker)> {
        self.markers.iter().enumerate().filter(|(_, m)| !m.is_unused())
    }
}
