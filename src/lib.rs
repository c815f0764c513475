#![deny(unsafe_code)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub use crate::channel::{FsfChannel, Marker, MARKER_SLOTS};
pub use crate::data::{SampleType, Waveform};
pub use crate::error::{Error, Result};
pub use crate::file::{decode, FsfFile, PhasePick};
pub use crate::header::{FormatVersion, FsfHeader, FsfTime, PREAMBLE_LEN};
pub use crate::marker::{
    offset_time, query_channel_marker, query_marker, query_marker_str, sample_index, MarkerTime,
    TimeMode,
};

mod channel;
mod cursor;
mod data;
mod error;
mod file;
mod header;
mod marker;
