use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::channel::FsfChannel;
use crate::cursor::ByteCursor;
use crate::data::Waveform;
use crate::error::{Error, Result};
use crate::header::FsfHeader;
use crate::marker::{query_channel_marker, query_marker, MarkerTime, TimeMode};

/// A fully decoded FSF file.
///
/// Channels and waveforms are positionally aligned: `waveforms()[i]` holds the
/// samples described by `channels()[i]`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FsfFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    header: FsfHeader,
    channels: Vec<FsfChannel>,
    #[serde(skip)]
    waveforms: Vec<Waveform>,
}

/// Decode a complete FSF file held in memory.
///
/// Any failure aborts the whole decode; no partially filled file is returned.
pub fn decode(bytes: &[u8]) -> Result<FsfFile> {
    let mut cur = ByteCursor::new(bytes);
    let header = FsfHeader::decode(&mut cur)?;

    // channel records come first, then one contiguous block of samples
    let mut channels = Vec::with_capacity(header.channel_count.min(1024));
    for i in 0..header.channel_count {
        channels.push(FsfChannel::decode(
            &mut cur,
            i,
            header.version,
            header.datetime,
        )?);
    }
    let mut waveforms = Vec::with_capacity(channels.len());
    for (i, ch) in channels.iter().enumerate() {
        waveforms.push(Waveform::decode(&mut cur, i, ch)?);
    }

    log::debug!(
        "decoded FSF {} {:?}: {} channels, {} bytes",
        header.version,
        header.filename,
        channels.len(),
        cur.position()
    );
    if cur.remaining() > 0 {
        log::debug!("{} trailing bytes ignored", cur.remaining());
    }

    Ok(FsfFile {
        path: None,
        header,
        channels,
        waveforms,
    })
}

/// A channel's marker resolved to its relative time, with the station data
/// a locator needs.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PhasePick {
    pub channel: usize,
    pub name: String,
    pub component: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub code: i32,
    pub time: f64,
}

impl FsfFile {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }

    /// Read the whole stream, then decode it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        decode(&bytes)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mut file = decode(&bytes)?;
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Path the file was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn header(&self) -> &FsfHeader {
        &self.header
    }

    pub fn channels(&self) -> &[FsfChannel] {
        &self.channels
    }

    pub fn waveforms(&self) -> &[Waveform] {
        &self.waveforms
    }

    pub fn channel(&self, index: usize) -> Option<&FsfChannel> {
        self.channels.get(index)
    }

    pub fn waveform(&self, index: usize) -> Option<&Waveform> {
        self.waveforms.get(index)
    }

    /// Take the decoded parts apart.
    pub fn into_parts(self) -> (FsfHeader, Vec<FsfChannel>, Vec<Waveform>) {
        (self.header, self.channels, self.waveforms)
    }

    /// See [`query_marker`].
    pub fn marker_time(
        &self,
        channel: usize,
        code: i32,
        mode: TimeMode,
    ) -> Result<Option<MarkerTime>> {
        query_marker(&self.header, &self.channels, channel, code, mode)
    }

    /// Relative times of every requested marker code present on each channel,
    /// channels in file order and codes in the order given.
    pub fn phase_picks(&self, codes: &[i32]) -> Vec<PhasePick> {
        let mut picks = Vec::new();
        for (i, ch) in self.channels.iter().enumerate() {
            for &code in codes {
                if let Some((_, m)) = ch.find_marker(code) {
                    picks.push(PhasePick {
                        channel: i,
                        name: ch.name.clone(),
                        component: ch.component.clone(),
                        x: ch.x,
                        y: ch.y,
                        z: ch.z,
                        code,
                        time: m.time,
                    });
                }
            }
        }
        picks
    }

    /// Absolute time of every used marker on a channel, in slot order.
    pub fn channel_markers(&self, channel: usize) -> Result<Vec<(i32, MarkerTime)>> {
        let ch = self.channels.get(channel).ok_or(Error::ChannelOutOfRange {
            index: channel,
            count: self.channels.len(),
        })?;
        let mut out: Vec<(i32, MarkerTime)> = Vec::new();
        for (_, m) in ch.used_markers() {
            // a repeated code resolves to its first slot, like any other lookup
            if out.iter().any(|(c, _)| *c == m.code) {
                continue;
            }
            if let Some(t) = query_channel_marker(&self.header, ch, m.code, TimeMode::Absolute)? {
                out.push((m.code, t));
            }
        }
        Ok(out)
    }

    /// JSON document of the header and channel metadata, without samples.
    #[cfg(feature = "json")]
    pub fn summary(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| anyhow::anyhow!(e))
    }
}
