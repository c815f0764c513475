//! Test-only FSF writer, used to build inputs and to check that decoded
//! fields carry everything needed to reproduce the original bytes.
#![allow(dead_code)]

use fsfio::{FsfChannel, FsfHeader, MARKER_SLOTS};

pub const PREAMBLE: &[u8; 13] = b"FSF-RECORDING";

pub struct ChannelSpec {
    pub name: &'static str,
    pub id: i32,
    pub component: &'static str,
    pub xyz: [f64; 3],
    pub calibration: f64,
    pub length: i32,
    pub datatype: &'static str,
    pub active: i32,
    pub gain_sens_damp: [f64; 3],
    pub sample_rate: i32,
    /// (slot, code, time)
    pub markers: Vec<(usize, i32, f64)>,
    pub geo: [f64; 3],
    /// Raw little-endian sample bytes.
    pub samples: Vec<u8>,
}

impl ChannelSpec {
    pub fn int32(name: &'static str, samples: &[i32]) -> Self {
        Self {
            name,
            id: 1,
            component: "Z",
            xyz: [1.0, 2.0, 3.0],
            calibration: 1.0,
            length: samples.len() as i32,
            datatype: "int32",
            active: 1,
            gain_sens_damp: [1.0, 1.0, 0.7],
            sample_rate: 100,
            markers: Vec::new(),
            geo: [0.0, 0.0, 0.0],
            samples: samples.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }
}

pub struct FileSpec {
    pub version: &'static str,
    pub filename: &'static str,
    pub channel_count: i32,
    pub xyz: [f64; 3],
    /// day, month, year, hour, minute, second, millisecond
    pub dtt: [i32; 7],
    pub geo: [f64; 3],
    pub channels: Vec<ChannelSpec>,
}

impl FileSpec {
    pub fn new(version: &'static str, channels: Vec<ChannelSpec>) -> Self {
        Self {
            version,
            filename: "test.fsf",
            channel_count: channels.len() as i32,
            xyz: [0.0, 0.0, 0.0],
            dtt: [5, 3, 2021, 10, 30, 15, 250],
            geo: [0.0, 0.0, 0.0],
            channels,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(PREAMBLE);
        out.extend_from_slice(self.version.as_bytes());
        put_str(&mut out, self.filename);
        out.extend_from_slice(&self.channel_count.to_le_bytes());
        put_f64s(&mut out, &self.xyz);
        for v in self.dtt {
            out.extend_from_slice(&v.to_le_bytes());
        }
        if self.version == "1.3" {
            put_f64s(&mut out, &self.geo);
        }
        for ch in &self.channels {
            put_str(&mut out, ch.name);
            out.extend_from_slice(&ch.id.to_le_bytes());
            put_str(&mut out, ch.component);
            put_f64s(&mut out, &ch.xyz);
            out.extend_from_slice(&ch.calibration.to_le_bytes());
            out.extend_from_slice(&ch.length.to_le_bytes());
            put_str(&mut out, ch.datatype);
            out.extend_from_slice(&ch.active.to_le_bytes());
            put_f64s(&mut out, &ch.gain_sens_damp);
            out.extend_from_slice(&ch.sample_rate.to_le_bytes());
            let mut types = [0i32; MARKER_SLOTS];
            let mut times = [0f64; MARKER_SLOTS];
            for &(k, code, time) in &ch.markers {
                types[k] = code;
                times[k] = time;
            }
            for t in types {
                out.extend_from_slice(&t.to_le_bytes());
            }
            put_f64s(&mut out, &times);
            if self.version == "1.3" {
                put_f64s(&mut out, &ch.geo);
            }
        }
        for ch in &self.channels {
            out.extend_from_slice(&ch.samples);
        }
        out
    }
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as i32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn put_f64s(out: &mut Vec<u8>, values: &[f64]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

/// Write the header and channel records back from decoded values.
pub fn encode_metadata(header: &FsfHeader, channels: &[FsfChannel]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(PREAMBLE);
    out.extend_from_slice(header.version.tag().as_bytes());
    put_str(&mut out, &header.filename);
    out.extend_from_slice(&(header.channel_count as i32).to_le_bytes());
    put_f64s(&mut out, &[header.x, header.y, header.z]);
    let t = &header.time;
    for v in [t.day, t.month, t.year, t.hour, t.minute, t.second, t.millisecond] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    if header.version.has_geographic() {
        put_f64s(&mut out, &[header.longitude, header.latitude, header.depth]);
    }
    for ch in channels {
        put_str(&mut out, &ch.name);
        out.extend_from_slice(&ch.id.to_le_bytes());
        put_str(&mut out, &ch.component);
        put_f64s(&mut out, &[ch.x, ch.y, ch.z, ch.calibration]);
        out.extend_from_slice(&(ch.length as i32).to_le_bytes());
        put_str(&mut out, &ch.datatype);
        out.extend_from_slice(&ch.active.to_le_bytes());
        put_f64s(&mut out, &[ch.gain, ch.sensitivity, ch.damping]);
        out.extend_from_slice(&ch.sample_rate.to_le_bytes());
        for t in ch.marker_types() {
            out.extend_from_slice(&t.to_le_bytes());
        }
        put_f64s(&mut out, &ch.marker_times());
        if header.version.has_geographic() {
            put_f64s(&mut out, &[ch.longitude, ch.latitude, ch.depth]);
        }
    }
    out
}
