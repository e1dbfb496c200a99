//! Encoded polyline codec.
//!
//! Coordinates are scaled by `10^precision`, delta-encoded against the
//! previous point, zig-zag sign-folded and written as little-endian 5-bit
//! chunks offset by 63 into printable ASCII. Bit `0x20` of a chunk marks a
//! continuation.

use crate::models::GeoPoint;
use thiserror::Error;

/// Precision used by OpenRouteService and Google encoded polylines.
pub const DEFAULT_PRECISION: u32 = 5;

const CHUNK_OFFSET: u8 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;
/// Seven chunks cover a 32-bit value; anything longer is garbage.
const MAX_SHIFT: u32 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("truncated chunk sequence at byte {offset}")]
    Truncated { offset: usize },

    #[error("invalid character {character:?} at byte {offset}")]
    InvalidCharacter { offset: usize, character: char },

    #[error("latitude without a matching longitude")]
    DanglingLatitude,

    #[error("coordinate value overflows at byte {offset}")]
    Overflow { offset: usize },
}

/// Decode a polyline at the default precision of 5 decimal digits.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

pub fn decode_with_precision(
    encoded: &str,
    precision: u32,
) -> Result<Vec<GeoPoint>, PolylineError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();

    let mut path = Vec::with_capacity(bytes.len() / 4);
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat += next_delta(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::DanglingLatitude);
        }
        lng += next_delta(bytes, &mut index)?;

        path.push(GeoPoint {
            lat: lat as f64 / factor,
            lng: lng as f64 / factor,
        });
    }

    Ok(path)
}

/// Read one sign-folded varint starting at `index`, advancing past it.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let offset = *index;
        let byte = *bytes
            .get(offset)
            .ok_or(PolylineError::Truncated { offset })?;
        if !(CHUNK_OFFSET..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                offset,
                character: byte as char,
            });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { offset });
        }

        let chunk = i64::from(byte - CHUNK_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        *index += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode points at the default precision of 5 decimal digits.
pub fn encode(points: &[GeoPoint]) -> String {
    encode_with_precision(points, DEFAULT_PRECISION)
}

pub fn encode_with_precision(points: &[GeoPoint], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * factor).round() as i64;
        let lng = (point.lng * factor).round() as i64;
        push_delta(lat - prev_lat, &mut encoded);
        push_delta(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn push_delta(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= CONTINUATION_BIT {
        out.push(char::from(
            ((CONTINUATION_BIT | (value & CHUNK_MASK)) as u8) + CHUNK_OFFSET,
        ));
        value >>= 5;
    }
    out.push(char::from(value as u8 + CHUNK_OFFSET));
}
