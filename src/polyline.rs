//! # Polyline Codec
//!
//! Decoding and encoding of the standard polyline route format.
//!
//! Each coordinate is scaled by 1e5, delta-encoded against the previous point,
//! zig-zag signed, split into 5-bit groups (lowest first) with `0x20` marking
//! continuation, and offset by 63 into printable ASCII. Latitude comes before
//! longitude for every point.
//!
//! ## Example
//!
//! ```rust
//! use ride_matcher::polyline;
//!
//! let points = polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
//! assert_eq!(points.len(), 3);
//! assert!((points[2].latitude - 43.252).abs() < 1e-9);
//!
//! assert_eq!(polyline::encode(&points), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
//! ```

use thiserror::Error;

use crate::GeoPoint;

const ASCII_OFFSET: i64 = 63;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;
const PRECISION: f64 = 1e5;

/// Errors produced while decoding a polyline string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid encoding: unexpected end of string at index {index}")]
    Truncated { index: usize },

    #[error("invalid encoding: byte {byte:#04x} out of range at index {index}")]
    InvalidByte { index: usize, byte: u8 },
}

/// Decode a polyline string into points, in encoding order.
///
/// Empty input decodes to an empty vector.
///
/// # Errors
///
/// * [`DecodeError::Truncated`] if the string ends in the middle of a value,
///   including a latitude with no longitude after it.
/// * [`DecodeError::InvalidByte`] if a byte falls outside the encodable range.
///
/// Groups beyond the 64th bit of a value are dropped, not rejected.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat = lat.wrapping_add(decode_value(bytes, &mut index)?);
        lng = lng.wrapping_add(decode_value(bytes, &mut index)?);

        points.push(GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

/// Read one zig-zag varint starting at `*index`, advancing past it.
fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let mut shift: u32 = 0;
    let mut result: i64 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(DecodeError::Truncated { index: *index });
        };
        let chunk = i64::from(byte) - ASCII_OFFSET;
        if !(-32..=95).contains(&chunk) {
            return Err(DecodeError::InvalidByte { index: *index, byte });
        }
        *index += 1;

        if let Some(bits) = (chunk & CHUNK_MASK).checked_shl(shift) {
            result |= bits;
        }
        shift = shift.saturating_add(5);

        if chunk < CONTINUATION_BIT {
            break;
        }
    }

    if result & 1 != 0 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

/// Encode points into a polyline string.
///
/// Coordinates are rounded to 1e-5 degrees, so `decode(&encode(p))` matches
/// `p` to five decimal places.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for p in points {
        let lat = (p.latitude * PRECISION).round() as i64;
        let lng = (p.longitude * PRECISION).round() as i64;

        encode_value(lat - prev_lat, &mut encoded);
        encode_value(lng - prev_lng, &mut encoded);

        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION_BIT {
        push_chunk((CONTINUATION_BIT | (value & CHUNK_MASK)) as u8, out);
        value >>= 5;
    }
    push_chunk(value as u8, out);
}

fn push_chunk(chunk: u8, out: &mut String) {
    out.push(char::from(chunk + ASCII_OFFSET as u8));
}
