//! Binary frame codec: deflate-compressed dense `f32` payloads.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Result, StoreError};

/// Compress a frame's raw cell data.
pub fn encode_frame(data: &[f32]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytemuck::cast_slice(data))?;
    Ok(encoder.finish()?)
}

/// Decompress a frame payload, checking it holds exactly `cells` values.
pub fn decode_frame(bytes: &[u8], cells: usize) -> Result<Vec<f32>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut raw = Vec::with_capacity(cells * std::mem::size_of::<f32>());
    decoder.read_to_end(&mut raw)?;

    if raw.len() != cells * std::mem::size_of::<f32>() {
        return Err(StoreError::Codec(format!(
            "expected {} cells, payload decodes to {} bytes",
            cells,
            raw.len()
        )));
    }

    Ok(bytemuck::pod_collect_to_vec(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_values_and_sentinel() {
        let data = vec![1.5f32, -2.25, 0.0, f32::NAN, 1e30];
        let encoded = encode_frame(&data).unwrap();
        let decoded = decode_frame(&encoded, data.len()).unwrap();

        assert_eq!(decoded.len(), data.len());
        for (a, b) in data.iter().zip(&decoded) {
            if a.is_nan() {
                assert!(b.is_nan());
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_wrong_cell_count_is_a_codec_error() {
        let encoded = encode_frame(&[1.0, 2.0]).unwrap();
        assert!(matches!(
            decode_frame(&encoded, 3),
            Err(StoreError::Codec(_))
        ));
    }

    #[test]
    fn test_compression_shrinks_constant_frames() {
        let data = vec![0.5f32; 72 * 144];
        let encoded = encode_frame(&data).unwrap();
        assert!(encoded.len() < data.len() * 4 / 10);
    }
}
