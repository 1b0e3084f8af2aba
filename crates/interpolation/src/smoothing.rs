//! Sentinel-preserving kernel smoothing.
//!
//! An optional post-pass over an interpolated frame that knocks down
//! speckle noise with a moving average. It runs strictly after the
//! weighted interpolation and never fills a sentinel cell: smoothing is
//! not allowed to extrapolate into regions the interpolation left empty.

/// Smooth a row-major grid with an NaN-aware square moving average.
///
/// Cells holding the sentinel stay sentinel; valued cells take the mean
/// of the valued cells in the `window` x `window` neighborhood around
/// them. Columns wrap across the antimeridian when `wrap` is set.
pub fn smooth_frame(data: &[f32], rows: usize, cols: usize, window: usize, wrap: bool) -> Vec<f32> {
    let half = (window / 2) as isize;
    let mut output = vec![f32::NAN; data.len()];

    for row in 0..rows {
        for col in 0..cols {
            let flat = row * cols + col;
            if data[flat].is_nan() {
                continue;
            }

            let mut sum = 0.0f64;
            let mut count = 0usize;

            for dr in -half..=half {
                let cand_row = row as isize + dr;
                if cand_row < 0 || cand_row >= rows as isize {
                    continue;
                }
                for dc in -half..=half {
                    let cand_col = if wrap {
                        (col as isize + dc).rem_euclid(cols as isize)
                    } else {
                        let c = col as isize + dc;
                        if c < 0 || c >= cols as isize {
                            continue;
                        }
                        c
                    };

                    let v = data[cand_row as usize * cols + cand_col as usize];
                    if !v.is_nan() {
                        sum += v as f64;
                        count += 1;
                    }
                }
            }

            // count >= 1: the center cell itself is valued
            output[flat] = (sum / count as f64) as f32;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_field_is_unchanged() {
        let data = vec![4.0f32; 12];
        let smoothed = smooth_frame(&data, 3, 4, 3, false);
        for v in smoothed {
            assert!((v - 4.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sentinel_cells_stay_sentinel() {
        let mut data = vec![1.0f32; 9];
        data[4] = f32::NAN;
        let smoothed = smooth_frame(&data, 3, 3, 3, false);

        assert!(smoothed[4].is_nan());
        // Neighbors keep values, computed over the valued cells only
        assert!((smoothed[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_outlier_is_damped() {
        let mut data = vec![0.0f32; 9];
        data[4] = 9.0;
        let smoothed = smooth_frame(&data, 3, 3, 3, false);

        // Center pulled toward the neighborhood mean
        assert!((smoothed[4] - 1.0).abs() < 1e-6);
        assert!(smoothed[4] < 9.0);
    }

    #[test]
    fn test_wrap_includes_far_column() {
        // 1x4 ring: wrapping window around col 0 sees col 3
        let data = vec![0.0f32, f32::NAN, f32::NAN, 6.0];
        let smoothed = smooth_frame(&data, 1, 4, 3, true);
        assert!((smoothed[0] - 3.0).abs() < 1e-6);

        let unwrapped = smooth_frame(&data, 1, 4, 3, false);
        assert!((unwrapped[0] - 0.0).abs() < 1e-6);
    }
}
