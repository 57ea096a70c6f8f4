//! Pixel interpolation kernels used when resampling images.
//!
//! - **Nearest**: uses the nearest source pixel value (no interpolation)
//! - **Bilinear**: linear interpolation between the four surrounding pixels
//!
//! The kernels work on a single image stored as an `(H, W, C)` slice.

/// Interpolation mode for the resize operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InterpolationMode {
    /// Bilinear interpolation
    Bilinear,
    /// Nearest neighbor interpolation
    #[default]
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image data with shape (rows, cols, channels).
/// * `rows` - The number of rows of the image.
/// * `cols` - The number of columns of the image.
/// * `channels` - The number of channels of the image.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel value.
#[allow(clippy::too_many_arguments)]
pub fn interpolate_pixel(
    image: &[f32],
    rows: usize,
    cols: usize,
    channels: usize,
    u: f32,
    v: f32,
    c: usize,
    interpolation: InterpolationMode,
) -> f32 {
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, rows, cols, channels, u, v, c),
        InterpolationMode::Nearest => {
            nearest_neighbor_interpolation(image, rows, cols, channels, u, v, c)
        }
    }
}

fn nearest_neighbor_interpolation(
    image: &[f32],
    rows: usize,
    cols: usize,
    channels: usize,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let iu = (u.round().max(0.0) as usize).min(cols - 1);
    let iv = (v.round().max(0.0) as usize).min(rows - 1);

    image[(iv * cols + iu) * channels + c]
}

fn bilinear_interpolation(
    image: &[f32],
    rows: usize,
    cols: usize,
    channels: usize,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    // clamp to the image domain so border pixels are replicated
    let u = u.clamp(0.0, (cols - 1) as f32);
    let v = v.clamp(0.0, (rows - 1) as f32);

    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let p00 = image[(iv0 * cols + iu0) * channels + c];
    let p01 = image[(iv0 * cols + iu1) * channels + c];
    let p10 = image[(iv1 * cols + iu0) * channels + c];
    let p11 = image[(iv1 * cols + iu1) * channels + c];

    let w00 = (1.0 - frac_u) * (1.0 - frac_v);
    let w01 = frac_u * (1.0 - frac_v);
    let w10 = (1.0 - frac_u) * frac_v;
    let w11 = frac_u * frac_v;

    p00 * w00 + p01 * w01 + p10 * w10 + p11 * w11
}
