pub mod compose;
pub mod kmeans;
pub mod point_set;
pub mod rng;
pub mod sample;

pub use kmeans::{Clustering, KMeans, DEFAULT_MAX_ITERATIONS};
pub use point_set::PointSet;
pub use rgb::RGBA8;

use rand::Rng;
use sample::Channels;
use snafu::prelude::*;
#[cfg(feature = "image")]
use std::ops::Deref;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("image size must be positive"))]
    ZeroImageSize,

    #[snafu(display("image size ({width}x{height}) doesn't match the buffer size ({buf_size})"))]
    ImageSizeMismatch {
        width: u32,
        height: u32,
        buf_size: usize,
    },

    #[snafu(display("point set is empty"))]
    EmptyPointSet,

    #[snafu(display("point dimensionality must be at least 1"))]
    ZeroDimensions,

    #[snafu(display("buffer length {len} is not a multiple of the {dims}-component point size"))]
    RaggedPointSet { len: usize, dims: usize },

    #[snafu(display("cluster count must be at least 1"))]
    ZeroClusters,
}

/// A structure used as a façade for the image bytes.
///
/// The byte layout is assumed to be RGBARGBA…, one 4-byte pixel per image
/// position in scan order.
#[derive(Debug, Copy, Clone)]
pub struct InputImage<'a> {
    width: u32,
    height: u32,
    buf: &'a [u8],
}

impl InputImage<'_> {
    pub fn from_bytes(width: u32, height: u32, buf: &[u8]) -> Result<InputImage<'_>, Error> {
        ensure!(width > 0 && height > 0, ZeroImageSizeSnafu);
        ensure!(
            buf.len() == (width as usize) * (height as usize) * 4,
            ImageSizeMismatchSnafu {
                width,
                height,
                buf_size: buf.len()
            }
        );

        Ok(InputImage { width, height, buf })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        self.buf
    }
}

#[cfg(feature = "image")]
impl<'a, Container> TryFrom<&'a image::ImageBuffer<image::Rgba<u8>, Container>> for InputImage<'a>
where
    Container: Deref<Target = [<image::Rgba<u8> as image::Pixel>::Subpixel]> + 'a,
{
    type Error = Error;

    fn try_from(
        img: &'a image::ImageBuffer<image::Rgba<u8>, Container>,
    ) -> Result<Self, Self::Error> {
        Self::from_bytes(img.width(), img.height(), img.as_raw().deref())
    }
}

/// An image reduced to a small palette: the palette itself plus one palette
/// color per input pixel, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<RGBA8>,
    pub pixels: Vec<RGBA8>,
}

/// Reduce an image to at most `k` representative colors.
///
/// ```
/// let input = kquant::InputImage::from_bytes(2, 1, &[
///     255, 0, 0, 255, //
///     0, 0, 255, 255,
/// ]).unwrap();
///
/// let quantized = kquant::quantize(input, 2).unwrap();
///
/// assert_eq!(quantized.palette.len(), 2);
/// assert_eq!(quantized.pixels[0], kquant::RGBA8 { r: 255, g: 0, b: 0, a: 255 });
/// ```
///
/// Clustering runs on the RGB components; the alpha byte is dropped on the
/// way in and forced to fully opaque on the way out. The palette may come
/// back smaller than `k`: clusters that lose all their points mid-run are
/// dropped rather than reseeded.
///
/// Uses the crate's fixed-seed generator, so equal inputs produce equal
/// outputs. See [`quantize_with_rng`] to supply your own randomness.
pub fn quantize(input: InputImage, k: usize) -> Result<QuantizedImage, Error> {
    quantize_with_rng(&mut rng::new(), input, k)
}

pub fn quantize_with_rng(
    rng: &mut impl Rng,
    input: InputImage,
    k: usize,
) -> Result<QuantizedImage, Error> {
    let points = sample::sample(&input, Channels::Rgb);
    let mut engine = KMeans::new(points, k)?;
    let clustering = engine.run(rng, DEFAULT_MAX_ITERATIONS);

    let palette = clustering
        .centroids
        .iter()
        .map(|c| compose::to_rgba(c))
        .collect();
    let pixels = compose::compose(&clustering.centroids, &clustering.assignments);

    Ok(QuantizedImage {
        width: input.width,
        height: input.height,
        palette,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn rejects_zero_size() {
        let result = InputImage::from_bytes(0, 1, &[]);
        assert!(result.unwrap_err().to_string().contains("positive"));
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let result = InputImage::from_bytes(2, 2, &RED);
        assert!(result.unwrap_err().to_string().contains("doesn't match"));
    }

    #[test]
    fn rejects_zero_clusters() {
        let input = InputImage::from_bytes(1, 1, &RED).unwrap();
        let result = quantize(input, 0);
        assert!(result.unwrap_err().to_string().contains("at least 1"));
    }

    #[test]
    fn two_color_image_is_reproduced_exactly() {
        let buf: Vec<u8> = [RED, BLUE].concat();
        let input = InputImage::from_bytes(2, 1, &buf).unwrap();
        let quantized = quantize(input, 2).unwrap();

        assert_eq!(quantized.palette.len(), 2);
        assert_eq!(
            quantized.pixels,
            vec![
                RGBA8 {
                    r: 255,
                    g: 0,
                    b: 0,
                    a: 255
                },
                RGBA8 {
                    r: 0,
                    g: 0,
                    b: 255,
                    a: 255
                },
            ]
        );
    }

    #[test]
    fn uniform_image_collapses_to_one_color() {
        let buf: Vec<u8> = [RED; 6].concat();
        let input = InputImage::from_bytes(3, 2, &buf).unwrap();
        let quantized = quantize(input, 4).unwrap();

        assert_eq!(
            quantized.palette,
            vec![RGBA8 {
                r: 255,
                g: 0,
                b: 0,
                a: 255
            }]
        );
        assert!(quantized.pixels.iter().all(|p| *p == quantized.palette[0]));
    }

    #[test]
    fn deterministic() {
        let buf: Vec<u8> = [RED, BLUE, RED, BLUE].concat();
        let input = InputImage::from_bytes(2, 2, &buf).unwrap();
        let a = quantize(input, 2).unwrap();
        let b = quantize(input, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn palette_never_exceeds_requested_colors() {
        let buf: Vec<u8> = (0..16u8).flat_map(|i| [i * 16, 0, 0, 255]).collect();
        let input = InputImage::from_bytes(4, 4, &buf).unwrap();
        let quantized = quantize(input, 5).unwrap();

        assert!(!quantized.palette.is_empty());
        assert!(quantized.palette.len() <= 5);
        assert_eq!(quantized.pixels.len(), 16);
    }

    #[test]
    fn transparent_input_comes_out_opaque() {
        let buf = [10, 20, 30, 0, 40, 50, 60, 128];
        let input = InputImage::from_bytes(2, 1, &buf).unwrap();
        let quantized = quantize(input, 2).unwrap();
        assert!(quantized.pixels.iter().all(|p| p.a == 255));
    }
}
