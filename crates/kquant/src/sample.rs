use crate::point_set::PointSet;
use crate::InputImage;

/// Which color components become point coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channels {
    /// Three components per pixel; the alpha byte is dropped.
    Rgb,
    /// All four components, alpha included.
    Rgba,
}

impl Channels {
    pub fn dims(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }
}

/// One point per source pixel, in scan order.
pub fn sample(input: &InputImage, channels: Channels) -> PointSet {
    let buf = input.bytes();
    let dims = channels.dims();
    let mut data = Vec::with_capacity(buf.len() / 4 * dims);

    for pixel in buf.chunks_exact(4) {
        data.extend_from_slice(&pixel[..dims]);
    }

    PointSet::from_flat(data, dims)
}
