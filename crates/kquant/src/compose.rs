use rgb::RGBA8;

/// One centroid as an output pixel. 3-component centroids are padded with
/// a fully opaque alpha.
pub fn to_rgba(centroid: &[u8]) -> RGBA8 {
    RGBA8 {
        r: centroid[0],
        g: centroid[1],
        b: centroid[2],
        a: centroid.get(3).copied().unwrap_or(u8::MAX),
    }
}

/// Rebuild the pixel sequence from a clustering result, one pixel per
/// assignment in scan order.
pub fn compose(centroids: &[Vec<u8>], assignments: &[usize]) -> Vec<RGBA8> {
    assert!(centroids.iter().all(|c| c.len() == 3 || c.len() == 4));

    assignments.iter().map(|&a| to_rgba(&centroids[a])).collect()
}
