use anyhow::{ensure, Result};
use image::GrayImage;

/// Converts an image frame into a fixed-size numeric descriptor.
///
/// Stand-in for a pretrained feature-extraction model: the classifier only
/// sees descriptors, so the extractor behind this trait is swappable.
pub trait FeatureExtractor: Send + Sync {
    /// Number of features in every descriptor this extractor produces
    fn feature_len(&self) -> usize;

    /// Reduce one frame to a descriptor of exactly `feature_len` values
    fn extract(&self, frame: &GrayImage) -> Vec<f32>;
}

/// Tile-mean feature extractor.
///
/// Divides the frame into `cols x rows` tiles and takes the mean intensity of
/// each tile, normalized to [0, 1]. Coarse, but positional: a subject moving
/// left or right in front of the camera shifts mass between tile columns,
/// which is exactly what the position classifier needs.
pub struct PoolingExtractor {
    cols: u32,
    rows: u32,
}

impl PoolingExtractor {
    pub fn new(cols: u32, rows: u32) -> Result<Self> {
        ensure!(cols > 0 && rows > 0, "pooling grid must be at least 1x1");
        Ok(Self { cols, rows })
    }
}

impl Default for PoolingExtractor {
    /// 16x12 tiles, matching the 4:3 aspect of the reference capture
    fn default() -> Self {
        Self { cols: 16, rows: 12 }
    }
}

impl FeatureExtractor for PoolingExtractor {
    fn feature_len(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    fn extract(&self, frame: &GrayImage) -> Vec<f32> {
        let (width, height) = frame.dimensions();
        let mut features = Vec::with_capacity(self.feature_len());

        for tile_y in 0..self.rows {
            let y0 = tile_y * height / self.rows;
            let y1 = (tile_y + 1) * height / self.rows;

            for tile_x in 0..self.cols {
                let x0 = tile_x * width / self.cols;
                let x1 = (tile_x + 1) * width / self.cols;

                let mut sum = 0u64;
                let mut count = 0u64;
                for y in y0..y1 {
                    for x in x0..x1 {
                        sum += u64::from(frame.get_pixel(x, y).0[0]);
                        count += 1;
                    }
                }

                // A frame smaller than the tile grid yields empty tiles
                let mean = if count > 0 {
                    sum as f32 / count as f32 / 255.0
                } else {
                    0.0
                };
                features.push(mean);
            }
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_descriptor_length() {
        let extractor = PoolingExtractor::new(4, 3).unwrap();
        let frame = GrayImage::new(64, 48);
        assert_eq!(extractor.feature_len(), 12);
        assert_eq!(extractor.extract(&frame).len(), 12);
    }

    #[test]
    fn test_default_matches_reference_aspect() {
        let extractor = PoolingExtractor::default();
        assert_eq!(extractor.feature_len(), 192);
    }

    #[test]
    fn test_uniform_frame_gives_constant_descriptor() {
        let extractor = PoolingExtractor::new(4, 4).unwrap();
        let frame = GrayImage::from_pixel(32, 32, Luma([255]));

        let features = extractor.extract(&frame);
        assert!(features.iter().all(|&f| (f - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_half_bright_frame() {
        let extractor = PoolingExtractor::new(2, 2).unwrap();
        // Left half black, right half white
        let frame = GrayImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let features = extractor.extract(&frame);
        assert_eq!(features.len(), 4);
        assert!(features[0].abs() < 1e-6); // top-left
        assert!((features[1] - 1.0).abs() < 1e-6); // top-right
        assert!(features[2].abs() < 1e-6); // bottom-left
        assert!((features[3] - 1.0).abs() < 1e-6); // bottom-right
    }

    #[test]
    fn test_rejects_zero_tiles() {
        assert!(PoolingExtractor::new(0, 4).is_err());
        assert!(PoolingExtractor::new(4, 0).is_err());
    }

    #[test]
    fn test_frame_smaller_than_grid() {
        let extractor = PoolingExtractor::new(8, 8).unwrap();
        let frame = GrayImage::from_pixel(2, 2, Luma([100]));

        // Must not panic; empty tiles read as zero
        let features = extractor.extract(&frame);
        assert_eq!(features.len(), 64);
    }
}
