use anyhow::{ensure, Context, Result};
use image::GrayImage;
use std::path::{Path, PathBuf};

/// A continuous source of video frames.
///
/// Live camera capture is an external collaborator; the built-in source
/// replays image files, which is enough to drive the classifier pipeline and
/// the tests.
pub trait FrameSource: Send {
    /// Grab the next frame
    fn next_frame(&mut self) -> Result<GrayImage>;
}

/// Mirror a frame horizontally.
///
/// Applied to every frame before feature extraction, so the displayed motion
/// matches the player's own left and right.
pub fn mirror(frame: &GrayImage) -> GrayImage {
    image::imageops::flip_horizontal(frame)
}

/// List the image files of a directory, sorted by file name
pub fn image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read frame directory {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();

    Ok(files)
}

/// Frame source that cycles through the image files of a directory
pub struct DirectoryFrameSource {
    frames: Vec<PathBuf>,
    cursor: usize,
}

impl DirectoryFrameSource {
    pub fn open(dir: &Path) -> Result<Self> {
        let frames = image_files(dir)?;
        ensure!(
            !frames.is_empty(),
            "no image files in frame directory {}",
            dir.display()
        );

        Ok(Self { frames, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for DirectoryFrameSource {
    fn next_frame(&mut self) -> Result<GrayImage> {
        let path = &self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();

        let frame = image::open(path)
            .with_context(|| format!("failed to load frame {}", path.display()))?
            .to_luma8();
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use tempfile::TempDir;

    fn write_frame(dir: &Path, name: &str, value: u8) {
        let frame = GrayImage::from_pixel(8, 8, Luma([value]));
        frame.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_mirror_swaps_left_and_right() {
        let frame = GrayImage::from_fn(4, 2, |x, _| if x < 2 { Luma([0]) } else { Luma([255]) });

        let mirrored = mirror(&frame);
        assert_eq!(mirrored.get_pixel(0, 0).0[0], 255);
        assert_eq!(mirrored.get_pixel(3, 0).0[0], 0);
    }

    #[test]
    fn test_directory_source_cycles_in_name_order() {
        let dir = TempDir::new().unwrap();
        write_frame(dir.path(), "b.png", 20);
        write_frame(dir.path(), "a.png", 10);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

        let mut source = DirectoryFrameSource::open(dir.path()).unwrap();
        assert_eq!(source.len(), 2);

        assert_eq!(source.next_frame().unwrap().get_pixel(0, 0).0[0], 10);
        assert_eq!(source.next_frame().unwrap().get_pixel(0, 0).0[0], 20);
        // Wraps around
        assert_eq!(source.next_frame().unwrap().get_pixel(0, 0).0[0], 10);
    }

    #[test]
    fn test_empty_directory_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(DirectoryFrameSource::open(dir.path()).is_err());
    }
}
