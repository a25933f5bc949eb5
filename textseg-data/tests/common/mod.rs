use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

pub const DATASET_DIR: &str = "data/st800k_crop";

/// A dataset synthesized in a temporary directory.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// The configured root path.
    pub fn root_path(&self) -> &Path {
        self.dir.path()
    }

    /// The dataset directory under the root path.
    pub fn dataset_dir(&self) -> PathBuf {
        self.dir.path().join(DATASET_DIR)
    }

    /// Writes a `width`×`height` image with a text stroke in the left half.
    pub fn add_image(&self, name: &str, width: u32, height: u32) {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        self.save_rgb("image", name, &image);
    }

    /// Writes a mask whose left half is text.
    pub fn add_mask(&self, name: &str, width: u32, height: u32) {
        let mask = GrayImage::from_fn(width, height, |x, _| Luma([(x < width / 2) as u8]));
        self.save_gray("mask", name, &mask);
    }

    pub fn add_mask_with_value(&self, name: &str, width: u32, height: u32, value: u8) {
        let mask = GrayImage::from_pixel(width, height, Luma([value]));
        self.save_gray("mask", name, &mask);
    }

    /// Writes a 16-bit grayscale mask whose left half has `value`.
    pub fn add_mask16(&self, name: &str, width: u32, height: u32, value: u16) {
        let mask: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_fn(width, height, |x, _| Luma([if x < width / 2 { value } else { 0 }]));
        let path = self.dataset_dir().join("mask").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        mask.save(path).unwrap();
    }

    /// Writes an RGB image in place of a mask.
    pub fn add_color_mask(&self, name: &str, width: u32, height: u32) {
        let mask = RgbImage::from_pixel(width, height, Rgb([0, 1, 0]));
        self.save_rgb("mask", name, &mask);
    }

    pub fn add_skeleton(&self, name: &str, width: u32, height: u32) {
        let skeleton = GrayImage::from_fn(width, height, |_, y| {
            Luma([if y == height / 2 { 255 } else { 0 }])
        });
        self.save_gray("skeleton", name, &skeleton);
    }

    pub fn add_pair(&self, name: &str, width: u32, height: u32) {
        self.add_image(name, width, height);
        self.add_mask(name, width, height);
    }

    /// Writes bytes that are not a decodable image.
    pub fn add_corrupt_image(&self, name: &str) {
        let path = self.dataset_dir().join("image").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"not an image").unwrap();
    }

    fn save_rgb(&self, folder: &str, name: &str, image: &RgbImage) {
        let path = self.dataset_dir().join(folder).join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        image.save(path).unwrap();
    }

    fn save_gray(&self, folder: &str, name: &str, image: &GrayImage) {
        let path = self.dataset_dir().join(folder).join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        image.save(path).unwrap();
    }
}
