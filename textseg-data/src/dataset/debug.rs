use crate::common::*;

pub const DEBUG_IMAGE_FILE: &str = "img.png";
pub const DEBUG_MASK_FILE: &str = "mask.png";

/// Writes the transformed image and the class index mask scaled by 255 to
/// `dir` for visual inspection.
pub fn dump_sample(dir: &Path, image: &Array3<u8>, classes: &Array2<i64>) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory '{}'", dir.display()))?;

    let image_file = dir.join(DEBUG_IMAGE_FILE);
    array_to_rgb(image)?
        .save(&image_file)
        .with_context(|| format!("failed to write '{}'", image_file.display()))?;

    let mask_file = dir.join(DEBUG_MASK_FILE);
    let mask = classes.mapv(|class| (class * 255).clamp(0, 255) as u8);
    array_to_gray(&mask)?
        .save(&mask_file)
        .with_context(|| format!("failed to write '{}'", mask_file.display()))?;

    debug!("wrote debug sample to '{}'", dir.display());
    Ok(())
}

pub fn array_to_rgb(array: &Array3<u8>) -> Result<RgbImage> {
    let (height, width, channels) = array.dim();
    ensure!(
        channels == 3,
        "expect 3 channels, but get {}",
        channels
    );
    let raw = array.iter().cloned().collect();
    RgbImage::from_raw(width as u32, height as u32, raw)
        .ok_or_else(|| format_err!("the buffer does not fit the image size {}x{}", width, height))
}

pub fn array_to_gray(array: &Array2<u8>) -> Result<GrayImage> {
    let (height, width) = array.dim();
    let raw = array.iter().cloned().collect();
    GrayImage::from_raw(width as u32, height as u32, raw)
        .ok_or_else(|| format_err!("the buffer does not fit the image size {}x{}", width, height))
}
