//! Synchronized geometric transforms on image, mask and skeleton rasters.

use crate::{common::*, config::BaseSize};

/// Resizes the color image with bilinear interpolation.
pub fn resize_image(image: &RgbImage, size: BaseSize) -> RgbImage {
    image::imageops::resize(
        image,
        size.width as u32,
        size.height as u32,
        FilterType::Triangle,
    )
}

/// Resizes a label raster with nearest-neighbor interpolation, so that no new
/// label values are invented.
pub fn resize_label(label: &GrayImage, size: BaseSize) -> GrayImage {
    image::imageops::resize(
        label,
        size.width as u32,
        size.height as u32,
        FilterType::Nearest,
    )
}

/// Computes the size that scales `(width, height)` to the given height while
/// keeping the aspect ratio.
pub fn scaled_size(width: u32, height: u32, target_height: usize) -> Result<BaseSize> {
    ensure!(
        width > 0 && height > 0,
        "cannot scale an empty raster of size {}x{}",
        width,
        height
    );
    let ratio = target_height as f64 / height as f64;
    let new_width = ((width as f64 * ratio) as usize).max(1);
    Ok(BaseSize::new(new_width, target_height))
}

/// Converts the color image to an H×W×3 array.
pub fn image_to_array(image: RgbImage) -> Result<Array3<u8>> {
    let (width, height) = image.dimensions();
    let array = Array3::from_shape_vec((height as usize, width as usize, 3), image.into_raw())?;
    Ok(array)
}

/// Converts the single channel raster to an H×W array.
pub fn label_to_array(label: GrayImage) -> Result<Array2<u8>> {
    let (width, height) = label.dimensions();
    let array = Array2::from_shape_vec((height as usize, width as usize), label.into_raw())?;
    Ok(array)
}

/// Forces the width of a raster to `width`.
///
/// A narrower raster is zero-padded on the right. A wider raster is truncated,
/// keeping the leftmost columns. The height is left unchanged. Rasters with a
/// third axis are clipped to 3 channels.
pub fn crop_pad_width<A, S, D>(raster: &ArrayBase<S, D>, width: usize) -> Result<Array<A, D>>
where
    A: Clone + Zero,
    S: Data<Elem = A>,
    D: Dimension,
{
    ensure!(
        (2..=3).contains(&raster.ndim()),
        "expect a 2 or 3 dimensional raster, but get {} dimensions",
        raster.ndim()
    );

    let mut raster = raster.view();
    if raster.ndim() == 3 {
        let channels = raster.len_of(Axis(2)).min(3);
        raster.slice_axis_inplace(Axis(2), Slice::from(..channels));
    }

    let copy_width = raster.len_of(Axis(1)).min(width);
    let mut out_dim = raster.raw_dim();
    out_dim[1] = width;

    let mut output = Array::zeros(out_dim);
    output
        .slice_axis_mut(Axis(1), Slice::from(..copy_width))
        .assign(&raster.slice_axis(Axis(1), Slice::from(..copy_width)));
    Ok(output)
}
