use crate::common::*;
use textseg_data::{
    dataset::{array_to_gray, array_to_rgb, ImageOutput, Sample, SegmentationDataset},
    tensor::{to_unit_float, unit_float_to_array, ArrayIntoTensor as _},
};

/// Writes the image, the mask and the skeleton of one sample to `output_dir`.
pub fn inspect(
    dataset: &SegmentationDataset,
    index: usize,
    output_dir: &Path,
    jitter: bool,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let sample = dataset.get(index)?;
    let image = match sample.image() {
        ImageOutput::Array(image) => image.clone(),
        ImageOutput::Tensor(_) => {
            bail!("cannot write images of normalized samples, remove 'normalize' from the config")
        }
    };
    let image = if jitter {
        let color_jitter = dataset
            .color_jitter()
            .ok_or_else(|| format_err!("color jitter is not enabled in the config"))?;
        let input = to_unit_float(&image.f_into_tensor()?)?;
        unit_float_to_array(&color_jitter.forward(&input)?)?
    } else {
        image
    };

    let image_file = output_dir.join(format!("{}_image.png", index));
    array_to_rgb(&image)?.save(&image_file)?;
    info!("wrote '{}'", image_file.display());

    if let Sample::Labeled(sample) = sample {
        let classes: Vec<i64> = sample.mask.view([-1i64]).into();
        let (height, width, _) = image.dim();
        let mask = Array2::from_shape_vec(
            (height, width),
            classes.into_iter().map(|class| (class * 255) as u8).collect(),
        )?;
        let mask_file = output_dir.join(format!("{}_mask.png", index));
        array_to_gray(&mask)?.save(&mask_file)?;
        info!("wrote '{}'", mask_file.display());

        if let Some(skeleton) = &sample.skeleton {
            let skeleton_file = output_dir.join(format!("{}_skeleton.png", index));
            array_to_gray(skeleton)?.save(&skeleton_file)?;
            info!("wrote '{}'", skeleton_file.display());
        }

        info!("source '{}'", sample.path.display());
    }

    Ok(())
}
