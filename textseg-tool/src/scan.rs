use crate::common::*;
use textseg_data::{
    dataset::{RandomAccessDataset as _, Sample, SegmentationDataset},
    tensor::tensor_hw,
};

/// Loads every sample on blocking worker threads and reports failures.
pub async fn scan(dataset: Arc<SegmentationDataset>, jobs: Option<usize>) -> Result<()> {
    let jobs = jobs.unwrap_or_else(num_cpus::get);
    ensure!(jobs > 0, "jobs must be positive");
    let num_records = dataset.num_records();
    info!("scanning {} records with {} jobs", num_records, jobs);

    let failures: Vec<(usize, Error)> = stream::iter(0..num_records)
        .map(|index| {
            let dataset = dataset.clone();
            async move {
                let result = tokio::task::spawn_blocking(move || -> Result<()> {
                    let sample = dataset.nth(index)?;
                    check_sample(&sample)
                })
                .await
                .map_err(Error::from)
                .and_then(|result| result);
                (index, result)
            }
        })
        .buffer_unordered(jobs)
        .filter_map(|(index, result)| async move { result.err().map(|err| (index, err)) })
        .collect()
        .await;

    for (index, err) in &failures {
        error!("record {} failed: {:#}", index, err);
    }
    info!(
        "{} of {} records loaded",
        num_records - failures.len(),
        num_records
    );

    if !failures.is_empty() {
        bail!("{} records failed to load", failures.len());
    }
    Ok(())
}

fn check_sample(sample: &Sample) -> Result<()> {
    let sample = match sample {
        Sample::Labeled(sample) => sample,
        Sample::Test(_) => return Ok(()),
    };
    let mask_hw = match sample.mask.size().as_slice() {
        &[height, width] => (height as usize, width as usize),
        shape => bail!("expect a 2 dimensional mask, but get shape {:?}", shape),
    };
    if let Some(image) = sample.image.as_tensor() {
        let image_hw = tensor_hw(image)?;
        ensure!(
            image_hw == mask_hw,
            "image size {:?} does not match mask size {:?}",
            image_hw,
            mask_hw
        );
    }
    if let Some(image) = sample.image.as_array() {
        let (height, width, _) = image.dim();
        ensure!(
            (height, width) == mask_hw,
            "image size {:?} does not match mask size {:?}",
            (height, width),
            mask_hw
        );
    }
    if let Some(skeleton) = &sample.skeleton {
        ensure!(
            skeleton.dim() == mask_hw,
            "skeleton size {:?} does not match mask size {:?}",
            skeleton.dim(),
            mask_hw
        );
    }
    Ok(())
}
