use crate::common::*;
use prettytable::{cell, row, Table};
use textseg_data::{
    config::Config,
    dataset::{FileDataset as _, GenericDataset as _, SegmentationDataset},
};

pub fn info(dataset: &SegmentationDataset, config: &Config) -> Result<()> {
    let mut table = Table::new();
    table.add_row(row!["key", "value"]);
    table.add_row(row!["root", dataset.root().display()]);
    table.add_row(row!["kind", dataset.kind()]);
    table.add_row(row!["split", dataset.split()]);
    table.add_row(row!["mode", dataset.mode()]);
    table.add_row(row!["base size", dataset.base_size()]);
    table.add_row(row!["records", dataset.len()]);
    table.add_row(row!["input channels", dataset.input_channels()]);
    table.add_row(row!["classes", dataset.classes().join(", ")]);
    table.add_row(row![
        "color jitter",
        format!("{:?}", config.augmentation.color_jitter)
    ]);
    table.add_row(row![
        "normalize",
        config
            .normalize
            .as_ref()
            .map(|normalize| format!("mean {:?}, std {:?}", normalize.mean, normalize.std))
            .unwrap_or_else(|| "disabled".to_string())
    ]);
    table.printstd();

    if let Some(record) = dataset.records().first() {
        info!("first record '{}'", record.image.display());
    }

    Ok(())
}
