mod common;

use common::Fixture;
use ndarray::s;
use noisy_float::prelude::*;
use std::sync::Arc;
use tch::Kind;
use textseg_data::{
    config::{BaseSize, Config, SizeSpec},
    dataset::{
        DatasetKind, FileDataset, GenericDataset, Mode, RandomAccessDataset, Sample,
        SegmentationDataset, SegmentationDatasetInit, Split, DEBUG_IMAGE_FILE, DEBUG_MASK_FILE,
    },
    processor::{ColorJitterConfig, ImageTransform, NormalizeInit},
};

fn text_seg_init(fixture: &Fixture, split: Split) -> SegmentationDatasetInit {
    SegmentationDatasetInit::new(fixture.dataset_dir(), split, DatasetKind::TextSeg)
}

#[test]
fn train_sample_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 64, 20);

    let dataset = text_seg_init(&fixture, Split::Train).build().unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.mode(), Mode::Train);
    assert_eq!(dataset.base_size(), BaseSize::new(128, 32));
    assert_eq!(dataset.classes(), ["background", "text"]);
    assert_eq!(dataset.num_class(), 2);
    assert_eq!(dataset.input_channels(), 3);

    let sample = dataset.get(0).unwrap().into_labeled().unwrap();
    let image = sample.image.as_array().unwrap();
    assert_eq!(image.dim(), (32, 128, 3));
    assert_eq!(sample.mask.size(), [32, 128]);
    assert_eq!(sample.mask.kind(), Kind::Int64);
    assert_eq!(sample.path, fixture.dataset_dir().join("image").join("a.png"));
    assert!(sample.skeleton.is_none());

    // nearest-neighbor resizing keeps the class values
    let classes = Vec::<i64>::from(sample.mask.view([-1i64]));
    assert!(classes.iter().all(|&class| class == 0 || class == 1));
    assert_eq!(sample.mask.int64_value(&[0, 0]), 1);
    assert_eq!(sample.mask.int64_value(&[0, 127]), 0);
}

#[test]
fn config_file_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 40, 10);
    fixture.add_pair("b.png", 40, 10);

    let text = format!(
        r#"{{
            root_path: "{}",
            dataset: {{
                kind: "text_seg",
                root: "data/st800k_crop",
                split: "train",
                mode: "val",
                base_size: 16,
            }},
            augmentation: {{ color_jitter: [0.1, 0.2, 0.3, 0.05] }},
        }}"#,
        fixture.root_path().display()
    );
    let config_file = fixture.root_path().join("textseg.json5");
    std::fs::write(&config_file, text).unwrap();

    let config = Config::open(&config_file).unwrap();
    let dataset = SegmentationDataset::from_config(&config).unwrap();
    assert_eq!(dataset.split(), Split::Train);
    assert_eq!(dataset.mode(), Mode::Val);
    assert_eq!(dataset.num_records(), 2);
    assert!(dataset.color_jitter().is_some());

    let sample = dataset.nth(1).unwrap().into_labeled().unwrap();
    assert_eq!(sample.image.as_array().unwrap().dim(), (16, 16, 3));
    assert_eq!(sample.mask.size(), [16, 16]);
}

#[test]
fn test_mode_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 50, 30);

    let dataset = text_seg_init(&fixture, Split::Test).build().unwrap();
    let sample = dataset.get(0).unwrap().into_test().unwrap();

    assert_eq!(sample.file_name, "a.png");
    assert_eq!(sample.image.as_array().unwrap().dim(), (30, 50, 3));
}

#[test]
fn testval_mode_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 50, 30);
    fixture.add_image("b.png", 50, 30);
    fixture.add_mask("b.png", 40, 30);

    let dataset = text_seg_init(&fixture, Split::TestVal).build().unwrap();

    let sample = dataset.get(0).unwrap().into_labeled().unwrap();
    assert_eq!(sample.image.as_array().unwrap().dim(), (30, 50, 3));
    assert_eq!(sample.mask.size(), [30, 50]);

    // without resizing, mismatched rasters are rejected
    assert!(dataset.get(1).is_err());
}

#[test]
fn unknown_mask_value_test() {
    let fixture = Fixture::new();
    fixture.add_image("a.png", 16, 16);
    fixture.add_mask_with_value("a.png", 16, 16, 7);

    let dataset = text_seg_init(&fixture, Split::Train).build().unwrap();
    let err = dataset.get(0).unwrap_err();
    assert!(format!("{:#}", err).contains("not in the known value set"));
}

#[test]
fn mask_16bit_test() {
    let fixture = Fixture::new();
    fixture.add_image("a.png", 16, 16);
    fixture.add_mask16("a.png", 16, 16, 1);
    fixture.add_image("b.png", 16, 16);
    fixture.add_mask16("b.png", 16, 16, 7);
    fixture.add_image("c.png", 16, 16);
    fixture.add_mask16("c.png", 16, 16, 300);

    let mut init = text_seg_init(&fixture, Split::TestVal);
    init.max_decode_retries = 0;
    let dataset = init.build().unwrap();

    // raw 16-bit values are kept, not rescaled to 8 bits
    let sample = dataset.get(0).unwrap().into_labeled().unwrap();
    assert_eq!(sample.mask.int64_value(&[0, 0]), 1);
    assert_eq!(sample.mask.int64_value(&[0, 15]), 0);

    let err = dataset.get(1).unwrap_err();
    assert!(format!("{:#}", err).contains("not in the known value set"));

    let err = dataset.get(2).unwrap_err();
    assert!(format!("{:#}", err).contains("out of the 8-bit range"));
}

#[test]
fn color_mask_test() {
    let fixture = Fixture::new();
    fixture.add_image("a.png", 16, 16);
    fixture.add_color_mask("a.png", 16, 16);

    let dataset = text_seg_init(&fixture, Split::Train).build().unwrap();
    let err = dataset.get(0).unwrap_err();
    assert!(format!("{:#}", err).contains("unsupported label color type"));
}

#[test]
fn unbounded_retry_limit_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 16, 16);
    fixture.add_pair("b.png", 16, 16);

    let mut init = text_seg_init(&fixture, Split::Train);
    init.max_decode_retries = usize::MAX;
    let dataset = init.build().unwrap();

    let sample = dataset.get(1).unwrap().into_labeled().unwrap();
    assert!(sample.path.ends_with("b.png"));
}

#[test]
fn missing_root_test() {
    let fixture = Fixture::new();
    let result = text_seg_init(&fixture, Split::Train).build();
    assert!(result.is_err());
}

#[test]
fn no_pairs_test() {
    let fixture = Fixture::new();
    fixture.add_image("a.png", 16, 16);
    fixture.add_mask("b.png", 16, 16);

    let err = text_seg_init(&fixture, Split::Train).build().unwrap_err();
    assert!(err.to_string().contains("found 0 images"));
}

#[test]
fn unmatched_files_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 16, 16);
    fixture.add_pair("b.png", 16, 16);
    fixture.add_image("c.png", 16, 16);
    fixture.add_mask("d.png", 16, 16);

    let dataset = text_seg_init(&fixture, Split::Train).build().unwrap();
    let names: Vec<_> = dataset
        .records()
        .iter()
        .map(|record| record.file_name())
        .collect();
    assert_eq!(names, ["a.png", "b.png"]);
}

#[test]
fn corrupt_image_retry_test() {
    let fixture = Fixture::new();
    fixture.add_corrupt_image("a.png");
    fixture.add_mask("a.png", 16, 16);
    fixture.add_pair("b.png", 16, 16);

    let dataset = text_seg_init(&fixture, Split::Train).build().unwrap();
    assert_eq!(dataset.len(), 2);

    // the next record is returned in place of the corrupt one
    let sample = dataset.get(0).unwrap().into_labeled().unwrap();
    assert!(sample.path.ends_with("b.png"));

    // the index is checked and retries never run past the end
    assert!(dataset.get(2).is_err());
}

#[test]
fn corrupt_tail_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 16, 16);
    for name in ["b.png", "c.png"] {
        fixture.add_corrupt_image(name);
        fixture.add_mask(name, 16, 16);
    }

    let mut init = text_seg_init(&fixture, Split::Train);
    init.max_decode_retries = 100;
    let dataset = init.build().unwrap();

    assert!(dataset.get(0).is_ok());
    assert!(dataset.get(1).is_err());
}

#[test]
fn verify_images_test() {
    let fixture = Fixture::new();
    fixture.add_corrupt_image("a.png");
    fixture.add_mask("a.png", 16, 16);
    fixture.add_pair("b.png", 16, 16);

    let mut init = text_seg_init(&fixture, Split::Train);
    init.verify_images = true;
    let dataset = init.build().unwrap();
    assert_eq!(dataset.len(), 1);
    assert!(dataset.records()[0].image.ends_with("b.png"));

    let fixture = Fixture::new();
    fixture.add_corrupt_image("a.png");
    fixture.add_mask("a.png", 16, 16);
    let mut init = text_seg_init(&fixture, Split::Train);
    init.verify_images = true;
    assert!(init.build().is_err());
}

#[test]
fn debug_dump_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 64, 16);
    let debug_dir = fixture.root_path().join("trash");

    let mut init = text_seg_init(&fixture, Split::Train);
    init.debug_dir = Some(debug_dir.clone());
    init.base_size = Some(SizeSpec::from(BaseSize::new(32, 8)));
    let dataset = init.build().unwrap();
    dataset.get(0).unwrap();

    let image = image::open(debug_dir.join(DEBUG_IMAGE_FILE))
        .unwrap()
        .to_rgb8();
    let mask = image::open(debug_dir.join(DEBUG_MASK_FILE))
        .unwrap()
        .to_luma8();
    assert_eq!(image.dimensions(), (32, 8));
    assert_eq!(mask.dimensions(), (32, 8));
    assert!(mask.pixels().all(|pixel| pixel.0[0] == 0 || pixel.0[0] == 255));
    assert_eq!(mask.get_pixel(0, 0).0[0], 255);
}

#[test]
fn post_transform_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 64, 16);

    let transform: Arc<dyn ImageTransform> = Arc::new(NormalizeInit::default().build().unwrap());
    let mut init = text_seg_init(&fixture, Split::Train);
    init.transform = Some(transform);
    let dataset = init.build().unwrap();

    let sample = dataset.get(0).unwrap();
    let image = sample.image().as_tensor().unwrap();
    assert_eq!(image.size(), [3, 32, 128]);
    assert_eq!(image.kind(), Kind::Float);
}

#[test]
fn invalid_color_jitter_test() {
    let fixture = Fixture::new();
    fixture.add_pair("a.png", 16, 16);

    let mut init = text_seg_init(&fixture, Split::Train);
    init.color_jitter = Some(ColorJitterConfig::List(vec![r64(0.1), r64(0.2)]));
    assert!(init.build().is_err());
}

fn total_text_fixture() -> Fixture {
    let fixture = Fixture::new();
    for (name, width) in [("narrow.png", 60), ("wide.png", 400)] {
        fixture.add_pair(name, width, 48);
        fixture.add_skeleton(name, width, 48);
    }
    // no skeleton, skipped
    fixture.add_pair("orphan.png", 60, 48);
    fixture
}

#[test]
fn total_text_val_test() {
    let fixture = total_text_fixture();
    let dataset = SegmentationDatasetInit::new(
        fixture.dataset_dir(),
        Split::Val,
        DatasetKind::TotalText,
    )
    .build()
    .unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.base_size(), BaseSize::new(128, 128));

    // 60x48 scales to 120x96 and is padded to 128 columns
    let narrow = dataset.get(0).unwrap().into_labeled().unwrap();
    assert!(narrow.path.ends_with("narrow.png"));
    let image = narrow.image.as_array().unwrap();
    assert_eq!(image.dim(), (96, 128, 3));
    assert!(image.slice(s![.., 120.., ..]).iter().all(|&value| value == 0));
    assert_eq!(narrow.mask.size(), [96, 128]);
    let skeleton = narrow.skeleton.unwrap();
    assert_eq!(skeleton.dim(), (96, 128));
    assert!(skeleton.slice(s![.., 120..]).iter().all(|&value| value == 0));

    // 400x48 scales to 800x96 and is truncated to 128 columns
    let wide = dataset.get(1).unwrap().into_labeled().unwrap();
    assert_eq!(wide.image.as_array().unwrap().dim(), (96, 128, 3));
    assert_eq!(wide.mask.size(), [96, 128]);
    assert_eq!(wide.skeleton.unwrap().dim(), (96, 128));
    assert_eq!(wide.mask.int64_value(&[0, 0]), 1);
}

#[test]
fn total_text_train_test() {
    let fixture = total_text_fixture();
    let mut init =
        SegmentationDatasetInit::new(fixture.dataset_dir(), Split::Train, DatasetKind::TotalText);
    init.base_size = Some(SizeSpec::Pair(vec![r64(64.0), r64(32.0)]));
    let dataset = init.build().unwrap();

    for index in 0..dataset.len() {
        let sample = match dataset.get(index).unwrap() {
            Sample::Labeled(sample) => sample,
            Sample::Test(_) => panic!("expect a labeled sample"),
        };
        assert_eq!(sample.image.as_array().unwrap().dim(), (32, 64, 3));
        assert_eq!(sample.mask.size(), [32, 64]);
        assert_eq!(sample.skeleton.unwrap().dim(), (32, 64));
    }
}
