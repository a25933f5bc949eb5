use super::*;
use crate::common::*;

pub const IMAGE_DIR: &str = "image";
pub const MASK_DIR: &str = "mask";
pub const SKELETON_DIR: &str = "skeleton";

/// Lists `<root>/image` and pairs every image with the equally named file in
/// `<root>/mask`, and in `<root>/skeleton` if `with_skeleton` is set.
///
/// Entries that miss any counterpart are skipped. The records are sorted by
/// image path.
pub fn discover_records(root: impl AsRef<Path>, with_skeleton: bool) -> Result<Vec<FileRecord>> {
    let root = root.as_ref();
    let image_dir = root.join(IMAGE_DIR);
    let mask_dir = root.join(MASK_DIR);
    let skeleton_dir = with_skeleton.then(|| root.join(SKELETON_DIR));

    let mut image_names: Vec<_> = fs::read_dir(&image_dir)
        .with_context(|| format!("failed to list directory '{}'", image_dir.display()))?
        .map(|entry| Fallible::Ok(entry?.file_name()))
        .try_collect()?;
    image_names.sort();

    let records: Vec<_> = image_names
        .into_iter()
        .filter_map(|name| {
            let image = image_dir.join(&name);
            let mask = mask_dir.join(&name);
            let skeleton = skeleton_dir.as_ref().map(|dir| dir.join(&name));

            let missing = missing_files([Some(&image), Some(&mask), skeleton.as_ref()]);
            if !missing.is_empty() {
                warn!(
                    "skip '{}', cannot find {}",
                    image.display(),
                    missing
                        .iter()
                        .map(|path| format!("'{}'", path.display()))
                        .join(", ")
                );
                return None;
            }

            Some(FileRecord {
                image,
                mask,
                skeleton,
            })
        })
        .collect();

    info!(
        "found {} images in the folder '{}'",
        records.len(),
        image_dir.display()
    );
    Ok(records)
}

/// The paths among `paths` that are not regular files.
fn missing_files<'a>(paths: impl IntoIterator<Item = Option<&'a PathBuf>>) -> Vec<&'a Path> {
    paths
        .into_iter()
        .flatten()
        .map(PathBuf::as_path)
        .filter(|path| !path.is_file())
        .collect()
}

/// Drops records whose image header cannot be parsed.
pub fn filter_readable(records: Vec<FileRecord>) -> Vec<FileRecord> {
    records
        .into_iter()
        .filter(|record| match imagesize::size(&record.image) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    "ignore unreadable image '{}': {:?}",
                    record.image.display(),
                    err
                );
                false
            }
        })
        .collect()
}
