use std::path::{Path, PathBuf};

use crate::consts::BED_EXT;
use crate::errors::{BedmakerError, Result};

///
/// Swap the file extension for `.bed` and move the file into the output folder.
///
/// Only the last extension is stripped, so `sample.final.bw` becomes `sample.final.bed`.
/// Nothing is touched on disk; the output folder does not need to exist.
///
/// # Arguments
/// - input_path: path to the file to be converted
/// - output_dir: folder to place the converted file in
///
/// # Returns
/// - `<output_dir>/<stem>.bed`
///
pub fn derive_target(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| BedmakerError::InvalidInputPath(input_path.display().to_string()))?;

    let mut file_name = stem.to_os_string();
    file_name.push(BED_EXT);

    Ok(output_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/data/sample1.bedgraph", "out/", "out/sample1.bed")]
    #[case("/data/sample1.bw", "output", "output/sample1.bed")]
    #[case("sample.final.bw", "output", "output/sample.final.bed")]
    #[case("relative/dir/track.bigBed", "/abs/out", "/abs/out/track.bed")]
    #[case("reads", "out", "out/reads.bed")]
    #[case("/data/.bw", "out", "out/.bw.bed")]
    #[case("/data/peaks.bed", "out", "out/peaks.bed")]
    fn test_derive_target(#[case] input: &str, #[case] outdir: &str, #[case] expected: &str) {
        let target = derive_target(Path::new(input), Path::new(outdir)).unwrap();
        assert_eq!(target, PathBuf::from(expected));
    }

    #[rstest]
    fn test_derive_target_is_deterministic() {
        let input = Path::new("/data/sample1.bw");
        let outdir = Path::new("out");
        let first = derive_target(input, outdir).unwrap();
        let second = derive_target(input, outdir).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("..")]
    fn test_derive_target_without_file_name(#[case] input: &str) {
        let result = derive_target(Path::new(input), Path::new("out"));
        assert!(matches!(result, Err(BedmakerError::InvalidInputPath(_))));
    }
}
