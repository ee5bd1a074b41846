use std::fmt::{self, Display};
use std::fs::{File, remove_file};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::consts::FLAG_EXT;
use crate::errors::Result;

/// Status of a pipeline run, mirrored on disk as a flag file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Running,
    Completed,
    Failed,
    Aborted,
}

impl PipelineStatus {
    pub const ALL: [PipelineStatus; 4] = [
        PipelineStatus::Running,
        PipelineStatus::Completed,
        PipelineStatus::Failed,
        PipelineStatus::Aborted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Running => "running",
            PipelineStatus::Completed => "completed",
            PipelineStatus::Failed => "failed",
            PipelineStatus::Aborted => "aborted",
        }
    }

    /// Whether the run has reached an end state.
    pub fn is_final(&self) -> bool {
        !matches!(self, PipelineStatus::Running)
    }
}

impl Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path of the flag file for `status`.
pub fn flag_path(outfolder: &Path, name: &str, status: PipelineStatus) -> PathBuf {
    outfolder.join(format!("{}_{}{}", name, status.as_str(), FLAG_EXT))
}

///
/// Replace whatever flag is present with the flag for `status`.
///
/// # Arguments
/// - outfolder: pipeline output folder
/// - name: pipeline name
/// - status: status to record
///
pub fn set_flag(outfolder: &Path, name: &str, status: PipelineStatus) -> Result<PathBuf> {
    clear_flags(outfolder, name)?;
    let path = flag_path(outfolder, name, status);
    File::create(&path)?;
    Ok(path)
}

/// Remove every status flag of pipeline `name`.
pub fn clear_flags(outfolder: &Path, name: &str) -> Result<()> {
    for status in PipelineStatus::ALL {
        match remove_file(flag_path(outfolder, name, status)) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// The status currently recorded on disk, if any.
pub fn current_flag(outfolder: &Path, name: &str) -> Option<PipelineStatus> {
    PipelineStatus::ALL
        .into_iter()
        .find(|status| flag_path(outfolder, name, *status).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_flag_path() {
        let path = flag_path(Path::new("out"), "bed_maker", PipelineStatus::Completed);
        assert_eq!(path, PathBuf::from("out/bed_maker_completed.flag"));
    }

    #[rstest]
    fn test_set_flag_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();

        set_flag(dir.path(), "p", PipelineStatus::Running).unwrap();
        assert_eq!(current_flag(dir.path(), "p"), Some(PipelineStatus::Running));

        set_flag(dir.path(), "p", PipelineStatus::Failed).unwrap();
        assert_eq!(current_flag(dir.path(), "p"), Some(PipelineStatus::Failed));
        assert!(!flag_path(dir.path(), "p", PipelineStatus::Running).exists());
    }

    #[rstest]
    fn test_clear_flags_on_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        clear_flags(dir.path(), "p").unwrap();
        assert_eq!(current_flag(dir.path(), "p"), None);
    }
}
