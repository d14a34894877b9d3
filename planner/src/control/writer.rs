use crate::control::document::ControlDocument;
use anyhow::Context;
use rostercore::telemetry::log::LogManager;
use std::fs;
use std::path::{Path, PathBuf};

/// Overwrites the simulation control file with a complete document on every write.
pub struct ControlWriter {
    path: PathBuf,
    logger: LogManager,
}

impl ControlWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: LogManager::new("control"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, document: &ControlDocument) -> anyhow::Result<()> {
        let bytes =
            serde_json::to_vec_pretty(document).context("serializing simulation control")?;
        fs::write(&self.path, bytes)
            .with_context(|| format!("writing control file {}", self.path.display()))?;
        self.logger.record(&format!(
            "{} at {}x, blue {} -> {}",
            if document.paused { "paused" } else { "running" },
            document.speed_multiplier,
            document.blue_task_mode,
            self.path.display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rostercore::TaskMode;
    use tempfile::tempdir;

    #[test]
    fn write_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let writer = ControlWriter::new(dir.path().join("simulation_control.json"));

        let first = ControlDocument::new(true, 0.5, TaskMode::Attack).unwrap();
        writer.write(&first).unwrap();
        let second = ControlDocument::new(false, 1.0, TaskMode::Defense).unwrap();
        writer.write(&second).unwrap();

        let text = fs::read_to_string(writer.path()).unwrap();
        let stored: ControlDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(stored, second);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let writer = ControlWriter::new("/definitely/not/here/control.json");
        let err = writer.write(&ControlDocument::default()).unwrap_err();
        assert!(err.to_string().contains("writing control file"));
    }
}
