use crate::codec::{self, Format};
use crate::model::SituationDocument;
use crate::prelude::{CoreError, CoreResult};
use crate::telemetry::log::LogManager;
use std::fs;
use std::path::{Path, PathBuf};

/// File access for situation documents, rooted at a caller-supplied directory.
///
/// Relative paths resolve against `root`; absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct SituationStore {
    root: PathBuf,
    logger: LogManager,
}

impl SituationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logger: LogManager::new("codec"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Overwrites the destination with the whole document.
    pub fn save(&self, path: impl AsRef<Path>, document: &SituationDocument) -> CoreResult<PathBuf> {
        let target = self.resolve(path);
        let format = Format::from_path(&target);
        let bytes = codec::encode(document, format)?;
        fs::write(&target, bytes).map_err(|err| CoreError::io(&target, err))?;
        self.logger.record(&format!(
            "saved {} red / {} blue records to {} ({})",
            document.red.len(),
            document.blue.len(),
            target.display(),
            format
        ));
        Ok(target)
    }

    pub fn load(&self, path: impl AsRef<Path>) -> CoreResult<SituationDocument> {
        let source = self.resolve(path);
        let format = Format::from_path(&source);
        let bytes = fs::read(&source).map_err(|err| CoreError::io(&source, err))?;
        let document = codec::decode(&bytes, format).map_err(|err| {
            self.logger
                .warn(&format!("rejected {}: {}", source.display(), err));
            CoreError::Parse(err)
        })?;
        self.logger.record(&format!(
            "loaded {} red / {} blue records from {}",
            document.red.len(),
            document.blue.len(),
            source.display()
        ));
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AircraftRecord, Parameters};
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn document() -> SituationDocument {
        SituationDocument::new(
            vec![AircraftRecord::new("J-16", "combat")
                .with_id(1)
                .with_position(121.5, 31.2, 7000.0)
                .with_motion(550.0, 180.0)],
            Vec::new(),
            Parameters {
                blue_count: 3,
                strategy: "easy".into(),
                task_mode: None,
            },
        )
    }

    #[test]
    fn save_and_load_through_relative_paths() {
        let dir = tempdir().unwrap();
        let store = SituationStore::new(dir.path());

        for name in ["situation.json", "situation.xml"] {
            let written = store.save(name, &document()).unwrap();
            assert_eq!(written, dir.path().join(name));
            assert_eq!(store.load(name).unwrap(), document());
        }

        let xml = fs::read_to_string(dir.path().join("situation.xml")).unwrap();
        assert!(xml.contains("<situation>"));
    }

    #[test]
    fn missing_source_is_an_io_error() {
        let dir = tempdir().unwrap();
        let store = SituationStore::new(dir.path());
        assert!(matches!(
            store.load("absent.json"),
            Err(CoreError::Io { .. })
        ));
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempdir().unwrap();
        let store = SituationStore::new(dir.path());
        let err = store
            .save("no/such/dir/out.json", &document())
            .unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }

    #[test]
    fn malformed_content_is_a_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"{\"red_aircraft\": [").unwrap();
        let store = SituationStore::new("/unused");
        assert!(matches!(
            store.load(temp.path()),
            Err(CoreError::Parse(_))
        ));
    }
}
