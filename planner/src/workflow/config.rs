use anyhow::Context;
use rostercore::generator::GeneratorConfig;
use rostercore::importer::VocabularyPreset;
use rostercore::SituationStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONTROL_FILE: &str = "simulation_control.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Directory that relative situation and control paths resolve against.
    pub workspace_root: PathBuf,
    pub control_file: PathBuf,
    pub generator: GeneratorConfig,
    pub scenario_vocabulary: VocabularyPreset,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            control_file: PathBuf::from(DEFAULT_CONTROL_FILE),
            generator: GeneratorConfig::default(),
            scenario_vocabulary: VocabularyPreset::English,
        }
    }
}

impl PlannerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading planner config {}", path_ref.display()))?;
        let config: PlannerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing planner config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn store(&self) -> SituationStore {
        SituationStore::new(self.workspace_root.clone())
    }

    pub fn control_path(&self) -> PathBuf {
        self.store().resolve(&self.control_file)
    }
}
