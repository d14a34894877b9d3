use crate::workflow::config::PlannerConfig;
use anyhow::Context;
use rostercore::generator::{GenerationRequest, GenerationResult, SituationGenerator};
use rostercore::importer::ScenarioImporter;
use rostercore::{
    Field, Parameters, Roster, Side, SituationDocument, SituationStore, TaskMode,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Red and blue rosters for one planning session, plus the parameters that
/// travel with them when saved.
pub struct Session {
    config: PlannerConfig,
    store: SituationStore,
    red: Roster,
    blue: Roster,
    parameters: Parameters,
}

impl Session {
    pub fn new(config: PlannerConfig) -> Self {
        let store = config.store();
        Self {
            config,
            store,
            red: Roster::new(Side::Red),
            blue: Roster::new(Side::Blue),
            parameters: Parameters::default(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    pub fn roster_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Replaces both rosters and the parameters with a stored situation.
    pub fn open(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let document = self
            .store
            .load(path)
            .with_context(|| format!("opening situation {}", path.display()))?;
        self.red.replace_all(document.red);
        self.blue.replace_all(document.blue);
        self.parameters = document.parameters;
        Ok(())
    }

    /// Loads only the red roster of a stored situation (any accepted shape).
    pub fn open_red(&mut self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let path = path.as_ref();
        let document = self
            .store
            .load(path)
            .with_context(|| format!("loading red roster {}", path.display()))?;
        self.red.replace_all(document.red);
        Ok(self.red.len())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let path = path.as_ref();
        self.store
            .save(path, &self.document())
            .with_context(|| format!("saving situation {}", path.display()))
    }

    pub fn document(&self) -> SituationDocument {
        SituationDocument::new(
            self.red.snapshot(),
            self.blue.snapshot(),
            self.parameters.clone(),
        )
    }

    /// Derives the blue roster from a snapshot of the red one.
    pub fn generate_blue(
        &mut self,
        request: &GenerationRequest,
        task_mode: Option<TaskMode>,
    ) -> anyhow::Result<GenerationResult> {
        let generator = SituationGenerator::from_config(&self.config.generator);
        let mut rng = self.config.generator.rng();
        let result = generator
            .generate(&self.red.snapshot(), request, &mut rng)
            .context("generating blue situation")?;
        self.blue.replace_all(result.records.clone());
        self.parameters = result.parameters(task_mode);
        Ok(result)
    }

    /// Replaces the red roster with the red air force of a scenario file.
    pub fn import_scenario(&mut self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let source = self.store.resolve(path);
        let bytes = fs::read(&source)
            .with_context(|| format!("reading scenario {}", source.display()))?;
        let importer = ScenarioImporter::new(self.config.scenario_vocabulary.vocabulary());
        let imported = importer
            .import_red_force(&bytes)
            .with_context(|| format!("importing scenario {}", source.display()))?;
        self.red.replace_all(imported.into_records());
        Ok(self.red.len())
    }

    pub fn edit(&mut self, side: Side, index: usize, field: Field, raw: &str) -> anyhow::Result<()> {
        self.roster_mut(side)
            .set_field(index, field, raw)
            .with_context(|| format!("editing {} row {}", side, index))
    }
}
