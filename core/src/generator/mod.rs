//! Synthetic opposing-force generation.
//!
//! The random source is always supplied by the caller, so a seeded
//! `StdRng` (or a mock generator) yields exactly reproducible rosters.

pub mod policy;
pub mod template;

pub use policy::{AdditivePolicy, ForcePolicy, Recommendation};
pub use template::LabelTemplate;

use crate::model::{AircraftRecord, Parameters, TaskMode};
use crate::prelude::{CoreError, CoreResult};
use crate::telemetry::log::LogManager;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const ALTITUDE_RANGE: Range<f64> = 5_000.0..10_000.0;
pub const SPEED_RANGE: Range<f64> = 400.0..600.0;
pub const HEADING_RANGE: Range<f64> = 0.0..360.0;
/// Planar range inherited from the first planning tool. Not geographic.
pub const LEGACY_COORDINATE_RANGE: Range<f64> = 0.0..1_000.0;
pub const GENERATED_STATUS: &str = "standby";

/// Where generated longitude/latitude values are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateDomain {
    /// Both coordinates uniform in [0, 1000). Kept for compatibility with
    /// existing situation files even though the values are not valid
    /// longitudes or latitudes.
    #[default]
    Legacy,
    /// Longitude in [-180, 180], latitude in [-90, 90].
    Geographic,
}

/// Configuration for the opposing-force generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub margin: usize,
    pub difficulty: String,
    pub label_template: LabelTemplate,
    pub coordinate_domain: CoordinateDomain,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            margin: AdditivePolicy::DEFAULT_MARGIN,
            difficulty: AdditivePolicy::DEFAULT_DIFFICULTY.to_string(),
            label_template: LabelTemplate::default(),
            coordinate_domain: CoordinateDomain::Legacy,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Seeded generator when a seed is configured, entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Optional caller overrides of the recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub count: Option<usize>,
    pub difficulty: Option<String>,
}

impl GenerationRequest {
    pub fn new(count: Option<usize>, difficulty: Option<String>) -> Self {
        Self { count, difficulty }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub records: Vec<AircraftRecord>,
    /// What the policy would have chosen, even when overridden.
    pub recommended_count: usize,
    pub recommended_difficulty: String,
    pub final_count: usize,
    pub final_difficulty: String,
}

impl GenerationResult {
    /// Parameters block describing what was actually generated.
    pub fn parameters(&self, task_mode: Option<TaskMode>) -> Parameters {
        Parameters {
            blue_count: self.final_count as i64,
            strategy: self.final_difficulty.clone(),
            task_mode,
        }
    }
}

pub struct SituationGenerator<P: ForcePolicy = AdditivePolicy> {
    policy: P,
    template: LabelTemplate,
    domain: CoordinateDomain,
    logger: LogManager,
}

impl SituationGenerator<AdditivePolicy> {
    pub fn new() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::with_policy(
            AdditivePolicy::new(config.margin, config.difficulty.clone()),
            config.label_template.clone(),
            config.coordinate_domain,
        )
    }
}

impl Default for SituationGenerator<AdditivePolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ForcePolicy> SituationGenerator<P> {
    pub fn with_policy(policy: P, template: LabelTemplate, domain: CoordinateDomain) -> Self {
        Self {
            policy,
            template,
            domain,
            logger: LogManager::new("generator"),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Builds an opposing roster from a snapshot of the source roster.
    ///
    /// A requested count of zero and a blank difficulty both fall back to
    /// the policy's recommendation.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        source: &[AircraftRecord],
        request: &GenerationRequest,
        rng: &mut R,
    ) -> CoreResult<GenerationResult> {
        if source.is_empty() {
            self.logger.warn("refusing to generate from an empty roster");
            return Err(CoreError::EmptyInput);
        }

        let recommendation = self.policy.recommend(source);
        let final_count = request
            .count
            .filter(|count| *count > 0)
            .unwrap_or(recommendation.count);
        let final_difficulty = request
            .difficulty
            .as_deref()
            .map(str::trim)
            .filter(|difficulty| !difficulty.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| recommendation.difficulty.clone());

        let records = (1..=final_count)
            .map(|index| self.synthesize(index, rng))
            .collect::<Vec<_>>();

        self.logger.record(&format!(
            "generated {} records (recommended {}, difficulty {}, source {})",
            final_count,
            recommendation.count,
            final_difficulty,
            source.len()
        ));

        Ok(GenerationResult {
            records,
            recommended_count: recommendation.count,
            recommended_difficulty: recommendation.difficulty,
            final_count,
            final_difficulty,
        })
    }

    fn synthesize<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> AircraftRecord {
        let (longitude, latitude) = match self.domain {
            CoordinateDomain::Legacy => (
                rng.gen_range(LEGACY_COORDINATE_RANGE),
                rng.gen_range(LEGACY_COORDINATE_RANGE),
            ),
            CoordinateDomain::Geographic => {
                (rng.gen_range(-180.0..=180.0), rng.gen_range(-90.0..=90.0))
            }
        };
        let altitude = rng.gen_range(ALTITUDE_RANGE);
        let speed = rng.gen_range(SPEED_RANGE);
        let heading = rng.gen_range(HEADING_RANGE);

        AircraftRecord::new(self.template.render(index), GENERATED_STATUS)
            .with_id(index as u32)
            .with_position(longitude, latitude, altitude)
            .with_motion(speed, heading)
    }
}

/// One-shot generation with the default additive policy.
pub fn generate<R: Rng + ?Sized>(
    source: &[AircraftRecord],
    count: Option<usize>,
    difficulty: Option<&str>,
    rng: &mut R,
) -> CoreResult<GenerationResult> {
    let request = GenerationRequest::new(count, difficulty.map(str::to_string));
    SituationGenerator::new().generate(source, &request, rng)
}
