use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dtgen_comb::{CombinationEngine, ElementCandidates, PlannedMix};
use dtgen_data::{analyze, DataGenerator, ElementProfile, QueryCache, QueryError, Queryable, RandomSource};
use dtgen_ir::parse::ParseError;
use dtgen_ir::{parse_elements, DataMix, DataOutcome, MixEntry, UiElementSpec};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, GenerationConfig};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("element parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Output of one `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Seed the run was built with; replaying it reproduces the mixes.
    pub seed: String,
    pub mixes: Vec<DataMix>,
    /// Warnings first recorded during this call.
    pub warnings: Vec<String>,
    /// Planned mixes dropped because a candidate query failed.
    pub discarded: usize,
}

/// One generation run: owns the random source, the query cache and the
/// warnings recorded so far.
pub struct GenerationRun {
    config: GenerationConfig,
    rng: RandomSource,
    generator: DataGenerator,
    engine: CombinationEngine,
    warnings: Vec<String>,
    seen: HashSet<String>,
}

impl GenerationRun {
    pub fn new(config: GenerationConfig, source: Option<Arc<dyn Queryable>>) -> Result<Self, RunError> {
        config.validate()?;
        let rng = RandomSource::new(config.seed.as_deref());
        let mut generator = DataGenerator::new(config.generator_options());
        if let Some(source) = source {
            generator = generator.with_source(source);
        }
        let engine =
            CombinationEngine::new(config.combination_options()).with_max_invalid_subsets(config.max_invalid_subsets);
        debug!(seed = rng.seed(), options = ?engine.options(), "generation run created");

        Ok(Self {
            config,
            rng,
            generator,
            engine,
            warnings: Vec::new(),
            seen: HashSet::new(),
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn seed(&self) -> &str {
        self.rng.seed()
    }

    pub fn engine(&self) -> &CombinationEngine {
        &self.engine
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        self.generator.cache()
    }

    /// The run's random source, for variant selection and state combination.
    pub fn random_source(&mut self) -> &mut RandomSource {
        &mut self.rng
    }

    /// Every warning recorded by this run, each message once.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Analyze, plan, combine and generate the mixes of one test case.
    ///
    /// Values are drawn sequentially in declaration order from the run's
    /// random source. A failing candidate query discards the mix being
    /// assembled; coverage gaps keep it.
    pub async fn generate(&mut self, elements: &[UiElementSpec]) -> GenerationReport {
        let first_new = self.warnings.len();

        let profiles: Vec<ElementProfile> = elements.iter().map(|e| self.generator.profile(e)).collect();
        for problem in profiles.iter().flat_map(|p| p.problems()) {
            self.record(problem.clone());
        }

        let candidates: Vec<ElementCandidates> = profiles
            .iter()
            .map(|profile| {
                let analysis = analyze(profile);
                ElementCandidates::new(
                    analysis.element(),
                    analysis.valid_cases(),
                    analysis.eligible_invalid_cases(),
                )
            })
            .collect();
        let planned = self.engine.plan(&candidates, &mut self.rng);
        debug!(elements = elements.len(), planned = planned.len(), "planned mixes");

        let by_name: HashMap<&str, &ElementProfile> = profiles.iter().map(|p| (p.name(), p)).collect();
        let mut mixes = Vec::with_capacity(planned.len());
        let mut discarded = 0;
        for (index, plan) in planned.iter().enumerate() {
            match self.assemble(plan, &by_name).await {
                Ok((mix, gaps)) => {
                    for gap in gaps {
                        self.record(gap);
                    }
                    mixes.push(mix);
                }
                Err(e) => {
                    warn!(mix = index, error = %e, "mix discarded");
                    discarded += 1;
                    self.record(format!("mix discarded: {e}"));
                }
            }
        }

        GenerationReport {
            seed: self.rng.seed().to_string(),
            mixes,
            warnings: self.warnings[first_new..].to_vec(),
            discarded,
        }
    }

    /// Parse a JSON array of element constraint sets and generate from it.
    pub async fn generate_json(&mut self, json: &str) -> Result<GenerationReport, RunError> {
        let elements = parse_elements(json)?;
        Ok(self.generate(&elements).await)
    }

    /// Run [`generate`](Self::generate) on a fresh current-thread runtime.
    ///
    /// Must not be called from inside another tokio runtime.
    pub fn generate_blocking(&mut self, elements: &[UiElementSpec]) -> Result<GenerationReport, RunError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.generate(elements)))
    }

    /// Turn a planned mix into values. Gap messages are returned rather than
    /// recorded so a discarded mix leaves no trace besides its own warning.
    async fn assemble(
        &mut self,
        plan: &PlannedMix,
        profiles: &HashMap<&str, &ElementProfile>,
    ) -> Result<(DataMix, Vec<String>), QueryError> {
        let mut mix = DataMix::new();
        let mut gaps = Vec::new();
        for (element, candidate) in &plan.entries {
            let Some(profile) = profiles.get(element.as_str()) else {
                continue;
            };
            let dtc = candidate.data_test_case;
            let outcome = self.generator.generate(profile, dtc, &mut self.rng).await?;
            trace!(element = %element, data_test_case = %dtc, outcome = ?outcome, "generated");

            if let DataOutcome::NoValue(reason) = &outcome {
                warn!(element = %element, data_test_case = %dtc, reason = %reason, "coverage gap");
                gaps.push(format!("element '{element}': no value for {dtc}: {reason}"));
            }
            mix.push(MixEntry {
                element: element.clone(),
                data_test_case: dtc,
                invalid: candidate.invalid,
                outcome,
            });
        }
        Ok((mix, gaps))
    }

    fn record(&mut self, message: String) {
        if self.seen.insert(message.clone()) {
            self.warnings.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtgen_ir::ValueType;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GenerationConfig {
            random_tries_to_invalid_value: 0,
            ..GenerationConfig::default()
        };
        assert!(matches!(GenerationRun::new(config, None), Err(RunError::Config(_))));
    }

    #[test]
    fn test_record_deduplicates() {
        let mut run = GenerationRun::new(GenerationConfig::default().with_seed("dedup"), None).unwrap();
        run.record("same".into());
        run.record("same".into());
        run.record("other".into());
        assert_eq!(run.warnings().to_vec(), vec!["same".to_string(), "other".to_string()]);
    }

    #[test]
    fn test_blocking_entry_point() {
        let mut run = GenerationRun::new(GenerationConfig::default().with_seed("blocking"), None).unwrap();
        let elements = vec![UiElementSpec::new("age", ValueType::Integer)
            .with_min_value(1)
            .with_max_value(9)];
        let report = run.generate_blocking(&elements).unwrap();
        assert_eq!(report.seed, "blocking");
        assert!(!report.mixes.is_empty());
        assert_eq!(report.discarded, 0);
    }

    #[tokio::test]
    async fn test_generate_json_reports_parse_errors() {
        let mut run = GenerationRun::new(GenerationConfig::default(), None).unwrap();
        assert!(matches!(run.generate_json("not json").await, Err(RunError::Parse(_))));
    }
}
