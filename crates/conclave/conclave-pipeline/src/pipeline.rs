//! ConclavePipeline: owns every stage and the stores they write to.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use conclave_calibration::{CalibrationTracker, SettlementReport};
use conclave_consensus::{ConsensusEngine, ContestInput};
use conclave_core::config::ConclaveConfig;
use conclave_core::errors::{ConclaveResult, ConfigError};
use conclave_core::models::{ConsensusResult, CouncilSnapshot, Expert, ExpertId, RunId, VoteWeight};
use conclave_core::traits::{ICalibrationStore, IRunStore};
use conclave_core::CategoryRegistry;
use conclave_decay::{HalfLifeResolver, MemoryCandidate, MemoryDecayScorer, RetrievalScore};
use conclave_observability::tracing_setup::events;
use conclave_observability::RunMetrics;
use conclave_selection::{CouncilSelector, EligibilityGate, SelectionScorer, VoteWeightCalculator};
use conclave_storage::StorageEngine;

use crate::collaborators::Collaborators;
use crate::report::RunReport;

/// Options for [`ConclavePipeline::open`].
#[derive(Debug, Default)]
pub struct PipelineOptions {
    /// SQLite database path. `None` uses an in-memory database.
    pub db_path: Option<PathBuf>,
    /// TOML configuration. `None` uses defaults.
    pub config_toml: Option<String>,
    /// Category registry TOML. `None` uses the built-in categories.
    pub categories_toml: Option<String>,
}

pub struct ConclavePipeline {
    config: ConclaveConfig,
    roster: Vec<Expert>,
    run_store: Arc<dyn IRunStore>,
    collaborators: Collaborators,
    gate: EligibilityGate,
    scorer: SelectionScorer,
    selector: CouncilSelector,
    voting: VoteWeightCalculator,
    consensus: ConsensusEngine,
    calibration: CalibrationTracker,
    memory: MemoryDecayScorer,
}

impl ConclavePipeline {
    /// Build the pipeline. The config is checked against the roster here;
    /// nothing is re-validated once runs start.
    pub fn new(
        config: ConclaveConfig,
        registry: Arc<CategoryRegistry>,
        roster: Vec<Expert>,
        run_store: Arc<dyn IRunStore>,
        calibration_store: Arc<dyn ICalibrationStore>,
        collaborators: Collaborators,
    ) -> ConclaveResult<Self> {
        config.validate()?;
        config.validate_roster(&roster)?;
        if let Some(id) = config
            .consensus
            .expected_categories
            .iter()
            .find(|id| registry.get(id).is_none())
        {
            return Err(ConfigError::ValidationFailed {
                field: "consensus.expected_categories".to_string(),
                message: format!("category {id:?} is not registered"),
            }
            .into());
        }

        let resolver = HalfLifeResolver::from_roster(&config.decay, &roster);
        let calibration = CalibrationTracker::new(
            &config.calibration,
            registry.clone(),
            resolver,
            calibration_store,
        );

        info!(
            experts = roster.len(),
            categories = registry.len(),
            council_size = config.selection.council_size,
            "pipeline ready"
        );
        Ok(Self {
            gate: EligibilityGate::new(&config.selection),
            scorer: SelectionScorer::new(&config.selection.weights),
            selector: CouncilSelector::new(config.selection.council_size),
            voting: VoteWeightCalculator::new(&config.voting),
            consensus: ConsensusEngine::new(&config.consensus, registry),
            memory: MemoryDecayScorer::from_roster(&config.decay, &roster),
            calibration,
            config,
            roster,
            run_store,
            collaborators,
        })
    }

    /// Build the pipeline over one SQLite database serving both stores.
    pub fn open(opts: PipelineOptions, roster: Vec<Expert>, collaborators: Collaborators) -> ConclaveResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => ConclaveConfig::from_toml(toml_str)?,
            None => ConclaveConfig::default(),
        };
        let registry = Arc::new(match &opts.categories_toml {
            Some(toml_str) => CategoryRegistry::from_toml(toml_str)?,
            None => CategoryRegistry::with_defaults(),
        });
        let storage = Arc::new(match &opts.db_path {
            Some(path) => StorageEngine::open(path)?,
            None => StorageEngine::open_in_memory()?,
        });
        Self::new(config, registry, roster, storage.clone(), storage, collaborators)
    }

    pub fn config(&self) -> &ConclaveConfig {
        &self.config
    }

    pub fn run_store(&self) -> &Arc<dyn IRunStore> {
        &self.run_store
    }

    pub fn calibration(&self) -> &CalibrationTracker {
        &self.calibration
    }

    fn roster_ids(&self) -> Vec<ExpertId> {
        self.roster.iter().map(|e| e.expert_id.clone()).collect()
    }

    /// Register the run. Every later write is keyed by it.
    pub fn begin_run(&self, run_id: &RunId, cohort: &str) -> ConclaveResult<()> {
        self.run_store.begin_run(run_id, cohort)?;
        events::run_started(run_id, cohort);
        Ok(())
    }

    /// Gate, score and seat the council, persisting verdicts, scores and
    /// members. Stats for experts outside the roster are ignored.
    #[instrument(skip_all, fields(run_id = %run_id))]
    pub fn select_council(&self, run_id: &RunId, metrics: &mut RunMetrics) -> ConclaveResult<CouncilSnapshot> {
        let roster: HashSet<ExpertId> = self.roster_ids().into_iter().collect();
        let in_roster = |id: &ExpertId| {
            let known = roster.contains(id);
            if !known {
                debug!(expert_id = %id, "stats for expert outside roster ignored");
            }
            known
        };

        let mut eligibility = self.collaborators.performance.eligibility_stats(run_id)?;
        eligibility.retain(|s| in_roster(&s.expert_id));
        let verdicts = self.gate.evaluate_all(run_id, &eligibility);
        for verdict in &verdicts {
            self.run_store.upsert_eligibility(verdict)?;
        }
        metrics.record_verdicts(&verdicts);

        let mut performance = self.collaborators.performance.performance_stats(run_id)?;
        performance.retain(|s| in_roster(&s.expert_id));
        let scores = self.scorer.score_eligible(run_id, &performance, &verdicts);
        for score in &scores {
            self.run_store.upsert_selection_score(score)?;
        }

        let council = self.selector.select(run_id, &scores);
        self.run_store.upsert_council(&council)?;
        metrics.record_council(&council);
        events::council_selected(&council);
        Ok(council)
    }

    /// Compute and persist vote weights for the seated council.
    #[instrument(skip_all, fields(run_id = %run_id, seats = council.members.len()))]
    pub fn assign_weights(&self, run_id: &RunId, council: &CouncilSnapshot) -> ConclaveResult<Vec<VoteWeight>> {
        if council.members.is_empty() {
            warn!("empty council; no vote weights assigned");
            return Ok(Vec::new());
        }
        let metrics = self
            .collaborators
            .performance
            .voting_metrics(run_id, &council.expert_ids())?;
        let weights = self.voting.compute(run_id, council, &metrics);
        self.run_store.upsert_vote_weights(&weights)?;
        Ok(weights)
    }

    /// Aggregate every contest and persist the per-category results.
    #[instrument(skip_all, fields(run_id = %run_id, contests = game_ids.len()))]
    pub fn run_consensus(
        &self,
        run_id: &RunId,
        game_ids: &[String],
        weights: &[VoteWeight],
        metrics: &mut RunMetrics,
    ) -> ConclaveResult<Vec<Vec<ConsensusResult>>> {
        let members: Vec<ExpertId> = weights.iter().map(|w| w.expert_id.clone()).collect();
        let contests = game_ids
            .iter()
            .map(|game_id| {
                Ok(ContestInput {
                    game_id: game_id.clone(),
                    predictions: self.collaborators.predictions.predictions_for(game_id, &members)?,
                })
            })
            .collect::<ConclaveResult<Vec<_>>>()?;
        let view = self.calibration.view(&members)?;

        let results = self.consensus.aggregate_contests(run_id, &contests, weights, &view);
        for contest in &results {
            for result in contest {
                self.run_store.upsert_consensus(result)?;
                events::consensus_computed(result);
            }
            metrics.record_contest(contest);
        }
        Ok(results)
    }

    /// Fold a resolved contest's ground truth into calibration state and
    /// persist any belief revisions found. Every roster expert's predictions
    /// are scored, seated or not.
    #[instrument(skip_all, fields(run_id = %run_id, game_id = %game_id))]
    pub fn settle(
        &self,
        run_id: &RunId,
        game_id: &str,
        now: DateTime<Utc>,
        metrics: &mut RunMetrics,
    ) -> ConclaveResult<Vec<SettlementReport>> {
        let settlements = self.collaborators.settlements.settlements_for(game_id)?;
        if settlements.is_empty() {
            debug!("contest not resolved yet");
            return Ok(Vec::new());
        }
        let predictions = self
            .collaborators
            .predictions
            .predictions_for(game_id, &self.roster_ids())?;

        let mut reports = Vec::with_capacity(settlements.len());
        for settlement in &settlements {
            let report = self.calibration.settle(run_id, settlement, &predictions, now)?;
            for revision in &report.revisions {
                self.run_store.insert_belief_revision(revision)?;
            }
            for key in &report.queued {
                events::calibration_queued(&key.expert_id, &key.category_id, game_id);
            }
            metrics.record_settlement(
                report.applied.len(),
                report.queued.len(),
                report.duplicates,
                report.revisions.len(),
            );
            reports.push(report);
        }
        Ok(reports)
    }

    /// Retry calibration updates parked after exhausting their retries.
    pub fn replay_pending(&self, now: DateTime<Utc>) -> ConclaveResult<usize> {
        self.calibration.replay_pending(now)
    }

    /// Mark the run complete. Only now do readers see it as finished.
    pub fn complete_run(&self, run_id: &RunId, metrics: &RunMetrics) -> ConclaveResult<()> {
        self.run_store.mark_run_complete(run_id)?;
        events::run_completed(run_id, metrics.contests, metrics.categories_reached);
        Ok(())
    }

    /// Execute one full run over `game_ids`. Contests that already have
    /// ground truth are settled in the same pass. If any stage fails the
    /// run is left open.
    #[instrument(skip_all, fields(run_id = %run_id, cohort = %cohort))]
    pub fn execute_run(
        &self,
        run_id: &RunId,
        cohort: &str,
        game_ids: &[String],
        now: DateTime<Utc>,
    ) -> ConclaveResult<RunReport> {
        let mut metrics = RunMetrics::new(run_id);

        self.begin_run(run_id, cohort)?;
        let council = self.select_council(run_id, &mut metrics)?;
        let weights = self.assign_weights(run_id, &council)?;
        let results = self.run_consensus(run_id, game_ids, &weights, &mut metrics)?;
        for game_id in game_ids {
            self.settle(run_id, game_id, now, &mut metrics)?;
        }
        self.complete_run(run_id, &metrics)?;

        Ok(RunReport {
            run_id: run_id.clone(),
            council,
            weights,
            results,
            metrics,
        })
    }

    /// Rank an expert's retrieved memories by similarity blended with
    /// recency, using that expert's half-life.
    pub fn rank_memories(&self, candidates: &[MemoryCandidate], now: DateTime<Utc>) -> Vec<RetrievalScore> {
        self.memory.rank(candidates, now)
    }
}
