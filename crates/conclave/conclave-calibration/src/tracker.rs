//! CalibrationTracker: fold settled outcomes into per-key posteriors.
//!
//! For each expert that predicted the settled category, the latest valid
//! prediction made at or before settlement is scored. Each update is a
//! read-modify-write against the store's version: on conflict it re-reads
//! and retries up to `max_cas_retries` times, then parks the update on the
//! pending queue. `replay_pending` drains that queue later.
//!
//! Each (expert, category, contest) is applied at most once per store: the
//! store's application ledger is written together with the state, so
//! trackers sharing a database see each other's settlements. A contest
//! still waiting on the pending queue also counts as applied.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use conclave_core::config::CalibrationConfig;
use conclave_core::errors::{CalibrationError, ConclaveError, ConclaveResult};
use conclave_core::models::{
    BeliefRevision, CalibrationKey, CalibrationState, ExpertId, Posterior, Prediction,
    PredictionValue, RunId, Settlement,
};
use conclave_core::traits::{CasOutcome, ICalibrationStore};
use conclave_core::{Category, CategoryRegistry, DataType};
use conclave_decay::{age_days, decayed_rate, HalfLifeResolver};

use crate::posterior::{self, Observation};
use crate::revision::BeliefRevisionTracker;

/// An update waiting to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    pub run_id: RunId,
    pub key: CalibrationKey,
    pub game_id: String,
    pub observation: Observation,
    pub settled_at: DateTime<Utc>,
    /// Replays attempted so far.
    pub replays: u32,
}

/// Result of one CAS loop.
enum Attempt {
    Applied(CalibrationState),
    AlreadyApplied,
    Exhausted,
}

/// Outcome of settling one (contest, category).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementReport {
    /// States written, with their new versions.
    pub applied: Vec<CalibrationState>,
    /// Keys whose update was queued after exhausting retries.
    pub queued: Vec<CalibrationKey>,
    /// Updates skipped because this contest was already applied for the key.
    pub duplicates: usize,
    /// Experts with no valid prediction to score.
    pub unscored: Vec<ExpertId>,
    pub revisions: Vec<BeliefRevision>,
}

pub struct CalibrationTracker {
    config: CalibrationConfig,
    registry: Arc<CategoryRegistry>,
    resolver: HalfLifeResolver,
    store: Arc<dyn ICalibrationStore>,
    revisions: BeliefRevisionTracker,
    pending: Mutex<VecDeque<PendingUpdate>>,
}

impl CalibrationTracker {
    pub fn new(
        config: &CalibrationConfig,
        registry: Arc<CategoryRegistry>,
        resolver: HalfLifeResolver,
        store: Arc<dyn ICalibrationStore>,
    ) -> Self {
        Self {
            config: config.clone(),
            registry,
            resolver,
            store,
            revisions: BeliefRevisionTracker::new(),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn ICalibrationStore> {
        &self.store
    }

    /// Bootstrap posterior: Beta(1, 1) for categorical, EMA(seed) otherwise.
    pub fn bootstrap_posterior(&self, category: &Category) -> Posterior {
        if category.data_type.uses_beta_posterior() {
            Posterior::uniform_beta()
        } else {
            Posterior::Ema {
                mu: self.config.seed_mean,
                sigma: self.config.seed_stddev,
            }
        }
    }

    /// Score every expert's prediction for the settled category.
    ///
    /// An invalid ground-truth value or unknown category is an error. Invalid
    /// predictions leave that expert unscored.
    #[instrument(skip_all, fields(run_id = %run_id, game_id = %settlement.game_id, category_id = %settlement.category_id))]
    pub fn settle(
        &self,
        run_id: &RunId,
        settlement: &Settlement,
        predictions: &[Prediction],
        now: DateTime<Utc>,
    ) -> ConclaveResult<SettlementReport> {
        let category = self.registry.require(&settlement.category_id)?;
        category.validate(&settlement.actual_value)?;

        let mut by_expert: BTreeMap<&ExpertId, Vec<&Prediction>> = BTreeMap::new();
        for p in predictions.iter().filter(|p| {
            p.game_id == settlement.game_id
                && p.category_id == settlement.category_id
                && p.created_at <= settlement.settled_at
        }) {
            by_expert.entry(&p.expert_id).or_default().push(p);
        }

        let mut report = SettlementReport::default();
        for (expert_id, history) in by_expert {
            let key = CalibrationKey::new(expert_id.clone(), &category.category_id);
            if self.store.is_applied(&key, &settlement.game_id)? || self.is_pending(&key, &settlement.game_id)? {
                debug!(key = %key, "contest already applied; skipping");
                report.duplicates += 1;
                continue;
            }
            let revisions = self.revisions.detect(category, &history);

            let latest = history
                .iter()
                .filter(|p| category.validate(&p.value).is_ok())
                .max_by(|a, b| (a.created_at, &a.prediction_id).cmp(&(b.created_at, &b.prediction_id)));
            let Some(observation) =
                latest.and_then(|p| observe(category, &p.value, &settlement.actual_value))
            else {
                warn!(expert_id = %expert_id, "no valid prediction to score");
                report.unscored.push(expert_id.clone());
                report.revisions.extend(revisions);
                continue;
            };

            let update = PendingUpdate {
                run_id: run_id.clone(),
                key,
                game_id: settlement.game_id.clone(),
                observation,
                settled_at: settlement.settled_at,
                replays: 0,
            };
            match self.try_apply(&update, now)? {
                Attempt::Applied(state) => {
                    report.applied.push(state);
                    report.revisions.extend(revisions);
                }
                Attempt::AlreadyApplied => {
                    debug!(key = %update.key, "contest applied by another writer");
                    report.duplicates += 1;
                }
                Attempt::Exhausted => {
                    report.queued.push(update.key.clone());
                    report.revisions.extend(revisions);
                    self.enqueue(update)?;
                }
            }
        }

        info!(
            applied = report.applied.len(),
            queued = report.queued.len(),
            duplicates = report.duplicates,
            revisions = report.revisions.len(),
            "settlement processed"
        );
        Ok(report)
    }

    /// Retry every queued update once. Updates that conflict again go back
    /// on the queue. Returns the number applied.
    #[instrument(skip_all)]
    pub fn replay_pending(&self, now: DateTime<Utc>) -> ConclaveResult<usize> {
        let drained: Vec<PendingUpdate> = self.lock_pending()?.drain(..).collect();
        if drained.is_empty() {
            return Ok(0);
        }

        let mut applied = 0;
        let mut requeue = Vec::new();
        let mut first_error = None;
        for mut update in drained {
            update.replays += 1;
            match self.try_apply(&update, now) {
                Ok(Attempt::Applied(_)) => applied += 1,
                Ok(Attempt::AlreadyApplied) => debug!(key = %update.key, "queued contest already applied; dropped"),
                Ok(Attempt::Exhausted) => requeue.push(update),
                Err(e) => {
                    warn!(key = %update.key, error = %e, "replay failed");
                    first_error.get_or_insert(e);
                    requeue.push(update);
                }
            }
        }

        let remaining = requeue.len();
        self.lock_pending()?.extend(requeue);
        info!(applied, remaining, "pending calibration updates replayed");
        match first_error {
            Some(e) => Err(e),
            None => Ok(applied),
        }
    }

    pub fn pending_len(&self) -> ConclaveResult<usize> {
        Ok(self.lock_pending()?.len())
    }

    /// Current states for `experts`, keyed for the consensus engine.
    pub fn view(&self, experts: &[ExpertId]) -> ConclaveResult<HashMap<CalibrationKey, CalibrationState>> {
        let mut view = HashMap::new();
        for expert_id in experts {
            for state in self.store.list_for_expert(expert_id)? {
                view.insert(state.key.clone(), state);
            }
        }
        Ok(view)
    }

    /// One CAS attempt loop against the store's ledger-aware write.
    fn try_apply(&self, update: &PendingUpdate, now: DateTime<Utc>) -> ConclaveResult<Attempt> {
        let category = self.registry.require(&update.key.category_id)?;
        let half_life = self
            .resolver
            .half_life_days(&update.key.expert_id, Some(&update.key.category_id));
        let rate = decayed_rate(self.config.base_rate, age_days(update.settled_at, now), half_life);

        for attempt in 0..=self.config.max_cas_retries {
            let current = self.store.get(&update.key)?;
            let expected = current.as_ref().map(|s| s.version);
            let base = current.unwrap_or_else(|| {
                CalibrationState::bootstrap(update.key.clone(), self.bootstrap_posterior(category), &update.run_id)
            });

            let posterior = posterior::apply(&base.posterior, update.observation, rate, self.config.ema_lambda)
                .ok_or_else(|| CalibrationError::PosteriorMismatch {
                    key: update.key.to_string(),
                    expected: self.bootstrap_posterior(category).kind_name(),
                })?;
            let next = CalibrationState {
                posterior,
                run_id: update.run_id.clone(),
                observations: base.observations + 1,
                updated_at: now,
                ..base
            };

            match self.store.apply_settlement(expected, &next, &update.game_id)? {
                CasOutcome::Applied { version } => {
                    debug!(key = %update.key, version, rate, "calibration updated");
                    return Ok(Attempt::Applied(CalibrationState { version, ..next }));
                }
                CasOutcome::AlreadyApplied => return Ok(Attempt::AlreadyApplied),
                CasOutcome::Conflict { current } => {
                    debug!(key = %update.key, attempt, ?current, "calibration write conflict");
                }
            }
        }

        let conflict = CalibrationError::ConcurrentUpdateConflict {
            key: update.key.to_string(),
            attempts: self.config.max_cas_retries + 1,
        };
        warn!(error = %conflict, "calibration retries exhausted; update queued");
        Ok(Attempt::Exhausted)
    }

    fn is_pending(&self, key: &CalibrationKey, game_id: &str) -> ConclaveResult<bool> {
        Ok(self
            .lock_pending()?
            .iter()
            .any(|u| &u.key == key && u.game_id == game_id))
    }

    fn enqueue(&self, update: PendingUpdate) -> ConclaveResult<()> {
        self.lock_pending()?.push_back(update);
        Ok(())
    }

    fn lock_pending(&self) -> ConclaveResult<std::sync::MutexGuard<'_, VecDeque<PendingUpdate>>> {
        self.pending
            .lock()
            .map_err(|e| ConclaveError::Concurrency(format!("pending queue lock poisoned: {e}")))
    }
}

fn observe(category: &Category, predicted: &PredictionValue, actual: &PredictionValue) -> Option<Observation> {
    match category.data_type {
        DataType::Categorical => Some(Observation::Correct(predicted.as_choice()? == actual.as_choice()?)),
        DataType::Numeric | DataType::Percentage => {
            Some(Observation::AbsoluteError((predicted.as_number()? - actual.as_number()?).abs()))
        }
    }
}
