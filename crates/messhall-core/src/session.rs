//! Scan session state machine
//!
//! Staff-side control loop that turns decoded identity codes into attendance
//! writes. Phases: `Idle` (accepting frames) -> `Submitting` -> `Result` ->
//! `Cooldown` (successes only, default 2 s) -> `Idle`. Errors return to
//! `Idle` immediately so the operator can retry.
//!
//! Only `Idle` accepts frames, so one physical presentation of a code yields
//! at most one submission. Frames arriving while a decode is outstanding are
//! skipped, never queued (keep-latest-only backpressure), and a decode that
//! overruns its deadline is abandoned for that frame.

use crate::service::AttendanceService;
use image::GrayImage;
use messhall_store::RecordStore;
use messhall_types::{Meal, ResidentId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};

/// Operator acknowledgement side effect fired on a successful check-in
/// (haptic buzz or beep on the scanning device).
pub trait AckSink: Send + Sync {
    /// Fire the acknowledgement.
    fn acknowledge(&self);
}

/// Silent sink for headless use and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAck;

impl AckSink for NoopAck {
    fn acknowledge(&self) {}
}

/// Where the session is in its loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Accepting frames.
    Idle,
    /// A decoded identifier is with the attendance service; frames are
    /// ignored.
    Submitting,
    /// The service answered; the outcome is on its way to the operator.
    Result(ScanOutcome),
    /// Post-success delay before the next scan.
    Cooldown,
}

/// What a submission came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Checked in.
    Accepted {
        /// Who was admitted.
        resident: ResidentId,
        /// For which meal.
        meal: Meal,
    },
    /// Refused; the message is shown to the operator.
    Rejected {
        /// Operator-readable reason.
        message: String,
    },
}

/// Session tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay after a successful scan before the next one is accepted.
    pub cooldown: Duration,
    /// Deadline for a single frame's decode attempt.
    pub decode_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(2),
            decode_timeout: Duration::from_millis(500),
        }
    }
}

/// One staff scanning session. Short-lived, never persisted.
pub struct ScanSession<S> {
    service: Arc<AttendanceService<S>>,
    ack: Arc<dyn AckSink>,
    config: SessionConfig,
    /// Operator-chosen meal; external to the machine, changeable at any time
    /// without resetting it.
    selected_meal: Mutex<Meal>,
    phase: watch::Sender<SessionPhase>,
    last_outcome: Mutex<Option<ScanOutcome>>,
    /// Single permit: at most one decode in flight.
    decode_gate: Arc<Semaphore>,
}

impl<S: RecordStore> ScanSession<S> {
    /// Session with default tuning, preselecting the default scanner meal.
    #[must_use]
    pub fn new(service: Arc<AttendanceService<S>>, ack: Arc<dyn AckSink>) -> Self {
        Self::with_config(service, ack, SessionConfig::default())
    }

    /// Session with explicit tuning.
    #[must_use]
    pub fn with_config(
        service: Arc<AttendanceService<S>>,
        ack: Arc<dyn AckSink>,
        config: SessionConfig,
    ) -> Self {
        let (phase, _) = watch::channel(SessionPhase::Idle);
        Self {
            service,
            ack,
            config,
            selected_meal: Mutex::new(Meal::default_for_scanning()),
            phase,
            last_outcome: Mutex::new(None),
            decode_gate: Arc::new(Semaphore::new(1)),
        }
    }

    /// Change the meal the operator is admitting for.
    pub fn select_meal(&self, meal: Meal) {
        *self.selected_meal.lock() = meal;
    }

    /// The meal currently selected.
    #[must_use]
    pub fn selected_meal(&self) -> Meal {
        *self.selected_meal.lock()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase.borrow().clone()
    }

    /// Watch phase transitions (for the operator UI).
    #[must_use]
    pub fn watch_phase(&self) -> watch::Receiver<SessionPhase> {
        self.phase.subscribe()
    }

    /// The most recent submission outcome, surviving the return to `Idle`.
    #[must_use]
    pub fn last_outcome(&self) -> Option<ScanOutcome> {
        self.last_outcome.lock().clone()
    }

    /// Feed one camera frame.
    ///
    /// Dropped without decoding unless the session is idle and no decode is
    /// outstanding. A decode that misses the deadline is abandoned; the
    /// worker finishing late still holds the gate, so following frames skip
    /// until it is done.
    pub async fn process_frame(&self, frame: GrayImage) {
        if !matches!(self.phase(), SessionPhase::Idle) {
            return;
        }
        let Ok(permit) = Arc::clone(&self.decode_gate).try_acquire_owned() else {
            tracing::trace!("decode outstanding, frame skipped");
            return;
        };
        let decode = tokio::task::spawn_blocking(move || {
            let _gate = permit;
            messhall_codec::decode(frame)
        });
        match tokio::time::timeout(self.config.decode_timeout, decode).await {
            Ok(Ok(Some(text))) => {
                let resident = ResidentId::new(text.trim());
                if resident.is_empty() {
                    return;
                }
                self.submit(resident).await;
            }
            // No code in this frame: the live-stream steady state
            Ok(Ok(None)) => {}
            Ok(Err(err)) => tracing::warn!(?err, "decode worker failed"),
            Err(_) => tracing::trace!("decode deadline missed, frame abandoned"),
        }
    }

    /// Submit a decoded identifier for the selected meal. The decode path
    /// calls this; it is public as the seam for push-source integrations.
    ///
    /// A no-op unless the session is idle, taken atomically, so concurrent
    /// decodes of the same presentation collapse to one submission.
    pub async fn submit(&self, resident: ResidentId) {
        let took_idle = self.phase.send_if_modified(|phase| {
            if matches!(phase, SessionPhase::Idle) {
                *phase = SessionPhase::Submitting;
                true
            } else {
                false
            }
        });
        if !took_idle {
            return;
        }

        let meal = self.selected_meal();
        tracing::debug!(%resident, %meal, "identity decoded, submitting");
        let outcome = match self.service.mark_present_today(&resident, meal).await {
            Ok(()) => ScanOutcome::Accepted { resident, meal },
            Err(err) => ScanOutcome::Rejected {
                message: err.to_string(),
            },
        };
        *self.last_outcome.lock() = Some(outcome.clone());
        self.phase.send_replace(SessionPhase::Result(outcome.clone()));

        match outcome {
            ScanOutcome::Accepted { .. } => {
                self.ack.acknowledge();
                let phase = self.phase.clone();
                let cooldown = self.config.cooldown;
                tokio::spawn(async move {
                    phase.send_replace(SessionPhase::Cooldown);
                    tokio::time::sleep(cooldown).await;
                    phase.send_replace(SessionPhase::Idle);
                });
            }
            ScanOutcome::Rejected { .. } => {
                // No cooldown on errors; the operator may retry right away
                self.phase.send_replace(SessionPhase::Idle);
            }
        }
    }
}
