//! # Bottle Session
//!
//! Drives one "add sample" interaction: open the scanner, resolve the decoded
//! sample number against the backend, merge the returned bottle deltas into
//! the checklist, let the user adjust counts, submit.
//!
//! ## States
//!
//! ```text
//! Idle -> Scanning -> Resolving -> ReadyForReview -> Submitting -> Submitted
//!                         |                              |
//!                         +--> Idle (rejected)           +--> ReadyForReview (failed)
//! ```
//!
//! [`BottleSession::cancel`] returns to `Idle` from anywhere.
//!
//! ## Failures
//!
//! Camera and backend failures never reach the caller. They become notices
//! and the session moves to its recovery state:
//! - camera refused: back to where the scanner was opened from
//! - resolve failed: checklist and sample cleared, `Idle`
//! - submit failed: checklist kept, `ReadyForReview`, retry allowed
//!
//! [`SessionError`] is only returned for calls that make no sense in the
//! current state, including any trigger while a request is in flight.
use std::fmt;

use tracing::{debug, info, warn};

use crate::{
    api::SampleApi,
    camera::{Camera, Facing, ScanSession},
    checklist::BottleChecklist,
    error::{CameraError, FALLBACK_MESSAGE, SessionError},
    models::{ResolveResponse, ResultCode, SubmitRequest},
    notice::{Notice, Notifier},
};

pub const CAMERA_DENIED_MESSAGE: &str = "Please grant camera permission";
pub const SINGLE_CAMERA_MESSAGE: &str = "Only one camera available";
pub const RESOLVED_MESSAGE: &str = "Bottle list loaded";
pub const SUBMITTED_MESSAGE: &str = "Bottles saved";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Scanning,
    Resolving,
    ReadyForReview,
    Submitting,
    Submitted,
}

impl State {
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Resolving | Self::Submitting)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Resolving => "resolving",
            Self::ReadyForReview => "ready for review",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
        })
    }
}

pub struct BottleSession<A: SampleApi, C: Camera, N: Notifier> {
    api: A,
    camera: C,
    notifier: N,
    state: State,
    scan: ScanSession,
    scanned_text: String,
    active_sample: Option<String>,
    active_bottle: Option<String>,
    checklist: BottleChecklist,
}

impl<A: SampleApi, C: Camera, N: Notifier> BottleSession<A, C, N> {
    pub fn new(api: A, camera: C, notifier: N) -> Self {
        Self {
            api,
            camera,
            notifier,
            state: State::Idle,
            scan: ScanSession::default(),
            scanned_text: String::new(),
            active_sample: None,
            active_bottle: None,
            checklist: BottleChecklist::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn scan(&self) -> &ScanSession {
        &self.scan
    }

    pub fn checklist(&self) -> &BottleChecklist {
        &self.checklist
    }

    pub fn scanned_text(&self) -> &str {
        &self.scanned_text
    }

    pub fn active_sample(&self) -> Option<&str> {
        self.active_sample.as_deref()
    }

    pub fn active_bottle(&self) -> Option<&str> {
        self.active_bottle.as_deref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Quantity editing is offered only for composite sample numbers.
    pub fn quantity_input_visible(&self) -> bool {
        self.active_bottle.is_some() && self.scanned_text.contains('/')
    }

    pub fn can_submit(&self) -> bool {
        self.state == State::ReadyForReview && !self.scanned_text.trim().is_empty()
    }

    /// Starts the camera, replacing any camera already running.
    pub async fn open_scanner(&mut self) -> Result<State, SessionError> {
        self.ensure_idle_enough()?;
        self.release_camera();

        match self.acquire_camera().await {
            Ok(()) => {
                info!("Scanner open, facing {}", self.scan.facing);
                self.state = State::Scanning;
            }
            Err(e) => {
                warn!("Camera unavailable: {e}");
                self.notifier.notify(Notice::error(CAMERA_DENIED_MESSAGE));
                self.state = self.settled_state();
            }
        }

        Ok(self.state)
    }

    /// Closes the scanner overlay without a result.
    pub fn close_scanner(&mut self) -> State {
        self.release_camera();
        if self.state == State::Scanning {
            self.state = self.settled_state();
        }

        self.state
    }

    /// Waits for the camera to decode something and resolves it.
    pub async fn next_scan(&mut self) -> Result<State, SessionError> {
        self.expect_state("read the scanner", State::Scanning)?;

        match self.camera.next_payload().await {
            Some(text) => self.on_decoded(text).await,
            None => {
                debug!("Decoder stopped without a payload");
                Ok(self.close_scanner())
            }
        }
    }

    pub async fn on_decoded(&mut self, text: String) -> Result<State, SessionError> {
        self.expect_state("accept a scan", State::Scanning)?;
        self.release_camera();

        info!("Decoded {text}");
        self.scanned_text = text.clone();

        self.resolve(text).await
    }

    pub fn set_manual_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_idle_enough()?;
        self.scanned_text = text.into();

        Ok(())
    }

    /// Focus left the sample number field.
    pub async fn blur_manual(&mut self) -> Result<State, SessionError> {
        self.ensure_idle_enough()?;
        if self.state == State::Scanning {
            return Err(SessionError::InvalidState {
                action: "type a sample number",
                state: self.state,
            });
        }

        let candidate = self.scanned_text.trim().to_string();
        if candidate.is_empty() {
            return Ok(self.state);
        }

        self.resolve(candidate).await
    }

    pub fn select_bottle(&mut self, koding: &str) -> Result<(), SessionError> {
        self.expect_state("select a bottle", State::ReadyForReview)?;
        if !self.checklist.contains(koding) {
            return Err(SessionError::UnknownBottle(koding.to_string()));
        }

        self.active_bottle = Some(koding.to_string());

        Ok(())
    }

    /// Overwrites a prepared count, clamped to `[0, disiapkan]`.
    pub fn set_quantity(&mut self, koding: &str, jumlah: u32) -> Result<u32, SessionError> {
        self.expect_state("edit a quantity", State::ReadyForReview)?;

        self.checklist
            .set_quantity(koding, jumlah)
            .ok_or_else(|| SessionError::UnknownBottle(koding.to_string()))
    }

    /// Flips between back and front camera when there is more than one.
    pub async fn toggle_camera(&mut self) -> Result<Facing, SessionError> {
        self.ensure_idle_enough()?;

        if !self.scan.can_switch() {
            self.notifier.notify(Notice::error(SINGLE_CAMERA_MESSAGE));
            return Ok(self.scan.facing);
        }

        self.scan.facing = self.scan.facing.flipped();
        debug!("Facing switched to {}", self.scan.facing);

        if self.state == State::Scanning {
            self.release_camera();

            if let Err(e) = self.acquire_camera().await {
                warn!("Camera unavailable after switch: {e}");
                self.notifier.notify(Notice::error(CAMERA_DENIED_MESSAGE));
                self.state = self.settled_state();
            }
        }

        Ok(self.scan.facing)
    }

    pub async fn submit(&mut self) -> Result<State, SessionError> {
        self.ensure_idle_enough()?;
        self.expect_state("submit", State::ReadyForReview)?;

        if self.scanned_text.trim().is_empty() {
            return Err(SessionError::EmptySample);
        }
        let Some(no_sampel) = self.active_sample.clone() else {
            return Err(SessionError::NoSample);
        };

        self.state = State::Submitting;
        info!("Submitting {} bottles for {no_sampel}", self.checklist.len());

        let result = {
            let request = SubmitRequest {
                no_sampel: &no_sampel,
                data_botol: self.checklist.entries(),
                scanned_data: &self.scanned_text,
            };

            self.api.submit_checklist(&request).await
        };

        match result {
            Ok(response) if response.status == ResultCode::CREATED => {
                let message = response.message.unwrap_or_else(|| SUBMITTED_MESSAGE.to_string());
                self.notifier.notify(Notice::success(message));

                self.release_camera();
                self.clear();
                self.state = State::Submitted;
            }
            Ok(response) => {
                warn!("Submit rejected with {:?}", response.status);
                self.notifier.notify(Notice::error(rejection(response.message)));
                self.state = State::ReadyForReview;
            }
            Err(e) => {
                warn!("Submit failed: {e}");
                self.notifier.notify(Notice::error(e.user_message()));
                self.state = State::ReadyForReview;
            }
        }

        Ok(self.state)
    }

    /// Drops everything and goes back to `Idle`.
    pub fn cancel(&mut self) -> State {
        self.release_camera();
        self.clear();
        self.state = State::Idle;

        self.state
    }

    async fn resolve(&mut self, sample_id: String) -> Result<State, SessionError> {
        self.state = State::Resolving;
        info!("Resolving sample {sample_id}");

        match self.api.resolve_sample(&sample_id).await {
            Ok(response) if response.status == ResultCode::OK => {
                self.apply_resolved(sample_id, response);
            }
            Ok(response) => {
                warn!("Resolve rejected with {:?}", response.status);
                self.reject_resolve(rejection(response.message));
            }
            Err(e) => {
                warn!("Resolve failed: {e}");
                self.reject_resolve(e.user_message());
            }
        }

        Ok(self.state)
    }

    fn apply_resolved(&mut self, sample_id: String, response: ResolveResponse) {
        let ResolveResponse {
            message,
            no_sampel,
            data_scan,
            data_botol,
            ..
        } = response;

        let sample = if no_sampel.is_empty() {
            sample_id
        } else {
            no_sampel
        };

        let same_sample = self.active_sample.as_deref() == Some(sample.as_str());
        if !same_sample || self.checklist.is_empty() {
            if self.active_sample.is_some() && !same_sample {
                debug!("Sample changed, dropping previous checklist");
            }
            self.checklist = BottleChecklist::from_baseline(data_scan);
        }

        self.checklist.merge_all(&data_botol);
        self.active_bottle = data_botol.first().map(|delta| delta.koding.clone());
        self.active_sample = Some(sample);

        let message = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| RESOLVED_MESSAGE.to_string());
        self.notifier.notify(Notice::success(message));

        self.state = State::ReadyForReview;
    }

    fn reject_resolve(&mut self, message: String) {
        self.checklist.clear();
        self.active_sample = None;
        self.active_bottle = None;

        self.notifier.notify(Notice::error(message));
        self.state = State::Idle;
    }

    async fn acquire_camera(&mut self) -> Result<(), CameraError> {
        self.scan.cameras = self.camera.list_cameras().await?;
        self.camera.start(self.scan.facing).await?;
        self.scan.active = true;

        Ok(())
    }

    fn release_camera(&mut self) {
        if self.scan.active {
            self.camera.stop();
            self.scan.active = false;

            debug!("Camera released");
        }
    }

    fn clear(&mut self) {
        self.scanned_text.clear();
        self.checklist.clear();
        self.active_sample = None;
        self.active_bottle = None;
    }

    /// Where the session rests when no camera or request is pending.
    fn settled_state(&self) -> State {
        if self.active_sample.is_some() {
            State::ReadyForReview
        } else {
            State::Idle
        }
    }

    fn ensure_idle_enough(&self) -> Result<(), SessionError> {
        if self.state.is_busy() {
            return Err(SessionError::Busy(self.state));
        }

        Ok(())
    }

    fn expect_state(&self, action: &'static str, expected: State) -> Result<(), SessionError> {
        if self.state.is_busy() {
            return Err(SessionError::Busy(self.state));
        }
        if self.state != expected {
            return Err(SessionError::InvalidState {
                action,
                state: self.state,
            });
        }

        Ok(())
    }
}

impl<A: SampleApi, C: Camera, N: Notifier> Drop for BottleSession<A, C, N> {
    fn drop(&mut self) {
        self.release_camera();
    }
}

fn rejection(message: Option<String>) -> String {
    message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}
