use crate::domain::narration::{RequestHandle, SpeakRejected, SynthesisAdapter, SynthesisRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;

/// What the speaking device should currently be saying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub request_id: RequestHandle,
    pub generation: u64,
    pub index: usize,
    pub text: String,
    pub rate: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

/// Directive published to the device. `sequence` increases on every change so
/// devices can long-poll for the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDirective {
    pub sequence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utterance: Option<Utterance>,
    pub paused: bool,
}

/// Synthesis adapter whose speech engine lives on a remote device.
///
/// Speak, cancel, pause and resume only update the published directive; the
/// device polls it through `DeviceLink`, speaks the utterance, and reports
/// start/end/error back with the utterance's generation and index.
pub struct DeviceSpeechAdapter {
    next_request: u64,
    directive: watch::Sender<DeviceDirective>,
}

/// Read side of a `DeviceSpeechAdapter`
#[derive(Clone)]
pub struct DeviceLink {
    directive: watch::Receiver<DeviceDirective>,
}

impl DeviceSpeechAdapter {
    pub fn new() -> (Self, DeviceLink) {
        let (directive, receiver) = watch::channel(DeviceDirective::default());
        (
            Self {
                next_request: 0,
                directive,
            },
            DeviceLink {
                directive: receiver,
            },
        )
    }

    /// Take the utterance off the directive if it is still the one published
    fn withdraw(&mut self, handle: RequestHandle) {
        self.directive.send_if_modified(|directive| {
            let is_active = directive
                .utterance
                .as_ref()
                .is_some_and(|u| u.request_id == handle);
            if is_active {
                directive.sequence += 1;
                directive.utterance = None;
                directive.paused = false;
            }
            is_active
        });
    }
}

impl SynthesisAdapter for DeviceSpeechAdapter {
    fn speak(&mut self, request: SynthesisRequest) -> Result<RequestHandle, SpeakRejected> {
        if request.text.trim().is_empty() {
            return Err(SpeakRejected(format!("chunk {} has no text", request.index)));
        }

        self.next_request += 1;
        let handle = RequestHandle(self.next_request);
        tracing::debug!(
            request_id = handle.0,
            generation = request.generation,
            index = request.index,
            rate = request.rate,
            text_length = request.text.len(),
            "Publishing utterance to device"
        );

        self.directive.send_modify(|directive| {
            directive.sequence += 1;
            directive.paused = false;
            directive.utterance = Some(Utterance {
                request_id: handle,
                generation: request.generation,
                index: request.index,
                text: request.text,
                rate: request.rate,
                voice_id: request.voice_id,
            });
        });
        Ok(handle)
    }

    fn cancel(&mut self, handle: RequestHandle) {
        self.withdraw(handle);
    }

    fn pause_active(&mut self) {
        self.directive.send_if_modified(|directive| {
            let changed = directive.utterance.is_some() && !directive.paused;
            if changed {
                directive.sequence += 1;
                directive.paused = true;
            }
            changed
        });
    }

    fn resume_active(&mut self) {
        self.directive.send_if_modified(|directive| {
            let changed = directive.paused;
            if changed {
                directive.sequence += 1;
                directive.paused = false;
            }
            changed
        });
    }

    fn release(&mut self, handle: RequestHandle) {
        self.withdraw(handle);
    }
}

impl DeviceLink {
    pub fn current(&self) -> DeviceDirective {
        self.directive.borrow().clone()
    }

    /// Current directive, or the next one if the device already saw `since`.
    /// Gives up after `wait` and returns whatever is current.
    pub async fn next_after(&self, since: u64, wait: Duration) -> DeviceDirective {
        let mut receiver = self.directive.clone();
        let waited = tokio::time::timeout(
            wait,
            receiver.wait_for(|directive| directive.sequence != since),
        )
        .await;
        match waited {
            Ok(Ok(directive)) => directive.clone(),
            // Timed out, or the session is gone
            _ => self.current(),
        }
    }
}
