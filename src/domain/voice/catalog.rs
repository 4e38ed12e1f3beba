use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Voice names that tend to sound natural, in order of preference
const PREFERRED_VOICE_MARKERS: &[&str] = &["Google", "Natural", "Samantha"];
const VENDOR_PREFIXES: &[&str] = &["Microsoft ", "Google "];

/// A voice offered by the speaking platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub lang: String,
}

impl Voice {
    /// Name without the vendor prefix
    pub fn display_name(&self) -> String {
        VENDOR_PREFIXES
            .iter()
            .fold(self.name.clone(), |name, prefix| name.replace(prefix, ""))
    }

    pub fn is_english(&self) -> bool {
        self.lang.to_lowercase().starts_with("en")
    }
}

/// Voice as shown to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub lang: String,
    pub default: bool,
}

/// Voices reported by the speaking platform.
///
/// Only English voices are kept. The controller just stores an identifier;
/// the catalog's only job is "exists, or fall back to the default".
#[derive(Debug, Default)]
pub struct VoiceCatalog {
    voices: RwLock<Vec<Voice>>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog with what the platform currently offers
    pub fn replace(&self, voices: Vec<Voice>) -> usize {
        let english: Vec<Voice> = voices.into_iter().filter(Voice::is_english).collect();
        let count = english.len();
        match self.voices.write() {
            Ok(mut guard) => *guard = english,
            Err(poisoned) => *poisoned.into_inner() = english,
        }
        tracing::info!(voice_count = count, "Voice catalog updated");
        count
    }

    pub fn list(&self) -> Vec<Voice> {
        match self.voices.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Preferred voice: a natural-sounding one if offered, else the first
    pub fn default_voice(&self) -> Option<Voice> {
        let voices = self.list();
        voices
            .iter()
            .find(|v| PREFERRED_VOICE_MARKERS.iter().any(|marker| v.name.contains(marker)))
            .or_else(|| voices.first())
            .cloned()
    }

    /// Resolve a requested voice id.
    ///
    /// Unknown ids fall back to the default voice. While the platform has not
    /// reported any voices there is nothing to check against, so the request is
    /// kept as is.
    pub fn resolve(&self, requested: Option<&str>) -> Option<String> {
        if self.is_empty() {
            return requested.map(str::to_string);
        }
        if let Some(id) = requested {
            if self.list().iter().any(|v| v.id == id) {
                return Some(id.to_string());
            }
            tracing::warn!(requested_voice = id, "Unknown voice requested, using default");
        }
        self.default_voice().map(|v| v.id)
    }

    pub fn responses(&self) -> Vec<VoiceResponse> {
        let default_id = self.default_voice().map(|v| v.id);
        self.list()
            .into_iter()
            .map(|v| VoiceResponse {
                display_name: v.display_name(),
                default: default_id.as_deref() == Some(v.id.as_str()),
                id: v.id,
                name: v.name,
                lang: v.lang,
            })
            .collect()
    }
}
