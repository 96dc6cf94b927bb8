//! Aggregation weights, optionally hot-reloaded from a JSON file.
//!
//! JSON shape:
//! {
//!   "domain_trust": 0.3,
//!   "relevance": 0.3,
//!   "fact_check": 0.2,
//!   "bias": 0.2
//! }
//!
//! On each `current()` call we check the file's modified time and reload if changed.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::SystemTime,
};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    pub domain_trust: f64,
    pub relevance: f64,
    pub fact_check: f64,
    pub bias: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            domain_trust: 0.3,
            relevance: 0.3,
            fact_check: 0.2,
            bias: 0.2,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.domain_trust + self.relevance + self.fact_check + self.bias
    }

    /// Weights must be finite, non-negative and not all zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, w) in [
            ("domain_trust", self.domain_trust),
            ("relevance", self.relevance),
            ("fact_check", self.fact_check),
            ("bias", self.bias),
        ] {
            if !w.is_finite() || w < 0.0 {
                anyhow::bail!("weight `{name}` must be a finite, non-negative number (got {w})");
            }
        }
        if self.sum() <= 0.0 {
            anyhow::bail!("at least one weight must be positive");
        }
        Ok(())
    }
}

/// Where the aggregator gets its weights from.
#[derive(Debug)]
pub enum WeightsSource {
    Fixed(ScoreWeights),
    Hot(HotReloadWeights),
}

impl WeightsSource {
    pub fn current(&self) -> ScoreWeights {
        match self {
            Self::Fixed(w) => *w,
            Self::Hot(hot) => hot.current(),
        }
    }
}

impl Default for WeightsSource {
    fn default() -> Self {
        Self::Fixed(ScoreWeights::default())
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: ScoreWeights,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// `fallback` is served until the file exists and parses.
    pub fn new(path: impl Into<PathBuf>, fallback: ScoreWeights) -> Self {
        Self {
            path: path.into(),
            inner: RwLock::new(State {
                weights: fallback,
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the latest weights, reloading if the config file changed.
    pub fn current(&self) -> ScoreWeights {
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            // If file isn't there, we keep what we have; no reload.
            Err(_) => return self.read_state().weights,
        };

        {
            let guard = self.read_state();
            if guard.last_modified == Some(mtime) {
                return guard.weights;
            }
        }

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Double-check in case of races.
        if guard.last_modified != Some(mtime) {
            match load_weights_file(&self.path) {
                Ok(w) => {
                    info!(target: "weights", path = %self.path.display(), ?w, "weights reloaded");
                    guard.weights = w;
                }
                Err(e) => {
                    warn!(target: "weights", path = %self.path.display(), error = %e, "keeping previous weights");
                }
            }
            // Remember the mtime either way so a broken file is not re-read on every call.
            guard.last_modified = Some(mtime);
        }
        guard.weights
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load and validate weights directly (no caching). Public for tests/tools.
pub fn load_weights_file(path: &Path) -> io::Result<ScoreWeights> {
    let bytes = fs::read(path)?;
    let w: ScoreWeights = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    w.validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    Ok(w)
}
