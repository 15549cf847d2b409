//! Lazily built, memoized message engine.
//!
//! The provider is an ordinary value owned by the host and handed to
//! whoever needs messages. The first call to [`MessageEngineProvider::shared`]
//! loads the rule set; if that fails for any reason the built-in engine is
//! cached instead. Nothing is ever reloaded.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use delphi_rules::engine::MessageEngine;
use delphi_rules::picker::{MessagePicker, SeededPicker};

use crate::config::RulesConfig;
use crate::error::{AppError, AppResult};

/// Where the rule set comes from.
#[derive(Debug, Clone)]
pub enum RuleSource {
    /// JSON file on disk
    Path(PathBuf),
    /// JSON payload already in memory
    Bytes(Vec<u8>),
}

impl RuleSource {
    fn read(&self) -> AppResult<Vec<u8>> {
        match self {
            RuleSource::Path(path) => std::fs::read(path).map_err(|source| AppError::Io {
                path: path.display().to_string(),
                source,
            }),
            RuleSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Compute-once holder for the shared [`MessageEngine`].
pub struct MessageEngineProvider {
    source: RuleSource,
    picker: Option<Arc<dyn MessagePicker>>,
    engine: OnceLock<Arc<MessageEngine>>,
}

impl MessageEngineProvider {
    pub fn new(source: RuleSource) -> Self {
        Self {
            source,
            picker: None,
            engine: OnceLock::new(),
        }
    }

    /// Provider for the configured rule path, seeded if a seed is set.
    pub fn from_config(config: &RulesConfig) -> Self {
        let provider = Self::new(RuleSource::Path(config.path.clone()));
        match config.random_seed {
            Some(seed) => provider.with_picker(Arc::new(SeededPicker::new(seed))),
            None => provider,
        }
    }

    /// Use `picker` for whichever engine ends up cached.
    pub fn with_picker(mut self, picker: Arc<dyn MessagePicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Read and parse the rule set, surfacing any failure.
    pub fn load(&self) -> AppResult<MessageEngine> {
        let bytes = self.source.read()?;
        let engine = MessageEngine::from_slice(&bytes)?;
        Ok(self.attach_picker(engine))
    }

    /// The memoized engine. Loads on first call, never fails.
    pub fn shared(&self) -> Arc<MessageEngine> {
        self.engine
            .get_or_init(|| Arc::new(self.load_or_builtin()))
            .clone()
    }

    fn load_or_builtin(&self) -> MessageEngine {
        match self.load() {
            Ok(engine) => {
                tracing::info!(rules = engine.rules().len(), "Message rule set loaded");
                engine
            }
            Err(e) => {
                tracing::warn!(
                    code = e.error_code(),
                    error = %e,
                    "Failed to load message rule set, using built-in fallback"
                );
                self.attach_picker(MessageEngine::builtin())
            }
        }
    }

    fn attach_picker(&self, engine: MessageEngine) -> MessageEngine {
        match &self.picker {
            Some(picker) => engine.with_picker(Arc::clone(picker)),
            None => engine,
        }
    }
}

impl std::fmt::Debug for MessageEngineProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageEngineProvider")
            .field("source", &self.source)
            .field("loaded", &self.engine.get().is_some())
            .finish()
    }
}
