use super::error::EngineError;
use super::external::{Invocation, ProducedOutputs};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

#[derive(Debug, Clone)]
enum CachedRun {
    Produced(ProducedOutputs),
    Failed { command: String, reason: String },
}

/// Session-wide memo of external computations, keyed by [`Invocation::canonical_key`].
///
/// Each distinct invocation is computed at most once. A failed computation is remembered as
/// well and reported again to every later caller instead of being rerun.
#[derive(Debug, Default)]
pub struct ComputationCache {
    runs: HashMap<String, CachedRun>,
    executions: usize,
}

impl ComputationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(
        &mut self,
        invocation: &Invocation,
        compute: F,
    ) -> Result<ProducedOutputs, EngineError>
    where
        F: FnOnce(&Invocation, usize) -> Result<ProducedOutputs, EngineError>,
    {
        let key = invocation.canonical_key();
        let cached = match self.runs.entry(key) {
            Entry::Occupied(entry) => {
                debug!("Reusing cached computation for {}", entry.key());
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let run_index = self.executions;
                self.executions += 1;
                let run = match compute(invocation, run_index) {
                    Ok(produced) => CachedRun::Produced(produced),
                    Err(EngineError::ExternalComputationFailed { command, reason }) => {
                        CachedRun::Failed { command, reason }
                    }
                    Err(other) => return Err(other),
                };
                entry.insert(run)
            }
        };

        match cached {
            CachedRun::Produced(produced) => Ok(produced.clone()),
            CachedRun::Failed { command, reason } => Err(EngineError::ExternalComputationFailed {
                command: command.clone(),
                reason: reason.clone(),
            }),
        }
    }

    /// Number of computations actually executed this session.
    pub fn executions(&self) -> usize {
        self.executions
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
