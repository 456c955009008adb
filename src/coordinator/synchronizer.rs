//! Reconciliation of the script repository against the host registration set
//!
//! The host's set is always replaced wholesale: unregister everything, then
//! register the current active scripts. A failure anywhere in that sequence
//! leaves the host state indeterminate; the error propagates and the caller
//! is expected to retry with another full synchronization. Nothing here
//! retries automatically, and nothing here coalesces: back-to-back triggers
//! are collapsed upstream, in the coordinator's event queue, before this
//! module runs.

use super::Capability;
use crate::host::{HostError, UserScriptHost};
use crate::models::{ExecutionWorld, RegisteredScript, UserScript};
use crate::parser::{extract_match_patterns, extract_run_at};
use crate::repository::{RepositoryError, ScriptRepository};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cannot register scripts: {0}")]
    CapabilityUnavailable(String),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The registration set that should exist for the given scripts: every
/// non-paused script, with its parsed match patterns and run timing, its
/// raw body as payload, and a stable namespaced id.
pub fn desired_set(scripts: &[UserScript]) -> Vec<RegisteredScript> {
    scripts
        .iter()
        .filter(|script| !script.is_paused)
        .map(|script| RegisteredScript {
            id: RegisteredScript::id_for(script.id),
            matches: extract_match_patterns(&script.body),
            code: script.body.clone(),
            world: ExecutionWorld::UserScript,
            run_at: extract_run_at(&script.body),
        })
        .collect()
}

/// Replace the host's registration set with the repository's desired set and
/// return how many scripts are now registered.
///
/// Fails fast on a cached unavailable capability, before any host call.
pub fn synchronize(
    capability: &Capability,
    repository: &ScriptRepository,
    host: &dyn UserScriptHost,
) -> Result<usize, SyncError> {
    if let Capability::Unavailable(reason) = capability {
        return Err(SyncError::CapabilityUnavailable(reason.clone()));
    }

    let desired = desired_set(repository.scripts());
    host.unregister_all()?;
    host.register(&desired)?;
    log::debug!(
        "registered {} of {} scripts",
        desired.len(),
        repository.scripts().len()
    );
    Ok(desired.len())
}
