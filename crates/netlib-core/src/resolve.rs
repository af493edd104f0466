//! Resolution chain
//!
//! Each facade resolves its backend exactly once per process:
//!
//! ```text
//!   Unresolved ──first access──► Resolving ──► Resolved(backend)
//!                                    │
//!                                    └───────► Fatal   (native-only facades)
//! ```
//!
//! Candidates are tried in priority order. A candidate that fails to construct
//! is logged and skipped; the first success wins. The outcome is memoized in a
//! [`OnceLock`]: concurrent first callers block until resolution finishes and
//! then all observe the same backend. There is no re-resolution, health check
//! or reset.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use netlib_tracing::ResolutionTimer;
use parking_lot::RwLock;

use crate::config::NativeConfig;
use crate::error::{CandidateError, NetlibError, Result};

/// One fallible backend constructor
pub struct Candidate<'a, K: ?Sized> {
    name: String,
    construct: Box<dyn FnOnce() -> std::result::Result<Arc<K>, CandidateError> + 'a>,
}

impl<'a, K: ?Sized> Candidate<'a, K> {
    pub fn new(
        name: impl Into<String>,
        construct: impl FnOnce() -> std::result::Result<Arc<K>, CandidateError> + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            construct: Box::new(construct),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<K: ?Sized> fmt::Debug for Candidate<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("name", &self.name).finish()
    }
}

/// The backend a chain settled on
pub struct Selected<K: ?Sized> {
    pub name: String,
    pub backend: Arc<K>,
}

impl<K: ?Sized> fmt::Debug for Selected<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selected").field("name", &self.name).finish()
    }
}

impl<K: ?Sized> Clone for Selected<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

/// Try `candidates` in order and return the first that constructs.
///
/// Every failure is logged as a warning naming the candidate and the reason.
pub fn first_success<'a, K: ?Sized>(
    facade: &str,
    candidates: impl IntoIterator<Item = Candidate<'a, K>>,
) -> Option<Selected<K>> {
    let _timer = ResolutionTimer::start(facade);
    candidates.into_iter().find_map(|candidate| {
        let Candidate { name, construct } = candidate;
        match construct() {
            Ok(backend) => {
                tracing::info!("Selected {} implementation: {}", facade, name);
                Some(Selected { name, backend })
            }
            Err(err) => {
                tracing::warn!("Failed to load implementation from: {}: {}", name, err);
                None
            }
        }
    })
}

/// Observable resolution state of a facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    Resolved,
    Fatal,
}

/// Process-wide memo of a facade whose chain may be exhausted.
///
/// Resolve-once, never refresh: the closure passed to the first access is the
/// only one that ever runs. An exhausted chain is memoized as fatal.
pub struct Facade<K: ?Sized> {
    name: &'static str,
    cell: OnceLock<Result<Selected<K>>>,
}

impl<K: ?Sized> Facade<K> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// This and every later access return [`NetlibError::NativeUnavailable`]
    /// when `resolve` comes back empty.
    pub fn get_or_resolve(&self, resolve: impl FnOnce() -> Option<Selected<K>>) -> Result<Selected<K>> {
        self.cell
            .get_or_init(|| {
                resolve().ok_or_else(|| {
                    tracing::error!("Unable to load native implementation for {}", self.name);
                    NetlibError::NativeUnavailable { facade: self.name }
                })
            })
            .clone()
    }

    pub fn state(&self) -> ResolutionState {
        match self.cell.get() {
            None => ResolutionState::Unresolved,
            Some(Ok(_)) => ResolutionState::Resolved,
            Some(Err(_)) => ResolutionState::Fatal,
        }
    }
}

impl<K: ?Sized> fmt::Debug for Facade<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

/// Process-wide memo of a facade whose chain ends in a candidate that cannot fail
pub struct ManagedFacade<K: ?Sized> {
    name: &'static str,
    cell: OnceLock<Selected<K>>,
}

impl<K: ?Sized> ManagedFacade<K> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get_or_init(&self, resolve: impl FnOnce() -> Selected<K>) -> Selected<K> {
        self.cell.get_or_init(resolve).clone()
    }

    pub fn state(&self) -> ResolutionState {
        match self.cell.get() {
            None => ResolutionState::Unresolved,
            Some(_) => ResolutionState::Resolved,
        }
    }
}

impl<K: ?Sized> fmt::Debug for ManagedFacade<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedFacade")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

/// Constructor of an alternate native bridge
pub type BridgeFactory<K> = fn(&NativeConfig) -> std::result::Result<Arc<K>, CandidateError>;

/// Alternate native bridges, located by name.
///
/// A name that was never registered is reported as a missing component, which
/// the chain treats like any other construction failure.
pub struct BridgeRegistry<K: ?Sized> {
    factories: RwLock<HashMap<String, BridgeFactory<K>>>,
}

impl<K: ?Sized> BridgeRegistry<K> {
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Register `factory` under `name`, replacing any previous entry
    pub fn register(&self, name: impl Into<String>, factory: BridgeFactory<K>) {
        self.factories.write().insert(name.into(), factory);
    }

    pub fn lookup(&self, name: &str) -> Option<BridgeFactory<K>> {
        self.factories.read().get(name).copied()
    }

    /// Construct the bridge registered under `name`
    pub fn construct(&self, name: &str, config: &NativeConfig) -> std::result::Result<Arc<K>, CandidateError> {
        let factory = self.lookup(name).ok_or_else(|| CandidateError::missing(name))?;
        factory(config)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<K: ?Sized> Default for BridgeRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Backend: Send + Sync {
        fn id(&self) -> &'static str;
    }

    struct Named(&'static str);

    impl Backend for Named {
        fn id(&self) -> &'static str {
            self.0
        }
    }

    fn ok(name: &'static str) -> Candidate<'static, dyn Backend> {
        Candidate::new(name, move || Ok(Arc::new(Named(name)) as Arc<dyn Backend>))
    }

    fn failing(name: &'static str) -> Candidate<'static, dyn Backend> {
        Candidate::new(name, move || Err(CandidateError::missing(name)))
    }

    #[test]
    fn first_success_skips_failures() {
        let selected = first_success("TEST", vec![failing("native"), ok("managed"), ok("reference")]).unwrap();
        assert_eq!(selected.name, "managed");
        assert_eq!(selected.backend.id(), "managed");
    }

    #[test]
    fn exhausted_chain_is_none() {
        assert!(first_success("TEST", vec![failing("a"), failing("b")]).is_none());
    }

    #[test]
    fn later_candidates_are_not_constructed() {
        let calls = AtomicUsize::new(0);
        let counted = Candidate::new("counted", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Named("counted")) as Arc<dyn Backend>)
        });
        first_success("TEST", vec![ok("first"), counted]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fatal_resolution_is_memoized() {
        let facade: Facade<dyn Backend> = Facade::new("TEST");
        let attempts = AtomicUsize::new(0);
        for _ in 0..3 {
            let result = facade.get_or_resolve(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                None
            });
            assert_eq!(result.unwrap_err(), NetlibError::NativeUnavailable { facade: "TEST" });
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(facade.state(), ResolutionState::Fatal);
    }

    #[test]
    fn resolved_backend_is_shared() {
        let facade: ManagedFacade<dyn Backend> = ManagedFacade::new("TEST");
        assert_eq!(facade.state(), ResolutionState::Unresolved);
        let first = facade.get_or_init(|| first_success("TEST", vec![ok("managed")]).unwrap());
        let second = facade.get_or_init(|| unreachable!());
        assert!(Arc::ptr_eq(&first.backend, &second.backend));
        assert_eq!(facade.state(), ResolutionState::Resolved);
    }

    #[test]
    fn concurrent_first_access_resolves_once() {
        let facade: ManagedFacade<dyn Backend> = ManagedFacade::new("TEST");
        let attempts = AtomicUsize::new(0);
        let backends: Vec<Arc<dyn Backend>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        facade
                            .get_or_init(|| {
                                attempts.fetch_add(1, Ordering::SeqCst);
                                first_success("TEST", vec![ok("managed")]).unwrap()
                            })
                            .backend
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(backends.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn registry_lookup_by_name() {
        let registry: BridgeRegistry<dyn Backend> = BridgeRegistry::new();
        let config = NativeConfig::new("NETLIB_TEST", "libtest.so", "netlib-test");
        assert!(matches!(
            registry.construct("system", &config),
            Err(CandidateError::MissingComponent { .. })
        ));

        registry.register("system", |_| Ok(Arc::new(Named("system")) as Arc<dyn Backend>));
        assert_eq!(registry.construct("system", &config).unwrap().id(), "system");
        assert_eq!(registry.names(), vec!["system".to_string()]);
    }
}
