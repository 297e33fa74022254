//! Codec provider seam and its shared, reference-counted handle
//!
//! The erasure transform itself is opaque. It is injected as a
//! [`CodecProvider`] produced by a [`ProviderLoader`]. A [`SharedProvider`]
//! keeps one loaded instance for as many holders as need it:
//! - first acquirer loads the provider
//! - each further acquirer bumps the count
//! - dropping a [`ProviderLease`] decrements, unloading at zero
//!
//! All of this happens under a single mutex. Provider operations themselves
//! run outside the lock; implementations must tolerate concurrent calls on
//! disjoint buffers.

use crate::error::{Result, StripeGateError};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Nonzero status reported by a failed restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecStatus(pub i32);

impl fmt::Display for CodecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "codec status {}", self.0)
    }
}

/// The external erasure transform.
///
/// Arrays indexed by shard id always have length `n`; absent shards are
/// `None`.
pub trait CodecProvider: Send + Sync {
    /// Split `input` into `n` chunks of `input.len() / k` bytes each.
    ///
    /// `out` holds one pre-sized, zeroed buffer per shard. Chunks must be
    /// written in place: replacing or resizing a buffer is an invariant
    /// violation. `input.len()` is a multiple of both `k` and the base
    /// alignment.
    fn split(&self, input: &[u8], out: &mut [Vec<u8>]);

    /// Reconstruct the `out.len()` byte original from a sparse chunk array
    fn restore(
        &self,
        out: &mut [u8],
        input: &[Option<&[u8]>],
    ) -> std::result::Result<(), CodecStatus>;

    /// Whether `restore` can handle this particular combination of chunks
    fn can_restore(&self, input: &[Option<&[u8]>]) -> bool;
}

/// Produces and disposes of codec provider instances
pub trait ProviderLoader: Send + Sync {
    /// Obtain a provider; `ProviderUnavailable` when none can be produced
    fn load(&self) -> Result<Arc<dyn CodecProvider>>;

    /// Release a provider obtained from `load`
    fn unload(&self, _provider: Arc<dyn CodecProvider>) {}
}

/// Loader handing out a provider built up front
pub struct StaticLoader {
    provider: Arc<dyn CodecProvider>,
}

impl StaticLoader {
    pub fn new(provider: impl CodecProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

impl ProviderLoader for StaticLoader {
    fn load(&self) -> Result<Arc<dyn CodecProvider>> {
        Ok(Arc::clone(&self.provider))
    }
}

struct ProviderState {
    provider: Option<Arc<dyn CodecProvider>>,
    refs: usize,
}

/// Reference-counted owner of the loaded provider
pub struct SharedProvider {
    loader: Box<dyn ProviderLoader>,
    state: Mutex<ProviderState>,
}

impl SharedProvider {
    pub fn new(loader: impl ProviderLoader + 'static) -> Arc<Self> {
        Arc::new(Self {
            loader: Box::new(loader),
            state: Mutex::new(ProviderState {
                provider: None,
                refs: 0,
            }),
        })
    }

    /// Convenience constructor around a [`StaticLoader`]
    pub fn from_provider(provider: impl CodecProvider + 'static) -> Arc<Self> {
        Self::new(StaticLoader::new(provider))
    }

    /// Take a reference, loading the provider if this is the first one
    pub fn acquire(self: &Arc<Self>) -> Result<ProviderLease> {
        let mut state = self.state.lock();

        let provider = match &state.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                debug!("Loading codec provider");
                let provider = self.loader.load().map_err(|e| match e {
                    StripeGateError::ProviderUnavailable(_) => e,
                    other => StripeGateError::ProviderUnavailable(other.to_string()),
                })?;
                state.provider = Some(Arc::clone(&provider));
                info!("Codec provider loaded");
                provider
            }
        };
        state.refs += 1;

        Ok(ProviderLease {
            shared: Arc::clone(self),
            provider,
        })
    }

    /// Number of outstanding leases
    pub fn ref_count(&self) -> usize {
        self.state.lock().refs
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().provider.is_some()
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.refs = state.refs.saturating_sub(1);
        if state.refs == 0 {
            if let Some(provider) = state.provider.take() {
                self.loader.unload(provider);
                info!("Codec provider unloaded");
            }
        }
    }
}

/// One counted reference to the loaded provider
pub struct ProviderLease {
    shared: Arc<SharedProvider>,
    provider: Arc<dyn CodecProvider>,
}

impl ProviderLease {
    pub fn provider(&self) -> &dyn CodecProvider {
        self.provider.as_ref()
    }
}

impl Drop for ProviderLease {
    fn drop(&mut self) {
        self.shared.release();
    }
}
