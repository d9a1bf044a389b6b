//! Public URLs for `url()` references.

use super::fingerprint::{FingerprintCache, fingerprinted_name};
use super::locate::Locator;
use crate::config::EngineConfig;
use crate::error::{AssetError, AssetResult};
use crate::utils::path::clean_logical;
use std::sync::Arc;

/// Detached view of a store's lookup state, enough to compute asset URLs.
///
/// Cheap to clone; template helpers own one for the duration of a render.
#[derive(Clone)]
pub struct UrlResolver {
    locator: Locator,
    fingerprints: Arc<FingerprintCache>,
    config: EngineConfig,
}

impl UrlResolver {
    pub(crate) fn new(
        locator: Locator,
        fingerprints: Arc<FingerprintCache>,
        config: EngineConfig,
    ) -> Self {
        Self {
            locator,
            fingerprints,
            config,
        }
    }

    /// Public URL of `logical`.
    ///
    /// Only locates the file; the asset itself is not built. With
    /// fingerprinting on, the digest of the backing file is spliced into the
    /// name (`logo.png` → `logo-<fp>.png`).
    pub fn url_for(&self, logical: &str) -> AssetResult<String> {
        let relative = clean_logical(logical);
        let located = self.locator.locate(&relative)?;

        let name = if self.config.fingerprint {
            let fp = self
                .fingerprints
                .fingerprint(self.locator.fs(), &located.path)
                .map_err(|e| AssetError::Io(located.path.clone(), e))?;
            fingerprinted_name(&relative, &fp)
        } else {
            relative
        };

        Ok(self.config.public_url(&name))
    }
}
