//! Content processors, keyed by filter tag.
//!
//! A filter tag is an extra extension segment on a source file: in
//! `app.js.tmpl.coffee`, `coffee` and `tmpl` are filter tags. The store asks
//! the registry to apply each tag in turn.
//!
//! Built-in processors:
//! - [`TemplateProcessor`]: `tmpl`, template expansion with a `url()` helper
//! - [`ExternalProcessor`]: pipes content through an external compiler

mod external;
mod template;

pub use external::ExternalProcessor;
pub use template::{TEMPLATE_TAG, TemplateProcessor};

use crate::asset::AssetStore;
use crate::debug;
use crate::error::{AssetError, AssetResult};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;

/// What a processor can see while it runs.
#[derive(Clone, Copy)]
pub struct ProcessContext<'a> {
    /// Store the asset is being built in.
    pub store: &'a AssetStore,
    /// Backing file of the asset being processed.
    pub path: &'a Path,
}

/// Text-in, text-out transform bound to a filter tag.
pub trait Processor: Send + Sync {
    fn process(&self, cx: &ProcessContext<'_>, content: &str, tag: &str) -> anyhow::Result<String>;

    /// Environment check run once at registration (e.g. binary on `PATH`).
    fn check_available(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Filter tag → processor mapping.
#[derive(Default, Clone)]
pub struct ProcessorRegistry {
    processors: FxHashMap<String, Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the template filter and the `coffee` / `less` compilers.
    pub fn builtin() -> AssetResult<Self> {
        let mut registry = Self::new();
        registry
            .register(TEMPLATE_TAG, TemplateProcessor)?
            .register("coffee", ExternalProcessor::coffee())?
            .register("less", ExternalProcessor::less())?;
        Ok(registry)
    }

    /// Bind `processor` to `tag`, replacing any previous binding.
    ///
    /// Fails with [`AssetError::ProcessorUnavailable`] if the processor's
    /// environment check does not pass.
    pub fn register<P>(&mut self, tag: impl Into<String>, processor: P) -> AssetResult<&mut Self>
    where
        P: Processor + 'static,
    {
        let tag = tag.into();
        processor
            .check_available()
            .map_err(|e| AssetError::ProcessorUnavailable {
                tag: tag.clone(),
                source: e.into(),
            })?;

        debug!("filter"; "registered `{}`", tag);
        self.processors.insert(tag, Arc::new(processor));
        Ok(self)
    }

    /// Run the processor bound to `tag` over `content`.
    pub fn apply(&self, cx: &ProcessContext<'_>, content: &str, tag: &str) -> AssetResult<String> {
        let processor = self
            .processors
            .get(tag)
            .ok_or_else(|| AssetError::UnknownFilter(tag.to_string()))?;

        processor
            .process(cx, content, tag)
            .map_err(|e| AssetError::ProcessorFailure {
                tag: tag.to_string(),
                path: cx.path.to_path_buf(),
                source: e.into(),
            })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.processors.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.processors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
