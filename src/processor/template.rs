//! `tmpl` filter: template expansion with a `url()` helper.
//!
//! Templates use Tera syntax and are rendered with an empty context. The
//! only helper is `url`, which turns a logical path into its public URL:
//!
//! ```text
//! background: url('{{ url(path="img/logo.png") }}');
//! ```
//!
//! renders as `/assets/img/logo.png`, or `/assets/img/logo-<fingerprint>.png`
//! with fingerprinting enabled. Referencing a file that no search path
//! contains is a render error.

use super::{ProcessContext, Processor};
use crate::asset::UrlResolver;
use anyhow::{Context, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Filter tag the template processor is registered under.
pub const TEMPLATE_TAG: &str = "tmpl";

/// Name the raw template is registered under inside Tera.
const TEMPLATE_NAME: &str = "asset";

/// Template processor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateProcessor;

impl Processor for TemplateProcessor {
    fn process(&self, cx: &ProcessContext<'_>, content: &str, _tag: &str) -> Result<String> {
        let mut tera = Tera::default();
        tera.register_function("url", UrlFunction(cx.store.url_resolver()));
        tera.add_raw_template(TEMPLATE_NAME, content)
            .with_context(|| format!("invalid template in `{}`", cx.path.display()))?;

        let rendered = tera.render(TEMPLATE_NAME, &tera::Context::new())?;
        Ok(rendered)
    }
}

/// `url(path="...")`
struct UrlFunction(UrlResolver);

impl tera::Function for UrlFunction {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg("url() takes a string `path` argument"))?;

        self.0
            .url_for(path)
            .map(Value::String)
            .map_err(|e| tera::Error::chain(format!("url(path=\"{path}\")"), e))
    }

    fn is_safe(&self) -> bool {
        true
    }
}
