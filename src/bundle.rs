//! Builder: concatenate resolved assets into one artifact.

use crate::asset::AssetStore;
use crate::error::{AssetError, AssetResult};
use crate::resolve::Resolution;

/// Serialize `resolution` in load order.
///
/// Each asset becomes `/* <logical path> */\n<content>\n`. Content comes
/// from the store's cache; an asset missing from it means the resolution
/// was produced against a different store.
pub fn build(resolution: &Resolution, store: &AssetStore) -> AssetResult<String> {
    let mut out = String::new();

    for logical in resolution.resolved() {
        let asset = store
            .cached(logical)
            .ok_or_else(|| AssetError::NotCached(logical.clone()))?;
        out.push_str("/* ");
        out.push_str(logical);
        out.push_str(" */\n");
        out.push_str(asset.content());
        out.push('\n');
    }

    Ok(out)
}
