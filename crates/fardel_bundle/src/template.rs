//! Destination template interpolation.

use fardel_common::ContentHash;

use crate::error::BundleError;

/// Interpolates hash placeholders into a destination template.
///
/// Recognized placeholders: `[setHash]`, `[bundleHash]` and its alias
/// `[hash]`, and `[primaryModuleHash]`. The latter requires a root module
/// and fails for implicit bundles.
pub fn interpolate(
    template: &str,
    set_hash: &ContentHash,
    bundle_hash: &ContentHash,
    root: Option<&ContentHash>,
) -> Result<String, BundleError> {
    let mut dest = template.replace("[setHash]", &set_hash.to_hex());
    let bundle_hex = bundle_hash.to_hex();
    dest = dest.replace("[bundleHash]", &bundle_hex);
    dest = dest.replace("[hash]", &bundle_hex);
    if dest.contains("[primaryModuleHash]") {
        match root {
            Some(root) => dest = dest.replace("[primaryModuleHash]", &root.to_hex()),
            None => {
                return Err(BundleError::RootlessTemplate {
                    template: template.to_string(),
                })
            }
        }
    }
    Ok(dest)
}
