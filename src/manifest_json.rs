//! Browser-extension manifest fragment describing the generated icons.
//!
//! The file written here, `icons.json`, holds the `icons` and
//! `action.default_icon` members of a WebExtension `manifest.json`, so it can
//! be pasted into the extension manifest as-is.

use crate::error::Result;
use crate::icon_writer::icon_file_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const MANIFEST_FILE_NAME: &str = "icons.json";

/// Size (as a string key, the way manifests spell it) to icon path.
pub type IconMap = BTreeMap<String, String>;

/// Root of the manifest fragment
#[derive(Serialize, Debug, Clone)]
pub struct IconManifest {
    /// Icons used on the extensions page and in the store listing
    pub icons: IconMap,

    /// Toolbar button configuration
    pub action: Action,
}

#[derive(Serialize, Debug, Clone)]
pub struct Action {
    /// Icons shown in the browser toolbar
    pub default_icon: IconMap,
}

impl IconManifest {
    /// Builds a manifest for `sizes`, with each path prefixed by `folder`
    /// (the output directory as seen from the extension root).
    pub fn new(folder: &str, sizes: &[u32]) -> Self {
        let icons: IconMap = sizes
            .iter()
            .map(|size| (size.to_string(), format!("{folder}/{}", icon_file_name(*size))))
            .collect();

        Self {
            action: Action {
                default_icon: icons.clone(),
            },
            icons,
        }
    }
}

/// Writes `icons.json` into `dir`. Paths inside are relative to the parent of
/// `dir`, which is where an extension's `manifest.json` lives.
pub fn write_manifest(dir: &Path, sizes: &[u32]) -> Result<()> {
    let folder = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());

    let manifest = IconManifest::new(&folder, sizes);
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(dir.join(MANIFEST_FILE_NAME), json)?;

    println!("  ✓ Generated {MANIFEST_FILE_NAME}");
    Ok(())
}
