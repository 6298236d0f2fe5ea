//! Loading of GLTF/GLB assets into scene nodes.
//!
//! `transport` fetches bytes (file system on native, HTTP on the web) and
//! `scene` turns the parsed document into a detached [`SceneNode`] subtree.

use std::{fmt, path::Path, str::FromStr};

use log::debug;

use crate::{
    data_structures::scene_graph::SceneNode,
    error::{LoadFailure, UnknownFormat},
    resources::transport::{LoadProgress, load_binary, load_binary_with_progress},
};

pub mod scene;
pub mod transport;

/// The two asset variants the viewer can switch between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// JSON document with external buffers.
    Gltf,
    /// Binary container with an embedded buffer.
    Glb,
}

impl ModelFormat {
    pub const ALL: [ModelFormat; 2] = [ModelFormat::Gltf, ModelFormat::Glb];

    pub fn key(&self) -> &'static str {
        match self {
            ModelFormat::Gltf => "gltf",
            ModelFormat::Glb => "glb",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ModelFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gltf" => Ok(ModelFormat::Gltf),
            "glb" => Ok(ModelFormat::Glb),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A parsed model, ready to be inserted into the viewer scene.
#[derive(Clone, Debug)]
pub struct LoadedAsset {
    pub model: SceneNode,
    /// Transfer size of the main asset file when the transport announced it.
    pub total_bytes: Option<u64>,
}

/// Fetches, parses and converts the asset at `file_name` below `root`.
///
/// External buffers are resolved relative to the asset's directory and fetched
/// concurrently. Embedded `data:` URIs are not supported.
pub async fn load_model_gltf<F>(
    root: &str,
    file_name: &str,
    on_progress: F,
) -> Result<LoadedAsset, LoadFailure>
where
    F: FnMut(LoadProgress),
{
    let fetched = load_binary_with_progress(root, file_name, on_progress)
        .await
        .map_err(|err| LoadFailure::transport(file_name, err))?;
    let gltf = gltf::Gltf::from_slice(&fetched.data)?;

    let base_dir = Path::new(file_name)
        .parent()
        .map(|dir| dir.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();

    // Load buffers
    let mut blob = gltf.blob.as_deref();
    let mut pending = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let data = blob.take().ok_or_else(|| LoadFailure::UnsupportedBuffer {
                    index: buffer.index(),
                    reason: "binary chunk is missing".to_string(),
                })?;
                pending.push(BufferSource::Embedded(data));
            }
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                return Err(LoadFailure::UnsupportedBuffer {
                    index: buffer.index(),
                    reason: "data URIs are not supported".to_string(),
                });
            }
            gltf::buffer::Source::Uri(uri) => {
                let path = if base_dir.is_empty() {
                    uri.to_string()
                } else {
                    format!("{base_dir}/{uri}")
                };
                pending.push(BufferSource::External(path));
            }
        }
    }
    let buffers = futures::future::try_join_all(pending.into_iter().map(|source| async move {
        match source {
            BufferSource::Embedded(data) => Ok(data.to_vec()),
            BufferSource::External(path) => load_binary(root, &path)
                .await
                .map_err(|err| LoadFailure::transport(&path, err)),
        }
    }))
    .await?;
    debug!("Loaded {} buffers for {}.", buffers.len(), file_name);

    let name = Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let model = scene::to_model_node(&gltf.document, &buffers, &name)?;

    Ok(LoadedAsset {
        model,
        total_bytes: fetched.total,
    })
}

enum BufferSource<'a> {
    Embedded(&'a [u8]),
    External(String),
}
