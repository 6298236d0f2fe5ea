//! Tiny glTF assets written to a scratch directory.
//!
//! Every model holds one indexed quad whose bounds are centered at (10, 0, 0)
//! with size (2, 2, 2), wrapped in a `Root` node. Cameras are appended as
//! siblings of the quad in the given order.

use std::path::PathBuf;

use view_ngin::config::ViewerConfig;

pub const POSITIONS: [[f32; 3]; 4] = [
    [9.0, -1.0, -1.0],
    [11.0, -1.0, -1.0],
    [11.0, 1.0, 1.0],
    [9.0, 1.0, 1.0],
];
pub const INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Positions followed by indices, little endian.
pub fn bin_payload() -> Vec<u8> {
    let mut bin = Vec::new();
    for position in POSITIONS {
        for c in position {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for index in INDICES {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    bin
}

/// glTF JSON for the quad. `buffer_uri` is `None` for the GLB variant.
/// `camera_fovs` are vertical fields of view in radians.
pub fn gltf_json(buffer_uri: Option<&str>, camera_fovs: &[f32]) -> String {
    let cameras: Vec<String> = camera_fovs.iter().map(|&fov| perspective_camera(fov)).collect();
    gltf_json_with_cameras(buffer_uri, &cameras)
}

pub fn perspective_camera(yfov: f32) -> String {
    format!(
        r#"{{"type":"perspective","perspective":{{"yfov":{yfov},"znear":0.05,"zfar":500.0}}}}"#
    )
}

/// Same as [`gltf_json`] with each camera given as its raw JSON object.
pub fn gltf_json_with_cameras(buffer_uri: Option<&str>, cameras: &[String]) -> String {
    let positions_len = POSITIONS.len() * 12;
    let indices_len = INDICES.len() * 4;

    let camera_nodes: Vec<String> = (0..cameras.len())
        .map(|i| {
            format!(
                r#"{{"name":"Camera{i}","camera":{i},"translation":[0.0,0.0,{}]}}"#,
                10 + i
            )
        })
        .collect();
    let children: Vec<String> = (1..=cameras.len() + 1).map(|i| i.to_string()).collect();
    let uri = buffer_uri
        .map(|uri| format!(r#","uri":"{uri}""#))
        .unwrap_or_default();

    let mut nodes = vec![
        format!(r#"{{"name":"Root","children":[{}]}}"#, children.join(",")),
        r#"{"name":"Quad","mesh":0}"#.to_string(),
    ];
    nodes.extend(camera_nodes);
    let cameras = if cameras.is_empty() {
        String::new()
    } else {
        format!(r#","cameras":[{}]"#, cameras.join(","))
    };

    format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
            r#""nodes":[{nodes}],"#,
            r#""meshes":[{{"name":"Quad","#,
            r#""primitives":[{{"attributes":{{"POSITION":0}},"indices":1}}]}}]"#,
            r#"{cameras},"buffers":[{{"byteLength":{total}{uri}}}],"#,
            r#""bufferViews":["#,
            r#"{{"buffer":0,"byteOffset":0,"byteLength":{positions_len},"target":34962}},"#,
            r#"{{"buffer":0,"byteOffset":{positions_len},"#,
            r#""byteLength":{indices_len},"target":34963}}],"#,
            r#""accessors":["#,
            r#"{{"bufferView":0,"componentType":5126,"count":{count},"type":"VEC3","#,
            r#""min":[9.0,-1.0,-1.0],"max":[11.0,1.0,1.0]}},"#,
            r#"{{"bufferView":1,"componentType":5125,"count":{index_count},"type":"SCALAR"}}]}}"#,
        ),
        nodes = nodes.join(","),
        cameras = cameras,
        uri = uri,
        positions_len = positions_len,
        indices_len = indices_len,
        total = positions_len + indices_len,
        count = POSITIONS.len(),
        index_count = INDICES.len(),
    )
}

/// Binary container with the JSON chunk padded by spaces and the BIN chunk by zeros.
pub fn glb_bytes(camera_fovs: &[f32]) -> Vec<u8> {
    glb_from_json(gltf_json(None, camera_fovs))
}

fn glb_from_json(json: String) -> Vec<u8> {
    let mut json = json.into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin_payload();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(&bin);
    glb
}

/// Scratch asset root, removed on drop.
pub struct AssetDir {
    pub root: PathBuf,
}

impl AssetDir {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir()
            .join(format!("view-ngin-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("models")).expect("failed to create fixture dir");
        Self { root }
    }

    pub fn write(&self, file: &str, bytes: impl AsRef<[u8]>) -> u64 {
        let bytes = bytes.as_ref();
        let path = self.root.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        std::fs::write(&path, bytes).expect("failed to write fixture");
        bytes.len() as u64
    }

    /// Writes `models/model.glb`.
    pub fn with_glb(self, camera_fovs: &[f32]) -> Self {
        self.write("models/model.glb", glb_bytes(camera_fovs));
        self
    }

    /// Writes `models/model.glb` with cameras given as raw JSON objects.
    pub fn with_glb_cameras(self, cameras: &[String]) -> Self {
        self.write("models/model.glb", glb_from_json(gltf_json_with_cameras(None, cameras)));
        self
    }

    /// Writes `models/model.gltf` with its buffer in `models/model.bin`.
    pub fn with_gltf(self, camera_fovs: &[f32]) -> Self {
        self.write("models/model.gltf", gltf_json(Some("model.bin"), camera_fovs));
        self.write("models/model.bin", bin_payload());
        self
    }

    pub fn size_of(&self, file: &str) -> u64 {
        std::fs::metadata(self.root.join(file))
            .expect("fixture missing")
            .len()
    }

    pub fn config(&self) -> ViewerConfig {
        ViewerConfig::default().with_asset_root(self.root.to_string_lossy().into_owned())
    }
}

impl Drop for AssetDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
