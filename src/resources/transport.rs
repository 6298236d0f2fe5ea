//! Fetching raw asset bytes.
//!
//! Native builds read from a directory on disk, WASM builds fetch over HTTP
//! relative to the page origin. Both report progress as bytes arrive.

/// Cumulative progress of one transfer.
///
/// `total` is only known when the transport exposes it (file metadata or a
/// `Content-Length` header).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Fraction in `0.0..=1.0`, if the total is known and non-zero.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.loaded as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }
}

/// Bytes of an asset plus the transfer size the transport announced.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub data: Vec<u8>,
    pub total: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
const CHUNK_SIZE: usize = 64 * 1024;

#[cfg(target_arch = "wasm32")]
fn format_url(root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    use anyhow::anyhow;

    let window = web_sys::window().ok_or_else(|| anyhow!("no browser window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow!("page origin is not readable"))?;
    let root = root.trim_matches('/');
    let base = if root.is_empty() {
        format!("{origin}/")
    } else {
        format!("{origin}/{root}/")
    };
    let base = reqwest::Url::parse(&base)?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary_with_progress<F>(
    root: &str,
    file_name: &str,
    mut on_progress: F,
) -> anyhow::Result<Fetched>
where
    F: FnMut(LoadProgress),
{
    #[cfg(target_arch = "wasm32")]
    let fetched = {
        let url = format_url(root, file_name)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        let total = response.content_length();
        let data = response.bytes().await?.to_vec();
        on_progress(LoadProgress {
            loaded: data.len() as u64,
            total,
        });
        Fetched { data, total }
    };
    #[cfg(not(target_arch = "wasm32"))]
    let fetched = {
        use anyhow::Context;
        use tokio::io::AsyncReadExt;

        let path = std::path::Path::new(root).join(file_name);
        let mut file = tokio::fs::File::open(&path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;
        let total = file.metadata().await.ok().map(|meta| meta.len());
        let mut data = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            let read = file
                .read(&mut chunk)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            if read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..read]);
            on_progress(LoadProgress {
                loaded: data.len() as u64,
                total,
            });
        }
        Fetched { data, total }
    };

    Ok(fetched)
}

pub async fn load_binary(root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    Ok(load_binary_with_progress(root, file_name, |_| {}).await?.data)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("view-ngin-transport-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn reports_cumulative_progress_with_the_file_size() {
        let dir = scratch_dir("progress");
        let payload = vec![7u8; CHUNK_SIZE * 2 + 10];
        std::fs::write(dir.join("blob.bin"), &payload).unwrap();

        let mut events = Vec::new();
        let fetched = load_binary_with_progress(dir.to_str().unwrap(), "blob.bin", |p| {
            events.push(p)
        })
        .await
        .unwrap();

        assert_eq!(fetched.data, payload);
        assert_eq!(fetched.total, Some(payload.len() as u64));
        assert!(events.len() >= 2);
        assert!(events.windows(2).all(|w| w[0].loaded < w[1].loaded));
        let last = events.last().unwrap();
        assert_eq!(last.loaded, payload.len() as u64);
        assert_eq!(last.fraction(), Some(1.0));
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = scratch_dir("missing");
        let err = load_binary(dir.to_str().unwrap(), "nope.glb").await.unwrap_err();
        assert!(format!("{err:#}").contains("nope.glb"));
    }

    #[test]
    fn unknown_total_has_no_fraction() {
        let progress = LoadProgress {
            loaded: 10,
            total: None,
        };
        assert_eq!(progress.fraction(), None);
    }
}
