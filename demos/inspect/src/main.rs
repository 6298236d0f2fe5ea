//! Loads both asset variants below an asset root and prints what the viewer
//! would show: statistics per format and the framed camera pose.
//!
//! Usage: `inspect [asset-root]`

use view_ngin::{
    config::ViewerConfig,
    controls::ViewerControl,
    resources::ModelFormat,
    session::{LoadOutcome, ViewerSession},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    view_ngin::init_logger();

    let root = std::env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    let mut session = ViewerSession::new(ViewerConfig::default().with_asset_root(root));

    for format in ModelFormat::ALL {
        session.apply(ViewerControl::SwitchFormat(format));
        match session.load(format).await {
            LoadOutcome::Applied(stats) => {
                println!("[{format}] {stats}");
                let camera = session.camera();
                println!(
                    "[{format}] camera at ({:.2}, {:.2}, {:.2}), fov {:.1} deg",
                    camera.position.x, camera.position.y, camera.position.z, camera.fov_y.0
                );
            }
            LoadOutcome::Failed(err) => println!("[{format}] failed: {err}"),
            LoadOutcome::Stale { .. } => log::warn!("[{format}] superseded"),
        }
    }
    Ok(())
}
