use escom_shared::viewport::{AssetError, AssetProvider, Bitmap};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// The campus map bundled with the web app, resolved inside the source tree.
pub const BUNDLED_MAP_IMAGE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../frontend/assets/escom_mapa.png"
);

/// Background image read from a PNG file on disk.
pub struct FileAssets {
    path: PathBuf,
}

impl FileAssets {
    pub fn new(path: &Path) -> Self {
        FileAssets {
            path: path.to_path_buf(),
        }
    }
}

impl AssetProvider for FileAssets {
    fn load_background(&self) -> Result<Bitmap, AssetError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AssetError::NotFound(self.path.display().to_string()),
            _ => AssetError::Io(e),
        })?;

        let decoder = png::Decoder::new(BufReader::new(file));
        let reader = decoder
            .read_info()
            .map_err(|e| AssetError::Decode(format!("{}: {}", self.path.display(), e)))?;
        let info = reader.info();

        tracing::debug!(path = %self.path.display(), width = info.width, height = info.height, "Decoded PNG header");

        Ok(Bitmap::new(
            self.path.display().to_string(),
            info.width,
            info.height,
        ))
    }
}
