use std::path::{Path, PathBuf};

use tokio::{
    fs,
    io::{self, AsyncWriteExt},
};

/// Replaces the contents of `path` with `contents`. Data is written into a sibling file first and
/// then renamed over `path`, so readers see either the old or the new contents.
pub async fn replace_file(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let staging = staging_path(path);
    let mut file = fs::File::create(&staging).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    if let Err(e) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(e);
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|v| v.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
