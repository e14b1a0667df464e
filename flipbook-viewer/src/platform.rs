//! Fire-and-forget delegations to the windowing system and the desktop.

use std::path::{Path, PathBuf};

use iced::{window, Task};

use crate::error::{Result, ViewerError};

/// Requests a window mode change, then reports the mode the window actually
/// ended up in. A refused request reports `Windowed`.
pub fn set_fullscreen<M>(enabled: bool, on_mode: fn(window::Mode) -> M) -> Task<M>
where
    M: Send + 'static,
{
    let mode = if enabled {
        window::Mode::Fullscreen
    } else {
        window::Mode::Windowed
    };

    window::get_oldest().and_then(move |id| {
        window::change_mode::<M>(id, mode).chain(window::get_mode(id).map(on_mode))
    })
}

/// There is no share sheet on the desktop, so sharing always takes the
/// clipboard path.
pub fn share_link<M>(url: String) -> Task<M>
where
    M: Send + 'static,
{
    tracing::debug!(%url, "copying share link to clipboard");
    iced::clipboard::write(url)
}

/// Hands the document to the system's default handler, which owns printing.
pub fn print(path: &Path) -> Result<()> {
    open::that_detached(path).map_err(|e| ViewerError::platform("print", e))
}

/// Opens a URL (the overlay video) in the system player or browser.
pub fn open_external(url: &str) -> Result<()> {
    open::that_detached(url).map_err(|e| ViewerError::platform("open video", e))
}

/// Asks where to save, then copies `source` there. `Ok(None)` means the
/// dialog was cancelled.
pub async fn download(source: PathBuf, suggested_name: String) -> Result<Option<PathBuf>> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .set_title("Download")
        .set_file_name(suggested_name)
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let target = handle.path().to_path_buf();
    copy_file(&source, &target).await?;
    Ok(Some(target))
}

async fn copy_file(source: &Path, target: &Path) -> Result<()> {
    tokio::fs::copy(source, target)
        .await
        .map_err(|e| ViewerError::platform("download", e))?;
    Ok(())
}
