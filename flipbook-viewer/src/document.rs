//! Page sources and the pages rendered from them.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use iced::widget::image::Handle;
use lru::LruCache;

use crate::config::PAGE_CACHE_CAPACITY;
use crate::error::{Result, ViewerError};
use crate::renderer::PdfRenderer;

/// Where the pages of a viewer instance come from. Chosen once at launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// One image file per page, in order.
    Images(Vec<PathBuf>),
    /// A single paged document.
    Pdf(PathBuf),
}

impl PageSource {
    /// Location the default share link points at.
    pub fn document_path(&self) -> Option<&Path> {
        match self {
            Self::Pdf(path) => Some(path),
            Self::Images(paths) => paths.first().map(PathBuf::as_path),
        }
    }

    /// File printed or downloaded while `page` (zero-based) is visible. An
    /// image source has no single file holding every page.
    pub fn page_file(&self, page: usize) -> Option<&Path> {
        match self {
            Self::Pdf(path) => Some(path),
            Self::Images(paths) => paths.get(page).map(PathBuf::as_path),
        }
    }

    pub fn suggested_file_name(&self, page: usize) -> String {
        match self {
            Self::Pdf(_) => "flipbook.pdf".to_string(),
            Self::Images(_) => self
                .page_file(page)
                .and_then(|path| path.file_name())
                .and_then(|name| name.to_str())
                .unwrap_or("page")
                .to_string(),
        }
    }
}

/// Raw page data fetched off the UI thread.
#[derive(Debug, Clone)]
pub enum Fetched {
    Pdf(Arc<Vec<u8>>),
    Images(Vec<Handle>),
}

/// Reads the source from disk. Images are decoded here so a broken file
/// fails the load instead of rendering blank.
pub async fn fetch(source: PageSource) -> Result<Fetched> {
    match source {
        PageSource::Pdf(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| ViewerError::read(&path, e))?;
            Ok(Fetched::Pdf(Arc::new(bytes)))
        }
        PageSource::Images(paths) => {
            if paths.is_empty() {
                return Err(ViewerError::Empty);
            }

            let mut handles = Vec::with_capacity(paths.len());
            for path in &paths {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| ViewerError::read(path, e))?;
                let rgba = image::load_from_memory(&bytes)
                    .map_err(|e| ViewerError::Decode(format!("{}: {e}", path.display())))?
                    .into_rgba8();
                handles.push(Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw()));
            }
            Ok(Fetched::Images(handles))
        }
    }
}

/// PDF pages to rasterise on a blocking worker.
#[derive(Debug)]
pub struct RenderJob {
    bytes: Arc<Vec<u8>>,
    indices: Vec<usize>,
    width: u32,
}

/// Outcome of a [`RenderJob`]. Pages that failed to render are listed in
/// `requested` but absent from `pages`.
#[derive(Debug, Clone)]
pub struct RenderedPages {
    width: u32,
    requested: Vec<usize>,
    pages: Vec<(usize, Handle)>,
}

impl RenderJob {
    pub async fn run(self, renderer: PdfRenderer) -> RenderedPages {
        let width = self.width;
        let requested = self.indices.clone();

        // PDFium rasterisation is CPU-bound
        tokio::task::spawn_blocking(move || self.render(renderer))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Render task failed: {}", e);
                RenderedPages {
                    width,
                    requested,
                    pages: Vec::new(),
                }
            })
    }

    fn render(self, renderer: PdfRenderer) -> RenderedPages {
        let mut pages = Vec::with_capacity(self.indices.len());

        match renderer.load_document(&self.bytes) {
            Ok(file) => {
                for &index in &self.indices {
                    match file.render_page(index, self.width) {
                        Ok(img) => pages.push((
                            index,
                            Handle::from_rgba(img.width(), img.height(), img.into_raw()),
                        )),
                        Err(e) => tracing::error!("Failed to render page {}: {:#}", index, e),
                    }
                }
            }
            Err(e) => tracing::error!("Failed to reopen document: {:#}", e),
        }

        RenderedPages {
            width: self.width,
            requested: self.indices,
            pages,
        }
    }
}

enum Pages {
    Images(Vec<Handle>),
    Pdf {
        bytes: Arc<Vec<u8>>,
        page_count: usize,
        // (page_index, pixel width) -> rendered image
        cache: LruCache<(usize, u32), Handle>,
        in_flight: HashSet<(usize, u32)>,
    },
}

/// A loaded document with its rendered page cache.
pub struct BookDocument {
    pages: Pages,
}

impl std::fmt::Debug for BookDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookDocument")
            .field("page_count", &self.page_count())
            .finish()
    }
}

impl BookDocument {
    pub fn from_images(handles: Vec<Handle>) -> Result<Self> {
        if handles.is_empty() {
            return Err(ViewerError::Empty);
        }

        Ok(Self {
            pages: Pages::Images(handles),
        })
    }

    pub fn from_pdf(bytes: Arc<Vec<u8>>, renderer: &PdfRenderer) -> Result<Self> {
        let page_count = renderer
            .load_document(&bytes)
            .map(|file| file.page_count())
            .map_err(|e| ViewerError::Decode(format!("{e:#}")))?;

        if page_count == 0 {
            return Err(ViewerError::Empty);
        }

        Ok(Self::pdf(bytes, page_count))
    }

    fn pdf(bytes: Arc<Vec<u8>>, page_count: usize) -> Self {
        let capacity = NonZeroUsize::new(PAGE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            pages: Pages::Pdf {
                bytes,
                page_count,
                cache: LruCache::new(capacity),
                in_flight: HashSet::new(),
            },
        }
    }

    pub fn page_count(&self) -> usize {
        match &self.pages {
            Pages::Images(handles) => handles.len(),
            Pages::Pdf { page_count, .. } => *page_count,
        }
    }

    /// Collects the pages of `indices` that still need rasterising at
    /// `width` pixels. Pages already cached or being rendered are skipped.
    pub fn render_job(&mut self, indices: &[usize], width: u32) -> Option<RenderJob> {
        let Pages::Pdf {
            bytes,
            page_count,
            cache,
            in_flight,
        } = &mut self.pages
        else {
            return None;
        };

        let missing: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&index| index < *page_count)
            .filter(|&index| !cache.contains(&(index, width)))
            .filter(|&index| in_flight.insert((index, width)))
            .collect();

        if missing.is_empty() {
            return None;
        }

        Some(RenderJob {
            bytes: Arc::clone(bytes),
            indices: missing,
            width,
        })
    }

    /// Stores finished pages. Failed pages become eligible for another job.
    pub fn store(&mut self, rendered: RenderedPages) {
        let Pages::Pdf {
            cache, in_flight, ..
        } = &mut self.pages
        else {
            return;
        };

        for index in rendered.requested {
            in_flight.remove(&(index, rendered.width));
        }
        for (index, handle) in rendered.pages {
            cache.put((index, rendered.width), handle);
        }
    }

    /// Rendered page if it is ready. Never renders, so it is usable from
    /// `view`.
    pub fn page(&self, index: usize, width: u32) -> Option<Handle> {
        match &self.pages {
            Pages::Images(handles) => handles.get(index).cloned(),
            Pages::Pdf { cache, .. } => cache.peek(&(index, width)).cloned(),
        }
    }
}
