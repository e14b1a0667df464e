use anyhow::{Context, Result};
use pdfium_render::prelude::*;

/// PDF rasteriser using pdfium-render.
///
/// The PDFium binding lives for the rest of the process, so the renderer is
/// `Copy` and can be moved into blocking render tasks.
#[derive(Clone, Copy)]
pub struct PdfRenderer {
    pdfium: &'static Pdfium,
}

impl PdfRenderer {
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .context("Failed to bind to PDFium library. Please install PDFium or download the library from https://github.com/bblanchon/pdfium-binaries")?;

        Ok(Self {
            pdfium: Box::leak(Box::new(Pdfium::new(bindings))),
        })
    }

    /// Opens a document over `bytes`. The returned file is bound to the
    /// calling thread.
    pub fn load_document<'a>(&self, bytes: &'a [u8]) -> Result<PdfFile<'a>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .context("Failed to load PDF document")?;
        Ok(PdfFile { inner: document })
    }
}

impl std::fmt::Debug for PdfRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfRenderer").finish_non_exhaustive()
    }
}

pub struct PdfFile<'a> {
    inner: PdfDocument<'a>,
}

impl PdfFile<'_> {
    pub fn page_count(&self) -> usize {
        self.inner.pages().len() as usize
    }

    /// Rasterises a page at `target_width` pixels; height follows the page's
    /// own aspect ratio.
    pub fn render_page(&self, page_index: usize, target_width: u32) -> Result<image::RgbaImage> {
        let index = u16::try_from(page_index).context("Page index out of bounds")?;
        let page = self
            .inner
            .pages()
            .get(index)
            .context("Page index out of bounds")?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width.max(1) as i32)
            .set_reverse_byte_order(true)
            .rotate_if_landscape(PdfPageRenderRotation::None, false);

        let bitmap = page
            .render_with_config(&render_config)
            .context("Failed to render page")?;

        let buffer = bitmap.as_raw_bytes();
        let img = image::RgbaImage::from_raw(bitmap.width() as u32, bitmap.height() as u32, buffer.to_vec())
            .context("Failed to create image from bitmap")?;

        Ok(img)
    }
}

impl std::fmt::Debug for PdfFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFile")
            .field("page_count", &self.page_count())
            .finish()
    }
}
