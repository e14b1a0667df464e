use clap::Parser;
use iced::Theme;
use std::path::PathBuf;

use flipbook_viewer::document::PageSource;
use flipbook_viewer::{FlipbookViewer, ViewerSettings};

const DEFAULT_PDF: &str = "pdf/sp1.pdf";

/// Page-flipping viewer for a PDF document or a sequence of images.
#[derive(Debug, Parser)]
#[command(name = "flipbook-viewer", version, about)]
struct Args {
    /// PDF document to display
    #[arg(long, value_name = "FILE", conflicts_with = "images")]
    pdf: Option<PathBuf>,

    /// Image files to display, one per page, in order
    #[arg(long, value_name = "FILE", num_args = 1..)]
    images: Vec<PathBuf>,

    /// Title shown in the header bar
    #[arg(long, default_value = "Flipbook")]
    title: String,

    /// Video shown in the corner overlay
    #[arg(long, value_name = "URL")]
    video: Option<String>,

    /// Link copied by the share button (defaults to the document's location)
    #[arg(long, value_name = "URL")]
    share_url: Option<String>,
}

impl Args {
    fn into_settings(self) -> ViewerSettings {
        let source = if self.images.is_empty() {
            PageSource::Pdf(self.pdf.unwrap_or_else(|| PathBuf::from(DEFAULT_PDF)))
        } else {
            PageSource::Images(self.images)
        };

        let share_url = self.share_url.unwrap_or_else(|| {
            let path = source.document_path().unwrap_or(DEFAULT_PDF.as_ref());
            let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            format!("file://{}", absolute.display())
        });

        ViewerSettings {
            source,
            title: self.title,
            share_url,
            video_url: self.video,
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter("flipbook_viewer=debug,info")
        .init();

    let settings = Args::parse().into_settings();
    tracing::info!(source = ?settings.source, "starting viewer");

    iced::application(FlipbookViewer::title, FlipbookViewer::update, FlipbookViewer::view)
        .subscription(FlipbookViewer::subscription)
        .theme(|_| Theme::Dark)
        .run_with(move || FlipbookViewer::new(settings))
}
