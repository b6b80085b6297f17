mod app;
mod project;
mod util;

use std::path::PathBuf;

use clap::Parser;

use crate::project::ProjectSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to a project graph JSON file. Falls back to built-in mock data.
    #[arg(long)]
    project: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let source = match args.project {
        Some(path) => ProjectSource::File(path),
        None => ProjectSource::Mock,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "code-visual",
        options,
        Box::new(move |cc| Ok(Box::new(app::CodeVisualApp::new(cc, source.clone())))),
    )
}
