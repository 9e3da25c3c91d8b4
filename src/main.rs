use clap::Parser;
use comic_reader::{Cli, ComicReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();
    info!("Starting Comic Reader, cache at {:?}", settings.cache_root);

    let options = eframe::NativeOptions {
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 1000.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Comic Reader",
        options,
        Box::new(move |cc| Ok(Box::new(ComicReader::new(cc, settings, cli.file)))),
    )
}
