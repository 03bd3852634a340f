mod app;
mod document;
mod error;
mod file_watcher;
mod jvg;
mod renderer;
mod tabs;
mod ui;
mod view_transform;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "svg-viewer",
    version,
    disable_version_flag = true,
    about = "A tabbed SVG and jvg viewer with live reload"
)]
struct Cli {
    /// SVG or jvg files to open, one tab each
    files: Vec<PathBuf>,

    /// Print version
    #[arg(short = 'v', long)]
    version: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.version {
        println!("svg-viewer {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([400.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "SVG Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(app::ViewerApp::new(cli.files)))),
    )
}
