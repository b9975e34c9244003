use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use keypixel::app::KeyPixelApp;
use keypixel::cli::{self, CliArgs};
use keypixel::editor::{APP_NAME, EditorState};
use keypixel::logger;
use keypixel::settings::AppSettings;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Initialize session log (overwrites previous session log)
    logger::init(args.verbose);

    let settings = AppSettings::load_or_create();

    let project = match cli::open_project(&args, &settings) {
        Ok(project) => project,
        Err(e) => {
            log::error!("Startup failed: {e}");
            eprintln!("{APP_NAME}: {e}");
            if let Some(path) = logger::log_path() {
                eprintln!("Session log: {}", path.display());
            }
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Editing {} ({}x{})",
        project.path.display(),
        project.canvas.width(),
        project.canvas.height()
    );

    let state = EditorState::new(project, &settings);

    // Define the native window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width as f32, settings.window_height as f32])
            .with_title(APP_NAME),
        ..Default::default()
    };

    // Run the application
    match eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Box::new(KeyPixelApp::new(cc, state, &settings))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Window error: {e}");
            eprintln!("{APP_NAME}: {e}");
            ExitCode::FAILURE
        }
    }
}
