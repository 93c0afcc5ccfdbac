// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conduit network editor - standalone demo.
//!
//! Runs the pipeline canvas against an in-memory host preloaded with a small
//! example pipeline. Embedders wire the same canvas to their own
//! [`conduit_host::PipelineHost`] implementation instead.

mod app;
mod settings;

use app::ConduitApp;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("conduit_app=debug".parse().expect("static directive"))
        .add_directive("conduit_canvas=debug".parse().expect("static directive"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Starting Conduit v{}", env!("CARGO_PKG_VERSION"));

    let config = settings::load();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "Conduit",
        options,
        Box::new(move |_cc| Ok(Box::new(ConduitApp::new(config)))),
    ) {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
