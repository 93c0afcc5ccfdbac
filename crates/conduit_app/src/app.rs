// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application shell: demo pipeline, event pump, and the editor panel.

use conduit_canvas::{Canvas, CanvasConfig, EditorView};
use conduit_host::{InputPortSpec, MemoryHost, OutputPortSpec, PipelineHost};

/// The demo application: an in-memory host driven by the canvas.
pub struct ConduitApp {
    host: MemoryHost,
    canvas: Canvas,
    view: EditorView,
    needs_fit: bool,
}

impl ConduitApp {
    /// Build the app with a small example pipeline.
    pub fn new(config: CanvasConfig) -> Self {
        let mut host = MemoryHost::new();
        seed_pipeline(&mut host);

        let mut canvas = Canvas::new(config);
        canvas.sync_full(&mut host);
        // The seeding above queued notifications the full sync already
        // covered; reconciliation makes replaying them harmless.
        let mut app = Self {
            host,
            canvas,
            view: EditorView::new(),
            needs_fit: true,
        };
        app.pump_events();
        app
    }

    /// Deliver queued host notifications to the canvas, including any that
    /// cascade from applying earlier ones.
    fn pump_events(&mut self) {
        loop {
            let events = self.host.drain_events();
            if events.is_empty() {
                return;
            }
            for event in events {
                self.canvas.apply_event(&mut self.host, &event);
            }
        }
    }
}

impl eframe::App for ConduitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_events();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Add source").clicked() {
                    self.canvas.place_next_at(self.view.pointer_scene());
                    self.host
                        .add_source("Wavelet", vec![OutputPortSpec::new("Output", "image")]);
                }
                if ui.button("Add filter").clicked() {
                    self.canvas.place_next_at(self.view.pointer_scene());
                    self.host.add_filter(
                        "Contour",
                        vec![InputPortSpec::required("Input", vec!["image".into()])],
                        vec![OutputPortSpec::new("Output", "mesh")],
                    );
                }
                if ui.button("Add note").clicked() {
                    self.canvas.place_next_at(self.view.pointer_scene());
                    self.host.add_note("Note");
                }
                ui.separator();
                if ui.button("Auto layout").clicked() {
                    self.view.run_layout(&mut self.canvas, &mut self.host);
                }
                if ui.button("Fit").clicked() {
                    self.needs_fit = true;
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.needs_fit {
                self.view
                    .fit_to_content(&self.canvas, ui.available_rect_before_wrap());
                self.needs_fit = false;
            }
            self.view.ui(ui, &mut self.canvas, &mut self.host);
        });

        self.pump_events();
    }
}

/// A small source-filter chain to make the empty editor explorable.
fn seed_pipeline(host: &mut MemoryHost) {
    let reader = host.add_source("Sphere", vec![OutputPortSpec::new("Output", "mesh")]);
    let clip = host.add_filter(
        "Clip",
        vec![InputPortSpec::required("Input", vec!["mesh".into()])],
        vec![OutputPortSpec::new("Output", "mesh")],
    );
    let glyph = host.add_filter(
        "Glyph",
        vec![
            InputPortSpec::required("Input", vec!["mesh".into()]),
            InputPortSpec::optional("Glyph Source", vec!["mesh".into()]),
        ],
        vec![OutputPortSpec::new("Output", "mesh")],
    );
    host.add_connection(reader, 0, clip, 0);
    host.add_connection(clip, 0, glyph, 0);
}
