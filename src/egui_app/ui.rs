//! egui renderer for the predictor form.
use eframe::egui::{self, Color32, DragValue, RichText, Ui, Vec2};

use crate::egui_app::controller::PredictorController;
use crate::inference::ArtifactPaths;
use crate::wine::QualityTier;

/// Minimum window size that keeps both input columns readable.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(720.0, 560.0);

/// Fields shown in the left column; the rest go on the right.
const LEFT_COLUMN_FIELDS: usize = 5;

const TITLE: &str = "Red Wine Quality Prediction";
const INTRO: &str = "Enter the physicochemical measurements of a red wine to estimate its quality \
    on a 0 to 10 scale.";
const MODEL_CAPTION: &str =
    "Model: random forest regressor trained on the UCI red wine quality dataset.";

/// Renders the predictor form on top of a [`PredictorController`].
pub struct EguiApp {
    controller: PredictorController,
    error: Option<String>,
}

impl EguiApp {
    /// Create the app and load the artifacts up front.
    ///
    /// A missing or unreadable artifact is not fatal here; the window opens and shows the error
    /// instead of a prediction.
    pub fn new(paths: ArtifactPaths) -> Self {
        let controller = PredictorController::new(paths);
        let error = controller.ensure_loaded().err();
        Self { controller, error }
    }

    fn render_fields(&mut self, ui: &mut Ui) {
        let fields: Vec<_> = self.controller.form.fields().collect();
        let mut edits = Vec::new();
        ui.columns(2, |columns| {
            for (index, spec, value) in fields {
                let column = if index < LEFT_COLUMN_FIELDS { 0 } else { 1 };
                let ui = &mut columns[column];
                let mut edited = value;
                ui.label(spec.label);
                let response = ui.add(
                    DragValue::new(&mut edited)
                        .range(spec.min..=spec.max)
                        .speed(spec.step)
                        .fixed_decimals(spec.decimals),
                );
                if response.changed() {
                    edits.push((index, edited));
                }
                ui.add_space(6.0);
            }
        });
        for (index, value) in edits {
            self.controller.set_field(index, value);
        }
    }

    fn render_result(&mut self, ui: &mut Ui) {
        if let Some(error) = &self.error {
            ui.colored_label(Color32::from_rgb(220, 80, 80), error);
            return;
        }
        let Some(prediction) = self.controller.last_prediction() else {
            return;
        };
        ui.label(
            RichText::new(format!(
                "Predicted Wine Quality: {:.2} / 10",
                prediction.rounded
            ))
            .size(20.0)
            .strong(),
        );
        ui.label(RichText::new(prediction.tier.message()).color(tier_color(prediction.tier)));
    }
}

fn tier_color(tier: QualityTier) -> Color32 {
    match tier {
        QualityTier::High => Color32::from_rgb(90, 190, 110),
        QualityTier::Average => Color32::from_rgb(100, 150, 230),
        QualityTier::Low => Color32::from_rgb(230, 170, 60),
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(TITLE);
                ui.label(INTRO);
                ui.separator();
                self.render_fields(ui);
                ui.separator();
                if ui.button("Predict Quality").clicked() {
                    self.error = self.controller.predict().err();
                }
                ui.add_space(8.0);
                self.render_result(ui);
                ui.add_space(12.0);
                ui.small(MODEL_CAPTION);
            });
        });
    }
}
