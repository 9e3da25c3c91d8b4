use egui::{Color32, RichText, ScrollArea};

use crate::models::{DisplayItem, ExtractionReport};
use crate::utils::get_formatted_size;

pub fn draw_status(
    ui: &mut egui::Ui,
    status: &str,
    show_picker: bool,
    extracting: bool,
    on_pick: &mut dyn FnMut(),
    on_cancel: &mut dyn FnMut(),
) {
    ui.horizontal(|ui| {
        if show_picker && ui.button("📂 Pick a comic").clicked() {
            on_pick();
        }
        if extracting && ui.button("✖ Cancel").clicked() {
            on_cancel();
        }
        if !status.is_empty() {
            ui.label(status);
        }
    });
}

pub fn draw_failure(ui: &mut egui::Ui, message: &str, retryable: bool, on_retry: &mut dyn FnMut()) {
    ui.group(|ui| {
        ui.colored_label(Color32::RED, format!("⚠ {}", message));
        if retryable && ui.button("⟳ Retry").clicked() {
            on_retry();
        }
    });
}

pub fn summary_text(report: &ExtractionReport) -> String {
    if report.reused {
        format!("Showing previously extracted pages from {}", report.directory.display())
    } else {
        format!(
            "{} pages, {}",
            report.files_extracted,
            get_formatted_size(report.bytes_written)
        )
    }
}

pub fn draw_summary(ui: &mut egui::Ui, report: &ExtractionReport) {
    ui.label(RichText::new(summary_text(report)).italics().weak());
}

pub fn draw_pages(ui: &mut egui::Ui, items: &[DisplayItem]) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let width = ui.available_width();
            for item in items {
                match item {
                    DisplayItem::Image(path) => {
                        ui.add(egui::Image::new(item.uri()).max_width(width))
                            .on_hover_text(path.display().to_string());
                    }
                }
            }
        });
}
