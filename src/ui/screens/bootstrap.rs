use {
    crate::{
        app::BootstrapState,
        engine::SyncStatus,
        ui::{UI_CONFIG, UI_TEXT, styles::status_color},
    },
    eframe::egui::{
        Align, CentralPanel, Context, Grid, Layout, ProgressBar, RichText, ScrollArea, Ui,
    },
};

pub(crate) fn render_bootstrap(ctx: &Context, state: &BootstrapState) {
    CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                RichText::new(&UI_TEXT.ls_title)
                    .size(24.0)
                    .strong()
                    .color(UI_CONFIG.colors.heading),
            );
            ui.label(
                RichText::new(&UI_TEXT.ls_subtitle)
                    .italics()
                    .color(UI_CONFIG.colors.subdued),
            );
            ui.add_space(20.0);
            let total = state.total();
            let done = state.completed + state.failed;
            let progress = if total > 0 {
                done as f32 / total as f32
            } else {
                0.0
            };
            ui.add(
                ProgressBar::new(progress)
                    .show_percentage()
                    .animate(true)
                    .text(format!("Loaded {}/{}", done, total)),
            );
            if state.failed > 0 {
                ui.add_space(5.0);
                ui.label(
                    RichText::new(format!("{} {}", state.failed, UI_TEXT.ls_failure_suffix))
                        .color(UI_CONFIG.colors.loss),
                );
            }
            ui.add_space(20.0);
        });

        render_loading_grid(ui, state);
    });
}

fn render_loading_grid(ui: &mut Ui, state: &BootstrapState) {
    ScrollArea::vertical().show(ui, |ui| {
        Grid::new("loading_grid")
            .striped(true)
            .spacing([20.0, 10.0])
            .min_col_width(250.0)
            .show(ui, |ui| {
                for (i, (series, status)) in state.rows.iter().enumerate() {
                    let status_text = match status {
                        SyncStatus::Pending => "-".to_string(),
                        SyncStatus::Syncing => UI_TEXT.ls_syncing.to_string(),
                        SyncStatus::Completed(n) => format!("+{}", n),
                        SyncStatus::Failed(_) => UI_TEXT.ls_failed.to_string(),
                    };
                    ui.horizontal(|ui| {
                        ui.set_min_width(240.0);
                        ui.label(RichText::new(series.to_string()).strong());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| match status {
                            SyncStatus::Syncing => {
                                ui.spinner();
                            }
                            SyncStatus::Failed(reason) => {
                                ui.label(RichText::new(status_text).color(status_color(status)))
                                    .on_hover_text(reason);
                            }
                            _ => {
                                ui.label(RichText::new(status_text).color(status_color(status)));
                            }
                        });
                    });

                    if (i + 1) % 3 == 0 {
                        ui.end_row();
                    }
                }
            });
    });
}
