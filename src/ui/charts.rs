use {
    crate::{
        domain::{GoldHistoryPoint, PricePoint},
        ui::{UI_CONFIG, UI_TEXT, UiStyleExt},
        utils::{copper_to_gold_f64, epoch_sec_to_local},
    },
    eframe::egui::{Color32, Ui},
    egui_plot::{Line, Plot, PlotPoints},
};

/// Price series in gold over unix-seconds x, oldest first.
pub(crate) fn price_points(history: &[PricePoint]) -> Vec<[f64; 2]> {
    let mut points: Vec<[f64; 2]> = history
        .iter()
        .map(|p| [p.last_updated_timestamp, copper_to_gold_f64(p.price)])
        .collect();
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    points
}

pub(crate) fn gold_points(history: &[GoldHistoryPoint]) -> Vec<[f64; 2]> {
    let mut points: Vec<[f64; 2]> = history
        .iter()
        .map(|p| {
            [
                p.timestamp.and_utc().timestamp() as f64,
                copper_to_gold_f64(p.total_gold),
            ]
        })
        .collect();
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    points
}

pub(crate) fn render_series_chart(
    ui: &mut Ui,
    id: &str,
    name: &str,
    points: Vec<[f64; 2]>,
    color: Color32,
) {
    if points.is_empty() {
        ui.label_subdued(&UI_TEXT.db_no_history);
        return;
    }
    Plot::new(id)
        .height(UI_CONFIG.chart_height)
        .allow_scroll(false)
        .allow_drag(false)
        .show_axes([true, true])
        .x_axis_formatter(|mark, _range| epoch_sec_to_local(mark.value as i64))
        .label_formatter(|_, value| {
            format!("{}\n{:.0}g", epoch_sec_to_local(value.x as i64), value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(name, PlotPoints::new(points)).color(color));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_points_are_time_ordered_gold() {
        let history = vec![
            PricePoint {
                price: 3_000_000,
                last_updated_timestamp: 200.0,
            },
            PricePoint {
                price: 2_500_000,
                last_updated_timestamp: 100.0,
            },
        ];
        assert_eq!(price_points(&history), vec![[100.0, 250.0], [200.0, 300.0]]);
    }
}
