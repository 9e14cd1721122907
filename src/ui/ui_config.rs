use {
    eframe::egui::{Color32, Frame, Margin, Stroke},
    std::time::Duration,
};

pub use crate::ui::ui_text::UI_TEXT;

/// UI Colors for consistent theming
#[derive(Clone, Copy)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subdued: Color32,
    pub gold: Color32,
    pub profit: Color32,
    pub loss: Color32,
    pub warning: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
}

/// How often the UI re-reads the snapshot when idle.
#[derive(Clone, Copy)]
pub struct RepaintConfig {
    pub steady: Duration,
    pub burst: Duration,
    pub bootstrap: Duration,
}

#[derive(Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub repaint: RepaintConfig,
    pub chart_height: f32,
}

pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::from_rgb(240, 200, 80),
        subdued: Color32::from_rgb(120, 120, 120),
        gold: Color32::from_rgb(234, 179, 8),
        profit: Color32::from_rgb(74, 222, 128),
        loss: Color32::from_rgb(248, 113, 113),
        warning: Color32::from_rgb(251, 191, 36),
        central_panel: Color32::from_rgb(18, 18, 24),
        side_panel: Color32::from_rgb(25, 25, 32),
    },
    repaint: RepaintConfig {
        steady: Duration::from_secs(5),
        burst: Duration::from_millis(500),
        bootstrap: Duration::from_millis(200),
    },
    chart_height: 180.0,
};

impl UiConfig {
    /// Frame for the Top Toolbar (Standard padding)
    pub fn top_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    /// Frame for Bottom Status bar (Tighter vertical padding)
    pub fn bottom_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::symmetric(8, 4),
            ..Default::default()
        }
    }

    pub fn central_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.central_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(12),
            ..Default::default()
        }
    }
}
