mod charts;
mod screens;
mod styles;
mod ui_config;
mod ui_panels;
mod ui_text;

pub(crate) use screens::render_bootstrap;

pub(crate) use styles::UiStyleExt;

pub(crate) use ui_config::{UI_CONFIG, UI_TEXT};
pub(crate) use ui_panels::UiAction;
