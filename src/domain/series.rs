use {
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter, EnumString, IntoStaticStr},
};

/// A named data stream mirrored from the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum SeriesId {
    TokenPrice,
    TokenHistory,
    Characters,
    WealthHistory,
    Watchlist,
    Recipes,
}

impl SeriesId {
    /// Series that keep a steady-state refresh loop for the whole mount.
    pub const STEADY: [SeriesId; 6] = [
        SeriesId::TokenPrice,
        SeriesId::TokenHistory,
        SeriesId::Characters,
        SeriesId::WealthHistory,
        SeriesId::Watchlist,
        SeriesId::Recipes,
    ];

    /// Series the burst sync session overlays after a login round-trip.
    pub const BURST: [SeriesId; 2] = [SeriesId::Characters, SeriesId::WealthHistory];
}

/// Time window accepted by the `range` query parameter of history endpoints.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum HistoryRange {
    #[default]
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    Day,
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    Week,
    #[strum(serialize = "14d")]
    #[serde(rename = "14d")]
    Fortnight,
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    Month,
}

impl HistoryRange {
    /// The backend's default window for a single watched item.
    pub const ITEM_DEFAULT: HistoryRange = HistoryRange::Fortnight;

    pub fn label(&self) -> &'static str {
        match self {
            HistoryRange::Day => "24H",
            HistoryRange::Week => "7D",
            HistoryRange::Fortnight => "14D",
            HistoryRange::Month => "30D",
        }
    }
}

/// Top-level dashboard views. Doubles as the login intent hint carried
/// through the authorization round-trip.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    #[default]
    Dashboard,
    Characters,
    Crafting,
    Settings,
}
