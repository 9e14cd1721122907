mod account;
mod market;
mod series;

pub use {
    account::{Character, CharacterRoster, GoldHistoryPoint},
    market::{ItemHistory, PricePoint, Reagent, Recipe, RecipeSearchResult, TokenPrice, WatchedItem},
    series::{DashboardTab, HistoryRange, SeriesId},
};

pub(crate) use {account::GoldHistoryResponse, market::ErrorDetail};
