use {
    chrono::NaiveDateTime,
    serde::{Deserialize, Serialize},
};

/// One synced game character. Money fields are in copper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    #[serde(default)]
    pub blizzard_id: i64,
    pub name: String,
    pub realm: String,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub item_level: i64,
    /// Compressed equipment JSON, passed through untouched.
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

/// Body of `GET /api/user/characters`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRoster {
    pub characters: Vec<Character>,
    pub total_gold: i64,
}

impl CharacterRoster {
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// One sample of the account-wide wealth series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldHistoryPoint {
    pub timestamp: NaiveDateTime,
    pub total_gold: i64,
}

/// Body of `GET /api/user/gold-history`. A missing `history` key reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GoldHistoryResponse {
    pub(crate) history: Vec<GoldHistoryPoint>,
}
