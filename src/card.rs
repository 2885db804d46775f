use {
    std::fmt,
    serde::{Deserialize, Serialize}
};

/// A Scryfall card object, reduced to the fields the archive keeps. The full
/// object is documented at https://scryfall.com/docs/api/cards
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub name: String,
    pub set: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<String>,
    /// Number of owned copies. Scryfall never sends this, so fresh lookups decode it as 0.
    #[serde(default)]
    pub count: u32,
    /// Market prices at lookup time. Shown when a card is added, never stored in the archive.
    #[serde(default, skip_serializing)]
    pub prices: Option<Prices>
}

/// The non-foil prices of a Scryfall card object, as decimal strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Prices {
    #[serde(default)]
    pub eur: Option<String>,
    #[serde(default)]
    pub usd: Option<String>
}

impl fmt::Display for Prices {
    /// `(0.25€ / $0.30)`, leaving out whichever currency Scryfall has no price for.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.eur, &self.usd) {
            (Some(eur), Some(usd)) => write!(f, "({}€ / ${})", eur, usd),
            (Some(eur), None) => write!(f, "({}€)", eur),
            (None, Some(usd)) => write!(f, "(${})", usd),
            (None, None) => Ok(())
        }
    }
}

impl Card {
    pub fn new(name: impl Into<String>, set: impl Into<String>) -> Card {
        Card {
            name: name.into(),
            set: set.into(),
            count: 1,
            ..Card::default()
        }
    }
}
