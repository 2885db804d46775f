//! Card lookups against the Scryfall REST API.

use {
    std::num::NonZeroU32,
    log::debug,
    reqwest::{
        blocking::Client,
        header::{self, HeaderMap, HeaderValue}
    },
    serde::Deserialize,
    url::Url,
    crate::{
        Card,
        Error
    }
};

pub const API_ROOT: &str = "https://api.scryfall.com/";

const USER_AGENT: &str = concat!("crackathon/", env!("CARGO_PKG_VERSION"));

/// Anything that can resolve a set code and collector number to a card.
pub trait CardSource {
    /// Looks up a single card. The returned card's `count` already accounts for the copy being added.
    fn lookup(&self, set_code: &str, number: NonZeroU32) -> Result<Card, Error>;
}

pub struct Scryfall {
    client: Client,
    api_root: Url
}

impl Scryfall {
    pub fn new(api_root: &str) -> Result<Scryfall, Error> {
        let api_root = Url::parse(api_root)?;
        if api_root.cannot_be_a_base() {
            return Err(Error::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))
        }
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Scryfall { client, api_root })
    }

    /// `{api_root}/cards/{set_code}/{number}`, with the set code percent-encoded as a path segment.
    pub fn card_url(&self, set_code: &str, number: NonZeroU32) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty()
                .push("cards")
                .push(set_code)
                .push(&number.to_string());
        }
        url
    }
}

impl CardSource for Scryfall {
    fn lookup(&self, set_code: &str, number: NonZeroU32) -> Result<Card, Error> {
        let url = self.card_url(set_code, number);
        debug!("requesting {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body))
        }
        decode_card(&body)
    }
}

/// Parses a card response body and counts it as one acquired copy.
pub fn decode_card(body: &str) -> Result<Card, Error> {
    let mut card = serde_json::from_str::<Card>(body).map_err(Error::Decode)?;
    card.count = card.count.saturating_add(1);
    Ok(card)
}

#[derive(Deserialize)]
struct ErrorObject {
    details: String
}

fn api_error(status: u16, body: &str) -> Error {
    let details = match serde_json::from_str::<ErrorObject>(body) {
        Ok(ErrorObject { details }) => details,
        Err(_) => body.trim().to_owned()
    };
    Error::Api { status, details }
}
