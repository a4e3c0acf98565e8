//! Deck loading: fetch a draw from the deck API or restore it from the
//! session cache, then download the face image of every card.

mod cache;
mod source;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DeckError, Result};

pub use cache::{CACHE_FILE_NAME, SessionCache};
pub use source::{DeckSource, HttpDeckSource};

/// Distinct cards per game. The board holds two of each.
pub const PAIR_COUNT: usize = 8;

/// Stable card identifier as issued by the API (`"AS"`, `"0H"`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCode(String);

impl CardCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImages {
    pub png: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub code: CardCode,
    pub images: CardImages,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suit: Option<String>,
}

impl Card {
    /// Minimal card, mostly useful for tests and fakes.
    pub fn new(code: &str, png: &str) -> Self {
        Card {
            code: CardCode::new(code),
            images: CardImages {
                png: png.to_string(),
                svg: None,
            },
            image: None,
            value: None,
            suit: None,
        }
    }

    pub fn face_url(&self) -> &str {
        &self.images.png
    }
}

/// Body of `GET /api/deck/new/draw/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct DrawResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deck_id: Option<String>,
    cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remaining: Option<u32>,
}

fn default_success() -> bool {
    true
}

/// A validated draw of exactly [`PAIR_COUNT`] distinct cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    response: DrawResponse,
}

impl Deck {
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        Self::validate(DrawResponse {
            success: true,
            deck_id: None,
            cards,
            remaining: None,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Self::from_slice(raw.as_bytes())
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        Self::validate(serde_json::from_slice(raw)?)
    }

    fn validate(response: DrawResponse) -> Result<Self> {
        if !response.success {
            return Err(DeckError::Rejected);
        }
        if response.cards.len() != PAIR_COUNT {
            return Err(DeckError::CardCount {
                expected: PAIR_COUNT,
                found: response.cards.len(),
            });
        }
        for (idx, card) in response.cards.iter().enumerate() {
            if response.cards[..idx].iter().any(|other| other.code == card.code) {
                return Err(DeckError::DuplicateCard(card.code.to_string()));
            }
        }
        Ok(Deck { response })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.response)?)
    }

    pub fn cards(&self) -> &[Card] {
        &self.response.cards
    }

    pub fn deck_id(&self) -> Option<&str> {
        self.response.deck_id.as_deref()
    }
}

/// A deck plus the downloaded PNG bytes of each card face.
#[derive(Clone, Debug)]
pub struct LoadedDeck {
    pub deck: Deck,
    pub faces: HashMap<CardCode, Vec<u8>>,
    pub from_cache: bool,
}

impl LoadedDeck {
    pub fn face(&self, code: &CardCode) -> Option<&[u8]> {
        self.faces.get(code).map(Vec::as_slice)
    }
}

pub struct DeckLoader<S> {
    source: S,
    cache: SessionCache,
    deck_url: String,
}

impl<S: DeckSource> DeckLoader<S> {
    pub fn new(source: S, cache: SessionCache, deck_url: impl Into<String>) -> Self {
        Self {
            source,
            cache,
            deck_url: deck_url.into(),
        }
    }

    /// Restore the cached deck or draw a new one.
    ///
    /// A freshly drawn deck is written to the cache once. A cached deck that
    /// does not parse is dropped from the cache and the load fails.
    pub fn load_deck(&self) -> Result<(Deck, bool)> {
        if let Some(raw) = self.cache.read()? {
            return match Deck::from_slice(&raw) {
                Ok(deck) => {
                    info!(deck_id = ?deck.deck_id(), "restored deck from session cache");
                    Ok((deck, true))
                }
                Err(err) => {
                    warn!(%err, "discarding unreadable cached deck");
                    if let Err(clear_err) = self.cache.clear() {
                        warn!(%clear_err, "failed to clear session cache");
                    }
                    Err(err)
                }
            };
        }

        debug!(url = %self.deck_url, "drawing a new deck");
        let raw = self.source.draw(&self.deck_url)?;
        let deck = Deck::from_json(&raw)?;
        info!(deck_id = ?deck.deck_id(), "drew a new deck");
        if let Err(err) = deck.to_json().and_then(|json| self.cache.write(&json)) {
            warn!(%err, "failed to store deck in session cache");
        }
        Ok((deck, false))
    }

    /// Full load: the deck and every face image.
    pub fn load(&self) -> Result<LoadedDeck> {
        let (deck, from_cache) = self.load_deck()?;
        let mut faces = HashMap::with_capacity(PAIR_COUNT);
        for card in deck.cards() {
            debug!(code = %card.code, url = card.face_url(), "fetching card face");
            let bytes = self.source.image(card.face_url())?;
            faces.insert(card.code.clone(), bytes);
        }
        Ok(LoadedDeck {
            deck,
            faces,
            from_cache,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    pub(crate) const SUITS: [&str; 4] = ["S", "H", "D", "C"];

    pub(crate) fn sample_cards() -> Vec<Card> {
        (0..PAIR_COUNT)
            .map(|i| {
                let code = format!("{}{}", (i / 4) + 2, SUITS[i % 4]);
                let png = format!("https://deckofcardsapi.com/static/img/{code}.png");
                Card::new(&code, &png)
            })
            .collect()
    }

    pub(crate) fn sample_json() -> String {
        serde_json::json!({
            "success": true,
            "deck_id": "kxozasf3edqu",
            "cards": sample_cards(),
            "remaining": 44
        })
        .to_string()
    }

    #[derive(Default)]
    struct FakeSource {
        body: String,
        draws: Cell<usize>,
        images: RefCell<Vec<String>>,
        fail_images: bool,
    }

    impl DeckSource for FakeSource {
        fn draw(&self, _url: &str) -> Result<String> {
            self.draws.set(self.draws.get() + 1);
            Ok(self.body.clone())
        }

        fn image(&self, url: &str) -> Result<Vec<u8>> {
            if self.fail_images {
                return Err(DeckError::Request("connection reset".to_string()));
            }
            self.images.borrow_mut().push(url.to_string());
            Ok(url.as_bytes().to_vec())
        }
    }

    fn loader(source: FakeSource, dir: &std::path::Path) -> DeckLoader<FakeSource> {
        DeckLoader::new(source, SessionCache::new(dir), "http://deck.test/draw")
    }

    #[test]
    fn parses_api_response() {
        let deck = Deck::from_json(&sample_json()).unwrap();
        assert_eq!(deck.cards().len(), PAIR_COUNT);
        assert_eq!(deck.deck_id(), Some("kxozasf3edqu"));
        assert_eq!(
            deck.cards()[0].face_url(),
            "https://deckofcardsapi.com/static/img/2S.png"
        );
    }

    #[test]
    fn rejects_unsuccessful_draw() {
        let raw = r#"{"success": false, "cards": []}"#;
        assert!(matches!(Deck::from_json(raw), Err(DeckError::Rejected)));
    }

    #[test]
    fn rejects_short_draw() {
        let mut cards = sample_cards();
        cards.pop();
        assert!(matches!(
            Deck::from_cards(cards),
            Err(DeckError::CardCount { expected: 8, found: 7 })
        ));
    }

    #[test]
    fn rejects_duplicate_codes() {
        let mut cards = sample_cards();
        cards[7] = cards[0].clone();
        assert!(matches!(Deck::from_cards(cards), Err(DeckError::DuplicateCard(code)) if code == "2S"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(Deck::from_json("{\"cards\": ["), Err(DeckError::Parse(_))));
    }

    #[test]
    fn fresh_draw_is_cached_once() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource {
            body: sample_json(),
            ..FakeSource::default()
        };
        let loader = loader(source, dir.path());

        let first = loader.load().unwrap();
        assert!(!first.from_cache);
        assert_eq!(loader.source.draws.get(), 1);
        assert_eq!(first.faces.len(), PAIR_COUNT);

        let second = loader.load().unwrap();
        assert!(second.from_cache);
        assert_eq!(loader.source.draws.get(), 1);
        assert_eq!(second.deck, first.deck);
    }

    #[test]
    fn cached_deck_skips_the_draw() {
        let dir = tempfile::tempdir().unwrap();
        SessionCache::new(dir.path()).write(&sample_json()).unwrap();
        let loader = loader(FakeSource::default(), dir.path());

        let loaded = loader.load().unwrap();
        assert!(loaded.from_cache);
        assert_eq!(loader.source.draws.get(), 0);
        let code = CardCode::new("2S");
        assert_eq!(
            loaded.face(&code),
            Some("https://deckofcardsapi.com/static/img/2S.png".as_bytes())
        );
    }

    #[test]
    fn corrupt_cache_fails_and_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        cache.write("not json").unwrap();
        let loader = loader(FakeSource::default(), dir.path());

        assert!(matches!(loader.load(), Err(DeckError::Parse(_))));
        assert_eq!(cache.read().unwrap(), None);
    }

    #[test]
    fn non_utf8_cache_is_cleared_and_next_load_draws() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        std::fs::write(cache.path(), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let source = FakeSource {
            body: sample_json(),
            ..FakeSource::default()
        };
        let loader = loader(source, dir.path());

        assert!(matches!(loader.load(), Err(DeckError::Parse(_))));
        assert!(!cache.path().exists());

        let loaded = loader.load().unwrap();
        assert!(!loaded.from_cache);
        assert_eq!(loader.source.draws.get(), 1);
    }

    #[test]
    fn cache_write_failure_still_plays_the_drawn_deck() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        // A directory in the temp file's place makes every write fail.
        std::fs::create_dir(cache.path().with_extension("tmp")).unwrap();
        let source = FakeSource {
            body: sample_json(),
            ..FakeSource::default()
        };
        let loader = loader(source, dir.path());

        let loaded = loader.load().unwrap();
        assert!(!loaded.from_cache);
        assert_eq!(loaded.faces.len(), PAIR_COUNT);
        assert_eq!(cache.read().unwrap(), None);
    }

    #[test]
    fn invalid_draw_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource {
            body: r#"{"success": true, "cards": []}"#.to_string(),
            ..FakeSource::default()
        };
        let loader = loader(source, dir.path());

        assert!(matches!(loader.load(), Err(DeckError::CardCount { .. })));
        assert_eq!(SessionCache::new(dir.path()).read().unwrap(), None);
    }

    #[test]
    fn image_failure_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource {
            body: sample_json(),
            fail_images: true,
            ..FakeSource::default()
        };
        let loader = loader(source, dir.path());
        assert!(matches!(loader.load(), Err(DeckError::Request(_))));
    }
}
