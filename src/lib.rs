pub mod config;
pub mod deck;
pub mod error;
pub mod game;

pub use config::Settings;
pub use deck::{Card, CardCode, Deck, DeckLoader, LoadedDeck, PAIR_COUNT};
pub use error::{ConfigError, DeckError};
pub use game::Session;
