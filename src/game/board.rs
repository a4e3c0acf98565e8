use rand::Rng;
use rand::seq::SliceRandom;

use crate::deck::{CardCode, Deck};

#[derive(Clone, Debug, PartialEq)]
pub enum TileStatus {
    Hidden,
    Flipped,
    Matched,
}

/// One board slot and the card bound to it.
#[derive(Clone, Debug)]
pub struct Tile {
    pub card: CardCode,
    pub face_url: String,
    pub status: TileStatus,
}

/// Deal a deck onto the board: every card twice, shuffled, face-down.
pub fn deal<R: Rng + ?Sized>(deck: &Deck, rng: &mut R) -> Vec<Tile> {
    let mut tiles: Vec<Tile> = deck
        .cards()
        .iter()
        .chain(deck.cards().iter())
        .map(|card| Tile {
            card: card.code.clone(),
            face_url: card.face_url().to_string(),
            status: TileStatus::Hidden,
        })
        .collect();
    tiles.shuffle(rng);
    tiles
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::deck::PAIR_COUNT;
    use crate::deck::tests::sample_cards;

    #[test]
    fn deals_every_card_twice_face_down() {
        let deck = Deck::from_cards(sample_cards()).unwrap();
        let tiles = deal(&deck, &mut StdRng::seed_from_u64(7));

        assert_eq!(tiles.len(), PAIR_COUNT * 2);
        assert!(tiles.iter().all(|tile| tile.status == TileStatus::Hidden));

        let mut counts: HashMap<&CardCode, usize> = HashMap::new();
        for tile in &tiles {
            *counts.entry(&tile.card).or_default() += 1;
        }
        assert_eq!(counts.len(), PAIR_COUNT);
        assert!(counts.values().all(|&count| count == 2));
    }

    #[test]
    fn face_url_follows_the_card() {
        let deck = Deck::from_cards(sample_cards()).unwrap();
        for tile in deal(&deck, &mut StdRng::seed_from_u64(3)) {
            assert!(tile.face_url.ends_with(&format!("/{}.png", tile.card)));
        }
    }

    #[test]
    fn seeds_give_different_layouts() {
        let deck = Deck::from_cards(sample_cards()).unwrap();
        let layout = |seed| {
            deal(&deck, &mut StdRng::seed_from_u64(seed))
                .into_iter()
                .map(|tile| tile.card)
                .collect::<Vec<_>>()
        };
        assert_eq!(layout(11), layout(11));
        assert!((0..8).any(|seed| layout(seed) != layout(seed + 100)));
    }
}
