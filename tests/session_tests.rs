use rand::SeedableRng;
use rand::rngs::StdRng;

use naipes::game::{Outcome, Phase, RevealOutcome, Tick, TileStatus};
use naipes::{Card, CardCode, Deck, PAIR_COUNT, Session};

fn deck() -> Deck {
    let cards = ["AS", "2S", "3S", "4S", "5S", "6S", "7S", "8S"]
        .iter()
        .map(|code| Card::new(code, &format!("https://deckofcardsapi.com/static/img/{code}.png")))
        .collect();
    Deck::from_cards(cards).unwrap()
}

fn session(time_limit: u32, seed: u64) -> Session {
    Session::new(&deck(), time_limit, &mut StdRng::seed_from_u64(seed))
}

fn slots_of(session: &Session, code: &str) -> (usize, usize) {
    let code = CardCode::new(code);
    let slots: Vec<usize> = session
        .tiles()
        .iter()
        .enumerate()
        .filter(|(_, tile)| tile.card == code)
        .map(|(idx, _)| idx)
        .collect();
    assert_eq!(slots.len(), 2);
    (slots[0], slots[1])
}

fn mismatched_slots(session: &Session) -> (usize, usize) {
    let first = &session.tiles()[0];
    let other = session
        .tiles()
        .iter()
        .position(|tile| tile.card != first.card && tile.status == TileStatus::Hidden)
        .unwrap();
    (0, other)
}

fn play_pair(session: &mut Session, a: usize, b: usize) {
    assert!(matches!(session.click(a), RevealOutcome::First(_)));
    assert!(matches!(session.click(b), RevealOutcome::Second(_)));
    session.resolve_pending().unwrap();
}

#[test]
fn clearing_the_board_wins_with_exact_stats() {
    let mut session = session(60, 1);
    let (a, b) = mismatched_slots(&session);
    play_pair(&mut session, a, b);

    assert_eq!(session.tick(), Some(Tick::Running(59)));
    assert_eq!(session.tick(), Some(Tick::Running(58)));

    let deck = deck();
    for card in deck.cards() {
        let (a, b) = slots_of(&session, card.code.as_str());
        play_pair(&mut session, a, b);
    }

    assert_eq!(session.phase(), Phase::Won);
    assert_eq!(session.correct_pairs(), PAIR_COUNT as u32);
    let summary = session.summary().unwrap();
    assert_eq!(summary.outcome, Outcome::Victory);
    assert_eq!(summary.attempts, PAIR_COUNT as u32 + 1);
    assert_eq!(summary.seconds_remaining, 58);
    assert!(session.tiles().iter().all(|tile| tile.status == TileStatus::Matched));

    // The clock is stopped for good.
    assert_eq!(session.tick(), None);
    assert_eq!(session.seconds_remaining(), 58);
}

#[test]
fn attempts_count_every_resolved_pair() {
    let mut session = session(60, 2);
    for expected in 1..=3 {
        let (a, b) = mismatched_slots(&session);
        play_pair(&mut session, a, b);
        assert_eq!(session.attempts(), expected);
        assert_eq!(session.correct_pairs(), 0);
    }

    let (a, b) = slots_of(&session, "AS");
    play_pair(&mut session, a, b);
    assert_eq!(session.attempts(), 4);
    assert_eq!(session.correct_pairs(), 1);
}

#[test]
fn running_out_of_time_is_a_defeat() {
    let mut session = session(3, 3);
    let (a, b) = slots_of(&session, "5S");
    play_pair(&mut session, a, b);

    assert_eq!(session.tick(), Some(Tick::Running(2)));
    assert_eq!(session.tick(), Some(Tick::Running(1)));
    assert_eq!(session.tick(), Some(Tick::Expired));

    let summary = session.summary().unwrap();
    assert_eq!(summary.outcome, Outcome::Defeat);
    assert_eq!(summary.correct_pairs, 1);
    assert_eq!(summary.attempts, 1);
    assert_eq!(summary.seconds_remaining, 0);
    assert_eq!(session.tick(), None);
}

#[test]
fn board_is_blocked_only_while_a_pair_is_pending() {
    let mut session = session(60, 6);
    let (a, b) = mismatched_slots(&session);
    assert!(!session.input_blocked());

    session.click(a);
    assert!(!session.input_blocked());
    session.click(b);
    assert!(session.input_blocked());

    session.resolve_pending().unwrap();
    assert!(!session.input_blocked());
}

#[test]
fn finished_game_keeps_the_board_blocked() {
    let mut session = session(1, 7);
    assert_eq!(session.tick(), Some(Tick::Expired));
    assert!(session.input_blocked());
}

#[test]
fn clicks_after_time_up_are_not_processed() {
    let mut session = session(1, 4);
    let (a, b) = mismatched_slots(&session);
    session.click(a);
    session.click(b);
    assert_eq!(session.tick(), Some(Tick::Expired));

    assert_eq!(session.resolve_pending(), None);
    let hidden = session
        .tiles()
        .iter()
        .position(|tile| tile.status == TileStatus::Hidden)
        .unwrap();
    assert_eq!(session.click(hidden), RevealOutcome::Ignored);
    assert_eq!(session.attempts(), 0);
    assert_eq!(session.phase(), Phase::TimeUp);
}

#[test]
fn zero_time_limit_still_gives_one_second() {
    let mut session = session(0, 5);
    assert_eq!(session.seconds_remaining(), 1);
    assert_eq!(session.tick(), Some(Tick::Expired));
    assert!(session.is_finished());
}
