//! Table integration tests.

use std::sync::Arc;

use bjtable::hand::{is_natural, is_soft, render, value};
use bjtable::{
    Action, ActionError, BetError, Card, DECK_SIZE, Deck, EmptyDeck, Event, GameState,
    HandOutcome, HandStatus, Ledger, LedgerOptions, RoundError, Table, TableOptions,
};

fn cards(values: &[u8]) -> Vec<Card> {
    values.iter().copied().map(Card::new).collect()
}

fn ledger() -> Arc<Ledger> {
    Arc::new(Ledger::in_memory(LedgerOptions::default()))
}

fn table_from_draws(ledger: &Arc<Ledger>, draws: &[u8]) -> Table {
    Table::with_deck(
        1,
        TableOptions::default(),
        Arc::clone(ledger),
        Deck::from_draws(&cards(draws)),
    )
}

#[test]
fn hand_value_reduces_one_ace_at_a_time() {
    assert_eq!(value(&cards(&[11, 11, 9])), 21);
    assert_eq!(value(&cards(&[11, 11, 11, 9])), 12);
    assert_eq!(value(&cards(&[11, 6])), 17);
    assert!(is_soft(&cards(&[11, 6])));
    assert_eq!(value(&cards(&[10, 9, 5])), 24);
    assert!(!is_soft(&cards(&[11, 10, 5])));
}

#[test]
fn natural_needs_exactly_ace_and_ten() {
    assert!(is_natural(&cards(&[11, 10])));
    assert!(is_natural(&cards(&[10, 11])));
    assert!(!is_natural(&cards(&[11, 9, 1])));
    assert!(!is_natural(&cards(&[10, 10])));
    assert!(!is_natural(&cards(&[11, 11])));
}

#[test]
fn render_marks_aces() {
    assert_eq!(render(&cards(&[10, 11, 4])), "10 11* 4");
    assert_eq!(render(&[]), "");
}

#[test]
fn fresh_deck_has_fifty_two_cards() {
    let mut deck = Deck::shuffled(3);
    assert_eq!(deck.remaining(), DECK_SIZE);

    let mut drawn = Vec::new();
    while let Ok(card) = deck.draw() {
        drawn.push(card);
    }

    assert_eq!(drawn.len(), 52);
    assert_eq!(drawn.iter().filter(|c| c.value() == 10).count(), 16);
    assert_eq!(drawn.iter().filter(|c| c.is_ace()).count(), 4);
    assert_eq!(deck.draw(), Err(EmptyDeck));
}

#[test]
fn same_seed_deals_same_cards() {
    let mut a = Deck::shuffled(9);
    let mut b = Deck::shuffled(9);
    for _ in 0..DECK_SIZE {
        assert_eq!(a.draw(), b.draw());
    }
}

#[test]
fn bet_errors() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 7, 10, 8, 9, 9]);

    assert_eq!(
        table.add_player("alice", 19).unwrap_err(),
        BetError::BelowMinimum { minimum: 20 }
    );

    ledger.set("bob", 50);
    assert_eq!(
        table.add_player("bob", 100).unwrap_err(),
        BetError::InsufficientFunds
    );
    assert_eq!(ledger.balance("bob"), 50);
    assert_eq!(table.cards_remaining(), 6);

    table.add_player("alice", 20).unwrap();
    table.deal_dealer().unwrap();
    assert_eq!(
        table.add_player("carol", 20).unwrap_err(),
        BetError::InvalidState
    );
}

#[test]
fn join_with_empty_deck_takes_no_money() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10]);

    assert_eq!(
        table.add_player("alice", 100).unwrap_err(),
        BetError::EmptyDeck
    );
    assert_eq!(ledger.balance("alice"), 1000);
}

#[test]
fn joining_twice_adds_a_hand() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 7, 9, 9, 10, 8]);

    let first = table.add_player("alice", 40).unwrap();
    assert!(!first.extra_hand);
    assert_eq!(first.cards, cards(&[10, 7]));

    let second = table.add_player("alice", 60).unwrap();
    assert!(second.extra_hand);
    assert_eq!(second.hand_index, 1);

    assert_eq!(table.players().len(), 1);
    let session = table.player("alice").unwrap();
    assert_eq!(session.hands().len(), 2);
    assert_eq!(session.hands()[1].bet(), 60);
    assert_eq!(ledger.balance("alice"), 900);
}

#[test]
fn joins_leave_two_cards_for_the_dealer() {
    let ledger = ledger();
    let mut table = Table::new(1, TableOptions::default(), Arc::clone(&ledger), 11);

    let mut hands = 0;
    let err = loop {
        match table.add_player("alice", 20) {
            Ok(_) => hands += 1,
            Err(err) => break err,
        }
    };

    assert_eq!(err, BetError::EmptyDeck);
    assert_eq!(hands, 25);
    assert_eq!(table.cards_remaining(), 2);
    assert_eq!(ledger.balance("alice"), 1000 - 25 * 20);

    table.deal_dealer().unwrap();
    assert_eq!(table.cards_remaining(), 0);
}

#[test]
fn deal_dealer_errors() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 7, 5, 5]);

    assert_eq!(table.deal_dealer().unwrap_err(), RoundError::NoPlayers);

    table.add_player("alice", 20).unwrap();
    table.set_deck(Deck::from_draws(&cards(&[5])));
    assert_eq!(table.deal_dealer().unwrap_err(), RoundError::EmptyDeck);
    assert_eq!(table.state(), GameState::Forming);
}

#[test]
fn player_natural_pays_three_to_two() {
    let ledger = ledger();
    let mut table = table_from_draws(
        &ledger,
        &[
            11, 10, // player
            5, 9, // dealer
            3, // dealer draw
        ],
    );

    table.add_player("alice", 100).unwrap();
    assert_eq!(table.deal_dealer().unwrap(), Card::new(5));

    let events = table.resolve_naturals().unwrap();
    assert!(matches!(
        events.as_slice(),
        [Event::NaturalPaid { payout: 250, .. }]
    ));
    assert_eq!(ledger.balance("alice"), 1150);
    assert!(table.player("alice").unwrap().hands()[0].is_natural_resolved());

    // Nothing left to play.
    assert_eq!(table.state(), GameState::DealerResolution);
    assert!(table.prompt().is_none());

    table.play_dealer().unwrap();
    let settled = table.settle().unwrap();
    assert!(settled.is_empty());
    assert_eq!(ledger.balance("alice"), 1150);

    let result = table.result().unwrap();
    let alice = result.player("alice").unwrap();
    assert_eq!(alice.hands[0].outcome, HandOutcome::Natural);
    assert_eq!(alice.net, 150);
}

#[test]
fn natural_payout_truncates_odd_bets() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 11, 9, 8]);

    table.add_player("alice", 21).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    assert_eq!(ledger.balance("alice"), 1000 - 21 + 52);
}

#[test]
fn dealer_natural_ends_round_before_player_turns() {
    let ledger = ledger();
    let mut table = table_from_draws(
        &ledger,
        &[
            9, 8, // alice
            10, 11, // bob (natural)
            11, 10, // dealer natural
        ],
    );

    table.add_player("alice", 100).unwrap();
    table.add_player("bob", 100).unwrap();
    table.deal_dealer().unwrap();

    let events = table.resolve_naturals().unwrap();
    assert!(matches!(events[0], Event::DealerNatural { .. }));
    assert!(events.iter().any(|e| matches!(e, Event::LostToNatural { user, .. } if user == "alice")));
    assert!(events.iter().any(|e| matches!(e, Event::NaturalPush { user, bet: 100, .. } if user == "bob")));

    assert_eq!(table.state(), GameState::Finished);
    assert!(table.prompt().is_none());
    assert_eq!(table.act(Action::Hit).unwrap_err(), ActionError::InvalidState);

    assert_eq!(ledger.balance("alice"), 900);
    assert_eq!(ledger.balance("bob"), 1000);

    let result = table.result().unwrap();
    assert!(result.dealer_natural);
    assert_eq!(
        result.player("alice").unwrap().hands[0].outcome,
        HandOutcome::Lose
    );
}

#[test]
fn split_pair_plays_both_hands() {
    let ledger = ledger();
    let mut table = table_from_draws(
        &ledger,
        &[
            8, 8, // player
            10, 7, // dealer
            3, // new split hand
            2, // first split hand
            10, // hit on first hand
            9, // double on second hand
        ],
    );

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    let prompt = table.prompt().unwrap();
    assert!(prompt.can_split);
    assert_eq!(prompt.dealer_up, Card::new(10));

    let events = table.act(Action::Split).unwrap();
    assert!(matches!(events.as_slice(), [Event::Split { hands: 2, .. }]));
    assert_eq!(ledger.balance("alice"), 800);

    let session = table.player("alice").unwrap();
    assert_eq!(session.hands().len(), 2);
    assert_eq!(session.hands()[0].cards(), cards(&[8, 2]).as_slice());
    assert_eq!(session.hands()[1].cards(), cards(&[8, 3]).as_slice());
    assert_eq!(session.hands()[1].bet(), 100);

    // Split keeps the turn on the first half.
    let prompt = table.prompt().unwrap();
    assert_eq!(prompt.hand_index, 0);
    assert_eq!(prompt.hand_count, 2);
    assert!(!prompt.can_split);

    table.act(Action::Hit).unwrap();
    table.act(Action::Stand).unwrap();
    assert_eq!(table.prompt().unwrap().hand_index, 1);

    table.act(Action::Double).unwrap();
    assert_eq!(table.state(), GameState::DealerResolution);

    let dealer_events = table.play_dealer().unwrap();
    assert_eq!(dealer_events.len(), 1);
    table.settle().unwrap();

    // 20 and a doubled 20 against 17.
    assert_eq!(ledger.balance("alice"), 700 + 200 + 400);
    let result = table.result().unwrap();
    let alice = result.player("alice").unwrap();
    assert_eq!(alice.hands.len(), 2);
    assert_eq!(alice.hands[1].bet, 200);
    assert_eq!(alice.net, 300);
}

#[test]
fn split_rejects_non_pairs_without_changes() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[8, 9, 10, 7, 5, 5]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    assert_eq!(table.act(Action::Split).unwrap_err(), ActionError::CannotSplit);
    assert_eq!(ledger.balance("alice"), 900);
    assert_eq!(table.player("alice").unwrap().hands().len(), 1);
    assert_eq!(table.cards_remaining(), 2);
    assert_eq!(table.state(), GameState::PlayerTurns);
    assert_eq!(table.current_player(), Some("alice"));
}

#[test]
fn split_without_funds_is_refused() {
    let ledger = ledger();
    ledger.set("alice", 100);
    let mut table = table_from_draws(&ledger, &[8, 8, 10, 7, 5, 5]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    assert_eq!(
        table.act(Action::Split).unwrap_err(),
        ActionError::InsufficientFunds
    );
    assert_eq!(ledger.balance("alice"), 0);
    assert_eq!(table.player("alice").unwrap().hands().len(), 1);
}

#[test]
fn double_only_on_first_two_cards() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[5, 4, 10, 7, 2, 3]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    table.act(Action::Hit).unwrap();
    assert_eq!(
        table.act(Action::Double).unwrap_err(),
        ActionError::CannotDouble
    );
    assert_eq!(ledger.balance("alice"), 900);
}

#[test]
fn double_takes_one_card_and_ends_the_hand() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[5, 4, 10, 7, 2]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    let events = table.act(Action::Double).unwrap();
    assert!(matches!(
        events.as_slice(),
        [Event::Doubled { value: 11, bet: 200, .. }]
    ));

    let hand = &table.player("alice").unwrap().hands()[0];
    assert!(hand.is_doubled());
    assert_eq!(hand.status(), HandStatus::Stand);
    assert_eq!(hand.len(), 3);
    assert_eq!(ledger.balance("alice"), 800);
    assert_eq!(table.state(), GameState::DealerResolution);
}

#[test]
fn bust_ends_the_hand_and_moves_to_next_player() {
    let ledger = ledger();
    let mut table = table_from_draws(
        &ledger,
        &[
            10, 6, // alice
            9, 9, // bob
            10, 8, // dealer
            10, // alice hits
        ],
    );

    table.add_player("alice", 100).unwrap();
    table.add_player("bob", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    assert_eq!(table.current_player(), Some("alice"));
    let events = table.act(Action::Hit).unwrap();
    assert!(matches!(
        events.as_slice(),
        [Event::Hit { value: 26, .. }, Event::Bust { value: 26, .. }]
    ));
    assert_eq!(table.current_player(), Some("bob"));

    table.act(Action::Stand).unwrap();
    table.play_dealer().unwrap();
    let events = table.settle().unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        Event::Settled { user, result } if user == "alice" && result.outcome == HandOutcome::Bust
    )));
    assert_eq!(ledger.balance("alice"), 900);
    // 18 against 18 pushes.
    assert_eq!(ledger.balance("bob"), 1000);
}

#[test]
fn split_hands_are_played_after_pending_hands() {
    let ledger = ledger();
    let mut table = table_from_draws(
        &ledger,
        &[
            8, 8, // alice hand 0
            10, 9, // alice hand 1
            10, 7, // bob
            10, 8, // dealer
            5, // new split hand
            3, // alice hand 0
        ],
    );

    table.add_player("alice", 20).unwrap();
    table.add_player("alice", 20).unwrap();
    table.add_player("bob", 20).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();

    table.act(Action::Split).unwrap();
    let mut order = Vec::new();
    while let Some(prompt) = table.prompt() {
        order.push((prompt.user.clone(), prompt.hand_index));
        table.act(Action::Stand).unwrap();
    }

    assert_eq!(
        order,
        vec![
            ("alice".to_owned(), 0),
            ("alice".to_owned(), 1),
            ("alice".to_owned(), 2),
            ("bob".to_owned(), 0),
        ]
    );
}

#[test]
fn dealer_stands_on_soft_seventeen() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 8, 11, 6, 10]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();
    table.act(Action::Stand).unwrap();

    let events = table.play_dealer().unwrap();
    assert!(matches!(
        events.as_slice(),
        [Event::DealerReveals { value: 17, .. }]
    ));
    assert_eq!(table.cards_remaining(), 1);

    table.settle().unwrap();
    assert_eq!(ledger.balance("alice"), 1100);
}

#[test]
fn dealer_draws_below_seventeen() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 9, 10, 2, 3, 5, 4]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();
    table.act(Action::Stand).unwrap();

    let events = table.play_dealer().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(table.dealer_hand().value(), 20);
    assert_eq!(table.cards_remaining(), 1);

    table.settle().unwrap();
    assert_eq!(ledger.balance("alice"), 900);
}

#[test]
fn dealer_bust_pays_double() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 2, 10, 6, 10]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();
    table.act(Action::Stand).unwrap();
    table.play_dealer().unwrap();
    table.settle().unwrap();

    let result = table.result().unwrap();
    assert!(result.dealer_bust);
    assert_eq!(
        result.player("alice").unwrap().hands[0].outcome,
        HandOutcome::Win
    );
    assert_eq!(ledger.balance("alice"), 1100);
}

#[test]
fn settle_requires_dealer_play() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 9, 10, 8]);

    table.add_player("alice", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();
    assert_eq!(table.settle().unwrap_err(), RoundError::InvalidState);

    table.act(Action::Stand).unwrap();
    assert_eq!(table.settle().unwrap_err(), RoundError::InvalidState);
    table.play_dealer().unwrap();
    assert_eq!(table.play_dealer().unwrap_err(), RoundError::InvalidState);
    table.settle().unwrap();
    assert!(table.is_finished());
}

#[test]
fn abort_refunds_unsettled_stakes() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 6, 11, 10, 10, 7]);

    table.add_player("alice", 100).unwrap();
    table.add_player("bob", 100).unwrap();
    table.deal_dealer().unwrap();
    table.resolve_naturals().unwrap();
    assert_eq!(ledger.balance("bob"), 1150);

    assert_eq!(table.abort(), 100);
    assert_eq!(ledger.balance("alice"), 1000);
    assert_eq!(ledger.balance("bob"), 1150);
    assert!(table.is_finished());
}

#[test]
fn act_outside_player_turns_is_invalid() {
    let ledger = ledger();
    let mut table = table_from_draws(&ledger, &[10, 6, 10, 7]);

    table.add_player("alice", 100).unwrap();
    assert_eq!(table.act(Action::Hit).unwrap_err(), ActionError::InvalidState);
    assert!(table.prompt().is_none());
}
