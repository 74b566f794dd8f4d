use lucky_draw::state::{ParticipantId, TicketLedger};
use lucky_draw::{is_raffle_error, RaffleError};

fn id(name: &str) -> ParticipantId {
    ParticipantId::new(name)
}

#[test]
fn test_enter_twice_is_rejected() {
    let mut ledger = TicketLedger::new();

    assert_eq!(ledger.enter(id("bob"), "bob".into(), 2).unwrap(), 3);

    let err = ledger.enter(id("bob"), "bob".into(), 0).unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::AlreadyEntered));
    assert_eq!(ledger.participant(&id("bob")).unwrap().tickets, 3);
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_adjust_tickets_floors_at_one() {
    let mut ledger = TicketLedger::new();
    ledger.enter(id("alice"), "alice".into(), 0).unwrap();

    assert_eq!(ledger.adjust_tickets(&id("alice"), 4, None).unwrap(), 5);
    assert_eq!(ledger.adjust_tickets(&id("alice"), -10, None).unwrap(), 1);
    assert_eq!(ledger.total_tickets(), 1);
}

#[test]
fn test_adjust_unknown_participant() {
    let mut ledger = TicketLedger::new();

    let err = ledger.adjust_tickets(&id("ghost"), 3, None).unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::NotFound));
    assert!(ledger.is_empty());

    // Operators may create the participant on the fly
    assert_eq!(ledger.adjust_tickets(&id("ghost"), 3, Some("Ghost")).unwrap(), 4);
    assert_eq!(ledger.participant(&id("ghost")).unwrap().display_name, "Ghost");
}

#[test]
fn test_set_tickets_floors_non_positive_values() {
    let mut ledger = TicketLedger::new();
    ledger.enter(id("carol"), "carol".into(), 0).unwrap();

    assert_eq!(ledger.set_tickets(&id("carol"), 9).unwrap(), 9);
    assert_eq!(ledger.set_tickets(&id("carol"), 0).unwrap(), 1);
    assert_eq!(ledger.set_tickets(&id("carol"), -3).unwrap(), 1);

    let err = ledger.set_tickets(&id("dave"), 2).unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::NotFound));
}

#[test]
fn test_record_win_counts_up() {
    let mut ledger = TicketLedger::new();
    ledger.enter(id("erin"), "erin".into(), 0).unwrap();

    ledger.record_win(&id("erin")).unwrap();
    assert_eq!(ledger.record_win(&id("erin")).unwrap(), 2);
    assert_eq!(ledger.participant(&id("erin")).unwrap().wins, 2);
}

#[test]
fn test_list_all_is_ordered_and_repeatable() {
    let mut ledger = TicketLedger::new();
    for name in ["zed", "amy", "kim"] {
        ledger.enter(id(name), name.into(), 0).unwrap();
    }

    let first = ledger.list_all();
    let second = ledger.list_all();
    assert_eq!(first, second);

    let names: Vec<&str> = first.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(names, ["zed", "amy", "kim"]);

    // Iterating the same snapshot again yields the same sequence
    let again: Vec<&str> = first.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(names, again);
}

#[test]
fn test_find_by_handle_ignores_case_and_at_sign() {
    let mut ledger = TicketLedger::new();
    ledger.enter(id("1"), "@LuckyOne".into(), 0).unwrap();

    assert_eq!(ledger.find_by_handle("luckyone").unwrap().id, id("1"));
    assert_eq!(ledger.find_by_handle("@LUCKYONE").unwrap().id, id("1"));
    assert!(ledger.find_by_handle("@").is_none());
    assert!(ledger.find_by_handle("other").is_none());
}

#[test]
fn test_retire_keeps_late_entrants() {
    let mut ledger = TicketLedger::new();
    ledger.enter(id("a"), "a".into(), 0).unwrap();
    ledger.enter(id("b"), "b".into(), 0).unwrap();
    let snapshot = ledger.list_all();

    ledger.enter(id("late"), "late".into(), 0).unwrap();

    assert_eq!(ledger.retire(&snapshot), 2);
    assert_eq!(ledger.len(), 1);
    assert!(ledger.participant(&id("late")).is_some());
}

#[test]
fn test_clear_empties_the_round() {
    let mut ledger = TicketLedger::new();
    ledger.enter(id("a"), "a".into(), 1).unwrap();
    ledger.enter(id("b"), "b".into(), 0).unwrap();

    assert_eq!(ledger.clear(), 2);
    assert!(ledger.is_empty());
    assert_eq!(ledger.total_tickets(), 0);

    // Same identity can enter the next round
    assert_eq!(ledger.enter(id("a"), "a".into(), 0).unwrap(), 1);
}
