use time::macros::datetime;
use tourney::domain::grouping::{GroupCursor, GROUP_CAPACITY};
use tourney::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

use crate::support::fixtures::{
    clock_at, flow, memory_store, player, seed_eligible, seed_player, seed_tournament, AFTERNOON,
    MORNING, TODAY,
};

#[tokio::test]
async fn first_entrant_lands_in_group_one() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);

    let admission = flow.enter_tournament(&p.id, TODAY).await?;

    assert_eq!(admission.entry.group_id, "2024-01-15-group-1");
    assert_eq!(admission.entry.score, 0);
    assert!(!admission.entry.claimed_reward);
    assert_eq!(admission.remaining_coins, 500);
    assert_eq!(admission.cursor, GroupCursor { index: 1, count: 1 });

    let stored = store.get_player(&p.id).await?.expect("player");
    assert_eq!(stored.coins, 500);
    let t = store.get_tournament(TODAY).await?.expect("tournament");
    assert_eq!(t.cursor, GroupCursor { index: 1, count: 1 });
    Ok(())
}

#[tokio::test]
async fn thirty_sixth_entrant_opens_group_two() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let players = seed_eligible(store.as_ref(), 36).await;

    for p in &players[..35] {
        let a = flow.enter_tournament(&p.id, TODAY).await?;
        assert_eq!(a.entry.group_id, "2024-01-15-group-1");
    }

    let last = flow.enter_tournament(&players[35].id, TODAY).await?;
    assert_eq!(last.entry.group_id, "2024-01-15-group-2");
    assert_eq!(last.cursor, GroupCursor { index: 2, count: 1 });
    Ok(())
}

#[tokio::test]
async fn full_group_cursor_rolls_over() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    seed_tournament(
        store.as_ref(),
        TODAY,
        true,
        GroupCursor {
            index: 4,
            count: GROUP_CAPACITY,
        },
    )
    .await;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);

    let a = flow.enter_tournament(&p.id, TODAY).await?;
    assert_eq!(a.entry.group_id, "2024-01-15-group-5");
    assert_eq!(a.cursor, GroupCursor { index: 5, count: 1 });
    Ok(())
}

#[tokio::test]
async fn low_level_is_rejected_before_balance() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_player(store.as_ref(), player(9, 0, None)).await;

    let err = flow.enter_tournament(&p.id, TODAY).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::UserLevelTooLow, _)
    ));
    Ok(())
}

#[tokio::test]
async fn short_balance_is_rejected_without_writes() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_player(store.as_ref(), player(12, 499, None)).await;

    let err = flow.enter_tournament(&p.id, TODAY).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InsufficientCoins, _)
    ));

    assert_eq!(store.get_player(&p.id).await?.expect("player").coins, 499);
    assert!(store.get_entry(TODAY, &p.id).await?.is_none());
    let t = store.get_tournament(TODAY).await?.expect("tournament");
    assert_eq!(t.cursor, GroupCursor::initial());
    Ok(())
}

#[tokio::test]
async fn exact_cost_is_enough() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_player(store.as_ref(), player(10, 500, None)).await;

    let a = flow.enter_tournament(&p.id, TODAY).await?;
    assert_eq!(a.remaining_coins, 0);
    Ok(())
}

#[tokio::test]
async fn entries_close_at_noon() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock.clone());
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);

    clock.set(AFTERNOON);
    let err = flow.enter_tournament(&p.id, TODAY).await.unwrap_err();
    match err {
        DomainError::Validation(ValidationKind::EntryWindowClosed, detail) => {
            assert!(detail.contains("12:00"), "detail: {detail}");
        }
        other => panic!("expected EntryWindowClosed, got {other:?}"),
    }
    assert_eq!(store.get_player(&p.id).await?.expect("player").coins, 1000);
    Ok(())
}

#[tokio::test]
async fn entry_at_the_cutoff_instant_is_accepted() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock.clone());
    flow.start_tournament().await?;
    let players = seed_eligible(store.as_ref(), 2).await;

    clock.set(datetime!(2024-01-15 12:00 UTC));
    let admission = flow.enter_tournament(&players[0].id, TODAY).await?;
    assert_eq!(admission.entry.entered_at, datetime!(2024-01-15 12:00 UTC));

    clock.set(datetime!(2024-01-15 12:00:00.001 UTC));
    let err = flow.enter_tournament(&players[1].id, TODAY).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::EntryWindowClosed, _)
    ));
    Ok(())
}

#[tokio::test]
async fn window_is_checked_before_lookups() {
    let clock = clock_at(AFTERNOON);
    let flow = flow(memory_store(clock.clone()), clock);

    let err = flow
        .enter_tournament("nobody", "2000-01-01")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::EntryWindowClosed, _)
    ));
}

#[tokio::test]
async fn second_entry_is_rejected_and_charges_once() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);

    flow.enter_tournament(&p.id, TODAY).await?;
    let err = flow.enter_tournament(&p.id, TODAY).await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyInTournament, _)
    ));
    assert_eq!(store.get_player(&p.id).await?.expect("player").coins, 500);
    let t = store.get_tournament(TODAY).await?.expect("tournament");
    assert_eq!(t.cursor, GroupCursor { index: 1, count: 1 });
    Ok(())
}

#[tokio::test]
async fn ended_tournament_takes_no_entries() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    flow.end_tournament(TODAY).await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);

    let err = flow.enter_tournament(&p.id, TODAY).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::TournamentNotActive, _)
    ));
    Ok(())
}

#[tokio::test]
async fn missing_tournament_reads_as_not_active() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);

    let p = seed_eligible(store.as_ref(), 1).await.remove(0);
    let err = flow.enter_tournament(&p.id, TODAY).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::TournamentNotActive, _)
    ));
    let untouched = store.get_player(&p.id).await?.expect("player");
    assert_eq!(untouched.coins, p.coins);

    flow.start_tournament().await?;
    let err = flow.enter_tournament("ghost", TODAY).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::User, _)));
    Ok(())
}

#[tokio::test]
async fn custom_rules_apply() -> Result<(), DomainError> {
    use tourney::config::rules::TournamentRules;
    use tourney::domain::eligibility::EntryRequirements;
    use tourney::domain::schedule::EntryWindow;
    use tourney::services::TournamentFlowService;

    let clock = clock_at(AFTERNOON);
    let store = memory_store(clock.clone());
    let rules = TournamentRules::new(
        EntryRequirements {
            cost: 100,
            min_level: 2,
        },
        EntryWindow::from_hour(24).expect("valid hour"),
    );
    let flow = TournamentFlowService::new(store.clone(), rules, clock);
    flow.start_tournament().await?;
    let p = seed_player(store.as_ref(), player(2, 150, None)).await;

    let a = flow.enter_tournament(&p.id, TODAY).await?;
    assert_eq!(a.remaining_coins, 50);
    Ok(())
}
