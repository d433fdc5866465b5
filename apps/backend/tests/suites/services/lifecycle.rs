use time::Duration;
use tourney::domain::grouping::GroupCursor;
use tourney::errors::domain::{ConflictKind, DomainError, NotFoundKind};

use crate::support::fixtures::{clock_at, flow, memory_store, MORNING, TODAY};

#[tokio::test]
async fn start_creates_todays_active_tournament() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);

    let t = flow.start_tournament().await?;

    assert_eq!(t.id, TODAY);
    assert!(t.active);
    assert_eq!(t.cursor, GroupCursor { index: 1, count: 0 });
    assert_eq!(t.starts_at, MORNING);
    assert_eq!(t.ends_at, MORNING + Duration::hours(24));
    assert_eq!(store.get_tournament(TODAY).await?, Some(t));
    Ok(())
}

#[tokio::test]
async fn second_start_same_day_is_rejected() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let flow = flow(memory_store(clock.clone()), clock.clone());

    flow.start_tournament().await?;
    clock.advance(Duration::hours(3));

    let err = flow.start_tournament().await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyInTournament, _)
    ));
    Ok(())
}

#[tokio::test]
async fn restart_after_end_same_day_is_rejected() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let flow = flow(memory_store(clock.clone()), clock);

    flow.start_tournament().await?;
    flow.end_tournament(TODAY).await?;

    let err = flow.start_tournament().await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyInTournament, _)
    ));
    Ok(())
}

#[tokio::test]
async fn next_day_starts_a_new_tournament() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let flow = flow(memory_store(clock.clone()), clock.clone());

    flow.start_tournament().await?;
    clock.advance(Duration::days(1));
    let next = flow.start_tournament().await?;
    assert_eq!(next.id, "2024-01-16");
    Ok(())
}

#[tokio::test]
async fn end_flips_active_once() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let flow = flow(memory_store(clock.clone()), clock);

    flow.start_tournament().await?;
    let ended = flow.end_tournament(TODAY).await?;
    assert!(!ended.active);

    let err = flow.end_tournament(TODAY).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::TournamentAlreadyInactive, _)
    ));
    Ok(())
}

#[tokio::test]
async fn end_of_unknown_tournament_is_not_found() {
    let clock = clock_at(MORNING);
    let flow = flow(memory_store(clock.clone()), clock);

    let err = flow.end_tournament("1999-12-31").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Tournament, _)
    ));
}
