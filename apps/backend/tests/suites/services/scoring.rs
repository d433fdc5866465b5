use tourney::errors::domain::{DomainError, NotFoundKind, ValidationKind};

use crate::support::fixtures::{clock_at, flow, memory_store, seed_eligible, MORNING, TODAY};

#[tokio::test]
async fn increments_accumulate() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);
    flow.enter_tournament(&p.id, TODAY).await?;

    assert_eq!(flow.update_score(TODAY, &p.id, 5).await?, 5);
    assert_eq!(flow.update_score(TODAY, &p.id, 12).await?, 17);
    assert_eq!(
        store.get_entry(TODAY, &p.id).await?.expect("entry").score,
        17
    );
    Ok(())
}

#[tokio::test]
async fn non_positive_increment_is_rejected() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);
    flow.enter_tournament(&p.id, TODAY).await?;

    for increment in [0, -3] {
        let err = flow.update_score(TODAY, &p.id, increment).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::InvalidScoreIncrement, _)
        ));
    }
    assert_eq!(store.get_entry(TODAY, &p.id).await?.expect("entry").score, 0);
    Ok(())
}

#[tokio::test]
async fn missing_entry_is_not_found() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);

    let err = flow.update_score(TODAY, &p.id, 1).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::TournamentEntry, _)
    ));
    Ok(())
}

#[tokio::test]
async fn scores_freeze_when_tournament_ends() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);
    flow.enter_tournament(&p.id, TODAY).await?;
    flow.update_score(TODAY, &p.id, 40).await?;
    flow.end_tournament(TODAY).await?;

    let err = flow.update_score(TODAY, &p.id, 10).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::TournamentNotActive, _)
    ));
    assert_eq!(store.get_entry(TODAY, &p.id).await?.expect("entry").score, 40);
    Ok(())
}
