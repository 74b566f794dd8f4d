mod common;

use std::time::Duration;

use chrono::{NaiveTime, TimeZone, Utc};
use common::*;
use lucky_draw::events::Announcement;
use lucky_draw::state::{next_daily_occurrence, ScheduleRequest, Trigger};
use lucky_draw::{is_raffle_error, RaffleError, ScheduleOutcome};

fn in_minutes(minutes: u64, winners: u32, min_participants: usize) -> ScheduleRequest {
    ScheduleRequest {
        trigger: Trigger::After(Duration::from_secs(minutes * 60)),
        winners,
        prize: Some("Mystery Box".into()),
        min_participants,
    }
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_draw_runs_like_a_manual_draw() {
    let Harness { room, .. } = harness(quick_config());
    enter_users(&room, 4).await;

    let ticket = room.schedule(&operator(), in_minutes(5, 2, 3)).await.unwrap();
    assert_eq!(room.scheduled(&operator()).await.unwrap(), vec![ticket.draw.clone()]);

    let ScheduleOutcome::Completed(result) = ticket.outcome().await else {
        panic!("scheduled draw did not complete");
    };

    assert_eq!(result.record.winners.len(), 2);
    assert_eq!(result.record.prize.as_deref(), Some("Mystery Box"));
    assert_eq!(room.participant_count().await, 0);
    assert_eq!(room.history(None).await.unwrap(), vec![result.record]);
    assert!(room.scheduled(&operator()).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_draw_cancelled_below_minimum() {
    let Harness { room, presenter } = harness(quick_config());
    enter_users(&room, 3).await;

    let ticket = room.schedule(&operator(), in_minutes(1, 1, 5)).await.unwrap();
    let outcome = ticket.outcome().await;

    assert!(matches!(
        outcome,
        ScheduleOutcome::Skipped {
            required: 5,
            present: 3
        }
    ));
    assert_eq!(room.participant_count().await, 3);
    assert!(room.history(None).await.unwrap().is_empty());

    let reports: Vec<_> = presenter
        .announcements()
        .into_iter()
        .filter_map(|a| match a {
            Announcement::ScheduleCancelled(report) => Some(report),
            _ => None,
        })
        .collect();
    assert_eq!(reports.len(), 1);
    assert_eq!((reports[0].required, reports[0].present), (5, 3));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_trigger() {
    let Harness { room, .. } = harness(quick_config());
    enter_users(&room, 2).await;

    let ticket = room.schedule(&operator(), in_minutes(60, 1, 1)).await.unwrap();
    let id = ticket.id();

    let cancelled = room.cancel_schedule(&operator(), id).await.unwrap();
    assert_eq!(cancelled.id, id);
    assert!(matches!(ticket.outcome().await, ScheduleOutcome::Cancelled));

    let err = room.cancel_schedule(&operator(), id).await.unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::ScheduleNotFound));

    tokio::time::sleep(Duration::from_secs(2 * 3600)).await;
    assert_eq!(room.participant_count().await, 2);
    assert!(room.history(None).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_fired_schedule_cannot_be_cancelled() {
    let Harness { room, .. } = harness(quick_config());
    enter_users(&room, 2).await;

    let ticket = room.schedule(&operator(), in_minutes(1, 1, 1)).await.unwrap();
    let id = ticket.id();
    assert!(matches!(ticket.outcome().await, ScheduleOutcome::Completed(_)));

    let err = room.cancel_schedule(&operator(), id).await.unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::ScheduleNotFound));
}

#[tokio::test(start_paused = true)]
async fn test_two_schedules_fire_independently() {
    let Harness { room, .. } = harness(quick_config());
    enter_users(&room, 2).await;

    let first = room.schedule(&operator(), in_minutes(1, 1, 1)).await.unwrap();
    let second = room.schedule(&operator(), in_minutes(2, 1, 1)).await.unwrap();
    assert_ne!(first.id(), second.id());

    assert!(matches!(first.outcome().await, ScheduleOutcome::Completed(_)));

    // The first draw emptied the round
    let outcome = second.outcome().await;
    assert!(matches!(
        outcome,
        ScheduleOutcome::Skipped {
            required: 1,
            present: 0
        }
    ));
    assert_eq!(room.history(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_schedule_validation() {
    let Harness { room, .. } = harness(quick_config());

    let past = ScheduleRequest::new(Trigger::At(Utc::now() - chrono::Duration::minutes(1)));
    let err = room.schedule(&operator(), past).await.unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::ScheduleInPast));

    let err = room.schedule(&operator(), in_minutes(1, 0, 1)).await.unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::InvalidWinnerCount));

    let err = room.schedule(&user(1), in_minutes(1, 1, 1)).await.unwrap_err();
    assert!(is_raffle_error(&err, RaffleError::Unauthorized));

    assert!(room.scheduled(&operator()).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_pending_schedules() {
    let Harness { room, .. } = harness(quick_config());
    enter_users(&room, 2).await;

    let ticket = room.schedule(&operator(), in_minutes(10, 1, 1)).await.unwrap();
    assert_eq!(room.shutdown().await, 1);
    assert!(matches!(ticket.outcome().await, ScheduleOutcome::Cancelled));
    assert_eq!(room.participant_count().await, 2);
}

#[test]
fn test_next_daily_occurrence() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    let later_today = NaiveTime::from_hms_opt(11, 30, 0).unwrap();
    assert_eq!(
        next_daily_occurrence(now, later_today),
        Utc.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap()
    );

    let earlier = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
    assert_eq!(
        next_daily_occurrence(now, earlier),
        Utc.with_ymd_and_hms(2024, 3, 2, 9, 15, 0).unwrap()
    );

    let exactly_now = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    assert_eq!(
        next_daily_occurrence(now, exactly_now),
        Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()
    );
}
