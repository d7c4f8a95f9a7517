//! Integration tests for the reminder pass.

mod helpers;

use std::sync::Arc;

use chrono::Duration;

use deadline_entity::deadline::ReminderLead;
use deadline_entity::notification::{NotificationKind, NotificationPriority};
use deadline_service::notifier::{EmailTemplate, FailingInAppNotifier, InAppNotifier, StoredInAppNotifier};
use deadline_worker::PassKind;

use helpers::TestWorld;

const ONE_HOUR: &str = "1_hour";

#[tokio::test]
async fn test_one_hour_reminder_reaches_owner_and_collaborators_only() {
    let world = TestWorld::new();
    let alice = world.user("alice");
    let bob = world.user("bob");
    let carol = world.user("carol");
    world.befriend(&alice, &bob);
    world.befriend(&alice, &carol);
    let deadline = world
        .deadline_due_in(&alice, "Ship v2", Duration::hours(1))
        .await;
    world.share(&alice, deadline.id, &bob).await;
    let copy_id = world.copy_to(&alice, deadline.id, &carol).await;

    let report = world.scheduler.run_pass(PassKind::Reminder).await;
    assert_eq!(report.errors, 0);

    let marker = world.reload(deadline.id).await.sent(ONE_HOUR).cloned().unwrap();
    assert_eq!(marker.sent_at, world.now());
    assert_eq!(marker.recipients, vec![alice.user_id, bob.user_id]);

    for user in [&alice, &bob] {
        let inbox = world.inbox_for(user, deadline.id, NotificationKind::Reminder);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].priority, NotificationPriority::Urgent);
    }
    assert!(world
        .inbox_for(&carol, deadline.id, NotificationKind::Reminder)
        .is_empty());
    // carol hears about her own copy instead
    assert_eq!(
        world.inbox_for(&carol, copy_id, NotificationKind::Reminder).len(),
        1
    );

    let emails: Vec<_> = world
        .email
        .sent()
        .into_iter()
        .filter(|(_, template, data)| {
            *template == EmailTemplate::DeadlineReminder
                && data["deadline_id"] == deadline.id.to_string()
        })
        .map(|(to, _, _)| to)
        .collect();
    assert_eq!(emails, vec![TestWorld::address("alice"), TestWorld::address("bob")]);
}

#[tokio::test]
async fn test_reminder_is_sent_once_per_lead() {
    let world = TestWorld::new();
    let alice = world.user("alice");
    let deadline = world
        .deadline_due_in(&alice, "Pay rent", Duration::hours(1))
        .await;

    let first = world.scheduler.run_reminder_pass().await;
    assert_eq!(first.notified, 1);

    world.advance(Duration::minutes(10));
    let second = world.scheduler.run_reminder_pass().await;
    assert_eq!(second.examined, 0);
    assert_eq!(second.notified, 0);

    assert_eq!(
        world
            .inbox_for(&alice, deadline.id, NotificationKind::Reminder)
            .len(),
        1
    );
    assert_eq!(world.email.recipients().len(), 1);
}

#[tokio::test]
async fn test_each_lead_fires_in_its_window() {
    let world = TestWorld::new();
    let alice = world.user("alice");
    let deadline = world
        .deadline_due_in(&alice, "Conference talk", Duration::hours(48))
        .await;

    world.scheduler.run_reminder_pass().await;
    world.advance(Duration::hours(24));
    world.scheduler.run_reminder_pass().await;
    world.advance(Duration::hours(12));
    world.scheduler.run_reminder_pass().await;
    // 5 hours out matches no lead
    world.advance(Duration::hours(7));
    let idle = world.scheduler.run_reminder_pass().await;
    assert_eq!(idle.examined, 0);
    world.advance(Duration::hours(4));
    world.scheduler.run_reminder_pass().await;

    let stored = world.reload(deadline.id).await;
    for lead in ReminderLead::ALL {
        assert!(stored.sent(lead.marker_key()).is_some(), "{lead:?} missing");
    }
    assert_eq!(
        world
            .inbox_for(&alice, deadline.id, NotificationKind::Reminder)
            .len(),
        4
    );
}

#[tokio::test]
async fn test_completed_deadlines_get_no_reminders() {
    let world = TestWorld::new();
    let alice = world.user("alice");
    let deadline = world
        .deadline_due_in(&alice, "Renew passport", Duration::hours(1))
        .await;
    world.deadlines.complete(&alice, deadline.id).await.unwrap();

    let report = world.scheduler.run_reminder_pass().await;
    assert_eq!(report.examined, 0);
    assert!(world.reload(deadline.id).await.sent(ONE_HOUR).is_none());
}

#[tokio::test]
async fn test_preferences_gate_each_channel() {
    let world = TestWorld::new();
    let alice = world.user("alice");
    let bob = world.user("bob");
    world.befriend(&alice, &bob);
    world
        .set_preferences(&alice, |p| p.email.reminders.one_hour = false)
        .await;
    world
        .set_preferences(&bob, |p| {
            p.email.reminders.one_hour = false;
            p.in_app.reminders.one_hour = false;
        })
        .await;
    let deadline = world
        .deadline_due_in(&alice, "Quarterly review", Duration::hours(1))
        .await;
    world.share(&alice, deadline.id, &bob).await;

    world.scheduler.run_reminder_pass().await;

    assert!(world.email.recipients().is_empty());
    assert_eq!(
        world
            .inbox_for(&alice, deadline.id, NotificationKind::Reminder)
            .len(),
        1
    );
    assert!(world
        .inbox_for(&bob, deadline.id, NotificationKind::Reminder)
        .is_empty());
    let marker = world.reload(deadline.id).await.sent(ONE_HOUR).cloned().unwrap();
    assert_eq!(marker.recipients, vec![alice.user_id]);
}

#[tokio::test]
async fn test_delivery_failures_are_isolated() {
    let store = Arc::new(deadline_database::memory::MemoryStore::new());
    let stored: Arc<dyn InAppNotifier> = Arc::new(StoredInAppNotifier::new(store.clone()));
    let alice = deadline_service::RequestContext::new(
        store.add_user("alice", Some(&TestWorld::address("alice"))),
    );
    let bob = deadline_service::RequestContext::new(
        store.add_user("bob", Some(&TestWorld::address("bob"))),
    );
    let failing: Arc<dyn InAppNotifier> =
        Arc::new(FailingInAppNotifier::new(stored, vec![bob.user_id]));
    let world = TestWorld::with_in_app(store, failing);
    world.befriend(&alice, &bob);
    world.email.fail_for(&TestWorld::address("alice"));
    let deadline = world
        .deadline_due_in(&alice, "Launch", Duration::hours(1))
        .await;
    world.share(&alice, deadline.id, &bob).await;

    let report = world.scheduler.run_reminder_pass().await;

    assert_eq!(report.emails_failed, 1);
    assert_eq!(report.in_app_failed, 1);
    assert_eq!(report.delivery_failures(), 2);
    assert_eq!(report.emails_sent, 1);
    assert_eq!(report.in_app_sent, 1);
    assert_eq!(report.notified, 1);
    assert_eq!(world.email.recipients(), vec![TestWorld::address("bob")]);
    let marker = world.reload(deadline.id).await.sent(ONE_HOUR).cloned().unwrap();
    assert_eq!(marker.recipients, vec![alice.user_id, bob.user_id]);
}

#[tokio::test]
async fn test_no_marker_when_every_delivery_fails() {
    let world = TestWorld::new();
    let alice = world.user("alice");
    world.email.fail_for(&TestWorld::address("alice"));
    world
        .set_preferences(&alice, |p| p.in_app.reminders.one_hour = false)
        .await;
    let deadline = world
        .deadline_due_in(&alice, "Visa appointment", Duration::hours(1))
        .await;

    let report = world.scheduler.run_reminder_pass().await;
    assert_eq!(report.skipped, 1);
    assert!(world.reload(deadline.id).await.sent(ONE_HOUR).is_none());

    // a later tick inside the window retries
    world
        .set_preferences(&alice, |p| p.in_app.reminders.one_hour = true)
        .await;
    world.advance(Duration::minutes(5));
    world.scheduler.run_reminder_pass().await;
    assert!(world.reload(deadline.id).await.sent(ONE_HOUR).is_some());
}
