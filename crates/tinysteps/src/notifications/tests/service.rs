use crate::ids::NotificationId;
use crate::notifications::NotificationError;
use crate::testing::TestApp;

#[test]
fn unread_count_and_mark_read() {
    let app = TestApp::new();
    let ana = app.user("ana");
    let bruno = app.user("bruno");
    let notifications = &app.context.notifications;

    let first = notifications
        .notify(ana.id, "Welcome", "Glad to have you")
        .expect("notify");
    notifications
        .notify(ana.id, "Reminder: Checkup", "Tomorrow")
        .expect("notify");
    notifications
        .notify(bruno.id, "Welcome", "Glad to have you")
        .expect("notify");

    assert_eq!(notifications.unread_count(ana.id).expect("count").unread, 2);
    let listed = notifications.list(ana.id).expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "Reminder: Checkup");

    assert!(matches!(
        notifications.mark_read(bruno.id, first.id),
        Err(NotificationError::NotFound)
    ));
    assert!(notifications.mark_read(ana.id, first.id).expect("read").read);
    assert_eq!(notifications.unread_count(ana.id).expect("count").unread, 1);

    assert_eq!(notifications.mark_all_read(ana.id).expect("all"), 1);
    assert_eq!(notifications.mark_all_read(ana.id).expect("all"), 0);
    assert!(matches!(
        notifications.mark_read(ana.id, NotificationId(999)),
        Err(NotificationError::NotFound)
    ));
}
