//! Built-in sample threads
//!
//! Served whenever the API cannot be reached, and used to seed the
//! local mirror on first run.

use crate::model::{EmailMessage, Sender, Thread, ThreadStatus};
use chrono::{DateTime, TimeZone, Utc};

const MITRAJIT_NAME: &str = "Mitrajit Chandra";
const MITRAJIT_EMAIL: &str = "mitrajit2022@gmail.com";
const SHAW_NAME: &str = "Shaw Adley";
const SHAW_EMAIL: &str = "shaw@getmemeetings.com";

const FOLLOW_UP_SUBJECT: &str =
    "Shaw - following up on our meeting last week... | 7ZG2ZTV 6KG634E";

const FOLLOW_UP_BODY: &str = "How are you Shaw?

Thanks for reaching out over our web chat.

How can I help you with your project?

Please let me know if you need anything else.

Regards,
Mitrajit Chandra

7ZG2ZTV 6KG634E";

const FOLLOW_UP_REPLY_BODY: &str = "Hi Mitrajit,

Just wondering if you're still interested.

Regards,
Shaw Adley

6KG634E practicecowboy";

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 2, day, 11, 24, 34)
        .single()
        .unwrap_or_default()
}

fn message(
    id: &str,
    from: Sender,
    to: &str,
    subject: &str,
    body: &str,
    date: DateTime<Utc>,
) -> EmailMessage {
    EmailMessage {
        id: id.to_string(),
        from,
        to: to.to_string(),
        cc: None,
        bcc: None,
        subject: subject.to_string(),
        body: body.to_string(),
        date,
    }
}

fn sample_labels() -> Vec<String> {
    vec!["Interested".to_string(), "Campaign name".to_string()]
}

/// The two sample threads, ids `"1"` and `"2"`.
#[must_use]
pub fn mock_threads() -> Vec<Thread> {
    let mitrajit = Sender::new(MITRAJIT_NAME, MITRAJIT_EMAIL);
    let shaw = Sender::new(SHAW_NAME, SHAW_EMAIL);

    vec![
        Thread {
            id: "1".to_string(),
            subject: FOLLOW_UP_SUBJECT.to_string(),
            from: mitrajit.clone(),
            to: SHAW_EMAIL.to_string(),
            cc: Some(String::new()),
            body: FOLLOW_UP_BODY.to_string(),
            date: at(1),
            status: ThreadStatus::Read,
            labels: sample_labels(),
            messages: vec![
                message(
                    "1-1",
                    mitrajit,
                    SHAW_EMAIL,
                    FOLLOW_UP_SUBJECT,
                    FOLLOW_UP_BODY,
                    at(1),
                ),
                message(
                    "1-2",
                    shaw.clone(),
                    MITRAJIT_EMAIL,
                    FOLLOW_UP_SUBJECT,
                    FOLLOW_UP_REPLY_BODY,
                    at(2),
                ),
            ],
        },
        Thread {
            id: "2".to_string(),
            subject: "Test mail".to_string(),
            from: shaw.clone(),
            to: MITRAJIT_EMAIL.to_string(),
            cc: Some(String::new()),
            body: "Test mail".to_string(),
            date: at(3),
            status: ThreadStatus::Unread,
            labels: sample_labels(),
            messages: vec![message(
                "2-1",
                shaw,
                MITRAJIT_EMAIL,
                "Test mail",
                "Test mail",
                at(3),
            )],
        },
    ]
}

/// Look up a sample thread by id.
#[must_use]
pub fn find_mock_thread(id: &str) -> Option<Thread> {
    mock_threads().into_iter().find(|t| t.id == id)
}
