//! Sample data loaded by [`Stores::seeded`](super::Stores::seeded).

use chrono::{DateTime, TimeDelta, Utc};

use crate::store::{AuthorRecord, MessageRecord, NoticeRecord, PostRecord, RemindRecord};

/// Epoch millis of the sample notice and remind.
const SAMPLE_TIME_MILLIS: i64 = 1_524_710_641;

fn sample_time() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(SAMPLE_TIME_MILLIS)
}

fn author(id: i32, first: &str, last: &str, state: &str) -> AuthorRecord {
    AuthorRecord {
        id,
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        state: Some(state.into()),
    }
}

fn post(id: i32, author_id: i32, title: &str, votes: i32) -> PostRecord {
    PostRecord {
        id,
        author_id,
        title: Some(title.into()),
        votes,
    }
}

pub(super) fn authors() -> Vec<AuthorRecord> {
    vec![
        author(1, "Tom", "Coleman", "CN"),
        author(2, "Sashko", "Stubailo", "CN"),
        author(3, "Mikhail", "Novikov", "ENG"),
    ]
}

pub(super) fn posts() -> Vec<PostRecord> {
    vec![
        post(1, 1, "Introduction to GraphQL", 2),
        post(2, 2, "Welcome to Meteor", 3),
        post(3, 2, "Advanced GraphQL", 1),
        post(4, 3, "Launchpad is Cool", 7),
    ]
}

pub(super) fn messages() -> Vec<MessageRecord> {
    vec![
        MessageRecord::Notice(NoticeRecord {
            id: 1,
            content: Some("这是 notice".into()),
            notice_time: sample_time(),
        }),
        MessageRecord::Remind(RemindRecord {
            id: 1,
            content: Some("这是 remind".into()),
            end_time: sample_time(),
        }),
    ]
}
