use chrono::{NaiveDate, Utc};
use itertools::Itertools;
use nanoid::nanoid;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{required, Error},
    models::{Event, EventAttendee, User},
    policy::{self, Action, Ownership},
    store::Collection,
};

#[derive(Debug, Default, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Campus events and who signed up for them.
#[derive(Default)]
pub struct Events {
    events: Collection<Event>,
    attendees: Collection<EventAttendee>,
}

impl Events {
    /// Upcoming and past events, earliest date first.
    pub async fn list(&self) -> Vec<Event> {
        self.events
            .list()
            .await
            .into_iter()
            .sorted_by(|a, b| a.date.cmp(&b.date))
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Event, Error> {
        self.events.get(id).await.ok_or(Error::NotFound("event"))
    }

    pub async fn create(&self, organizer: &User, draft: EventDraft) -> Result<Event, Error> {
        policy::authorize(Action::CreateEvent, organizer, Ownership::Unowned)?;
        let date = required(&draft.date, "date")?;
        NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| Error::validation("date must be YYYY-MM-DD"))?;

        let event = Event {
            id: nanoid!(),
            title: required(&draft.title, "title")?,
            description: draft.description,
            banner: draft.banner,
            date,
            time: draft.time,
            location: draft.location,
            organizer_id: organizer.id.clone(),
            created_at: Utc::now(),
        };
        info!(event = %event.id, organizer = %organizer.id, "event created");
        Ok(self.events.insert(event).await)
    }

    /// Signs `user` up for an event, once.
    pub async fn register(&self, event_id: &str, user: &User) -> Result<EventAttendee, Error> {
        policy::authorize(Action::RegisterForEvent, user, Ownership::Unowned)?;
        self.get(event_id).await?;

        let attendee = EventAttendee {
            id: nanoid!(),
            event_id: event_id.to_owned(),
            user_id: user.id.clone(),
            registered_at: Utc::now(),
        };
        self.attendees
            .insert_unless(attendee, |a| a.event_id == event_id && a.user_id == user.id)
            .await
            .ok_or_else(|| Error::Conflict("already registered for this event".into()))
    }

    pub async fn attendees(&self, event_id: &str) -> Result<Vec<EventAttendee>, Error> {
        self.get(event_id).await?;
        Ok(self.attendees.filter(|a| a.event_id == event_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::Credential, models::Role};

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            username: id.into(),
            password: Credential::Plain("pw".into()),
            role,
        }
    }

    fn draft(title: &str, date: &str) -> EventDraft {
        EventDraft {
            title: title.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn listed_by_date() {
        let events = Events::default();
        let l = user("l1", Role::Lecturer);
        events.create(&l, draft("Sports Day", "2024-12-22")).await.unwrap();
        events.create(&l, draft("Hackathon", "2024-12-05")).await.unwrap();

        let titles: Vec<_> = events.list().await.into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["Hackathon", "Sports Day"]);
    }

    #[tokio::test]
    async fn students_cannot_organize() {
        let events = Events::default();
        let err = events
            .create(&user("s1", Role::Student), draft("Party", "2024-12-22"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn dates_are_validated() {
        let events = Events::default();
        let p = user("p1", Role::Principal);
        for date in ["", "22/12/2024", "2024-13-01"] {
            let err = events.create(&p, draft("Fest", date)).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[tokio::test]
    async fn registration_happens_once() {
        let events = Events::default();
        let p = user("p1", Role::Principal);
        let s = user("s1", Role::Student);
        let event = events.create(&p, draft("Fest", "2024-12-22")).await.unwrap();

        events.register(&event.id, &s).await.unwrap();
        assert!(matches!(
            events.register(&event.id, &s).await,
            Err(Error::Conflict(_))
        ));
        events.register(&event.id, &p).await.unwrap();
        assert_eq!(events.attendees(&event.id).await.unwrap().len(), 2);

        assert!(matches!(
            events.register("missing", &s).await,
            Err(Error::NotFound("event"))
        ));
    }
}
