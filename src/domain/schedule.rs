use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use derive_more::Display;
use serde::Serialize;

/// Key dates of the event.
///
/// Every window is half open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSchedule {
    pub registration_open: DateTime<Utc>,
    pub registration_close: DateTime<Utc>,
    pub application_open: DateTime<Utc>,
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    pub hardware_sign_out_start: DateTime<Utc>,
    pub hardware_sign_out_end: DateTime<Utc>,
    pub waitlisted_acceptance_start: DateTime<Utc>,
    pub final_review_response_date: DateTime<Utc>,
    pub rsvp_days: i64,
}

fn within(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= now && now < end
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownKind {
    #[display(fmt = "Registration Opens In")]
    RegistrationOpens,
    #[display(fmt = "Registration Closes In")]
    RegistrationCloses,
    #[display(fmt = "Event Starts In")]
    EventStarts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub kind: CountdownKind,
    pub title: String,
    pub target: DateTime<Utc>,
}

impl EventSchedule {
    /// Whether an account can be created.
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        within(now, self.registration_open, self.registration_close)
    }

    /// Whether the application form can be submitted.
    pub fn is_application_open(&self, now: DateTime<Utc>) -> bool {
        within(now, self.application_open, self.registration_close)
    }

    pub fn is_hackathon_happening(&self, now: DateTime<Utc>) -> bool {
        within(now, self.event_start, self.event_end)
    }

    pub fn is_hardware_sign_out_open(&self, now: DateTime<Utc>) -> bool {
        within(now, self.hardware_sign_out_start, self.hardware_sign_out_end)
    }

    pub fn is_waitlisted_acceptance_open(&self, now: DateTime<Utc>) -> bool {
        now >= self.waitlisted_acceptance_start
    }

    pub fn rsvp_deadline(&self, decision_sent: NaiveDate) -> NaiveDate {
        decision_sent + Duration::days(self.rsvp_days)
    }

    /// RSVP stays open up to and including the deadline day.
    pub fn is_rsvp_passed(&self, decision_sent: NaiveDate, today: NaiveDate) -> bool {
        today > self.rsvp_deadline(decision_sent)
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Option<Countdown> {
        let (kind, target) = if self.registration_open >= now {
            (CountdownKind::RegistrationOpens, self.registration_open)
        } else if self.registration_close >= now {
            (CountdownKind::RegistrationCloses, self.registration_close)
        } else if self.event_start >= now {
            (CountdownKind::EventStarts, self.event_start)
        } else {
            return None;
        };

        Some(Countdown {
            kind,
            title: kind.to_string(),
            target,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInTime {
    pub name: String,
    pub description: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum SignInTimeParseError {
    #[display(fmt = "entry {_0:?} must be formatted as name|description|time")]
    Format(String),
    #[display(fmt = "entry {_0:?} has an invalid RFC 3339 time")]
    Time(String),
    #[display(fmt = "entry {_0:?} is not in chronological order")]
    Order(String),
}

impl std::error::Error for SignInTimeParseError {}

impl SignInTime {
    /// Parse a `;` separated list of `name|description|time` entries.
    pub fn parse_list(value: &str) -> Result<Vec<Self>, SignInTimeParseError> {
        let mut times: Vec<Self> = Vec::new();

        for entry in value.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, '|');
            let (name, description, time) = match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(description), Some(time)) => (name, description, time),
                _ => return Err(SignInTimeParseError::Format(entry.into())),
            };

            let time = DateTime::<FixedOffset>::parse_from_rfc3339(time.trim())
                .map_err(|_| SignInTimeParseError::Time(entry.into()))?
                .with_timezone(&Utc);

            if let Some(last) = times.last() {
                if last.time > time {
                    return Err(SignInTimeParseError::Order(entry.into()));
                }
            }

            times.push(Self {
                name: name.trim().into(),
                description: description.trim().into(),
                time,
            });
        }

        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
    }

    fn schedule() -> EventSchedule {
        EventSchedule {
            registration_open: at(1, 18, 0),
            registration_close: at(10, 11, 23),
            application_open: at(9, 25, 0),
            event_start: at(10, 26, 8),
            event_end: at(10, 27, 17),
            hardware_sign_out_start: at(10, 26, 8),
            hardware_sign_out_end: at(10, 27, 17),
            waitlisted_acceptance_start: at(10, 26, 9),
            final_review_response_date: at(10, 18, 23),
            rsvp_days: 10,
        }
    }

    #[test]
    fn registration_window_is_half_open() {
        let schedule = schedule();

        assert!(!schedule.is_registration_open(at(1, 17, 23)));
        assert!(schedule.is_registration_open(at(1, 18, 0)));
        assert!(schedule.is_registration_open(at(10, 11, 22)));
        assert!(!schedule.is_registration_open(at(10, 11, 23)));
    }

    #[test]
    fn application_window_starts_later_than_registration() {
        let schedule = schedule();

        assert!(schedule.is_registration_open(at(9, 1, 0)));
        assert!(!schedule.is_application_open(at(9, 1, 0)));
        assert!(schedule.is_application_open(at(9, 25, 0)));
        assert!(!schedule.is_application_open(at(10, 11, 23)));
    }

    #[test]
    fn hackathon_happening_only_during_event() {
        let schedule = schedule();

        assert!(!schedule.is_hackathon_happening(at(10, 26, 7)));
        assert!(schedule.is_hackathon_happening(at(10, 26, 8)));
        assert!(!schedule.is_hackathon_happening(at(10, 27, 17)));
        assert!(!schedule.is_waitlisted_acceptance_open(at(10, 26, 8)));
        assert!(schedule.is_waitlisted_acceptance_open(at(10, 26, 9)));
    }

    #[test]
    fn rsvp_deadline_includes_last_day() {
        let schedule = schedule();
        let sent = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();

        assert_eq!(
            schedule.rsvp_deadline(sent),
            NaiveDate::from_ymd_opt(2024, 10, 11).unwrap()
        );
        assert!(!schedule.is_rsvp_passed(sent, NaiveDate::from_ymd_opt(2024, 10, 11).unwrap()));
        assert!(schedule.is_rsvp_passed(sent, NaiveDate::from_ymd_opt(2024, 10, 12).unwrap()));
    }

    #[test]
    fn countdown_follows_next_milestone() {
        let schedule = schedule();

        let countdown = schedule.countdown(at(1, 1, 0)).unwrap();
        assert_eq!(countdown.kind, CountdownKind::RegistrationOpens);
        assert_eq!(countdown.title, "Registration Opens In");

        let countdown = schedule.countdown(at(5, 1, 0)).unwrap();
        assert_eq!(countdown.kind, CountdownKind::RegistrationCloses);
        assert_eq!(countdown.target, at(10, 11, 23));

        let countdown = schedule.countdown(at(10, 20, 0)).unwrap();
        assert_eq!(countdown.kind, CountdownKind::EventStarts);

        assert_eq!(schedule.countdown(at(10, 26, 9)), None);
    }

    #[test]
    fn parse_sign_in_times() {
        let times = SignInTime::parse_list(
            "sign_in|Hackathon Sign In|2024-10-26T10:00:00-04:00; lunch1|Lunch Day 1|2024-10-26T12:30:00-04:00",
        )
        .unwrap();

        assert_eq!(times.len(), 2);
        assert_eq!(times[0].name, "sign_in");
        assert_eq!(times[1].description, "Lunch Day 1");
        assert_eq!(times[0].time, at(10, 26, 14));
    }

    #[test]
    fn sign_in_times_must_be_well_formed_and_ordered() {
        assert_eq!(
            SignInTime::parse_list("sign_in|missing time"),
            Err(SignInTimeParseError::Format("sign_in|missing time".into()))
        );
        assert_eq!(
            SignInTime::parse_list("a|A|yesterday"),
            Err(SignInTimeParseError::Time("a|A|yesterday".into()))
        );
        assert!(matches!(
            SignInTime::parse_list(
                "b|B|2024-10-26T12:00:00Z;a|A|2024-10-26T10:00:00Z"
            ),
            Err(SignInTimeParseError::Order(_))
        ));
    }
}
