macro_rules! get_env {
    ($env:literal) => {
        std::env::var($env).expect(concat!("Missing env var ", $env))
    };
}

macro_rules! get_env_or {
    ($env:literal, $default:expr) => {
        std::env::var($env).unwrap_or_else(|_| String::from($default))
    };
}

pub mod env_var {
    use lazy_static::lazy_static;

    lazy_static! {
        static ref ENV_VAR: EnvVar = load_env();
    }

    #[derive(Debug, Clone)]
    pub struct EnvVar {
        pub port: u16,
        pub token_key: String,
        pub database_host: String,
        pub database_port: u16,
        pub database_name: String,
        pub database_user: String,
        pub database_password: String,
        pub database_url: String,
        pub media_root: String,
    }

    fn load_env() -> EnvVar {
        let port: u16 = get_env!("PORT").parse().expect("Invalid PORT");
        let token_key = get_env!("TOKEN_KEY");
        let database_host = get_env!("DATABASE_HOST");
        let database_name = get_env!("DATABASE_NAME");
        let database_user = get_env!("DATABASE_USER");
        let database_password = get_env!("DATABASE_PASSWORD");
        let database_port: u16 = get_env!("DATABASE_PORT")
            .parse()
            .expect("Invalid DATABASE_PORT");
        let media_root = get_env_or!("MEDIA_ROOT", "media");

        let database_url = format!("postgres://{database_user}:{database_password}@{database_host}:{database_port}/{database_name}");

        EnvVar {
            port,
            token_key,
            database_host,
            database_name,
            database_password,
            database_port,
            database_user,
            database_url,
            media_root,
        }
    }

    pub fn get() -> &'static EnvVar {
        &ENV_VAR
    }
}

/// Event specific settings.
///
/// Every value can be overwritten from the environment, the defaults
/// describe the NewHacks 2024 edition.
pub mod event {
    use chrono::{DateTime, Duration, FixedOffset, Utc};
    use lazy_static::lazy_static;

    use crate::domain::schedule::{EventSchedule, SignInTime};

    lazy_static! {
        static ref EVENT_SETTINGS: EventSettings = load_settings();
    }

    const DEFAULT_SIGN_IN_TIMES: &str = concat!(
        "sign_in|Hackathon Sign In|2024-10-26T10:00:00-04:00;",
        "lunch1|Lunch Day 1|2024-10-26T12:30:00-04:00;",
        "dinner1|Dinner Day 1|2024-10-26T18:00:00-04:00;",
        "breakfast2|Breakfast Day 2|2024-10-27T08:00:00-04:00;",
        "lunch2|Lunch Day 2|2024-10-27T11:45:00-04:00",
    );

    #[derive(Debug, Clone)]
    pub struct EventSettings {
        pub hackathon_name: String,
        pub contact_email: String,
        pub participant_package_link: String,
        /// Chat room name and invite link
        pub chat_room: (String, String),
        pub schedule: EventSchedule,
        pub sign_in_times: Vec<SignInTime>,
        pub minimum_age: u32,
        pub min_members: u32,
        pub max_members: u32,
        pub rsvp: bool,
        pub teams: bool,
    }

    impl EventSettings {
        pub fn sign_in_time(&self, name: &str) -> Option<&SignInTime> {
            self.sign_in_times.iter().find(|time| time.name == name)
        }
    }

    fn parse_date(var: &str, value: &str) -> DateTime<Utc> {
        DateTime::<FixedOffset>::parse_from_rfc3339(value)
            .unwrap_or_else(|err| panic!("Invalid {var} date {value:?}: {err}"))
            .with_timezone(&Utc)
    }

    macro_rules! get_date {
        ($env:literal, $default:expr) => {
            parse_date($env, &get_env_or!($env, $default))
        };
    }

    macro_rules! get_parsed {
        ($env:literal, $default:literal) => {
            get_env_or!($env, $default)
                .parse()
                .expect(concat!("Invalid ", $env))
        };
    }

    fn get_flag(var: &'static str, default: bool) -> bool {
        match std::env::var(var) {
            Ok(value) => matches!(value.as_str(), "1" | "true" | "True" | "TRUE"),
            Err(_) => default,
        }
    }

    fn load_settings() -> EventSettings {
        let registration_open = get_date!("REGISTRATION_OPEN_DATE", "2024-01-18T00:00:00-05:00");
        let registration_close =
            get_date!("REGISTRATION_CLOSE_DATE", "2024-10-11T23:59:00-04:00");
        let application_open = get_date!("APPLICATION_OPEN_DATE", "2024-09-25T00:00:00-04:00");
        let event_start = get_date!("EVENT_START_DATE", "2024-10-26T08:00:00-04:00");
        let event_end = get_date!("EVENT_END_DATE", "2024-10-27T17:00:00-04:00");

        let hardware_sign_out_start = std::env::var("HARDWARE_SIGN_OUT_START_DATE")
            .map(|value| parse_date("HARDWARE_SIGN_OUT_START_DATE", &value))
            .unwrap_or(event_start);
        let hardware_sign_out_end = std::env::var("HARDWARE_SIGN_OUT_END_DATE")
            .map(|value| parse_date("HARDWARE_SIGN_OUT_END_DATE", &value))
            .unwrap_or(event_end);
        let waitlisted_acceptance_start = std::env::var("WAITLISTED_ACCEPTANCE_START_TIME")
            .map(|value| parse_date("WAITLISTED_ACCEPTANCE_START_TIME", &value))
            .unwrap_or(event_start + Duration::hours(1));
        let final_review_response_date = std::env::var("FINAL_REVIEW_RESPONSE_DATE")
            .map(|value| parse_date("FINAL_REVIEW_RESPONSE_DATE", &value))
            .unwrap_or(registration_close + Duration::days(7));

        let rsvp_days: i64 = get_parsed!("RSVP_DAYS", "10");

        let schedule = EventSchedule {
            registration_open,
            registration_close,
            application_open,
            event_start,
            event_end,
            hardware_sign_out_start,
            hardware_sign_out_end,
            waitlisted_acceptance_start,
            final_review_response_date,
            rsvp_days,
        };

        let sign_in_times = SignInTime::parse_list(&get_env_or!(
            "SIGN_IN_TIMES",
            DEFAULT_SIGN_IN_TIMES
        ))
        .unwrap_or_else(|err| panic!("Invalid SIGN_IN_TIMES: {err}"));

        EventSettings {
            hackathon_name: get_env_or!("HACKATHON_NAME", "NewHacks"),
            contact_email: get_env_or!("CONTACT_EMAIL", "hello@newhacks.ca"),
            participant_package_link: get_env_or!("PARTICIPANT_PACKAGE_LINK", ""),
            chat_room: (
                get_env_or!("CHAT_ROOM_NAME", "Discord"),
                get_env_or!("CHAT_ROOM_LINK", "https://discord.gg/cqW93CMu"),
            ),
            schedule,
            sign_in_times,
            minimum_age: get_parsed!("MINIMUM_AGE", "18"),
            min_members: get_parsed!("MIN_MEMBERS", "2"),
            max_members: get_parsed!("MAX_MEMBERS", "4"),
            rsvp: get_flag("RSVP", true),
            teams: get_flag("TEAMS", true),
        }
    }

    pub fn get() -> &'static EventSettings {
        &EVENT_SETTINGS
    }
}
