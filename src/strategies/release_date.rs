use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::error;

use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;
use crate::util;

/// Activates a feature once a configured release instant has passed,
/// evaluated in local time. The date is required; the time of day is
/// optional and defaults to midnight.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReleaseDateActivationStrategy;

impl ReleaseDateActivationStrategy {
    pub const ID: &'static str = "release-date";
    pub const PARAM_DATE: &'static str = "date";
    pub const PARAM_TIME: &'static str = "time";

    pub fn new() -> Self {
        ReleaseDateActivationStrategy
    }

    fn parse_release_date(&self, state: &FeatureState) -> Option<NaiveDateTime> {
        let date_str = state.parameter(Self::PARAM_DATE).unwrap_or("");
        let time_str = state.parameter(Self::PARAM_TIME).unwrap_or("");

        let date = match NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                error!(
                    "invalid release date for feature {}: {:?}",
                    state.feature(),
                    date_str
                );
                return None;
            }
        };

        let time = if util::is_blank(time_str) {
            NaiveTime::MIN
        } else {
            match NaiveTime::parse_from_str(time_str.trim(), "%H:%M:%S") {
                Ok(time) => time,
                Err(_) => {
                    error!(
                        "invalid release time for feature {}: {:?}",
                        state.feature(),
                        time_str
                    );
                    return None;
                }
            }
        };

        Some(date.and_time(time))
    }
}

impl ActivationStrategy for ReleaseDateActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Release date"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::named(Self::PARAM_DATE)
                .label("Date")
                .matching(r"\d{4}\-\d{2}\-\d{2}")
                .description("Release date of the feature. Format: 2023-12-31"),
            Parameter::named(Self::PARAM_TIME)
                .label("Time")
                .matching(r"\d{2}\:\d{2}\:\d{2}")
                .optional()
                .description(
                    "Optional time for the release day. The default value is midnight. Format: 14:45:00",
                ),
        ]
    }

    fn is_active(&self, state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
        match self.parse_release_date(state) {
            Some(release) => Local::now().naive_local() > release,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn state(date: &str, time: Option<&str>) -> FeatureState {
        let mut state = FeatureState::new("F1".into());
        state.enable().set_parameter(ReleaseDateActivationStrategy::PARAM_DATE, date);
        if let Some(time) = time {
            state.set_parameter(ReleaseDateActivationStrategy::PARAM_TIME, time);
        }
        state
    }

    #[test]
    fn past_date_is_active() {
        let strategy = ReleaseDateActivationStrategy::new();
        assert!(strategy.is_active(&state("2012-12-31", None), None));
    }

    #[test]
    fn yesterday_is_active_and_tomorrow_is_not() {
        let strategy = ReleaseDateActivationStrategy::new();
        let yesterday = (Local::now() - Duration::days(1)).format("%Y-%m-%d").to_string();
        let tomorrow = (Local::now() + Duration::days(1)).format("%Y-%m-%d").to_string();
        assert!(strategy.is_active(&state(&yesterday, None), None));
        assert!(!strategy.is_active(&state(&tomorrow, None), None));
    }

    #[test]
    fn time_of_day_is_honored() {
        let strategy = ReleaseDateActivationStrategy::new();
        let just_passed = Local::now() - Duration::minutes(5);
        let upcoming = Local::now() + Duration::minutes(5);
        assert!(strategy.is_active(
            &state(
                &just_passed.format("%Y-%m-%d").to_string(),
                Some(&just_passed.format("%H:%M:%S").to_string())
            ),
            None
        ));
        assert!(!strategy.is_active(
            &state(
                &upcoming.format("%Y-%m-%d").to_string(),
                Some(&upcoming.format("%H:%M:%S").to_string())
            ),
            None
        ));
    }

    #[test]
    fn invalid_date_is_inactive() {
        let strategy = ReleaseDateActivationStrategy::new();
        assert!(!strategy.is_active(&state("not-a-date", None), None));
        assert!(!strategy.is_active(&state("2012-13-40", None), None));
        assert!(!strategy.is_active(&FeatureState::new("F1".into()), None));
    }

    #[test]
    fn invalid_time_is_inactive() {
        let strategy = ReleaseDateActivationStrategy::new();
        assert!(!strategy.is_active(&state("2012-12-31", Some("25:61:00")), None));
        assert!(!strategy.is_active(&state("2012-12-31", Some("noonish")), None));
    }
}
