//! Schedule generation from a medication's dosing frequency.
//!
//! Pure slot derivation: a frequency maps to a fixed table of time-of-day
//! slots and day patterns. No I/O and no validation; callers
//! (`MedicationService`) validate the frequency parameters before invoking
//! the generator.

use chrono::NaiveTime;

use crate::domain::models::medication::FrequencyType;
use crate::domain::models::schedule::ALL_DAYS;

/// A schedule slot derived from a frequency, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSpec {
    pub medication_id: String,
    pub frequency: FrequencyType,
    pub time_of_day: NaiveTime,
    pub days_of_week: String,
    /// 0 when the frequency has no hour interval
    pub custom_frequency_hours: u32,
}

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).expect("valid constant time")
}

fn spec(
    medication_id: &str,
    frequency: FrequencyType,
    hour: u32,
    days_of_week: &str,
    custom_frequency_hours: u32,
) -> ScheduleSpec {
    ScheduleSpec {
        medication_id: medication_id.to_string(),
        frequency,
        time_of_day: time(hour),
        days_of_week: days_of_week.to_string(),
        custom_frequency_hours,
    }
}

/// Derive the ordered list of schedule slots for a medication.
///
/// `days_of_week` defaults to "Monday" for Weekly frequencies and
/// `monthly_day` to 1 for Monthly; `custom_frequency_hours` defaults to 24
/// for Custom/EveryFewHours.
pub fn generate_schedule_specs(
    medication_id: &str,
    frequency: FrequencyType,
    custom_frequency_hours: Option<u32>,
    days_of_week: Option<&str>,
    monthly_day: Option<u32>,
) -> Vec<ScheduleSpec> {
    match frequency {
        FrequencyType::OnceDaily => {
            vec![spec(medication_id, frequency, 9, ALL_DAYS, 0)]
        }
        FrequencyType::TwiceDaily => vec![
            spec(medication_id, frequency, 9, ALL_DAYS, 0),
            spec(medication_id, frequency, 21, ALL_DAYS, 0),
        ],
        FrequencyType::ThreeTimesDaily => vec![
            spec(medication_id, frequency, 8, ALL_DAYS, 0),
            spec(medication_id, frequency, 14, ALL_DAYS, 0),
            spec(medication_id, frequency, 20, ALL_DAYS, 0),
        ],
        FrequencyType::FourTimesDaily => vec![
            spec(medication_id, frequency, 6, ALL_DAYS, 0),
            spec(medication_id, frequency, 12, ALL_DAYS, 0),
            spec(medication_id, frequency, 18, ALL_DAYS, 0),
            spec(medication_id, frequency, 22, ALL_DAYS, 0),
        ],
        FrequencyType::EveryFewHours | FrequencyType::Custom => {
            let hours = custom_frequency_hours.unwrap_or(24);
            vec![spec(medication_id, frequency, 9, ALL_DAYS, hours)]
        }
        // Informational only: a nominal slot with no enforced recurrence
        FrequencyType::AsNeeded => {
            vec![spec(medication_id, frequency, 9, ALL_DAYS, 0)]
        }
        FrequencyType::Weekly => {
            let days = days_of_week.filter(|d| !d.trim().is_empty()).unwrap_or("Monday");
            vec![spec(medication_id, frequency, 9, days, 0)]
        }
        FrequencyType::Monthly => {
            let day = monthly_day.unwrap_or(1).to_string();
            vec![spec(medication_id, frequency, 9, &day, 0)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(specs: &[ScheduleSpec]) -> Vec<String> {
        specs.iter().map(|s| s.time_of_day.format("%H:%M").to_string()).collect()
    }

    #[test]
    fn test_once_daily_single_morning_slot() {
        let specs = generate_schedule_specs("medication::1", FrequencyType::OnceDaily, None, None, None);
        assert_eq!(specs.len(), 1);
        assert_eq!(times(&specs), vec!["09:00"]);
        assert_eq!(specs[0].days_of_week, ALL_DAYS);
        assert_eq!(specs[0].custom_frequency_hours, 0);
    }

    #[test]
    fn test_twice_daily_morning_and_evening() {
        let specs = generate_schedule_specs("medication::1", FrequencyType::TwiceDaily, None, None, None);
        assert_eq!(times(&specs), vec!["09:00", "21:00"]);
        assert!(specs.iter().all(|s| s.days_of_week == ALL_DAYS));
    }

    #[test]
    fn test_three_times_daily_slots() {
        let specs =
            generate_schedule_specs("medication::1", FrequencyType::ThreeTimesDaily, None, None, None);
        assert_eq!(times(&specs), vec!["08:00", "14:00", "20:00"]);
    }

    #[test]
    fn test_four_times_daily_slots() {
        let specs =
            generate_schedule_specs("medication::1", FrequencyType::FourTimesDaily, None, None, None);
        assert_eq!(times(&specs), vec!["06:00", "12:00", "18:00", "22:00"]);
    }

    #[test]
    fn test_custom_carries_hour_interval() {
        let specs =
            generate_schedule_specs("medication::1", FrequencyType::Custom, Some(6), None, None);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].custom_frequency_hours, 6);
        assert_eq!(times(&specs), vec!["09:00"]);
    }

    #[test]
    fn test_every_few_hours_defaults_to_24() {
        let specs =
            generate_schedule_specs("medication::1", FrequencyType::EveryFewHours, None, None, None);
        assert_eq!(specs[0].custom_frequency_hours, 24);
    }

    #[test]
    fn test_weekly_defaults_to_monday() {
        let specs = generate_schedule_specs("medication::1", FrequencyType::Weekly, None, None, None);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].days_of_week, "Monday");
    }

    #[test]
    fn test_weekly_uses_supplied_days() {
        let specs = generate_schedule_specs(
            "medication::1",
            FrequencyType::Weekly,
            None,
            Some("Tuesday,Friday"),
            None,
        );
        assert_eq!(specs[0].days_of_week, "Tuesday,Friday");
    }

    #[test]
    fn test_monthly_defaults_to_first() {
        let specs = generate_schedule_specs("medication::1", FrequencyType::Monthly, None, None, None);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].days_of_week, "1");
    }

    #[test]
    fn test_monthly_uses_supplied_day() {
        let specs =
            generate_schedule_specs("medication::1", FrequencyType::Monthly, None, None, Some(15));
        assert_eq!(specs[0].days_of_week, "15");
    }

    #[test]
    fn test_as_needed_single_nominal_slot() {
        let specs = generate_schedule_specs("medication::1", FrequencyType::AsNeeded, None, None, None);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].custom_frequency_hours, 0);
    }
}
