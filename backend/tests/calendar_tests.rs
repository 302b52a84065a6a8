//! Planting calendar tests
//!
//! Tests for the calendar index and upcoming task window including:
//! - Property 10: Upcoming Window Bounds
//! - Property 11: Upcoming Task Ordering
//! - Property 12: Month Grid Shape

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::calendar::{
    build_calendar, month_grid, upcoming_tasks, CalendarIndex, EventItem, EventKind, EventSource,
    MonthNav, UPCOMING_WINDOW_DAYS,
};
use shared::{PlantRecord, PlantStatus, SeedLot, SeedlingBatch, SeedlingStatus, SizeCategory};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_lot(name: &str, quantity: i32, weeks_to_transplant: i32, days_to_maturity: Option<i32>) -> SeedLot {
    SeedLot {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        variety_name: name.to_string(),
        plant_type: "tomato".to_string(),
        quantity,
        purchase_date: None,
        expiration_date: None,
        germination_rate: Some(Decimal::new(80, 0)),
        supplier: None,
        days_to_maturity,
        weeks_to_transplant,
        size_category: SizeCategory::Medium,
        notes: None,
        created_at: Utc::now(),
    }
}

fn batch_of(seed: &SeedLot, status: SeedlingStatus, expected: NaiveDate) -> SeedlingBatch {
    SeedlingBatch {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        seed_id: seed.id,
        sown_date: expected - Duration::weeks(6),
        germination_date: None,
        quantity_started: 6,
        quantity_viable: Some(5),
        expected_transplant_date: Some(expected),
        actual_transplant_date: None,
        potted_up_date: None,
        pot_size: None,
        quantity_potted_up: None,
        location: None,
        status,
        notes: None,
        created_at: Utc::now(),
    }
}

fn plant_of(seed_id: Uuid, name: Option<&str>, status: PlantStatus, harvest: NaiveDate) -> PlantRecord {
    PlantRecord {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        seed_id,
        seedling_id: None,
        container_id: None,
        plant_name: name.map(str::to_string),
        transplant_date: harvest - Duration::days(70),
        expected_harvest_date: Some(harvest),
        first_harvest_date: None,
        last_harvest_date: None,
        status,
        health_rating: None,
        notes: None,
        created_at: Utc::now(),
    }
}

fn item(name: &str) -> EventItem {
    EventItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        plant_type: "pepper".to_string(),
        source: EventSource::Seed,
        quantity: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Two lots with the same start date stay in the order they were given
    #[test]
    fn test_same_day_seed_starts_keep_insertion_order() {
        let first = seed_lot("Sungold", 10, 6, Some(65));
        let second = seed_lot("Black Krim", 4, 6, Some(80));
        let index = build_calendar(&[first, second], &[], &[], date(2024, 4, 15));

        let day = index.events_on(date(2024, 3, 18)).unwrap();
        let names: Vec<&str> = day.seed_starts.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Sungold", "Black Krim"]);

        let transplants = &index.events_on(date(2024, 4, 29)).unwrap().transplants;
        assert_eq!(transplants.len(), 2);
        assert!(index.events_on(date(2024, 7, 3)).is_some());
        assert!(index.events_on(date(2024, 7, 18)).is_some());
    }

    #[test]
    fn test_seed_without_stock_is_not_projected() {
        let empty = seed_lot("Sold Out", 0, 6, Some(70));
        let index = build_calendar(&[empty], &[], &[], date(2024, 4, 15));
        assert!(index.is_empty());
    }

    #[test]
    fn test_seedlings_and_plants_contribute_events() {
        let seed = seed_lot("Jalapeño", 0, 8, None);
        let ready = batch_of(&seed, SeedlingStatus::Ready, date(2024, 5, 10));
        let done = batch_of(&seed, SeedlingStatus::Transplanted, date(2024, 5, 10));
        let plant = plant_of(seed.id, Some("Deck pepper"), PlantStatus::Flowering, date(2024, 8, 1));
        let dead = plant_of(seed.id, None, PlantStatus::Dead, date(2024, 8, 1));

        let index = build_calendar(&[seed], &[ready.clone(), done], &[plant, dead], date(2024, 4, 15));

        let transplants = &index.events_on(date(2024, 5, 10)).unwrap().transplants;
        assert_eq!(transplants.len(), 1);
        assert_eq!(transplants[0].id, ready.id);
        assert_eq!(transplants[0].name, "Jalapeño");
        assert_eq!(transplants[0].quantity, Some(5));

        let harvests = &index.events_on(date(2024, 8, 1)).unwrap().harvests;
        assert_eq!(harvests.len(), 1);
        assert_eq!(harvests[0].name, "Deck pepper");
        assert_eq!(harvests[0].source, EventSource::Plant);
    }

    #[test]
    fn test_unknown_seed_falls_back_to_placeholder_name() {
        let orphan = plant_of(Uuid::new_v4(), None, PlantStatus::Growing, date(2024, 7, 1));
        let index = build_calendar(&[], &[], &[orphan], date(2024, 4, 15));
        let harvests = &index.events_on(date(2024, 7, 1)).unwrap().harvests;
        assert_eq!(harvests[0].name, "Unknown variety");
    }

    /// Within one day seed starts come first, then transplants, then harvests
    #[test]
    fn test_upcoming_orders_kinds_within_a_day() {
        let today = date(2024, 5, 1);
        let mut index = CalendarIndex::new();
        index.add_event(today + Duration::days(2), EventKind::Harvest, item("Radish"));
        index.add_event(today + Duration::days(2), EventKind::Transplant, item("Pepper"));
        index.add_event(today + Duration::days(2), EventKind::SeedStart, item("Squash"));
        index.add_event(today, EventKind::Harvest, item("Lettuce"));

        let tasks = upcoming_tasks(&index, today, UPCOMING_WINDOW_DAYS);
        let order: Vec<(&str, &str)> = tasks.iter().map(|t| (t.name.as_str(), t.task_type.as_str())).collect();
        assert_eq!(
            order,
            vec![
                ("Lettuce", "harvest"),
                ("Squash", "seed-start"),
                ("Pepper", "transplant"),
                ("Radish", "harvest"),
            ]
        );
        assert_eq!(tasks[1].action, "Start Seeds");
        assert_eq!(tasks[1].badge, "warning");
    }

    #[test]
    fn test_upcoming_window_includes_today_and_thirteen_more_days() {
        let today = date(2024, 5, 1);
        let mut index = CalendarIndex::new();
        index.add_event(today - Duration::days(1), EventKind::Harvest, item("Yesterday"));
        index.add_event(today + Duration::days(13), EventKind::Harvest, item("Last day"));
        index.add_event(today + Duration::days(14), EventKind::Harvest, item("Too late"));

        let tasks = upcoming_tasks(&index, today, UPCOMING_WINDOW_DAYS);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Last day");
        assert!(upcoming_tasks(&index, today, 0).is_empty());
    }

    /// A window that runs past December 31 picks up both years once merged
    #[test]
    fn test_merged_indexes_cover_year_boundary() {
        let mut this_year = CalendarIndex::new();
        this_year.add_event(date(2024, 12, 30), EventKind::Harvest, item("Kale"));
        let mut next_year = CalendarIndex::new();
        next_year.add_event(date(2025, 1, 3), EventKind::SeedStart, item("Onion"));
        this_year.merge(next_year);

        let tasks = upcoming_tasks(&this_year, date(2024, 12, 28), UPCOMING_WINDOW_DAYS);
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Kale", "Onion"]);

        let days: Vec<NaiveDate> = this_year.iter().map(|(day, _)| *day).collect();
        assert_eq!(days, vec![date(2024, 12, 30), date(2025, 1, 3)]);
        assert_eq!(this_year.len(), 2);
    }

    #[test]
    fn test_month_grid_pads_to_whole_weeks() {
        // June 2024 starts on a Saturday and ends on a Sunday
        let june = month_grid(2024, 6).unwrap();
        assert_eq!(june.len(), 6);
        assert_eq!(june[0][0], date(2024, 5, 26));
        assert_eq!(june[5][6], date(2024, 7, 6));

        // February 2026 fits exactly into four rows
        let feb = month_grid(2026, 2).unwrap();
        assert_eq!(feb.len(), 4);
        assert_eq!(feb[0][0], date(2026, 2, 1));

        assert!(month_grid(2024, 13).is_err());
    }

    #[test]
    fn test_month_nav_wraps_years() {
        let january = MonthNav::around(2025, 1).unwrap();
        assert_eq!(january.month_name, "January");
        assert_eq!((january.prev_year, january.prev_month), (2024, 12));
        assert_eq!((january.next_year, january.next_month), (2025, 2));

        let december = MonthNav::around(2025, 12).unwrap();
        assert_eq!((december.next_year, december.next_month), (2026, 1));
        assert!(MonthNav::around(2025, 0).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn kind_strategy() -> impl Strategy<Value = EventKind> {
        prop_oneof![
            Just(EventKind::SeedStart),
            Just(EventKind::Transplant),
            Just(EventKind::Harvest),
        ]
    }

    fn kind_rank(kind: EventKind) -> u8 {
        match kind {
            EventKind::SeedStart => 0,
            EventKind::Transplant => 1,
            EventKind::Harvest => 2,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property 10: Upcoming Window Bounds
        #[test]
        fn prop_upcoming_tasks_within_window(
            offsets in prop::collection::vec((-30i64..60, kind_strategy()), 0..40),
            window in 1u32..45
        ) {
            let today = date(2024, 6, 1);
            let mut index = CalendarIndex::new();
            for (offset, kind) in &offsets {
                index.add_event(today + Duration::days(*offset), *kind, item("Crop"));
            }

            let tasks = upcoming_tasks(&index, today, window);
            let expected = offsets
                .iter()
                .filter(|(offset, _)| *offset >= 0 && *offset < i64::from(window))
                .count();
            prop_assert_eq!(tasks.len(), expected);
            for task in &tasks {
                prop_assert!(task.date >= today);
                prop_assert!(task.date < today + Duration::days(i64::from(window)));
            }
        }

        /// Property 11: Upcoming Task Ordering
        /// Tasks are sorted by date, then by kind
        #[test]
        fn prop_upcoming_tasks_sorted(
            offsets in prop::collection::vec((0i64..14, kind_strategy()), 0..40)
        ) {
            let today = date(2024, 6, 1);
            let mut index = CalendarIndex::new();
            for (offset, kind) in &offsets {
                index.add_event(today + Duration::days(*offset), *kind, item("Crop"));
            }

            let tasks = upcoming_tasks(&index, today, UPCOMING_WINDOW_DAYS);
            for pair in tasks.windows(2) {
                let a = (pair[0].date, kind_rank(pair[0].kind));
                let b = (pair[1].date, kind_rank(pair[1].kind));
                prop_assert!(a <= b);
            }
        }

        /// Property 12: Month Grid Shape
        /// Rows are Sunday-to-Saturday runs of consecutive days covering the month
        #[test]
        fn prop_month_grid_shape(
            year in 1990i32..2100,
            month in 1u32..=12
        ) {
            let weeks = month_grid(year, month).unwrap();
            prop_assert!(weeks.len() >= 4 && weeks.len() <= 6);

            for week in &weeks {
                prop_assert_eq!(week[0].weekday(), Weekday::Sun);
                prop_assert_eq!(week[6].weekday(), Weekday::Sat);
            }

            let days: Vec<NaiveDate> = weeks.iter().flatten().copied().collect();
            for pair in days.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], Duration::days(1));
            }

            let in_month = days.iter().filter(|d| d.month() == month && d.year() == year).count();
            let first = date(year, month, 1);
            let next = MonthNav::around(year, month).unwrap();
            let last = date(next.next_year, next.next_month, 1) - Duration::days(1);
            prop_assert_eq!(in_month as i64, (last - first).num_days() + 1);
        }
    }
}
