//! Planting calendar: a date-indexed index of seed starts, transplants and
//! harvests, and the "upcoming tasks" window derived from it

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GardenError, GardenResult};
use crate::models::{PlantRecord, SeedLot, SeedlingBatch, SeedlingStatus};
use crate::schedule::{self, DEFAULT_TRANSPLANT_OFFSET_WEEKS};
use crate::types::DateRange;

/// Days covered by the upcoming tasks view, today included
pub const UPCOMING_WINDOW_DAYS: u32 = 14;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SeedStart,
    Transplant,
    Harvest,
}

impl EventKind {
    /// Label shown next to a task
    pub fn action(&self) -> &'static str {
        match self {
            EventKind::SeedStart => "Start Seeds",
            EventKind::Transplant => "Transplant",
            EventKind::Harvest => "Harvest",
        }
    }

    /// Stable identifier used by the UI
    pub fn task_type(&self) -> &'static str {
        match self {
            EventKind::SeedStart => "seed-start",
            EventKind::Transplant => "transplant",
            EventKind::Harvest => "harvest",
        }
    }

    /// UI badge category
    pub fn badge(&self) -> &'static str {
        match self {
            EventKind::SeedStart => "warning",
            EventKind::Transplant => "success",
            EventKind::Harvest => "info",
        }
    }
}

/// Where an event was projected from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Seed,
    Seedling,
    Plant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventItem {
    pub id: Uuid,
    pub name: String,
    pub plant_type: String,
    pub source: EventSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
}

/// Events falling on one date, grouped by kind in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayEvents {
    pub seed_starts: Vec<EventItem>,
    pub transplants: Vec<EventItem>,
    pub harvests: Vec<EventItem>,
}

impl DayEvents {
    pub fn list_mut(&mut self, kind: EventKind) -> &mut Vec<EventItem> {
        match kind {
            EventKind::SeedStart => &mut self.seed_starts,
            EventKind::Transplant => &mut self.transplants,
            EventKind::Harvest => &mut self.harvests,
        }
    }

    /// Seed starts, then transplants, then harvests
    pub fn ordered(&self) -> impl Iterator<Item = (EventKind, &EventItem)> {
        self.seed_starts
            .iter()
            .map(|item| (EventKind::SeedStart, item))
            .chain(self.transplants.iter().map(|item| (EventKind::Transplant, item)))
            .chain(self.harvests.iter().map(|item| (EventKind::Harvest, item)))
    }

    pub fn is_empty(&self) -> bool {
        self.seed_starts.is_empty() && self.transplants.is_empty() && self.harvests.is_empty()
    }
}

/// Date-keyed event index, iterated in date order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CalendarIndex {
    days: BTreeMap<NaiveDate, DayEvents>,
}

impl CalendarIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; items on the same date and kind accumulate
    pub fn add_event(&mut self, date: NaiveDate, kind: EventKind, item: EventItem) {
        self.days.entry(date).or_default().list_mut(kind).push(item);
    }

    /// Fold another index in; its items land after ours on shared dates
    pub fn merge(&mut self, other: CalendarIndex) {
        for (date, day) in other.days {
            let target = self.days.entry(date).or_default();
            target.seed_starts.extend(day.seed_starts);
            target.transplants.extend(day.transplants);
            target.harvests.extend(day.harvests);
        }
    }

    pub fn events_on(&self, date: NaiveDate) -> Option<&DayEvents> {
        self.days.get(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayEvents)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days within `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = (&NaiveDate, &DayEvents)> {
        self.days.range(start..=end)
    }
}

/// Seedling statuses whose expected transplant shows on the calendar
fn is_calendar_seedling(status: SeedlingStatus) -> bool {
    matches!(
        status,
        SeedlingStatus::Germinating | SeedlingStatus::Growing | SeedlingStatus::Ready
    )
}

/// Merge projected dates from seeds, seedling batches and plants into one index
///
/// - seed lots with stock are projected against a transplant target two weeks
///   after last frost: seed start, transplant and (when maturity is known) harvest
/// - active seedling batches contribute their expected transplant date
/// - active plants contribute their expected harvest date
///
/// `seeds` should hold every seed lot the batches and plants refer to, so
/// their names can be resolved; lots without stock are not projected.
pub fn build_calendar(
    seeds: &[SeedLot],
    seedlings: &[SeedlingBatch],
    plants: &[PlantRecord],
    last_frost: NaiveDate,
) -> CalendarIndex {
    let mut index = CalendarIndex::new();
    let by_id: HashMap<Uuid, &SeedLot> = seeds.iter().map(|seed| (seed.id, seed)).collect();
    let transplant_target = schedule::transplant_target(last_frost, DEFAULT_TRANSPLANT_OFFSET_WEEKS);

    for seed in seeds.iter().filter(|seed| seed.has_stock()) {
        let projected = schedule::compute_seed_schedule(seed, transplant_target);
        let item = EventItem {
            id: seed.id,
            name: seed.variety_name.clone(),
            plant_type: seed.plant_type.clone(),
            source: EventSource::Seed,
            quantity: None,
        };

        index.add_event(projected.seed_start_date, EventKind::SeedStart, item.clone());
        index.add_event(projected.transplant_date, EventKind::Transplant, item.clone());
        if let Some(harvest_date) = projected.harvest_date {
            index.add_event(harvest_date, EventKind::Harvest, item);
        }
    }

    for batch in seedlings.iter().filter(|batch| is_calendar_seedling(batch.status)) {
        let Some(date) = batch.expected_transplant_date else {
            continue;
        };
        let (name, plant_type) = seed_labels(&by_id, batch.seed_id);
        index.add_event(
            date,
            EventKind::Transplant,
            EventItem {
                id: batch.id,
                name,
                plant_type,
                source: EventSource::Seedling,
                quantity: batch.quantity_viable,
            },
        );
    }

    for plant in plants.iter().filter(|plant| plant.status.is_active()) {
        let Some(date) = plant.expected_harvest_date else {
            continue;
        };
        let (variety, plant_type) = seed_labels(&by_id, plant.seed_id);
        index.add_event(
            date,
            EventKind::Harvest,
            EventItem {
                id: plant.id,
                name: plant.plant_name.clone().unwrap_or(variety),
                plant_type,
                source: EventSource::Plant,
                quantity: None,
            },
        );
    }

    index
}

fn seed_labels(by_id: &HashMap<Uuid, &SeedLot>, seed_id: Uuid) -> (String, String) {
    by_id
        .get(&seed_id)
        .map(|seed| (seed.variety_name.clone(), seed.plant_type.clone()))
        .unwrap_or_else(|| ("Unknown variety".to_string(), "unknown".to_string()))
}

/// One entry of the upcoming tasks list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpcomingTask {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub action: String,
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub badge: String,
}

/// Flatten the next `window_days` days (today included) into a task list
///
/// Tasks come out in date order; within a day seed starts precede
/// transplants, which precede harvests.
pub fn upcoming_tasks(index: &CalendarIndex, today: NaiveDate, window_days: u32) -> Vec<UpcomingTask> {
    let Some(window) = DateRange::starting_at(today, window_days) else {
        return Vec::new();
    };

    index
        .between(window.start, window.end)
        .flat_map(|(date, day)| {
            day.ordered().map(move |(kind, item)| UpcomingTask {
                date: *date,
                kind,
                action: kind.action().to_string(),
                name: item.name.clone(),
                task_type: kind.task_type().to_string(),
                badge: kind.badge().to_string(),
            })
        })
        .collect()
}

/// Weeks of a month as full Sunday-to-Saturday rows
pub fn month_grid(year: i32, month: u32) -> GardenResult<Vec<[NaiveDate; 7]>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| GardenError::validation("month", format!("{}-{} is not a valid month", year, month)))?;
    let nav = MonthNav::around(year, month)?;
    let next_first = NaiveDate::from_ymd_opt(nav.next_year, nav.next_month, 1)
        .ok_or_else(|| GardenError::validation("month", "month out of range"))?;
    let last = next_first - Duration::days(1);

    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let end = last + Duration::days(i64::from(6 - last.weekday().num_days_from_sunday()));

    let mut weeks = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let mut week = [cursor; 7];
        for (offset, slot) in week.iter_mut().enumerate() {
            *slot = cursor + Duration::days(offset as i64);
        }
        weeks.push(week);
        cursor += Duration::days(7);
    }
    Ok(weeks)
}

/// A month and its neighbours, for calendar navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthNav {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub prev_year: i32,
    pub prev_month: u32,
    pub next_year: i32,
    pub next_month: u32,
}

impl MonthNav {
    pub fn around(year: i32, month: u32) -> GardenResult<Self> {
        let name = u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| GardenError::validation("month", format!("{} is not a month", month)))?;

        let (prev_year, prev_month) = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

        Ok(Self {
            year,
            month,
            month_name: name.name().to_string(),
            prev_year,
            prev_month,
            next_year,
            next_month,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str) -> EventItem {
        EventItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            plant_type: "tomato".to_string(),
            source: EventSource::Seed,
            quantity: None,
        }
    }

    #[test]
    fn test_same_day_events_accumulate() {
        let mut index = CalendarIndex::new();
        index.add_event(date(2024, 3, 18), EventKind::SeedStart, item("A"));
        index.add_event(date(2024, 3, 18), EventKind::SeedStart, item("B"));
        let day = index.events_on(date(2024, 3, 18)).unwrap();
        let names: Vec<_> = day.seed_starts.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_window_excludes_day_fourteen() {
        let mut index = CalendarIndex::new();
        let today = date(2024, 4, 1);
        index.add_event(today, EventKind::Harvest, item("today"));
        index.add_event(date(2024, 4, 14), EventKind::Harvest, item("last"));
        index.add_event(date(2024, 4, 15), EventKind::Harvest, item("outside"));
        index.add_event(date(2024, 3, 31), EventKind::Harvest, item("past"));

        let names: Vec<_> = upcoming_tasks(&index, today, UPCOMING_WINDOW_DAYS)
            .into_iter()
            .map(|task| task.name)
            .collect();
        assert_eq!(names, vec!["today", "last"]);
    }

    #[test]
    fn test_month_grid_starts_on_sunday() {
        // April 2024 starts on a Monday
        let weeks = month_grid(2024, 4).unwrap();
        assert_eq!(weeks[0][0], date(2024, 3, 31));
        assert_eq!(weeks.last().unwrap()[6], date(2024, 5, 4));
        assert_eq!(weeks.len(), 5);
    }

    #[test]
    fn test_month_nav_wraps_years() {
        let jan = MonthNav::around(2024, 1).unwrap();
        assert_eq!((jan.prev_year, jan.prev_month), (2023, 12));
        assert_eq!(jan.month_name, "January");
        let dec = MonthNav::around(2024, 12).unwrap();
        assert_eq!((dec.next_year, dec.next_month), (2025, 1));
        assert!(MonthNav::around(2024, 13).is_err());
    }
}
