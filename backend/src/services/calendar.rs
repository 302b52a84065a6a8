//! Calendar service: month views and the upcoming task window

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::plant::PlantService;
use super::seed::SeedService;
use super::seedling::SeedlingService;
use crate::error::AppResult;
use crate::models::SeedLot;
use shared::calendar::{self, CalendarIndex, EventItem, EventKind, MonthNav, UpcomingTask};
use shared::schedule::{FrostDates, SeasonFrostDates};
use shared::types::DateRange;

/// Calendar service building event indexes from a user's records
#[derive(Clone)]
pub struct CalendarService {
    db: PgPool,
    frost: FrostDates,
    window_days: u32,
}

/// Event as shown in a calendar cell
#[derive(Debug, Serialize)]
pub struct CalendarEvent {
    pub kind: EventKind,
    pub action: &'static str,
    pub badge: &'static str,
    #[serde(flatten)]
    pub item: EventItem,
}

#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Serialize)]
pub struct MonthView {
    #[serde(flatten)]
    pub nav: MonthNav,
    pub frost: SeasonFrostDates,
    pub weeks: Vec<Vec<CalendarDay>>,
}

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new(db: PgPool, frost: FrostDates, window_days: u32) -> Self {
        Self {
            db,
            frost,
            window_days,
        }
    }

    /// Index for `year`; seed projections of `extra_year` are merged in when given
    async fn load_index(
        &self,
        user_id: Uuid,
        year: i32,
        extra_year: Option<i32>,
    ) -> AppResult<CalendarIndex> {
        let seeds: Vec<SeedLot> = SeedService::new(self.db.clone()).list(user_id).await?;
        let seedlings = SeedlingService::new(self.db.clone()).list_batches(user_id).await?;
        let plants = PlantService::new(self.db.clone()).list_records(user_id).await?;

        let season = self.frost.for_year(year)?;
        let mut index = calendar::build_calendar(&seeds, &seedlings, &plants, season.last_frost);

        if let Some(next) = extra_year.filter(|next| *next != year) {
            let next_season = self.frost.for_year(next)?;
            index.merge(calendar::build_calendar(&seeds, &[], &[], next_season.last_frost));
        }

        tracing::debug!(%user_id, year, days = index.len(), "Built calendar index");
        Ok(index)
    }

    pub async fn month(&self, user_id: Uuid, year: i32, month: u32) -> AppResult<MonthView> {
        let nav = MonthNav::around(year, month)?;
        let grid = calendar::month_grid(year, month)?;
        let frost = self.frost.for_year(year)?;
        let index = self.load_index(user_id, year, None).await?;

        let weeks = grid
            .iter()
            .map(|week| {
                week.iter()
                    .map(|date| CalendarDay {
                        date: *date,
                        in_month: date.month() == month && date.year() == year,
                        events: index
                            .events_on(*date)
                            .map(|day| {
                                day.ordered()
                                    .map(|(kind, item)| CalendarEvent {
                                        kind,
                                        action: kind.action(),
                                        badge: kind.badge(),
                                        item: item.clone(),
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .collect();

        Ok(MonthView { nav, frost, weeks })
    }

    /// Tasks from `today` through the configured window
    pub async fn upcoming(&self, user_id: Uuid, today: NaiveDate) -> AppResult<Vec<UpcomingTask>> {
        let Some(window) = DateRange::starting_at(today, self.window_days) else {
            return Ok(Vec::new());
        };
        let index = self
            .load_index(user_id, today.year(), Some(window.end.year()))
            .await?;

        Ok(calendar::upcoming_tasks(&index, today, self.window_days))
    }
}
