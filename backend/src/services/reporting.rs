//! Reporting service for the dashboard and harvest analytics

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::calendar::CalendarService;
use super::container::ContainerService;
use super::harvest::{HarvestFilter, HarvestListRow, HarvestService};
use super::plant::PlantService;
use super::seed::SeedService;
use super::seedling::SeedlingService;
use crate::error::AppResult;
use crate::models::{PlantStatus, PlantSummaryRow, SeedLot, SeedlingView, YieldTotals};
use shared::calendar::UpcomingTask;
use shared::types::HarvestUnit;

/// Plants expected to be harvestable within this many days show on the dashboard
const HARVEST_SOON_DAYS: i64 = 14;
const RECENT_HARVEST_DAYS: i64 = 7;
const RECENT_HARVEST_LIMIT: usize = 10;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
    calendar: CalendarService,
    low_seed_threshold: i32,
}

/// Dashboard overview
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub active_plants: usize,
    pub active_seedlings: usize,
    pub available_space: i64,
    pub ready_to_transplant: Vec<SeedlingView>,
    pub ready_for_pot_up: Vec<SeedlingView>,
    pub harvest_soon: Vec<PlantSummaryRow>,
    pub recent_harvests: Vec<HarvestListRow>,
    pub low_stock_seeds: Vec<SeedLot>,
    pub upcoming_tasks: Vec<UpcomingTask>,
}

#[derive(Debug, sqlx::FromRow)]
struct VarietyRow {
    seed_id: Uuid,
    variety_name: String,
    plant_type: String,
    plant_count: i64,
    harvest_count: i64,
    total_yield: Decimal,
    avg_quality: Option<Decimal>,
}

/// Yield and quality per seed lot
#[derive(Debug, Serialize)]
pub struct VarietyPerformance {
    pub seed_id: Uuid,
    pub variety_name: String,
    pub plant_type: String,
    pub plant_count: i64,
    pub harvest_count: i64,
    pub total_yield: Decimal,
    pub average_yield_per_plant: Decimal,
    pub avg_quality: Option<Decimal>,
}

impl From<VarietyRow> for VarietyPerformance {
    fn from(row: VarietyRow) -> Self {
        let totals = YieldTotals {
            total_yield: row.total_yield,
            harvest_count: usize::try_from(row.harvest_count).unwrap_or(0),
        };
        let plants = usize::try_from(row.plant_count).unwrap_or(0);

        Self {
            average_yield_per_plant: totals.average_per_plant(plants).round_dp(2),
            seed_id: row.seed_id,
            variety_name: row.variety_name,
            plant_type: row.plant_type,
            plant_count: row.plant_count,
            harvest_count: row.harvest_count,
            total_yield: row.total_yield,
            avg_quality: row.avg_quality.map(|q| q.round_dp(1)),
        }
    }
}

/// Harvest totals for one month and unit
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MonthlyHarvest {
    pub period: String,
    pub unit: HarvestUnit,
    pub total_amount: Decimal,
    pub harvest_count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: PlantStatus,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub varieties: Vec<VarietyPerformance>,
    pub monthly: Vec<MonthlyHarvest>,
    pub plant_statuses: Vec<StatusCount>,
}

fn within(date: Option<NaiveDate>, start: NaiveDate, end: NaiveDate) -> bool {
    date.is_some_and(|d| d >= start && d <= end)
}

impl ReportingService {
    pub fn new(db: PgPool, calendar: CalendarService, low_seed_threshold: i32) -> Self {
        Self {
            db,
            calendar,
            low_seed_threshold,
        }
    }

    pub async fn dashboard(&self, user_id: Uuid, today: NaiveDate) -> AppResult<Dashboard> {
        let seedlings = SeedlingService::new(self.db.clone())
            .list(user_id, false, today)
            .await?;
        let plants = PlantService::new(self.db.clone()).list(user_id, false).await?;
        let containers = ContainerService::new(self.db.clone()).list(user_id).await?;
        let low_stock_seeds = SeedService::new(self.db.clone())
            .low_stock(user_id, self.low_seed_threshold)
            .await?;

        let recent_filter = HarvestFilter {
            start_date: Some(today - Duration::days(RECENT_HARVEST_DAYS)),
            end_date: Some(today),
        };
        let mut recent_harvests = HarvestService::new(self.db.clone())
            .list(user_id, &recent_filter)
            .await?;
        recent_harvests.truncate(RECENT_HARVEST_LIMIT);

        let upcoming_tasks = self.calendar.upcoming(user_id, today).await?;

        let active_seedlings = seedlings.len();
        let (ready_to_transplant, rest): (Vec<_>, Vec<_>) = seedlings
            .into_iter()
            .partition(|view| view.batch.status.is_transplantable());
        let ready_for_pot_up = rest.into_iter().filter(|view| view.ready_for_pot_up).collect();

        let harvest_until = today + Duration::days(HARVEST_SOON_DAYS);
        let active: Vec<PlantSummaryRow> = plants
            .into_iter()
            .filter(|plant| plant.status.is_active())
            .collect();
        let active_plants = active.len();
        let harvest_soon = active
            .into_iter()
            .filter(|plant| within(plant.expected_harvest_date, today, harvest_until))
            .collect();

        let available_space = containers
            .iter()
            .map(|view| i64::from(view.available_space))
            .sum();

        Ok(Dashboard {
            active_plants,
            active_seedlings,
            available_space,
            ready_to_transplant,
            ready_for_pot_up,
            harvest_soon,
            recent_harvests,
            low_stock_seeds,
            upcoming_tasks,
        })
    }

    pub async fn analytics(&self, user_id: Uuid) -> AppResult<Analytics> {
        let varieties = sqlx::query_as::<_, VarietyRow>(
            r#"
            SELECT
                s.id as seed_id,
                s.variety_name,
                s.plant_type,
                COUNT(DISTINCT p.id) as plant_count,
                COUNT(h.id) as harvest_count,
                COALESCE(SUM(h.amount), 0) as total_yield,
                AVG(h.quality_rating)::NUMERIC as avg_quality
            FROM seeds s
            JOIN plants p ON p.seed_id = s.id
            LEFT JOIN harvests h ON h.plant_id = p.id
            WHERE s.user_id = $1
            GROUP BY s.id, s.variety_name, s.plant_type
            ORDER BY total_yield DESC, s.variety_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let monthly = sqlx::query_as::<_, MonthlyHarvest>(
            r#"
            SELECT
                TO_CHAR(DATE_TRUNC('month', h.harvest_date), 'YYYY-MM') as period,
                h.unit,
                SUM(h.amount) as total_amount,
                COUNT(h.id) as harvest_count
            FROM harvests h
            JOIN plants p ON p.id = h.plant_id
            WHERE p.user_id = $1
            GROUP BY period, h.unit
            ORDER BY period, h.unit
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let plant_statuses = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) as count
            FROM plants
            WHERE user_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(Analytics {
            varieties: varieties.into_iter().map(VarietyPerformance::from).collect(),
            monthly,
            plant_statuses,
        })
    }
}
