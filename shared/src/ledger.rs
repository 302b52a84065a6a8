//! Quantity bookkeeping across the seed → seedling → plant → harvest chain
//!
//! Every function takes the current record by reference and returns the
//! updated record, leaving persistence to the caller. Seed quantities and
//! container occupancy are clamped at zero; over-consumption is reported back
//! as a shortfall rather than letting a counter go negative.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GardenError, GardenResult};
use crate::models::{
    Container, NewSeedlingBatch, PlantRecord, PlantStatus, SeedLot, SeedlingBatch,
    SeedlingStatus,
};
use crate::schedule;

/// Germinated batches are ready to pot up after this many days
pub const POT_UP_AFTER_DAYS: i64 = 14;

/// Seed lot after a sowing, plus any seeds asked for beyond what was on hand
#[derive(Debug, Clone, PartialEq)]
pub struct SowOutcome {
    pub seed: SeedLot,
    pub shortfall: i32,
}

/// Decrement a seed lot by the number of seeds sown
pub fn apply_sow(seed: &SeedLot, quantity_started: i32) -> GardenResult<SowOutcome> {
    if quantity_started <= 0 {
        return Err(GardenError::validation(
            "quantity_started",
            "Quantity started must be greater than 0",
        ));
    }

    let remaining = seed.quantity - quantity_started;
    let mut updated = seed.clone();
    updated.quantity = remaining.max(0);

    Ok(SowOutcome {
        seed: updated,
        shortfall: (-remaining).max(0),
    })
}

/// `growing` when germination was already observed at sowing time
pub fn initial_status(germination_date: Option<NaiveDate>) -> SeedlingStatus {
    if germination_date.is_some() {
        SeedlingStatus::Growing
    } else {
        SeedlingStatus::Germinating
    }
}

/// What the grower reports when sowing a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sowing {
    pub sown_date: NaiveDate,
    pub germination_date: Option<NaiveDate>,
    pub quantity_started: i32,
    pub quantity_viable: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Build the batch to insert and the seed lot after sowing, as one unit
pub fn prepare_sowing(seed: &SeedLot, sowing: Sowing) -> GardenResult<(NewSeedlingBatch, SowOutcome)> {
    if let Some(viable) = sowing.quantity_viable {
        if viable < 0 {
            return Err(GardenError::validation(
                "quantity_viable",
                "Viable quantity cannot be negative",
            ));
        }
    }
    if let Some(germinated) = sowing.germination_date {
        if germinated < sowing.sown_date {
            return Err(GardenError::validation(
                "germination_date",
                "Germination date cannot be before the sown date",
            ));
        }
    }

    let outcome = apply_sow(seed, sowing.quantity_started)?;
    let batch = NewSeedlingBatch {
        seed_id: seed.id,
        sown_date: sowing.sown_date,
        germination_date: sowing.germination_date,
        quantity_started: sowing.quantity_started,
        quantity_viable: sowing.quantity_viable.unwrap_or(sowing.quantity_started),
        expected_transplant_date: schedule::expected_transplant_date(
            sowing.sown_date,
            seed.weeks_to_transplant,
        ),
        location: sowing.location,
        status: initial_status(sowing.germination_date),
        notes: sowing.notes,
    };

    Ok((batch, outcome))
}

/// Record that a batch sprouted. Applying the same date twice is a no-op.
pub fn apply_germination(
    batch: &SeedlingBatch,
    germination_date: NaiveDate,
    quantity_viable: Option<i32>,
) -> GardenResult<SeedlingBatch> {
    if let Some(viable) = quantity_viable {
        if viable < 0 {
            return Err(GardenError::validation(
                "quantity_viable",
                "Viable quantity cannot be negative",
            ));
        }
    }

    let mut updated = batch.clone();
    updated.germination_date = Some(germination_date);
    if let Some(viable) = quantity_viable {
        updated.quantity_viable = Some(viable);
    }
    if updated.status == SeedlingStatus::Germinating {
        updated.status = SeedlingStatus::Growing;
    }
    Ok(updated)
}

/// Move a batch into intermediate pots
pub fn apply_pot_up(
    batch: &SeedlingBatch,
    potted_up_date: NaiveDate,
    pot_size: Option<String>,
    quantity: Option<i32>,
) -> GardenResult<SeedlingBatch> {
    if !batch.status.can_transition_to(SeedlingStatus::PottedUp) {
        return Err(GardenError::transition(batch.status, SeedlingStatus::PottedUp));
    }
    if let Some(qty) = quantity {
        if qty < 0 {
            return Err(GardenError::validation(
                "quantity_potted_up",
                "Potted up quantity cannot be negative",
            ));
        }
    }

    let mut updated = batch.clone();
    updated.status = SeedlingStatus::PottedUp;
    updated.potted_up_date = Some(potted_up_date);
    updated.pot_size = pot_size;
    updated.quantity_potted_up = quantity.or(batch.quantity_viable);
    Ok(updated)
}

/// Explicit status change requested by the grower
pub fn apply_status_change(
    batch: &SeedlingBatch,
    next: SeedlingStatus,
) -> GardenResult<SeedlingBatch> {
    if !batch.status.can_transition_to(next) {
        return Err(GardenError::transition(batch.status, next));
    }
    let mut updated = batch.clone();
    updated.status = next;
    Ok(updated)
}

/// Batch after seedlings were taken out of it for transplanting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionOutcome {
    pub batch: SeedlingBatch,
    /// Seedlings requested beyond what the batch had
    pub shortfall: i32,
}

/// Take `quantity` seedlings out of a batch
///
/// Counts come from `quantity_potted_up` when it is set and nonzero, else
/// from `quantity_viable`. The source field is reduced (never below zero) and
/// the batch is marked transplanted once nothing remains.
pub fn apply_transplant_consumption(
    batch: &SeedlingBatch,
    quantity: i32,
    transplant_date: NaiveDate,
) -> GardenResult<ConsumptionOutcome> {
    if quantity <= 0 {
        return Err(GardenError::validation(
            "quantity",
            "Quantity must be greater than 0",
        ));
    }
    if batch.status.is_terminal() {
        return Err(GardenError::transition(batch.status, SeedlingStatus::Transplanted));
    }

    let available = batch.available_quantity();
    let remaining = available - quantity;

    let mut updated = batch.clone();
    match batch.quantity_potted_up {
        Some(potted) if potted != 0 => updated.quantity_potted_up = Some(remaining.max(0)),
        _ => updated.quantity_viable = Some(remaining.max(0)),
    }

    if remaining <= 0 {
        updated.status = SeedlingStatus::Transplanted;
        updated.actual_transplant_date = Some(transplant_date);
    }

    Ok(ConsumptionOutcome {
        batch: updated,
        shortfall: (-remaining).max(0),
    })
}

pub fn check_batch_deletable(plant_count: i64) -> GardenResult<()> {
    if plant_count > 0 {
        return Err(GardenError::blocked("seedling batch", "plant(s)", plant_count));
    }
    Ok(())
}

/// Plants are checked before seedlings
pub fn check_seed_deletable(plant_count: i64, seedling_count: i64) -> GardenResult<()> {
    if plant_count > 0 {
        return Err(GardenError::blocked("seed", "plant(s)", plant_count));
    }
    if seedling_count > 0 {
        return Err(GardenError::blocked("seed", "seedling batch(es)", seedling_count));
    }
    Ok(())
}

pub fn check_container_deletable(active_plant_count: i64) -> GardenResult<()> {
    if active_plant_count > 0 {
        return Err(GardenError::blocked("container", "active plant(s)", active_plant_count));
    }
    Ok(())
}

/// Add `count` plants to a container. Does not enforce `max_plants`.
pub fn occupy_container(container: &Container, count: i32) -> Container {
    let mut updated = container.clone();
    updated.current_plants += count.max(0);
    updated
}

/// Remove `count` plants from a container, never going below zero
pub fn release_container(container: &Container, count: i32) -> Container {
    let mut updated = container.clone();
    updated.current_plants = (updated.current_plants - count.max(0)).max(0);
    updated
}

/// Update a plant's harvest dates for a new harvest
pub fn apply_harvest(plant: &PlantRecord, harvest_date: NaiveDate) -> GardenResult<PlantRecord> {
    if plant.status.is_terminal() {
        return Err(GardenError::transition(plant.status, PlantStatus::Producing));
    }

    let mut updated = plant.clone();
    if updated.first_harvest_date.is_none() {
        updated.first_harvest_date = Some(harvest_date);
        updated.status = PlantStatus::Producing;
    }
    updated.last_harvest_date = Some(match updated.last_harvest_date {
        Some(last) if last > harvest_date => last,
        _ => harvest_date,
    });
    Ok(updated)
}

/// Plant after a status change, and whether it gave up its container slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantStatusChange {
    pub plant: PlantRecord,
    pub releases_container: bool,
}

pub fn apply_plant_status_change(
    plant: &PlantRecord,
    next: PlantStatus,
) -> GardenResult<PlantStatusChange> {
    if plant.status.is_terminal() && next != plant.status {
        return Err(GardenError::transition(plant.status, next));
    }

    let releases_container = plant.container_id.is_some()
        && plant.status.occupies_container()
        && !next.occupies_container();

    let mut updated = plant.clone();
    updated.status = next;
    Ok(PlantStatusChange {
        plant: updated,
        releases_container,
    })
}

/// Whether deleting this plant should free its container slot
pub fn releases_container_on_delete(plant: &PlantRecord) -> bool {
    plant.container_id.is_some() && plant.status.occupies_container()
}

/// A growing batch whose germination is at least two weeks old
pub fn is_ready_for_pot_up(batch: &SeedlingBatch, today: NaiveDate) -> bool {
    batch.status == SeedlingStatus::Growing
        && batch.germination_date.is_some()
        && batch.days_since_germination(today) >= POT_UP_AFTER_DAYS
}

/// Names for `quantity` plants created together
///
/// A single plant keeps the base name (or none); several plants are numbered
/// `"<base> #i"`, falling back to the variety name.
pub fn plant_names(base_name: Option<&str>, variety_name: &str, quantity: i32) -> Vec<Option<String>> {
    let base = base_name.map(str::trim).filter(|name| !name.is_empty());
    if quantity <= 1 {
        return vec![base.map(str::to_string)];
    }
    let prefix = base.unwrap_or(variety_name);
    (1..=quantity)
        .map(|i| Some(format!("{} #{}", prefix, i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn batch(status: SeedlingStatus) -> SeedlingBatch {
        SeedlingBatch {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            seed_id: Uuid::new_v4(),
            sown_date: date(2024, 3, 1),
            germination_date: None,
            quantity_started: 10,
            quantity_viable: Some(8),
            expected_transplant_date: Some(date(2024, 4, 12)),
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

    #[test]
    fn test_pot_up_defaults_to_viable_quantity() {
        let growing = batch(SeedlingStatus::Growing);
        let potted = apply_pot_up(&growing, date(2024, 3, 20), Some("4 inch".into()), None).unwrap();
        assert_eq!(potted.status, SeedlingStatus::PottedUp);
        assert_eq!(potted.quantity_potted_up, Some(8));
        assert_eq!(potted.pot_size.as_deref(), Some("4 inch"));
    }

    #[test]
    fn test_pot_up_refused_for_failed_batch() {
        let failed = batch(SeedlingStatus::Failed);
        assert!(matches!(
            apply_pot_up(&failed, date(2024, 3, 20), None, Some(3)),
            Err(GardenError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_consumption_uses_viable_when_potted_up_is_zero() {
        let mut b = batch(SeedlingStatus::Ready);
        b.quantity_potted_up = Some(0);
        let outcome = apply_transplant_consumption(&b, 3, date(2024, 4, 29)).unwrap();
        assert_eq!(outcome.batch.quantity_viable, Some(5));
        assert_eq!(outcome.batch.quantity_potted_up, Some(0));
        assert_eq!(outcome.batch.status, SeedlingStatus::Ready);
    }

    #[test]
    fn test_over_consumption_reports_shortfall() {
        let b = batch(SeedlingStatus::Ready);
        let outcome = apply_transplant_consumption(&b, 10, date(2024, 4, 29)).unwrap();
        assert_eq!(outcome.shortfall, 2);
        assert_eq!(outcome.batch.quantity_viable, Some(0));
        assert_eq!(outcome.batch.status, SeedlingStatus::Transplanted);
        assert_eq!(outcome.batch.actual_transplant_date, Some(date(2024, 4, 29)));
    }

    #[test]
    fn test_ready_for_pot_up_after_two_weeks() {
        let mut b = batch(SeedlingStatus::Growing);
        b.germination_date = Some(date(2024, 3, 5));
        assert!(!is_ready_for_pot_up(&b, date(2024, 3, 18)));
        assert!(is_ready_for_pot_up(&b, date(2024, 3, 19)));

        b.germination_date = None;
        assert!(!is_ready_for_pot_up(&b, date(2024, 6, 1)));
    }

    #[test]
    fn test_plant_names() {
        assert_eq!(plant_names(None, "Jalapeño", 1), vec![None]);
        assert_eq!(plant_names(Some("Big Red"), "Jalapeño", 1), vec![Some("Big Red".to_string())]);
        assert_eq!(
            plant_names(Some(""), "Jalapeño", 2),
            vec![Some("Jalapeño #1".to_string()), Some("Jalapeño #2".to_string())]
        );
        assert_eq!(
            plant_names(Some("Deck"), "Jalapeño", 2),
            vec![Some("Deck #1".to_string()), Some("Deck #2".to_string())]
        );
    }
}
