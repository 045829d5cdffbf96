//! Unified client calendar.
//!
//! Merges three independent streams into one list of [`CalendarEvent`]s for
//! an inclusive range of days:
//! - appointments overlapping the range, placed on the UTC date of their
//!   start time or on the first day of the range if they began earlier
//! - fitness plan items, expanded weekly over the plan window
//! - nutrition plan items, expanded the same way
//!
//! Occurrence ids are derived from the source row id and, for recurring
//! items, the occurrence date. The same item on the same date always yields
//! the same id, which activity logs rely on.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use crate::error::DomainError;
use crate::models::activity_log::ItemType;
use crate::models::appointment::Appointment;
use crate::models::calendar::{CalendarEvent, DateRange, EventProps};
use crate::models::day::DayOfWeek;
use crate::models::fitness_plan::{FitnessPlanDetails, FitnessPlanItem};
use crate::models::nutrition_plan::{NutritionPlanDetails, NutritionPlanItem};
use crate::services::access;
use crate::session::Session;
use crate::storage::{Storage, StorageResult};

pub fn appointment_event_id(appointment_id: i64) -> String {
    format!("appt-{}", appointment_id)
}

pub fn fitness_event_id(item_id: i64, date: NaiveDate) -> String {
    format!("fit-item-{}-{}", item_id, date.format("%Y%m%d"))
}

pub fn nutrition_event_id(item_id: i64, date: NaiveDate) -> String {
    format!("nut-item-{}-{}", item_id, date.format("%Y%m%d"))
}

/// The three streams the calendar is built from.
#[async_trait]
pub trait CalendarSources: Send + Sync {
    async fn appointments(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StorageResult<Vec<Appointment>>;

    async fn fitness_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<FitnessPlanDetails>>;

    async fn nutrition_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<NutritionPlanDetails>>;
}

#[async_trait]
impl<S: Storage + ?Sized> CalendarSources for S {
    async fn appointments(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StorageResult<Vec<Appointment>> {
        self.list_appointments_for_client(client_id, from, until).await
    }

    async fn fitness_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<FitnessPlanDetails>> {
        self.list_active_fitness_plans(client_id, start, end).await
    }

    async fn nutrition_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<NutritionPlanDetails>> {
        self.list_active_nutrition_plans(client_id, start, end).await
    }
}

/// Returns the calendar of `client_id` for `range`.
///
/// Trainers may read their own clients' calendars and clients their own.
pub async fn client_calendar(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
    range: DateRange,
) -> Result<Vec<CalendarEvent>, DomainError> {
    let client = access::readable_client(storage, session, client_id).await?;
    collect_events(storage, client.id, range).await
}

/// Fetches all three streams concurrently and merges them. If any fetch
/// fails the whole call fails and no events are returned.
pub async fn collect_events(
    sources: &(impl CalendarSources + ?Sized),
    client_id: i64,
    range: DateRange,
) -> Result<Vec<CalendarEvent>, DomainError> {
    let (from, until) = range.instant_bounds();
    let (appointments, fitness, nutrition) = tokio::try_join!(
        sources.appointments(client_id, from, until),
        sources.fitness_plans(client_id, range.start(), range.end()),
        sources.nutrition_plans(client_id, range.start(), range.end()),
    )?;

    Ok(merge_events(range, &appointments, &fitness, &nutrition))
}

/// Builds the sorted event list from already-fetched sources.
///
/// Only occurrences dated inside `range` are emitted. Events are ordered by
/// start time, then by id.
pub fn merge_events(
    range: DateRange,
    appointments: &[Appointment],
    fitness: &[FitnessPlanDetails],
    nutrition: &[NutritionPlanDetails],
) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    let (from, until) = range.instant_bounds();
    for appt in appointments
        .iter()
        .filter(|a| a.start_time < until && a.end_time > from)
    {
        let date = appt.start_time.date_naive().max(range.start());
        events.push(appointment_event(appt, date));
    }

    for details in fitness.iter().filter(|d| d.plan.is_active) {
        let plan = &details.plan;
        for date in plan_days(range, plan.start_date, plan.end_date) {
            let day = DayOfWeek::from(chrono::Datelike::weekday(&date));
            for item in details.items.iter().filter(|i| i.day_of_week == Some(day)) {
                events.push(fitness_event(item, &plan.name, date));
            }
        }
    }

    for details in nutrition.iter().filter(|d| d.plan.is_active) {
        let plan = &details.plan;
        for date in plan_days(range, plan.start_date, plan.end_date) {
            let day = DayOfWeek::from(chrono::Datelike::weekday(&date));
            for item in details.items.iter().filter(|i| i.day_of_week == Some(day)) {
                events.push(nutrition_event(item, &plan.name, date));
            }
        }
    }

    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    events
}

/// Days of `range` that fall inside a plan window.
fn plan_days(
    range: DateRange,
    plan_start: NaiveDate,
    plan_end: Option<NaiveDate>,
) -> impl Iterator<Item = NaiveDate> {
    let first = range.start().max(plan_start);
    let last = plan_end.map_or(range.end(), |e| e.min(range.end()));
    first.iter_days().take_while(move |d| *d <= last)
}

fn all_day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn appointment_event(appt: &Appointment, date: NaiveDate) -> CalendarEvent {
    CalendarEvent {
        id: appointment_event_id(appt.id),
        title: appt.title.clone(),
        start: appt.start_time,
        end: Some(appt.end_time),
        all_day: false,
        item_type: ItemType::Appointment,
        scheduled_date: date,
        extended_props: EventProps {
            description: appt.description.clone(),
            status: Some(appt.status),
            appointment_type: appt.appointment_type.clone(),
            source_id: appt.id,
            ..Default::default()
        },
    }
}

fn param(params: &Value, key: &str) -> Option<Value> {
    params.get(key).filter(|v| !v.is_null()).cloned()
}

fn fitness_event(item: &FitnessPlanItem, plan_name: &str, date: NaiveDate) -> CalendarEvent {
    CalendarEvent {
        id: fitness_event_id(item.id, date),
        title: item.exercise_name.clone(),
        start: all_day_start(date),
        end: None,
        all_day: true,
        item_type: ItemType::Fitness,
        scheduled_date: date,
        extended_props: EventProps {
            description: item.notes.clone(),
            plan_name: Some(plan_name.to_string()),
            exercise_name: Some(item.exercise_name.clone()),
            sets: param(&item.custom_params, "sets"),
            reps: param(&item.custom_params, "reps"),
            source_id: item.id,
            ..Default::default()
        },
    }
}

fn nutrition_event(item: &NutritionPlanItem, plan_name: &str, date: NaiveDate) -> CalendarEvent {
    CalendarEvent {
        id: nutrition_event_id(item.id, date),
        title: item.meal_type.clone(),
        start: all_day_start(date),
        end: None,
        all_day: true,
        item_type: ItemType::Nutrition,
        scheduled_date: date,
        extended_props: EventProps {
            description: item.description.clone(),
            plan_name: Some(plan_name.to_string()),
            meal_type: Some(item.meal_type.clone()),
            calories: item.calories,
            source_id: item.id,
            ..Default::default()
        },
    }
}
