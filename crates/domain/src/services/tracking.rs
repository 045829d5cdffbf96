//! Body measurements and goals.

use crate::error::DomainError;
use crate::models::measurement::{
    CreateGoalRequest, CreateMeasurementRequest, Goal, GoalResponse, Measurement,
    MeasurementMetric, NewGoal, NewMeasurement, SeriesPoint, UpdateGoalRequest,
};
use crate::services::access;
use crate::services::plan_builder::goal_progress;
use crate::session::Session;
use crate::storage::Storage;

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        let progress_percent = goal_progress(goal.current_value, goal.target_value);
        Self {
            goal,
            progress_percent,
        }
    }
}

/// Measurements of a client, oldest first.
pub async fn list_measurements(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
) -> Result<Vec<Measurement>, DomainError> {
    access::readable_client(storage, session, client_id).await?;
    Ok(storage.list_measurements(client_id).await?)
}

pub async fn create_measurement(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
    req: CreateMeasurementRequest,
) -> Result<Measurement, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::trainer_client(storage, trainer_id, client_id).await?;
    Ok(storage
        .create_measurement(NewMeasurement::from_request(client_id, req))
        .await?)
}

/// One metric over time, skipping measurements that did not record it.
pub async fn measurement_series(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
    metric: MeasurementMetric,
) -> Result<Vec<SeriesPoint>, DomainError> {
    let measurements = list_measurements(storage, session, client_id).await?;
    Ok(series(&measurements, metric))
}

pub fn series(measurements: &[Measurement], metric: MeasurementMetric) -> Vec<SeriesPoint> {
    measurements
        .iter()
        .filter_map(|m| {
            metric.value_of(m).map(|value| SeriesPoint {
                date: m.measurement_date,
                value,
            })
        })
        .collect()
}

pub async fn delete_measurement(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    let record = storage.get_measurement(id).await?;
    access::via_client(storage, trainer_id, record, "Measurement", |m| m.client_id).await?;
    storage.delete_measurement(id).await?;
    Ok(())
}

pub async fn list_goals(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
) -> Result<Vec<GoalResponse>, DomainError> {
    access::readable_client(storage, session, client_id).await?;
    let goals = storage.list_goals(client_id).await?;
    Ok(goals.into_iter().map(GoalResponse::from).collect())
}

pub async fn create_goal(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
    req: CreateGoalRequest,
) -> Result<GoalResponse, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::trainer_client(storage, trainer_id, client_id).await?;
    let goal = storage
        .create_goal(NewGoal::from_request(client_id, req))
        .await?;
    Ok(goal.into())
}

pub async fn update_goal(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    patch: UpdateGoalRequest,
) -> Result<GoalResponse, DomainError> {
    let trainer_id = session.require_trainer()?;
    let record = storage.get_goal(id).await?;
    access::via_client(storage, trainer_id, record, "Goal", |g| g.client_id).await?;
    storage
        .update_goal(id, &patch)
        .await?
        .map(GoalResponse::from)
        .ok_or(DomainError::NotFound("Goal"))
}

pub async fn delete_goal(storage: &dyn Storage, session: &Session, id: i64) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    let record = storage.get_goal(id).await?;
    access::via_client(storage, trainer_id, record, "Goal", |g| g.client_id).await?;
    storage.delete_goal(id).await?;
    Ok(())
}
