//! Freeform plans and client plan assignments.

use crate::error::DomainError;
use crate::models::plan::{
    ClientPlan, CreateClientPlanRequest, CreatePlanRequest, Plan, UpdateClientPlanRequest,
    UpdatePlanRequest,
};
use crate::services::access;
use crate::session::Session;
use crate::storage::{NewPlan, Storage};

async fn owned_plan(storage: &dyn Storage, trainer_id: i64, id: i64) -> Result<Plan, DomainError> {
    access::owned(storage.get_plan(id).await?, "Plan", |p| p.trainer_id == trainer_id)
}

pub async fn create_plan(
    storage: &dyn Storage,
    session: &Session,
    req: CreatePlanRequest,
) -> Result<Plan, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage
        .create_plan(NewPlan::from_request(trainer_id, req))
        .await?)
}

pub async fn list_plans(storage: &dyn Storage, session: &Session) -> Result<Vec<Plan>, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage.list_plans(trainer_id).await?)
}

pub async fn get_plan(storage: &dyn Storage, session: &Session, id: i64) -> Result<Plan, DomainError> {
    let trainer_id = session.require_trainer()?;
    owned_plan(storage, trainer_id, id).await
}

pub async fn update_plan(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    patch: UpdatePlanRequest,
) -> Result<Plan, DomainError> {
    let trainer_id = session.require_trainer()?;
    owned_plan(storage, trainer_id, id).await?;
    storage
        .update_plan(id, &patch)
        .await?
        .ok_or(DomainError::NotFound("Plan"))
}

pub async fn delete_plan(storage: &dyn Storage, session: &Session, id: i64) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    owned_plan(storage, trainer_id, id).await?;
    storage.delete_plan(id).await?;
    Ok(())
}

fn check_dates(
    start: chrono::NaiveDate,
    end: Option<chrono::NaiveDate>,
) -> Result<(), DomainError> {
    match end {
        Some(end) if end < start => Err(DomainError::invalid(
            "end_date",
            "End date must not be before start date",
        )),
        _ => Ok(()),
    }
}

/// Loads a client plan whose client belongs to the trainer.
async fn owned_client_plan(
    storage: &dyn Storage,
    trainer_id: i64,
    id: i64,
) -> Result<ClientPlan, DomainError> {
    let record = storage.get_client_plan(id).await?;
    access::via_client(storage, trainer_id, record, "Client plan", |cp| cp.client_id).await
}

pub async fn assign_plan(
    storage: &dyn Storage,
    session: &Session,
    req: CreateClientPlanRequest,
) -> Result<ClientPlan, DomainError> {
    let trainer_id = session.require_trainer()?;
    check_dates(req.start_date, req.end_date)?;
    access::trainer_client(storage, trainer_id, req.client_id).await?;
    owned_plan(storage, trainer_id, req.plan_id).await?;
    Ok(storage.create_client_plan(&req).await?)
}

pub async fn list_client_plans(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
) -> Result<Vec<ClientPlan>, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::trainer_client(storage, trainer_id, client_id).await?;
    Ok(storage.list_client_plans(client_id).await?)
}

pub async fn update_client_plan(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    patch: UpdateClientPlanRequest,
) -> Result<ClientPlan, DomainError> {
    let trainer_id = session.require_trainer()?;
    let current = owned_client_plan(storage, trainer_id, id).await?;
    check_dates(
        patch.start_date.unwrap_or(current.start_date),
        patch.end_date.or(current.end_date),
    )?;
    storage
        .update_client_plan(id, &patch)
        .await?
        .ok_or(DomainError::NotFound("Client plan"))
}

pub async fn delete_client_plan(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    owned_client_plan(storage, trainer_id, id).await?;
    storage.delete_client_plan(id).await?;
    Ok(())
}
