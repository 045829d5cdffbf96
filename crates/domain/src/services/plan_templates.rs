//! Plan template CRUD and the day-grouped builder view.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;

use crate::error::{DomainError, StorageError};
use crate::models::plan_template::{
    NewPlanTemplate, NewPlanTemplateItem, PlanBuilderView, PlanTemplate, PlanTemplateDetails,
    PlanTemplateItem, PlanTemplateItemDetails, SavePlanTemplateRequest,
};
use crate::services::access;
use crate::services::compensation::{create_with_children, ParentWithChildren};
use crate::services::plan_builder::{prepare_items, structure_items};
use crate::session::Session;
use crate::storage::Storage;

struct PlanTemplateWrite<'a> {
    storage: &'a dyn Storage,
    header: NewPlanTemplate,
}

#[async_trait]
impl ParentWithChildren for PlanTemplateWrite<'_> {
    type Parent = PlanTemplate;
    type NewChild = NewPlanTemplateItem;
    type Child = PlanTemplateItem;

    const ENTITY: &'static str = "plan template";

    fn parent_id(parent: &PlanTemplate) -> i64 {
        parent.id
    }

    async fn insert_parent(&self) -> Result<PlanTemplate, StorageError> {
        self.storage.create_plan_template(self.header.clone()).await
    }

    async fn insert_children(
        &self,
        parent_id: i64,
        children: Vec<NewPlanTemplateItem>,
    ) -> Result<Vec<PlanTemplateItem>, StorageError> {
        self.storage
            .insert_plan_template_items(parent_id, children)
            .await
    }

    async fn delete_parent(&self, parent_id: i64) -> Result<bool, StorageError> {
        self.storage.delete_plan_template(parent_id).await
    }
}

/// Splits a save request into the stored header and normalized items, and
/// checks that every referenced exercise is visible to the trainer.
async fn prepare(
    storage: &dyn Storage,
    trainer_id: i64,
    req: SavePlanTemplateRequest,
) -> Result<(NewPlanTemplate, Vec<NewPlanTemplateItem>), DomainError> {
    let items = prepare_items(req.items, req.days)?;

    let referenced: HashSet<i64> = items.iter().filter_map(|i| i.exercise_template_id).collect();
    if !referenced.is_empty() {
        let visible: HashSet<i64> = storage
            .list_exercise_templates(trainer_id)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let mut unknown: Vec<i64> = referenced.difference(&visible).copied().collect();
        unknown.sort_unstable();
        if let Some(id) = unknown.first() {
            return Err(DomainError::invalid(
                "exercise_template_id",
                format!("Exercise template {} does not exist", id),
            ));
        }
    }

    let header = NewPlanTemplate {
        trainer_id,
        name: req.name.trim().to_string(),
        description: req.description,
        duration_weeks: req.duration_weeks,
        days_per_week: req.days_per_week,
    };
    Ok((header, items))
}

async fn own_template(
    storage: &dyn Storage,
    trainer_id: i64,
    id: i64,
) -> Result<PlanTemplate, DomainError> {
    access::owned(storage.get_plan_template(id).await?, "Plan template", |t| {
        t.trainer_id == trainer_id
    })
}

/// Resolves each item's exercise against the trainer's visible library.
async fn with_exercises(
    storage: &dyn Storage,
    template: PlanTemplate,
    items: Vec<PlanTemplateItem>,
) -> Result<PlanTemplateDetails, DomainError> {
    let library: HashMap<i64, _> = storage
        .list_exercise_templates(template.trainer_id)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let items = items
        .into_iter()
        .map(|item| {
            let exercise = item
                .exercise_template_id
                .and_then(|id| library.get(&id).cloned());
            PlanTemplateItemDetails { item, exercise }
        })
        .collect();
    Ok(PlanTemplateDetails { template, items })
}

pub async fn create(
    storage: &dyn Storage,
    session: &Session,
    req: SavePlanTemplateRequest,
) -> Result<PlanTemplateDetails, DomainError> {
    let trainer_id = session.require_trainer()?;
    let (header, items) = prepare(storage, trainer_id, req).await?;
    let write = PlanTemplateWrite { storage, header };
    let (template, items) = create_with_children(&write, items).await?;
    with_exercises(storage, template, items).await
}

pub async fn list(
    storage: &dyn Storage,
    session: &Session,
) -> Result<Vec<PlanTemplate>, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage.list_plan_templates(trainer_id).await?)
}

pub async fn get(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<PlanTemplateDetails, DomainError> {
    let trainer_id = session.require_trainer()?;
    let template = own_template(storage, trainer_id, id).await?;
    let items = storage.list_plan_template_items(id).await?;
    with_exercises(storage, template, items).await
}

/// The template with its items grouped by day for editing.
pub async fn builder_view(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<PlanBuilderView, DomainError> {
    let trainer_id = session.require_trainer()?;
    let template = own_template(storage, trainer_id, id).await?;
    let items = storage.list_plan_template_items(id).await?;
    let days: BTreeMap<_, _> = structure_items(items);
    Ok(PlanBuilderView { template, days })
}

/// Replaces the header and the whole item list.
pub async fn update(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    req: SavePlanTemplateRequest,
) -> Result<PlanTemplateDetails, DomainError> {
    let trainer_id = session.require_trainer()?;
    own_template(storage, trainer_id, id).await?;
    let (header, items) = prepare(storage, trainer_id, req).await?;

    let template = storage
        .update_plan_template(id, header)
        .await?
        .ok_or(DomainError::NotFound("Plan template"))?;
    let items = storage.replace_plan_template_items(id, items).await?;
    with_exercises(storage, template, items).await
}

pub async fn delete(storage: &dyn Storage, session: &Session, id: i64) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    own_template(storage, trainer_id, id).await?;
    storage.delete_plan_template(id).await?;
    Ok(())
}
