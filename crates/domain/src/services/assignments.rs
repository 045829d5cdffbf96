//! Fitness and nutrition plans assigned to clients.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::jwt::Role;

use crate::error::{DomainError, StorageError};
use crate::models::exercise::ExerciseTemplate;
use crate::models::fitness_plan::{
    AssignFitnessPlanRequest, FitnessPlan, FitnessPlanDetails, FitnessPlanItem,
    FitnessPlanItemInput, NewFitnessPlan, NewFitnessPlanItem,
};
use crate::models::nutrition_plan::{
    CreateNutritionPlanRequest, NewNutritionPlan, NewNutritionPlanItem, NutritionPlan,
    NutritionPlanDetails, NutritionPlanItem, NutritionPlanItemInput,
};
use crate::services::access;
use crate::services::compensation::{create_with_children, ParentWithChildren};
use crate::session::Session;
use crate::storage::Storage;

pub const UNNAMED_EXERCISE: &str = "Unnamed Exercise";

fn check_dates(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), DomainError> {
    match end {
        Some(end) if end < start => Err(DomainError::invalid(
            "end_date",
            "End date must not be before start date",
        )),
        _ => Ok(()),
    }
}

/// Whether the session may read a plan of `client_id` created by `trainer_id`.
fn can_read(session: &Session, trainer_id: i64, client_id: i64) -> Result<bool, DomainError> {
    Ok(match session.role {
        Role::Trainer => session.require_trainer()? == trainer_id,
        Role::Client => session.require_client()? == client_id,
    })
}

struct FitnessPlanWrite<'a> {
    storage: &'a dyn Storage,
    plan: NewFitnessPlan,
}

#[async_trait]
impl ParentWithChildren for FitnessPlanWrite<'_> {
    type Parent = FitnessPlan;
    type NewChild = NewFitnessPlanItem;
    type Child = FitnessPlanItem;

    const ENTITY: &'static str = "fitness plan";

    fn parent_id(parent: &FitnessPlan) -> i64 {
        parent.id
    }

    async fn insert_parent(&self) -> Result<FitnessPlan, StorageError> {
        self.storage.create_fitness_plan(self.plan.clone()).await
    }

    async fn insert_children(
        &self,
        parent_id: i64,
        children: Vec<NewFitnessPlanItem>,
    ) -> Result<Vec<FitnessPlanItem>, StorageError> {
        self.storage.insert_fitness_plan_items(parent_id, children).await
    }

    async fn delete_parent(&self, parent_id: i64) -> Result<bool, StorageError> {
        self.storage.delete_fitness_plan(parent_id).await
    }
}

struct NutritionPlanWrite<'a> {
    storage: &'a dyn Storage,
    plan: NewNutritionPlan,
}

#[async_trait]
impl ParentWithChildren for NutritionPlanWrite<'_> {
    type Parent = NutritionPlan;
    type NewChild = NewNutritionPlanItem;
    type Child = NutritionPlanItem;

    const ENTITY: &'static str = "nutrition plan";

    fn parent_id(parent: &NutritionPlan) -> i64 {
        parent.id
    }

    async fn insert_parent(&self) -> Result<NutritionPlan, StorageError> {
        self.storage.create_nutrition_plan(self.plan.clone()).await
    }

    async fn insert_children(
        &self,
        parent_id: i64,
        children: Vec<NewNutritionPlanItem>,
    ) -> Result<Vec<NutritionPlanItem>, StorageError> {
        self.storage
            .insert_nutrition_plan_items(parent_id, children)
            .await
    }

    async fn delete_parent(&self, parent_id: i64) -> Result<bool, StorageError> {
        self.storage.delete_nutrition_plan(parent_id).await
    }
}

/// Copies exercise names and default parameters onto the plan items.
///
/// An item's own name wins, then the referenced exercise's name, then
/// [`UNNAMED_EXERCISE`]. Parameters follow the same order, ending in `{}`.
/// Items without an order take their 1-based position.
pub fn denormalize_items(
    items: Vec<FitnessPlanItemInput>,
    library: &HashMap<i64, ExerciseTemplate>,
) -> Result<Vec<NewFitnessPlanItem>, DomainError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let exercise = item.exercise_template_id.and_then(|id| library.get(&id));

            let exercise_name = item
                .exercise_name
                .filter(|n| !n.trim().is_empty())
                .or_else(|| exercise.map(|e| e.name.clone()))
                .unwrap_or_else(|| UNNAMED_EXERCISE.to_string());

            let own_params = shared::validation::normalize_optional_json_object(item.custom_params)
                .map_err(|e| DomainError::at_field(format!("items[{}].custom_params", index), e))?;
            let custom_params = own_params
                .or_else(|| exercise.and_then(|e| e.default_params.clone()))
                .unwrap_or_else(|| serde_json::json!({}));

            Ok(NewFitnessPlanItem {
                exercise_template_id: item.exercise_template_id,
                exercise_name,
                day_of_week: item.day_of_week,
                exercise_order: item.exercise_order.unwrap_or(index as i32 + 1),
                custom_params,
                notes: item.notes,
            })
        })
        .collect()
}

/// Assigns a fitness plan to one of the trainer's clients.
///
/// Without explicit items the source template's items are copied.
pub async fn assign_fitness_plan(
    storage: &dyn Storage,
    session: &Session,
    req: AssignFitnessPlanRequest,
) -> Result<FitnessPlanDetails, DomainError> {
    let trainer_id = session.require_trainer()?;
    check_dates(req.start_date, req.end_date)?;
    access::trainer_client(storage, trainer_id, req.client_id).await?;

    let template_items = match req.source_plan_template_id {
        Some(template_id) => {
            access::owned(
                storage.get_plan_template(template_id).await?,
                "Plan template",
                |t| t.trainer_id == trainer_id,
            )?;
            if req.items.is_none() {
                storage.list_plan_template_items(template_id).await?
            } else {
                Vec::new()
            }
        }
        None => Vec::new(),
    };

    let inputs = req.items.unwrap_or_else(|| {
        template_items
            .into_iter()
            .map(|item| FitnessPlanItemInput {
                exercise_template_id: item.exercise_template_id,
                exercise_name: None,
                day_of_week: item.day_of_week,
                exercise_order: Some(item.exercise_order),
                custom_params: Some(item.custom_params),
                notes: item.notes,
            })
            .collect()
    });

    let library: HashMap<i64, ExerciseTemplate> = storage
        .list_exercise_templates(trainer_id)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let items = denormalize_items(inputs, &library)?;

    let write = FitnessPlanWrite {
        storage,
        plan: NewFitnessPlan {
            client_id: req.client_id,
            trainer_id,
            source_plan_template_id: req.source_plan_template_id,
            name: req.name.trim().to_string(),
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            is_active: req.is_active,
        },
    };
    let (plan, items) = create_with_children(&write, items).await?;
    Ok(FitnessPlanDetails { plan, items })
}

pub async fn list_fitness_plans(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
) -> Result<Vec<FitnessPlan>, DomainError> {
    access::readable_client(storage, session, client_id).await?;
    Ok(storage.list_fitness_plans(client_id).await?)
}

pub async fn get_fitness_plan(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<FitnessPlanDetails, DomainError> {
    let plan = storage
        .get_fitness_plan(id)
        .await?
        .ok_or(DomainError::NotFound("Fitness plan"))?;
    if !can_read(session, plan.trainer_id, plan.client_id)? {
        return Err(DomainError::NotFound("Fitness plan"));
    }
    let items = storage.list_fitness_plan_items(id).await?;
    Ok(FitnessPlanDetails { plan, items })
}

pub async fn delete_fitness_plan(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    access::owned(storage.get_fitness_plan(id).await?, "Fitness plan", |p| {
        p.trainer_id == trainer_id
    })?;
    storage.delete_fitness_plan(id).await?;
    Ok(())
}

/// Checks meal items and assigns positional orders where none are given.
pub fn prepare_meals(
    items: Vec<NutritionPlanItemInput>,
) -> Result<Vec<NewNutritionPlanItem>, DomainError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let meal_type = item.meal_type.trim().to_string();
            if meal_type.is_empty() {
                return Err(DomainError::invalid(
                    format!("items[{}].meal_type", index),
                    "Meal type is required",
                ));
            }
            if item.calories.is_some_and(|c| c < 0) {
                return Err(DomainError::invalid(
                    format!("items[{}].calories", index),
                    "Calories must not be negative",
                ));
            }
            Ok(NewNutritionPlanItem {
                day_of_week: item.day_of_week,
                meal_type,
                description: item.description,
                calories: item.calories,
                protein_g: item.protein_g,
                carbs_g: item.carbs_g,
                fat_g: item.fat_g,
                item_order: item.item_order.unwrap_or(index as i32 + 1),
            })
        })
        .collect()
}

pub async fn create_nutrition_plan(
    storage: &dyn Storage,
    session: &Session,
    req: CreateNutritionPlanRequest,
) -> Result<NutritionPlanDetails, DomainError> {
    let trainer_id = session.require_trainer()?;
    check_dates(req.start_date, req.end_date)?;
    let items = prepare_meals(req.items)?;
    access::trainer_client(storage, trainer_id, req.client_id).await?;

    let write = NutritionPlanWrite {
        storage,
        plan: NewNutritionPlan {
            client_id: req.client_id,
            trainer_id,
            name: req.name.trim().to_string(),
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            is_active: req.is_active,
        },
    };
    let (plan, items) = create_with_children(&write, items).await?;
    Ok(NutritionPlanDetails { plan, items })
}

pub async fn list_nutrition_plans(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
) -> Result<Vec<NutritionPlan>, DomainError> {
    access::readable_client(storage, session, client_id).await?;
    Ok(storage.list_nutrition_plans(client_id).await?)
}

pub async fn get_nutrition_plan(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<NutritionPlanDetails, DomainError> {
    let plan = storage
        .get_nutrition_plan(id)
        .await?
        .ok_or(DomainError::NotFound("Nutrition plan"))?;
    if !can_read(session, plan.trainer_id, plan.client_id)? {
        return Err(DomainError::NotFound("Nutrition plan"));
    }
    let items = storage.list_nutrition_plan_items(id).await?;
    Ok(NutritionPlanDetails { plan, items })
}

pub async fn delete_nutrition_plan(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    access::owned(storage.get_nutrition_plan(id).await?, "Nutrition plan", |p| {
        p.trainer_id == trainer_id
    })?;
    storage.delete_nutrition_plan(id).await?;
    Ok(())
}
