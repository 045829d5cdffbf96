//! Exercise library repository.

use sqlx::PgPool;

use domain::models::exercise::{ExerciseTemplatePatch, NewExerciseTemplate};

use crate::entities::ExerciseTemplateEntity;
use crate::metrics::QueryTimer;

/// Repository for exercise templates, both trainer-owned and global.
#[derive(Clone)]
pub struct ExerciseTemplateRepository {
    pool: PgPool,
}

impl ExerciseTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        template: &NewExerciseTemplate,
    ) -> Result<ExerciseTemplateEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_exercise_template");
        let result = sqlx::query_as::<_, ExerciseTemplateEntity>(
            r#"
            INSERT INTO exercise_templates (trainer_id, name, exercise_type, muscle_group,
                                            equipment, default_params, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(template.trainer_id)
        .bind(&template.name)
        .bind(&template.exercise_type)
        .bind(&template.muscle_group)
        .bind(&template.equipment)
        .bind(&template.default_params)
        .bind(&template.notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ExerciseTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_exercise_template_by_id");
        let result = sqlx::query_as::<_, ExerciseTemplateEntity>(
            "SELECT * FROM exercise_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The trainer's own templates by name, then global templates by name.
    pub async fn find_visible(
        &self,
        trainer_id: i64,
    ) -> Result<Vec<ExerciseTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visible_exercise_templates");
        let result = sqlx::query_as::<_, ExerciseTemplateEntity>(
            r#"
            SELECT * FROM exercise_templates
            WHERE trainer_id = $1 OR trainer_id IS NULL
            ORDER BY (trainer_id IS NULL), name, id
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partial update. `default_params` can be cleared, other fields only replaced.
    pub async fn update(
        &self,
        id: i64,
        patch: &ExerciseTemplatePatch,
    ) -> Result<Option<ExerciseTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_exercise_template");
        let result = sqlx::query_as::<_, ExerciseTemplateEntity>(
            r#"
            UPDATE exercise_templates SET
                name = COALESCE($2, name),
                exercise_type = COALESCE($3, exercise_type),
                muscle_group = COALESCE($4, muscle_group),
                equipment = COALESCE($5, equipment),
                default_params = CASE WHEN $6 THEN $7 ELSE default_params END,
                notes = COALESCE($8, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.exercise_type)
        .bind(&patch.muscle_group)
        .bind(&patch.equipment)
        .bind(patch.default_params.is_some())
        .bind(patch.default_params.clone().flatten())
        .bind(&patch.notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_exercise_template");
        let result = sqlx::query("DELETE FROM exercise_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
