//! Plan builder: converts between flat stored plan items and the day-grouped
//! structure used while editing, and computes goal progress.

use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::models::day::{DayKey, DayOfWeek};
use crate::models::plan_template::{NewPlanTemplateItem, PlanTemplateItem, PlanTemplateItemInput};

/// Anything that sits on a day and has a position within it.
pub trait DayPlaced {
    fn day_of_week(&self) -> Option<DayOfWeek>;
    /// Explicit position, if any. Missing positions sort after present ones.
    fn order(&self) -> Option<i32>;
}

impl DayPlaced for PlanTemplateItem {
    fn day_of_week(&self) -> Option<DayOfWeek> {
        self.day_of_week
    }
    fn order(&self) -> Option<i32> {
        Some(self.exercise_order)
    }
}

impl DayPlaced for PlanTemplateItemInput {
    fn day_of_week(&self) -> Option<DayOfWeek> {
        self.day_of_week
    }
    fn order(&self) -> Option<i32> {
        self.exercise_order
    }
}

impl DayPlaced for NewPlanTemplateItem {
    fn day_of_week(&self) -> Option<DayOfWeek> {
        self.day_of_week
    }
    fn order(&self) -> Option<i32> {
        Some(self.exercise_order)
    }
}

/// Groups flat items by day (items without a day go to `Unassigned`) and
/// sorts each day by its explicit order. Ties keep their input order.
pub fn structure_items<T: DayPlaced>(items: Vec<T>) -> BTreeMap<DayKey, Vec<T>> {
    let mut days: BTreeMap<DayKey, Vec<T>> = BTreeMap::new();
    for item in items {
        days.entry(DayKey::from(item.day_of_week()))
            .or_default()
            .push(item);
    }
    for items in days.values_mut() {
        items.sort_by_key(|i| i.order().unwrap_or(i32::MAX));
    }
    days
}

/// Flattens a day-grouped structure for storage.
///
/// Each item's order is recomputed from its position within its group
/// (1-based), the group key becomes the item's day (`Unassigned` becomes no
/// day) and custom parameters are normalized to a JSON object.
pub fn flatten_items(
    days: BTreeMap<DayKey, Vec<PlanTemplateItemInput>>,
) -> Result<Vec<NewPlanTemplateItem>, DomainError> {
    let mut flat = Vec::new();
    for (key, items) in days {
        for (index, item) in items.into_iter().enumerate() {
            let custom_params = shared::validation::normalize_json_object(item.custom_params)
                .map_err(|e| {
                    DomainError::at_field(
                        format!("days.{}[{}].custom_params", String::from(key), index),
                        e,
                    )
                })?;
            flat.push(NewPlanTemplateItem {
                exercise_template_id: item.exercise_template_id,
                day_of_week: key.day(),
                exercise_order: index as i32 + 1,
                custom_params,
                notes: item.notes,
            });
        }
    }
    Ok(flat)
}

/// Normalizes either representation submitted by a client into stored items.
///
/// Grouped input is flattened directly; flat input is structured first so
/// that orders are recomputed per day in the same way.
pub fn prepare_items(
    items: Vec<PlanTemplateItemInput>,
    days: Option<BTreeMap<DayKey, Vec<PlanTemplateItemInput>>>,
) -> Result<Vec<NewPlanTemplateItem>, DomainError> {
    match days {
        Some(days) => flatten_items(days),
        None => flatten_items(structure_items(items)),
    }
}

/// Percentage of a goal achieved, in `[0, 100]`.
///
/// A zero target counts as fully achieved only while the current value is
/// also zero. Missing values count as zero.
pub fn goal_progress(current: Option<f64>, target: Option<f64>) -> f64 {
    let current = current.unwrap_or(0.0);
    let target = target.unwrap_or(0.0);
    if target == 0.0 {
        return if current == 0.0 { 100.0 } else { 0.0 };
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(day: Option<DayOfWeek>, order: Option<i32>, exercise: i64) -> PlanTemplateItemInput {
        PlanTemplateItemInput {
            exercise_template_id: Some(exercise),
            day_of_week: day,
            exercise_order: order,
            custom_params: None,
            notes: None,
        }
    }

    fn exercises(items: &[NewPlanTemplateItem]) -> Vec<i64> {
        items.iter().filter_map(|i| i.exercise_template_id).collect()
    }

    #[test]
    fn test_structure_groups_and_sorts() {
        let days = structure_items(vec![
            input(Some(DayOfWeek::Monday), Some(2), 10),
            input(None, Some(1), 20),
            input(Some(DayOfWeek::Monday), Some(1), 30),
            input(Some(DayOfWeek::Wednesday), None, 40),
        ]);

        let keys: Vec<_> = days.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                DayKey::Day(DayOfWeek::Monday),
                DayKey::Day(DayOfWeek::Wednesday),
                DayKey::Unassigned
            ]
        );
        let monday: Vec<_> = days[&DayKey::Day(DayOfWeek::Monday)]
            .iter()
            .map(|i| i.exercise_template_id)
            .collect();
        assert_eq!(monday, vec![Some(30), Some(10)]);
    }

    #[test]
    fn test_structure_keeps_input_order_for_ties() {
        let days = structure_items(vec![
            input(Some(DayOfWeek::Friday), Some(1), 1),
            input(Some(DayOfWeek::Friday), Some(1), 2),
            input(Some(DayOfWeek::Friday), None, 3),
            input(Some(DayOfWeek::Friday), None, 4),
        ]);
        let friday: Vec<_> = days[&DayKey::Day(DayOfWeek::Friday)]
            .iter()
            .filter_map(|i| i.exercise_template_id)
            .collect();
        assert_eq!(friday, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_flatten_recomputes_order_and_day() {
        let mut days = BTreeMap::new();
        days.insert(
            DayKey::Day(DayOfWeek::Tuesday),
            vec![
                input(Some(DayOfWeek::Sunday), Some(9), 1),
                input(None, Some(4), 2),
            ],
        );
        days.insert(DayKey::Unassigned, vec![input(Some(DayOfWeek::Monday), Some(7), 3)]);

        let flat = flatten_items(days).unwrap();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0].day_of_week, Some(DayOfWeek::Tuesday));
        assert_eq!(flat[0].exercise_order, 1);
        assert_eq!(flat[1].day_of_week, Some(DayOfWeek::Tuesday));
        assert_eq!(flat[1].exercise_order, 2);
        assert_eq!(flat[2].day_of_week, None);
        assert_eq!(flat[2].exercise_order, 1);
    }

    #[test]
    fn test_flatten_normalizes_custom_params() {
        let mut item = input(None, None, 1);
        item.custom_params = Some(json!(r#"{"sets": 4, "reps": 8}"#));
        let mut blank = input(None, None, 2);
        blank.custom_params = Some(json!(""));

        let mut days = BTreeMap::new();
        days.insert(DayKey::Unassigned, vec![item, blank]);
        let flat = flatten_items(days).unwrap();
        assert_eq!(flat[0].custom_params, json!({"sets": 4, "reps": 8}));
        assert_eq!(flat[1].custom_params, json!({}));
    }

    #[test]
    fn test_flatten_rejects_malformed_custom_params() {
        let mut item = input(Some(DayOfWeek::Monday), None, 1);
        item.custom_params = Some(json!("{sets: 4"));
        let mut days = BTreeMap::new();
        days.insert(DayKey::Day(DayOfWeek::Monday), vec![item]);

        let err = flatten_items(days).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields[0].field, "days.Monday[0].custom_params");
    }

    #[test]
    fn test_round_trip_preserves_grouping_and_relative_order() {
        let original = vec![
            input(Some(DayOfWeek::Monday), Some(30), 1),
            input(Some(DayOfWeek::Monday), Some(10), 2),
            input(Some(DayOfWeek::Thursday), Some(5), 3),
            input(None, Some(2), 4),
            input(None, Some(1), 5),
            input(Some(DayOfWeek::Monday), Some(20), 6),
        ];

        let first = flatten_items(structure_items(original)).unwrap();
        let regrouped = structure_items(first.clone());
        let as_inputs: BTreeMap<_, Vec<PlanTemplateItemInput>> = regrouped
            .into_iter()
            .map(|(k, items)| {
                let inputs = items
                    .into_iter()
                    .map(|i| PlanTemplateItemInput {
                        exercise_template_id: i.exercise_template_id,
                        day_of_week: i.day_of_week,
                        exercise_order: Some(i.exercise_order),
                        custom_params: Some(i.custom_params),
                        notes: i.notes,
                    })
                    .collect();
                (k, inputs)
            })
            .collect();
        let second = flatten_items(as_inputs).unwrap();

        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
        let monday: Vec<_> = second
            .iter()
            .filter(|i| i.day_of_week == Some(DayOfWeek::Monday))
            .cloned()
            .collect();
        assert_eq!(exercises(&monday), vec![2, 6, 1]);
        assert_eq!(
            monday.iter().map(|i| i.exercise_order).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let unassigned: Vec<_> = second
            .iter()
            .filter(|i| i.day_of_week.is_none())
            .cloned()
            .collect();
        assert_eq!(exercises(&unassigned), vec![5, 4]);
    }

    #[test]
    fn test_prepare_items_prefers_days() {
        let mut days = BTreeMap::new();
        days.insert(DayKey::Day(DayOfWeek::Saturday), vec![input(None, None, 7)]);
        let items = prepare_items(vec![input(None, None, 1)], Some(days)).unwrap();
        assert_eq!(exercises(&items), vec![7]);
        assert_eq!(items[0].day_of_week, Some(DayOfWeek::Saturday));
    }

    #[test]
    fn test_goal_progress() {
        assert_eq!(goal_progress(Some(0.0), Some(0.0)), 100.0);
        assert_eq!(goal_progress(Some(5.0), Some(0.0)), 0.0);
        assert_eq!(goal_progress(Some(50.0), Some(100.0)), 50.0);
        assert_eq!(goal_progress(Some(150.0), Some(100.0)), 100.0);
        assert_eq!(goal_progress(Some(-10.0), Some(100.0)), 0.0);
        assert_eq!(goal_progress(None, None), 100.0);
        assert_eq!(goal_progress(Some(25.0), None), 0.0);
    }
}
