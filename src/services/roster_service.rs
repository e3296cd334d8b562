use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::student::UNASSIGNED_CLASS;
use crate::models::Student;
use crate::store::Store;

#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

/// class name -> students, ordered by display name. Rebuilt on demand; the
/// roster changes rarely and staleness is worse than recomputation here.
pub type ClassRoster = BTreeMap<String, Vec<RosterEntry>>;

pub struct RosterService {
    store: Store,
}

impl RosterService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Idempotent per (name, class): re-registration resolves to the
    /// existing identity instead of creating a duplicate. A blank class
    /// normalizes to the "unassigned" sentinel.
    pub async fn register(&self, name: &str, class: Option<&str>) -> Result<String, ApiError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("name is required".into()));
        }

        let class = match class.map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => UNASSIGNED_CLASS.to_string(),
        };

        let candidate_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        // Find-or-create under the collection lock so concurrent
        // registrations of the same (name, class) resolve to one identity.
        let (student_id, created) = self
            .store
            .students
            .update(move |students| {
                if let Some(existing) = students
                    .iter()
                    .find(|s| s.name == name && s.class == class)
                {
                    return (existing.id.clone(), false);
                }

                students.push(Student {
                    id: candidate_id.clone(),
                    name,
                    class,
                    created_at: now,
                });
                (candidate_id, true)
            })
            .await?;

        if created {
            tracing::info!("Registered student {}", student_id);
        }

        Ok(student_id)
    }

    pub async fn classes(&self) -> ClassRoster {
        let students = self.store.students.read().await;
        let mut roster = ClassRoster::new();

        for student in students.iter() {
            roster
                .entry(student.class.clone())
                .or_default()
                .push(RosterEntry {
                    id: student.id.clone(),
                    name: student.name.clone(),
                });
        }
        for entries in roster.values_mut() {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }

        roster
    }

    pub async fn list(&self) -> Vec<Student> {
        let mut students = self.store.students.read().await;
        students.sort_by(|a, b| (&a.class, &a.name).cmp(&(&b.class, &b.name)));
        students
    }

    pub async fn update(
        &self,
        student_id: &str,
        name: Option<&str>,
        class: Option<&str>,
    ) -> Result<Student, ApiError> {
        let name = name.map(|n| n.trim().to_string());
        if matches!(&name, Some(n) if n.is_empty()) {
            return Err(ApiError::InvalidInput("name must not be blank".into()));
        }
        let class = class.map(|c| {
            let c = c.trim();
            if c.is_empty() {
                UNASSIGNED_CLASS.to_string()
            } else {
                c.to_string()
            }
        });

        let student_key = student_id.to_string();
        self.store
            .students
            .update(move |students| {
                let student = students
                    .iter_mut()
                    .find(|s| s.id == student_key)
                    .ok_or(ApiError::StudentNotFound)?;
                if let Some(name) = name {
                    student.name = name;
                }
                if let Some(class) = class {
                    student.class = class;
                }
                Ok(student.clone())
            })
            .await?
    }

    /// Deletes the student record only. Their sessions and answer records
    /// are orphaned deliberately so finished exam results stay auditable.
    pub async fn delete(&self, student_id: &str) -> Result<(), ApiError> {
        let student_key = student_id.to_string();
        let removed = self
            .store
            .students
            .update(move |students| {
                let before = students.len();
                students.retain(|s| s.id != student_key);
                students.len() != before
            })
            .await?;

        if removed {
            Ok(())
        } else {
            Err(ApiError::StudentNotFound)
        }
    }
}
