use bson::{Bson, Document};
use chrono::{DateTime, Utc};

use crate::contract::model::{Project, ProjectPatch, Task, TaskPatch, User, UserPatch};
use crate::infra::storage::entity::{fields, ProjectDoc, TaskDoc, UserDoc};

pub fn user_from_doc(doc: UserDoc) -> User {
    User {
        id: doc.id.into(),
        name: doc.name,
        occupation: doc.occupation,
        age: doc.age,
        salary: doc.salary,
        email: doc.email,
        projects: doc.projects.into_iter().map(Into::into).collect(),
    }
}

pub fn user_to_doc(user: &User) -> UserDoc {
    UserDoc {
        id: user.id.into(),
        name: user.name.clone(),
        occupation: user.occupation.clone(),
        age: user.age,
        salary: user.salary,
        email: user.email.clone(),
        projects: user.projects.iter().map(|id| (*id).into()).collect(),
    }
}

pub fn project_from_doc(doc: ProjectDoc) -> Project {
    Project {
        id: doc.id.into(),
        user_id: doc.user_id.into(),
        name: doc.name,
        description: doc.description,
        priority: doc.priority,
        author: doc.author,
        responsible: doc.responsible,
        performers: doc.performers,
        created_at: doc.date_creation.to_chrono(),
        deadline: doc.deadline.map(|d| d.to_chrono()),
        guests: doc.guests,
        status: doc.status,
        tasks: doc.tasks.into_iter().map(Into::into).collect(),
    }
}

pub fn project_to_doc(project: &Project) -> ProjectDoc {
    ProjectDoc {
        id: project.id.into(),
        user_id: project.user_id.into(),
        name: project.name.clone(),
        description: project.description.clone(),
        priority: project.priority,
        author: project.author.clone(),
        responsible: project.responsible.clone(),
        performers: project.performers.clone(),
        date_creation: bson::DateTime::from_chrono(project.created_at),
        deadline: project.deadline.map(bson::DateTime::from_chrono),
        guests: project.guests.clone(),
        status: project.status.clone(),
        tasks: project.tasks.iter().map(|id| (*id).into()).collect(),
    }
}

pub fn task_from_doc(doc: TaskDoc) -> Task {
    Task {
        id: doc.id.into(),
        project_id: doc.project_id.into(),
        name: doc.name,
        description: doc.description,
        priority: doc.priority,
        author: doc.author,
        responsible: doc.responsible,
        performers: doc.performers,
        created_at: doc.date_creation.to_chrono(),
        deadline: doc.deadline.map(|d| d.to_chrono()),
        guests: doc.guests,
        status: doc.status,
    }
}

pub fn task_to_doc(task: &Task) -> TaskDoc {
    TaskDoc {
        id: task.id.into(),
        project_id: task.project_id.into(),
        name: task.name.clone(),
        description: task.description.clone(),
        priority: task.priority,
        author: task.author.clone(),
        responsible: task.responsible.clone(),
        performers: task.performers.clone(),
        date_creation: bson::DateTime::from_chrono(task.created_at),
        deadline: task.deadline.map(bson::DateTime::from_chrono),
        guests: task.guests.clone(),
        status: task.status.clone(),
    }
}

/// Collects the present fields of a patch into a `$set` body.
#[derive(Default)]
struct SetBuilder(Document);

impl SetBuilder {
    fn field<T: Into<Bson> + Clone>(mut self, name: &str, value: &Option<T>) -> Self {
        if let Some(v) = value {
            self.0.insert(name, v.clone().into());
        }
        self
    }

    fn timestamp(mut self, name: &str, value: &Option<DateTime<Utc>>) -> Self {
        if let Some(v) = value {
            self.0.insert(name, bson::DateTime::from_chrono(*v));
        }
        self
    }

    fn build(self) -> Document {
        self.0
    }
}

pub fn user_patch_to_set(patch: &UserPatch) -> Document {
    SetBuilder::default()
        .field(fields::NAME, &patch.name)
        .field(fields::OCCUPATION, &patch.occupation)
        .field(fields::AGE, &patch.age)
        .field(fields::SALARY, &patch.salary)
        .field(fields::EMAIL, &patch.email)
        .build()
}

pub fn project_patch_to_set(patch: &ProjectPatch) -> Document {
    SetBuilder::default()
        .field(fields::NAME, &patch.name)
        .field(fields::DESCRIPTION, &patch.description)
        .field(fields::PRIORITY, &patch.priority)
        .field(fields::AUTHOR, &patch.author)
        .field(fields::RESPONSIBLE, &patch.responsible)
        .field(fields::PERFORMERS, &patch.performers)
        .timestamp(fields::DEADLINE, &patch.deadline)
        .field(fields::GUESTS, &patch.guests)
        .field(fields::STATUS, &patch.status)
        .build()
}

pub fn task_patch_to_set(patch: &TaskPatch) -> Document {
    SetBuilder::default()
        .field(fields::NAME, &patch.name)
        .field(fields::DESCRIPTION, &patch.description)
        .field(fields::PRIORITY, &patch.priority)
        .field(fields::AUTHOR, &patch.author)
        .field(fields::RESPONSIBLE, &patch.responsible)
        .field(fields::PERFORMERS, &patch.performers)
        .timestamp(fields::DEADLINE, &patch.deadline)
        .field(fields::GUESTS, &patch.guests)
        .field(fields::STATUS, &patch.status)
        .build()
}
