//! Single-document update operators.

use bson::{doc, Bson, Document};

use crate::error::{StoreError, StoreResult};

/// One update operator.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// `$set`: overwrite the listed fields.
    Set(Document),
    /// `$addToSet`: append `value` to the array unless already present.
    AddToSet { field: String, value: Bson },
    /// `$pull`: remove every occurrence of `value`.
    Pull { field: String, value: Bson },
    /// `$pull` with `$in`: remove every element contained in `values`.
    PullIn { field: String, values: Vec<Bson> },
}

/// Ordered set of operators applied atomically to one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    pub fn set(fields: Document) -> Self {
        Self::default().with(UpdateOp::Set(fields))
    }

    pub fn add_to_set(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::default().with(UpdateOp::AddToSet {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn pull(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::default().with(UpdateOp::Pull {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn pull_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        Self::default().with(UpdateOp::PullIn {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn with(mut self, op: UpdateOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.iter().all(|op| match op {
            UpdateOp::Set(fields) => fields.is_empty(),
            _ => false,
        })
    }

    /// Render as a MongoDB update document.
    pub fn to_document(&self) -> Document {
        let mut set = Document::new();
        let mut add_to_set = Document::new();
        let mut pull = Document::new();

        for op in &self.ops {
            match op {
                UpdateOp::Set(fields) => {
                    for (k, v) in fields {
                        set.insert(k.clone(), v.clone());
                    }
                }
                UpdateOp::AddToSet { field, value } => {
                    add_to_set.insert(field.clone(), value.clone());
                }
                UpdateOp::Pull { field, value } => {
                    pull.insert(field.clone(), value.clone());
                }
                UpdateOp::PullIn { field, values } => {
                    pull.insert(field.clone(), doc! { "$in": values.clone() });
                }
            }
        }

        let mut out = Document::new();
        if !set.is_empty() {
            out.insert("$set", set);
        }
        if !add_to_set.is_empty() {
            out.insert("$addToSet", add_to_set);
        }
        if !pull.is_empty() {
            out.insert("$pull", pull);
        }
        out
    }

    /// Apply in place with MongoDB semantics. On error `doc` may be partially
    /// modified, so callers apply to a copy.
    pub fn apply(&self, doc: &mut Document) -> StoreResult<()> {
        for op in &self.ops {
            match op {
                UpdateOp::Set(fields) => {
                    for (k, v) in fields {
                        if k == "_id" && doc.get("_id").is_some_and(|cur| cur != v) {
                            return Err(StoreError::invalid_update("_id is immutable"));
                        }
                        doc.insert(k.clone(), v.clone());
                    }
                }
                UpdateOp::AddToSet { field, value } => match doc.get_mut(field) {
                    None => {
                        doc.insert(field.clone(), vec![value.clone()]);
                    }
                    Some(Bson::Array(items)) => {
                        if !items.contains(value) {
                            items.push(value.clone());
                        }
                    }
                    Some(other) => {
                        return Err(non_array("$addToSet", field, other));
                    }
                },
                UpdateOp::Pull { field, value } => match doc.get_mut(field) {
                    None => {}
                    Some(Bson::Array(items)) => items.retain(|item| item != value),
                    Some(other) => return Err(non_array("$pull", field, other)),
                },
                UpdateOp::PullIn { field, values } => match doc.get_mut(field) {
                    None => {}
                    Some(Bson::Array(items)) => items.retain(|item| !values.contains(item)),
                    Some(other) => return Err(non_array("$pull", field, other)),
                },
            }
        }
        Ok(())
    }
}

fn non_array(op: &str, field: &str, value: &Bson) -> StoreError {
    StoreError::invalid_update(format!(
        "Cannot apply {op} to non-array field '{field}' of type {:?}",
        value.element_type()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn renders_operators() {
        let a = ObjectId::new();
        let b = ObjectId::new();

        assert_eq!(
            Update::set(doc! { "status": "done" }).to_document(),
            doc! { "$set": { "status": "done" } }
        );
        assert_eq!(
            Update::add_to_set("projects", a).to_document(),
            doc! { "$addToSet": { "projects": a } }
        );
        assert_eq!(
            Update::pull("tasks", a).to_document(),
            doc! { "$pull": { "tasks": a } }
        );
        assert_eq!(
            Update::pull_in("tasks", [a, b]).to_document(),
            doc! { "$pull": { "tasks": { "$in": [a, b] } } }
        );
    }

    #[test]
    fn add_to_set_is_duplicate_safe() {
        let id = ObjectId::new();
        let mut doc = doc! { "projects": [] };

        Update::add_to_set("projects", id).apply(&mut doc).unwrap();
        Update::add_to_set("projects", id).apply(&mut doc).unwrap();

        assert_eq!(doc.get_array("projects").unwrap(), &vec![Bson::ObjectId(id)]);
    }

    #[test]
    fn add_to_set_creates_missing_array_but_rejects_null() {
        let id = ObjectId::new();

        let mut missing = doc! {};
        Update::add_to_set("tasks", id).apply(&mut missing).unwrap();
        assert_eq!(missing.get_array("tasks").unwrap().len(), 1);

        let mut null = doc! { "tasks": Bson::Null };
        let err = Update::add_to_set("tasks", id).apply(&mut null).unwrap_err();
        assert!(matches!(err, StoreError::InvalidUpdate { .. }));
    }

    #[test]
    fn pull_in_leaves_other_members() {
        let keep = ObjectId::new();
        let gone_a = ObjectId::new();
        let gone_b = ObjectId::new();
        let mut doc = doc! { "tasks": [gone_a, keep, gone_b, gone_a] };

        Update::pull_in("tasks", [gone_a, gone_b])
            .apply(&mut doc)
            .unwrap();

        assert_eq!(doc.get_array("tasks").unwrap(), &vec![Bson::ObjectId(keep)]);
    }

    #[test]
    fn set_cannot_change_id() {
        let mut doc = doc! { "_id": ObjectId::new() };
        let err = Update::set(doc! { "_id": ObjectId::new() })
            .apply(&mut doc)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidUpdate { .. }));
    }

    #[test]
    fn empty_set_is_empty() {
        assert!(Update::set(Document::new()).is_empty());
        assert!(!Update::pull("tasks", 1).is_empty());
    }
}
