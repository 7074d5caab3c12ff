//! Conjunctive document filters.

use bson::{doc, Bson, Document};

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Eq(String, Bson),
    In(String, Vec<Bson>),
}

/// A conjunction of field clauses. The empty filter matches every document.
///
/// Each field should appear in at most one clause; the rendered MongoDB
/// document keeps only the last clause for a repeated field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// `_id == id`
    pub fn by_id(id: impl Into<Bson>) -> Self {
        Self::all().eq("_id", id)
    }

    /// Adds `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.clauses.push(Clause::Eq(field.into(), value.into()));
        self
    }

    /// Adds `field ∈ values`. An empty set matches nothing.
    pub fn is_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.clauses.push(Clause::In(field.into(), values));
        self
    }

    /// Render as a MongoDB query document.
    pub fn to_document(&self) -> Document {
        let mut out = Document::new();
        for clause in &self.clauses {
            match clause {
                Clause::Eq(field, value) => {
                    out.insert(field.clone(), value.clone());
                }
                Clause::In(field, values) => {
                    out.insert(field.clone(), doc! { "$in": values.clone() });
                }
            }
        }
        out
    }

    /// Evaluate against a document. A missing field compares as `null`.
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Eq(field, value) => field_value(doc, field) == value,
            Clause::In(field, values) => values.contains(field_value(doc, field)),
        })
    }
}

fn field_value<'a>(doc: &'a Document, field: &str) -> &'a Bson {
    doc.get(field).unwrap_or(&Bson::Null)
}
