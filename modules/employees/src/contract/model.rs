use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Sequence number assigned on insert, starting at 1.
    pub id: i64,
    pub name: String,
    pub role: String,
    pub age: i32,
    pub salary: i64,
}

/// Creation and legacy-update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub role: String,
    pub age: i32,
    pub salary: i64,
}

impl Employee {
    /// Copy every non-empty string and non-zero number from `payload`.
    pub fn merge(&mut self, payload: NewEmployee) {
        if !payload.name.is_empty() {
            self.name = payload.name;
        }
        if !payload.role.is_empty() {
            self.role = payload.role;
        }
        if payload.age != 0 {
            self.age = payload.age;
        }
        if payload.salary != 0 {
            self.salary = payload.salary;
        }
    }
}
