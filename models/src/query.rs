//! Body of `POST /api/query/{module}`.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

/// A single condition or a nested group of conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Condition {
        field: String,
        operator: String,
        value: Value,
    },
    Group {
        logic: Logic,
        filters: Vec<Filter>,
    },
}

impl Filter {
    pub fn condition(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Filter::Condition {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, "eq", value)
    }

    pub fn group(logic: Logic, filters: Vec<Filter>) -> Self {
        Filter::Group { logic, filters }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub sort: Vec<Sort>,
    pub limit: u32,
    pub logic: Logic,
    pub filters: Vec<Filter>,
    #[serde(rename = "__selectFields", skip_serializing_if = "Vec::is_empty")]
    pub select_fields: Vec<String>,
    pub search: String,
}

impl Query {
    pub fn new(search: impl Into<String>, limit: u32) -> Self {
        Self {
            sort: Vec::new(),
            limit,
            logic: Logic::And,
            filters: Vec::new(),
            select_fields: Vec::new(),
            search: search.into(),
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_fields.extend(fields.into_iter().map(Into::into));
        self
    }
}
