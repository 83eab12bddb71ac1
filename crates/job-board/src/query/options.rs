use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::store::Document;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 5;

/// Orderings a caller can request with `sort=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    AToZ,
    ZToA,
}

impl SortOrder {
    /// Unrecognized or missing values fall back to newest first.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("oldest") => Self::Oldest,
            Some("a-z") => Self::AToZ,
            Some("z-a") => Self::ZToA,
            _ => Self::Newest,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::AToZ => "a-z",
            SortOrder::ZToA => "z-a",
        }
    }

    /// Compare two documents alongside their serialized form. Ties fall back to
    /// the identifier so repeated queries return identical orderings.
    pub fn compare<T: Document>(self, left: (&T, &Value), right: (&T, &Value)) -> Ordering {
        let primary = match self {
            SortOrder::Newest => right.0.created_at().cmp(&left.0.created_at()),
            SortOrder::Oldest => left.0.created_at().cmp(&right.0.created_at()),
            SortOrder::AToZ => position(left.1).cmp(&position(right.1)),
            SortOrder::ZToA => position(right.1).cmp(&position(left.1)),
        };
        primary.then_with(|| left.0.id().cmp(&right.0.id()))
    }
}

fn position(document: &Value) -> Option<&str> {
    document.get("position").and_then(Value::as_str)
}

/// Offset/limit pair applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl Window {
    pub const fn all() -> Self {
        Self {
            skip: 0,
            limit: None,
        }
    }
}

/// Include-only field selection. `id` is always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();
        if fields.is_empty() {
            return None;
        }
        if !fields.iter().any(|field| field == "id") {
            fields.push("id".to_string());
        }
        Some(Self { fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn includes(&self, field: &str) -> bool {
        self.fields.iter().any(|candidate| candidate == field)
    }

    pub fn apply(&self, document: Value) -> Value {
        match document {
            Value::Object(map) => {
                let kept: Map<String, Value> = map
                    .into_iter()
                    .filter(|(key, _)| self.includes(key))
                    .collect();
                Value::Object(kept)
            }
            other => other,
        }
    }
}

/// Normalized sort, pagination and projection settings for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryOptions {
    pub sort: SortOrder,
    pub window: Window,
    pub page: Option<u32>,
    pub projection: Option<Projection>,
}

impl QueryOptions {
    /// Pagination only switches on when `page` is present. A bare `limit`
    /// caps the result without selecting a page.
    pub fn resolve(params: &HashMap<String, String>) -> Result<Self, QueryError> {
        let sort = SortOrder::from_param(params.get("sort").map(String::as_str));
        let projection = params.get("fields").and_then(|raw| Projection::parse(raw));
        let limit = params
            .get("limit")
            .map(|raw| positive("limit", raw))
            .transpose()?;

        let (window, page) = match params.get("page") {
            Some(raw) => {
                let page = positive("page", raw)?;
                let limit = limit.unwrap_or(DEFAULT_LIMIT);
                let skip = (page as usize - 1) * limit as usize;
                (
                    Window {
                        skip,
                        limit: Some(limit as usize),
                    },
                    Some(page),
                )
            }
            None => (
                Window {
                    skip: 0,
                    limit: limit.map(|l| l as usize),
                },
                None,
            ),
        };

        Ok(Self {
            sort,
            window,
            page,
            projection,
        })
    }

    /// `ceil(total / limit)`; a listing without a limit is a single page.
    pub fn page_count(&self, total: u64) -> u64 {
        match self.window.limit {
            Some(limit) if limit > 0 => total.div_ceil(limit as u64),
            _ => 1,
        }
    }
}

fn positive(param: &'static str, raw: &str) -> Result<u32, QueryError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(QueryError::NotPositive {
            param,
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("{param} must be a positive integer, got '{value}'")]
    NotPositive { param: &'static str, value: String },
}
