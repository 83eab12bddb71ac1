use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

/// Query parameters that shape a listing rather than constrain it.
pub const CONTROL_PARAMS: [&str; 5] = ["sort", "page", "limit", "fields", "search"];

/// Structural description of which documents match a listing.
///
/// Every equality constraint must hold; when a text search is present at least
/// one of its fields must contain the term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    equals: BTreeMap<String, String>,
    folded: BTreeMap<String, String>,
    search: Option<TextSearch>,
}

/// Case-insensitive substring search across a fixed set of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    needle: String,
    fields: Vec<String>,
}

impl TextSearch {
    pub fn term(&self) -> &str {
        &self.needle
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Filter {
    pub fn with_equal(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.equals.insert(field.into(), value.into());
        self
    }

    /// Equality that ignores letter case and surrounding whitespace.
    pub fn with_equal_ignore_case(mut self, field: impl Into<String>, value: &str) -> Self {
        self.folded.insert(field.into(), fold(value));
        self
    }

    pub fn with_search<S: AsRef<str>>(mut self, term: &str, fields: &[S]) -> Self {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() || fields.is_empty() {
            return self;
        }
        self.search = Some(TextSearch {
            needle,
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        });
        self
    }

    pub fn equals(&self) -> &BTreeMap<String, String> {
        &self.equals
    }

    pub fn search(&self) -> Option<&TextSearch> {
        self.search.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.folded.is_empty() && self.search.is_none()
    }

    /// Evaluate the filter against a serialized document.
    pub fn matches(&self, document: &Value) -> bool {
        let all_equal = self
            .equals
            .iter()
            .all(|(field, expected)| document.get(field).is_some_and(|v| equals(v, expected)));
        if !all_equal {
            return false;
        }

        let all_folded = self.folded.iter().all(|(field, expected)| {
            document
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|text| fold(text) == *expected)
        });
        if !all_folded {
            return false;
        }

        match &self.search {
            None => true,
            Some(search) => search.fields.iter().any(|field| {
                document
                    .get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(&search.needle))
            }),
        }
    }
}

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

fn equals(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(text) => text == expected,
        Value::Number(number) => number.to_string() == expected,
        Value::Bool(flag) => flag.to_string() == expected,
        Value::Array(items) => items.iter().any(|item| equals(item, expected)),
        Value::Null | Value::Object(_) => false,
    }
}

/// Translates raw query parameters into a [`Filter`].
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder<'a> {
    search_fields: &'a [&'a str],
    scope: Vec<(String, String)>,
    ignored: Vec<&'a str>,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(search_fields: &'a [&'a str]) -> Self {
        Self {
            search_fields,
            scope: Vec::new(),
            ignored: Vec::new(),
        }
    }

    /// Pin `field` to `value`, overriding any same-named raw parameter.
    pub fn scoped(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.scope.push((field.into(), value.to_string()));
        self
    }

    /// Drop a parameter the caller has already consumed.
    pub fn ignoring(mut self, param: &'a str) -> Self {
        self.ignored.push(param);
        self
    }

    pub fn build(&self, params: &HashMap<String, String>) -> Filter {
        let mut filter = Filter::default();

        for (key, value) in params {
            let key = key.as_str();
            if CONTROL_PARAMS.contains(&key) || self.ignored.contains(&key) {
                continue;
            }
            filter = filter.with_equal(key, value.as_str());
        }

        for (field, value) in &self.scope {
            filter = filter.with_equal(field.as_str(), value.as_str());
        }

        if let Some(term) = params.get("search") {
            filter = filter.with_search(term, self.search_fields);
        }

        filter
    }
}
