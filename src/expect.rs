//! Declarative expectations over an [`ApiResponse`].
//!
//! A [`Step`] pairs one request with the checks to run against its response;
//! every check turns into exactly one recorded result.

use crate::api_client::{ApiRequest, ApiResponse};
use serde_json::Value;
use std::ops::RangeInclusive;

type Predicate = Box<dyn Fn(&ApiResponse) -> bool + Send + Sync>;
type Describe = Box<dyn Fn(&ApiResponse) -> String + Send + Sync>;

pub enum Expect {
    Status(u16),
    StatusIn(Vec<u16>),
    HasKey(String),
    HasAnyKey(Vec<String>),
    IsArray,
    /// Value at a JSON pointer equals the given value.
    Equals(String, Value),
    /// Length of the array at a JSON pointer; a missing array counts as empty.
    Len(String, RangeInclusive<usize>),
    /// Number at a JSON pointer is at least the bound; missing counts as 0.
    AtLeast(String, i64),
    All(Vec<Expect>),
    Satisfies(Predicate),
}

impl Expect {
    pub fn status(code: u16) -> Self {
        Expect::Status(code)
    }

    pub fn status_in(codes: &[u16]) -> Self {
        Expect::StatusIn(codes.to_vec())
    }

    pub fn has_key(key: &str) -> Self {
        Expect::HasKey(key.to_string())
    }

    pub fn has_any_key(keys: &[&str]) -> Self {
        Expect::HasAnyKey(keys.iter().map(|k| k.to_string()).collect())
    }

    pub fn equals(pointer: &str, value: Value) -> Self {
        Expect::Equals(pointer.to_string(), value)
    }

    pub fn len(pointer: &str, range: RangeInclusive<usize>) -> Self {
        Expect::Len(pointer.to_string(), range)
    }

    pub fn at_least(pointer: &str, bound: i64) -> Self {
        Expect::AtLeast(pointer.to_string(), bound)
    }

    pub fn satisfies<F>(predicate: F) -> Self
    where
        F: Fn(&ApiResponse) -> bool + Send + Sync + 'static,
    {
        Expect::Satisfies(Box::new(predicate))
    }

    pub fn and(self, other: Expect) -> Self {
        match self {
            Expect::All(mut all) => {
                all.push(other);
                Expect::All(all)
            }
            first => Expect::All(vec![first, other]),
        }
    }

    pub fn evaluate(&self, response: &ApiResponse) -> bool {
        match self {
            Expect::Status(code) => response.status == *code,
            Expect::StatusIn(codes) => codes.contains(&response.status),
            Expect::HasKey(key) => response.has_key(key),
            Expect::HasAnyKey(keys) => keys.iter().any(|key| response.has_key(key)),
            Expect::IsArray => response.body.is_array(),
            Expect::Equals(pointer, value) => response.at(pointer) == Some(value),
            Expect::Len(pointer, range) => range.contains(&response.array_at(pointer).len()),
            Expect::AtLeast(pointer, bound) => {
                response.at(pointer).and_then(Value::as_i64).unwrap_or(0) >= *bound
            }
            Expect::All(all) => all.iter().all(|expect| expect.evaluate(response)),
            Expect::Satisfies(predicate) => predicate(response),
        }
    }
}

/// One named assertion.
pub struct Check {
    pub name: String,
    pub expect: Expect,
    describe: Option<Describe>,
}

impl Check {
    pub fn detail(&self, response: &ApiResponse) -> String {
        match &self.describe {
            Some(describe) => describe(response),
            None => default_detail(response),
        }
    }
}

/// `Got <status>`, followed by the API's error message when it sent one.
pub fn default_detail(response: &ApiResponse) -> String {
    match response.error_message() {
        Some(message) if !message.is_empty() => format!("Got {}: {}", response.status, message),
        _ => format!("Got {}", response.status),
    }
}

pub struct Step {
    pub request: ApiRequest,
    pub checks: Vec<Check>,
}

impl Step {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            checks: Vec::new(),
        }
    }

    pub fn check(mut self, name: impl Into<String>, expect: Expect) -> Self {
        self.checks.push(Check {
            name: name.into(),
            expect,
            describe: None,
        });
        self
    }

    pub fn check_with<F>(mut self, name: impl Into<String>, expect: Expect, describe: F) -> Self
    where
        F: Fn(&ApiResponse) -> String + Send + Sync + 'static,
    {
        self.checks.push(Check {
            name: name.into(),
            expect,
            describe: Some(Box::new(describe)),
        });
        self
    }
}
