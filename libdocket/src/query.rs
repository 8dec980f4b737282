//! Collection queries – `field<op>value` filters, an optional sort key and
//! a limit, evaluated against document field data.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::Error;
use crate::path::CollectionPath;
use crate::store::{Document, Fields};

/// Comparison operators, longest spelling first so `a<=1` never parses
/// as `a < "=1"`.
const OPERATORS: &[(&str, Operator)] = &[
    ("==", Operator::Eq),
    ("!=", Operator::NotEq),
    ("<=", Operator::Le),
    (">=", Operator::Ge),
    ("<", Operator::Lt),
    (">", Operator::Gt),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = OPERATORS
            .iter()
            .find(|(_, op)| op == self)
            .map(|(s, _)| *s)
            .unwrap_or("?");
        f.write_str(s)
    }
}

/// One `field <op> value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl FromStr for Filter {
    type Err = Error;

    /// Parse `age>=21`, `name==bob`, `tags=="a b"`, `meta.lang!=en`.
    ///
    /// The value is read as a JSON literal when it is one, otherwise it is
    /// taken as a bare string.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // earliest operator in the string wins; ties go to the longer one
        let found = OPERATORS
            .iter()
            .filter_map(|(tok, op)| raw.find(tok).map(|at| (at, *tok, *op)))
            .min_by_key(|(at, tok, _)| (*at, std::cmp::Reverse(tok.len())));

        let Some((at, tok, op)) = found else {
            return Err(Error::Other(format!("invalid filter (no operator): {raw}")));
        };

        let field = raw[..at].trim();
        if field.is_empty() {
            return Err(Error::Other(format!("invalid filter (no field): {raw}")));
        }
        let value = parse_value(raw[at + tok.len()..].trim());

        Ok(Self {
            field: field.to_owned(),
            op,
            value,
        })
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

impl Filter {
    pub fn matches(&self, fields: &Fields) -> bool {
        let Some(actual) = lookup(fields, &self.field) else {
            return false;
        };
        let Some(ord) = compare_same_type(actual, &self.value) else {
            // values of different types never match, not even `!=`
            return false;
        };
        match self.op {
            Operator::Eq => ord == Ordering::Equal,
            Operator::NotEq => ord != Ordering::Equal,
            Operator::Lt => ord == Ordering::Less,
            Operator::Le => ord != Ordering::Greater,
            Operator::Gt => ord == Ordering::Greater,
            Operator::Ge => ord != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::Other(format!(
                "invalid sort direction `{other}` (expected asc|desc)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A query over one collection, built up step by step.
#[derive(Debug, Clone)]
pub struct Query {
    collection: CollectionPath,
    filters: Vec<Filter>,
    order_by: Option<OrderBy>,
    limit: Option<usize>,
}

impl Query {
    pub fn new(collection: CollectionPath) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// `true` if `fields` passes every filter and carries the sort field.
    pub fn matches(&self, fields: &Fields) -> bool {
        let has_sort_field = self
            .order_by
            .as_ref()
            .map_or(true, |o| lookup(fields, &o.field).is_some());
        has_sort_field && self.filters.iter().all(|f| f.matches(fields))
    }

    /// Filter, sort and truncate `docs`.
    pub fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        let mut hits: Vec<Document> = docs.into_iter().filter(|d| self.matches(&d.fields)).collect();

        match &self.order_by {
            Some(order) => hits.sort_by(|a, b| {
                let ord = match (lookup(&a.fields, &order.field), lookup(&b.fields, &order.field)) {
                    (Some(x), Some(y)) => compare_any(x, y),
                    _ => Ordering::Equal,
                };
                let ord = match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                };
                ord.then_with(|| a.id().cmp(b.id()))
            }),
            None => hits.sort_by(|a, b| a.id().cmp(b.id())),
        }

        if let Some(n) = self.limit {
            hits.truncate(n);
        }
        hits
    }
}

/* ─── value helpers ───────────────────────────────────────────────── */

/// Resolve a dotted field path (`address.city`) inside nested maps.
fn lookup<'a>(fields: &'a Fields, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = fields.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Ordering between two values of the same type; `None` across types.
fn compare_same_type(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(i), Some(j)) => Some(i.cmp(&j)),
                _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
            }
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y) {
                match compare_any(l, r) {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(x.len().cmp(&y.len()))
        }
        (Value::Object(_), Value::Object(_)) => {
            if a == b {
                Some(Ordering::Equal)
            } else {
                Some(a.to_string().cmp(&b.to_string()))
            }
        }
        _ => None,
    }
}

/// Total order used for sorting: type rank first, then value.
fn compare_any(a: &Value, b: &Value) -> Ordering {
    compare_same_type(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b)))
}
