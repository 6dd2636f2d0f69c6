use crate::domain::query::Literal;
use crate::domain::schema::ObjectType;
use serde_json::Value;
use std::cmp::Ordering;

// Argument name suffixes understood by list fields; a bare name means equality.
const SUFFIXES: &[(&str, Comparison)] = &[
    ("_gte", Comparison::Gte),
    ("_lte", Comparison::Lte),
    ("_gt", Comparison::Gt),
    ("_lt", Comparison::Lt),
    ("_contains", Comparison::Contains),
];

pub const LIMIT_ARG: &str = "limit";
pub const OFFSET_ARG: &str = "offset";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
}

#[derive(Debug)]
struct Filter<'a> {
    key: &'a str,
    op: Comparison,
    value: Value,
}

impl<'a> Filter<'a> {
    fn new(arg: &'a str, literal: &Literal, item_type: Option<&'a ObjectType>) -> Self {
        let (field, op) = SUFFIXES
            .iter()
            .find_map(|(suffix, op)| {
                arg.strip_suffix(suffix)
                    .filter(|f| !f.is_empty())
                    .map(|f| (f, *op))
            })
            .unwrap_or((arg, Comparison::Eq));

        let key = item_type
            .and_then(|t| t.field(field))
            .map(|f| f.data_key())
            .unwrap_or(field);

        Self {
            key,
            op,
            value: literal.to_json(),
        }
    }

    fn matches(&self, item: &Value) -> bool {
        let actual = item.get(self.key).unwrap_or(&Value::Null);
        match self.op {
            Comparison::Eq => match &self.value {
                Value::Array(options) => options.iter().any(|o| values_equal(actual, o)),
                expected => values_equal(actual, expected),
            },
            Comparison::Contains => match (actual, &self.value) {
                (Value::String(haystack), Value::String(needle)) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                (Value::Array(items), needle) => items.iter().any(|x| values_equal(x, needle)),
                _ => false,
            },
            Comparison::Gt => compare(actual, &self.value) == Some(Ordering::Greater),
            Comparison::Gte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Comparison::Lt => compare(actual, &self.value) == Some(Ordering::Less),
            Comparison::Lte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

// Numbers numerically, strings lexically (ISO 8601 timestamps sort correctly).
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        _ => None,
    }
}

/// Apply filter, `offset` and `limit` arguments to a list of items.
pub fn select<'v>(
    items: &'v [Value],
    arguments: &'v [(String, Literal)],
    item_type: Option<&'v ObjectType>,
) -> Vec<&'v Value> {
    let mut limit = usize::MAX;
    let mut offset = 0usize;
    let mut filters = Vec::new();

    for (name, literal) in arguments {
        match (name.as_str(), literal) {
            (LIMIT_ARG, Literal::Int(n)) => limit = (*n).max(0) as usize,
            (OFFSET_ARG, Literal::Int(n)) => offset = (*n).max(0) as usize,
            (LIMIT_ARG | OFFSET_ARG, _) => {}
            _ => filters.push(Filter::new(name, literal, item_type)),
        }
    }

    items
        .iter()
        .filter(|item| filters.iter().all(|f| f.matches(item)))
        .skip(offset)
        .take(limit)
        .collect()
}
