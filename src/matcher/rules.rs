use std::fmt;

use serde_json::Value;

/// How a rule compares the candidate's field with the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Field equals the expected value.
    Equal,
    /// Field is an object holding every expected key with its expected value.
    /// Extra keys are ignored.
    Subset,
    /// Field is an array with exactly the expected elements, in any order.
    ConsistOf,
    /// Field is an array containing every expected element, in any order.
    ContainsElements,
    /// Field is present and not null. The expected value is ignored.
    Present,
}

impl Policy {
    pub const fn verb(self) -> &'static str {
        match self {
            Policy::Equal => "equals",
            Policy::Subset => "includes",
            Policy::ConsistOf => "consists of",
            Policy::ContainsElements => "contains",
            Policy::Present => "is present",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub path: &'static [&'static str],
    pub expected: Value,
    pub policy: Policy,
}

impl FieldRule {
    pub fn new(path: &'static [&'static str], policy: Policy, expected: Value) -> Self {
        Self {
            path,
            expected,
            policy,
        }
    }

    pub fn present(path: &'static [&'static str]) -> Self {
        Self::new(path, Policy::Present, Value::Null)
    }

    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Compares the rule against a candidate document. `None` means the rule
    /// holds.
    pub fn check(&self, candidate: &Value) -> Option<FieldDiff> {
        let actual = lookup(candidate, self.path);
        let reason = match self.policy {
            Policy::Present => match actual {
                None | Some(Value::Null) => Some("is absent".to_string()),
                Some(_) => None,
            },
            Policy::Equal => match actual {
                None => Some("is absent".to_string()),
                Some(a) if a == &self.expected => None,
                Some(a) => Some(describe_inequality(&self.expected, a)),
            },
            Policy::Subset => check_subset(&self.expected, actual),
            Policy::ConsistOf => check_elements(&self.expected, actual, true),
            Policy::ContainsElements => check_elements(&self.expected, actual, false),
        }?;

        Some(FieldDiff {
            path: self.path_string(),
            policy: self.policy,
            expected: self.expected.clone(),
            actual: actual.cloned(),
            reason,
        })
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.policy {
            Policy::Present => write!(f, "{} {}", self.path_string(), self.policy.verb()),
            _ => write!(
                f,
                "{} {} {}",
                self.path_string(),
                self.policy.verb(),
                self.expected
            ),
        }
    }
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff {
    pub path: String,
    pub policy: Policy,
    pub expected: Value,
    pub actual: Option<Value>,
    pub reason: String,
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)?;
        if self.policy != Policy::Present {
            write!(f, "\n      expected: {}", self.expected)?;
            match &self.actual {
                Some(actual) => write!(f, "\n      actual:   {actual}")?,
                None => write!(f, "\n      actual:   <absent>")?,
            }
        }
        Ok(())
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |cur, key| cur.get(*key))
}

fn describe_inequality(expected: &Value, actual: &Value) -> String {
    match (expected, actual) {
        (Value::Object(e), Value::Object(a)) => {
            let mut fields: Vec<&str> = e
                .iter()
                .filter(|(k, v)| a.get(k.as_str()) != Some(*v))
                .map(|(k, _)| k.as_str())
                .collect();
            fields.extend(
                a.keys()
                    .filter(|k| !e.contains_key(k.as_str()))
                    .map(String::as_str),
            );
            format!("differs in {}", fields.join(", "))
        }
        _ => "is not equal to the expected value".to_string(),
    }
}

fn check_subset(expected: &Value, actual: Option<&Value>) -> Option<String> {
    let Some(expected) = expected.as_object() else {
        return Some("expected value is not an object".to_string());
    };
    let actual = match actual {
        None | Some(Value::Null) => {
            if expected.is_empty() {
                return None;
            }
            return Some("is absent".to_string());
        }
        Some(Value::Object(a)) => a,
        Some(_) => return Some("is not an object".to_string()),
    };

    let mut problems = Vec::new();
    for (key, want) in expected {
        match actual.get(key) {
            None => problems.push(format!("missing key {key:?}")),
            Some(got) if got != want => {
                problems.push(format!("key {key:?} is {got}, want {want}"))
            }
            Some(_) => {}
        }
    }
    if problems.is_empty() {
        None
    } else {
        Some(problems.join("; "))
    }
}

fn check_elements(expected: &Value, actual: Option<&Value>, exact: bool) -> Option<String> {
    let Some(expected) = expected.as_array() else {
        return Some("expected value is not an array".to_string());
    };
    let actual: &[Value] = match actual {
        None | Some(Value::Null) => &[],
        Some(Value::Array(a)) => a.as_slice(),
        Some(_) => return Some("is not an array".to_string()),
    };

    let mut unmatched: Vec<&Value> = actual.iter().collect();
    let mut missing = Vec::new();
    for want in expected {
        match unmatched.iter().position(|got| *got == want) {
            Some(i) => {
                unmatched.swap_remove(i);
            }
            None => missing.push(want.to_string()),
        }
    }

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing elements [{}]", missing.join(", ")));
    }
    if exact && !unmatched.is_empty() {
        let extra: Vec<String> = unmatched.iter().map(|v| v.to_string()).collect();
        problems.push(format!("unexpected elements [{}]", extra.join(", ")));
    }
    if problems.is_empty() {
        None
    } else {
        Some(problems.join("; "))
    }
}
