//! Property Differ (§4.C): deep-diffs a resource's `before`/`after` JSON
//! trees into a flat, sorted, size-bounded list of `PropertyChange`s. Pure
//! and total — pathological inputs cause truncation, never an error.

use serde_json::Value;
use std::cmp::Ordering;

use crate::plan::model::{PathSegment, PropertyAction, PropertyChange, PropertyChangeAnalysis};

/// Build-time limits (§4.C). Not configurable at runtime by design.
#[derive(Debug, Clone, Copy)]
pub struct DiffLimits {
    pub max_properties_per_resource: usize,
    pub max_property_value_size: usize,
    pub max_total_property_memory: usize,
}

pub const MAX_PROPERTIES_PER_RESOURCE: usize = 100;
pub const MAX_PROPERTY_VALUE_SIZE: usize = 10 * 1024;
pub const MAX_TOTAL_PROPERTY_MEMORY: usize = 10 * 1024 * 1024;

impl Default for DiffLimits {
    fn default() -> Self {
        DiffLimits {
            max_properties_per_resource: MAX_PROPERTIES_PER_RESOURCE,
            max_property_value_size: MAX_PROPERTY_VALUE_SIZE,
            max_total_property_memory: MAX_TOTAL_PROPERTY_MEMORY,
        }
    }
}

/// The fixed, content-free token substituted for any sensitive value at the
/// differ boundary (§4.C). The raw value never crosses into `PropertyChange`.
pub const MASKED_TOKEN: &str = "<masked>";

/// A sensitivity mask position, tracked during recursion so an ancestor
/// `true` is transitive to every descendant path (§4.C, §9).
#[derive(Debug, Clone, Copy)]
enum Mask<'a> {
    None,
    All,
    Node(&'a Value),
}

impl<'a> Mask<'a> {
    fn from_option(v: Option<&'a Value>) -> Mask<'a> {
        match v {
            Some(v) => Mask::Node(v),
            None => Mask::None,
        }
    }

    fn is_sensitive_here(&self) -> bool {
        matches!(self, Mask::All) || matches!(self, Mask::Node(Value::Bool(true)))
    }

    fn descend_key(&self, key: &str) -> Mask<'a> {
        match self {
            Mask::All => Mask::All,
            Mask::None => Mask::None,
            Mask::Node(Value::Bool(true)) => Mask::All,
            Mask::Node(Value::Object(map)) => map.get(key).map(Mask::Node).unwrap_or(Mask::None),
            Mask::Node(_) => Mask::None,
        }
    }

    fn descend_index(&self, idx: usize) -> Mask<'a> {
        match self {
            Mask::All => Mask::All,
            Mask::None => Mask::None,
            Mask::Node(Value::Bool(true)) => Mask::All,
            Mask::Node(Value::Array(arr)) => arr.get(idx).map(Mask::Node).unwrap_or(Mask::None),
            Mask::Node(_) => Mask::None,
        }
    }
}

struct Collector<'a> {
    changes: Vec<PropertyChange>,
    truncated: bool,
    total_size: usize,
    limits: &'a DiffLimits,
}

impl<'a> Collector<'a> {
    fn stopped(&self) -> bool {
        self.truncated || self.changes.len() >= self.limits.max_properties_per_resource
    }

    fn emit(
        &mut self,
        path: Vec<PathSegment>,
        before: Option<Value>,
        after: Option<Value>,
        action: PropertyAction,
        sensitive: bool,
        replace_paths: &[Vec<PathSegment>],
    ) {
        if self.stopped() {
            self.truncated = true;
            return;
        }

        let name = leaf_name(&path);
        let triggers_replacement = path_triggers(&path, replace_paths);

        let (before, after, size) = if sensitive {
            let mut size = 0;
            let before = before.map(|_| {
                size += MASKED_TOKEN.len();
                Value::String(MASKED_TOKEN.to_string())
            });
            let after = after.map(|_| {
                size += MASKED_TOKEN.len();
                Value::String(MASKED_TOKEN.to_string())
            });
            (before, after, size)
        } else {
            let (before, before_size) = before
                .map(|v| truncate_value(v, self.limits.max_property_value_size))
                .map(|(v, s)| (Some(v), s))
                .unwrap_or((None, 0));
            let (after, after_size) = after
                .map(|v| truncate_value(v, self.limits.max_property_value_size))
                .map(|(v, s)| (Some(v), s))
                .unwrap_or((None, 0));
            (before, after, before_size + after_size)
        };

        if self.total_size + size > self.limits.max_total_property_memory {
            self.truncated = true;
            return;
        }
        self.total_size += size;

        self.changes.push(PropertyChange {
            name,
            path,
            before,
            after,
            action,
            sensitive,
            size,
            triggers_replacement,
        });
    }
}

/// Diff `before` against `after`, honoring sensitivity masks and
/// `replace_paths` hints, and bound by `limits` (§4.C).
pub fn diff(
    before: Option<&Value>,
    after: Option<&Value>,
    before_sensitive: Option<&Value>,
    after_sensitive: Option<&Value>,
    replace_paths: &[Vec<PathSegment>],
    limits: &DiffLimits,
) -> PropertyChangeAnalysis {
    let mut collector = Collector {
        changes: Vec::new(),
        truncated: false,
        total_size: 0,
        limits,
    };

    let bmask = Mask::from_option(before_sensitive);
    let amask = Mask::from_option(after_sensitive);

    walk(
        before,
        after,
        bmask,
        amask,
        Vec::new(),
        replace_paths,
        &mut collector,
    );

    collector
        .changes
        .sort_by(|a, b| compare_properties(a, b));

    PropertyChangeAnalysis {
        count: collector.changes.len(),
        truncated: collector.truncated,
        total_size: collector.total_size,
        changes: collector.changes,
    }
}

fn walk(
    b: Option<&Value>,
    a: Option<&Value>,
    bmask: Mask,
    amask: Mask,
    path: Vec<PathSegment>,
    replace_paths: &[Vec<PathSegment>],
    out: &mut Collector,
) {
    if out.stopped() {
        return;
    }

    let sensitive = bmask.is_sensitive_here() || amask.is_sensitive_here();

    match (b, a) {
        (None, None) => {}
        (None, Some(av)) => {
            out.emit(
                path,
                None,
                Some(av.clone()),
                PropertyAction::Add,
                sensitive,
                replace_paths,
            );
        }
        (Some(bv), None) => {
            out.emit(
                path,
                Some(bv.clone()),
                None,
                PropertyAction::Remove,
                sensitive,
                replace_paths,
            );
        }
        (Some(bv), Some(av)) => {
            if kind(bv) != kind(av) {
                out.emit(
                    path,
                    Some(bv.clone()),
                    Some(av.clone()),
                    PropertyAction::Update,
                    sensitive,
                    replace_paths,
                );
                return;
            }

            match (bv, av) {
                (Value::Object(bo), Value::Object(ao)) => {
                    let mut keys: Vec<&String> = bo.keys().chain(ao.keys()).collect();
                    keys.sort();
                    keys.dedup();
                    for key in keys {
                        if out.stopped() {
                            break;
                        }
                        let mut child_path = path.clone();
                        child_path.push(key.clone());
                        walk(
                            bo.get(key),
                            ao.get(key),
                            bmask.descend_key(key),
                            amask.descend_key(key),
                            child_path,
                            replace_paths,
                            out,
                        );
                    }
                }
                (Value::Array(ba), Value::Array(aa)) => {
                    if ba.len() != aa.len() {
                        out.emit(
                            path,
                            Some(bv.clone()),
                            Some(av.clone()),
                            PropertyAction::Update,
                            sensitive,
                            replace_paths,
                        );
                    } else {
                        for i in 0..ba.len() {
                            if out.stopped() {
                                break;
                            }
                            let mut child_path = path.clone();
                            child_path.push(format!("[{}]", i));
                            walk(
                                ba.get(i),
                                aa.get(i),
                                bmask.descend_index(i),
                                amask.descend_index(i),
                                child_path,
                                replace_paths,
                                out,
                            );
                        }
                    }
                }
                _ => {
                    if bv != av {
                        out.emit(
                            path,
                            Some(bv.clone()),
                            Some(av.clone()),
                            PropertyAction::Update,
                            sensitive,
                            replace_paths,
                        );
                    }
                }
            }
        }
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The last path segment with array brackets stripped, e.g. `tags` for
/// `["tags"]`, or `2` for `["list", "[2]"]` (§4.C).
fn leaf_name(path: &[PathSegment]) -> String {
    path.last()
        .map(|seg| seg.trim_start_matches('[').trim_end_matches(']').to_string())
        .unwrap_or_default()
}

/// True if `path` equals, or is a descendant of, any entry in `replace_paths`.
fn path_triggers(path: &[PathSegment], replace_paths: &[Vec<PathSegment>]) -> bool {
    replace_paths
        .iter()
        .any(|rp| !rp.is_empty() && path.len() >= rp.len() && path[..rp.len()] == rp[..])
}

/// Truncate `v`'s serialized form if it exceeds `limit` bytes, returning the
/// (possibly truncated) value to store and the pre-truncation size.
fn truncate_value(v: Value, limit: usize) -> (Value, usize) {
    let serialized = serde_json::to_string(&v).unwrap_or_default();
    let size = serialized.len();
    if size <= limit {
        (v, size)
    } else {
        let mut truncated: String = serialized.chars().take(limit).collect();
        truncated.push_str("[...truncated]");
        (Value::String(truncated), size)
    }
}

/// Compare two digit-or-non-digit runs the way a human reads them: digit
/// runs compare numerically, everything else compares lexically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek(), bi.peek()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    let a_run: String = take_digits(&mut ai);
                    let b_run: String = take_digits(&mut bi);
                    let a_num: u128 = a_run.parse().unwrap_or(0);
                    let b_num: u128 = b_run.parse().unwrap_or(0);
                    match a_num.cmp(&b_num) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                } else {
                    let (ac, bc) = (*ac, *bc);
                    ai.next();
                    bi.next();
                    match ac.cmp(&bc) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut s = String::new();
    while let Some(c) = it.peek() {
        if c.is_ascii_digit() {
            s.push(*c);
            it.next();
        } else {
            break;
        }
    }
    s
}

fn path_cmp(a: &[PathSegment], b: &[PathSegment]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match natural_cmp(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

fn compare_properties(a: &PropertyChange, b: &PropertyChange) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| path_cmp(&a.path, &b.path))
}

/// Normalize a raw `replace_paths` entry (strings or integers per §6) into
/// this crate's path-segment representation.
pub fn normalize_path(raw: &[Value]) -> Vec<PathSegment> {
    raw.iter()
        .map(|seg| match seg {
            Value::String(s) => s.clone(),
            Value::Number(n) => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect()
}
