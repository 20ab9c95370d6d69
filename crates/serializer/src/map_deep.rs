//! Leaf-rewriting deep mapper.
//!
//! Walks records and arrays, hands every leaf to a transform, and assembles a
//! new tree of the same shape. Special values are leaves even when they are
//! object-shaped on the wire, so the walk never looks inside them.

use std::convert::Infallible;

use serde_json::{Map, Value as JsonValue};

use crate::classify::is_tagged_map;
use crate::value::Value;

/// How the mapper sees one node.
pub enum Node<'a, T> {
    Record(Vec<(&'a str, &'a T)>),
    Array(&'a [T]),
    Leaf,
}

/// A tree the mapper can descend into.
pub trait Descend: Sized {
    fn node(&self) -> Node<'_, Self>;
}

/// A tree the mapper can build.
pub trait Assemble: Sized {
    fn from_entries(entries: Vec<(String, Self)>) -> Self;
    fn from_items(items: Vec<Self>) -> Self;
}

impl Descend for Value {
    fn node(&self) -> Node<'_, Self> {
        match self {
            Value::Record(record) => {
                Node::Record(record.iter().map(|(k, v)| (k.as_str(), v)).collect())
            }
            Value::Array(items) => Node::Array(items),
            _ => Node::Leaf,
        }
    }
}

impl Assemble for Value {
    fn from_entries(entries: Vec<(String, Self)>) -> Self {
        Value::Record(entries.into_iter().collect())
    }

    fn from_items(items: Vec<Self>) -> Self {
        Value::Array(items)
    }
}

impl Descend for JsonValue {
    fn node(&self) -> Node<'_, Self> {
        match self {
            JsonValue::Object(map) if !is_tagged_map(map) => {
                Node::Record(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
            }
            JsonValue::Array(items) => Node::Array(items),
            _ => Node::Leaf,
        }
    }
}

impl Assemble for JsonValue {
    fn from_entries(entries: Vec<(String, Self)>) -> Self {
        JsonValue::Object(entries.into_iter().collect::<Map<_, _>>())
    }

    fn from_items(items: Vec<Self>) -> Self {
        JsonValue::Array(items)
    }
}

/// Maps every leaf of `root` through `transform`, stopping at the first error.
///
/// A leaf root is transformed directly. Containers are rebuilt with the same
/// keys (in order) and the same lengths.
pub fn try_map_deep<I, O, E, F>(root: &I, transform: &mut F) -> Result<O, E>
where
    I: Descend,
    O: Assemble,
    F: FnMut(&I) -> Result<O, E>,
{
    match root.node() {
        Node::Record(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                out.push((key.to_string(), try_map_deep(value, transform)?));
            }
            Ok(O::from_entries(out))
        }
        Node::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(try_map_deep(item, transform)?);
            }
            Ok(O::from_items(out))
        }
        Node::Leaf => transform(root),
    }
}

/// Infallible [`try_map_deep`].
pub fn map_deep<I, O, F>(root: &I, mut transform: F) -> O
where
    I: Descend,
    O: Assemble,
    F: FnMut(&I) -> O,
{
    let mapped: Result<O, Infallible> =
        try_map_deep(root, &mut |leaf: &I| Ok(transform(leaf)));
    match mapped {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Maps the values of a record's entries without treating the record itself
/// as a node, so even a root that looks like a special value is walked.
pub fn try_map_entries<'a, I, O, E, F>(
    entries: impl IntoIterator<Item = (&'a String, &'a I)>,
    transform: &mut F,
) -> Result<Vec<(String, O)>, E>
where
    I: Descend + 'a,
    O: Assemble,
    F: FnMut(&I) -> Result<O, E>,
{
    let mut out = Vec::new();
    for (key, value) in entries {
        out.push((key.clone(), try_map_deep(value, transform)?));
    }
    Ok(out)
}

/// Infallible [`try_map_entries`].
pub fn map_entries<'a, I, O, F>(
    entries: impl IntoIterator<Item = (&'a String, &'a I)>,
    mut transform: F,
) -> Vec<(String, O)>
where
    I: Descend + 'a,
    O: Assemble,
    F: FnMut(&I) -> O,
{
    let mapped: Result<Vec<(String, O)>, Infallible> =
        try_map_entries(entries, &mut |leaf: &I| Ok(transform(leaf)));
    match mapped {
        Ok(out) => out,
        Err(never) => match never {},
    }
}
