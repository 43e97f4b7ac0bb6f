//! Parser for JSON drafts
//!
//! Accepts a bare `RawDraft` object, the same object inside a fenced ```json
//! block, or the `{"network_type": ..., "parameters": {...}}` envelope a
//! language model is prompted to reply with. The envelope uses SUMO
//! `netgenerate` vocabulary, which is translated here:
//!
//! - a 1x1 grid is a single four-way junction
//! - `multi_junction` / `arm_number` describe a junction with that many arms
//! - `edge_specific` maps directions to per-direction lane counts and lengths
//! - `grid.x-length`, `grid.y-length` and `spider.space-radius` set edge class lengths

use anyhow::{anyhow, bail, Context, Result};
use log::debug;
use serde_json::{Map, Value};

use super::DescriptionParser;
use crate::generation::{AttributeField, Override, Phrasing, RawDraft};

#[derive(Debug, Default)]
pub struct JsonDraftParser;

impl JsonDraftParser {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptionParser for JsonDraftParser {
    fn parse(&self, description: &str) -> Result<RawDraft> {
        let text = extract_json(description)
            .ok_or_else(|| anyhow!("Reply does not contain a JSON object"))?;
        let value: Value = serde_json::from_str(text).context("Reply is not valid JSON")?;
        let Value::Object(object) = value else {
            return Err(anyhow!("Expected a JSON object, got {value}"));
        };

        let object = translate_envelope(object)?;
        debug!("Translated JSON draft: {}", Value::Object(object.clone()));

        serde_json::from_value(Value::Object(object)).context("JSON does not describe a network draft")
    }
}

/// The JSON part of a reply: a fenced block, or everything from the first `{` to the last `}`
fn extract_json(reply: &str) -> Option<&str> {
    if let Some(start) = reply.find("```") {
        let body = &reply[start + 3..];
        let body = body.strip_prefix("json").unwrap_or(body);
        let end = body.find("```")?;
        return Some(body[..end].trim());
    }

    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

fn translate_envelope(mut object: Map<String, Value>) -> Result<Map<String, Value>> {
    // Hoist the parameters object; explicit top-level keys win
    if let Some(Value::Object(parameters)) = object.remove("parameters") {
        for (key, value) in parameters {
            object.entry(key).or_insert(value);
        }
    }

    let mut overrides: Vec<Override> = match object.remove("overrides") {
        Some(value) => serde_json::from_value(value).context("Invalid overrides list")?,
        None => Vec::new(),
    };

    let multi_junction = object.remove("multi_junction").and_then(|value| value.as_bool()).unwrap_or(false)
        || object.get("junction_type").and_then(Value::as_str) == Some("multi_junction");
    object.remove("junction_type");

    let grid_x = object.get("grid.x-number").and_then(Value::as_i64);
    let grid_y = object.get("grid.y-number").and_then(Value::as_i64);

    if multi_junction || object.contains_key("arm_number") {
        object.insert("network_kind".into(), Value::from("junction"));
        object.remove("network_type");
        object.remove("grid.x-number");
        object.remove("grid.y-number");
    } else if grid_x == Some(1) && grid_y == Some(1) {
        object.insert("network_kind".into(), Value::from("junction"));
        object.insert("arity".into(), Value::from(4));
        object.remove("network_type");
        object.remove("grid.x-number");
        object.remove("grid.y-number");
    }

    if let Some(edge_specific) = object.remove("edge_specific") {
        let Value::Object(directions) = edge_specific else {
            return Err(anyhow!("edge_specific must map directions to attributes"));
        };
        for (direction, attributes) in directions {
            let Value::Object(attributes) = attributes else {
                return Err(anyhow!("edge_specific.{direction} must be an object"));
            };
            for (name, value) in attributes {
                let attribute: AttributeField = serde_json::from_value(Value::from(name.as_str()))
                    .with_context(|| format!("Unknown attribute edge_specific.{direction}.{name}"))?;
                let value = value
                    .as_f64()
                    .ok_or_else(|| anyhow!("edge_specific.{direction}.{name} must be a number"))?;
                overrides.push(Override {
                    target: direction.clone(),
                    attribute,
                    value,
                    // The prompt asks for lanes per direction here
                    phrasing: (attribute == AttributeField::Lanes).then_some(Phrasing::PerDirection),
                });
            }
        }
    }

    let kind = object
        .get("network_kind")
        .or_else(|| object.get("network_type"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // Spacing keys only mean something for their own kind; the model often
    // fills them in for single junctions too
    for (key, target, applies_to) in [
        ("grid.x-length", "horizontal", "grid"),
        ("grid.y-length", "vertical", "grid"),
        ("spider.space-radius", "spoke", "spider"),
    ] {
        let Some(value) = object.remove(key) else {
            continue;
        };
        if kind != applies_to && !(applies_to == "spider" && kind == "radial") {
            debug!("Dropping {key} for a {kind} network");
            continue;
        }
        let length = value.as_f64().ok_or_else(|| anyhow!("{key} must be a number"))?;
        overrides.push(Override::length(target, length));
    }

    object.insert("overrides".into(), serde_json::to_value(overrides)?);
    Ok(object)
}

/// Parameters a draft sets, one `name = value` line each. Overrides are
/// listed as `target.attribute = value`.
pub fn describe_draft(draft: &RawDraft) -> Result<Vec<String>> {
    let Value::Object(fields) = serde_json::to_value(draft)? else {
        bail!("A draft must serialize to a JSON object");
    };

    let mut lines: Vec<String> = fields
        .into_iter()
        .filter(|(name, value)| name != "overrides" && !value.is_null())
        .map(|(name, value)| format!("{name} = {value}"))
        .collect();
    lines.extend(
        draft
            .overrides
            .iter()
            .map(|entry| format!("{}.{} = {}", entry.target, entry.attribute, entry.value)),
    );
    Ok(lines)
}

/// Applies one `param=value` edit to a draft.
///
/// `param` is any draft field or alias accepted in JSON drafts, like `lanes`,
/// `rows` or `grid.x-number`, or `target.attribute` for an override such as
/// `west.lanes`. Values are read as JSON, falling back to a plain string, so
/// `network_kind=grid` works unquoted. The draft is left unchanged on error.
pub fn edit_draft(draft: &mut RawDraft, assignment: &str) -> Result<()> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected param=value, got {assignment:?}"))?;
    let (key, raw) = (key.trim(), raw.trim());
    if key.is_empty() {
        bail!("Missing parameter name in {assignment:?}");
    }
    let value: Value = serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw));

    let mut fields = Map::new();
    fields.insert(key.to_string(), value.clone());
    let patch: RawDraft = serde_json::from_value(Value::Object(fields))
        .with_context(|| format!("Invalid value {raw} for {key}"))?;

    if patch != RawDraft::default() {
        let (Value::Object(mut merged), Value::Object(changes)) =
            (serde_json::to_value(&*draft)?, serde_json::to_value(&patch)?)
        else {
            bail!("A draft must serialize to a JSON object");
        };
        for (name, change) in changes {
            let unset = change.is_null() || (name == "overrides" && patch.overrides.is_empty());
            if !unset {
                merged.insert(name, change);
            }
        }
        *draft = serde_json::from_value(Value::Object(merged)).context("Edited draft is invalid")?;
        debug!("Set {key} to {raw}");
        return Ok(());
    }

    let Some((target, name)) = key.rsplit_once('.') else {
        bail!("Unknown parameter {key:?}");
    };
    let attribute: AttributeField = serde_json::from_value(Value::from(name))
        .with_context(|| format!("Unknown parameter {key:?}"))?;
    let number = value
        .as_f64()
        .ok_or_else(|| anyhow!("{key} must be a number, got {raw}"))?;

    draft
        .overrides
        .retain(|entry| !(entry.target == target && entry.attribute == attribute));
    draft.overrides.push(Override {
        target: target.to_string(),
        attribute,
        value: number,
        phrasing: (attribute == AttributeField::Lanes).then_some(Phrasing::PerDirection),
    });
    debug!("Set override {target}.{attribute} to {number}");
    Ok(())
}
