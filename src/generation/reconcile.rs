//! Parameter reconciliation
//!
//! Merges a raw draft with per-edge overrides and configured defaults into a
//! `NetworkSpec`. Attribute gaps fall back to defaults; structural gaps are
//! errors because they change the topology itself.
//!
//! Precedence, highest first: explicit overrides, global draft attributes,
//! defaults.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::draft::{AttributeField, LaneSpec, Override, Phrasing, RawDraft, SpeedUnit};
use super::error::{GenerationError, Result};
use super::normalize::{normalize_lanes_for, normalize_length_for, normalize_speed_for};
use super::topology::check_node_limit;
use super::types::{
    AttributeSet, JunctionControl, JunctionShape, NetworkKind, DEFAULT_LANES, DEFAULT_LENGTH,
    DEFAULT_SPEED,
};

/// System defaults for attributes a description leaves out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub lanes: u32,
    pub length: f64,
    pub speed: f64,
    pub control: JunctionControl,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            length: DEFAULT_LENGTH,
            speed: DEFAULT_SPEED,
            control: JunctionControl::default(),
        }
    }
}

impl Defaults {
    pub fn attributes(&self) -> AttributeSet {
        AttributeSet {
            lanes: self.lanes,
            length: self.length,
            speed: self.speed,
        }
    }

    /// Defaults go through the same checks as description values
    pub fn validate(&self) -> Result<()> {
        normalize_lanes_for("defaults.lanes", LaneSpec::per_direction(self.lanes as i64))?;
        normalize_length_for("defaults.length", self.length)?;
        normalize_speed_for("defaults.speed", self.speed, SpeedUnit::MetersPerSecond)?;
        Ok(())
    }
}

/// One entry of a junction
#[derive(Debug, Clone, PartialEq)]
pub struct Approach {
    pub label: String,
    /// Degrees counter clockwise from east
    pub angle: f64,
    pub attributes: AttributeSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JunctionSpec {
    pub arity: u32,
    pub shape: JunctionShape,
    pub approaches: Vec<Approach>,
    pub control: JunctionControl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub rows: u32,
    pub columns: u32,
    /// Edges along a row; `length` is the column spacing
    pub horizontal: AttributeSet,
    /// Edges along a column; `length` is the row spacing
    pub vertical: AttributeSet,
    pub one_way: bool,
    pub control: JunctionControl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialSpec {
    pub ring_count: u32,
    pub spoke_count: u32,
    /// Circumferential edges; their length follows from the geometry
    pub ring: AttributeSet,
    /// Radial edges; `length` is the distance between consecutive rings
    pub spoke: AttributeSet,
    pub one_way: bool,
    pub control: JunctionControl,
}

/// Reconciled description of one network, one variant per topology kind
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkSpec {
    Junction(JunctionSpec),
    Grid(GridSpec),
    Radial(RadialSpec),
}

impl NetworkSpec {
    pub fn kind(&self) -> NetworkKind {
        match self {
            NetworkSpec::Junction(_) => NetworkKind::Junction,
            NetworkSpec::Grid(_) => NetworkKind::Grid,
            NetworkSpec::Radial(_) => NetworkKind::Radial,
        }
    }

    /// Attribute set of every approach or edge class, by label
    pub fn attributes(&self) -> Vec<(&str, &AttributeSet)> {
        match self {
            NetworkSpec::Junction(junction) => junction
                .approaches
                .iter()
                .map(|approach| (approach.label.as_str(), &approach.attributes))
                .collect(),
            NetworkSpec::Grid(grid) => vec![
                ("horizontal", &grid.horizontal),
                ("vertical", &grid.vertical),
            ],
            NetworkSpec::Radial(radial) => vec![("ring", &radial.ring), ("spoke", &radial.spoke)],
        }
    }

    pub fn attributes_for(&self, label: &str) -> Option<&AttributeSet> {
        self.attributes()
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, attributes)| attributes)
    }
}

/// An approach or edge class that overrides can name
struct Slot {
    names: Vec<String>,
    attributes: AttributeSet,
}

impl Slot {
    fn new(names: Vec<String>, attributes: AttributeSet) -> Self {
        Self { names, attributes }
    }

    fn matches(&self, target: &str) -> bool {
        self.names.iter().any(|name| name.eq_ignore_ascii_case(target))
    }
}

/// Reconciles a draft into a network spec.
/// `overrides` are usually `draft.overrides`, but callers may pass their own.
pub fn reconcile(draft: &RawDraft, overrides: &[Override], defaults: &Defaults) -> Result<NetworkSpec> {
    let kind = draft
        .network_kind
        .ok_or_else(|| GenerationError::underspecified("network_kind", "to choose a topology"))?;

    let global = global_attributes(draft, defaults)?;
    let control = draft.control.unwrap_or(defaults.control);
    let one_way = draft.one_way.unwrap_or(false);

    debug!("Reconciling {kind} draft with {} overrides", overrides.len());

    match kind {
        NetworkKind::Junction => {
            if one_way {
                warn!("one_way is ignored for a single junction");
            }
            let arity = structural(draft.arity, "arity", "for a junction")?;
            let shape = resolve_shape(draft.junction_shape, arity)?;
            check_node_limit("arity", arity, u64::from(arity).checked_add(1))?;
            let layout = shape.approach_layout(arity);

            let mut slots: Vec<Slot> = layout
                .iter()
                .enumerate()
                .map(|(index, (label, _))| Slot::new(vec![label.clone(), format!("arm{index}")], global))
                .collect();
            apply_overrides(&mut slots, overrides, kind)?;

            let approaches = layout
                .into_iter()
                .zip(slots)
                .map(|((label, angle), slot)| Approach {
                    label,
                    angle,
                    attributes: slot.attributes,
                })
                .collect();

            Ok(NetworkSpec::Junction(JunctionSpec {
                arity,
                shape,
                approaches,
                control,
            }))
        }
        NetworkKind::Grid => {
            let rows = structural(draft.rows, "rows", "for a grid")?;
            let columns = structural(draft.columns, "columns", "for a grid")?;

            let mut slots = vec![
                Slot::new(vec!["horizontal".into(), "x".into()], global),
                Slot::new(vec!["vertical".into(), "y".into()], global),
            ];
            apply_overrides(&mut slots, overrides, kind)?;

            Ok(NetworkSpec::Grid(GridSpec {
                rows,
                columns,
                horizontal: slots[0].attributes,
                vertical: slots[1].attributes,
                one_way,
                control,
            }))
        }
        NetworkKind::Radial => {
            let ring_count = structural(draft.ring_count, "ring_count", "for a radial network")?;
            let spoke_count = structural(draft.spoke_count, "spoke_count", "for a radial network")?;

            let mut slots = vec![
                Slot::new(vec!["ring".into(), "rings".into(), "circle".into()], global),
                Slot::new(vec!["spoke".into(), "spokes".into(), "arm".into()], global),
            ];
            if let Some(entry) = overrides
                .iter()
                .find(|entry| entry.attribute == AttributeField::Length && slots[0].matches(&entry.target))
            {
                return Err(GenerationError::invalid_topology(
                    format!("overrides.{}.length", entry.target),
                    entry.value,
                    "ring edge length follows from the spoke spacing",
                ));
            }
            apply_overrides(&mut slots, overrides, kind)?;

            Ok(NetworkSpec::Radial(RadialSpec {
                ring_count,
                spoke_count,
                ring: slots[0].attributes,
                spoke: slots[1].attributes,
                one_way,
                control,
            }))
        }
    }
}

/// Global attributes from the draft, each falling back to the default
fn global_attributes(draft: &RawDraft, defaults: &Defaults) -> Result<AttributeSet> {
    let lanes = match draft.lanes {
        Some(spec) => normalize_lanes_for("lanes", spec)?,
        None => defaults.lanes,
    };
    let length = match draft.length {
        Some(length) => normalize_length_for("length", length)?,
        None => defaults.length,
    };
    let speed = match draft.speed {
        Some(speed) => normalize_speed_for("speed", speed, SpeedUnit::MetersPerSecond)?,
        None => defaults.speed,
    };
    Ok(AttributeSet {
        lanes,
        length,
        speed,
    })
}

/// A required structural count. Minimums are enforced by the topology builder.
fn structural(value: Option<i64>, field: &str, context: &str) -> Result<u32> {
    let value = value.ok_or_else(|| GenerationError::underspecified(field, context))?;
    u32::try_from(value)
        .map_err(|_| GenerationError::invalid_topology(field, value, "must be a non-negative count"))
}

fn resolve_shape(explicit: Option<JunctionShape>, arity: u32) -> Result<JunctionShape> {
    let Some(shape) = explicit else {
        return Ok(JunctionShape::for_arity(arity));
    };
    match shape.required_arity() {
        Some(required) if required != arity => Err(GenerationError::invalid_topology(
            "arity",
            arity,
            format!("a {shape} junction has exactly {required} approaches"),
        )),
        _ => Ok(shape),
    }
}

fn apply_overrides(slots: &mut [Slot], overrides: &[Override], kind: NetworkKind) -> Result<()> {
    let mut applied: HashMap<(usize, AttributeField), (f64, String)> = HashMap::new();

    for entry in overrides {
        let index = slots
            .iter()
            .position(|slot| slot.matches(&entry.target))
            .ok_or_else(|| {
                let known: Vec<&str> = slots.iter().map(|slot| slot.names[0].as_str()).collect();
                GenerationError::invalid_topology(
                    "overrides.target",
                    &entry.target,
                    format!("a {kind} network only has {}", known.join(", ")),
                )
            })?;

        let value = override_value(entry)?;
        let key = (index, entry.attribute);
        match applied.get(&key) {
            Some((existing, first_target)) if *existing != value => {
                return Err(GenerationError::ConflictingAttribute {
                    target: slots[index].names[0].clone(),
                    field: entry.attribute.to_string(),
                    first: format!("{existing} (from `{first_target}`)"),
                    second: format!("{value} (from `{}`)", entry.target),
                });
            }
            Some(_) => debug!("Duplicate override for {} {} ignored", entry.target, entry.attribute),
            None => {
                applied.insert(key, (value, entry.target.clone()));
            }
        }
    }

    for ((index, field), (value, _)) in applied {
        let attributes = &mut slots[index].attributes;
        match field {
            AttributeField::Lanes => attributes.lanes = value as u32,
            AttributeField::Length => attributes.length = value,
            AttributeField::Speed => attributes.speed = value,
        }
    }

    Ok(())
}

/// Normalized value of an override; lanes come back per direction
fn override_value(entry: &Override) -> Result<f64> {
    let field = format!("overrides.{}.{}", entry.target, entry.attribute);

    if entry.attribute != AttributeField::Lanes && entry.phrasing.is_some() {
        warn!("Lane phrasing on {field} has no effect");
    }

    match entry.attribute {
        AttributeField::Lanes => {
            if !entry.value.is_finite() || entry.value.fract() != 0.0 {
                return Err(GenerationError::malformed(field, entry.value, "a whole number of lanes"));
            }
            let spec = LaneSpec {
                count: entry.value as i64,
                phrasing: entry.phrasing.unwrap_or(Phrasing::PerDirection),
            };
            Ok(normalize_lanes_for(&field, spec)? as f64)
        }
        AttributeField::Length => normalize_length_for(&field, entry.value),
        AttributeField::Speed => normalize_speed_for(&field, entry.value, SpeedUnit::MetersPerSecond),
    }
}
