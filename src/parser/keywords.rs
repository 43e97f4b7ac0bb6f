//! Rule-based parser for English road network descriptions
//!
//! Understands phrases like "4-way junction, bidirectional 4 lanes, 200 m",
//! "3x4 grid with 2 lanes per direction" or "radial network with 2 rings and
//! 6 spokes". The description is split into clauses at commas, semicolons and
//! sentence ends. A clause naming a direction ("west edge 6 lanes") becomes an
//! override for that direction; any other clause sets global attributes.

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use regex::{Captures, Regex};

use super::DescriptionParser;
use crate::generation::{
    normalize_speed, JunctionControl, JunctionShape, LaneSpec, NetworkKind, Override, Phrasing,
    RawDraft, SpeedUnit,
};

const COUNT: &str = r"(\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)";

#[derive(Debug)]
pub struct KeywordParser {
    clause_split: Regex,
    grid_dimensions: Regex,
    grid_rows: Regex,
    grid_columns: Regex,
    arity: Regex,
    t_junction: Regex,
    rings: Regex,
    spokes: Regex,
    lanes: Regex,
    length: Regex,
    speed: Regex,
    compass: Regex,
    edge_class: Regex,
    others: Regex,
}

impl KeywordParser {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).with_context(|| format!("Invalid keyword pattern {pattern}"))
        };

        Ok(Self {
            clause_split: compile(r"[,;]|\.\s|\.$|\n|\bwhile\b|\bwhereas\b|\bbut\b")?,
            grid_dimensions: compile(r"(\d+)\s*(?:x|×|by)\s*(\d+)")?,
            grid_rows: compile(&format!(r"\b{COUNT}\s+rows?\b"))?,
            grid_columns: compile(&format!(r"\b{COUNT}\s+col(?:umn)?s?\b"))?,
            arity: compile(&format!(r"\b{COUNT}[\s-]*(?:way|arms?|armed|legs?|legged|branch(?:es)?)\b"))?,
            t_junction: compile(r"\bt[\s-]?(?:junction|intersection)s?\b")?,
            rings: compile(&format!(r"\b{COUNT}[\s-]*(?:rings?|circles?|layers?)\b"))?,
            spokes: compile(&format!(r"\b{COUNT}[\s-]*(?:spokes?|arms?|armed)\b"))?,
            lanes: compile(&format!(
                r"(?:\b(bidirectional|double|dual|total of|both directions)\s+)?\b{COUNT}[\s-]*lanes?\b(\s+(?:per|in each|each|every|in every|for each)\s+direction)?(\s+(?:in total|total|in both directions|both ways|bidirectional))?"
            ))?,
            length: compile(r"(\d+(?:\.\d+)?)\s*(km|kilomet(?:er|re)s?|m|met(?:er|re)s?)\b")?,
            speed: compile(r"(\d+(?:\.\d+)?)\s*(km/h|kmh|kph|m/s)")?,
            compass: compile(r"\b(north|east|south|west)(?:ern)?\b")?,
            edge_class: compile(
                r"\b(horizontal|vertical|ring|spoke)\s+(?:edges?|roads?|streets?|links?|segments?)\b",
            )?,
            others: compile(r"\b(?:others?|the rest|remaining|all other)\b\D*?(\d+)")?,
        })
    }

    fn parse_kind(&self, text: &str, draft: &mut RawDraft) {
        let grid_dims = self.grid_dimensions.captures(text);

        if grid_dims.is_some() || has_any_word(text, &["grid", "grids", "lattice"]) {
            draft.network_kind = Some(NetworkKind::Grid);
            if let Some(caps) = grid_dims {
                draft.rows = count(&caps, 1);
                draft.columns = count(&caps, 2);
            }
            if let Some(caps) = self.grid_rows.captures(text) {
                draft.rows = count(&caps, 1);
            }
            if let Some(caps) = self.grid_columns.captures(text) {
                draft.columns = count(&caps, 1);
            }
        } else if has_any_word(text, &["radial", "ring", "rings", "spider", "circular"]) {
            draft.network_kind = Some(NetworkKind::Radial);
            draft.ring_count = self.rings.captures(text).and_then(|caps| count(&caps, 1));
            draft.spoke_count = self.spokes.captures(text).and_then(|caps| count(&caps, 1));
        } else if has_any_word(
            text,
            &["junction", "junctions", "intersection", "intersections", "crossroad", "crossroads", "crossing"],
        ) {
            draft.network_kind = Some(NetworkKind::Junction);
            draft.arity = self.arity.captures(text).and_then(|caps| count(&caps, 1));

            if self.t_junction.is_match(text) {
                draft.junction_shape = Some(JunctionShape::T);
                draft.arity.get_or_insert(3);
            } else if has_any_word(text, &["crossroad", "crossroads", "cross"]) {
                draft.junction_shape = Some(JunctionShape::Cross);
                draft.arity.get_or_insert(4);
            }
        }
    }

    fn parse_control(&self, text: &str) -> Option<JunctionControl> {
        if text.contains("traffic light") || text.contains("signalized") || text.contains("signals") {
            Some(JunctionControl::TrafficLight)
        } else if text.contains("right before left") || text.contains("right-before-left") {
            Some(JunctionControl::RightBeforeLeft)
        } else if text.contains("all-way stop") || text.contains("allway stop") || text.contains("stop sign") {
            Some(JunctionControl::AllwayStop)
        } else if text.contains("unregulated") || text.contains("uncontrolled") {
            Some(JunctionControl::Unregulated)
        } else if text.contains("priority") {
            Some(JunctionControl::Priority)
        } else {
            None
        }
    }

    /// Lane, length and speed values mentioned in one clause
    fn clause_quantities(&self, clause: &str) -> Result<ClauseQuantities> {
        let mut quantities = ClauseQuantities::default();

        if let Some(caps) = self.lanes.captures(clause) {
            let bidirectional = caps.get(1).is_some() || caps.get(4).is_some();
            let per_direction = caps.get(3).is_some();
            if bidirectional && per_direction {
                warn!("Clause {clause:?} uses both lane phrasings, reading it per direction");
            }
            if let Some(value) = count(&caps, 2) {
                quantities.lanes = Some(if bidirectional && !per_direction {
                    LaneSpec::bidirectional(value)
                } else {
                    LaneSpec::per_direction(value)
                });
            }
        }

        // Speeds first, so "13.9 m/s" is not also read as a length
        let mut remainder = clause.to_string();
        if let Some(caps) = self.speed.captures(clause) {
            let value: f64 = caps[1].parse().with_context(|| format!("Invalid speed {}", &caps[1]))?;
            let unit = match &caps[2] {
                "m/s" => SpeedUnit::MetersPerSecond,
                _ => SpeedUnit::KilometersPerHour,
            };
            quantities.speed = Some(normalize_speed(value, unit)?);
            remainder = self.speed.replace_all(clause, " ").into_owned();
        }

        if let Some(caps) = self.length.captures(&remainder) {
            let value: f64 = caps[1].parse().with_context(|| format!("Invalid length {}", &caps[1]))?;
            quantities.length = Some(if caps[2].starts_with('k') { value * 1000.0 } else { value });
        }

        Ok(quantities)
    }

    /// Approaches or edge classes a clause is about
    fn clause_targets(&self, clause: &str) -> Vec<String> {
        self.compass
            .captures_iter(clause)
            .chain(self.edge_class.captures_iter(clause))
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

#[derive(Debug, Default)]
struct ClauseQuantities {
    lanes: Option<LaneSpec>,
    length: Option<f64>,
    speed: Option<f64>,
}

impl ClauseQuantities {
    fn is_empty(&self) -> bool {
        self.lanes.is_none() && self.length.is_none() && self.speed.is_none()
    }
}

impl DescriptionParser for KeywordParser {
    fn parse(&self, description: &str) -> Result<RawDraft> {
        let mut text = description.to_lowercase();
        // "two-way" and "one-way" would otherwise read as junction arities
        for phrase in ["two-way", "two way"] {
            text = text.replace(phrase, "bidirectional");
        }
        let mut draft = RawDraft::default();
        for phrase in ["one-way", "one way"] {
            if text.contains(phrase) {
                draft.one_way = Some(true);
                text = text.replace(phrase, "unidirectional");
            }
        }

        self.parse_kind(&text, &mut draft);
        draft.control = self.parse_control(&text);

        let mut last_phrasing = Phrasing::PerDirection;
        for clause in self.clause_split.split(&text) {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }

            let quantities = self.clause_quantities(clause)?;
            if let Some(lanes) = quantities.lanes {
                last_phrasing = lanes.phrasing;
            }

            let targets = self.clause_targets(clause);
            if !targets.is_empty() && !quantities.is_empty() {
                for target in targets {
                    if let Some(lanes) = quantities.lanes {
                        draft.overrides.push(Override::lanes(&target, lanes));
                    }
                    if let Some(length) = quantities.length {
                        draft.overrides.push(Override::length(&target, length));
                    }
                    if let Some(speed) = quantities.speed {
                        draft.overrides.push(Override::speed(&target, speed));
                    }
                }
                continue;
            }

            // "others 4" reuses the phrasing of the lanes mentioned before it
            let mut lanes = quantities.lanes;
            if lanes.is_none() {
                if let Some(caps) = self.others.captures(clause) {
                    lanes = count(&caps, 1).map(|value| LaneSpec {
                        count: value,
                        phrasing: last_phrasing,
                    });
                }
            }

            set_global(&mut draft.lanes, lanes, "lanes");
            set_global(&mut draft.length, quantities.length, "length");
            set_global(&mut draft.speed, quantities.speed, "speed");
        }

        if draft == RawDraft::default() {
            bail!("Description contains no recognizable road network parameters");
        }

        debug!("Keyword parser extracted {draft:?}");
        Ok(draft)
    }
}

/// The first mention of a global attribute wins
fn set_global<T: PartialEq + std::fmt::Debug>(slot: &mut Option<T>, value: Option<T>, name: &str) {
    let Some(value) = value else {
        return;
    };
    match slot {
        Some(existing) if *existing != value => {
            warn!("Ignoring second global {name} {value:?}, keeping {existing:?}");
        }
        Some(_) => {}
        None => *slot = Some(value),
    }
}

fn has_any_word(text: &str, words: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| words.contains(&word))
}

fn count(caps: &Captures, group: usize) -> Option<i64> {
    let token = caps.get(group)?.as_str();
    let value = match token {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };
    Some(value)
}
