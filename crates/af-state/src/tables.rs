//! Parsers for the solver's post-processing tables.
//!
//! Two formats are consumed:
//!
//! - the forces function-object table: header line(s) followed by data
//!   rows, where the last row's tokens 1..=3 are force components and
//!   4..=6 are moment components (N, N·m);
//! - field extremum tables: free text containing `min(<field>) = <value>`
//!   and `max(<field>) = <value>` lines, averaged into a representative
//!   value per field.
//!
//! Every parser is total. A table that is missing, truncated, or
//! malformed yields that artifact's neutral default, never an error; the
//! condition is logged at debug level for operator visibility.

use crate::state::STANDARD_PRESSURE_PA;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Last row of the forces table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForcesSample {
    pub forces_n: [f64; 3],
    pub moments_n_m: [f64; 3],
}

/// Pressure extrema and their mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSample {
    pub min_pa: f64,
    pub max_pa: f64,
    pub mean_pa: f64,
}

impl Default for PressureSample {
    fn default() -> Self {
        Self {
            min_pa: STANDARD_PRESSURE_PA,
            max_pa: STANDARD_PRESSURE_PA,
            mean_pa: STANDARD_PRESSURE_PA,
        }
    }
}

/// Velocity-component extrema and their mean.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocitySample {
    pub min_m_s: [f64; 3],
    pub max_m_s: [f64; 3],
    pub mean_m_s: [f64; 3],
}

/// Parse the forces table. The last line must carry at least seven
/// whitespace-separated tokens (time, three forces, three moments); fewer
/// than two lines or a short/unparsable last line yields the zero sample.
pub fn parse_forces_table(content: &str) -> ForcesSample {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 {
        return ForcesSample::default();
    }
    let Some(last) = lines.last() else {
        return ForcesSample::default();
    };
    let tokens: Vec<&str> = last.split_whitespace().collect();
    // Token 0 is the solver time column; six values must follow it.
    if tokens.len() < 7 {
        return ForcesSample::default();
    }

    let mut values = [0.0_f64; 6];
    for (slot, token) in values.iter_mut().zip(tokens.iter().skip(1)) {
        match token.parse::<f64>() {
            Ok(v) => *slot = v,
            Err(_) => return ForcesSample::default(),
        }
    }

    ForcesSample {
        forces_n: [values[0], values[1], values[2]],
        moments_n_m: [values[3], values[4], values[5]],
    }
}

fn pressure_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The numeric pattern deliberately excludes exponent notation; the
    // solver writes these tables in plain decimal.
    RE.get_or_init(|| Regex::new(r"(min|max)\(p\) = ([0-9.-]+)").unwrap())
}

/// Parse the pressure extremum table. A missing match for either bound
/// falls back to standard atmosphere for that bound.
pub fn parse_pressure_table(content: &str) -> PressureSample {
    let mut min_pa = STANDARD_PRESSURE_PA;
    let mut max_pa = STANDARD_PRESSURE_PA;

    for caps in pressure_regex().captures_iter(content) {
        let Ok(value) = caps[2].parse::<f64>() else {
            continue;
        };
        match &caps[1] {
            "min" => min_pa = value,
            _ => max_pa = value,
        }
    }

    PressureSample {
        min_pa,
        max_pa,
        mean_pa: (min_pa + max_pa) / 2.0,
    }
}

fn velocity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(min|max)\(U\.([xyz])\) = ([0-9.-]+)").unwrap())
}

/// Parse the velocity extremum table. Components without a match stay at
/// zero.
pub fn parse_velocity_table(content: &str) -> VelocitySample {
    let mut sample = VelocitySample::default();

    for caps in velocity_regex().captures_iter(content) {
        let Ok(value) = caps[3].parse::<f64>() else {
            continue;
        };
        let axis = match &caps[2] {
            "x" => 0,
            "y" => 1,
            _ => 2,
        };
        match &caps[1] {
            "min" => sample.min_m_s[axis] = value,
            _ => sample.max_m_s[axis] = value,
        }
    }

    for axis in 0..3 {
        sample.mean_m_s[axis] = (sample.min_m_s[axis] + sample.max_m_s[axis]) / 2.0;
    }
    sample
}

/// Read and parse the forces table, defaulting on any I/O failure.
pub fn read_forces_table(path: &Path) -> ForcesSample {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_forces_table(&content),
        Err(err) => {
            debug!(path = %path.display(), %err, "forces table unavailable, using zero default");
            ForcesSample::default()
        }
    }
}

/// Read and parse the pressure extremum table, defaulting on any I/O
/// failure.
pub fn read_pressure_table(path: &Path) -> PressureSample {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_pressure_table(&content),
        Err(err) => {
            debug!(path = %path.display(), %err, "pressure table unavailable, using standard atmosphere");
            PressureSample::default()
        }
    }
}

/// Read and parse the velocity extremum table, defaulting on any I/O
/// failure.
pub fn read_velocity_table(path: &Path) -> VelocitySample {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_velocity_table(&content),
        Err(err) => {
            debug!(path = %path.display(), %err, "velocity table unavailable, using zero default");
            VelocitySample::default()
        }
    }
}
