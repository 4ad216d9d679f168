//! Host-style parameter maps and their validated, typed form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{DrainageError, Result};

use super::descriptor::{names, AlgorithmDescriptor, ParameterKind};
use super::destination::{Destination, TEMPORARY_OUTPUT};
use super::method::CatchmentMethod;

/// Untyped value as supplied by the host (CLI flags, a params file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Null,
    Number(f64),
    Text(String),
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<PathBuf> for ParameterValue {
    fn from(v: PathBuf) -> Self {
        Self::Text(v.to_string_lossy().into_owned())
    }
}

impl From<&Destination> for ParameterValue {
    fn from(v: &Destination) -> Self {
        match v {
            Destination::Temporary => Self::Text(TEMPORARY_OUTPUT.to_string()),
            Destination::Path(p) => Self::from(p.clone()),
        }
    }
}

/// Parameters keyed by name, as the host passes them.
pub type ParameterMap = BTreeMap<String, ParameterValue>;

/// Validated parameters for one drainage run.
#[derive(Debug, Clone, PartialEq)]
pub struct DrainageParameters {
    pub input: PathBuf,
    pub min_slope: f64,
    pub catchment_method: CatchmentMethod,
    pub threshold: f64,
    pub filled: Destination,
    pub flow_dir: Destination,
    pub catchment: Destination,
    pub channels_raster: Destination,
    pub channels_vector: Destination,
}

impl DrainageParameters {
    /// Parameters for `input` with every other value at its default.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            min_slope: super::descriptor::DEFAULT_MIN_SLOPE,
            catchment_method: CatchmentMethod::default(),
            threshold: super::descriptor::DEFAULT_THRESHOLD,
            filled: Destination::Temporary,
            flow_dir: Destination::Temporary,
            catchment: Destination::Temporary,
            channels_raster: Destination::Temporary,
            channels_vector: Destination::Temporary,
        }
    }

    /// Validate a parameter map against the drainage descriptor.
    pub fn from_map(map: &ParameterMap) -> Result<Self> {
        let descriptor = AlgorithmDescriptor::drainage();

        for key in map.keys() {
            if descriptor.parameter(key).is_none() {
                return Err(DrainageError::invalid_parameter(key, "unknown parameter"));
            }
        }

        let mut params = Self::new(PathBuf::new());

        for def in &descriptor.parameters {
            let value = map.get(def.name).filter(|v| **v != ParameterValue::Null);

            match &def.kind {
                ParameterKind::RasterLayer => match value {
                    Some(ParameterValue::Text(s)) if !s.trim().is_empty() => {
                        params.input = PathBuf::from(s.trim());
                    }
                    Some(_) => {
                        return Err(DrainageError::invalid_parameter(
                            def.name,
                            "expected a layer path",
                        ))
                    }
                    None if def.required => {
                        return Err(DrainageError::invalid_parameter(def.name, "required"))
                    }
                    None => {}
                },
                ParameterKind::Number { default, min } => {
                    let n = match value {
                        Some(v) => number_value(def.name, v, *min)?,
                        None => *default,
                    };
                    match def.name {
                        names::MINSLOPE => params.min_slope = n,
                        names::THRESHOLD => params.threshold = n,
                        _ => {}
                    }
                }
                ParameterKind::Enum { default, .. } => {
                    params.catchment_method = match value {
                        Some(v) => enum_value(def.name, v)?,
                        None => CatchmentMethod::from_index(*default).unwrap_or_default(),
                    };
                }
                ParameterKind::RasterDestination | ParameterKind::VectorDestination => {
                    let dest = match value {
                        Some(ParameterValue::Text(s)) => Destination::parse(s),
                        Some(ParameterValue::Number(_)) => {
                            return Err(DrainageError::invalid_parameter(
                                def.name,
                                "expected a destination path",
                            ))
                        }
                        Some(ParameterValue::Null) | None => Destination::Temporary,
                    };
                    *params.destination_mut(def.name) = dest;
                }
            }
        }

        Ok(params)
    }

    /// Back to the host's map form.
    pub fn to_map(&self) -> ParameterMap {
        let mut map = ParameterMap::new();
        map.insert(names::INPUT.into(), self.input.clone().into());
        map.insert(names::MINSLOPE.into(), self.min_slope.into());
        map.insert(
            names::CATCHMENTMETHOD.into(),
            (self.catchment_method.index() as f64).into(),
        );
        map.insert(names::THRESHOLD.into(), self.threshold.into());
        for name in [
            names::FILLED,
            names::FLOWDIR,
            names::CATCHMENT,
            names::CHANNELSRAST,
            names::CHANNELSVECT,
        ] {
            if let Some(dest) = self.destination(name) {
                map.insert(name.into(), dest.into());
            }
        }
        map
    }

    /// Destination for a named output.
    pub fn destination(&self, name: &str) -> Option<&Destination> {
        match name {
            names::FILLED => Some(&self.filled),
            names::FLOWDIR => Some(&self.flow_dir),
            names::CATCHMENT => Some(&self.catchment),
            names::CHANNELSRAST => Some(&self.channels_raster),
            names::CHANNELSVECT => Some(&self.channels_vector),
            _ => None,
        }
    }

    fn destination_mut(&mut self, name: &str) -> &mut Destination {
        match name {
            names::FILLED => &mut self.filled,
            names::FLOWDIR => &mut self.flow_dir,
            names::CATCHMENT => &mut self.catchment,
            names::CHANNELSRAST => &mut self.channels_raster,
            _ => &mut self.channels_vector,
        }
    }
}

fn number_value(name: &str, value: &ParameterValue, min: Option<f64>) -> Result<f64> {
    let n = match value {
        ParameterValue::Number(n) => *n,
        ParameterValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| DrainageError::invalid_parameter(name, format!("not a number: {}", s)))?,
        ParameterValue::Null => {
            return Err(DrainageError::invalid_parameter(name, "missing value"))
        }
    };

    if !n.is_finite() {
        return Err(DrainageError::invalid_parameter(name, "must be finite"));
    }
    if let Some(min) = min {
        if n < min {
            return Err(DrainageError::invalid_parameter(
                name,
                format!("must be at least {}", min),
            ));
        }
    }
    Ok(n)
}

fn enum_value(name: &str, value: &ParameterValue) -> Result<CatchmentMethod> {
    match value {
        ParameterValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => {
            CatchmentMethod::from_index(*n as usize).ok_or_else(|| {
                DrainageError::invalid_parameter(name, format!("option {} out of range", n))
            })
        }
        ParameterValue::Text(s) => s
            .parse()
            .map_err(|e: String| DrainageError::invalid_parameter(name, e)),
        _ => Err(DrainageError::invalid_parameter(
            name,
            "expected an option index or name",
        )),
    }
}
