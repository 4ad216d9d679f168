//! The drainage algorithm's public face: identity, parameter schema and outputs.
//!
//! - [`descriptor`] declares parameters and outputs
//! - [`parameters`] validates host-style parameter maps into typed values
//! - [`method`] enumerates catchment routing methods
//! - [`destination`] models where outputs are written
//!
//! # Example
//!
//! ```
//! use drainage::algorithm::{DrainageParameters, ParameterMap, ParameterValue};
//!
//! let mut map = ParameterMap::new();
//! map.insert("INPUT".into(), ParameterValue::Text("dem.sdat".into()));
//! map.insert("CATCHMENTMETHOD".into(), ParameterValue::Text("mfd".into()));
//!
//! let params = DrainageParameters::from_map(&map).unwrap();
//! assert_eq!(params.catchment_method.index(), 4);
//! assert_eq!(params.threshold, 1000.0);
//! ```

pub mod descriptor;
pub mod destination;
pub mod method;
pub mod parameters;

pub use descriptor::{
    names, AlgorithmDescriptor, OutputDefinition, ParameterDefinition, ParameterKind,
    DEFAULT_MIN_SLOPE, DEFAULT_THRESHOLD,
};
pub use destination::{Destination, LayerKind, TEMPORARY_OUTPUT};
pub use method::CatchmentMethod;
pub use parameters::{DrainageParameters, ParameterMap, ParameterValue};
