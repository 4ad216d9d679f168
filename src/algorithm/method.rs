//! Catchment-area routing methods.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flow-routing method used by the catchment-area tool.
///
/// The discriminant is the index the toolbox expects for its `METHOD` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "MethodRepr", into = "String")]
pub enum CatchmentMethod {
    /// Single steepest-descent neighbour.
    #[default]
    Deterministic8 = 0,
    /// Stochastic single-neighbour routing.
    Rho8 = 1,
    /// Braunschweiger Reliefmodell.
    Braunschweiger = 2,
    /// Tarboton's D-infinity.
    DeterministicInfinity = 3,
    /// Freeman/Quinn multiple flow direction.
    MultipleFlowDirection = 4,
    /// Multiple triangular flow direction.
    MultipleTriangularFlowDirection = 5,
}

impl CatchmentMethod {
    /// All methods in index order.
    pub const ALL: [CatchmentMethod; 6] = [
        Self::Deterministic8,
        Self::Rho8,
        Self::Braunschweiger,
        Self::DeterministicInfinity,
        Self::MultipleFlowDirection,
        Self::MultipleTriangularFlowDirection,
    ];

    /// Option labels as presented in the parameter schema.
    pub const OPTION_LABELS: [&'static str; 6] = [
        "[0] Deterministic 8",
        "[1] Rho 8",
        "[2] Braunschweiger Reliefmodell",
        "[3] Deterministic Infinity",
        "[4] Multiple Flow Direction",
        "[5] Multiple Triangular Flow Direction",
    ];

    /// Index passed to the toolbox.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a method by its index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Deterministic8 => "Deterministic 8",
            Self::Rho8 => "Rho 8",
            Self::Braunschweiger => "Braunschweiger Reliefmodell",
            Self::DeterministicInfinity => "Deterministic Infinity",
            Self::MultipleFlowDirection => "Multiple Flow Direction",
            Self::MultipleTriangularFlowDirection => "Multiple Triangular Flow Direction",
        }
    }

    /// Short alias accepted on the command line.
    pub fn alias(self) -> &'static str {
        match self {
            Self::Deterministic8 => "d8",
            Self::Rho8 => "rho8",
            Self::Braunschweiger => "braunschweiger",
            Self::DeterministicInfinity => "dinf",
            Self::MultipleFlowDirection => "mfd",
            Self::MultipleTriangularFlowDirection => "mtfd",
        }
    }
}

impl fmt::Display for CatchmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alias())
    }
}

impl FromStr for CatchmentMethod {
    type Err = String;

    /// Accepts an index (`4`), an alias (`mfd`), a name (`Multiple Flow Direction`)
    /// or a full option label (`[4] Multiple Flow Direction`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(index) = trimmed.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| {
                format!(
                    "catchment method index {} out of range (0-{})",
                    index,
                    Self::ALL.len() - 1
                )
            });
        }

        let lowered = trimmed.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| {
                lowered == m.alias()
                    || lowered == m.name().to_lowercase()
                    || lowered == Self::OPTION_LABELS[m.index()].to_lowercase()
            })
            .ok_or_else(|| format!("unknown catchment method: {}", s))
    }
}

impl From<CatchmentMethod> for String {
    fn from(method: CatchmentMethod) -> Self {
        method.alias().to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MethodRepr {
    Index(u64),
    Name(String),
}

impl TryFrom<MethodRepr> for CatchmentMethod {
    type Error = String;

    fn try_from(repr: MethodRepr) -> Result<Self, Self::Error> {
        match repr {
            MethodRepr::Index(i) => usize::try_from(i)
                .ok()
                .and_then(Self::from_index)
                .ok_or_else(|| format!("catchment method index {} out of range", i)),
            MethodRepr::Name(name) => name.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_option_order() {
        for (i, method) in CatchmentMethod::ALL.iter().enumerate() {
            assert_eq!(method.index(), i);
            assert!(CatchmentMethod::OPTION_LABELS[i].ends_with(method.name()));
        }
    }

    #[test]
    fn default_is_deterministic_8() {
        assert_eq!(CatchmentMethod::default(), CatchmentMethod::Deterministic8);
    }

    #[test]
    fn parses_index_alias_name_and_label() {
        assert_eq!(
            "4".parse::<CatchmentMethod>(),
            Ok(CatchmentMethod::MultipleFlowDirection)
        );
        assert_eq!("dinf".parse(), Ok(CatchmentMethod::DeterministicInfinity));
        assert_eq!("RHO 8".parse(), Ok(CatchmentMethod::Rho8));
        assert_eq!(
            "[2] Braunschweiger Reliefmodell".parse(),
            Ok(CatchmentMethod::Braunschweiger)
        );
    }

    #[test]
    fn rejects_out_of_range_and_unknown() {
        assert!("6".parse::<CatchmentMethod>().is_err());
        assert!("steepest".parse::<CatchmentMethod>().is_err());
    }

    #[test]
    fn deserializes_from_index_or_name() {
        let a: CatchmentMethod = serde_yaml::from_str("5").unwrap();
        let b: CatchmentMethod = serde_yaml::from_str("mfd").unwrap();
        assert_eq!(a, CatchmentMethod::MultipleTriangularFlowDirection);
        assert_eq!(b, CatchmentMethod::MultipleFlowDirection);
        assert!(serde_yaml::from_str::<CatchmentMethod>("9").is_err());
    }

    #[test]
    fn serializes_as_alias() {
        let json = serde_json::to_string(&CatchmentMethod::Rho8).unwrap();
        assert_eq!(json, "\"rho8\"");
    }
}
