//! Known SAGA tools and their command-line identities.

use crate::algorithm::LayerKind;

/// Fill Sinks (Wang & Liu).
pub const FILL_SINKS: &str = "saga:fillsinkswangliu";

/// Flow accumulation / catchment area.
pub const CATCHMENT_AREA: &str = "saga:catchmentarea";

/// Channel network extraction.
pub const CHANNEL_NETWORK: &str = "saga:channelnetwork";

/// A tool the SAGA runner can execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    /// Algorithm id used in tool calls.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// SAGA tool library.
    pub library: &'static str,
    /// Index of the tool within its library.
    pub tool: u32,
    /// Declared outputs and their layer kinds.
    pub outputs: &'static [(&'static str, LayerKind)],
}

impl ToolSpec {
    /// Layer kind of a declared output.
    pub fn output_kind(&self, name: &str) -> Option<LayerKind> {
        self.outputs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }
}

/// Every tool this crate delegates to.
pub static TOOLS: &[ToolSpec] = &[
    ToolSpec {
        id: FILL_SINKS,
        name: "Fill Sinks (Wang & Liu)",
        library: "ta_preprocessor",
        tool: 4,
        outputs: &[
            ("FILLED", LayerKind::Raster),
            ("FDIR", LayerKind::Raster),
            ("WSHED", LayerKind::Raster),
        ],
    },
    ToolSpec {
        id: CATCHMENT_AREA,
        name: "Catchment Area",
        library: "ta_hydrology",
        tool: 0,
        outputs: &[("FLOW", LayerKind::Raster)],
    },
    ToolSpec {
        id: CHANNEL_NETWORK,
        name: "Channel Network",
        library: "ta_channels",
        tool: 0,
        outputs: &[
            ("CHNLNTWRK", LayerKind::Raster),
            ("CHNLROUTE", LayerKind::Raster),
            ("SHAPES", LayerKind::Vector),
        ],
    },
];

/// Find a tool by algorithm id.
pub fn lookup(id: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_tools() {
        assert_eq!(lookup(FILL_SINKS).unwrap().library, "ta_preprocessor");
        assert_eq!(lookup(FILL_SINKS).unwrap().tool, 4);
        assert_eq!(lookup(CATCHMENT_AREA).unwrap().library, "ta_hydrology");
        assert_eq!(lookup(CHANNEL_NETWORK).unwrap().library, "ta_channels");
    }

    #[test]
    fn lookup_unknown_tool() {
        assert!(lookup("saga:slope").is_none());
    }

    #[test]
    fn output_kinds() {
        let channels = lookup(CHANNEL_NETWORK).unwrap();
        assert_eq!(channels.output_kind("SHAPES"), Some(LayerKind::Vector));
        assert_eq!(channels.output_kind("CHNLNTWRK"), Some(LayerKind::Raster));
        assert_eq!(channels.output_kind("ELEVATION"), None);
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in TOOLS.iter().enumerate() {
            for b in &TOOLS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
