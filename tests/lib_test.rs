//! Library integration tests.

use drainage::DrainageError;

#[test]
fn error_types_are_public() {
    let err = DrainageError::UnknownTool {
        id: "saga:slope".into(),
    };
    assert!(err.to_string().contains("saga:slope"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> drainage::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use drainage::cli::{Cli, Commands};

    let cli = Cli::parse_from(["drainage", "describe", "--json"]);
    match cli.command {
        Commands::Describe(args) => assert!(args.json),
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn descriptor_declares_identity() {
    use drainage::algorithm::AlgorithmDescriptor;

    let descriptor = AlgorithmDescriptor::drainage();
    assert_eq!(descriptor.name, "drainagealg");
    assert_eq!(descriptor.label, "Compute drainage from DEM (alg)");
    assert_eq!(descriptor.group, "myscripts");
    assert_eq!(descriptor.group_label, "My scripts");
}

#[test]
fn outputs_mirror_destination_parameters() {
    use drainage::algorithm::{AlgorithmDescriptor, LayerKind};

    let descriptor = AlgorithmDescriptor::drainage();
    let outputs: Vec<_> = descriptor
        .outputs()
        .into_iter()
        .map(|o| (o.name, o.kind))
        .collect();
    assert_eq!(
        outputs,
        vec![
            ("FILLED", LayerKind::Raster),
            ("FLOWDIR", LayerKind::Raster),
            ("CATCHMENT", LayerKind::Raster),
            ("CHANNELSRAST", LayerKind::Raster),
            ("CHANNELSVECT", LayerKind::Vector),
        ]
    );
}

#[test]
fn parameter_maps_validate() {
    use drainage::algorithm::{Destination, DrainageParameters, ParameterMap, ParameterValue};

    let mut map = ParameterMap::new();
    map.insert("INPUT".into(), ParameterValue::Text("dem.sdat".into()));
    map.insert("THRESHOLD".into(), ParameterValue::Text("2500".into()));
    map.insert(
        "CHANNELSVECT".into(),
        ParameterValue::Text("TEMPORARY_OUTPUT".into()),
    );
    map.insert("FILLED".into(), ParameterValue::Text("filled.sdat".into()));

    let params = DrainageParameters::from_map(&map).unwrap();
    assert_eq!(params.threshold, 2500.0);
    assert_eq!(params.min_slope, 0.01);
    assert_eq!(params.channels_vector, Destination::Temporary);
    assert_eq!(params.filled, Destination::Path("filled.sdat".into()));

    map.insert("EXTRA".into(), ParameterValue::Null);
    assert!(DrainageParameters::from_map(&map).is_err());
}
