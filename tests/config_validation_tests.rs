use graph_rs::api::{Graph, GraphConfig, TRACK_HEIGHT};
use graph_rs::error::{ErrorKind, GraphError};
use graph_rs::render::NullRenderer;
use serde_json::json;

fn generate(value: serde_json::Value) -> Result<Graph<NullRenderer>, GraphError> {
    let config = GraphConfig::from_json_value(value)?;
    let mut graph = Graph::new(NullRenderer::default());
    graph.generate(&config, 800.0)?;
    Ok(graph)
}

fn kind(value: serde_json::Value) -> ErrorKind {
    match generate(value) {
        Ok(_) => panic!("expected a validation error"),
        Err(err) => err.kind(),
    }
}

#[test]
fn snake_case_config_keys_are_accepted() {
    let graph = generate(json!({
        "bind_to": "#g",
        "show_legend": false,
        "axis": {
            "x": {"domain": {"lower_limit": 0, "upper_limit": 10}},
            "y": {"domain": {"lower_limit": 0, "upper_limit": 5}, "allow_calibration": false}
        }
    }))
    .expect("generate");
    assert!(graph.legend().expect("legend").root().is_none());
    assert!(!graph.settings().expect("settings").y.allow_calibration);
}

#[test]
fn vertical_axes_must_be_numeric() {
    let err = kind(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"domain": {"lowerLimit": 0, "upperLimit": 10}},
            "y": {"type": "TIME_SERIES",
                  "domain": {"lowerLimit": "2024-01-01T00:00:00Z",
                             "upperLimit": "2024-01-02T00:00:00Z"}}
        }
    }));
    assert_eq!(err, ErrorKind::InvalidAxisType);
}

#[test]
fn inverted_domain_is_rejected() {
    let err = kind(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"domain": {"lowerLimit": 10, "upperLimit": 0}},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        }
    }));
    assert_eq!(err, ErrorKind::InvalidInput);
}

#[test]
fn values_and_bucket_ticks_are_exclusive() {
    let err = kind(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"domain": {"lowerLimit": 0, "upperLimit": 10},
                  "ticks": {"values": [0, 5], "midpointTickValues": [2]}},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        }
    }));
    assert_eq!(err, ErrorKind::InvalidTicks);
}

#[test]
fn unknown_tick_format_is_rejected() {
    let err = kind(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"domain": {"lowerLimit": 0, "upperLimit": 10}, "ticks": {"format": "%Q"}},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        }
    }));
    assert_eq!(err, ErrorKind::InvalidFormatType);
}

#[test]
fn info_row_is_only_allowed_on_x() {
    let err = kind(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"domain": {"lowerLimit": 0, "upperLimit": 10}},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}, "infoRow": true}
        }
    }));
    assert_eq!(err, ErrorKind::InvalidInput);
}

#[test]
fn invalid_dateline_timestamp_is_rejected() {
    let err = kind(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"type": "TIME_SERIES",
                  "domain": {"lowerLimit": "2024-01-01T00:00:00Z",
                             "upperLimit": "2024-01-02T00:00:00Z"}},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        },
        "dateline": [{"value": "yesterday"}]
    }));
    assert_eq!(err, ErrorKind::InvalidDateline);
}

#[test]
fn non_positive_host_width_is_an_invalid_canvas() {
    let config = GraphConfig::numeric("#g", (0.0, 1.0), (0.0, 1.0));
    let mut graph = Graph::new(NullRenderer::default());
    let err = graph.generate(&config, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCanvas);
}

#[test]
fn fixed_dimensions_override_the_host() {
    let config = GraphConfig::numeric("#g", (0.0, 1.0), (0.0, 1.0))
        .with_width(500.0)
        .with_height(320.0);
    let mut graph = Graph::new(NullRenderer::default());
    graph.generate(&config, 1200.0).expect("generate");
    let layout = graph.layout().expect("layout");
    assert_eq!(layout.height, 320.0);
    assert_eq!(layout.width, 500.0);
}

#[test]
fn ordinal_axis_without_height_gets_one_track_per_category() {
    let graph = generate(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"type": "ORDINAL", "categories": ["a", "b", "c", "d", "e"]},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        }
    }))
    .expect("generate");
    let layout = graph.layout().expect("layout");
    assert_eq!(layout.plot.height(), 5.0 * TRACK_HEIGHT);

    let taller = generate(json!({
        "bindTo": "#g",
        "axis": {
            "x": {"type": "ORDINAL", "categories": ["a", "b", "c", "d", "e", "f", "g"]},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        }
    }))
    .expect("generate");
    let taller_layout = taller.layout().expect("layout");
    assert_eq!(taller_layout.height - layout.height, 2.0 * TRACK_HEIGHT);
}

#[test]
fn explicit_height_wins_over_track_height() {
    let graph = generate(json!({
        "bindTo": "#g",
        "dimension": {"height": 300},
        "axis": {
            "x": {"type": "ORDINAL", "categories": ["a", "b"]},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        }
    }))
    .expect("generate");
    assert_eq!(graph.layout().expect("layout").height, 300.0);
}
