use approx::assert_relative_eq;
use graph_rs::api::{ContentKind, Graph, GraphConfig, GraphContent};
use graph_rs::content::{
    BarContent, BarInput, BarValueInput, Content, ContentBase, LineContent, PairedContent,
    PairedSubtype,
};
use graph_rs::core::{AxisId, Shape, XCoord};
use graph_rs::error::ErrorKind;
use graph_rs::render::NullRenderer;

fn ordinal_graph(info_row: bool) -> Graph<NullRenderer> {
    let config = GraphConfig::from_json_value(serde_json::json!({
        "bindTo": "#ordinal",
        "axis": {
            "x": {"type": "ORDINAL", "categories": ["mon", "tue", "wed"], "infoRow": info_row},
            "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
        }
    }))
    .expect("config");
    let mut graph = Graph::new(NullRenderer::default());
    graph.generate(&config, 600.0).expect("generate");
    graph
}

fn numeric_graph() -> Graph<NullRenderer> {
    let config = GraphConfig::numeric("#g", (0.0, 10.0), (0.0, 100.0));
    let mut graph = Graph::new(NullRenderer::default());
    graph.generate(&config, 800.0).expect("generate");
    graph
}

fn paired() -> PairedContent {
    PairedContent::from_json_str(
        r#"{
            "key": "bp",
            "label": {"display": "Blood pressure"},
            "values": [
                {"high": {"x": 1, "y": 120}, "low": {"x": 1, "y": 80}},
                {"high": {"x": 2, "y": 130}, "mid": {"x": 2, "y": 100}, "low": {"x": 2, "y": 85}}
            ],
            "regions": {"high": [{"start": 110, "end": 140}]}
        }"#,
    )
    .expect("paired")
}

#[test]
fn ordinal_bars_share_each_band() {
    let mut graph = ordinal_graph(false);
    let first = BarContent::new(BarInput::new(
        ContentBase::new("first", "First"),
        vec![BarValueInput::new("mon", 4.0), BarValueInput::new("wed", 6.0)],
    ))
    .expect("bars");
    let second = BarContent::new(BarInput::new(
        ContentBase::new("second", "Second"),
        vec![BarValueInput::new("mon", 2.0)],
    ))
    .expect("bars");
    graph.load_content(first).expect("load first");
    graph.load_content(second).expect("load second");

    let scene = graph.scene().expect("scene");
    let container = graph.content_container().expect("container");
    let rect_x = |key: &str| {
        let group = scene.child_by_key(container, key).expect("group");
        let rect = scene.children(group)[0];
        let x: f64 = scene.attr(rect, "x").expect("x").parse().expect("number");
        let width: f64 = scene.attr(rect, "width").expect("width").parse().expect("number");
        (x, width)
    };
    let (first_x, first_width) = rect_x("first");
    let (second_x, second_width) = rect_x("second");
    assert_relative_eq!(first_width, second_width, epsilon = 1e-6);
    assert_relative_eq!(second_x - first_x, first_width, epsilon = 1e-2);
}

#[test]
fn unknown_category_is_rejected() {
    let mut graph = ordinal_graph(false);
    let bars = BarContent::new(BarInput::new(
        ContentBase::new("bars", "Bars"),
        vec![BarValueInput::new("sun", 4.0)],
    ))
    .expect("bars");
    let err = graph.load_content(bars).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(graph.content_count(), 0);
}

#[test]
fn info_row_text_needs_an_enabled_row() {
    let bars = || {
        BarContent::new(BarInput::new(
            ContentBase::new("bars", "Bars"),
            vec![BarValueInput::new("tue", 4.0).with_info("peak")],
        ))
        .expect("bars")
    };

    let mut disabled = ordinal_graph(false);
    let err = disabled.load_content(bars()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let mut enabled = ordinal_graph(true);
    let id = enabled.load_content(bars()).expect("load");
    assert_eq!(enabled.info_row().expect("info row").len(), 1);
    enabled.unload_content(id).expect("unload");
    assert!(enabled.info_row().expect("info row").is_empty());
}

#[test]
fn paired_content_registers_one_target_per_subtype() {
    let mut graph = numeric_graph();
    let content = paired();
    assert_eq!(
        content.targets().collect::<Vec<_>>(),
        vec!["bp_high", "bp_mid", "bp_low"]
    );
    let id = graph.load_content(content).expect("load");

    let legend = graph.legend().expect("legend");
    let high = legend.item("bp_high").expect("high item");
    assert_eq!(high.label, "Blood pressure High");
    assert_eq!(high.shape, Shape::Triangle);
    assert_eq!(legend.item("bp_low").expect("low").shape, Shape::Diamond);
    assert_eq!(legend.item("bp_mid").expect("mid").shape, Shape::Circle);

    let shown = graph.shown_targets().expect("shown");
    assert_eq!(shown.len(), 3);
    assert_eq!(shown.owner_count(), 1);

    let regions = graph.regions().expect("regions").states();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].aria_key, "region_bp_high");
    assert!(!regions[0].visibility.is_hidden());

    let content = graph.content(id).expect("content");
    assert_eq!(content.kind(), ContentKind::Paired);
    assert_eq!(content.data_target().len(), 5);
}

#[test]
fn paired_entry_without_readings_is_rejected() {
    let err = PairedContent::from_json_str(
        r#"{"key": "bp", "label": {"display": "BP"}, "values": [{}]}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoDataPoints);
}

#[test]
fn paired_subtype_targets_follow_key() {
    assert_eq!(PairedSubtype::Mid.target("bp"), "bp_mid");
    assert_eq!(PairedSubtype::High.default_shape(), Shape::Triangle);
}

#[test]
fn content_input_accepts_snake_case_aliases() {
    let content = LineContent::from_json_str(
        r#"{
            "key": "a",
            "label": {"display": "A"},
            "y_axis": "y2",
            "on_click": true,
            "values": [{"x": 1, "y": 2}]
        }"#,
    )
    .expect("line");
    assert_eq!(content.y_axis(), AxisId::Y2);
    assert!(content.clickable());

    let bars = BarContent::from_json_str(
        r#"{
            "key": "b",
            "label": {"display": "B"},
            "values": [{"x": "mon", "y": 2, "axis_info_row": "note"}]
        }"#,
    )
    .expect("bars");
    assert_eq!(bars.kind(), ContentKind::Bar);
}

#[test]
fn missing_label_is_rejected() {
    let err = LineContent::from_json_str(r#"{"key": "a", "values": []}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UniqueLabelNotProvided);
}

#[test]
fn unsorted_numeric_input_is_drawn_in_x_order() {
    let mut graph = numeric_graph();
    let content = LineContent::from_json_str(
        r#"{
            "key": "a",
            "label": {"display": "A"},
            "values": [{"x": 3, "y": 1}, {"x": 1, "y": 2}, {"x": 2, "y": 3}]
        }"#,
    )
    .expect("line");
    let id = graph.load_content(Content::from(content)).expect("load");
    let xs: Vec<XCoord> = graph
        .content(id)
        .expect("content")
        .data_target()
        .iter()
        .map(|point| point.x.clone())
        .collect();
    assert_eq!(
        xs,
        vec![
            XCoord::Continuous(1.0),
            XCoord::Continuous(2.0),
            XCoord::Continuous(3.0)
        ]
    );
}
