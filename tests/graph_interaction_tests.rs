use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use graph_rs::api::{Graph, GraphConfig};
use graph_rs::content::{ContentBase, LineContent, LineInput, PairedContent, ValueInput};
use graph_rs::core::XCoord;
use graph_rs::error::ErrorKind;
use graph_rs::extensions::{GraphEvent, GraphListener, ListenerContext};
use graph_rs::render::NullRenderer;

#[derive(Clone, Default)]
struct Recorder {
    id: String,
    events: Rc<RefCell<Vec<GraphEvent>>>,
}

impl Recorder {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            events: Rc::default(),
        }
    }
}

impl GraphListener for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &GraphEvent, _context: ListenerContext) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn graph() -> Graph<NullRenderer> {
    let config = GraphConfig::numeric("#g", (0.0, 10.0), (0.0, 100.0));
    let mut graph = Graph::new(NullRenderer::default());
    graph.generate(&config, 800.0).expect("generate");
    graph
}

fn line(key: &str, clickable: bool) -> LineContent {
    LineContent::new(LineInput::new(
        ContentBase::new(key, key).clickable(clickable),
        vec![ValueInput::new(1.0, 20.0), ValueInput::new(2.0, 60.0)],
    ))
    .expect("valid line")
}

#[test]
fn legend_click_toggles_target_and_defers_marks() {
    let mut graph = graph();
    graph.load_content(line("a", false)).expect("load");
    let container = graph.content_container().expect("container");

    assert!(!graph.legend_click("a").expect("hide"));
    assert!(!graph.shown_targets().expect("shown").contains("a"));
    let scene = graph.scene().expect("scene");
    let legend_node = graph.legend().expect("legend").node("a").expect("legend node");
    assert_eq!(scene.attr(legend_node, "aria-selected"), Some("false"));
    assert!(graph.scheduler().expect("scheduler").redraw_pending());

    let work = graph.tick(Duration::ZERO).expect("tick");
    assert!(work.redraw);
    let scene = graph.scene().expect("scene");
    let group = scene.child_by_key(container, "a").expect("group");
    assert_eq!(scene.attr(group, "aria-hidden"), Some("true"));

    assert!(graph.legend_click("a").expect("show"));
    graph.tick(Duration::ZERO).expect("tick");
    let scene = graph.scene().expect("scene");
    let group = scene.child_by_key(container, "a").expect("group");
    assert_eq!(scene.attr(group, "aria-hidden"), Some("false"));
}

#[test]
fn legend_click_on_unknown_target_fails() {
    let mut graph = graph();
    let err = graph.legend_click("missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidObjectProvided);
}

#[test]
fn empty_content_has_a_disabled_legend_item() {
    let mut graph = graph();
    let empty = LineContent::new(LineInput::new(ContentBase::new("empty", "Empty"), Vec::new()))
        .expect("valid line");
    graph.load_content(empty).expect("load");
    assert!(graph.legend().expect("legend").item("empty").expect("item").disabled);
    assert!(!graph.shown_targets().expect("shown").contains("empty"));
    assert!(!graph.legend_click("empty").expect("click"));
    assert!(!graph.shown_targets().expect("shown").contains("empty"));
}

#[test]
fn window_resize_bursts_collapse_into_one_resize() {
    let mut graph = graph();
    graph.load_content(line("a", false)).expect("load");
    let recorder = Recorder::new("recorder");
    let events = Rc::clone(&recorder.events);
    graph.register_listener(Box::new(recorder)).expect("register");

    graph.on_window_resize(600.0, Duration::from_millis(0)).expect("resize");
    graph.on_window_resize(500.0, Duration::from_millis(4)).expect("resize");
    graph.on_window_resize(450.0, Duration::from_millis(9)).expect("resize");

    assert!(graph.tick(Duration::from_millis(10)).expect("tick").is_empty());
    assert_eq!(graph.layout().expect("layout").width, 800.0);

    let work = graph.tick(Duration::from_millis(16)).expect("tick");
    assert_eq!(work.resize, Some(450.0));
    assert_eq!(graph.layout().expect("layout").width, 450.0);

    let resized: Vec<f64> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            GraphEvent::Resized { width } => Some(*width),
            _ => None,
        })
        .collect();
    assert_eq!(resized, vec![450.0]);
}

#[test]
fn destroy_cancels_pending_work_and_notifies_listeners() {
    let mut graph = graph();
    let recorder = Recorder::new("recorder");
    let events = Rc::clone(&recorder.events);
    graph.register_listener(Box::new(recorder)).expect("register");
    graph.on_window_resize(300.0, Duration::ZERO).expect("resize");

    assert!(graph.destroy());
    assert_eq!(events.borrow().last(), Some(&GraphEvent::Destroyed));
    assert_eq!(graph.listener_count(), 0);
    let err = graph.tick(Duration::from_secs(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GraphNotGenerated);
}

#[test]
fn listeners_receive_lifecycle_events_in_order() {
    let mut graph = Graph::new(NullRenderer::default());
    let recorder = Recorder::new("recorder");
    let events = Rc::clone(&recorder.events);
    graph.register_listener(Box::new(recorder)).expect("register");

    let config = GraphConfig::numeric("#g", (0.0, 10.0), (0.0, 100.0));
    graph.generate(&config, 800.0).expect("generate");
    let id = graph.load_content(line("a", false)).expect("load");
    graph.unload_content(id).expect("unload");

    let events = events.borrow();
    assert_eq!(events[0], GraphEvent::Generated);
    assert_eq!(
        events[1],
        GraphEvent::ContentLoaded {
            id,
            key: "a".to_owned()
        }
    );
    assert_eq!(
        events[2],
        GraphEvent::ContentUnloaded {
            id,
            key: "a".to_owned()
        }
    );
}

#[test]
fn listener_ids_must_be_unique() {
    let mut graph = graph();
    graph
        .register_listener(Box::new(Recorder::new("one")))
        .expect("register");
    let err = graph
        .register_listener(Box::new(Recorder::new("one")))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err = graph
        .register_listener(Box::new(Recorder::new("")))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert!(graph.has_listener("one"));
    assert!(graph.unregister_listener("one"));
    assert!(!graph.unregister_listener("one"));
}

#[test]
fn point_clicks_reach_listeners_only_for_clickable_contents() {
    let mut graph = graph();
    let clickable = graph.load_content(line("a", true)).expect("load a");
    let passive = graph.load_content(line("b", false)).expect("load b");
    let recorder = Recorder::new("recorder");
    let events = Rc::clone(&recorder.events);
    graph.register_listener(Box::new(recorder)).expect("register");

    assert!(graph.click_point(clickable, "a", 1).expect("click"));
    assert!(!graph.click_point(passive, "b", 0).expect("click"));
    let err = graph.click_point(clickable, "a", 7).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidObjectProvided);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        GraphEvent::PointClicked {
            id: clickable,
            key: "a".to_owned(),
            position: 1,
            x: XCoord::Continuous(2.0),
            y: 60.0,
        }
    );
}

#[test]
fn click_pass_through_dispatches_every_point() {
    let mut config = GraphConfig::numeric("#g", (0.0, 10.0), (0.0, 100.0));
    config.click_pass_through = true;
    let mut graph = Graph::new(NullRenderer::default());
    graph.generate(&config, 800.0).expect("generate");
    let passive = graph.load_content(line("b", false)).expect("load");
    assert!(graph.click_point(passive, "b", 0).expect("click"));
}

#[test]
fn failed_throttled_resize_keeps_the_previous_width() {
    let mut graph = graph();
    graph.load_content(line("a", false)).expect("load");
    graph.on_window_resize(0.0, Duration::ZERO).expect("schedule");

    let err = graph.tick(Duration::from_millis(16)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCanvas);
    assert_eq!(graph.layout().expect("layout").width, 800.0);

    graph.resize().expect("resize with the previous width");
    assert_eq!(graph.layout().expect("layout").width, 800.0);
}

#[test]
fn paired_clicks_reach_the_clicked_subtype() {
    let mut graph = graph();
    let paired = PairedContent::from_json_str(
        r#"{
            "key": "bp",
            "label": {"display": "Blood pressure"},
            "onClick": true,
            "values": [
                {"high": {"x": 1, "y": 80}, "mid": {"x": 1, "y": 60}, "low": {"x": 1, "y": 40}}
            ]
        }"#,
    )
    .expect("paired");
    let id = graph.load_content(paired).expect("load");
    let recorder = Recorder::new("recorder");
    let events = Rc::clone(&recorder.events);
    graph.register_listener(Box::new(recorder)).expect("register");

    assert!(graph.click_point(id, "bp_low", 0).expect("click low"));
    assert!(graph.click_point(id, "bp_mid", 0).expect("click mid"));
    let err = graph.click_point(id, "bp", 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidObjectProvided);

    let clicked: Vec<(String, f64)> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            GraphEvent::PointClicked { key, y, .. } => Some((key.clone(), *y)),
            _ => None,
        })
        .collect();
    assert_eq!(
        clicked,
        vec![("bp_low".to_owned(), 40.0), ("bp_mid".to_owned(), 60.0)]
    );
}
