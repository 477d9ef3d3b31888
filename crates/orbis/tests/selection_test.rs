//! Click and selection scenarios driven through the public view API.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use orbis::*;
use proptest::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

struct NullTarget;

impl RenderTarget for NullTarget {
    fn render(&mut self, _frame: &FrameState<'_>) {}
}

fn country(id: &str, lat: f32, lon: f32) -> CountryInfo {
    CountryInfo::new(id, id).with_center(GeoCoord::new(lat, lon))
}

/// Two triangles covering a small lat/lon square just above the globe.
fn patch(info: CountryInfo, lat: f32, lon: f32, half: f32) -> SurfacePart {
    let r = GLOBE_RADIUS + 0.008;
    let a = project(lat - half, lon - half, r);
    let b = project(lat - half, lon + half, r);
    let c = project(lat + half, lon + half, r);
    let d = project(lat + half, lon - half, r);
    SurfacePart::new(info, vec![[a, b, c], [a, c, d]]).unwrap()
}

type Events = Rc<RefCell<Vec<SelectionEvent>>>;

fn build(options: Options, markers: Vec<Marker>, surfaces: Vec<SurfacePart>) -> (GlobeView, Events) {
    let events: Events = Rc::default();
    let sink = Rc::clone(&events);
    let view = GlobeView::new(
        options,
        Viewport::new(800.0, 600.0),
        markers,
        surfaces,
        move |event| sink.borrow_mut().push(event),
    )
    .unwrap();
    (view, events)
}

fn europe() -> (GlobeView, Events) {
    let mut options = Options::default();
    options.scene.center_on = Some("ESP".into());
    let markers = vec![
        Marker::new(country("ESP", 40.0, -4.0), GLOBE_RADIUS).unwrap(),
        Marker::new(country("FRA", 46.0, 2.0), GLOBE_RADIUS).unwrap(),
        Marker::new(country("ITA", 42.8, 12.8), GLOBE_RADIUS).unwrap(),
    ];
    let surfaces = vec![
        patch(CountryInfo::new("FRA", "France"), 46.0, 2.0, 3.0),
        patch(CountryInfo::new("DEU", "Germany"), 51.0, 10.0, 2.0),
    ];
    build(options, markers, surfaces)
}

fn americas() -> (GlobeView, Events) {
    let surfaces = vec![
        patch(CountryInfo::new("USA", "United States"), 39.0, -98.0, 4.0),
        patch(CountryInfo::new("CAN", "Canada"), 56.0, -106.0, 4.0),
        patch(CountryInfo::new("USA", "United States"), 18.0, -66.0, 1.0),
    ];
    build(Options::default(), vec![], surfaces)
}

fn ndc_of(view: &GlobeView, point: Vec3) -> Vec2 {
    let clip = view.camera().view_projection_matrix() * point.extend(1.0);
    Vec2::new(clip.x / clip.w, clip.y / clip.w)
}

fn screen_of(view: &GlobeView, point: Vec3) -> Vec2 {
    let ndc = ndc_of(view, point);
    let viewport = view.controls().viewport();
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width,
        (1.0 - ndc.y) * 0.5 * viewport.height,
    )
}

fn settle(view: &mut GlobeView) {
    for _ in 0..60 {
        view.frame(FRAME, &mut NullTarget).unwrap();
    }
}

#[test]
fn test_center_on_preselects_without_callback() {
    let (view, events) = europe();
    assert_eq!(view.selection().selected_identifier(), Some("ESP"));
    assert_eq!(view.selection().phase(), SelectionPhase::MarkerSelected);
    assert!(events.borrow().is_empty());

    let facing = view.camera().position.normalize();
    assert!((facing - project(40.0, -4.0, 1.0)).length() < 1e-5);
    assert!((view.camera().position.length() - 1.66).abs() < 1e-5);
}

#[test]
fn test_click_marker_frames_country() {
    let (mut view, events) = europe();
    let distance = view.camera().position.length();
    let fra = view.selector().markers()[1].anchor();

    let outcome = view.click_ndc(ndc_of(&view, fra)).unwrap();
    assert_eq!(outcome, ClickOutcome::Selected(PickTarget::Marker(1)));
    assert_eq!(view.selection().selected_identifier(), Some("FRA"));
    assert_eq!(view.selection().selected_marker(), Some(1));
    assert_eq!(view.selection().selected_surfaces(), &[0]);

    let scene = SceneOptions::default();
    assert_eq!(view.selector().markers()[0].color(), scene.marker_color);
    assert_eq!(view.selector().markers()[1].color(), scene.marker_selected_color);
    assert_eq!(view.selector().surfaces()[0].opacity(), scene.surface_selected_opacity);

    {
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], SelectionEvent::Selected(country("FRA", 46.0, 2.0)));
    }

    settle(&mut view);
    let position = view.camera().position;
    assert!((position.length() - distance).abs() < 1e-4);
    assert!((position.normalize() - project(46.0, 2.0, 1.0)).length() < 1e-4);
    assert!(!view.animator().is_animating());
}

#[test]
fn test_marker_wins_over_surface() {
    let (mut view, _) = europe();
    // The FRA marker stands inside the FRA surface patch; both are under the pointer
    let fra = view.selector().markers()[1].anchor();
    let outcome = view.click_ndc(ndc_of(&view, fra)).unwrap();
    assert!(matches!(outcome, ClickOutcome::Selected(PickTarget::Marker(_))));
}

#[test]
fn test_surface_parts_selected_together() {
    for (lat, lon) in [(39.0, -98.0), (18.0, -66.0)] {
        let (mut view, events) = americas();
        let target = project(lat, lon, GLOBE_RADIUS + 0.008);
        let outcome = view.click_ndc(ndc_of(&view, target)).unwrap();

        assert!(matches!(outcome, ClickOutcome::Selected(PickTarget::Surface(_))));
        assert_eq!(view.selection().selected_identifier(), Some("USA"));
        assert_eq!(view.selection().selected_surfaces().len(), 2);
        assert_eq!(view.selection().selected_surfaces(), &[0, 2]);
        assert_eq!(view.selection().phase(), SelectionPhase::SurfaceSelected);
        assert_eq!(view.selector().surfaces()[1].opacity(), 0.0);
        assert_eq!(events.borrow()[0].info().identifier, "USA");
    }
}

#[test]
fn test_click_during_drag_is_ignored() {
    let (mut view, events) = europe();
    let fra = screen_of(&view, view.selector().markers()[1].anchor());

    view.handle_input(&InputEvent::PointerDown {
        button: PointerButton::Primary,
        position: fra,
    });
    view.handle_input(&InputEvent::PointerMove {
        position: fra + Vec2::new(20.0, 0.0),
    });
    view.handle_input(&InputEvent::PointerUp {
        button: PointerButton::Primary,
        position: fra + Vec2::new(20.0, 0.0),
    });
    assert!(view.controls().has_moved());

    assert_eq!(view.click(fra).unwrap(), ClickOutcome::IgnoredDrag);
    assert!(events.borrow().is_empty());
    assert_eq!(view.selection().selected_identifier(), Some("ESP"));

    // The flag clears once the debounce window has passed
    view.frame(FRAME, &mut NullTarget).unwrap();
    assert!(!view.controls().has_moved());
}

#[test]
fn test_touch_drag_then_lift_is_ignored() {
    use winit::dpi::PhysicalPosition;
    use winit::event::TouchPhase;

    let (mut view, events) = europe();
    let fra = screen_of(&view, view.selector().markers()[1].anchor());
    let at = |p: Vec2| PhysicalPosition::new(f64::from(p.x), f64::from(p.y));

    let mut adapter = InputAdapter::new();
    let mut outcomes = Vec::new();
    for (phase, position) in [
        (TouchPhase::Started, fra),
        (TouchPhase::Moved, fra + Vec2::new(15.0, 5.0)),
        (TouchPhase::Ended, fra + Vec2::new(15.0, 5.0)),
    ] {
        for event in adapter.touch(4, phase, at(position)) {
            match event {
                ViewEvent::Input(input) => {
                    view.handle_input(&input);
                }
                ViewEvent::Click(p) => outcomes.push(view.click(p).unwrap()),
            }
        }
    }

    // The lift still reads as a tap, but the finger travelled
    assert_eq!(outcomes, vec![ClickOutcome::IgnoredDrag]);
    assert!(events.borrow().is_empty());
    assert_eq!(view.selection().selected_identifier(), Some("ESP"));
}

#[test]
fn test_touch_tap_selects() {
    use winit::dpi::PhysicalPosition;
    use winit::event::TouchPhase;

    let (mut view, events) = europe();
    let fra = screen_of(&view, view.selector().markers()[1].anchor());
    let at = PhysicalPosition::new(f64::from(fra.x), f64::from(fra.y));

    let mut adapter = InputAdapter::new();
    let mut outcomes = Vec::new();
    for phase in [TouchPhase::Started, TouchPhase::Ended] {
        for event in adapter.touch(9, phase, at) {
            match event {
                ViewEvent::Input(input) => {
                    view.handle_input(&input);
                }
                ViewEvent::Click(p) => outcomes.push(view.click(p).unwrap()),
            }
        }
    }

    assert_eq!(outcomes, vec![ClickOutcome::Selected(PickTarget::Marker(1))]);
    assert_eq!(events.borrow()[0].info().identifier, "FRA");
}

#[test]
fn test_click_empty_space_unselects() {
    let (mut view, events) = europe();
    // Far corner of the screen, past the globe and the secondary body
    let outcome = view.click_ndc(Vec2::new(0.95, -0.95)).unwrap();
    assert_eq!(outcome, ClickOutcome::Unselected);
    assert!(view.selection().is_empty());
    assert_eq!(events.borrow().as_slice(), &[SelectionEvent::Unselected]);
    assert_eq!(events.borrow()[0].info(), CountryInfo::default());
}

#[test]
fn test_click_globe_stops_auto_rotation() {
    let (mut view, _) = americas();
    view.toggle_auto_rotate().unwrap();
    // South Pacific, away from every patch
    let ocean = project(-40.0, -100.0, GLOBE_RADIUS);
    let outcome = view.click_ndc(ndc_of(&view, ocean)).unwrap();
    assert_eq!(outcome, ClickOutcome::Unselected);
    assert!(!view.navigator().is_auto_rotating());
}

#[test]
fn test_click_secondary_body_flies_there() {
    let (mut view, events) = americas();
    let body = view.secondary_body_position().unwrap();
    let outcome = view.click_ndc(ndc_of(&view, body)).unwrap();
    assert_eq!(outcome, ClickOutcome::SecondaryBody);
    assert!(view.navigator().is_locked_on_body());
    assert!(view.navigator().is_auto_rotating());
    assert!(events.borrow()[0].is_unselect());
}

#[test]
fn test_unselect_is_idempotent() {
    let (mut view, _) = europe();
    view.unselect().unwrap();
    let first = view.selection().clone();
    assert!(first.is_empty());
    view.unselect().unwrap();
    assert_eq!(view.selection(), &first);
}

#[test]
fn test_duplicate_markers_rejected() {
    let markers = vec![
        Marker::new(country("FRA", 46.0, 2.0), GLOBE_RADIUS).unwrap(),
        Marker::new(country("FRA", 48.8, 2.3), GLOBE_RADIUS).unwrap(),
    ];
    let result = GlobeView::new(
        Options::default(),
        Viewport::default(),
        markers,
        vec![],
        |_| {},
    );
    assert!(matches!(result, Err(OrbisError::DuplicateMarker(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn selection_stays_mutually_exclusive(
        clicks in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 1..12)
    ) {
        let (mut view, _) = europe();
        for (x, y) in clicks {
            view.click_ndc(Vec2::new(x, y)).unwrap();
            prop_assert!(view.selector().selection_is_consistent());

            let state = view.selection();
            let scene = SceneOptions::default();
            for (i, marker) in view.selector().markers().iter().enumerate() {
                let selected = state.selected_marker() == Some(i);
                prop_assert_eq!(marker.color() == scene.marker_selected_color, selected);
            }
            for (i, part) in view.selector().surfaces().iter().enumerate() {
                let selected = state.selected_surfaces().contains(&i);
                prop_assert_eq!(part.opacity() > 0.0, selected);
            }
        }
    }
}
