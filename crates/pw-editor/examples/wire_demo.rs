//! Headless walkthrough: wire a dashboard widget to a robot arm.
//!
//! Run with `RUST_LOG=debug` to watch the gesture and mutator log.

use pw_core::*;
use pw_editor::*;

fn main() {
    env_logger::init();

    let mut widgets = EndpointTree::new("/dashboard");
    widgets
        .add_top_level(Endpoint::group("/dashboard/plot", InterfaceKind::Generic))
        .unwrap();
    for leaf in ["x", "y"] {
        widgets
            .add_endpoint(
                EndpointId::intern("/dashboard/plot"),
                Endpoint::port(
                    &format!("/dashboard/plot/{leaf}"),
                    Port::new(Direction::Input, Ownership::Widget, "f64"),
                ),
            )
            .unwrap();
    }

    let mut robot = EndpointTree::new("/arm");
    robot
        .add_top_level(Endpoint::group("/arm/joint", InterfaceKind::Sensor))
        .unwrap();
    for (leaf, ty) in [("angle", "f32"), ("torque", "f64")] {
        robot
            .add_endpoint(
                EndpointId::intern("/arm/joint"),
                Endpoint::port(
                    &format!("/arm/joint/{leaf}"),
                    Port::new(Direction::Output, Ownership::Remote, ty),
                ),
            )
            .unwrap();
    }

    let oracle = PortOracle::new().with_conversion("f32", "f64", Rating::ImplicitConversion);
    let mut engine = ConnectionEngine::new(
        Pane::new(
            Side::Source,
            widgets,
            PaneLayout::new(ResolvedBounds::new(0.0, 0.0, 200.0, 300.0)),
        ),
        Pane::new(
            Side::Target,
            robot,
            PaneLayout::new(ResolvedBounds::new(320.0, 0.0, 200.0, 300.0)),
        ),
        oracle,
        LinkTable::new(),
        EngineConfig::default(),
    );
    engine.set_on_connect_committed(|selection, partners| {
        for (s, p) in selection.iter().zip(partners) {
            println!("connected {s} <- {p}");
        }
    });

    // Click "x", ctrl-click "y", drag onto "angle" and drop.
    engine.handle_event(&InputEvent::from_pointer_down(40.0, 27.0, 0.0));
    engine.handle_event(&InputEvent::from_pointer_up(40.0, 27.0));
    engine.handle_event(&InputEvent::PointerDown {
        x: 40.0,
        y: 45.0,
        button: MouseButton::Primary,
        modifiers: Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        },
        time_ms: 500.0,
    });
    engine.handle_event(&InputEvent::from_pointer_move(360.0, 27.0));
    println!("preview rating: {:?}", engine.gesture().live().worst_rating);
    engine.handle_event(&InputEvent::from_pointer_up(360.0, 27.0));

    println!("network: {:?}", engine.network().links());
    if let Some(desc) = engine.undo() {
        println!("undid {desc:?}, network now has {} links", engine.network().len());
    }
}
