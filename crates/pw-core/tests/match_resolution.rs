//! Integration tests: match resolver (pw-core).
//!
//! Exercises the circular, anchor-based assignment against hand-written
//! oracles and against the stock `PortOracle` over real endpoint trees.

use pretty_assertions::assert_eq;
use pw_core::*;
use std::cell::Cell;

fn node(uri: &str) -> Endpoint {
    Endpoint::group(uri, InterfaceKind::Generic)
}

/// Oracle from a list of compatible URI pairs (order-insensitive).
fn table<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&Endpoint, &Endpoint) -> bool + 'a {
    move |a: &Endpoint, b: &Endpoint| {
        pairs.iter().any(|(x, y)| {
            (a.id.as_str() == *x && b.id.as_str() == *y)
                || (a.id.as_str() == *y && b.id.as_str() == *x)
        })
    }
}

fn ids(uris: &[&str]) -> Vec<EndpointId> {
    uris.iter().map(|u| EndpointId::intern(u)).collect()
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn two_selected_wrap_around_past_assigned_partner() {
    let (a, b) = (node("/e1/A"), node("/e1/B"));
    let (p, q, r) = (node("/e1/P"), node("/e1/Q"), node("/e1/R"));
    let oracle = table(&[
        ("/e1/A", "/e1/Q"),
        ("/e1/A", "/e1/R"),
        ("/e1/B", "/e1/Q"),
        ("/e1/B", "/e1/P"),
    ]);

    let m = resolve(Some(&q), &[&a, &b], &[&p, &q, &r], &oracle);

    assert_eq!(m.partners, ids(&["/e1/Q", "/e1/P"]));
    assert_eq!(m.ratings, vec![Rating::NoConversion, Rating::NoConversion]);
    assert_eq!(m.infeasible_reason, None);
}

#[test]
fn no_compatible_partner_anywhere_is_infeasible() {
    let a = node("/e2/A");
    let (p, q) = (node("/e2/P"), node("/e2/Q"));
    let oracle = table(&[]);

    let m = resolve(Some(&p), &[&a], &[&p, &q], &oracle);

    assert!(m.partners.is_empty());
    assert!(m.ratings.is_empty());
    assert!(!m.infeasible_reason.unwrap_or_default().is_empty());
}

#[test]
fn partial_match_is_never_returned() {
    // Both selected endpoints only fit P; one pair would be possible, but
    // wiring half a selection is not allowed.
    let (a, b) = (node("/e3/A"), node("/e3/B"));
    let (p, q) = (node("/e3/P"), node("/e3/Q"));
    let oracle = table(&[("/e3/A", "/e3/P"), ("/e3/B", "/e3/P")]);

    let m = resolve(Some(&p), &[&a, &b], &[&p, &q], &oracle);

    assert!(m.partners.is_empty());
    assert_eq!(m.worst_rating, Rating::Impossible);
    let reason = m.infeasible_reason.unwrap_or_default();
    assert!(reason.contains('B'), "reason should name B: {reason}");
}

// ─── Properties ─────────────────────────────────────────────────────────

/// Deterministic pseudo-random compatibility so every shape gets covered.
fn scrambled(seed: u32) -> impl Fn(&Endpoint, &Endpoint) -> bool {
    move |a: &Endpoint, b: &Endpoint| {
        let h = a
            .id
            .as_str()
            .bytes()
            .chain(b.id.as_str().bytes())
            .fold(seed, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32));
        h % 3 == 0
    }
}

#[test]
fn results_are_all_or_nothing_unique_and_ordered() {
    let selection: Vec<Endpoint> = (0..4).map(|i| node(&format!("/prop/s{i}"))).collect();
    let others: Vec<Endpoint> = (0..7).map(|i| node(&format!("/prop/o{i}"))).collect();
    let sel_refs: Vec<&Endpoint> = selection.iter().collect();
    let other_refs: Vec<&Endpoint> = others.iter().collect();

    for seed in 0..40 {
        let oracle = scrambled(seed);
        for len in 1..=sel_refs.len() {
            let sel = &sel_refs[..len];
            for hovered in &other_refs {
                let m = resolve(Some(*hovered), sel, &other_refs, &oracle);

                // All-or-nothing.
                assert!(m.partners.is_empty() || m.partners.len() == sel.len());
                assert_eq!(m.partners.len(), m.ratings.len());

                // No partner assigned twice.
                for (i, p) in m.partners.iter().enumerate() {
                    assert!(!m.partners[i + 1..].contains(p), "duplicate partner {p}");
                }

                // partners[i] belongs to selection[i].
                for (s, p) in sel.iter().zip(&m.partners) {
                    let partner = others.iter().find(|o| o.id == *p).unwrap();
                    assert!(oracle(*s, partner));
                }
            }
        }
    }
}

#[test]
fn compatibility_checks_are_bounded() {
    let selection: Vec<Endpoint> = (0..3).map(|i| node(&format!("/bound/s{i}"))).collect();
    let others: Vec<Endpoint> = (0..10).map(|i| node(&format!("/bound/o{i}"))).collect();
    let sel_refs: Vec<&Endpoint> = selection.iter().collect();
    let other_refs: Vec<&Endpoint> = others.iter().collect();

    // Only s0 fits anything, so s1 scans a full revolution and gives up.
    let calls = Cell::new(0usize);
    let oracle = |a: &Endpoint, b: &Endpoint| {
        calls.set(calls.get() + 1);
        a.id.as_str() == "/bound/s0" || b.id.as_str() == "/bound/s0"
    };

    let m = resolve(Some(other_refs[4]), &sel_refs, &other_refs, &oracle);

    assert!(!m.is_feasible());
    let gate = sel_refs.len();
    let bound = gate + sel_refs.len() * other_refs.len();
    assert!(calls.get() <= bound, "{} checks > {bound}", calls.get());
}

// ─── Port semantics ─────────────────────────────────────────────────────

fn widget_tree() -> EndpointTree {
    let mut tree = EndpointTree::new("/w");
    for name in ["speed", "heading"] {
        tree.add_top_level(Endpoint::port(
            &format!("/w/{name}"),
            Port::new(Direction::Input, Ownership::Widget, "f64"),
        ))
        .unwrap();
    }
    tree
}

fn remote_tree() -> EndpointTree {
    let mut tree = EndpointTree::new("/r");
    tree.add_top_level(Endpoint::group("/r/drive", InterfaceKind::Sensor))
        .unwrap();
    let drive = EndpointId::intern("/r/drive");
    for (name, ty) in [("odometry", "Pose"), ("velocity", "f64"), ("yaw", "f64")] {
        tree.add_endpoint(
            drive,
            Endpoint::port(
                &format!("/r/drive/{name}"),
                Port::new(Direction::Output, Ownership::Remote, ty),
            ),
        )
        .unwrap();
    }
    tree
}

#[test]
fn port_oracle_pairs_typed_ports_from_hover() {
    let widgets = widget_tree();
    let remote = remote_tree();
    let selection: Vec<&Endpoint> = ids(&["/w/speed", "/w/heading"])
        .into_iter()
        .filter_map(|id| widgets.get(id))
        .collect();
    let visible: Vec<&Endpoint> = remote.endpoints();
    let oracle = PortOracle::new();

    let yaw = remote.get(EndpointId::intern("/r/drive/yaw"));
    let m = resolve(yaw, &selection, &visible, &oracle);
    // Anchored at yaw: speed takes yaw, heading wraps to velocity.
    assert_eq!(m.partners, ids(&["/r/drive/yaw", "/r/drive/velocity"]));

    let targets = reachable(&selection, &visible, &oracle);
    assert_eq!(targets, ids(&["/r/drive/velocity", "/r/drive/yaw"]));
}

#[test]
fn worst_rating_reflects_conversions() {
    let widgets = widget_tree();
    let mut remote = EndpointTree::new("/rc");
    remote
        .add_top_level(Endpoint::port(
            "/rc/raw",
            Port::new(Direction::Output, Ownership::Remote, "f32"),
        ))
        .unwrap();
    remote
        .add_top_level(Endpoint::port(
            "/rc/exact",
            Port::new(Direction::Output, Ownership::Remote, "f64"),
        ))
        .unwrap();
    let oracle = PortOracle::new().with_conversion("f32", "f64", Rating::ImplicitConversion);

    let selection: Vec<&Endpoint> = ids(&["/w/speed", "/w/heading"])
        .into_iter()
        .filter_map(|id| widgets.get(id))
        .collect();
    let visible = remote.endpoints();
    let exact = remote.get(EndpointId::intern("/rc/exact"));
    let m = resolve(exact, &selection, &visible, &oracle);

    assert_eq!(m.partners, ids(&["/rc/exact", "/rc/raw"]));
    assert_eq!(
        m.ratings,
        vec![Rating::NoConversion, Rating::ImplicitConversion]
    );
    assert_eq!(m.worst_rating, Rating::ImplicitConversion);
}
