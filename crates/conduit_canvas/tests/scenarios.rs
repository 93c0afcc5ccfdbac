// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end editing flows against the in-memory host.

use conduit_canvas::{Canvas, CanvasConfig, DropVerdict, LinkKey, PairKey, PortDirection, PortPair};
use conduit_host::{
    EntityKind, EntityRef, InputPortSpec, MemoryHost, OutputPortSpec, PipelineEvent, PipelineHost,
};
use egui::Pos2;

fn pump(host: &mut MemoryHost, canvas: &mut Canvas) {
    loop {
        let events = host.drain_events();
        if events.is_empty() {
            return;
        }
        for event in events {
            canvas.apply_event(host, &event);
        }
    }
}

fn mesh_source(host: &mut MemoryHost, name: &str) -> EntityRef {
    host.add_source(name, vec![OutputPortSpec::new("Output", "mesh")])
}

fn mesh_filter(host: &mut MemoryHost, name: &str) -> EntityRef {
    host.add_filter(
        name,
        vec![InputPortSpec::required("Input", vec!["mesh".into()])],
        vec![OutputPortSpec::new("Output", "mesh")],
    )
}

fn link(source: EntityRef, output: u32, dest: EntityRef, input: u32) -> LinkKey {
    LinkKey {
        pair: PairKey { source, dest },
        ports: PortPair { output, input },
    }
}

/// Build a chain, remove the middle entity, and check every visual trace of
/// it is gone while the rest of the graph survives untouched.
#[test]
fn removing_a_mid_chain_entity_cleans_both_sides() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    let contour = mesh_filter(&mut host, "Contour");
    host.add_connection(reader, 0, clip, 0);
    host.add_connection(clip, 0, contour, 0);
    pump(&mut host, &mut canvas);
    assert_eq!(canvas.connection_count(), 2);

    host.remove_entity(clip);
    pump(&mut host, &mut canvas);

    assert_eq!(canvas.nodes.len(), 2);
    assert_eq!(canvas.connection_count(), 0);
    assert!(!canvas.nodes[&reader].outputs[0].is_connected());
    assert!(!canvas.nodes[&contour].inputs[0].is_connected());
    // The survivors still mirror live entities.
    assert!(canvas.nodes[&reader].entity.is_some());
    assert!(canvas.nodes[&contour].entity.is_some());
}

/// Between the teardown notifications an entity's node stays on the canvas
/// with its entity link severed, and entity-facing queries skip it until the
/// final removal notification lands.
#[test]
fn half_removed_node_stays_inert_until_removal_completes() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    host.add_connection(reader, 0, clip, 0);
    pump(&mut host, &mut canvas);
    canvas.select_only(&mut host, clip);
    pump(&mut host, &mut canvas);
    assert_eq!(canvas.selected_entities(), vec![clip]);

    let clip_input = canvas.nodes[&clip].port_position(PortDirection::Input, 0);
    canvas.apply_event(&mut host, &PipelineEvent::EntityAboutToBeRemoved(clip));

    // The node survives the first notification, but its entity link is gone.
    let node = &canvas.nodes[&clip];
    assert!(node.entity.is_none());
    assert!(node.selected);
    // Selection reporting no longer names the departing entity.
    assert!(canvas.selected_entities().is_empty());
    // Its input port takes no drops while the window is open.
    canvas.start_wire(reader, 0, Pos2::ZERO);
    canvas.move_wire(&host, clip_input);
    assert_eq!(
        canvas.drag.as_ref().map(|d| d.verdict),
        Some(DropVerdict::Neutral)
    );
    canvas.cancel_wire();

    canvas.apply_event(&mut host, &PipelineEvent::EntityRemoved(clip));
    assert!(!canvas.nodes.contains_key(&clip));
    assert_eq!(canvas.connection_count(), 0);
}

/// Replaying the same notifications must not duplicate anything.
#[test]
fn duplicate_events_are_idempotent() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    host.add_connection(reader, 0, clip, 0);
    let events = host.drain_events();
    for event in &events {
        canvas.apply_event(&mut host, event);
    }
    for event in &events {
        canvas.apply_event(&mut host, event);
    }
    assert_eq!(canvas.nodes.len(), 2);
    assert_eq!(canvas.connection_count(), 1);
    assert_eq!(canvas.nodes[&clip].inputs[0].connections.len(), 1);
}

/// A connection notification that arrives before the entities' own add
/// notifications is skipped, and the later notifications converge anyway.
#[test]
fn out_of_order_events_converge() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    host.add_connection(reader, 0, clip, 0);
    let mut events = host.drain_events();
    events.rotate_right(1); // connection notification first
    for event in &events {
        canvas.apply_event(&mut host, event);
    }
    assert_eq!(canvas.nodes.len(), 2);
    // The early connection notification was dropped; one reconcile pass
    // (as any later pair notification would trigger) restores it.
    canvas.reconcile(&host, reader, clip);
    assert_eq!(canvas.connection_count(), 1);
}

/// Re-plugging a wire from one filter to another via drag.
#[test]
fn replug_moves_connection_between_filters() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    let contour = mesh_filter(&mut host, "Contour");
    host.add_connection(reader, 0, clip, 0);
    pump(&mut host, &mut canvas);

    canvas.grab_connection(&mut host, link(reader, 0, clip, 0), Pos2::ZERO);
    let target = canvas.nodes[&contour].port_position(PortDirection::Input, 0);
    canvas.move_wire(&host, target);
    canvas.finish_wire(&mut host, target);
    pump(&mut host, &mut canvas);

    assert_eq!(host.upstream_connections(contour, 0), vec![(reader, 0)]);
    // Clip's emptied required input got a placeholder feed instead.
    let feeds = host.upstream_connections(clip, 0);
    assert_eq!(feeds.len(), 1);
    assert_eq!(host.kind(feeds[0].0), Some(EntityKind::Placeholder));
    // Visually: one real edge, no node for the placeholder.
    assert_eq!(canvas.connection_count(), 1);
    assert_eq!(canvas.nodes.len(), 3);
}

/// Wiring a real source into a placeholder-fed input evicts the placeholder
/// and garbage-collects it.
#[test]
fn real_connection_displaces_placeholder_feed() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    host.add_connection(reader, 0, clip, 0);
    pump(&mut host, &mut canvas);
    canvas.grab_connection(&mut host, link(reader, 0, clip, 0), Pos2::ZERO);
    canvas.cancel_wire();
    pump(&mut host, &mut canvas);
    assert_eq!(
        host.entities()
            .iter()
            .filter(|&&e| host.kind(e) == Some(EntityKind::Placeholder))
            .count(),
        1
    );

    let start = canvas.nodes[&reader].port_position(PortDirection::Output, 0);
    let target = canvas.nodes[&clip].port_position(PortDirection::Input, 0);
    canvas.start_wire(reader, 0, start);
    canvas.finish_wire(&mut host, target);
    pump(&mut host, &mut canvas);

    assert_eq!(host.upstream_connections(clip, 0), vec![(reader, 0)]);
    assert!(host
        .entities()
        .iter()
        .all(|&e| host.kind(e) != Some(EntityKind::Placeholder)));
}

/// Copy a wired pair and paste it twice; each paste yields an independent,
/// internally wired clone at the requested spot.
#[test]
fn paste_twice_yields_independent_clones() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    host.add_connection(reader, 0, clip, 0);
    pump(&mut host, &mut canvas);

    canvas.begin_gesture();
    canvas.select_rect(egui::Rect::EVERYTHING);
    canvas.end_gesture(&mut host);
    let fragment = canvas.copy_selection(&host);

    let first = canvas.paste(&mut host, &fragment, Pos2::new(400.0, 0.0), false);
    let second = canvas.paste(&mut host, &fragment, Pos2::new(800.0, 0.0), false);
    pump(&mut host, &mut canvas);

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(canvas.nodes.len(), 6);
    assert_eq!(host.wire_count(), 3);
    // Clones landed at distinct spots.
    assert_ne!(
        canvas.nodes[&first[0]].position,
        canvas.nodes[&second[0]].position
    );
}

/// Pasting with connections reconnects a wire whose source was outside the
/// copied set; pasting without connections drops it.
#[test]
fn paste_with_connections_resolves_external_source() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    host.add_connection(reader, 0, clip, 0);
    pump(&mut host, &mut canvas);

    // Copy only the filter; its feed arrives from outside the fragment.
    canvas.select_only(&mut host, clip);
    let fragment = canvas.copy_selection(&host);
    assert_eq!(fragment.entities.len(), 1);
    assert!(fragment.wires.iter().any(|w| w.external_source));

    let plain = canvas.paste(&mut host, &fragment, Pos2::new(400.0, 0.0), false);
    pump(&mut host, &mut canvas);
    assert_eq!(host.upstream_connections(plain[0], 0), vec![]);

    let wired = canvas.paste(&mut host, &fragment, Pos2::new(800.0, 0.0), true);
    pump(&mut host, &mut canvas);
    assert_eq!(host.upstream_connections(wired[0], 0), vec![(reader, 0)]);
}

/// Host-driven selection must not bounce back, and canvas-driven selection
/// must not re-apply its own echo.
#[test]
fn selection_sync_settles_in_one_round() {
    let mut host = MemoryHost::new();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    pump(&mut host, &mut canvas);

    canvas.select_only(&mut host, reader);
    pump(&mut host, &mut canvas);
    assert_eq!(host.selection(), &[reader]);
    assert!(canvas.nodes[&reader].selected);

    host.set_selection(&[clip]);
    pump(&mut host, &mut canvas);
    assert!(canvas.nodes[&clip].selected);
    assert!(!canvas.nodes[&reader].selected);
    assert!(host.drain_events().is_empty());
}

/// With active-object mirroring disabled, clicks still select locally but
/// the host never hears about it.
#[test]
fn selection_push_respects_config() {
    let mut host = MemoryHost::new();
    let config = CanvasConfig {
        update_active_object: false,
        ..CanvasConfig::default()
    };
    let mut canvas = Canvas::new(config);
    let reader = mesh_source(&mut host, "Reader");
    pump(&mut host, &mut canvas);

    canvas.select_only(&mut host, reader);
    assert!(canvas.nodes[&reader].selected);
    assert!(host.selection().is_empty());
}

/// A full startup sync on a pre-populated pipeline equals the event-driven
/// build-up, connection for connection.
#[test]
fn startup_sync_matches_event_driven_state() {
    let mut host = MemoryHost::new();
    let reader = mesh_source(&mut host, "Reader");
    let clip = mesh_filter(&mut host, "Clip");
    let contour = mesh_filter(&mut host, "Contour");
    host.add_connection(reader, 0, clip, 0);
    host.add_connection(clip, 0, contour, 0);

    // Event-driven canvas.
    let mut replay = Canvas::new(CanvasConfig::default());
    let events: Vec<PipelineEvent> = host.drain_events();
    for event in &events {
        replay.apply_event(&mut host, event);
    }

    // Cold-start canvas.
    let mut cold = Canvas::new(CanvasConfig::default());
    cold.sync_full(&mut host);

    assert_eq!(replay.nodes.len(), cold.nodes.len());
    assert_eq!(replay.connection_count(), cold.connection_count());
    for (entity, node) in &replay.nodes {
        assert_eq!(node.position, cold.nodes[entity].position);
    }
}
