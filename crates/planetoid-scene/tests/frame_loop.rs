use std::time::{Duration, Instant};

use planetoid_config::Config;
use planetoid_scene::{Session, SessionClock, Surface, UniformKind, assemble};

fn ready_session() -> Session {
    let config = Config::default();
    let mut session = Session::new(&config);
    session.install_world(assemble(&config.world, Some(2024)));
    session
}

#[test]
fn every_surface_packs_after_many_frames() {
    let mut session = ready_session();
    let start = Instant::now();
    session.clock = SessionClock::starting_at(start);

    let mut previous_time = 0.0;
    for frame in 0..240u64 {
        let t = session.advance_frame(start + Duration::from_millis(frame * 16));
        assert!(t >= previous_time);
        previous_time = t;
    }

    for surface in Surface::ALL {
        let bytes = session.uniforms.pack(surface).unwrap();
        assert_eq!(bytes.len() % 16, 0, "{}", surface.name());
        assert_eq!(bytes.len(), surface.layout().size());
    }
}

#[test]
fn orbit_ratio_holds_while_speed_changes() {
    let mut session = ready_session();
    let now = Instant::now();
    for (i, speed) in [0.001_f32, 0.05, 0.1, 0.003, 0.077].iter().cycle().take(500).enumerate() {
        session.uniforms.moon.set("moonSpeed", *speed).unwrap();
        session.advance_frame(now + Duration::from_millis(i as u64));
        let world = session.world.as_ref().unwrap();
        let rot = world.graph.get(world.moon_orbit.pivot()).unwrap().transform.rotation;
        assert_eq!(rot.x, 2.0 * rot.y);
    }
}

#[test]
fn moon_keeps_its_distance_from_the_planet() {
    let mut session = ready_session();
    let moon = session.world.as_ref().unwrap().moon;
    let start = session.world.as_ref().unwrap().graph.world_position(moon);
    session.uniforms.moon.set("moonSpeed", 0.1_f32).unwrap();
    for _ in 0..50 {
        session.advance_frame(Instant::now());
    }
    let graph = &session.world.as_ref().unwrap().graph;
    let end = graph.world_position(moon);
    assert!((end.length() - start.length()).abs() < 1e-2);
    assert!((end - start).length() > 1.0);
}

#[test]
fn shared_uniforms_are_visible_to_every_surface() {
    let mut session = ready_session();
    session.uniforms.shared.set("avTemp", 30.0_f32).unwrap();
    for surface in Surface::ALL {
        let merged = session.uniforms.merged(surface);
        assert_eq!(merged.float("avTemp"), Some(30.0));
        for (name, kind) in surface.layout().fields {
            assert_eq!(merged.get(name).map(|v| v.kind()), Some(*kind), "{name}");
        }
    }
    assert_eq!(UniformKind::Vec3.to_string(), "v3");
}
