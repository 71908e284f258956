/// Integration tests for wave logic
///
/// These drive a whole wave through its public API the way a front-end does:
/// scripted key input in, draw calls out.
use invaders::{
    Alien, Formation, Key, Projectile, ProjectileOwner, Ship, Wave, WaveConfig, WaveView,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

const IDLE: &[Key] = &[];

#[derive(Debug, Clone, PartialEq)]
enum Drawn {
    Alien,
    Ship,
    DefenseLine(f32),
    Bolt(ProjectileOwner),
}

#[derive(Default)]
struct RecordingView {
    calls: Vec<Drawn>,
}

impl WaveView for RecordingView {
    fn draw_alien(&mut self, _alien: &Alien) {
        self.calls.push(Drawn::Alien);
    }

    fn draw_ship(&mut self, _ship: &Ship) {
        self.calls.push(Drawn::Ship);
    }

    fn draw_defense_line(&mut self, y: f32, _width: f32) {
        self.calls.push(Drawn::DefenseLine(y));
    }

    fn draw_bolt(&mut self, bolt: &Projectile) {
        self.calls.push(Drawn::Bolt(bolt.owner()));
    }
}

/// A wave with a single alien hovering over the ship's starting column
fn lone_alien_wave(y: f32) -> Wave {
    let config = WaveConfig {
        alien_speed: 100.0,
        ..WaveConfig::default()
    };
    let x = config.game_width / 2.0;
    let slots = vec![vec![Some(Alien::new(
        x,
        y,
        config.alien_width,
        config.alien_height,
        0,
    ))]];
    let formation = Formation::from_slots(slots, &config);
    Wave::with_formation(config, formation, StdRng::seed_from_u64(1)).unwrap()
}

#[test]
fn test_draw_order() {
    let mut wave = Wave::seeded(WaveConfig::default(), 4).unwrap();
    wave.update(&[Key::Fire][..], 0.016);

    let mut view = RecordingView::default();
    wave.draw(&mut view);

    let mut expected = vec![Drawn::Alien; 60];
    expected.push(Drawn::Ship);
    expected.push(Drawn::DefenseLine(100.0));
    expected.push(Drawn::Bolt(ProjectileOwner::Player));
    assert_eq!(view.calls, expected);
}

#[test]
fn test_holding_fire_clears_lone_alien() {
    let mut wave = lone_alien_wave(300.0);
    let mut frames = 0;
    while !wave.aliens_cleared() {
        wave.update(&[Key::Fire][..], 0.016);
        frames += 1;
        assert!(frames < 100, "bolt never reached the alien");
    }
    assert!(!wave.is_over());
    assert_eq!(wave.lives(), 3);
}

#[test]
fn test_only_one_player_bolt_in_flight() {
    let mut wave = lone_alien_wave(650.0);
    // start the ship away from the alien so the first bolt flies on
    for _ in 0..30 {
        wave.update(&[Key::Left][..], 0.016);
    }
    for _ in 0..20 {
        wave.update(&[Key::Fire][..], 0.016);
        let player_bolts = wave
            .projectiles()
            .iter()
            .filter(|bolt| bolt.is_player_bolt())
            .count();
        assert_eq!(player_bolts, 1);
    }
}

#[test]
fn test_ship_stops_at_left_wall() {
    let mut wave = Wave::seeded(WaveConfig::default(), 2).unwrap();
    for _ in 0..200 {
        wave.update(&[Key::Left][..], 0.016);
    }
    let ship = wave.ship().unwrap();
    assert_eq!(ship.x, ship.width / 2.0);
}

#[test]
fn test_same_seed_same_wave() {
    let config = WaveConfig {
        alien_speed: 0.05,
        ..WaveConfig::default()
    };
    let mut first = Wave::seeded(config.clone(), 99).unwrap();
    let mut second = Wave::seeded(config, 99).unwrap();

    for frame in 0..300 {
        let keys: &[Key] = if frame % 40 < 20 {
            &[Key::Right]
        } else {
            &[Key::Left, Key::Fire]
        };
        first.update(keys, 0.016);
        second.update(keys, 0.016);
    }

    let positions = |wave: &Wave| -> Vec<(f32, f32)> {
        wave.projectiles().iter().map(|bolt| (bolt.x, bolt.y)).collect()
    };
    assert_eq!(positions(&first), positions(&second));
    assert_eq!(
        first.formation().live_count(),
        second.formation().live_count()
    );
    assert_eq!(first.lives(), second.lives());
}

#[test]
fn test_enemy_bolts_fall() {
    let config = WaveConfig {
        alien_speed: 0.01,
        bolt_rate: 1,
        ..WaveConfig::default()
    };
    let mut wave = Wave::seeded(config, 8).unwrap();
    // the first frame only fills the step timer, the second steps and fires
    wave.update(IDLE, 0.02);
    wave.update(IDLE, 0.02);
    let enemy_bolt = wave
        .projectiles()
        .iter()
        .find(|bolt| bolt.owner() == ProjectileOwner::Enemy)
        .map(|bolt| bolt.y)
        .unwrap();

    wave.update(IDLE, 0.0);
    let moved = wave
        .projectiles()
        .iter()
        .find(|bolt| bolt.owner() == ProjectileOwner::Enemy)
        .map(|bolt| bolt.y)
        .unwrap();
    assert_eq!(moved, enemy_bolt - 10.0);
}

fn key_set() -> impl Strategy<Value = Vec<Key>> {
    prop::collection::vec(
        prop_oneof![
            Just(Key::Left),
            Just(Key::Right),
            Just(Key::Up),
            Just(Key::Fire)
        ],
        0..3,
    )
}

proptest! {
    #[test]
    fn test_wave_invariants_hold(
        seed in any::<u64>(),
        frames in prop::collection::vec((key_set(), 0.0f32..0.1), 1..200),
    ) {
        let config = WaveConfig {
            alien_speed: 0.05,
            ..WaveConfig::default()
        };
        let mut wave = Wave::seeded(config.clone(), seed).unwrap();
        let mut live = wave.formation().live_count();
        let mut lives = wave.lives();

        for (keys, dt) in frames {
            wave.update(&keys[..], dt);

            let now_live = wave.formation().live_count();
            prop_assert!(now_live <= live);
            live = now_live;

            prop_assert!(wave.lives() <= lives);
            lives = wave.lives();

            let player_bolts = wave
                .projectiles()
                .iter()
                .filter(|bolt| bolt.is_player_bolt())
                .count();
            prop_assert!(player_bolts <= 1);

            if let Some(ship) = wave.ship() {
                prop_assert!(ship.x >= ship.width / 2.0);
                prop_assert!(ship.x <= config.game_width - ship.width / 2.0);
            } else {
                prop_assert!(wave.is_paused());
            }

            prop_assert_eq!(wave.aliens_cleared(), live == 0);

            if wave.is_over() {
                break;
            }
            if wave.ship().is_none() {
                wave.set_new_ship();
            }
        }
    }
}
