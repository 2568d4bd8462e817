//! Player Controller
//!
//! This example drives a platformer character's movement state from a
//! scripted stream of simulation ticks, the way a game's player
//! controller would.
//!
//! Key concepts:
//! - Imperative setup with from(..).to(..).when(..)
//! - One batch of property updates per tick, one evaluation pass per batch
//! - The owner maps states to animation clips; the machine never does
//!
//! Run with: RUST_LOG=statebag=debug cargo run --example player_controller

use statebag::fsm::{MachineError, StateMachine};
use statebag::state_enum;
use statebag::PropertyValue;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Movement {
        Idle,
        Running,
        Crouched,
        Jumping,
        Falling,
        WallSliding,
    }
}

fn setup() -> Result<StateMachine<Movement>, MachineError> {
    use Movement::*;

    let mut machine = StateMachine::new();
    for state in [Idle, Running, Crouched, Jumping, Falling, WallSliding] {
        machine.add_state(state)?;
    }

    machine
        .from(&Idle)?
        .to(&Crouched)?
        .when(|p| p.flag("crouch_pressed"))
        .from(&Idle)?
        .to(&Jumping)?
        .when(|p| p.number("velocity_y").is_some_and(|v| v < 0.0))
        .from(&Idle)?
        .to(&Running)?
        .when(|p| p.number("velocity_x").is_some_and(|v| v != 0.0));

    machine
        .from(&Running)?
        .to(&Jumping)?
        .when(|p| p.number("velocity_y").is_some_and(|v| v < 0.0))
        .from(&Running)?
        .to(&Idle)?
        .when(|p| p.number("velocity_x") == Some(0.0));

    machine
        .from(&Crouched)?
        .to(&Idle)?
        .when(|p| !p.flag("crouch_pressed"));

    machine
        .from(&Jumping)?
        .to(&Falling)?
        .when(|p| p.number("velocity_y").is_some_and(|v| v > 0.0));

    machine
        .from(&Falling)?
        .to(&WallSliding)?
        .when(|p| p.flag("on_wall") && !p.flag("on_floor"))
        .from(&Falling)?
        .to(&Idle)?
        .when(|p| p.flag("on_floor"));

    machine
        .from(&WallSliding)?
        .to(&Idle)?
        .when(|p| p.flag("on_floor"))
        .from(&WallSliding)?
        .to(&Falling)?
        .when(|p| !p.flag("on_wall"));

    machine.set_current_state(&Idle)?;
    Ok(machine)
}

fn animation(machine: &StateMachine<Movement>) -> &'static str {
    if machine.is_one_of(&["Jumping", "Falling"]) {
        "airborne"
    } else if machine.is(&Movement::WallSliding) {
        "wall_slide"
    } else if machine.is(&Movement::Crouched) {
        "crouch"
    } else if machine.is(&Movement::Running) {
        "run"
    } else {
        "idle"
    }
}

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Player Controller ===\n");

    let mut machine = setup()?;

    // (velocity_x, velocity_y, on_floor, on_wall, crouch_pressed)
    let ticks = [
        (0.0, 0.0, true, false, false),
        (3.0, 0.0, true, false, false),
        (3.0, -6.0, false, false, false),
        (3.0, 2.0, false, false, false),
        (0.0, 1.0, false, true, false),
        (0.0, 0.0, true, false, false),
        (0.0, 0.0, true, false, true),
        (0.0, 0.0, true, false, false),
    ];

    for (tick, (vx, vy, on_floor, on_wall, crouch)) in ticks.into_iter().enumerate() {
        machine.set_properties([
            ("velocity_x", PropertyValue::from(vx)),
            ("velocity_y", PropertyValue::from(vy)),
            ("on_floor", PropertyValue::from(on_floor)),
            ("on_wall", PropertyValue::from(on_wall)),
            ("crouch_pressed", PropertyValue::from(crouch)),
        ])?;
        println!(
            "tick {tick}: {:<12} -> play '{}'",
            machine.current_state_name()?,
            animation(&machine)
        );
    }

    let path: Vec<&str> = machine
        .history()
        .get_path()
        .into_iter()
        .map(|state| statebag::State::name(state))
        .collect();
    println!("\nPath: {}", path.join(" -> "));

    println!("\n=== Example Complete ===");
    Ok(())
}
