//! Checkpoint and Resume
//!
//! This example saves a running machine mid-level and restores it onto a
//! freshly set-up machine, as a game would on save and load.
//!
//! Key concepts:
//! - Only runtime data is checkpointed (current state, properties, history)
//! - JSON for readability, binary for compactness
//! - Restore validates the checkpoint against the machine's registry
//!
//! Run with: cargo run --example checkpoint_resume

use statebag::checkpoint::{Checkpoint, CheckpointError};
use statebag::fsm::StateMachine;
use statebag::state_enum;

state_enum! {
    enum Movement {
        Idle,
        Running,
        Jumping,
    }
}

fn setup() -> Result<StateMachine<Movement>, CheckpointError> {
    let mut machine = StateMachine::new();
    machine
        .add_state(Movement::Idle)?
        .add_state(Movement::Running)?
        .add_state(Movement::Jumping)?;
    machine
        .from(&Movement::Idle)?
        .to(&Movement::Running)?
        .when(|p| p.number("velocity_x").is_some_and(|v| v != 0.0))
        .from(&Movement::Running)?
        .to(&Movement::Jumping)?
        .when(|p| p.flag("jump_pressed"));
    machine.set_current_state(&Movement::Idle)?;
    Ok(machine)
}

fn main() -> Result<(), CheckpointError> {
    println!("=== Checkpoint and Resume ===\n");

    let mut machine = setup()?;
    machine.set_property("velocity_x", 2.5)?;
    machine.set_property("jump_pressed", true)?;
    println!("Before save: {}", machine.current_state_name()?);

    let checkpoint = machine.checkpoint()?;
    let json = checkpoint.to_json()?;
    let binary = checkpoint.to_binary()?;
    println!("JSON checkpoint: {} bytes", json.len());
    println!("Binary checkpoint: {} bytes\n", binary.len());

    let mut reloaded = setup()?;
    reloaded.restore(&Checkpoint::from_binary(&binary)?)?;
    println!("After load: {}", reloaded.current_state_name()?);
    println!(
        "Restored velocity_x: {:?}",
        reloaded.properties().number("velocity_x")
    );
    println!("Restored history: {} transitions", reloaded.history().len());

    println!("\n=== Example Complete ===");
    Ok(())
}
