//! Declarative Setup
//!
//! This example builds a scene-flow machine (Title, Lobby, Help, Credits)
//! from a JSON configuration and a declarative builder, and shows how a
//! broken setup reports every problem at once.
//!
//! Key concepts:
//! - MachineConfig loaded from JSON
//! - StateMachineBuilder validates the whole setup before building
//! - String-named states alongside enum states
//!
//! Run with: cargo run --example declarative_setup

use statebag::builder::StateMachineBuilder;
use statebag::fsm::MachineConfig;

fn scene(name: &str) -> String {
    name.to_string()
}

fn main() {
    println!("=== Declarative Setup ===\n");

    let config = match MachineConfig::from_json(r#"{ "history_limit": 8 }"#) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let built = StateMachineBuilder::new()
        .config(config.clone())
        .states(["Title", "Lobby", "Help", "Credits"].map(scene))
        .transition(scene("Title"), scene("Lobby"), |p| p.text("pressed") == Some("start"))
        .transition(scene("Title"), scene("Help"), |p| p.text("pressed") == Some("help"))
        .transition(scene("Title"), scene("Credits"), |p| {
            p.text("pressed") == Some("credits")
        })
        .transition(scene("Help"), scene("Title"), |p| p.text("pressed") == Some("back"))
        .transition(scene("Credits"), scene("Title"), |p| {
            p.text("pressed") == Some("back")
        })
        .initial(scene("Title"))
        .build();

    let mut scenes = match built {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    for button in ["help", "back", "credits", "back", "start"] {
        if let Err(e) = scenes.set_property("pressed", button) {
            eprintln!("{e}");
            return;
        }
        if let Ok(name) = scenes.current_state_name() {
            println!("pressed {button:<8} -> scene {name}");
        }
    }

    println!("\nA broken setup reports every issue:");
    let broken = StateMachineBuilder::new()
        .config(config)
        .states(["Title", "Title"].map(scene))
        .always(scene("Lobby"), scene("Title"))
        .transition(scene("Title"), scene("Options"), |p| p.flag("options"))
        .build();

    if let Err(e) = broken {
        for issue in e.issues() {
            println!("  - {issue}");
        }
    }

    println!("\n=== Example Complete ===");
}
