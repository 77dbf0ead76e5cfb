//! Drive the garage door machine with a scripted user.
//!
//! The door starts opened. The script presses "close", waits for the door to
//! settle, presses "open", then stops the machine and prints the path taken.
//!
//! Run with `RUST_LOG=info` to watch every transition.

use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use log::info;

use tripwire::core::Signals;
use tripwire::definition::{MachineDefinition, Registry};

const DOOR: &str = include_str!("garage_door.json");

#[derive(Parser, Debug)]
#[clap(name = "garage_door")]
struct Opts {
    /// Milliseconds between evaluation cycles
    #[clap(long, default_value = "200")]
    poll_ms: u64,

    /// How long the motor takes to move the door, in milliseconds
    #[clap(long, default_value = "500")]
    motor_ms: u64,

    /// How long each button is held, in milliseconds
    #[clap(long, default_value = "400")]
    press_ms: u64,

    /// Pause between button presses, in milliseconds
    #[clap(long, default_value = "1500")]
    settle_ms: u64,
}

fn motor(signals: &Signals, travel: Duration, opened: bool) -> impl Fn() + Send + Sync + 'static {
    let signals = signals.clone();
    move || {
        info!("motor: {}", if opened { "opening door" } else { "closing door" });
        thread::sleep(travel);
        signals.update(|s| {
            s.insert("door_opened".into(), opened);
            s.insert("door_closed".into(), !opened);
        });
    }
}

fn press(signals: &Signals, button: &str, hold: Duration) {
    info!("user: pressing {}", button);
    signals.set(button, true);
    thread::sleep(hold);
    signals.set(button, false);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let signals = Signals::with_values([
        ("door_opened", true),
        ("door_closed", false),
        ("user_open", false),
        ("user_close", false),
    ]);
    let travel = Duration::from_millis(opts.motor_ms);
    let registry = Registry::new(signals.clone())
        .with_action("open_door", motor(&signals, travel, true))
        .with_action("close_door", motor(&signals, travel, false));

    let mut definition = MachineDefinition::from_json(DOOR)?;
    definition.config.poll_interval_ms = opts.poll_ms;
    let machine = definition.build(&registry)?;

    println!("Transitions:");
    for transition in machine.transitions() {
        println!("  {}", transition);
    }

    let handle = machine.spawn()?;
    let hold = Duration::from_millis(opts.press_ms);
    let settle = Duration::from_millis(opts.settle_ms);

    thread::sleep(settle);
    press(&signals, "user_close", hold);
    thread::sleep(settle);
    press(&signals, "user_open", hold);
    thread::sleep(settle);

    let status = handle.status();
    println!("Door is {} after {} cycles", status.current_state, status.cycle);

    let machine = handle.stop().map_err(|e| anyhow!("door machine failed: {}", e))?;
    println!("Path: {}", machine.history().get_path().join(" -> "));
    Ok(())
}
