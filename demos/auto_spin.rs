use fortune_wheel::{Config, Prize, Wheel, WheelCommand};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A short custom wheel built with the bon-generated builder
    let prizes = ["100", "x2", "300", "0", "750", "+", "500", "1000"]
        .iter()
        .map(|raw| raw.parse::<Prize>())
        .collect::<Result<Vec<_>, _>>()?;
    let config = Config::builder().prizes(prizes).build();

    let wheel = Wheel::new(config)?;

    let (sender, receiver) = mpsc::channel();

    // Nudge the wheel to a random angle, then spin it, over and over
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            if sender.send(WheelCommand::SetAngle(angle)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(500));
            if sender.send(WheelCommand::Spin).is_err() {
                break;
            }
            thread::sleep(Duration::from_secs(7));
        }
    });

    println!("Spinning the wheel every few seconds. Close the window to exit.");

    wheel.show_with_commands(receiver)?;
    Ok(())
}
