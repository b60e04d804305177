use serde::Serialize;

/// Speed and accuracy observed at one input update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WpmSample {
    pub t: f64,
    pub wpm: u32,
    pub accuracy: u32,
}

impl WpmSample {
    pub fn new(t: f64, wpm: u32, accuracy: u32) -> Self {
        Self { t, wpm, accuracy }
    }
}

/// Population standard deviation of the sampled speed. Lower is steadier;
/// fewer than two samples have nothing to vary.
pub fn consistency(samples: &[WpmSample]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let count = samples.len() as f64;
    let mean = samples.iter().map(|s| s.wpm as f64).sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|s| {
            let diff = mean - s.wpm as f64;
            diff * diff
        })
        .sum::<f64>()
        / count;

    variance.sqrt()
}
