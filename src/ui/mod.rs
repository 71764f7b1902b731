// Terminal UI helpers

pub mod progress;
