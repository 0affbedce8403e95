/// One price observation. Never mutated after it enters the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub ts_ms: u64,
    pub price: f64,
}

impl Sample {
    pub fn new(ts_ms: u64, price: f64) -> Self {
        Self { ts_ms, price }
    }
}
