use anyhow::{Result, bail};

/// Two-sided 95% normal quantile.
const Z_95: f64 = 1.96;

/// Online accumulator of trial outcomes.
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug)]
pub struct AccumulatorReport {
    pub n_vals: usize,
    pub mean: f64,
    /// Population standard deviation (divided by the number of values).
    pub std_dev: f64,
    pub sem: f64,
    /// 95% confidence interval of the mean.
    pub conf_int: (f64, f64),
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn report(&self) -> Result<AccumulatorReport> {
        if self.n_vals == 0 {
            bail!("cannot compute statistics of zero values");
        }
        let n_vals = self.n_vals as f64;
        let std_dev = (self.diff_2_sum / n_vals).sqrt();
        let sem = std_dev / n_vals.sqrt();
        Ok(AccumulatorReport {
            n_vals: self.n_vals,
            mean: self.mean,
            std_dev,
            sem,
            conf_int: (self.mean - Z_95 * sem, self.mean + Z_95 * sem),
        })
    }
}
