//! Synthetic instrumentation log generation.
//!
//! Produces a log in the same shape as the minifier's console output, with
//! per-pass deltas following a geometric decay. With `noise = 0` the resulting
//! compression quotients are exactly `a * exp(b * x) + c` with `b = ln(decay)`
//! (up to integer rounding of the deltas), which makes the generator handy for
//! demos and for checking the fitter end to end.

use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::AppError;

/// Generator settings.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Number of passes to emit.
    pub passes: usize,
    /// Byte count before the first pass.
    pub initial_bytes: i64,
    /// Fraction of `initial_bytes` removed over all passes, in `(0, 1)`.
    pub reduction: f64,
    /// Per-pass decay ratio of the deltas, in `(0, 1)`.
    pub decay: f64,
    /// Relative standard deviation of multiplicative noise on each delta.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            passes: 8,
            initial_bytes: 120_000,
            reduction: 0.35,
            decay: 0.45,
            noise: 0.0,
            seed: 42,
        }
    }
}

/// Render a synthetic log as text.
pub fn generate_log(config: &SampleConfig) -> Result<String, AppError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::data(format!("Noise distribution error: {e}")))?;

    let total = config.initial_bytes as f64 * config.reduction;
    let norm = 1.0 - config.decay.powi(config.passes as i32);
    let initial_declarations = (config.initial_bytes / 24).max(1);

    let mut out = String::new();
    let mut bytes = config.initial_bytes;

    out.push_str("index.js:563 filterAuthorInlineStyles\n");
    out.push_str(&format!("index.js:566 context.bytes {bytes}\n"));
    out.push_str("index.js:589 filterWinningInlineStyles\n");
    out.push_str(&format!("index.js:590 context.declarations {initial_declarations}\n"));
    out.push_str(&format!("index.js:591 context.bytes {bytes}\n"));

    for k in 1..=config.passes {
        let weight = (1.0 - config.decay) * config.decay.powi(k as i32 - 1) / norm;
        let jitter = 1.0 + config.noise * normal.sample(&mut rng);
        let delta = -(total * weight * jitter).round() as i64;
        bytes += delta;
        let declarations = (initial_declarations as f64 * bytes as f64 / config.initial_bytes as f64)
            .round()
            .max(1.0) as i64;

        out.push_str(&format!("index.js:597 filterWinningInlineStyles pass #{k}\n"));
        out.push_str(&format!("index.js:604 context.declarations {declarations}\n"));
        out.push_str(&format!("index.js:605 context.bytes {bytes}\n"));
        out.push_str(&format!("index.js:606 context.delta {delta}\n"));
    }

    let runtime: f64 = rng.gen_range(5.0..50.0);
    out.push_str(&format!("index.js:600 runtime(ms) {runtime:.3}\n"));

    Ok(out)
}

/// Generate a synthetic log and write it to `path`.
pub fn write_sample_log(path: &Path, config: &SampleConfig) -> Result<(), AppError> {
    let text = generate_log(config)?;
    std::fs::write(path, text)
        .map_err(|e| AppError::io(format!("Failed to write sample log '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), passes = config.passes, seed = config.seed, "Wrote sample log");
    Ok(())
}

fn validate(config: &SampleConfig) -> Result<(), AppError> {
    if config.passes == 0 {
        return Err(AppError::io("Sample pass count must be > 0."));
    }
    if config.initial_bytes <= 0 {
        return Err(AppError::io("Initial byte count must be > 0."));
    }
    if !(config.reduction > 0.0 && config.reduction < 1.0) {
        return Err(AppError::io("Reduction must be in (0, 1)."));
    }
    if !(config.decay > 0.0 && config.decay < 1.0) {
        return Err(AppError::io("Decay ratio must be in (0, 1)."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::io("Noise must be finite and >= 0."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogMarkers;
    use crate::parse::parse_log;

    #[test]
    fn same_seed_same_log() {
        let config = SampleConfig {
            noise: 0.1,
            ..SampleConfig::default()
        };
        assert_eq!(generate_log(&config).unwrap(), generate_log(&config).unwrap());
    }

    #[test]
    fn generated_log_parses_with_aligned_bytes() {
        let config = SampleConfig::default();
        let text = generate_log(&config).unwrap();
        let log = parse_log(&text, &LogMarkers::default()).unwrap();

        assert_eq!(log.passes, (1..=config.passes as u64).collect::<Vec<_>>());
        assert_eq!(log.deltas.len(), config.passes);
        // Baseline byte count inside the region plus one per pass.
        assert_eq!(log.bytes.len(), config.passes + 1);
        assert!(log.deltas.iter().all(|&d| d < 0));
    }

    #[test]
    fn log_is_framed_by_region_markers() {
        let text = generate_log(&SampleConfig { passes: 2, ..SampleConfig::default() }).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(text.ends_with('\n'));
        assert_eq!(lines.len(), 5 + 2 * 4 + 1);
        assert_eq!(lines[0], "index.js:563 filterAuthorInlineStyles");
        assert_eq!(lines[2], "index.js:589 filterWinningInlineStyles");
        assert_eq!(lines[5], "index.js:597 filterWinningInlineStyles pass #1");
        assert!(lines[lines.len() - 1].starts_with("index.js:600 runtime(ms) "));
    }

    #[test]
    fn rejects_bad_settings() {
        let bad = SampleConfig {
            decay: 1.0,
            ..SampleConfig::default()
        };
        assert!(generate_log(&bad).is_err());

        let bad = SampleConfig {
            passes: 0,
            ..SampleConfig::default()
        };
        assert!(generate_log(&bad).is_err());
    }
}
