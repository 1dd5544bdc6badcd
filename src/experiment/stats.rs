use crate::error::{Error, Result};

/// Mean and standard error of each component over `iterations` samples.
///
/// The error uses the sample variance; a single sample has zero error.
pub fn mean_and_stderr<F>(iterations: usize, mut generator: F) -> Result<(Vec<f64>, Vec<f64>)>
where
    F: FnMut() -> Result<Vec<f64>>,
{
    if iterations == 0 {
        return Err(Error::InvalidConfig("at least one iteration is needed".to_string()));
    }
    let mut samples: Vec<Vec<f64>> = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let sample = generator()?;
        if let Some(first) = samples.first().map(Vec::len).filter(|&len| len != sample.len()) {
            return Err(Error::InvalidConfig(format!(
                "sample has {} values, expected {}",
                sample.len(),
                first
            )));
        }
        samples.push(sample);
    }

    let n = iterations as f64;
    let width = samples[0].len();
    let mut means = vec![0.0; width];
    for sample in &samples {
        for (mean, x) in means.iter_mut().zip(sample) {
            *mean += x;
        }
    }
    means.iter_mut().for_each(|m| *m /= n);

    let mut errors = vec![0.0; width];
    if iterations > 1 {
        for sample in &samples {
            for ((err, x), mean) in errors.iter_mut().zip(sample).zip(&means) {
                *err += (x - mean).powi(2);
            }
        }
        errors
            .iter_mut()
            .for_each(|sum_sq| *sum_sq = (*sum_sq / (n - 1.0) / n).sqrt());
    }
    Ok((means, errors))
}
