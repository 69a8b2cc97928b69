use ndarray::Array1;

/// Remove the least-squares straight line from the samples.
///
/// The fit is over sample index, so the result does not depend on the
/// sampling rate. Fewer than two samples have no slope and are only centered.
pub fn detrend_linear(data: &mut Array1<f64>) {
    let n = data.len();
    if n == 0 {
        return;
    }
    let mean_y = data.sum() / n as f64;
    let mean_x = (n - 1) as f64 / 2.0;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in data.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };

    for (i, y) in data.iter_mut().enumerate() {
        *y -= mean_y + slope * (i as f64 - mean_x);
    }
}

/// Subtract the mean from the samples
pub fn demean(data: &mut Array1<f64>) {
    if let Some(mean) = data.mean() {
        data.mapv_inplace(|y| y - mean);
    }
}
