use std::time::Duration;

/// Human-readable elapsed time for decode logs.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 0.1 {
        format!("{:.2} ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.3} sec", secs)
    } else if secs < 3600.0 {
        format!("{:.2} min", secs / 60.0)
    } else {
        format!("{:.2} hr", secs / 3600.0)
    }
}
