use std::time::{Duration, Instant};

pub mod eight_puzzle;
pub mod grid_world;
pub mod marble_solitaire;
pub mod melody;
pub mod missionaries;
pub mod plagiarism;
pub mod rabbit_leap;
pub mod sat;

/// Run `f`, and report how long it took.
pub(crate) fn timed<T, F>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn timed_returns_the_value_and_duration() {
        let (value, elapsed) = timed(|| {
            std::thread::sleep(Duration::from_millis(5));
            3
        });
        assert_eq!(value, 3);
        assert!(elapsed >= Duration::from_millis(5));
    }
}
