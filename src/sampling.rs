//! Small sampling helpers shared by the generators

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks one value according to relative weights. `choices` must not be empty.
pub fn weighted<T: Copy, R: Rng + ?Sized>(rng: &mut R, choices: &[(T, f64)]) -> T {
    choices
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(value, _)| *value)
        .unwrap_or(choices[0].0)
}

/// Uniform pick from a word list; empty lists yield ""
pub fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Uniform pick from a slice of categorical values. `items` must not be empty.
pub fn pick_of<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    *items.choose(rng).unwrap_or(&items[0])
}

/// True with probability `p`
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Uniform date in `[start, end]`
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    start + Duration::days(rng.gen_range(0..=span))
}
