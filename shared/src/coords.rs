//! Extracts a coordinate pair from pasted text: map links or a bare `lat, lng` pair.

use std::sync::OnceLock;

use regex::Regex;

use crate::Coordinate;

const NUMBER: &str = r"([-+]?\d+(?:\.\d+)?)";

fn patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: String| Regex::new(&pattern).expect("coordinate pattern");
        [
            // https://www.google.com/maps/@28.5421,-81.3790,15z
            compile(format!(r"@{NUMBER},\s*{NUMBER}")),
            // https://www.google.com/maps/dir//28.5421,-81.3790
            compile(format!(r"/dir//{NUMBER},\s*{NUMBER}")),
            // ...?q=28.5421,-81.3790 or &query=28.5421%2C-81.3790
            compile(format!(
                r"(?i)[?&](?:q|query)={NUMBER}(?:,|%2C)(?:\s|\+|%20)*{NUMBER}"
            )),
            compile(format!(r"^\s*\(?\s*{NUMBER}\s*,\s*{NUMBER}\s*\)?\s*$")),
        ]
    })
}

/// Tries each supported pattern in order and returns the first plausible pair.
///
/// The first captured number is taken as latitude when it fits the latitude
/// range, otherwise the two are swapped. `(45, 45)` therefore always reads as
/// latitude first. Returns `None` when nothing matches or the values are out of
/// range, meaning the text should be geocoded as an address instead.
pub fn parse_coordinates(text: &str) -> Option<Coordinate> {
    let caps = patterns().iter().find_map(|re| re.captures(text))?;
    let first = caps[1].parse::<f64>().ok()?;
    let second = caps[2].parse::<f64>().ok()?;
    disambiguate(first, second)
}

fn disambiguate(first: f64, second: f64) -> Option<Coordinate> {
    let (lat, lon) = if first.abs() <= 90.0 {
        (first, second)
    } else {
        (second, first)
    };
    let coord = Coordinate { lat, lon };
    coord.is_valid().then_some(coord)
}
