// Version inspection commands: compare and parse

use crate::ui;
use dccompat::version::{compare_versions, parse_compatibility_string};
use std::cmp::Ordering;

pub fn compare(a: &str, b: &str) {
    let symbol = match compare_versions(a, b) {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    ui::line(&format!("{} {} {}", a, symbol, b));
}

pub fn parse(text: &str) -> i32 {
    let range = parse_compatibility_string(text);
    match (range.min_version, range.max_version) {
        (Some(min), Some(max)) => {
            ui::line(&format!("{} - {}", min, max));
            0
        }
        _ => {
            ui::warning("No version range found");
            1
        }
    }
}
