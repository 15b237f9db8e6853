/*
 * This file is part of Hyperfan.
 *
 * Copyright (C) 2025 Hyperfan contributors
 *
 * Hyperfan is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Hyperfan is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Hyperfan. If not, see <https://www.gnu.org/licenses/>.
 */

//! String-level helpers for hwmon paths. Nothing here touches the filesystem.

use std::path::Path;

/// True if `chip_path` is `path` itself or one of its ancestors.
/// Compares whole components, so `hwmon1` does not contain `hwmon10/...`.
pub(crate) fn is_within(chip_path: &str, path: &str) -> bool {
    !chip_path.is_empty() && Path::new(path).starts_with(chip_path)
}

/// Split into (parent directory, final segment).
///
/// `None` when there is no usable final segment: an empty path, a trailing
/// slash, or a `.`/`..` component.
pub(crate) fn split_filename(path: &str) -> Option<(&str, &str)> {
    let (dir, name) = match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    };
    match name {
        "" | "." | ".." => None,
        _ => Some((dir, name)),
    }
}

/// Feature names an attribute file could belong to, best guess first.
///
/// The first candidate is the part before the last underscore
/// (`temp1_input` gives `temp1`). The parts before each earlier underscore
/// follow, and the whole segment comes last for names like `beep_enable`
/// that contain an underscore. `temp1_crit_alarm` yields `temp1_crit`,
/// `temp1`, then `temp1_crit_alarm`. A segment with no usable underscore
/// yields only itself.
pub(crate) fn feature_name_candidates(segment: &str) -> Vec<&str> {
    let mut candidates: Vec<&str> = segment
        .rmatch_indices('_')
        .map(|(idx, _)| &segment[..idx])
        .filter(|prefix| !prefix.is_empty())
        .collect();
    candidates.push(segment);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_within_matches_components() {
        assert!(is_within("/sys/class/hwmon/hwmon0", "/sys/class/hwmon/hwmon0/temp1_input"));
        assert!(is_within("/sys/class/hwmon/hwmon0", "/sys/class/hwmon/hwmon0"));
        assert!(!is_within("/sys/class/hwmon/hwmon1", "/sys/class/hwmon/hwmon10/temp1_input"));
        assert!(!is_within("", "/sys/class/hwmon/hwmon0"));
    }

    #[test]
    fn test_split_filename() {
        assert_eq!(
            split_filename("/sys/class/hwmon/hwmon0/temp1_input"),
            Some(("/sys/class/hwmon/hwmon0", "temp1_input"))
        );
        assert_eq!(split_filename("temp1_input"), Some(("", "temp1_input")));
        assert_eq!(split_filename("/sys/class/hwmon/hwmon0/"), None);
        assert_eq!(split_filename("/sys/class/hwmon/.."), None);
        assert_eq!(split_filename(""), None);
    }

    #[test]
    fn test_candidates_longest_prefix_first() {
        assert_eq!(feature_name_candidates("temp1_input"), vec!["temp1", "temp1_input"]);
        assert_eq!(
            feature_name_candidates("temp1_crit_alarm"),
            vec!["temp1_crit", "temp1", "temp1_crit_alarm"]
        );
        assert_eq!(feature_name_candidates("cpu0_vid"), vec!["cpu0", "cpu0_vid"]);
        assert_eq!(feature_name_candidates("intrusion0"), vec!["intrusion0"]);
        assert_eq!(feature_name_candidates("_x"), vec!["_x"]);
    }

    #[test]
    fn test_first_candidate_is_before_last_underscore() {
        for segment in ["temp1_input", "in0_max_alarm", "fan2_beep", "beep_enable", "pwm1_auto_point1_temp"] {
            let last = segment.rfind('_').unwrap();
            assert_eq!(feature_name_candidates(segment)[0], &segment[..last], "{}", segment);
            assert_eq!(*feature_name_candidates(segment).last().unwrap(), segment);
        }
    }
}
