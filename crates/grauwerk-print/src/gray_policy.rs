// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale policy selection.
//
// Driver ecosystems name the colour switch differently (IPP `print-color-mode`,
// PPD `ColorModel`, vendor keys like `HPColorMode` or `BRMonoColor`) and spell
// the grayscale value differently too. The selector matches probed options
// against three tables: key hints, preferred gray values, and rank rules.
// New vendor conventions are added to the tables, not to the logic.

use tracing::debug;

use grauwerk_core::types::{CapabilityOption, GraySelection, JobOption};

/// The IPP Everywhere colour control.
pub const IPP_COLOR_MODE: &str = "print-color-mode";

/// Value that forces monochrome through [`IPP_COLOR_MODE`].
pub const IPP_MONOCHROME: &str = "monochrome";

/// Lower-cased fragments of option keys that control colour vs. mono.
pub const COLOR_KEY_HINTS: &[&str] = &[
    "print-color-mode",
    "colormodel",
    "colormode",
    "colormgmt",
    "processcolormodel",
    "outputmode",
    "color",
    "ap_colormode",
    "hpcolormode",
    "brmonocolor",
    "cmcolormode",
    "xeroxcolor",
    "epcolormode",
    "printasgray",
];

/// Grayscale value spellings, most preferred first. Matched ignoring ASCII
/// case; the printer's own spelling is what gets submitted.
pub const PREFERRED_GRAY_VALUES: &[&str] = &[
    "Gray",
    "KGray",
    "DeviceGray",
    "Grayscale",
    "Mono",
    "Monochrome",
    "Black",
    "Gray16",
    "DeviceGray16",
    "B&W",
    "BW",
    "BlackWhite",
];

/// Options applied together when no targeted selection exists. Unknown keys
/// are ignored by CUPS filters.
pub const FALLBACK_GRAY_OPTIONS: &[(&str, &str)] = &[
    (IPP_COLOR_MODE, IPP_MONOCHROME),
    ("ColorModel", "Gray"),
    ("ColorModel", "KGray"),
    ("PrintAsGray", "true"),
    ("ColorMode", "Monochrome"),
];

/// Scaling flag requested on every submission.
pub const FIT_TO_PAGE: &str = "fit-to-page";

/// One entry of the rank table. Lower rank wins.
#[derive(Debug, Clone, Copy)]
pub struct RankRule {
    pub name: &'static str,
    /// Tested against the lower-cased base key.
    pub matches: fn(&str) -> bool,
    pub rank: u8,
}

/// Rank for keys no rule matches.
pub const DEFAULT_RANK: u8 = 2;

/// Checked in order; the first matching rule assigns the rank.
pub const RANK_RULES: &[RankRule] = &[
    RankRule {
        name: "ipp-color-mode",
        matches: is_ipp_color_mode,
        rank: 0,
    },
    RankRule {
        name: "ppd-color-model",
        matches: is_ppd_color_model,
        rank: 1,
    },
];

fn is_ipp_color_mode(key: &str) -> bool {
    key.contains(IPP_COLOR_MODE)
}

fn is_ppd_color_model(key: &str) -> bool {
    key.contains("colormodel")
}

/// A colour-control option that offers a grayscale value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayCandidate {
    pub base_key: String,
    pub value: String,
    pub rank: u8,
    /// Position of the matched spelling in [`PREFERRED_GRAY_VALUES`].
    pub preference: usize,
}

impl GrayCandidate {
    fn score(&self) -> (u8, usize) {
        (self.rank, self.preference)
    }
}

/// Rank of a base key according to [`RANK_RULES`].
pub fn rank_of(base_key: &str) -> u8 {
    let lower = base_key.to_ascii_lowercase();
    RANK_RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map_or(DEFAULT_RANK, |rule| rule.rank)
}

/// Whether a base key looks like a colour control.
pub fn is_color_key(base_key: &str) -> bool {
    let lower = base_key.to_ascii_lowercase();
    COLOR_KEY_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Every colour-control option that offers a preferred gray value, in
/// listing order.
pub fn gray_candidates(options: &[CapabilityOption]) -> Vec<GrayCandidate> {
    options
        .iter()
        .filter(|opt| is_color_key(&opt.base_key))
        .filter_map(|opt| {
            let (preference, choice) = PREFERRED_GRAY_VALUES
                .iter()
                .enumerate()
                .find_map(|(i, wanted)| opt.choice(wanted).map(|c| (i, c)))?;
            Some(GrayCandidate {
                base_key: opt.base_key.clone(),
                value: choice.value.clone(),
                rank: rank_of(&opt.base_key),
                preference,
            })
        })
        .collect()
}

/// Pick the option/value pair that forces monochrome output.
///
/// The best candidate wins by `(rank, preference)`; ties keep the first in
/// listing order. With no candidate at all, a queue that advertises the IPP
/// colour mode gets `print-color-mode=monochrome`. Otherwise `None`.
pub fn select_gray(options: &[CapabilityOption]) -> Option<GraySelection> {
    let candidates = gray_candidates(options);

    if let Some(best) = candidates.iter().min_by_key(|c| c.score()) {
        debug!(
            key = %best.base_key,
            value = %best.value,
            rank = best.rank,
            candidates = candidates.len(),
            "selected grayscale option"
        );
        return Some(GraySelection::new(best.base_key.clone(), best.value.clone()));
    }

    let has_ipp_color_mode = options
        .iter()
        .any(|o| is_ipp_color_mode(&o.base_key.to_ascii_lowercase()));
    if has_ipp_color_mode {
        debug!("no gray value advertised, forcing IPP monochrome");
        return Some(GraySelection::new(IPP_COLOR_MODE, IPP_MONOCHROME));
    }

    None
}

/// Assemble the `-o` options for a submission: the selection alone if there
/// is one, otherwise every fallback pair, then always fit-to-page.
pub fn job_options(selection: Option<&GraySelection>) -> Vec<JobOption> {
    let mut options: Vec<JobOption> = match selection {
        Some(sel) => vec![JobOption::from(sel)],
        None => FALLBACK_GRAY_OPTIONS
            .iter()
            .map(|(k, v)| JobOption::pair(*k, *v))
            .collect(),
    };
    options.push(JobOption::flag(FIT_TO_PAGE));
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::parse_options;
    use grauwerk_core::types::Choice;

    fn opt(base_key: &str, values: &[&str]) -> CapabilityOption {
        CapabilityOption {
            key: base_key.to_owned(),
            base_key: base_key.to_owned(),
            choices: values
                .iter()
                .map(|v| Choice {
                    value: (*v).to_owned(),
                    is_default: false,
                })
                .collect(),
        }
    }

    #[test]
    fn ipp_color_mode_outranks_ppd_color_model() {
        let options = vec![
            opt("ColorModel", &["RGB", "Gray"]),
            opt("print-color-mode", &["color", "monochrome"]),
        ];
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new("print-color-mode", "monochrome"))
        );
    }

    #[test]
    fn ppd_color_model_outranks_vendor_keys() {
        let options = vec![
            opt("HPColorMode", &["Color", "Gray"]),
            opt("ColorModel", &["RGB", "Monochrome"]),
        ];
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new("ColorModel", "Monochrome"))
        );
    }

    #[test]
    fn preference_breaks_rank_ties() {
        let options = vec![
            opt("BRMonoColor", &["FullColor", "Mono"]),
            opt("EPColorMode", &["Color", "Grayscale"]),
        ];
        // Grayscale (index 3) beats Mono (index 4) at equal rank.
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new("EPColorMode", "Grayscale"))
        );
    }

    #[test]
    fn equal_scores_keep_first_found() {
        let options = vec![opt("HPColorMode", &["Gray"]), opt("XeroxColor", &["Gray"])];
        assert_eq!(
            select_gray(&options).map(|s| s.key),
            Some("HPColorMode".to_owned())
        );
    }

    #[test]
    fn preference_index_beyond_nine_compares_numerically() {
        // "BlackWhite" is index 11, "Black" index 6.
        let options = vec![opt("CMColorMode", &["BlackWhite"]), opt("XeroxColor", &["Black"])];
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new("XeroxColor", "Black"))
        );
    }

    #[test]
    fn first_preferred_value_within_option_wins() {
        let options = vec![opt("ColorModel", &["Monochrome", "KGray", "Gray"])];
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new("ColorModel", "Gray"))
        );
    }

    #[test]
    fn values_match_ignoring_case_and_keep_advertised_spelling() {
        let options = vec![opt("ColorModel", &["RGB", "gray"])];
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new("ColorModel", "gray"))
        );
    }

    #[test]
    fn no_color_keys_and_no_ipp_mode_selects_nothing() {
        let options = vec![opt("PageSize", &["A4", "Letter"]), opt("Duplex", &["None"])];
        assert_eq!(select_gray(&options), None);
        assert_eq!(select_gray(&[]), None);
    }

    #[test]
    fn ipp_mode_without_gray_value_falls_back_to_monochrome() {
        let options = vec![opt("print-color-mode", &["color", "auto"])];
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new(IPP_COLOR_MODE, IPP_MONOCHROME))
        );
    }

    #[test]
    fn non_color_gray_values_are_ignored() {
        // A gray-looking value on an unrelated key must not be picked.
        let options = vec![opt("InkSet", &["Gray", "Photo"])];
        assert_eq!(select_gray(&options), None);
    }

    #[test]
    fn rank_table_assigns_ranks() {
        assert_eq!(rank_of("print-color-mode"), 0);
        assert_eq!(rank_of("ColorModel"), 1);
        assert_eq!(rank_of("ProcessColorModel"), 1);
        assert_eq!(rank_of("HPColorMode"), DEFAULT_RANK);
    }

    #[test]
    fn selection_from_parsed_listing() {
        let options = parse_options(
            "PageSize/Media Size: *Letter A4\nColorModel/Color Mode: *Color Gray\nResolution/Resolution: *600dpi",
        );
        assert_eq!(
            select_gray(&options),
            Some(GraySelection::new("ColorModel", "Gray"))
        );
    }

    #[test]
    fn selection_is_deterministic() {
        let options = parse_options(
            "ColorModel/Color Mode: RGB Gray KGray\nHPColorMode/Color: Color Grayscale\nprint-color-mode: color",
        );
        let first = select_gray(&options);
        for _ in 0..10 {
            assert_eq!(select_gray(&options), first);
        }
    }

    #[test]
    fn job_options_use_selection_alone() {
        let sel = GraySelection::new("ColorModel", "Gray");
        let rendered: Vec<String> = job_options(Some(&sel)).iter().map(|o| o.to_string()).collect();
        assert_eq!(rendered, vec!["ColorModel=Gray", "fit-to-page"]);
    }

    #[test]
    fn job_options_fallback_covers_vendor_conventions() {
        let rendered: Vec<String> = job_options(None).iter().map(|o| o.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "print-color-mode=monochrome",
                "ColorModel=Gray",
                "ColorModel=KGray",
                "PrintAsGray=true",
                "ColorMode=Monochrome",
                "fit-to-page",
            ]
        );
    }
}
