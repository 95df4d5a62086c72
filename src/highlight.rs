use super::*;

/// Column of the comparison table holding the better value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Intel,
    Amd,
}

impl Side {
    fn selector(self) -> &'static str {
        match self {
            Self::Intel => ".intel-value",
            Self::Amd => ".amd-value",
        }
    }
}

/// Rows whose label mentions power draw or cost prefer the smaller number.
pub fn lower_is_better(spec_name: &str) -> bool {
    let label = spec_name.to_lowercase();
    ["tdp", "price", "msrp"]
        .iter()
        .any(|keyword| label.contains(keyword))
}

pub(crate) struct Highlighter {
    stripper: NumericStripper,
}

impl Highlighter {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            stripper: NumericStripper::new()?,
        })
    }

    /// Decides which side of a row wins. Identical text, ties and
    /// unparsable values produce no winner.
    pub(crate) fn compare(&self, spec_name: &str, intel: &str, amd: &str) -> Option<Side> {
        let (intel, amd) = (intel.trim(), amd.trim());
        if intel == amd {
            return None;
        }
        let intel_num = self.stripper.parse(intel);
        let amd_num = self.stripper.parse(amd);

        if lower_is_better(spec_name) {
            if intel_num < amd_num {
                Some(Side::Intel)
            } else if amd_num < intel_num {
                Some(Side::Amd)
            } else {
                None
            }
        } else if intel_num > amd_num {
            Some(Side::Intel)
        } else if amd_num > intel_num {
            Some(Side::Amd)
        } else {
            None
        }
    }

    /// Walks `.comparison-table tbody tr` and marks the better cell of each
    /// row with `highlight`. Returns how many rows got a highlight.
    pub(crate) fn apply(&self, view: &mut dyn View) -> Result<usize> {
        let mut highlighted = 0;
        for row in view.query_all(".comparison-table tbody tr")? {
            let (Some(intel), Some(amd)) = (
                view.query_first_within(row, Side::Intel.selector())?,
                view.query_first_within(row, Side::Amd.selector())?,
            ) else {
                continue;
            };
            view.remove_class(intel, "highlight")?;
            view.remove_class(amd, "highlight")?;

            let spec_name = view
                .query_first_within(row, ".spec-name")?
                .map(|label| view.text_content(label))
                .unwrap_or_default();
            let winner = self.compare(
                &spec_name,
                &view.text_content(intel),
                &view.text_content(amd),
            );
            match winner {
                Some(Side::Intel) => view.add_class(intel, "highlight")?,
                Some(Side::Amd) => view.add_class(amd, "highlight")?,
                None => continue,
            }
            highlighted += 1;
        }
        Ok(highlighted)
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_is_better_keywords_are_case_insensitive() {
        assert!(lower_is_better("TDP (Base)"));
        assert!(lower_is_better("Launch MSRP"));
        assert!(lower_is_better("Street Price"));
        assert!(!lower_is_better("Cores"));
    }

    #[test]
    fn compare_follows_row_direction() -> Result<()> {
        let highlighter = Highlighter::new()?;
        assert_eq!(highlighter.compare("TDP", "65W", "105W"), Some(Side::Intel));
        assert_eq!(highlighter.compare("Cores", "8", "6"), Some(Side::Intel));
        assert_eq!(highlighter.compare("Price", "$589", "$449"), Some(Side::Amd));
        assert_eq!(highlighter.compare("Boost", "5.0 GHz", "5.7 GHz"), Some(Side::Amd));
        Ok(())
    }

    #[test]
    fn identical_ties_and_nan_highlight_nothing() -> Result<()> {
        let highlighter = Highlighter::new()?;
        assert_eq!(highlighter.compare("Cores", " 8 ", "8"), None);
        assert_eq!(highlighter.compare("Cores", "8 cores", "8"), None);
        assert_eq!(highlighter.compare("Socket", "LGA1700", "AM5"), Some(Side::Intel));
        assert_eq!(highlighter.compare("Memory", "DDR5", "N/A"), None);
        assert_eq!(highlighter.compare("Price", "N/A", "$449"), None);
        Ok(())
    }

    #[test]
    fn apply_marks_better_cells_and_clears_stale_ones() -> Result<()> {
        let mut dom = parse_html(
            r#"<table class="comparison-table"><tbody>
                 <tr><td class="spec-name">TDP</td><td class="intel-value highlight">125W</td><td class="amd-value">120W</td></tr>
                 <tr><td class="spec-name">Cores</td><td class="intel-value">24</td><td class="amd-value highlight">24</td></tr>
                 <tr><td class="spec-name">Notes</td><td class="intel-value">x</td></tr>
               </tbody></table>"#,
        )?;
        let highlighted = Highlighter::new()?.apply(&mut dom)?;
        assert_eq!(highlighted, 1);
        let cells = dom.query_all(".highlight")?;
        assert_eq!(cells.len(), 1);
        assert_eq!(dom.text_content(cells[0]), "120W");
        Ok(())
    }
}
