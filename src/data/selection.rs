use std::collections::BTreeSet;

use thiserror::Error;

use super::catalog::ClassCatalog;

// ---------------------------------------------------------------------------
// Selection – the user-chosen classes and years
// ---------------------------------------------------------------------------

/// Upper bound on simultaneously selected years.
pub const MAX_YEARS: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select at most {max} years ({selected} selected).")]
    TooManyYears { selected: usize, max: usize },
}

/// Transient selection state, re-derived on every interaction.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub classes: BTreeSet<u16>,
    pub years: BTreeSet<i32>,
}

impl Selection {
    /// Check the year cap. Callers must not aggregate on `Err`.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.years.len() > MAX_YEARS {
            return Err(SelectionError::TooManyYears {
                selected: self.years.len(),
                max: MAX_YEARS,
            });
        }
        Ok(())
    }

    /// Selected years in ascending order.
    pub fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }

    /// Selected class codes that exist in the catalog, ascending.
    ///
    /// Codes outside the legend are dropped here so the per-class aggregator
    /// never queries them.
    pub fn known_classes(&self, catalog: &ClassCatalog) -> Vec<u16> {
        self.classes
            .iter()
            .copied()
            .filter(|code| catalog.contains(*code))
            .collect()
    }

    pub fn toggle_class(&mut self, code: u16) {
        if !self.classes.remove(&code) {
            self.classes.insert(code);
        }
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_allows_five_years_and_rejects_six() {
        let mut selection = Selection::default();
        for year in 2019..=2023 {
            selection.toggle_year(year);
        }
        assert!(selection.validate().is_ok());

        selection.toggle_year(2018);
        assert_eq!(
            selection.validate(),
            Err(SelectionError::TooManyYears {
                selected: 6,
                max: MAX_YEARS
            })
        );
    }

    #[test]
    fn unknown_codes_are_dropped() {
        let catalog = ClassCatalog::builtin();
        let mut selection = Selection::default();
        selection.toggle_class(24);
        selection.toggle_class(7); // not in the legend
        assert_eq!(selection.known_classes(&catalog), vec![24]);
    }

    #[test]
    fn toggling_twice_round_trips() {
        let mut selection = Selection::default();
        selection.toggle_class(3);
        selection.toggle_class(3);
        assert!(selection.classes.is_empty());
        selection.toggle_year(2023);
        selection.toggle_year(2023);
        assert!(selection.years.is_empty());
    }
}
