//! Selection Fixtures

use serde::Deserialize;

use crate::{cart::Selection, evaluator::Usage, fixtures::FixtureError};

/// Selections file
#[derive(Debug, Deserialize)]
pub struct SelectionsFixture {
    /// Services to quote, in display order
    pub selections: Vec<SelectionFixture>,
}

/// Selection Fixture
#[derive(Debug, Deserialize)]
pub struct SelectionFixture {
    /// Catalog service name
    pub service: String,

    /// Expected visits
    #[serde(default = "default_visits")]
    pub visits: u32,

    /// Months the visits are spread over
    pub horizon_months: Option<u32>,
}

const fn default_visits() -> u32 {
    1
}

impl From<SelectionFixture> for Selection {
    fn from(fixture: SelectionFixture) -> Self {
        Selection {
            service_name: fixture.service,
            usage: Usage {
                visits: fixture.visits,
                horizon_months: fixture.horizon_months,
            },
        }
    }
}

impl SelectionsFixture {
    /// Parse a selections fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the document does not match the selections format.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Convert into selections, keeping file order.
    pub fn into_selections(self) -> Vec<Selection> {
        self.selections.into_iter().map(Selection::from).collect()
    }
}

/// Parse a selection in the form `NAME[=VISITS][@MONTHS]`.
///
/// `Underarms=12@6` selects 12 visits to Underarms over six months; a bare
/// `Underarms` selects a single visit. Names may contain spaces.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidSelection`] if the name is empty or a count
/// is not a whole number.
pub fn parse_selection(s: &str) -> Result<Selection, FixtureError> {
    let invalid = || FixtureError::InvalidSelection(s.to_string());

    let (rest, horizon) = match s.rsplit_once('@') {
        Some((rest, months)) => (rest, Some(parse_count(months).ok_or_else(invalid)?)),
        None => (s, None),
    };

    let (name, visits) = match rest.rsplit_once('=') {
        Some((name, visits)) => (name, parse_count(visits).ok_or_else(invalid)?),
        None => (rest, 1),
    };

    let name = name.trim();

    if name.is_empty() {
        return Err(invalid());
    }

    Ok(Selection {
        service_name: name.to_string(),
        usage: Usage {
            visits,
            horizon_months: horizon,
        },
    })
}

fn parse_count(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn bare_name_is_single_visit() -> TestResult {
        let selection = parse_selection("Underarms")?;

        assert_eq!(selection, Selection::single("Underarms"));

        Ok(())
    }

    #[test]
    fn visits_and_horizon() -> TestResult {
        let selection = parse_selection("Underarms=12@6")?;

        assert_eq!(selection, Selection::new("Underarms", 12).over_months(6));

        Ok(())
    }

    #[test]
    fn horizon_without_visits() -> TestResult {
        let selection = parse_selection("Brazilian@12")?;

        assert_eq!(selection, Selection::single("Brazilian").over_months(12));

        Ok(())
    }

    #[test]
    fn names_keep_spaces_and_hyphens() -> TestResult {
        let selection = parse_selection("Arms - Full=4")?;

        assert_eq!(selection.service_name, "Arms - Full");
        assert_eq!(selection.usage.visits, 4);

        Ok(())
    }

    #[test]
    fn zero_visits_are_left_for_quote_validation() -> TestResult {
        let selection = parse_selection("Lip=0")?;

        assert_eq!(selection.usage.visits, 0);

        Ok(())
    }

    #[test]
    fn rejects_bad_counts() {
        for input in ["Lip=two", "Lip=-1", "Lip@", "Lip=3@x"] {
            assert!(
                matches!(parse_selection(input), Err(FixtureError::InvalidSelection(s)) if s == input),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            parse_selection(" =3"),
            Err(FixtureError::InvalidSelection(_))
        ));
    }

    #[test]
    fn selections_fixture_defaults_to_single_visit() -> TestResult {
        let yaml = r"
selections:
  - service: Underarms
    visits: 12
    horizon_months: 6
  - service: Eyebrows
";

        let selections = SelectionsFixture::from_yaml(yaml)?.into_selections();

        assert_eq!(
            selections,
            [
                Selection::new("Underarms", 12).over_months(6),
                Selection::single("Eyebrows"),
            ]
        );

        Ok(())
    }
}
