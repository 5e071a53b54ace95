use crate::config::CleanerSettings;
use crate::dataset::rendered;
use crate::error::Result;
use crate::pipeline::{Stage, StageOutput};
use crate::report::ChangeReport;
use polars::prelude::*;

pub const STAGE: &str = "phone_numbers";

/// Normalize-or-reject rule for one phone field.
///
/// Every non-digit is stripped. If exactly `digits` digits remain they are
/// the result; a missing value or any other count gives `sentinel`. No
/// country code is inferred and short numbers are never padded, so applying
/// the rule to its own output changes nothing.
pub fn validate_phone(value: Option<&str>, digits: usize, sentinel: &str) -> String {
    let Some(value) = value else {
        return sentinel.to_owned();
    };
    let stripped: String = value.chars().filter(char::is_ascii_digit).collect();
    if stripped.len() == digits {
        stripped
    } else {
        sentinel.to_owned()
    }
}

#[derive(Debug, Clone)]
pub struct ValidatePhoneNumbers {
    pub column: String,
    pub digits: usize,
    pub sentinel: String,
}

impl Default for ValidatePhoneNumbers {
    fn default() -> Self {
        Self::from_settings(&CleanerSettings::default())
    }
}

impl ValidatePhoneNumbers {
    pub fn from_settings(settings: &CleanerSettings) -> Self {
        Self {
            column: settings.phone_column.clone(),
            digits: settings.phone_digits,
            sentinel: settings.missing_contact.clone(),
        }
    }

    /// Rewrites the phone column as text. A dataset without the column is
    /// returned untouched with a skipped report.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten column cannot replace the old one.
    pub fn validate(&self, mut df: DataFrame) -> Result<(DataFrame, ChangeReport)> {
        let column = df
            .get_column_index(&self.column)
            .and_then(|idx| df.select_at_idx(idx));
        let Some(column) = column else {
            tracing::debug!("no '{}' column, phone validation skipped", self.column);
            let report =
                ChangeReport::skipped(STAGE, format!("no '{}' column present", self.column));
            return Ok((df, report));
        };

        let before = rendered(column);
        let after: Vec<String> = before
            .iter()
            .map(|v| validate_phone(v.as_deref(), self.digits, &self.sentinel))
            .collect();
        let changed = before
            .iter()
            .zip(&after)
            .filter(|(b, a)| b.as_deref() != Some(a.as_str()))
            .count();

        let validated = Series::new(self.column.as_str().into(), after);
        df.with_column(validated.clone())?;

        let mut report = ChangeReport::new(STAGE)
            .with_rows((0..df.height()).collect())
            .with_columns(vec![self.column.clone()])
            .with_preview(DataFrame::new(vec![Column::from(validated)])?);
        report.cells_changed = changed;
        Ok((df, report))
    }
}

impl Stage for ValidatePhoneNumbers {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn description(&self) -> String {
        format!(
            "Keep '{}' values with exactly {} digits, otherwise write '{}'",
            self.column, self.digits, self.sentinel
        )
    }

    fn apply(&self, dataset: DataFrame) -> Result<StageOutput> {
        Ok(self.validate(dataset)?.into())
    }
}
