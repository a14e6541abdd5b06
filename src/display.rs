use ratatui::style::Color;

use crate::dataset::{Field, Record};

/// The two independent pieces of selection state: the column the filter
/// runs over and the column of the most recently selected cell. They can
/// diverge, a user can filter on one field while having last clicked a
/// cell in another. Replaced wholesale on every transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub filter_field: Field,
    pub last_clicked: Option<Field>,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            filter_field: Field::Id,
            last_clicked: None,
        }
    }
}

impl Selection {
    pub fn with_filter_field(self, field: Field) -> Self {
        Selection {
            filter_field: field,
            ..self
        }
    }

    pub fn with_clicked(self, field: Field) -> Self {
        Selection {
            last_clicked: Some(field),
            ..self
        }
    }
}

/// Per-field rendering policy. The ip column is masked unless it was the
/// last column a cell was clicked in; which column the *filter* runs over
/// plays no part in the decision.
pub fn render_cell(field: Field, record: &Record, selection: &Selection) -> String {
    match field {
        Field::IpAddress if selection.last_clicked != Some(Field::IpAddress) => String::new(),
        Field::Balance => format_currency(record.balance),
        _ => field.value_of(record),
    }
}

/// US-style currency: dollar sign, thousands separators, exactly two
/// fractional digits, leading minus for negative amounts.
pub fn format_currency(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, cents) = rounded
        .split_once('.')
        .unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (pos, chr) in whole.chars().enumerate() {
        if pos > 0 && (whole.len() - pos) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(chr);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Border color of the field picker, keyed on the current filter field.
pub fn select_color(field: Field) -> Color {
    match field {
        Field::FirstName => Color::Blue,
        Field::IpAddress => Color::Red,
        Field::LastName => Color::Green,
        Field::Balance => Color::LightGreen,
        _ => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> Record {
        Record {
            id: 7,
            first_name: "Ann".to_string(),
            last_name: "Pennock".to_string(),
            ip_address: "10.14.220.3".to_string(),
            balance: 1234.5,
        }
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(0.99), "$0.99");
        assert_eq!(format_currency(1000000.0), "$1,000,000.00");
        assert_eq!(format_currency(-38204.66), "-$38,204.66");
    }

    #[test]
    fn plain_fields_render_raw() {
        let r = record();
        let s = Selection::default();
        assert_eq!(render_cell(Field::Id, &r, &s), "7");
        assert_eq!(render_cell(Field::FirstName, &r, &s), "Ann");
        assert_eq!(render_cell(Field::LastName, &r, &s), "Pennock");
    }

    #[test]
    fn ip_is_masked_until_its_column_is_clicked() {
        let r = record();
        let mut s = Selection::default();
        assert_eq!(render_cell(Field::IpAddress, &r, &s), "");

        s = s.with_clicked(Field::FirstName);
        assert_eq!(render_cell(Field::IpAddress, &r, &s), "");

        s = s.with_clicked(Field::IpAddress);
        assert_eq!(render_cell(Field::IpAddress, &r, &s), "10.14.220.3");
    }

    #[test]
    fn masking_ignores_the_filter_field() {
        let r = record();
        // Filtering on the ip column alone does not unmask it
        let s = Selection::default().with_filter_field(Field::IpAddress);
        assert_eq!(render_cell(Field::IpAddress, &r, &s), "");

        // And moving the filter elsewhere after a click does not re-mask
        let s = s.with_clicked(Field::IpAddress).with_filter_field(Field::Balance);
        assert_eq!(render_cell(Field::IpAddress, &r, &s), "10.14.220.3");
    }

    #[test]
    fn balance_renders_as_currency() {
        let r = record();
        let s = Selection::default();
        assert_eq!(render_cell(Field::Balance, &r, &s), "$1,234.50");
    }
}
