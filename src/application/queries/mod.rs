// src/application/queries/mod.rs
pub mod audit;
pub mod clearances;
pub mod leads;
pub mod orders;
pub mod quotations;
pub mod roles;
pub mod shipments;
pub mod users;

use crate::domain::listing::DateWindow;
use crate::domain::workflow::EntityStatus;
use chrono::NaiveDate;

/// Listing filters are forgiving: empty strings, the `"all"` sentinel,
/// and unparseable values all mean "do not filter".
pub(crate) fn filter_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

pub(crate) fn filter_status<S: EntityStatus>(value: Option<&str>) -> Option<S> {
    filter_text(value).and_then(|raw| S::parse(&raw).ok())
}

pub(crate) fn filter_date(value: Option<&str>) -> Option<NaiveDate> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

pub(crate) fn date_window(
    on: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> DateWindow {
    DateWindow {
        on: filter_date(on),
        from: filter_date(from),
        to: filter_date(to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::LeadStatus;

    #[test]
    fn all_sentinel_and_blank_mean_no_filter() {
        assert_eq!(filter_text(Some("all")), None);
        assert_eq!(filter_text(Some("All")), None);
        assert_eq!(filter_text(Some("  ")), None);
        assert_eq!(filter_text(Some("acme")), Some("acme".to_string()));
    }

    #[test]
    fn unparseable_status_filters_are_dropped() {
        assert_eq!(filter_status::<LeadStatus>(Some("nonsense")), None);
        assert_eq!(filter_status::<LeadStatus>(Some("all")), None);
        assert_eq!(
            filter_status::<LeadStatus>(Some("qualified")),
            Some(LeadStatus::Qualified)
        );
    }

    #[test]
    fn dates_parse_iso_or_not_at_all() {
        assert_eq!(
            filter_date(Some("2026-03-01")),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(filter_date(Some("01/03/2026")), None);
        assert_eq!(filter_date(None), None);
    }
}
