use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum RequestType {
    Leave,
    Permission,
}

/// Fixed catalogue of leave categories. Permission requests carry a free-text
/// label instead and never go through this enum.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum LeaveType {
    Sick,
    Casual,
    Emergency,
    Annual,
    Maternity,
    Paternity,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Pending may move to Approved or Rejected; terminal states absorb and
    /// Pending is never re-entered.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        !self.is_terminal()
            && matches!(next, RequestStatus::Approved | RequestStatus::Rejected)
    }
}

/// Persisted request row. `leave_type` holds a catalogue name for Leave and
/// the free-text permission label for Permission; `from_time`/`to_time` are
/// set only for Permission. `to_date` is always materialized: creation
/// collapses it to `from_date` for single-day leave and permission.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    pub user_id: u64,
    pub emp_id: String,
    pub department: String,
    pub request_type: String,
    pub leave_type: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "09:00")]
    pub from_time: Option<String>,
    #[schema(example = "09:45")]
    pub to_time: Option<String>,
    pub reason: String,
    pub file_url: Option<String>,
    #[schema(example = "Pending")]
    pub status: String,
    pub remark: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Date normalization applied at creation: single-day leave and permission
/// both collapse the end date onto the start date, so a persisted row always
/// carries a concrete `to_date`.
pub fn normalized_to_date(
    request_type: RequestType,
    multi_day: bool,
    from_date: NaiveDate,
    to_date: Option<NaiveDate>,
) -> NaiveDate {
    match request_type {
        RequestType::Leave if multi_day => to_date.unwrap_or(from_date),
        _ => from_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_reach_both_terminal_states() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
    }

    #[test]
    fn terminal_states_absorb() {
        for terminal in [RequestStatus::Approved, RequestStatus::Rejected] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(RequestStatus::Pending));
            assert!(!terminal.can_transition_to(RequestStatus::Approved));
            assert!(!terminal.can_transition_to(RequestStatus::Rejected));
        }
    }

    #[test]
    fn pending_cannot_reenter_pending() {
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
        assert!(!RequestStatus::Pending.is_terminal());
    }

    #[test]
    fn status_round_trips_through_strings() {
        use std::str::FromStr;
        assert_eq!(RequestStatus::Pending.to_string(), "Pending");
        assert_eq!(
            RequestStatus::from_str("Approved").unwrap(),
            RequestStatus::Approved
        );
        assert!(RequestStatus::from_str("approved").is_err());
    }

    #[test]
    fn single_day_leave_collapses_end_date() {
        let from = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();

        // single-day leave and permission both pin to_date to from_date
        assert_eq!(
            normalized_to_date(RequestType::Leave, false, from, Some(later)),
            from
        );
        assert_eq!(
            normalized_to_date(RequestType::Permission, false, from, None),
            from
        );

        // multi-day leave keeps the chosen end date
        assert_eq!(
            normalized_to_date(RequestType::Leave, true, from, Some(later)),
            later
        );
    }

    #[test]
    fn leave_catalogue_is_closed() {
        use std::str::FromStr;
        assert_eq!(LeaveType::from_str("Sick").unwrap(), LeaveType::Sick);
        assert_eq!(LeaveType::from_str("Paternity").unwrap(), LeaveType::Paternity);
        assert!(LeaveType::from_str("Sabbatical").is_err());
    }
}
