use chrono::NaiveDate;
use std::str::FromStr;

use crate::model::department::Department;
use crate::model::request::{LeaveType, RequestType};
use crate::model::role::Role;
use crate::utils::duration::{minutes_between, PERMISSION_MAX_MINUTES};

/// First failed rule of a submission, named by the offending form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

fn fail(field: &'static str, message: impl Into<String>) -> Result<(), ValidationError> {
    Err(ValidationError {
        field,
        message: message.into(),
    })
}

/// In-progress submission form as the client sends it. Leave uses
/// `leave_type` + `multi_day` + dates; Permission uses `permission_type` +
/// the time pair. Nothing is carried over between validation calls.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub emp_id: String,
    pub department: String,
    pub request_type: Option<RequestType>,
    pub leave_type: Option<LeaveType>,
    pub permission_type: String,
    pub multi_day: bool,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub from_time: Option<String>,
    pub to_time: Option<String>,
    pub reason: String,
}

/// Gate a submission before it reaches the store. Checks run in a fixed
/// order and the first failure wins; every call re-validates the whole form.
pub fn validate_submission(role: Role, form: &SubmissionForm) -> Result<(), ValidationError> {
    if role != Role::Staff {
        return fail("role", "Only staff members can submit requests");
    }

    if form.emp_id.trim().is_empty() {
        return fail("emp_id", "Please enter your Employee ID");
    }

    if form.department.trim().is_empty() || Department::from_str(form.department.trim()).is_err() {
        return fail("department", "Please select your department");
    }

    let request_type = match form.request_type {
        Some(t) => t,
        None => return fail("request_type", "Please select a request type"),
    };

    match request_type {
        RequestType::Leave => {
            if form.leave_type.is_none() {
                return fail("leave_type", "Please select leave type");
            }
        }
        RequestType::Permission => {
            if form.permission_type.trim().is_empty() {
                return fail("permission_type", "Please enter permission type");
            }
        }
    }

    let from_date = match form.from_date {
        Some(d) => d,
        None => return fail("from_date", "Please select from date"),
    };

    if request_type == RequestType::Leave && form.multi_day {
        match form.to_date {
            None => return fail("to_date", "Please select to date"),
            Some(to) if to < from_date => {
                return fail("to_date", "From date cannot be after to date")
            }
            Some(_) => {}
        }
    }

    if request_type == RequestType::Permission {
        let (from_time, to_time) = match (form.from_time.as_deref(), form.to_time.as_deref()) {
            (Some(f), Some(t)) => (f, t),
            _ => return fail("from_time", "Please select from and to time"),
        };

        match minutes_between(from_time, to_time) {
            Err(_) => return fail("from_time", "Times must be valid HH:MM (24-hour)"),
            Ok(minutes) if minutes <= 0 => {
                return fail("to_time", "To time must be later than from time")
            }
            Ok(minutes) if minutes > PERMISSION_MAX_MINUTES => {
                return fail("to_time", "Permission cannot exceed 60 minutes")
            }
            Ok(_) => {}
        }
    }

    if form.reason.trim().is_empty() {
        return fail("reason", "Please enter reason");
    }

    Ok(())
}

/// Product rule for rejections: the director must supply a remark. Checked
/// before the store is touched; approvals never require one.
pub fn validate_remark(remark: Option<&str>) -> Result<(), ValidationError> {
    match remark {
        Some(r) if !r.trim().is_empty() => Ok(()),
        _ => fail("remark", "Please provide a reason for rejection"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn leave_form() -> SubmissionForm {
        SubmissionForm {
            emp_id: "EMP-1024".into(),
            department: "IT".into(),
            request_type: Some(RequestType::Leave),
            leave_type: Some(LeaveType::Sick),
            from_date: Some(date(2024, 6, 10)),
            reason: "Flu".into(),
            ..Default::default()
        }
    }

    fn permission_form() -> SubmissionForm {
        SubmissionForm {
            emp_id: "EMP-1024".into(),
            department: "Finance".into(),
            request_type: Some(RequestType::Permission),
            permission_type: "Bank errand".into(),
            from_date: Some(date(2024, 6, 10)),
            from_time: Some("09:00".into()),
            to_time: Some("09:45".into()),
            reason: "Document signing".into(),
            ..Default::default()
        }
    }

    fn field_of(result: Result<(), ValidationError>) -> &'static str {
        result.unwrap_err().field
    }

    #[test]
    fn valid_single_day_leave_passes() {
        assert!(validate_submission(Role::Staff, &leave_form()).is_ok());
    }

    #[test]
    fn valid_permission_passes() {
        assert!(validate_submission(Role::Staff, &permission_form()).is_ok());
    }

    #[test]
    fn directors_cannot_submit() {
        assert_eq!(
            field_of(validate_submission(Role::Director, &leave_form())),
            "role"
        );
    }

    #[test]
    fn employee_id_must_not_be_blank() {
        let mut form = leave_form();
        form.emp_id = "   ".into();
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "emp_id");
    }

    #[test]
    fn department_must_be_a_known_code() {
        let mut form = leave_form();
        form.department = "Legal".into();
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "department"
        );

        form.department = String::new();
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "department"
        );
    }

    #[test]
    fn request_type_is_required() {
        let mut form = leave_form();
        form.request_type = None;
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "request_type"
        );
    }

    #[test]
    fn leave_requires_a_catalogue_type() {
        let mut form = leave_form();
        form.leave_type = None;
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "leave_type"
        );
    }

    #[test]
    fn permission_requires_a_label() {
        let mut form = permission_form();
        form.permission_type = " ".into();
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "permission_type"
        );
    }

    #[test]
    fn from_date_is_required() {
        let mut form = leave_form();
        form.from_date = None;
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "from_date"
        );
    }

    #[test]
    fn multi_day_leave_needs_an_end_date_on_or_after_start() {
        let mut form = leave_form();
        form.multi_day = true;
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "to_date");

        form.to_date = Some(date(2024, 6, 9));
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "to_date");

        form.to_date = Some(date(2024, 6, 10));
        assert!(validate_submission(Role::Staff, &form).is_ok());

        form.to_date = Some(date(2024, 6, 12));
        assert!(validate_submission(Role::Staff, &form).is_ok());
    }

    #[test]
    fn single_day_leave_ignores_missing_end_date() {
        let mut form = leave_form();
        form.multi_day = false;
        form.to_date = None;
        assert!(validate_submission(Role::Staff, &form).is_ok());
    }

    #[test]
    fn permission_requires_both_times() {
        let mut form = permission_form();
        form.to_time = None;
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "from_time"
        );
    }

    #[test]
    fn permission_window_is_capped_at_sixty_minutes() {
        let mut form = permission_form();

        // exactly 60 minutes is allowed
        form.from_time = Some("09:00".into());
        form.to_time = Some("10:00".into());
        assert!(validate_submission(Role::Staff, &form).is_ok());

        // one minute over is not
        form.to_time = Some("10:01".into());
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "to_time");
    }

    #[test]
    fn permission_window_must_be_positive() {
        let mut form = permission_form();
        form.to_time = Some("09:00".into());
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "to_time");

        form.to_time = Some("08:30".into());
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "to_time");
    }

    #[test]
    fn malformed_times_are_rejected() {
        let mut form = permission_form();
        form.to_time = Some("9.30pm".into());
        assert_eq!(
            field_of(validate_submission(Role::Staff, &form)),
            "from_time"
        );
    }

    #[test]
    fn reason_must_not_be_blank() {
        let mut form = permission_form();
        form.reason = "\n  ".into();
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "reason");
    }

    #[test]
    fn first_failure_wins() {
        // Both emp_id and reason are bad; emp_id is checked earlier.
        let mut form = leave_form();
        form.emp_id = String::new();
        form.reason = String::new();
        assert_eq!(field_of(validate_submission(Role::Staff, &form)), "emp_id");
    }

    #[test]
    fn rejection_remark_is_required() {
        assert!(validate_remark(Some("Quota exhausted")).is_ok());
        assert_eq!(validate_remark(Some("  ")).unwrap_err().field, "remark");
        assert_eq!(validate_remark(None).unwrap_err().field, "remark");
    }
}
