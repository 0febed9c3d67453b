use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Closed set of department codes a submitter can belong to.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Department {
    #[strum(serialize = "HR")]
    #[serde(rename = "HR")]
    Hr,
    #[strum(serialize = "IT")]
    #[serde(rename = "IT")]
    It,
    Finance,
    Marketing,
    Operations,
    Sales,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn known_codes_parse() {
        assert_eq!(Department::from_str("HR").unwrap(), Department::Hr);
        assert_eq!(Department::from_str("IT").unwrap(), Department::It);
        assert_eq!(Department::from_str("Finance").unwrap(), Department::Finance);
        assert_eq!(Department::from_str("Sales").unwrap(), Department::Sales);
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(Department::from_str("Legal").is_err());
        assert!(Department::from_str("").is_err());
    }

    #[test]
    fn renders_back_to_code() {
        assert_eq!(Department::Hr.to_string(), "HR");
        assert_eq!(Department::Operations.to_string(), "Operations");
    }
}
