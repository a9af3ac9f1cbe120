//! Employee role hierarchy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Employee role, ordered from most to least senior
///
/// The numeric code is stored in the database; a lower code ranks higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeRole {
    Director = 1,
    Manager = 2,
    Analyst = 3,
    Assistant = 4,
}

impl EmployeeRole {
    /// Stored integer code
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Look up a role by its stored code
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::Director),
            2 => Some(Self::Manager),
            3 => Some(Self::Analyst),
            4 => Some(Self::Assistant),
            _ => None,
        }
    }

    /// Whether an employee holding `self` may create or promote to `target`
    pub fn can_assign(self, target: Self) -> bool {
        self.code() <= target.code()
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Director => write!(f, "Director"),
            Self::Manager => write!(f, "Manager"),
            Self::Analyst => write!(f, "Analyst"),
            Self::Assistant => write!(f, "Assistant"),
        }
    }
}

impl FromStr for EmployeeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "director" | "1" => Ok(Self::Director),
            "manager" | "2" => Ok(Self::Manager),
            "analyst" | "3" => Ok(Self::Analyst),
            "assistant" | "4" => Ok(Self::Assistant),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(EmployeeRole::Director.can_assign(EmployeeRole::Director));
        assert!(EmployeeRole::Director.can_assign(EmployeeRole::Assistant));
        assert!(EmployeeRole::Manager.can_assign(EmployeeRole::Analyst));
        assert!(!EmployeeRole::Manager.can_assign(EmployeeRole::Director));
        assert!(!EmployeeRole::Assistant.can_assign(EmployeeRole::Analyst));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("manager".parse::<EmployeeRole>(), Ok(EmployeeRole::Manager));
        assert_eq!("Director".parse::<EmployeeRole>(), Ok(EmployeeRole::Director));
        assert_eq!("4".parse::<EmployeeRole>(), Ok(EmployeeRole::Assistant));
        assert!("intern".parse::<EmployeeRole>().is_err());
    }

    #[test]
    fn test_role_code_roundtrip() {
        assert_eq!(EmployeeRole::from_code(2), Some(EmployeeRole::Manager));
        assert_eq!(EmployeeRole::from_code(0), None);
        assert_eq!(EmployeeRole::Analyst.code(), 3);
    }

    #[test]
    fn test_role_serializes_by_name() {
        let json = serde_json::to_string(&EmployeeRole::Analyst).unwrap();
        assert_eq!(json, "\"Analyst\"");
    }
}
