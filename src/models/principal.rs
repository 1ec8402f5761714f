//! The authenticated caller, as supplied by the identity service.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::PersonId;

/// Role of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May view everyone's data and reload configuration.
    Admin,
    /// May view only their own wage data.
    Employee,
}

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The person the principal is linked to.
    pub person_id: PersonId,
    /// The principal's role.
    pub role: Role,
}

impl Principal {
    /// Returns true if the principal may view wage data for `person`.
    ///
    /// # Example
    ///
    /// ```
    /// use ob_engine::models::{PersonId, Principal, Role};
    ///
    /// let employee = Principal { person_id: PersonId(2), role: Role::Employee };
    /// assert!(employee.can_view(PersonId(2)));
    /// assert!(!employee.can_view(PersonId(3)));
    /// ```
    pub fn can_view(&self, person: PersonId) -> bool {
        self.role == Role::Admin || self.person_id == person
    }

    /// Like [`Principal::can_view`] but returns a `Forbidden` error.
    pub fn ensure_can_view(&self, person: PersonId) -> EngineResult<()> {
        if self.can_view(person) {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                message: format!(
                    "person {} may not view wage data for person {}",
                    self.person_id, person
                ),
            })
        }
    }

    /// Returns an error unless the principal is an admin.
    pub fn ensure_admin(&self) -> EngineResult<()> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Employee => Err(EngineError::Forbidden {
                message: "admin role required".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_view_anyone() {
        let admin = Principal {
            person_id: PersonId(1),
            role: Role::Admin,
        };
        assert!(admin.ensure_can_view(PersonId(9)).is_ok());
        assert!(admin.ensure_admin().is_ok());
    }

    #[test]
    fn test_employee_is_forbidden_for_others() {
        let employee = Principal {
            person_id: PersonId(4),
            role: Role::Employee,
        };
        assert!(matches!(
            employee.ensure_can_view(PersonId(5)),
            Err(EngineError::Forbidden { .. })
        ));
        assert!(employee.ensure_admin().is_err());
    }
}
