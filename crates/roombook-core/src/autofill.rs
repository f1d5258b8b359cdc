//! Target-user lookup for administrators booking on behalf of a student.
//!
//! Only exact matches resolve: NRP by plain equality, name by case-insensitive
//! equality. Prefixes and near misses leave the target unset.

use crate::types::User;

/// Case-insensitive name equality, also used for booking ownership
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Find the user whose NRP equals `nrp` exactly
#[must_use]
pub fn find_by_nrp<'a>(users: &'a [User], nrp: &str) -> Option<&'a User> {
    users.iter().find(|u| u.nrp == nrp)
}

/// Find the user whose name equals `name`, ignoring case
#[must_use]
pub fn find_by_name<'a>(users: &'a [User], name: &str) -> Option<&'a User> {
    users.iter().find(|u| names_match(&u.name, name))
}

/// State of the NRP/name pair on the admin booking form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoFill {
    nrp_input: String,
    name_input: String,
    target: Option<User>,
}

impl AutoFill {
    /// Empty form state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Type into the NRP field. A hit fills the name field.
    pub fn set_nrp(&mut self, users: &[User], value: impl Into<String>) -> Option<&User> {
        self.nrp_input = value.into();
        self.target = find_by_nrp(users, &self.nrp_input).cloned();
        if let Some(user) = &self.target {
            self.name_input.clone_from(&user.name);
        }
        self.target.as_ref()
    }

    /// Type into the name field. A hit fills the NRP field.
    pub fn set_name(&mut self, users: &[User], value: impl Into<String>) -> Option<&User> {
        self.name_input = value.into();
        self.target = find_by_name(users, &self.name_input).cloned();
        if let Some(user) = &self.target {
            self.nrp_input.clone_from(&user.nrp);
        }
        self.target.as_ref()
    }

    /// Current NRP field contents
    #[must_use]
    pub fn nrp(&self) -> &str {
        &self.nrp_input
    }

    /// Current name field contents
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name_input
    }

    /// Resolved target user, if any
    #[must_use]
    pub const fn target(&self) -> Option<&User> {
        self.target.as_ref()
    }

    /// Submission is only possible once a target user is resolved
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.target.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Role;
    use pretty_assertions::assert_eq;

    fn users() -> Vec<User> {
        vec![
            User {
                id: 1,
                name: "Alice".to_string(),
                nrp: "123".to_string(),
                role: Role::Student,
                department: String::new(),
                major: String::new(),
            },
            User {
                id: 2,
                name: "Bob Santoso".to_string(),
                nrp: "1234".to_string(),
                role: Role::Student,
                department: String::new(),
                major: String::new(),
            },
        ]
    }

    #[test]
    fn test_nrp_fills_name() {
        let users = users();
        let mut form = AutoFill::new();

        assert_eq!(form.set_nrp(&users, "123").map(|u| u.id), Some(1));
        assert_eq!(form.name(), "Alice");
        assert!(form.can_submit());
    }

    #[test]
    fn test_name_any_case_fills_nrp() {
        let users = users();
        for typed in ["alice", "ALICE", "aLiCe"] {
            let mut form = AutoFill::new();
            assert_eq!(form.set_name(&users, typed).map(|u| u.id), Some(1));
            assert_eq!(form.nrp(), "123");
            assert_eq!(form.name(), typed);
        }
    }

    #[test]
    fn test_unknown_nrp_resolves_nothing() {
        let users = users();
        let mut form = AutoFill::new();

        assert!(form.set_nrp(&users, "999").is_none());
        assert!(!form.can_submit());
    }

    #[test]
    fn test_prefix_does_not_match() {
        let users = users();
        let mut form = AutoFill::new();

        assert!(form.set_nrp(&users, "12").is_none());
        assert!(form.set_name(&users, "Bob").is_none());
    }

    #[test]
    fn test_miss_after_hit_clears_target() {
        let users = users();
        let mut form = AutoFill::new();

        form.set_nrp(&users, "1234");
        assert_eq!(form.target().unwrap().name, "Bob Santoso");

        form.set_nrp(&users, "12345");
        assert!(form.target().is_none());
        // The name field keeps what was filled before.
        assert_eq!(form.name(), "Bob Santoso");
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("Alice", "alice"));
        assert!(!names_match("Alice", "Alice "));
        assert!(!names_match("Alice", "Alicia"));
    }
}
