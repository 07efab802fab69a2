use farmacontrol_core::{BranchId, DomainError, DomainResult, Entity, UserId};

use crate::branch::Branch;
use crate::user::{BranchScope, Role, User};

/// Branches and staff, validated for referential integrity at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    branches: Vec<Branch>,
    users: Vec<User>,
}

impl Directory {
    /// Rejects duplicate ids and users scoped to an unknown branch.
    pub fn new(branches: Vec<Branch>, users: Vec<User>) -> DomainResult<Self> {
        ensure_unique(&branches, "branch")?;
        ensure_unique(&users, "user")?;
        for u in &users {
            if let BranchScope::Branch(b) = &u.branch {
                if !branches.iter().any(|br| &br.id == b) {
                    return Err(DomainError::not_found(format!("branch {b} for user {}", u.id)));
                }
            }
        }
        Ok(Self { branches, users })
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn branch(&self, id: &BranchId) -> Option<&Branch> {
        self.branches.iter().find(|b| &b.id == id)
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn branch_name(&self, id: &BranchId) -> Option<&str> {
        self.branch(id).map(|b| b.name.as_str())
    }

    pub fn active_branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter().filter(|b| b.is_active())
    }

    /// Staff who can work at `branch`, including users scoped to all branches.
    pub fn staff_of<'a>(&'a self, branch: &'a BranchId) -> impl Iterator<Item = &'a User> + 'a {
        self.users.iter().filter(move |u| u.branch.allows(branch))
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &User> {
        self.users.iter().filter(move |u| u.role == role)
    }
}

fn ensure_unique<T: Entity>(items: &[T], what: &str) -> DomainResult<()> {
    for (i, item) in items.iter().enumerate() {
        if items[..i].iter().any(|o| o.id() == item.id()) {
            return Err(DomainError::invariant(format!("duplicate {what} id {}", item.id())));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::BranchStatus;
    use crate::user::UserStatus;
    use chrono::NaiveDate;
    use farmacontrol_core::Money;

    fn branch(id: &str, status: BranchStatus) -> Branch {
        Branch {
            id: BranchId::new(id).unwrap(),
            name: format!("Farmacia {id}"),
            address: "Av. Principal 123".to_string(),
            phone: "+55 11 3456-7890".to_string(),
            email: format!("{id}@farmacia.com"),
            manager: "Roberto Silva".to_string(),
            status,
            products_count: 100,
            total_sales: Money::from_cents(100_000),
            monthly_sales: Money::from_cents(10_000),
        }
    }

    fn user(id: &str, role: Role, scope: BranchScope) -> User {
        User {
            id: UserId::new(id).unwrap(),
            name: format!("User {id}"),
            email: format!("{id}@farmacia.com"),
            role,
            branch: scope,
            status: UserStatus::Active,
            last_login: NaiveDate::from_ymd_opt(2025, 2, 2)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        }
    }

    fn scoped(id: &str) -> BranchScope {
        BranchScope::Branch(BranchId::new(id).unwrap())
    }

    fn directory() -> Directory {
        Directory::new(
            vec![
                branch("f1", BranchStatus::Active),
                branch("f2", BranchStatus::Inactive),
            ],
            vec![
                user("u1", Role::Admin, BranchScope::All),
                user("u2", Role::Manager, scoped("f1")),
                user("u3", Role::Pharmacist, scoped("f1")),
                user("u4", Role::Pharmacist, scoped("f2")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn staff_includes_all_scope_users() {
        let dir = directory();
        let f2 = BranchId::new("f2").unwrap();
        let ids: Vec<&str> = dir.staff_of(&f2).map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u4"]);
    }

    #[test]
    fn role_and_status_queries() {
        let dir = directory();
        assert_eq!(dir.with_role(Role::Pharmacist).count(), 2);
        let active: Vec<&str> = dir.active_branches().map(|b| b.id.as_str()).collect();
        assert_eq!(active, vec!["f1"]);
        assert_eq!(dir.branch_name(&BranchId::new("f1").unwrap()), Some("Farmacia f1"));
    }

    #[test]
    fn rejects_unknown_branch_scope() {
        let err = Directory::new(
            vec![branch("f1", BranchStatus::Active)],
            vec![user("u9", Role::Cashier, scoped("f9"))],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn rejects_duplicate_users() {
        let err = Directory::new(
            vec![branch("f1", BranchStatus::Active)],
            vec![
                user("u1", Role::Admin, BranchScope::All),
                user("u1", Role::Cashier, BranchScope::All),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
