use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use farmacontrol_core::{BranchId, DomainError, Entity, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Pharmacist,
    Cashier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Pharmacist => "pharmacist",
            Role::Cashier => "cashier",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// Which branches a user works at.
///
/// Serialized as `"all"` or the branch code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BranchScope {
    All,
    Branch(BranchId),
}

impl BranchScope {
    pub fn allows(&self, branch: &BranchId) -> bool {
        match self {
            BranchScope::All => true,
            BranchScope::Branch(b) => b == branch,
        }
    }
}

impl TryFrom<String> for BranchScope {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "all" {
            return Ok(BranchScope::All);
        }
        Ok(BranchScope::Branch(BranchId::new(value)?))
    }
}

impl From<BranchScope> for String {
    fn from(value: BranchScope) -> Self {
        match value {
            BranchScope::All => "all".to_string(),
            BranchScope::Branch(b) => b.into(),
        }
    }
}

/// A staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub branch: BranchScope,
    pub status: UserStatus,
    pub last_login: NaiveDateTime,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
