use std::collections::HashMap;

use crate::error::CollaboratorError;
use crate::model::Account;

/// Looks accounts up by username and optional domain.
///
/// `domain == None` asks for a local account. Implementations must not
/// cache on behalf of the formatter; `Ok(None)` means the account does not
/// exist, `Err` means the directory itself is unavailable.
pub trait AccountResolver {
    fn resolve(
        &self,
        username: &str,
        domain: Option<&str>,
    ) -> Result<Option<Account>, CollaboratorError>;
}

impl<T: AccountResolver + ?Sized> AccountResolver for &T {
    fn resolve(
        &self,
        username: &str,
        domain: Option<&str>,
    ) -> Result<Option<Account>, CollaboratorError> {
        (**self).resolve(username, domain)
    }
}

/// In-memory account directory keyed case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct AccountDirectory {
    accounts: HashMap<(String, Option<String>), Account>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, account: Account) {
        let key = directory_key(&account.username, account.domain.as_deref());
        self.accounts.insert(key, account);
    }

    pub fn with(mut self, account: Account) -> Self {
        self.insert(account);
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountResolver for AccountDirectory {
    fn resolve(
        &self,
        username: &str,
        domain: Option<&str>,
    ) -> Result<Option<Account>, CollaboratorError> {
        Ok(self
            .accounts
            .get(&directory_key(username, domain))
            .cloned())
    }
}

fn directory_key(username: &str, domain: Option<&str>) -> (String, Option<String>) {
    (
        username.to_lowercase(),
        domain.map(|domain| domain.to_lowercase()),
    )
}

#[cfg(test)]
mod tests {
    use super::{AccountDirectory, AccountResolver};
    use crate::model::Account;

    #[test]
    fn lookups_ignore_case() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let directory = AccountDirectory::new()
            .with(Account::local("Alice"))
            .with(Account::remote("bob", "Remote.Example"));

        assert_eq!(directory.len(), 2);
        assert!(directory.resolve("alice", None)?.is_some());
        assert!(directory.resolve("ALICE", None)?.is_some());
        assert!(directory.resolve("alice", Some("remote.example"))?.is_none());
        assert!(directory.resolve("Bob", Some("remote.EXAMPLE"))?.is_some());
        Ok(())
    }
}
