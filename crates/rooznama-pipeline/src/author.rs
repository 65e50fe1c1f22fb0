//! Author Resolver
//!
//! Maps an optional preferred author onto a valid active account:
//! preferred id → first active admin → first active account → no author.
//! The resolver never creates accounts and never fails; lookup errors are
//! logged and fall through to the next step, and "no active account at all"
//! is a valid terminal outcome because authorship is optional.

use rooznama_core::store::AuthorDirectory;

pub struct AuthorResolver<'a> {
    directory: &'a dyn AuthorDirectory,
}

impl<'a> AuthorResolver<'a> {
    pub fn new(directory: &'a dyn AuthorDirectory) -> Self {
        Self { directory }
    }

    pub async fn resolve(&self, preferred: Option<i64>) -> Option<i64> {
        if let Some(id) = preferred {
            match self.directory.find_active(id).await {
                Ok(Some(author)) => return Some(author.id),
                Ok(None) => {
                    tracing::debug!(author_id = id, "Preferred author missing or inactive");
                }
                Err(e) => {
                    tracing::warn!(author_id = id, error = %e, "Preferred author lookup failed");
                }
            }
        }

        match self.directory.first_active_admin().await {
            Ok(Some(author)) => return Some(author.id),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Admin author lookup failed");
            }
        }

        match self.directory.first_active().await {
            Ok(Some(author)) => Some(author.id),
            Ok(None) => {
                tracing::warn!("No active account found, publishing without author");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Active author lookup failed, publishing without author");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticAuthors;

    #[tokio::test]
    async fn test_preferred_active_author_wins() {
        let directory = StaticAuthors::new()
            .with_user(3, true, false)
            .with_user(7, true, true);
        let resolver = AuthorResolver::new(&directory);

        assert_eq!(resolver.resolve(Some(3)).await, Some(3));
    }

    #[tokio::test]
    async fn test_inactive_preferred_falls_to_admin() {
        let directory = StaticAuthors::new()
            .with_user(3, false, false)
            .with_user(9, true, true)
            .with_user(5, true, true);
        let resolver = AuthorResolver::new(&directory);

        // First active admin by ascending id
        assert_eq!(resolver.resolve(Some(3)).await, Some(5));
    }

    #[tokio::test]
    async fn test_no_admin_falls_to_first_active() {
        let directory = StaticAuthors::new()
            .with_user(8, true, false)
            .with_user(2, true, false);
        let resolver = AuthorResolver::new(&directory);

        assert_eq!(resolver.resolve(None).await, Some(2));
    }

    #[tokio::test]
    async fn test_no_accounts_resolves_to_none() {
        let directory = StaticAuthors::new();
        let resolver = AuthorResolver::new(&directory);

        assert_eq!(resolver.resolve(None).await, None);
        assert_eq!(resolver.resolve(Some(42)).await, None);
    }

    #[tokio::test]
    async fn test_lookup_errors_degrade_to_none() {
        let directory = StaticAuthors::failing();
        let resolver = AuthorResolver::new(&directory);

        assert_eq!(resolver.resolve(Some(1)).await, None);
    }
}
