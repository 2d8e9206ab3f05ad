//! Session state transitions.
//!
//! A session is either anonymous (no [`SESSION_USER_KEY`] entry) or
//! authenticated (a [`UserInfo`] snapshot under that key).

use tower_sessions::Session;

use crate::error::AppError;
use crate::models::UserInfo;

/// Key for storing the user snapshot in the session.
pub const SESSION_USER_KEY: &str = "user";

/// Anonymous → Authenticated. Cycles the session id before storing the
/// snapshot so a pre-login id can't be reused.
pub async fn establish(session: &Session, user: &UserInfo) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user).await?;
    Ok(())
}

/// The authenticated snapshot, if any.
pub async fn current_user(session: &Session) -> Result<Option<UserInfo>, AppError> {
    Ok(session.get(SESSION_USER_KEY).await?)
}

/// Authenticated → Anonymous. Deletes the session record from the store.
pub async fn destroy(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use store::Role;
    use tower_sessions::MemoryStore;
    use uuid::Uuid;

    fn snapshot() -> UserInfo {
        UserInfo {
            id: Uuid::new_v4(),
            full_name: "A".to_string(),
            email: "a@x.com".to_string(),
            branch: "CS".to_string(),
            role: Role::Student,
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(current_user(&session).await.unwrap(), None);

        let user = snapshot();
        establish(&session, &user).await.unwrap();
        assert_eq!(current_user(&session).await.unwrap(), Some(user));

        destroy(&session).await.unwrap();
        assert_eq!(current_user(&session).await.unwrap(), None);
    }
}
