use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Opaque session token; rotated on login, absent until the first one.
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_joins_first_and_last() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            token: None,
            created_at: Utc::now(),
        };
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "secret-hash".to_owned(),
            token: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).expect("serialize");
        assert!(!json.contains("secret-hash"));
    }
}
