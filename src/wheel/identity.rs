use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

/// 抽奖/兑奖的分区键: 已登录用户或匿名会话, 二者必居其一
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Identity {
    User(i64),
    Session(String),
}

impl Identity {
    /// Stable key used by the pending-redemption store.
    pub fn key(&self) -> String {
        match self {
            Identity::User(id) => format!("user:{id}"),
            Identity::Session(key) => format!("session:{key}"),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Identity::User(id) => Some(*id),
            Identity::Session(_) => None,
        }
    }

    pub fn session_key(&self) -> Option<String> {
        match self {
            Identity::User(_) => None,
            Identity::Session(key) => Some(key.clone()),
        }
    }

    /// Mint a fresh anonymous session identity.
    pub fn new_session() -> Self {
        Identity::Session(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::User(id) => write!(f, "user {id}"),
            Identity::Session(key) => {
                let short: String = key.chars().take(10).collect();
                write!(f, "guest {short}")
            }
        }
    }
}

/// 每日一次的日界线按服务器本地时间计算
pub fn spin_day(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_identity_keys() {
        assert_eq!(Identity::User(42).key(), "user:42");
        assert_eq!(Identity::Session("abc".into()).key(), "session:abc");
        assert_eq!(Identity::User(42).user_id(), Some(42));
        assert_eq!(Identity::User(42).session_key(), None);
        assert_eq!(
            Identity::Session("abc".into()).session_key().as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_new_session_is_unique() {
        let a = Identity::new_session();
        let b = Identity::new_session();
        assert_ne!(a, b);
        assert_eq!(a.session_key().map(|k| k.len()), Some(32));
    }

    #[test]
    fn test_spin_day_advances_with_calendar() {
        let noon = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let next = noon + Duration::days(1);
        assert_eq!(spin_day(next), spin_day(noon).succ_opt().unwrap());
        assert_eq!(spin_day(noon + Duration::minutes(1)), spin_day(noon));
    }
}
