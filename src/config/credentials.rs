use crate::utils::error::{EtlError, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const BEARER_TOKEN_VAR: &str = "DUOLINGO_BEARER_TOKEN";
pub const USER_ID_VAR: &str = "DUOLINGO_USER_ID";

/// 訂閱目錄 API 的存取憑證，在啟動時讀取一次
#[derive(Clone)]
pub struct Credentials {
    /// Sent verbatim as the `Authorization` header value.
    pub bearer_token: String,
    pub user_id: String,
}

impl Credentials {
    pub fn new(bearer_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            user_id: user_id.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| EtlError::MissingConfigError {
                    field: key.to_string(),
                })
        };

        Ok(Self {
            bearer_token: required(BEARER_TOKEN_VAR)?,
            user_id: required(USER_ID_VAR)?,
        })
    }
}

/// `.env` 載入結果；檔案不存在不算錯誤，但格式錯誤要提示使用者
#[derive(Debug)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing,
    Invalid(dotenvy::Error),
}

impl EnvFile {
    pub fn load() -> Self {
        Self::from_result(dotenvy::dotenv())
    }

    pub fn from_result(result: std::result::Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => EnvFile::Loaded(path),
            Err(e) if e.not_found() => EnvFile::Missing,
            Err(e) => EnvFile::Invalid(e),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bearer_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_both_variables_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (BEARER_TOKEN_VAR, "Bearer abc.def"),
            (USER_ID_VAR, "123456"),
        ]))
        .unwrap();

        assert_eq!(creds.bearer_token, "Bearer abc.def");
        assert_eq!(creds.user_id, "123456");
    }

    #[test]
    fn test_missing_token_is_reported_by_name() {
        let err = Credentials::from_lookup(lookup_from(&[(USER_ID_VAR, "123456")])).unwrap_err();
        match err {
            EtlError::MissingConfigError { field } => assert_eq!(field, BEARER_TOKEN_VAR),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_user_id_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (BEARER_TOKEN_VAR, "Bearer abc"),
            (USER_ID_VAR, "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { field } if field == USER_ID_VAR));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("Bearer secret-token", "42");
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("42"));
    }

    #[test]
    fn test_env_file_missing_vs_invalid() {
        let missing = EnvFile::from_result(Err(dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no .env",
        ))));
        assert!(matches!(missing, EnvFile::Missing));

        let invalid = EnvFile::from_result(Err(dotenvy::Error::LineParse(
            "DUOLINGO_USER_ID 42".to_string(),
            17,
        )));
        assert!(matches!(invalid, EnvFile::Invalid(_)));

        let unreadable = EnvFile::from_result(Err(dotenvy::Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ))));
        assert!(matches!(unreadable, EnvFile::Invalid(_)));

        let loaded = EnvFile::from_result(Ok(PathBuf::from("/work/.env")));
        assert!(matches!(loaded, EnvFile::Loaded(path) if path.ends_with(".env")));
    }
}
