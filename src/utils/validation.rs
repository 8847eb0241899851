use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 端點必須是 http(s) 絕對網址
pub fn validate_endpoint(field_name: &str, endpoint: &str) -> Result<Url> {
    if endpoint.trim().is_empty() {
        return Err(invalid(field_name, endpoint, "URL cannot be empty"));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field_name, endpoint, &format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(
            field_name,
            endpoint,
            &format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// 輸出檔名只能是單一檔名，不含目錄分隔符
pub fn validate_file_name(field_name: &str, file_name: &str) -> Result<()> {
    validate_path(field_name, file_name)?;

    if file_name.contains('/') || file_name.contains('\\') {
        return Err(invalid(
            field_name,
            file_name,
            "File name must not contain path separators; use --output-path for the directory",
        ));
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            &format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn invalid(field_name: &str, value: &str, reason: &str) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
