//! 错误定义与 API 错误消息提取
//!
//! 所有客户端/控制器操作都返回 [`ApiResult`]，由组件边界转为提示条。
//! `Display` 即面向用户的文案。

use serde_json::Value;
use thiserror::Error;

/// 校验错误条目缺少 msg/message 时的通用文案
const VALIDATION_FALLBACK: &str = "Ошибка валидации";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 网络/fetch 失败
    #[error("{0}")]
    Transport(String),
    /// 非 2xx 响应，message 为从响应体提取的文案
    #[error("{message}")]
    Status { status: u16, message: String },
    /// 客户端表单校验失败
    #[error("{0}")]
    Validation(String),
    /// 成功响应的 JSON 结构不符合预期
    #[error("{0}")]
    Decode(String),
    /// 登录/注册响应中没有 token
    #[error("{0}")]
    Auth(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// 根据状态码和已解析的响应体构造错误
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = format_api_error(body)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        Self::Status { status, message }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// 从错误响应体中提取可读消息
///
/// 依次尝试：纯字符串、`error` 字段、`detail` 字符串、`detail` 校验数组
/// (`"loc: msg"`，多条以换行连接)、`detail` 对象、`message` 字段。
pub fn format_api_error(data: &Value) -> Option<String> {
    let obj = match data {
        Value::String(s) if !s.is_empty() => return Some(s.clone()),
        Value::Object(obj) => obj,
        _ => return None,
    };

    if let Some(Value::String(err)) = obj.get("error") {
        if !err.is_empty() {
            return Some(err.clone());
        }
    }

    match obj.get("detail") {
        Some(Value::String(d)) => return Some(d.clone()),
        Some(Value::Array(entries)) => {
            let lines: Vec<String> = entries.iter().map(format_validation_entry).collect();
            return Some(lines.join("\n"));
        }
        Some(Value::Object(d)) => {
            let msg = truthy_str(d.get("msg"))
                .or_else(|| truthy_str(d.get("message")))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(d.clone()).to_string());
            return Some(msg);
        }
        _ => {}
    }

    truthy_str(obj.get("message")).map(str::to_string)
}

fn format_validation_entry(entry: &Value) -> String {
    if let Value::String(s) = entry {
        return s.clone();
    }

    let loc = match entry.get("loc") {
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("."),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let msg = truthy_str(entry.get("msg"))
        .or_else(|| truthy_str(entry.get("message")))
        .unwrap_or(VALIDATION_FALLBACK);

    if loc.is_empty() {
        msg.to_string()
    } else {
        format!("{loc}: {msg}")
    }
}

fn truthy_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_field_is_used_verbatim() {
        let err = ApiError::from_response(401, &json!({"error": "bad login"}));
        assert_eq!(err.to_string(), "bad login");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn validation_array_renders_loc_and_msg() {
        let body = json!({"detail": [{"loc": ["body", "password"], "msg": "too short"}]});
        let err = ApiError::from_response(422, &body);
        assert_eq!(err.to_string(), "body.password: too short");
    }

    #[test]
    fn validation_array_joins_entries_with_newlines() {
        let body = json!({"detail": [
            {"loc": ["body", 0, "login"], "msg": "required"},
            {"message": "no location"},
            {"loc": "query"},
            "plain entry"
        ]});
        assert_eq!(
            format_api_error(&body).unwrap(),
            "body.0.login: required\nno location\nquery: Ошибка валидации\nplain entry"
        );
    }

    #[test]
    fn plain_string_body() {
        let err = ApiError::from_response(500, &Value::String("Internal Server Error".into()));
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[test]
    fn detail_string_and_object() {
        assert_eq!(
            format_api_error(&json!({"detail": "Склад не найден."})).as_deref(),
            Some("Склад не найден.")
        );
        assert_eq!(
            format_api_error(&json!({"detail": {"message": "nope"}})).as_deref(),
            Some("nope")
        );
        assert_eq!(
            format_api_error(&json!({"detail": {"code": 7}})).as_deref(),
            Some(r#"{"code":7}"#)
        );
    }

    #[test]
    fn error_field_takes_priority_over_detail() {
        let body = json!({"error": "first", "detail": "second"});
        assert_eq!(format_api_error(&body).as_deref(), Some("first"));
    }

    #[test]
    fn falls_back_to_message_then_status() {
        assert_eq!(
            ApiError::from_response(400, &json!({"message": "m"})).to_string(),
            "m"
        );
        assert_eq!(
            ApiError::from_response(503, &Value::Null).to_string(),
            "HTTP 503"
        );
        assert_eq!(
            ApiError::from_response(404, &json!({"detail": ""})).to_string(),
            "HTTP 404"
        );
        assert_eq!(ApiError::from_response(418, &json!([1, 2])).to_string(), "HTTP 418");
    }
}
