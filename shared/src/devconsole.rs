//! 开发者控制台
//!
//! 用表单手动调用任意端点：收集非空字段，按端点定义放入 JSON 请求体或查询串，
//! 展示状态码、耗时与响应体。

use crate::error::{ApiError, ApiResult};
use crate::filter::QueryBuilder;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};
use serde_json::{Map, Value};

/// 载荷放置位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLocation {
    Body,
    Query,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    Email,
    /// 多行输入，提交前必须能解析为 JSON
    Json,
}

impl FieldKind {
    /// `<input type=..>` 的值
    pub fn input_type(&self) -> &'static str {
        match self {
            Self::Text | Self::Json => "text",
            Self::Password => "password",
            Self::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevEndpoint {
    pub id: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub description: &'static str,
    pub payload: PayloadLocation,
    pub fields: &'static [DevField],
}

const fn field(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    placeholder: &'static str,
) -> DevField {
    DevField {
        name,
        label,
        kind,
        placeholder,
    }
}

pub const ENDPOINTS: &[DevEndpoint] = &[
    DevEndpoint {
        id: "auth",
        method: HttpMethod::Post,
        path: "/user/auth",
        description: "Авторизация по логину и паролю",
        payload: PayloadLocation::Body,
        fields: &[
            field("login", "Логин", FieldKind::Text, "root"),
            field("password", "Пароль", FieldKind::Password, "root_password"),
        ],
    },
    DevEndpoint {
        id: "meta",
        method: HttpMethod::Get,
        path: "/meta",
        description: "Метаданные сервера (флаг dev)",
        payload: PayloadLocation::None,
        fields: &[],
    },
    DevEndpoint {
        id: "warehouses",
        method: HttpMethod::Get,
        path: "/warehouse/list",
        description: "Список складов компании",
        payload: PayloadLocation::None,
        fields: &[],
    },
    DevEndpoint {
        id: "notifications",
        method: HttpMethod::Get,
        path: "/notifications/list",
        description: "Уведомления текущего пользователя",
        payload: PayloadLocation::Query,
        fields: &[
            field("unread_only", "Только непрочитанные", FieldKind::Text, "true"),
            field("limit", "Лимит", FieldKind::Text, "200"),
        ],
    },
    DevEndpoint {
        id: "supply_status",
        method: HttpMethod::Post,
        path: "/supplies/status",
        description: "Смена статуса поставки",
        payload: PayloadLocation::Body,
        fields: &[
            field("supply_id", "ID поставки", FieldKind::Text, ""),
            field("status", "Статус", FieldKind::Text, "waiting | done | canceled"),
        ],
    },
    DevEndpoint {
        id: "users_update",
        method: HttpMethod::Post,
        path: "/company/users/update",
        description: "Обновление сотрудника",
        payload: PayloadLocation::Body,
        fields: &[
            field("user_id", "ID сотрудника", FieldKind::Text, ""),
            field(
                "permissions",
                "Права (JSON)",
                FieldKind::Json,
                r#"["items.op", "supplies.update"]"#,
            ),
        ],
    },
    DevEndpoint {
        id: "test_mail",
        method: HttpMethod::Post,
        path: "/dev/test_mail",
        description: "Тест отправки письма",
        payload: PayloadLocation::Body,
        fields: &[field("email", "Email", FieldKind::Email, "you@example.com")],
    },
    DevEndpoint {
        id: "healthz",
        method: HttpMethod::Get,
        path: "/healthz",
        description: "Проверка работоспособности сервиса",
        payload: PayloadLocation::None,
        fields: &[],
    },
];

pub const DEFAULT_ENDPOINT: &str = "auth";

pub fn find(id: &str) -> Option<&'static DevEndpoint> {
    ENDPOINTS.iter().find(|e| e.id == id)
}

/// 收集非空字段；JSON 字段解析失败时返回校验错误
fn collect_payload(ep: &DevEndpoint, values: &[(String, String)]) -> ApiResult<Map<String, Value>> {
    let mut payload = Map::new();
    for f in ep.fields {
        let Some((_, raw)) = values.iter().find(|(name, _)| name == f.name) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let value = match f.kind {
            FieldKind::Json => serde_json::from_str(raw).map_err(|_| {
                ApiError::validation(format!("Поле \"{}\" должно быть валидным JSON", f.label))
            })?,
            _ => Value::String(raw.clone()),
        };
        payload.insert(f.name.to_string(), value);
    }
    Ok(payload)
}

/// 构造请求：有 token 时附带 Bearer 头
pub fn build_request(
    base_url: &str,
    ep: &DevEndpoint,
    values: &[(String, String)],
    token: &str,
) -> ApiResult<HttpRequest> {
    let payload = collect_payload(ep, values)?;
    let mut url = format!("{}{}", base_url.trim_end_matches('/'), ep.path);

    if ep.payload == PayloadLocation::Query {
        let mut q = QueryBuilder::default();
        for f in ep.fields {
            match payload.get(f.name) {
                Some(Value::String(s)) => q.push(f.name, s),
                Some(other) => q.push(f.name, &other.to_string()),
                None => {}
            }
        }
        let qs = q.finish();
        if let Some(params) = qs.strip_prefix('?') {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(params);
        }
    }

    let mut req = HttpRequest::new(&url, ep.method);
    if ep.payload == PayloadLocation::Body {
        req = req
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_body(Value::Object(payload));
    }
    if !token.is_empty() {
        req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"));
    }
    Ok(req)
}

/// 控制台展示的响应
#[derive(Debug, Clone, PartialEq)]
pub struct DevResponse {
    pub status: u16,
    pub ok: bool,
    pub duration_ms: f64,
    pub body: String,
}

impl DevResponse {
    /// JSON 响应体格式化输出，其余按原文
    pub fn from_http(resp: &HttpResponse, duration_ms: f64) -> Self {
        let text = resp.text();
        let body = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or(text);
        Self {
            status: resp.status,
            ok: resp.ok(),
            duration_ms,
            body,
        }
    }

    /// 如 `200 • 12.3 ms`
    pub fn meta_line(&self) -> String {
        format!("{} • {:.1} ms", self.status, self.duration_ms)
    }
}

/// 发送请求并计时；`clock` 返回毫秒
pub async fn execute<T: Transport>(
    transport: &T,
    req: HttpRequest,
    clock: impl Fn() -> f64,
) -> ApiResult<DevResponse> {
    let started = clock();
    let resp = transport.send(req).await?;
    Ok(DevResponse::from_http(&resp, clock() - started))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::json;
    use std::cell::Cell;

    fn values(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn invalid_json_field_is_rejected() {
        let ep = find("users_update").unwrap();
        let err = build_request("", ep, &values(&[("permissions", "[oops")]), "").unwrap_err();
        assert_eq!(err.to_string(), "Поле \"Права (JSON)\" должно быть валидным JSON");
    }

    #[test]
    fn body_payload_skips_empty_fields_and_parses_json() {
        let ep = find("users_update").unwrap();
        let req = build_request(
            "http://h/",
            ep,
            &values(&[("user_id", ""), ("permissions", r#"["items.op"]"#)]),
            "tok",
        )
        .unwrap();
        assert_eq!(req.url, "http://h/company/users/update");
        assert_eq!(req.method, HttpMethod::Post);
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"permissions": ["items.op"]}));
        assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer tok"));
    }

    #[test]
    fn query_payload_is_appended() {
        let ep = find("notifications").unwrap();
        let req = build_request("", ep, &values(&[("limit", "5"), ("unread_only", "true")]), "")
            .unwrap();
        assert_eq!(req.url, "/notifications/list?unread_only=true&limit=5");
        assert_eq!(req.body, None);
        assert_eq!(req.header(HEADER_AUTHORIZATION), None);
    }

    #[test]
    fn empty_query_leaves_url_alone() {
        let ep = find("notifications").unwrap();
        let req = build_request("", ep, &[], "").unwrap();
        assert_eq!(req.url, "/notifications/list");
    }

    #[tokio::test]
    async fn execute_reports_status_duration_and_pretty_body() {
        let transport = MockTransport::new();
        transport.mock_json(HttpMethod::Get, "/meta", 200, json!({"dev": true}));
        let ticks = Cell::new(0.0);
        let clock = || {
            let t = ticks.get();
            ticks.set(t + 12.34);
            t
        };

        let req = build_request("", find("meta").unwrap(), &[], "").unwrap();
        let resp = execute(&transport, req, clock).await.unwrap();
        assert_eq!(resp.meta_line(), "200 • 12.3 ms");
        assert_eq!(resp.body, "{\n  \"dev\": true\n}");
    }

    #[test]
    fn plain_text_body_is_kept() {
        let resp = DevResponse::from_http(&HttpResponse::new(404, "Not Found"), 1.0);
        assert_eq!(resp.body, "Not Found");
        assert!(!resp.ok);
    }
}
