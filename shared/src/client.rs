//! REST 客户端
//!
//! 负责拼接 URL、附加鉴权头、解析响应体并把非 2xx 响应归一化为 [`ApiError`]。
//! 具体的网络发送由 [`Transport`] 完成。

use crate::error::{ApiError, ApiResult};
use crate::protocol::ApiRequest;
use crate::session::Session;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};
use serde_json::{Map, Value};
use std::rc::Rc;

pub struct ApiClient<T: Transport> {
    base_url: String,
    transport: T,
    session: Rc<Session>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T, session: Rc<Session>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') || path.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build(&self, method: HttpMethod, path: &str, accept: &str) -> HttpRequest {
        let mut req = HttpRequest::new(&self.url(path), method)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_header("Accept", accept);
        let token = self.session.token();
        if !token.is_empty() {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"));
        }
        req
    }

    /// 发送 JSON 请求，返回解析后的响应体
    ///
    /// 成功响应若不是对象或数组，则返回空对象。
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let mut req = self.build(method, path, CONTENT_TYPE_JSON);
        if let Some(body) = body {
            req = req.with_body(body);
        }

        let resp = self.transport.send(req).await?;
        let data = parse_body(&resp);
        if !resp.ok() {
            log::debug!("{} {} -> {}", method.as_str(), path, resp.status);
            return Err(ApiError::from_response(resp.status, &data));
        }

        match data {
            Value::Object(_) | Value::Array(_) => Ok(data),
            _ => Ok(Value::Object(Map::new())),
        }
    }

    /// 调用类型化的端点
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let data = self.request(R::METHOD, &req.path(), req.body()?).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// 下载二进制内容（CSV 导出），失败时按 JSON 错误体提取消息
    pub async fn download(&self, path: &str) -> ApiResult<Vec<u8>> {
        let req = self.build(HttpMethod::Get, path, "*/*");
        let resp = self.transport.send(req).await?;
        if !resp.ok() {
            return Err(ApiError::from_response(resp.status, &parse_body(&resp)));
        }
        Ok(resp.body)
    }
}

/// 响应体：空串为 null，非 JSON 文本保留为字符串
fn parse_body(resp: &HttpResponse) -> Value {
    let text = resp.text();
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ListWarehouses, LoginRequest};
    use crate::session::MemoryStore;
    use crate::transport::MockTransport;
    use serde_json::json;

    fn client() -> ApiClient<MockTransport> {
        let session = Rc::new(Session::new(MemoryStore::default()));
        ApiClient::new("http://api.local/", MockTransport::new(), session)
    }

    #[tokio::test]
    async fn bearer_header_only_when_token_present() {
        let c = client();
        c.transport()
            .mock_json(HttpMethod::Get, "http://api.local/meta", 200, json!({}));

        c.request(HttpMethod::Get, "/meta", None).await.unwrap();
        let first = c.transport().last().unwrap();
        assert_eq!(first.header(HEADER_AUTHORIZATION), None);
        assert_eq!(first.header(HEADER_CONTENT_TYPE), Some(CONTENT_TYPE_JSON));

        c.session().set_auth("tok", "ceo", "boss");
        c.request(HttpMethod::Get, "/meta", None).await.unwrap();
        let second = c.transport().last().unwrap();
        assert_eq!(second.header("authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn error_body_becomes_status_error() {
        let c = client();
        c.transport().mock_json(
            HttpMethod::Post,
            "http://api.local/user/auth",
            401,
            json!({"error": "bad login"}),
        );

        let err = c
            .call(&LoginRequest {
                login: "a".into(),
                password: "b".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "bad login");
        assert!(err.is_unauthorized());

        let sent = c.transport().last().unwrap();
        let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"login": "a", "password": "b"}));
    }

    #[tokio::test]
    async fn non_json_error_text_is_kept() {
        let c = client();
        c.transport().mock_text(
            HttpMethod::Get,
            "http://api.local/warehouse/list",
            502,
            "Bad Gateway",
        );
        let err = c.call(&ListWarehouses).await.unwrap_err();
        assert_eq!(err.to_string(), "Bad Gateway");
    }

    #[tokio::test]
    async fn empty_success_body_is_an_empty_object() {
        let c = client();
        c.transport()
            .mock_text(HttpMethod::Get, "http://api.local/warehouse/list", 200, "");
        assert_eq!(
            c.request(HttpMethod::Get, "/warehouse/list", None)
                .await
                .unwrap(),
            json!({})
        );
        // 缺失的列表字段视为空列表
        let list = c.call(&ListWarehouses).await.unwrap();
        assert!(list.warehouses.is_empty());
    }

    #[tokio::test]
    async fn network_failure_is_transport_error() {
        let c = client();
        c.transport().fail("http://api.local/warehouse/list");
        let err = c.call(&ListWarehouses).await.unwrap_err();
        assert_eq!(err, ApiError::Transport("Failed to fetch".into()));
    }

    #[tokio::test]
    async fn download_returns_raw_bytes() {
        let c = client();
        c.transport().mock_text(
            HttpMethod::Get,
            "http://api.local/export/items/w1",
            200,
            "name;count\nМолоко;3\n",
        );
        let bytes = c.download("/export/items/w1").await.unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "name;count\nМолоко;3\n");
        assert_eq!(c.transport().last().unwrap().header("Accept"), Some("*/*"));
    }
}
