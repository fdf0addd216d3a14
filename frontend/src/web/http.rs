//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现共享层的 [`Transport`]，响应体按字节读取，
//! 同时服务 JSON 接口和 CSV 导出。

use async_trait::async_trait;
use js_sys::Uint8Array;
use sklad_shared::{ApiError, ApiResult, HttpRequest, HttpResponse, Transport};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应读取失败
    ResponseParseFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "Ошибка запроса: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "Сеть недоступна: {}", msg),
            HttpError::ResponseParseFailed(msg) => write!(f, "Ошибка чтения ответа: {}", msg),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// 基于浏览器 `fetch` 的传输层
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    fn build(req: &HttpRequest) -> Result<Request, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("Headers: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("{key}: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))
    }

    async fn fetch(req: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let request = Self::build(req)?;

        let window =
            web_sys::window().ok_or_else(|| HttpError::NetworkError("window".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(js_message(&e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        let promise = response
            .array_buffer()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let buffer = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        Ok(HttpResponse::new(
            response.status(),
            Uint8Array::new(&buffer).to_vec(),
        ))
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        Ok(Self::fetch(&req).await?)
    }
}

/// `TypeError: Failed to fetch` 之类的 JS 异常取其 message
fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
