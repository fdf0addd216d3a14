//! 浏览器侧的面板装配
//!
//! 把 `fetch` 传输层、LocalStorage 会话与共享层的 `Panel` 组装到一起。

use std::rc::Rc;

use sklad_shared::config::api_base;
use sklad_shared::protocol::ExportKind;
use sklad_shared::{ApiClient, ApiResult, Panel, Session};

use crate::web::{BrowserStorage, FetchTransport, save_bytes};

pub type AppPanel = Panel<FetchTransport>;

pub fn build_panel() -> Rc<AppPanel> {
    let session = Rc::new(Session::new(BrowserStorage));
    let api = ApiClient::new(&api_base(), FetchTransport, session);
    Rc::new(Panel::new(api))
}

/// 下载 CSV 导出并交给浏览器保存
pub async fn export_csv(panel: &AppPanel, kind: ExportKind, warehouse_id: &str) -> ApiResult<()> {
    let bytes = panel.api().download(&kind.path(warehouse_id)).await?;
    save_bytes(&bytes, &kind.filename(warehouse_id), "text/csv;charset=utf-8")?;
    log::info!("exported {} bytes as {}", bytes.len(), kind.filename(warehouse_id));
    Ok(())
}
