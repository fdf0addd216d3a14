//! 运行时配置
//!
//! 面板与后端同源部署，默认 API 前缀为空；构建时可通过
//! `SKLAD_API_BASE` 环境变量指向其他地址。

use std::time::Duration;

/// 默认 API 前缀（同源）
const DEFAULT_API_BASE: &str = "";

/// 商品列表静默刷新间隔
pub const ITEMS_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// 未读通知数刷新间隔
pub const NOTIFICATIONS_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// 搜索框防抖延迟
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);
/// 提示条自动消失时间
pub const TOAST_LIFETIME: Duration = Duration::from_millis(3500);

pub const NOTIFICATIONS_LIMIT: u32 = 200;
pub const WAREHOUSE_HISTORY_LIMIT: u32 = 200;
/// 商品与仓库都未设置阈值时的低库存阈值
pub const FALLBACK_LOW_STOCK: i64 = 1;

/// API 前缀，去掉末尾的 `/`
pub fn api_base() -> String {
    option_env!("SKLAD_API_BASE")
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}
