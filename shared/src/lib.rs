//! 仓库管理面板的共享层
//!
//! 与目标平台无关的纯逻辑：领域模型、协议定义、错误归一化、会话存储、
//! 视图表以及各实体控制器。浏览器端 (`sklad-frontend`) 只负责把这些状态
//! 投影为 DOM。

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub mod client;
pub mod config;
pub mod controllers;
pub mod date;
pub mod devconsole;
pub mod error;
pub mod filter;
pub mod modal;
pub mod permissions;
pub mod poll;
pub mod protocol;
pub mod refresh;
pub mod session;
pub mod stock;
pub mod toast;
pub mod transport;
pub mod view;

pub use client::ApiClient;
pub use controllers::Panel;
pub use date::Timestamp;
pub use error::{ApiError, ApiResult};
pub use filter::{ItemFilter, SortOrder, SupplyFilter};
pub use session::{KeyValueStore, Session};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use view::View;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const DEFAULT_CATEGORY: &str = "other";
pub const DEFAULT_UNIT: &str = "шт";

/// 将 `null` 视为类型默认值（API 偶尔对列表字段返回 null）
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Root,
    Ceo,
    Employee,
}

impl Role {
    /// 从会话中保存的字符串解析；空字符串表示未登录
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => None,
            "root" => Some(Self::Root),
            "ceo" => Some(Self::Ceo),
            _ => Some(Self::Employee),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Ceo => "ceo",
            Self::Employee => "employee",
        }
    }

    /// 员工管理（创建/封禁/删除）仅对 CEO 与 root 开放
    pub fn can_manage_employees(&self) -> bool {
        matches!(self, Self::Root | Self::Ceo)
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub camera_api_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_emails: Vec<String>,
    #[serde(default)]
    pub low_stock_default: Option<i64>,
    #[serde(default)]
    pub blocked_at: Option<Timestamp>,
}

impl Warehouse {
    pub fn is_blocked(&self) -> bool {
        self.blocked_at.is_some()
    }

    /// 卡片角标使用的短 ID（末 6 位）
    pub fn short_id(&self) -> &str {
        tail(&self.id, 6)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub warehouse_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub low_limit: Option<i64>,
}

impl Item {
    pub fn category(&self) -> &str {
        non_empty_or(self.category.as_deref(), DEFAULT_CATEGORY)
    }

    pub fn unit(&self) -> &str {
        non_empty_or(self.unit.as_deref(), DEFAULT_UNIT)
    }
}

/// 供货状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyStatus {
    Waiting,
    Done,
    Canceled,
}

impl SupplyStatus {
    pub const ALL: [SupplyStatus; 3] = [Self::Waiting, Self::Done, Self::Canceled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub id: String,
    pub item_id: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub expected_at: Option<Timestamp>,
    pub status: SupplyStatus,
    #[serde(default)]
    pub note: Option<String>,
    /// 服务端给出的逾期标记；缺失时由客户端推导
    #[serde(default)]
    pub overdue: Option<bool>,
}

impl Supply {
    /// 逾期 = 仍在等待且预计时间已过
    ///
    /// 服务端若已给出布尔值则以服务端为准。
    pub fn compute_overdue(&self, now: Timestamp) -> bool {
        if let Some(flag) = self.overdue {
            return flag;
        }
        if self.status != SupplyStatus::Waiting {
            return false;
        }
        self.expected_at.is_some_and(|at| at < now)
    }

    pub fn is_overdue(&self) -> bool {
        self.overdue.unwrap_or(false)
    }

    /// 卡片标题：商品名，缺失时退化为商品 ID 的末 6 位
    pub fn title(&self) -> &str {
        match self.item_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if !self.item_id.is_empty() => tail(&self.item_id, 6),
            _ => "item",
        }
    }
}

/// 库存操作历史
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub ts: Option<Timestamp>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
}

/// 公司员工
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub blocked_at: Option<Timestamp>,
}

impl Employee {
    pub fn is_blocked(&self) -> bool {
        self.blocked_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub inn: Option<String>,
    #[serde(default)]
    pub blocked_at: Option<Timestamp>,
}

impl Company {
    pub fn is_blocked(&self) -> bool {
        self.blocked_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyCounts {
    pub waiting: u64,
    pub done: u64,
    pub canceled: u64,
    pub overdue: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingSupply {
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub expected_at: Option<Timestamp>,
    #[serde(default)]
    pub overdue: bool,
}

/// 仪表盘汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub warehouses: u64,
    pub total_items: u64,
    pub low_items: u64,
    pub total_stock: i64,
    pub categories: BTreeMap<String, u64>,
    pub supplies: SupplyCounts,
    pub upcoming_supplies: Vec<UpcomingSupply>,
}

// =========================================================
// 辅助函数
// =========================================================

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

/// 取字符串末尾 n 个字符（按字符而非字节）
fn tail(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    let start = s
        .char_indices()
        .nth(count - n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn past() -> Timestamp {
        Timestamp::parse("2020-01-01T00:00:00Z").unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::parse("2024-06-01T12:00:00Z").unwrap()
    }

    fn supply(status: SupplyStatus) -> Supply {
        Supply {
            id: "s1".into(),
            item_id: "i1".into(),
            item_name: None,
            amount: 5,
            expected_at: Some(past()),
            status,
            note: None,
            overdue: None,
        }
    }

    #[test]
    fn waiting_supply_in_the_past_is_overdue() {
        assert!(supply(SupplyStatus::Waiting).compute_overdue(now()));
    }

    #[test]
    fn done_supply_in_the_past_is_not_overdue() {
        assert!(!supply(SupplyStatus::Done).compute_overdue(now()));
        assert!(!supply(SupplyStatus::Canceled).compute_overdue(now()));
    }

    #[test]
    fn server_overdue_flag_wins() {
        let mut s = supply(SupplyStatus::Waiting);
        s.overdue = Some(false);
        assert!(!s.compute_overdue(now()));
    }

    #[test]
    fn waiting_supply_without_date_is_not_overdue() {
        let mut s = supply(SupplyStatus::Waiting);
        s.expected_at = None;
        assert!(!s.compute_overdue(now()));
    }

    #[test]
    fn role_parsing() {
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("root"), Some(Role::Root));
        assert_eq!(Role::parse("ceo"), Some(Role::Ceo));
        assert_eq!(Role::parse("storekeeper"), Some(Role::Employee));
        assert!(Role::Ceo.can_manage_employees());
        assert!(!Role::Employee.can_manage_employees());
    }

    #[test]
    fn item_defaults_apply_to_missing_and_empty_fields() {
        let item: Item = serde_json::from_value(json!({
            "id": "i1", "name": "Шоколад", "category": "", "count": 3
        }))
        .unwrap();
        assert_eq!(item.category(), "other");
        assert_eq!(item.unit(), "шт");
        assert_eq!(item.low_limit, None);
    }

    #[test]
    fn warehouse_tolerates_null_email_list() {
        let wh: Warehouse = serde_json::from_value(json!({
            "id": "65f0c0ffee000000deadbeef",
            "name": "Склад №1",
            "notification_emails": null,
            "blocked_at": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert!(wh.notification_emails.is_empty());
        assert!(wh.is_blocked());
        assert_eq!(wh.short_id(), "adbeef");
    }

    #[test]
    fn supply_title_falls_back_to_item_id_tail() {
        let mut s = supply(SupplyStatus::Waiting);
        s.item_id = "abcdef123456".into();
        assert_eq!(s.title(), "123456");
        s.item_name = Some("Молоко".into());
        assert_eq!(s.title(), "Молоко");
    }
}
