use crate::error::{ApiError, ApiResult};
use crate::filter::{ItemFilter, SupplyFilter};
use crate::transport::HttpMethod;
use crate::{
    Company, DashboardSummary, Employee, HistoryEntry, Item, Notification, Supply, SupplyStatus,
    DEFAULT_CATEGORY, DEFAULT_UNIT, Timestamp, Warehouse,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// 定义 API 端点的请求/响应关系及元数据
pub trait ApiRequest {
    /// 该请求返回的响应类型
    type Response: DeserializeOwned;
    /// HTTP 方法
    const METHOD: HttpMethod;
    /// 请求路径（含路径参数与查询串）
    fn path(&self) -> String;
    /// JSON 请求体
    fn body(&self) -> ApiResult<Option<Value>> {
        Ok(None)
    }
}

fn json_body<T: Serialize>(value: &T) -> ApiResult<Option<Value>> {
    Ok(Some(serde_json::to_value(value)?))
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// 数字输入框：留空取默认值，非整数为校验错误
pub fn parse_int_or(raw: &str, default: i64) -> ApiResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse()
        .map_err(|_| ApiError::validation(format!("Некорректное число: {raw}")))
}

/// 带 JSON 请求体、固定路径的端点
macro_rules! json_endpoint {
    ($req:ty => $resp:ty, $method:ident, $path:expr) => {
        impl ApiRequest for $req {
            type Response = $resp;
            const METHOD: HttpMethod = HttpMethod::$method;
            fn path(&self) -> String {
                $path.to_string()
            }
            fn body(&self) -> ApiResult<Option<Value>> {
                json_body(self)
            }
        }
    };
}

// =========================================================
// Response Envelopes
// =========================================================

/// 仅含 `ok` 标记的通用响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AuthResponse {
    /// 成功登录需要 `ok == true` 且带有非空 token
    pub fn token(&self) -> Option<&str> {
        match self.token.as_deref() {
            Some(t) if self.ok && !t.is_empty() => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaResponse {
    #[serde(default)]
    pub dev: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarehouseList {
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemList {
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplyList {
    #[serde(default)]
    pub supplies: Vec<Supply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryList {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeList {
    #[serde(default)]
    pub users: Vec<Employee>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyList {
    #[serde(default)]
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationList {
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: DashboardSummary,
}

// =========================================================
// 用户 / 会话
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

json_endpoint!(LoginRequest => AuthResponse, Post, "/user/auth");

#[derive(Debug, Clone, Serialize)]
pub struct RegisterCeoRequest {
    pub company_name: String,
    pub company_inn: Option<String>,
    pub login: String,
    pub password: String,
    pub email: String,
}

json_endpoint!(RegisterCeoRequest => AuthResponse, Post, "/user/register/ceo");

#[derive(Debug, Clone, Copy)]
pub struct MetaRequest;

impl ApiRequest for MetaRequest {
    type Response = MetaResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/meta".to_string()
    }
}

// =========================================================
// 仓库
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListWarehouses;

impl ApiRequest for ListWarehouses {
    type Response = WarehouseList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/warehouse/list".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWarehouseRequest {
    pub name: String,
    pub notification_emails: Vec<String>,
    pub low_stock_default: i64,
}

impl CreateWarehouseRequest {
    /// 从表单原始输入构造：邮箱以逗号分隔，阈值留空或非法时为 1
    pub fn from_form(name: &str, emails: &str, low_stock: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            notification_emails: emails
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect(),
            low_stock_default: low_stock.trim().parse().unwrap_or(1),
        }
    }
}

json_endpoint!(CreateWarehouseRequest => Ack, Post, "/warehouse/create");

#[derive(Debug, Clone)]
pub struct DeleteWarehouse {
    pub warehouse_id: String,
}

impl ApiRequest for DeleteWarehouse {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/warehouse/delete/{}", segment(&self.warehouse_id))
    }
}

/// 封禁 / 解封仓库
#[derive(Debug, Clone)]
pub struct SetWarehouseBlocked {
    pub warehouse_id: String,
    pub blocked: bool,
}

impl ApiRequest for SetWarehouseBlocked {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        let action = if self.blocked { "block" } else { "unblock" };
        format!("/warehouse/{}/{}", action, segment(&self.warehouse_id))
    }
}

// =========================================================
// 商品
// =========================================================

#[derive(Debug, Clone)]
pub struct ListItems {
    pub warehouse_id: String,
    pub filter: ItemFilter,
}

impl ApiRequest for ListItems {
    type Response = ItemList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/items/list/{}{}",
            segment(&self.warehouse_id),
            self.filter.query_string()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateItemRequest {
    pub warehouse_id: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub count: i64,
    pub low_limit: Option<i64>,
}

impl CreateItemRequest {
    /// 分类与单位留空时取默认值，初始数量默认 0，阈值留空为 `null`
    pub fn from_form(
        warehouse_id: &str,
        name: &str,
        category: &str,
        unit: &str,
        count: &str,
        low_limit: &str,
    ) -> ApiResult<Self> {
        let low_limit = match low_limit.trim() {
            "" => None,
            raw => Some(parse_int_or(raw, 0)?),
        };
        Ok(Self {
            warehouse_id: warehouse_id.to_string(),
            name: name.trim().to_string(),
            category: crate::non_empty_or(Some(category.trim()), DEFAULT_CATEGORY).to_string(),
            unit: crate::non_empty_or(Some(unit.trim()), DEFAULT_UNIT).to_string(),
            count: parse_int_or(count, 0)?,
            low_limit,
        })
    }
}

json_endpoint!(CreateItemRequest => Ack, Post, "/items/create");

/// 入库 / 出库
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOp {
    Income,
    Outcome,
}

impl StockOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemOpRequest {
    #[serde(skip)]
    pub op: StockOp,
    pub item_id: String,
    pub amount: i64,
}

impl ApiRequest for ItemOpRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/items/{}", self.op.as_str())
    }
    fn body(&self) -> ApiResult<Option<Value>> {
        json_body(self)
    }
}

#[derive(Debug, Clone)]
pub struct ItemHistory {
    pub item_id: String,
}

impl ApiRequest for ItemHistory {
    type Response = HistoryList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/items/history/{}", segment(&self.item_id))
    }
}

#[derive(Debug, Clone)]
pub struct WarehouseHistory {
    pub warehouse_id: String,
    pub limit: u32,
}

impl ApiRequest for WarehouseHistory {
    type Response = HistoryList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/items/history/warehouse/{}?limit={}",
            segment(&self.warehouse_id),
            self.limit
        )
    }
}

#[derive(Debug, Clone)]
pub struct LowStock {
    pub warehouse_id: String,
}

impl ApiRequest for LowStock {
    type Response = ItemList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/items/low_stock/{}", segment(&self.warehouse_id))
    }
}

// =========================================================
// 供货
// =========================================================

#[derive(Debug, Clone)]
pub struct ListSupplies {
    pub warehouse_id: String,
    pub filter: SupplyFilter,
}

impl ApiRequest for ListSupplies {
    type Response = SupplyList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/supplies/list/{}{}",
            segment(&self.warehouse_id),
            self.filter.query_string()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSupplyRequest {
    pub warehouse_id: String,
    pub item_id: String,
    pub amount: i64,
    pub expected_at: Timestamp,
    pub note: Option<String>,
}

json_endpoint!(CreateSupplyRequest => Ack, Post, "/supplies/create");

#[derive(Debug, Clone, Serialize)]
pub struct SupplyStatusRequest {
    pub supply_id: String,
    pub status: SupplyStatus,
}

json_endpoint!(SupplyStatusRequest => Ack, Post, "/supplies/status");

// =========================================================
// 员工
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListEmployees;

impl ApiRequest for ListEmployees {
    type Response = EmployeeList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/company/users/list".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateEmployeeRequest {
    pub login: String,
    pub password: String,
    pub email: String,
    pub post: String,
    pub permissions: Vec<String>,
}

json_endpoint!(CreateEmployeeRequest => Ack, Post, "/company/users/create");

/// 部分更新：未设置的字段不会出现在请求体中
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateEmployeeRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

json_endpoint!(UpdateEmployeeRequest => Ack, Post, "/company/users/update");

#[derive(Debug, Clone)]
pub struct DeleteEmployee {
    pub user_id: String,
}

impl ApiRequest for DeleteEmployee {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/company/users/delete/{}", segment(&self.user_id))
    }
}

// =========================================================
// 公司 (root)
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListCompanies;

impl ApiRequest for ListCompanies {
    type Response = CompanyList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/root/companies/list".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SetCompanyBlocked {
    pub company_id: String,
    pub blocked: bool,
}

impl ApiRequest for SetCompanyBlocked {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        let action = if self.blocked { "block" } else { "unblock" };
        format!("/root/companies/{}/{}", action, segment(&self.company_id))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteCompany {
    pub company_id: String,
}

impl ApiRequest for DeleteCompany {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/root/companies/delete/{}", segment(&self.company_id))
    }
}

// =========================================================
// 仪表盘 / 通知
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct DashboardSummaryRequest;

impl ApiRequest for DashboardSummaryRequest {
    type Response = SummaryResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/dashboard/summary".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListNotifications {
    pub unread_only: bool,
    pub limit: u32,
}

impl ApiRequest for ListNotifications {
    type Response = NotificationList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/notifications/list?unread_only={}&limit={}",
            self.unread_only, self.limit
        )
    }
}

#[derive(Debug, Clone)]
pub struct MarkNotificationRead {
    pub notification_id: String,
}

impl ApiRequest for MarkNotificationRead {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/notifications/read/{}", segment(&self.notification_id))
    }
}

// =========================================================
// 导出（二进制下载，不走 JSON 解析）
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Items,
    Supplies,
}

impl ExportKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Supplies => "supplies",
        }
    }

    pub fn path(&self, warehouse_id: &str) -> String {
        format!("/export/{}/{}", self.as_str(), segment(warehouse_id))
    }

    pub fn filename(&self, warehouse_id: &str) -> String {
        format!("{}_{}.csv", self.as_str(), warehouse_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_form_defaults() {
        let req = CreateItemRequest::from_form("w1", " Молоко ", "", " ", "", "").unwrap();
        assert_eq!(req.name, "Молоко");
        assert_eq!(req.category, "other");
        assert_eq!(req.unit, "шт");
        assert_eq!(req.count, 0);
        assert_eq!(req.low_limit, None);

        let req = CreateItemRequest::from_form("w1", "Сок", "напитки", "л", "12", "3").unwrap();
        assert_eq!((req.count, req.low_limit), (12, Some(3)));
    }

    #[test]
    fn test_item_form_rejects_garbage_numbers() {
        let err = CreateItemRequest::from_form("w1", "Сок", "", "", "12a", "").unwrap_err();
        assert_eq!(err.to_string(), "Некорректное число: 12a");
        assert_eq!(parse_int_or("  ", 1).unwrap(), 1);
    }

    #[test]
    fn block_toggles_pick_the_action_segment() {
        let block = SetWarehouseBlocked {
            warehouse_id: "w1".into(),
            blocked: true,
        };
        let unblock = SetCompanyBlocked {
            company_id: "c1".into(),
            blocked: false,
        };
        assert_eq!(block.path(), "/warehouse/block/w1");
        assert_eq!(unblock.path(), "/root/companies/unblock/c1");
    }

    #[test]
    fn stock_op_body_omits_the_op_kind() {
        let req = ItemOpRequest {
            op: StockOp::Outcome,
            item_id: "i1".into(),
            amount: 3,
        };
        assert_eq!(req.path(), "/items/outcome");
        assert_eq!(
            req.body().unwrap(),
            Some(json!({"item_id": "i1", "amount": 3}))
        );
    }

    #[test]
    fn employee_update_is_partial() {
        let req = UpdateEmployeeRequest {
            user_id: "u1".into(),
            blocked: Some(true),
            ..Default::default()
        };
        assert_eq!(
            req.body().unwrap(),
            Some(json!({"user_id": "u1", "blocked": true}))
        );
    }

    #[test]
    fn warehouse_form_parsing() {
        let req = CreateWarehouseRequest::from_form(" Склад №1 ", "a@b.ru, ,c@d.ru", "");
        assert_eq!(req.name, "Склад №1");
        assert_eq!(req.notification_emails, vec!["a@b.ru", "c@d.ru"]);
        assert_eq!(req.low_stock_default, 1);
    }

    #[test]
    fn auth_response_requires_ok_and_token() {
        let ok: AuthResponse = serde_json::from_value(json!({"ok": true, "token": "t"})).unwrap();
        let no_ok: AuthResponse =
            serde_json::from_value(json!({"ok": false, "token": "t"})).unwrap();
        let empty: AuthResponse = serde_json::from_value(json!({"ok": true, "token": ""})).unwrap();
        assert_eq!(ok.token(), Some("t"));
        assert_eq!(no_ok.token(), None);
        assert_eq!(empty.token(), None);
    }

    #[test]
    fn export_paths_and_filenames() {
        assert_eq!(ExportKind::Items.path("w1"), "/export/items/w1");
        assert_eq!(ExportKind::Supplies.filename("w1"), "supplies_w1.csv");
    }

    #[test]
    fn notifications_query() {
        let req = ListNotifications {
            unread_only: true,
            limit: 200,
        };
        assert_eq!(req.path(), "/notifications/list?unread_only=true&limit=200");
    }
}
