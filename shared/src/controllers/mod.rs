//! 实体控制器
//!
//! 每个控制器持有自己的缓存（单线程内部可变），`Panel` 负责跨控制器的编排：
//! 登录/注销、启动、以及变更后的联动刷新。

pub mod companies;
pub mod dashboard;
pub mod employees;
pub mod items;
pub mod notifications;
pub mod supplies;
pub mod warehouses;

use std::cell::Cell;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::filter::{ItemFilter, SupplyFilter};
use crate::poll::should_poll_items;
use crate::protocol::{LoginRequest, MetaRequest, RegisterCeoRequest};
use crate::refresh::Section;
use crate::session::Session;
use crate::transport::Transport;
use crate::{Role, Timestamp, View};

use companies::CompanyController;
use dashboard::DashboardController;
use employees::EmployeeController;
use items::ItemController;
use notifications::NotificationController;
use supplies::SupplyController;
use warehouses::WarehouseController;

/// 刷新时使用的筛选条件
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub items: ItemFilter,
    pub supplies: SupplyFilter,
}

/// 一次联动刷新的结果
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub errors: Vec<(Section, ApiError)>,
    /// 通知轮询发现的新增未读数
    pub new_notifications: Option<usize>,
}

pub struct Panel<T: Transport> {
    api: ApiClient<T>,
    pub warehouses: WarehouseController,
    pub items: ItemController,
    pub supplies: SupplyController,
    pub employees: EmployeeController,
    pub companies: CompanyController,
    pub dashboard: DashboardController,
    pub notifications: NotificationController,
    dev: Cell<bool>,
}

impl<T: Transport> Panel<T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Self {
            api,
            warehouses: WarehouseController::default(),
            items: ItemController::default(),
            supplies: SupplyController::default(),
            employees: EmployeeController::default(),
            companies: CompanyController::default(),
            dashboard: DashboardController::default(),
            notifications: NotificationController::default(),
            dev: Cell::new(false),
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.session().role())
    }

    pub fn is_dev(&self) -> bool {
        self.dev.get()
    }

    // =========================================================
    // 会话
    // =========================================================

    /// 读取 `/meta`（失败时视为开发模式），返回初始视图
    pub async fn boot(&self) -> View {
        let dev = match self.api.call(&MetaRequest).await {
            Ok(meta) => meta.dev,
            Err(e) => {
                log::warn!("meta unavailable, assuming dev: {e}");
                true
            }
        };
        self.dev.set(dev);

        if self.session().is_authenticated() {
            View::auth_success_redirect()
        } else {
            View::auth_failure_redirect()
        }
    }

    /// 登录成功后持久化身份并返回跳转目标；失败时会话保持不变
    pub async fn login(&self, login: &str, password: &str) -> ApiResult<View> {
        let resp = self
            .api
            .call(&LoginRequest {
                login: login.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        let token = resp
            .token()
            .ok_or_else(|| ApiError::Auth("Auth failed".to_string()))?;
        let role = resp.role.as_deref().unwrap_or_default();
        self.session().set_auth(token, role, login.trim());
        log::info!("logged in as {}", login.trim());
        Ok(View::auth_success_redirect())
    }

    pub async fn register_ceo(&self, req: &RegisterCeoRequest) -> ApiResult<View> {
        let resp = self.api.call(req).await?;
        let token = resp
            .token()
            .ok_or_else(|| ApiError::Auth("Register failed".to_string()))?;
        self.session()
            .set_auth(token, Role::Ceo.as_str(), &req.login);
        Ok(View::auth_success_redirect())
    }

    pub fn logout(&self) -> View {
        self.session().clear_auth();
        self.notifications.clear();
        View::auth_failure_redirect()
    }

    /// 已登录时收到 401 说明 token 失效：清除会话并返回登录页
    pub fn expire_on(&self, err: &ApiError) -> Option<View> {
        if err.is_unauthorized() && self.session().is_authenticated() {
            log::info!("session expired: {err}");
            Some(self.logout())
        } else {
            None
        }
    }

    // =========================================================
    // 加载
    // =========================================================

    /// 返回当前仓库；仓库缓存为空时先加载列表
    pub async fn ensure_warehouse(&self) -> ApiResult<Option<String>> {
        if self.warehouses.is_empty() {
            self.warehouses.load(&self.api).await?;
        }
        Ok(self.warehouses.current_id())
    }

    /// 没有任何仓库时不做任何事
    pub async fn load_items(&self, filter: &ItemFilter) -> ApiResult<()> {
        let Some(wid) = self.ensure_warehouse().await? else {
            return Ok(());
        };
        self.items.load(&self.api, &wid, filter).await
    }

    pub async fn load_supplies(&self, filter: &SupplyFilter, now: Timestamp) -> ApiResult<()> {
        let Some(wid) = self.ensure_warehouse().await? else {
            return Ok(());
        };
        self.supplies
            .load(&self.api, &self.items, &wid, filter, now)
            .await
    }

    /// 商品列表的定时刷新，返回是否发出了请求
    pub async fn poll_items(
        &self,
        view_visible: bool,
        foreground: bool,
        filter: &ItemFilter,
    ) -> bool {
        if !should_poll_items(view_visible, self.items.is_loading(), foreground) {
            return false;
        }
        let Some(wid) = self.warehouses.current_id() else {
            return false;
        };
        self.items.poll(&self.api, &wid, filter).await
    }

    fn load_section<'a>(
        &'a self,
        section: Section,
        filters: &'a Filters,
        now: Timestamp,
        announce: bool,
    ) -> LocalBoxFuture<'a, (Section, ApiResult<Option<usize>>)> {
        async move {
            let result = match section {
                Section::Warehouses => self.warehouses.load(&self.api).await.map(|_| None),
                Section::Items => self.load_items(&filters.items).await.map(|_| None),
                Section::Supplies => self.load_supplies(&filters.supplies, now).await.map(|_| None),
                Section::Employees => self.employees.load(&self.api).await.map(|_| None),
                Section::Companies => self.companies.load(&self.api).await.map(|_| None),
                Section::Dashboard => self.dashboard.load(&self.api).await.map(|_| None),
                Section::Notifications => Ok(self.notifications.refresh(&self.api, announce).await),
            };
            (section, result)
        }
        .boxed_local()
    }

    /// 并发刷新多个区块，收集各自的错误
    pub async fn refresh(
        &self,
        sections: &[Section],
        filters: &Filters,
        now: Timestamp,
        announce: bool,
    ) -> RefreshReport {
        let tasks = sections
            .iter()
            .map(|s| self.load_section(*s, filters, now, announce));

        let mut report = RefreshReport::default();
        for (section, result) in join_all(tasks).await {
            match result {
                Ok(Some(delta)) => report.new_notifications = Some(delta),
                Ok(None) => {}
                Err(e) => report.errors.push((section, e)),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests;
