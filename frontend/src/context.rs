//! 面板上下文
//!
//! 控制器缓存保存在 `Panel` 内（单线程内部可变），界面通过每个区块一个的
//! 版本号信号感知缓存变化：加载完成后递增版本号，读缓存的视图先订阅版本号。
//!
//! 筛选条件、提示条与模态框是普通的 Leptos 信号。

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use sklad_shared::config::TOAST_LIFETIME;
use sklad_shared::controllers::Filters;
use sklad_shared::modal::ModalSlot;
use sklad_shared::protocol::StockOp;
use sklad_shared::refresh::{Action, Section};
use sklad_shared::toast::{ToastKind, ToastQueue};
use sklad_shared::{ApiError, ApiResult, Employee, HistoryEntry, Item, ItemFilter, SupplyFilter};
use sklad_shared::{Timestamp, View};

use crate::api::AppPanel;
use crate::auth::AuthContext;
use crate::web::wait;

/// 每个区块一个版本号
#[derive(Clone, Copy)]
pub struct Revisions {
    warehouses: RwSignal<u64>,
    items: RwSignal<u64>,
    supplies: RwSignal<u64>,
    employees: RwSignal<u64>,
    companies: RwSignal<u64>,
    dashboard: RwSignal<u64>,
    notifications: RwSignal<u64>,
}

impl Revisions {
    fn new() -> Self {
        Self {
            warehouses: RwSignal::new(0),
            items: RwSignal::new(0),
            supplies: RwSignal::new(0),
            employees: RwSignal::new(0),
            companies: RwSignal::new(0),
            dashboard: RwSignal::new(0),
            notifications: RwSignal::new(0),
        }
    }

    fn signal(&self, section: Section) -> RwSignal<u64> {
        match section {
            Section::Warehouses => self.warehouses,
            Section::Items => self.items,
            Section::Supplies => self.supplies,
            Section::Employees => self.employees,
            Section::Companies => self.companies,
            Section::Dashboard => self.dashboard,
            Section::Notifications => self.notifications,
        }
    }

    /// 在响应式作用域中订阅区块
    pub fn track(&self, section: Section) {
        self.signal(section).track();
    }

    pub fn bump(&self, section: Section) {
        self.signal(section).update(|rev| *rev += 1);
    }
}

/// 模态框内容
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    CreateWarehouse,
    CreateItem,
    StockOperation { item: Item, op: StockOp },
    ItemHistory { entries: Vec<HistoryEntry> },
    WarehouseHistory { entries: Vec<HistoryEntry> },
    LowStock { items: Vec<Item> },
    CreateSupply { items: Vec<Item> },
    CreateEmployee,
    EditEmployee(Employee),
    Notifications,
}

#[derive(Clone, Copy)]
pub struct PanelContext {
    panel: StoredValue<Rc<AppPanel>, LocalStorage>,
    auth: AuthContext,
    pub revisions: Revisions,
    pub item_filter: RwSignal<ItemFilter>,
    pub supply_filter: RwSignal<SupplyFilter>,
    pub toasts: RwSignal<ToastQueue>,
    pub modal: RwSignal<ModalSlot<Modal>>,
    /// `/meta` 返回的 dev 标志
    pub dev: RwSignal<bool>,
}

impl PanelContext {
    pub fn new(panel: Rc<AppPanel>, auth: AuthContext) -> Self {
        Self {
            panel: StoredValue::new_local(panel),
            auth,
            revisions: Revisions::new(),
            item_filter: RwSignal::new(ItemFilter::default()),
            supply_filter: RwSignal::new(SupplyFilter::default()),
            toasts: RwSignal::new(ToastQueue::default()),
            modal: RwSignal::new(ModalSlot::default()),
            dev: RwSignal::new(false),
        }
    }

    pub fn panel(&self) -> Rc<AppPanel> {
        self.panel.get_value()
    }

    pub fn filters(&self) -> Filters {
        Filters {
            items: self.item_filter.get_untracked(),
            supplies: self.supply_filter.get_untracked(),
        }
    }

    // =========================================================
    // 提示条与模态框
    // =========================================================

    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let mut id = 0;
        self.toasts.update(|q| id = q.push(kind, message));
        let toasts = self.toasts;
        spawn_local(async move {
            wait(TOAST_LIFETIME).await;
            toasts.update(|q| q.dismiss(id));
        });
    }

    pub fn ok(&self, message: impl Into<String>) {
        self.toast(ToastKind::Good, message);
    }

    /// 错误提示；token 失效时同时注销，路由服务随后跳转到登录页
    pub fn error(&self, err: &ApiError) {
        log::warn!("action failed: {err}");
        self.toast(ToastKind::Bad, err.to_string());
        let panel = self.panel();
        if panel.expire_on(err).is_some() {
            self.close_modal();
            self.auth.sync(&panel);
        }
    }

    /// 当前仓库 ID；未选择时提示并返回 `None`
    pub fn require_warehouse(&self) -> Option<String> {
        let wid = self.panel().warehouses.current_id();
        if wid.is_none() {
            self.toast(ToastKind::Bad, "Сначала выбери склад");
        }
        wid
    }

    pub fn open_modal(&self, title: impl Into<String>, content: Modal) {
        self.modal.update(|m| m.open(title, content));
    }

    pub fn close_modal(&self) {
        self.modal.update(|m| m.close());
    }

    // =========================================================
    // 加载与联动刷新
    // =========================================================

    /// 并发刷新多个区块，完成后递增各自的版本号
    pub async fn reload(&self, sections: &[Section]) {
        let panel = self.panel();
        let report = panel
            .refresh(sections, &self.filters(), Timestamp::now(), false)
            .await;

        for section in sections {
            self.revisions.bump(*section);
        }
        // 商品与供货加载会顺带补齐仓库列表，供货回填可能加载商品缓存
        if sections.contains(&Section::Items) || sections.contains(&Section::Supplies) {
            self.revisions.bump(Section::Warehouses);
        }
        if sections.contains(&Section::Supplies) {
            self.revisions.bump(Section::Items);
        }

        for (section, err) in &report.errors {
            log::debug!("reload of {section:?} failed");
            self.error(err);
        }
    }

    pub fn refresh(&self, sections: &'static [Section]) {
        let ctx = *self;
        spawn_local(async move { ctx.reload(sections).await });
    }

    /// 进入视图时加载其数据
    pub fn load_view(&self, view: View) {
        let sections: &'static [Section] = match view {
            View::Dashboard => &[Section::Dashboard, Section::Warehouses],
            View::Warehouses => &[Section::Warehouses],
            View::Items => &[Section::Items],
            View::Supplies => &[Section::Supplies],
            View::Employees => &[Section::Employees],
            View::RootCompanies => &[Section::Companies],
            View::Auth | View::Register | View::DevConsole | View::NotFound => &[],
        };
        if !sections.is_empty() {
            self.refresh(sections);
        }
    }

    /// 执行一个变更操作：成功时提示并联动刷新，失败时提示错误
    ///
    /// `task` 返回成功提示文本。
    pub fn run<F, Fut>(&self, action: Action, task: F)
    where
        F: FnOnce(Rc<AppPanel>) -> Fut + 'static,
        Fut: Future<Output = ApiResult<String>> + 'static,
    {
        self.spawn_action(action, false, task);
    }

    /// 与 `run` 相同，成功后关闭模态框；失败时表单保持打开
    pub fn submit<F, Fut>(&self, action: Action, task: F)
    where
        F: FnOnce(Rc<AppPanel>) -> Fut + 'static,
        Fut: Future<Output = ApiResult<String>> + 'static,
    {
        self.spawn_action(action, true, task);
    }

    fn spawn_action<F, Fut>(&self, action: Action, close_modal: bool, task: F)
    where
        F: FnOnce(Rc<AppPanel>) -> Fut + 'static,
        Fut: Future<Output = ApiResult<String>> + 'static,
    {
        let ctx = *self;
        let panel = self.panel();
        spawn_local(async move {
            match task(panel).await {
                Ok(message) => {
                    if close_modal {
                        ctx.close_modal();
                    }
                    ctx.ok(message);
                    ctx.reload(action.dependents()).await;
                }
                Err(e) => ctx.error(&e),
            }
        });
    }
}

pub fn use_panel() -> PanelContext {
    use_context::<PanelContext>().expect("PanelContext should be provided")
}
