//! Sklad 管理面板前端
//!
//! 采用 Context-Driven 架构：
//! - `web`: 浏览器原生 API 的轻量封装（fetch、LocalStorage、定时器、History）
//! - `api`: 共享层 `Panel` 在浏览器中的装配
//! - `auth`: 认证状态镜像
//! - `context`: 缓存版本号、筛选条件、提示条与模态框
//! - `lifecycle`: 启动、按视图加载与轮询
//! - `components`: UI 组件层

mod api;
mod auth;
mod context;
mod lifecycle;
mod components {
    pub mod companies;
    pub mod dashboard;
    pub mod dev_console;
    pub mod employees;
    pub mod items;
    pub mod login;
    pub mod modal;
    pub mod notifications;
    pub mod shell;
    pub mod supplies;
    pub mod toast;
    pub mod warehouses;
}

use leptos::prelude::*;
use sklad_shared::View;

use crate::api::build_panel;
use crate::auth::AuthContext;
use crate::components::companies::CompaniesPage;
use crate::components::dashboard::DashboardPage;
use crate::components::dev_console::DevConsolePage;
use crate::components::employees::EmployeesPage;
use crate::components::items::ItemsPage;
use crate::components::login::{LoginPage, RegisterPage};
use crate::components::modal::ModalHost;
use crate::components::shell::Shell;
use crate::components::supplies::SuppliesPage;
use crate::components::toast::ToastHost;
use crate::components::warehouses::WarehousesPage;
use crate::context::PanelContext;
use crate::lifecycle::{ViewLifecycle, boot};

// 原生 Web API 封装模块
pub(crate) mod web {
    mod document;
    mod download;
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use document::{confirm, is_foreground, now_ms, set_title};
    pub use download::save_bytes;
    pub use http::FetchTransport;
    pub use storage::BrowserStorage;
    pub use timer::{Debouncer, Interval, wait};
}

use web::router::{Router, RouterOutlet};

/// 路由匹配函数
fn route_matcher(view: View) -> AnyView {
    match view {
        View::Auth => view! { <LoginPage /> }.into_any(),
        View::Register => view! { <RegisterPage /> }.into_any(),
        View::Dashboard => view! { <Shell><DashboardPage /></Shell> }.into_any(),
        View::Warehouses => view! { <Shell><WarehousesPage /></Shell> }.into_any(),
        View::Items => view! { <Shell><ItemsPage /></Shell> }.into_any(),
        View::Supplies => view! { <Shell><SuppliesPage /></Shell> }.into_any(),
        View::Employees => view! { <Shell><EmployeesPage /></Shell> }.into_any(),
        View::RootCompanies => view! { <Shell><CompaniesPage /></Shell> }.into_any(),
        View::DevConsole => view! { <DevConsolePage /> }.into_any(),
        View::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Страница не найдена"</p>
                    <a href="/" class="btn btn-link mt-2">"На главную"</a>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 装配面板，并从会话初始化认证上下文
    let panel = build_panel();
    let auth_ctx = AuthContext::new();
    auth_ctx.sync(&panel);
    provide_context(auth_ctx);

    // 2. 面板上下文
    let ctx = PanelContext::new(panel, auth_ctx);
    provide_context(ctx);

    // 3. 读取 /meta，启动通知轮询
    boot(ctx);

    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <ViewLifecycle />
            <RouterOutlet matcher=route_matcher />
            <ModalHost />
            <ToastHost />
        </Router>
    }
}
