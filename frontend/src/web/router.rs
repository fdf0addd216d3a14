//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："请求 -> 守卫 -> 写入 History -> 更新视图信号"。

use leptos::prelude::*;
use sklad_shared::View;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn write_history(view: View, use_push: bool) {
    // NotFound 保留用户输入的地址
    if view == View::NotFound {
        return;
    }
    if use_push {
        push_history_state(view.to_path());
    } else {
        replace_history_state(view.to_path());
    }
}

/// 路由器服务
///
/// 通过注入的认证信号实现与会话的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_view: ReadSignal<View>,
    set_view: WriteSignal<View>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let initial = View::from_path(&current_path());
        let resolved = initial.resolve(is_authenticated.get_untracked());
        if resolved != initial {
            log::debug!("router: initial {initial} -> {resolved}");
            write_history(resolved, false);
        }
        let (current_view, set_view) = signal(resolved);

        Self {
            current_view,
            set_view,
            is_authenticated,
        }
    }

    /// 当前视图信号
    pub fn current_view(&self) -> ReadSignal<View> {
        self.current_view
    }

    /// **核心方法：导航与守卫**
    ///
    /// 已登录访问登录/注册页跳转到面板，未登录访问受保护视图跳转到登录页。
    pub fn navigate(&self, target: View) {
        self.navigate_to_view(target, true);
    }

    fn navigate_to_view(&self, target: View, use_push: bool) {
        let resolved = target.resolve(self.is_authenticated.get_untracked());
        if resolved != target {
            log::debug!("router: {target} redirected to {resolved}");
        }
        write_history(resolved, use_push);
        self.set_view.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_view = self.set_view;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = View::from_path(&current_path());
            // popstate 时也执行守卫逻辑
            let resolved = target.resolve(is_authenticated.get_untracked());
            if resolved != target {
                write_history(resolved, false);
            }
            set_view.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_view = self.current_view;
        let set_view = self.set_view;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let view = current_view.get_untracked();
            let resolved = view.resolve(is_auth);
            if resolved != view {
                log::debug!("router: auth changed ({is_auth}), {view} -> {resolved}");
                push_history_state(resolved.to_path());
                set_view.set(resolved);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前视图渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前视图，返回对应组件
    matcher: fn(View) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.current_view().get())
}

/// 导航链接
#[component]
pub fn Link(
    to: View,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
