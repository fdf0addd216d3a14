//! 面板外壳：导航、标题与面包屑、用户信息
use leptos::prelude::*;
use sklad_shared::View;
use sklad_shared::refresh::Section;

use crate::auth::{logout, use_auth};
use crate::components::notifications::NotificationBell;
use crate::context::use_panel;
use crate::web::router::{Link, use_router};

#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let ctx = use_panel();
    let auth = use_auth();
    let router = use_router();
    let current = router.current_view();
    let role = auth.role();

    let crumb = move || {
        let view = current.get();
        ctx.revisions.track(Section::Warehouses);
        match ctx.panel().warehouses.current_id() {
            Some(wid) => view.crumb().replace("{warehouse_id}", &wid),
            None => view.crumb().to_string(),
        }
    };

    let on_logout = move |_| {
        let panel = ctx.panel();
        logout(auth, &panel);
        // 路由服务监听认证状态并跳转到登录页
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-xl px-4">
                <div class="flex-1 gap-2">
                    <span class="text-xl font-bold">"Sklad"</span>
                    <span class=move || if ctx.dev.get() { "badge badge-warning" } else { "badge badge-ghost" }>
                        {move || if ctx.dev.get() { "dev" } else { "prod" }}
                    </span>
                </div>
                <div class="flex-none gap-3">
                    <NotificationBell />
                    <div class="text-right leading-tight hidden md:block">
                        <div class="font-semibold">{move || auth.login_name().get()}</div>
                        <div class="text-xs opacity-60">
                            {move || role.get().map(|r| r.as_str()).unwrap_or_default()}
                        </div>
                    </div>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                        "Выйти"
                    </button>
                </div>
            </div>

            <div class="flex flex-col md:flex-row gap-4 p-4 md:p-8 max-w-7xl mx-auto">
                <ul class="menu bg-base-100 rounded-box shadow w-full md:w-56 shrink-0">
                    {View::NAV
                        .into_iter()
                        .map(|view| {
                            view! {
                                <Show when=move || view.visible_for(role.get())>
                                    <li>
                                        <Link
                                            to=view
                                            class={if current.get_untracked() == view { "active" } else { "" }}
                                        >
                                            {view.title()}
                                        </Link>
                                    </li>
                                </Show>
                            }
                        })
                        .collect_view()}
                </ul>

                <main class="flex-1 space-y-4 min-w-0">
                    <div>
                        <h1 class="text-2xl font-bold">{move || current.get().title()}</h1>
                        <p class="font-mono text-xs opacity-50">{crumb}</p>
                    </div>
                    {children()}
                </main>
            </div>
        </div>
    }
}
