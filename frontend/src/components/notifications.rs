//! 通知铃铛与未读列表
use leptos::prelude::*;
use leptos::task::spawn_local;
use sklad_shared::refresh::{Action, Section};

use crate::context::{Modal, PanelContext, use_panel};

/// 打开前先刷新一次（不提示新增）
fn open(ctx: PanelContext) {
    spawn_local(async move {
        ctx.reload(&[Section::Notifications]).await;
        ctx.open_modal("Уведомления", Modal::Notifications);
    });
}

fn mark_read(ctx: PanelContext, id: String) {
    spawn_local(async move {
        let panel = ctx.panel();
        match panel.notifications.mark_read(panel.api(), &id).await {
            Ok(()) => ctx.reload(Action::NotificationRead.dependents()).await,
            Err(e) => log::debug!("mark read {id} failed: {e}"),
        }
    });
}

#[component]
pub fn NotificationBell() -> impl IntoView {
    let ctx = use_panel();
    let count = move || {
        ctx.revisions.track(Section::Notifications);
        ctx.panel().notifications.unread_count()
    };

    view! {
        <button class="btn btn-ghost btn-circle" title="Уведомления" on:click=move |_| open(ctx)>
            <div class="indicator">
                <svg xmlns="http://www.w3.org/2000/svg" class="h-5 w-5" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 17h5l-1.405-1.405A2.032 2.032 0 0118 14.158V11a6.002 6.002 0 00-4-5.659V5a2 2 0 10-4 0v.341C7.67 6.165 6 8.388 6 11v3.159c0 .538-.214 1.055-.595 1.436L4 17h5m6 0v1a3 3 0 11-6 0v-1m6 0H9" /></svg>
                <span class="badge badge-sm badge-primary indicator-item">{count}</span>
            </div>
        </button>
    }
}

/// 模态框中的未读列表，点击条目标记已读
#[component]
pub fn NotificationList() -> impl IntoView {
    let ctx = use_panel();
    let list = move || {
        ctx.revisions.track(Section::Notifications);
        ctx.panel().notifications.unread()
    };

    view! {
        <Show
            when=move || !list().is_empty()
            fallback=|| view! { <p class="text-base-content/50">"Пока пусто 🙂"</p> }
        >
            <ul class="space-y-2 max-h-96 overflow-y-auto">
                <For
                    each=list
                    key=|n| n.id.clone()
                    children=move |n| {
                        let id = n.id.clone();
                        let when = n.created_at.map(|t| t.to_display()).unwrap_or_default();
                        view! {
                            <li
                                class="p-3 rounded-box bg-base-200 cursor-pointer hover:bg-base-300"
                                on:click=move |_| mark_read(ctx, id.clone())
                            >
                                <div class="flex justify-between">
                                    <span class="font-bold">{n.title.clone().unwrap_or_else(|| "-".to_string())}</span>
                                    <span class="text-xs opacity-60">{when}</span>
                                </div>
                                <p class="text-sm opacity-80">{n.message.clone().unwrap_or_default()}</p>
                                {n.kind.clone().map(|k| view! { <span class="text-xs font-mono opacity-50">{k}</span> })}
                            </li>
                        }
                    }
                />
            </ul>
        </Show>
    }
}
