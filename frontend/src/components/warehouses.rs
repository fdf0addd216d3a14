//! 仓库列表、新建表单与仓库选择器
use leptos::prelude::*;
use sklad_shared::protocol::CreateWarehouseRequest;
use sklad_shared::refresh::{Action, Section};

use crate::auth::use_auth;
use crate::context::{Modal, use_panel};
use crate::web::confirm;

/// 商品与供货视图共用的当前仓库选择器
#[component]
pub fn WarehouseSelect(
    /// 切换后需要重新加载的区块
    reload: &'static [Section],
) -> impl IntoView {
    let ctx = use_panel();

    let options = move || {
        ctx.revisions.track(Section::Warehouses);
        ctx.panel().warehouses.list()
    };
    let current = move || {
        ctx.revisions.track(Section::Warehouses);
        ctx.panel().warehouses.current_id().unwrap_or_default()
    };

    let on_change = move |ev| {
        let id = event_target_value(&ev);
        ctx.panel().warehouses.select(&id);
        ctx.revisions.bump(Section::Warehouses);
        ctx.refresh(reload);
    };

    view! {
        <select class="select select-bordered select-sm" on:change=on_change prop:value=current>
            <For
                each=options
                key=|w| w.id.clone()
                children=move |w| {
                    let label = if w.is_blocked() { format!("{} (заблокирован)", w.name) } else { w.name.clone() };
                    view! { <option value=w.id.clone()>{label}</option> }
                }
            />
        </select>
    }
}

#[component]
pub fn WarehousesPage() -> impl IntoView {
    let ctx = use_panel();
    let auth = use_auth();
    let is_root = move || auth.role().get().is_some_and(|r| r.is_root());
    let (query, set_query) = signal(String::new());

    let rows = move || {
        ctx.revisions.track(Section::Warehouses);
        let panel = ctx.panel();
        query.with(|q| panel.warehouses.search(q))
    };

    let on_delete = move |id: String, name: String| {
        if !confirm(&format!("Удалить склад «{name}»?")) {
            return;
        }
        ctx.run(Action::WarehouseDeleted, move |panel| async move {
            panel.warehouses.delete(panel.api(), &id).await?;
            Ok("Склад удалён".to_string())
        });
    };

    let on_toggle_block = move |id: String, blocked: bool| {
        ctx.run(Action::WarehouseBlockToggled, move |panel| async move {
            panel.warehouses.set_blocked(panel.api(), &id, !blocked).await?;
            Ok(if blocked { "Склад разблокирован" } else { "Склад заблокирован" }.to_string())
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex flex-wrap items-center justify-between gap-2 p-6 pb-2">
                    <input
                        type="search"
                        placeholder="Поиск по названию"
                        class="input input-bordered input-sm w-full md:w-64"
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                        prop:value=query
                    />
                    <button
                        class="btn btn-primary btn-sm"
                        on:click=move |_| ctx.open_modal("Новый склад", Modal::CreateWarehouse)
                    >
                        "+ Склад"
                    </button>
                </div>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Название"</th>
                                <th class="hidden md:table-cell">"ID"</th>
                                <th class="hidden md:table-cell">"Email для уведомлений"</th>
                                <th>"Порог"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || rows().is_empty()>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">
                                        "Складов нет"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=rows
                                key=|w| (w.id.clone(), w.blocked_at)
                                children=move |w| {
                                    let blocked = w.is_blocked();
                                    let (id_del, name_del) = (w.id.clone(), w.name.clone());
                                    let id_block = w.id.clone();
                                    view! {
                                        <tr>
                                            <td class="font-semibold">
                                                {w.name.clone()}
                                                {blocked.then(|| view! { <span class="badge badge-error ml-2">"заблокирован"</span> })}
                                            </td>
                                            <td class="hidden md:table-cell font-mono text-xs opacity-60">{w.short_id().to_string()}</td>
                                            <td class="hidden md:table-cell text-sm">{w.notification_emails.join(", ")}</td>
                                            <td>{w.low_stock_default.unwrap_or(sklad_shared::config::FALLBACK_LOW_STOCK)}</td>
                                            <td class="flex gap-1 justify-end">
                                                <Show when=is_root>
                                                    {
                                                        let id_block = id_block.clone();
                                                        view! {
                                                            <button
                                                                class="btn btn-ghost btn-xs"
                                                                on:click=move |_| on_toggle_block(id_block.clone(), blocked)
                                                            >
                                                                {if blocked { "Разблокировать" } else { "Заблокировать" }}
                                                            </button>
                                                        }
                                                    }
                                                </Show>
                                                <button
                                                    class="btn btn-ghost btn-xs text-error"
                                                    on:click=move |_| on_delete(id_del.clone(), name_del.clone())
                                                >
                                                    "Удалить"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn CreateWarehouseForm() -> impl IntoView {
    let ctx = use_panel();
    let name = RwSignal::new(String::new());
    let emails = RwSignal::new(String::new());
    let low = RwSignal::new("1".to_string());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = CreateWarehouseRequest::from_form(
            &name.get_untracked(),
            &emails.get_untracked(),
            &low.get_untracked(),
        );
        ctx.submit(Action::WarehouseCreated, move |panel| async move {
            panel.warehouses.create(panel.api(), &req).await?;
            Ok("Склад создан".to_string())
        });
    };

    view! {
        <form class="space-y-4" on:submit=on_submit>
            <div class="form-control">
                <label class="label"><span class="label-text">"Название"</span></label>
                <input required class="input input-bordered w-full"
                    on:input=move |ev| name.set(event_target_value(&ev)) prop:value=name />
            </div>
            <div class="form-control">
                <label class="label"><span class="label-text">"Email для уведомлений (через запятую)"</span></label>
                <input class="input input-bordered w-full" placeholder="a@example.com, b@example.com"
                    on:input=move |ev| emails.set(event_target_value(&ev)) prop:value=emails />
            </div>
            <div class="form-control">
                <label class="label"><span class="label-text">"Порог «мало» по умолчанию"</span></label>
                <input type="number" min="0" class="input input-bordered w-full"
                    on:input=move |ev| low.set(event_target_value(&ev)) prop:value=low />
            </div>
            <div class="modal-action">
                <button type="submit" class="btn btn-primary">"Создать"</button>
            </div>
        </form>
    }
}
