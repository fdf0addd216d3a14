//! 商品视图
//!
//! 列表随筛选条件重新加载，搜索框防抖；库存徽章在客户端计算。
//! 页面可见时由 `lifecycle` 每 2 秒静默刷新。

use leptos::prelude::*;
use leptos::task::spawn_local;
use sklad_shared::config::SEARCH_DEBOUNCE;
use sklad_shared::protocol::{CreateItemRequest, ExportKind, StockOp, parse_int_or};
use sklad_shared::refresh::{Action, Section};
use sklad_shared::stock::{StockBadge, StockLevel};
use sklad_shared::{HistoryEntry, Item, SortOrder};

use crate::api::export_csv;
use crate::components::warehouses::WarehouseSelect;
use crate::context::{Modal, PanelContext, use_panel};
use crate::web::Debouncer;

fn badge_class(badge: &StockBadge) -> &'static str {
    match badge.level {
        StockLevel::Low => "badge badge-error",
        StockLevel::Warn => "badge badge-warning",
        StockLevel::Ok => "badge badge-success",
    }
}

fn update_filter(ctx: PanelContext, f: impl FnOnce(&mut sklad_shared::ItemFilter)) {
    ctx.item_filter.update(f);
    ctx.refresh(&[Section::Items]);
}

fn open_history(ctx: PanelContext, item: Item) {
    spawn_local(async move {
        let panel = ctx.panel();
        match panel.items.history(panel.api(), &item.id).await {
            Ok(entries) => ctx.open_modal(
                format!("История операций: {}", item.name),
                Modal::ItemHistory { entries },
            ),
            Err(e) => ctx.error(&e),
        }
    });
}

fn open_warehouse_history(ctx: PanelContext) {
    let Some(wid) = ctx.require_warehouse() else {
        return;
    };
    spawn_local(async move {
        let panel = ctx.panel();
        match panel.items.warehouse_history(panel.api(), &wid).await {
            Ok(entries) => ctx.open_modal("История склада", Modal::WarehouseHistory { entries }),
            Err(e) => ctx.error(&e),
        }
    });
}

fn open_low_stock(ctx: PanelContext) {
    let Some(wid) = ctx.require_warehouse() else {
        return;
    };
    spawn_local(async move {
        let panel = ctx.panel();
        match panel.items.low_stock(panel.api(), &wid).await {
            Ok(items) => ctx.open_modal("Низкий остаток", Modal::LowStock { items }),
            Err(e) => ctx.error(&e),
        }
    });
}

pub(crate) fn export(ctx: PanelContext, kind: ExportKind) {
    let Some(wid) = ctx.require_warehouse() else {
        return;
    };
    spawn_local(async move {
        let panel = ctx.panel();
        if let Err(e) = export_csv(&panel, kind, &wid).await {
            ctx.error(&e);
        }
    });
}

#[component]
pub fn ItemsPage() -> impl IntoView {
    let ctx = use_panel();
    let filter = ctx.item_filter;
    let debouncer = Debouncer::new(SEARCH_DEBOUNCE);

    let rows = move || {
        ctx.revisions.track(Section::Items);
        ctx.revisions.track(Section::Warehouses);
        let panel = ctx.panel();
        let warehouse = panel.warehouses.current();
        panel
            .items
            .list()
            .into_iter()
            .map(|item| {
                let badge = StockBadge::for_item(&item, warehouse.as_ref());
                (item, badge)
            })
            .collect::<Vec<_>>()
    };
    let categories = move || {
        ctx.revisions.track(Section::Items);
        ctx.panel().items.categories()
    };

    let on_search = move |ev| {
        let value = event_target_value(&ev);
        filter.update(|f| f.search = value);
        debouncer.call(move || ctx.refresh(&[Section::Items]));
    };

    let on_create = move |_| {
        if ctx.require_warehouse().is_some() {
            ctx.open_modal("Новый товар", Modal::CreateItem);
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex flex-wrap items-center gap-2 p-6 pb-2">
                    <WarehouseSelect reload=&[Section::Items] />
                    <input
                        type="search"
                        placeholder="Поиск"
                        class="input input-bordered input-sm w-40"
                        on:input=on_search
                        prop:value=move || filter.with(|f| f.search.clone())
                    />
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            update_filter(ctx, |f| f.category = value);
                        }
                    >
                        <option value="">"Все категории"</option>
                        <For
                            each=categories
                            key=|c| c.clone()
                            children=move |c| view! { <option value=c.clone()>{c.clone()}</option> }
                        />
                    </select>
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            let sort = sklad_shared::filter::ItemSort::parse(&event_target_value(&ev));
                            update_filter(ctx, |f| f.sort = sort);
                        }
                    >
                        <option value="">"Без сортировки"</option>
                        <option value="name">"Название"</option>
                        <option value="count">"Остаток"</option>
                        <option value="category">"Категория"</option>
                        <option value="created_at">"Создан"</option>
                        <option value="updated_at">"Обновлён"</option>
                    </select>
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            let order = SortOrder::parse(&event_target_value(&ev));
                            update_filter(ctx, |f| f.order = order);
                        }
                    >
                        <option value="">"↕"</option>
                        <option value="asc">"↑"</option>
                        <option value="desc">"↓"</option>
                    </select>
                    <label class="label cursor-pointer gap-2">
                        <input
                            type="checkbox"
                            class="checkbox checkbox-sm"
                            prop:checked=move || filter.with(|f| f.low_only)
                            on:change=move |ev| {
                                let checked = event_target_checked(&ev);
                                update_filter(ctx, |f| f.low_only = checked);
                            }
                        />
                        <span class="label-text">"Только мало"</span>
                    </label>
                </div>

                <div class="flex flex-wrap gap-2 px-6 pb-2">
                    <button class="btn btn-primary btn-sm" on:click=on_create>"+ Товар"</button>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| open_warehouse_history(ctx)>
                        "История склада"
                    </button>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| open_low_stock(ctx)>
                        "Низкий остаток"
                    </button>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| export(ctx, ExportKind::Items)>
                        "Экспорт CSV"
                    </button>
                </div>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Товар"</th>
                                <th class="hidden md:table-cell">"Категория"</th>
                                <th>"Остаток"</th>
                                <th>"Статус"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || rows().is_empty()>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">
                                        "Товаров нет"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=rows
                                key=|(item, _)| (item.id.clone(), item.count, item.low_limit)
                                children=move |(item, badge)| {
                                    let count = format!("{} {}", item.count, item.unit());
                                    let category = item.category().to_string();
                                    let (income, outcome, history) = (item.clone(), item.clone(), item.clone());
                                    view! {
                                        <tr>
                                            <td class="font-semibold">{item.name.clone()}</td>
                                            <td class="hidden md:table-cell">
                                                <span class="badge badge-ghost">{category}</span>
                                            </td>
                                            <td>{count}</td>
                                            <td>
                                                <span class=badge_class(&badge) data-level=badge.level.class()>
                                                    {badge.label.clone()}
                                                </span>
                                            </td>
                                            <td class="flex gap-1 justify-end">
                                                <button
                                                    class="btn btn-success btn-xs"
                                                    on:click=move |_| ctx.open_modal(
                                                        "Приход",
                                                        Modal::StockOperation { item: income.clone(), op: StockOp::Income },
                                                    )
                                                >
                                                    "+"
                                                </button>
                                                <button
                                                    class="btn btn-warning btn-xs"
                                                    on:click=move |_| ctx.open_modal(
                                                        "Расход",
                                                        Modal::StockOperation { item: outcome.clone(), op: StockOp::Outcome },
                                                    )
                                                >
                                                    "−"
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click=move |_| open_history(ctx, history.clone())
                                                >
                                                    "История"
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
pub fn CreateItemForm() -> impl IntoView {
    let ctx = use_panel();
    let name = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let unit = RwSignal::new(String::new());
    let count = RwSignal::new("0".to_string());
    let low_limit = RwSignal::new(String::new());

    let categories = move || {
        ctx.revisions.track(Section::Items);
        ctx.panel().items.categories()
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(wid) = ctx.require_warehouse() else {
            return;
        };
        let req = CreateItemRequest::from_form(
            &wid,
            &name.get_untracked(),
            &category.get_untracked(),
            &unit.get_untracked(),
            &count.get_untracked(),
            &low_limit.get_untracked(),
        );
        ctx.submit(Action::ItemCreated, move |panel| async move {
            panel.items.create(panel.api(), &req?).await?;
            Ok("Товар добавлен".to_string())
        });
    };

    view! {
        <form class="space-y-2" on:submit=on_submit>
            <label class="label"><span class="label-text">"Название"</span></label>
            <input required class="input input-bordered w-full"
                on:input=move |ev| name.set(event_target_value(&ev)) prop:value=name />

            <label class="label"><span class="label-text">"Категория"</span></label>
            <input class="input input-bordered w-full" list="item-categories" placeholder="other"
                on:input=move |ev| category.set(event_target_value(&ev)) prop:value=category />
            <datalist id="item-categories">
                <For each=categories key=|c| c.clone() children=move |c| view! { <option value=c /> } />
            </datalist>

            <label class="label"><span class="label-text">"Ед. измерения"</span></label>
            <input class="input input-bordered w-full" placeholder="шт"
                on:input=move |ev| unit.set(event_target_value(&ev)) prop:value=unit />

            <label class="label"><span class="label-text">"Начальный остаток"</span></label>
            <input type="number" min="0" class="input input-bordered w-full"
                on:input=move |ev| count.set(event_target_value(&ev)) prop:value=count />

            <label class="label"><span class="label-text">"Порог low-stock (опц.)"</span></label>
            <input type="number" min="0" class="input input-bordered w-full" placeholder="например 2"
                on:input=move |ev| low_limit.set(event_target_value(&ev)) prop:value=low_limit />

            <div class="modal-action">
                <button type="button" class="btn btn-ghost" on:click=move |_| ctx.close_modal()>"Отмена"</button>
                <button type="submit" class="btn btn-primary">"Создать"</button>
            </div>
        </form>
    }
}

#[component]
pub fn StockOperationForm(item: Item, op: StockOp) -> impl IntoView {
    let ctx = use_panel();
    let amount = RwSignal::new("1".to_string());
    let item_id = item.id.clone();

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let item_id = item_id.clone();
        let parsed = parse_int_or(&amount.get_untracked(), 1);
        ctx.submit(Action::StockOperation, move |panel| async move {
            panel.items.operate(panel.api(), op, &item_id, parsed?).await?;
            Ok("Операция выполнена".to_string())
        });
    };

    view! {
        <form class="space-y-2" on:submit=on_submit>
            <p class="text-base-content/70">{item.name.clone()} " · " {format!("{} {}", item.count, item.unit())}</p>
            <label class="label"><span class="label-text">"Количество"</span></label>
            <input type="number" min="1" class="input input-bordered w-full"
                on:input=move |ev| amount.set(event_target_value(&ev)) prop:value=amount />
            <div class="modal-action">
                <button type="button" class="btn btn-ghost" on:click=move |_| ctx.close_modal()>"Отмена"</button>
                <button type="submit" class="btn btn-primary">"Подтвердить"</button>
            </div>
        </form>
    }
}

/// 历史记录表；仓库历史多一列商品名
#[component]
pub fn HistoryTable(entries: Vec<HistoryEntry>, show_item: bool) -> impl IntoView {
    if entries.is_empty() {
        return view! { <p class="text-base-content/50">"Пока пусто"</p> }.into_any();
    }

    view! {
        <div class="overflow-x-auto max-h-96">
            <table class="table table-sm table-zebra">
                <thead>
                    <tr>
                        {show_item.then(|| view! { <th>"Товар"</th> })}
                        <th>"Операция"</th>
                        <th>"Кол-во"</th>
                        <th>"Время"</th>
                        <th>"Комментарий"</th>
                    </tr>
                </thead>
                <tbody>
                    {entries
                        .into_iter()
                        .map(|h| {
                            let when = h.ts.map(|t| t.to_display()).unwrap_or_default();
                            view! {
                                <tr>
                                    {show_item.then(|| view! { <td>{h.item_name.clone().unwrap_or_default()}</td> })}
                                    <td><span class="badge badge-outline">{h.kind.clone()}</span></td>
                                    <td>{h.amount}</td>
                                    <td class="text-xs opacity-70">{when}</td>
                                    <td class="text-sm">{h.note.clone().unwrap_or_default()}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
pub fn LowStockList(items: Vec<Item>) -> impl IntoView {
    if items.is_empty() {
        return view! { <p class="text-base-content/50">"Всё ок 🙂"</p> }.into_any();
    }

    view! {
        <ul class="divide-y divide-base-200">
            {items
                .into_iter()
                .map(|i| view! {
                    <li class="flex justify-between py-2">
                        <span>{i.name.clone()}</span>
                        <span><b>{i.count}</b> " " {i.unit().to_string()}</span>
                    </li>
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}
