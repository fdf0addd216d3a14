//! 供货视图：卡片列表、状态切换与新建表单
use leptos::prelude::*;
use leptos::task::spawn_local;
use sklad_shared::config::SEARCH_DEBOUNCE;
use sklad_shared::controllers::supplies::NewSupply;
use sklad_shared::filter::SupplySort;
use sklad_shared::protocol::{ExportKind, parse_int_or};
use sklad_shared::refresh::{Action, Section};
use sklad_shared::{Item, SortOrder, SupplyFilter, SupplyStatus};

use crate::components::items::export;
use crate::components::warehouses::WarehouseSelect;
use crate::context::{Modal, PanelContext, use_panel};
use crate::web::Debouncer;

fn status_badge(status: SupplyStatus) -> &'static str {
    match status {
        SupplyStatus::Done => "badge badge-success",
        SupplyStatus::Canceled => "badge badge-error",
        SupplyStatus::Waiting => "badge badge-warning",
    }
}

fn update_filter(ctx: PanelContext, f: impl FnOnce(&mut SupplyFilter)) {
    ctx.supply_filter.update(f);
    ctx.refresh(&[Section::Supplies]);
}

fn set_status(ctx: PanelContext, supply_id: String, status: SupplyStatus) {
    ctx.run(Action::SupplyStatusChanged, move |panel| async move {
        panel.supplies.set_status(panel.api(), &supply_id, status).await?;
        Ok("Статус обновлён".to_string())
    });
}

/// 新建表单需要完整的商品列表，先拉取再打开
fn open_create(ctx: PanelContext) {
    let Some(wid) = ctx.require_warehouse() else {
        return;
    };
    spawn_local(async move {
        let panel = ctx.panel();
        match panel.items.fetch_for_form(panel.api(), &wid).await {
            Ok(items) => ctx.open_modal("Запланировать поставку", Modal::CreateSupply { items }),
            Err(e) => ctx.error(&e),
        }
    });
}

#[component]
pub fn SuppliesPage() -> impl IntoView {
    let ctx = use_panel();
    let filter = ctx.supply_filter;
    let debouncer = Debouncer::new(SEARCH_DEBOUNCE);

    let cards = move || {
        ctx.revisions.track(Section::Supplies);
        ctx.panel().supplies.list()
    };

    let on_search = move |ev| {
        let value = event_target_value(&ev);
        filter.update(|f| f.search = value);
        debouncer.call(move || ctx.refresh(&[Section::Supplies]));
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex flex-wrap items-center gap-2">
                    <WarehouseSelect reload=&[Section::Supplies] />
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
                            let status = SupplyStatus::parse(&event_target_value(&ev));
                            update_filter(ctx, |f| f.status = status);
                        }
                    >
                        <option value="">"Все статусы"</option>
                        {SupplyStatus::ALL
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                            .collect_view()}
                    </select>
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            let sort = SupplySort::parse(&event_target_value(&ev));
                            update_filter(ctx, |f| f.sort = sort);
                        }
                    >
                        <option value="">"Без сортировки"</option>
                        <option value="expected_at">"Дата поставки"</option>
                        <option value="created_at">"Создана"</option>
                        <option value="updated_at">"Обновлена"</option>
                        <option value="amount">"Количество"</option>
                        <option value="status">"Статус"</option>
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
                            prop:checked=move || filter.with(|f| f.overdue_only)
                            on:change=move |ev| {
                                let checked = event_target_checked(&ev);
                                update_filter(ctx, |f| f.overdue_only = checked);
                            }
                        />
                        <span class="label-text">"Только просроченные"</span>
                    </label>
                    <div class="flex-1"></div>
                    <button class="btn btn-primary btn-sm" on:click=move |_| open_create(ctx)>
                        "+ Поставка"
                    </button>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| export(ctx, ExportKind::Supplies)>
                        "Экспорт CSV"
                    </button>
                </div>
            </div>
        </div>

        <Show when=move || cards().is_empty()>
            <p class="text-center py-8 text-base-content/50">"Поставок нет"</p>
        </Show>

        <div class="grid md:grid-cols-2 xl:grid-cols-3 gap-4">
            <For
                each=cards
                key=|s| (s.id.clone(), s.status, s.item_name.clone(), s.overdue)
                children=move |s| {
                    let when = s.expected_at.map(|t| t.to_display()).unwrap_or_default();
                    let id = s.id.clone();
                    let current = s.status;
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body p-4 gap-2">
                                <div class="flex justify-between items-start">
                                    <span class="font-bold">{s.title().to_string()}</span>
                                    <div class="flex gap-1">
                                        {s.is_overdue().then(|| view! { <span class="badge badge-error">"overdue"</span> })}
                                        <span class=status_badge(s.status)>{s.status.as_str()}</span>
                                    </div>
                                </div>
                                <div class="text-sm">"Кол-во: " <b>{s.amount}</b></div>
                                <div class="text-sm">"Ожидается: " {when}</div>
                                {s.note.clone().map(|n| view! { <p class="text-sm opacity-70">{n}</p> })}
                                <div class="card-actions">
                                    {SupplyStatus::ALL
                                        .into_iter()
                                        .map(|status| {
                                            let id = id.clone();
                                            view! {
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    disabled={current == status}
                                                    on:click=move |_| set_status(ctx, id.clone(), status)
                                                >
                                                    {status.as_str()}
                                                </button>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
pub fn CreateSupplyForm(items: Vec<Item>) -> impl IntoView {
    let ctx = use_panel();
    let item_id = RwSignal::new(items.first().map(|i| i.id.clone()).unwrap_or_default());
    let amount = RwSignal::new("1".to_string());
    let expected_at = RwSignal::new(String::new());
    let note = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(wid) = ctx.require_warehouse() else {
            return;
        };
        let parsed = parse_int_or(&amount.get_untracked(), 1);
        let (item, date, comment) = (
            item_id.get_untracked(),
            expected_at.get_untracked(),
            note.get_untracked(),
        );
        ctx.submit(Action::SupplyCreated, move |panel| async move {
            let form = NewSupply {
                item_id: item,
                amount: parsed?,
                expected_at: date,
                note: comment,
            };
            panel.supplies.create(panel.api(), &wid, form).await?;
            Ok("Поставка создана".to_string())
        });
    };

    view! {
        <form class="space-y-2" on:submit=on_submit>
            <label class="label"><span class="label-text">"Товар"</span></label>
            <select class="select select-bordered w-full"
                on:change=move |ev| item_id.set(event_target_value(&ev)) prop:value=item_id>
                {items
                    .into_iter()
                    .map(|i| view! { <option value=i.id.clone()>{i.name.clone()}</option> })
                    .collect_view()}
            </select>

            <label class="label"><span class="label-text">"Количество"</span></label>
            <input type="number" min="1" class="input input-bordered w-full"
                on:input=move |ev| amount.set(event_target_value(&ev)) prop:value=amount />

            <label class="label"><span class="label-text">"Дата/время поставки"</span></label>
            <input type="datetime-local" class="input input-bordered w-full"
                on:input=move |ev| expected_at.set(event_target_value(&ev)) prop:value=expected_at />

            <label class="label"><span class="label-text">"Комментарий (опц.)"</span></label>
            <input class="input input-bordered w-full" placeholder="поставка от поставщика №2"
                on:input=move |ev| note.set(event_target_value(&ev)) prop:value=note />

            <div class="modal-action">
                <button type="button" class="btn btn-ghost" on:click=move |_| ctx.close_modal()>"Отмена"</button>
                <button type="submit" class="btn btn-primary">"Создать"</button>
            </div>
        </form>
    }
}
