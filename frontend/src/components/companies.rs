use leptos::prelude::*;
use sklad_shared::Company;
use sklad_shared::refresh::{Action, Section};

use crate::context::{PanelContext, use_panel};
use crate::web::confirm;

fn toggle_blocked(ctx: PanelContext, company: Company) {
    let blocked = company.is_blocked();
    ctx.run(Action::CompanyChanged, move |panel| async move {
        panel.companies.set_blocked(panel.api(), &company.id, !blocked).await?;
        Ok("Ок".to_string())
    });
}

fn delete(ctx: PanelContext, company: Company) {
    if !confirm(&format!("Удалить компанию \"{}\"?", company.name)) {
        return;
    }
    ctx.run(Action::CompanyChanged, move |panel| async move {
        panel.companies.delete(panel.api(), &company.id).await?;
        Ok("Компания удалена".to_string())
    });
}

/// 所有公司（仅 root）
#[component]
pub fn CompaniesPage() -> impl IntoView {
    let ctx = use_panel();

    let cards = move || {
        ctx.revisions.track(Section::Companies);
        ctx.panel().companies.list()
    };

    view! {
        <div class="flex justify-end">
            <button class="btn btn-ghost btn-sm" on:click=move |_| ctx.refresh(&[Section::Companies])>
                "Обновить"
            </button>
        </div>

        <Show when=move || cards().is_empty()>
            <p class="text-center py-8 text-base-content/50">"Компаний нет."</p>
        </Show>

        <div class="grid md:grid-cols-2 xl:grid-cols-3 gap-4">
            <For
                each=cards
                key=|c| (c.id.clone(), c.blocked_at)
                children=move |c| {
                    let blocked = c.is_blocked();
                    let (block, del) = (c.clone(), c.clone());
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body p-4 gap-2">
                                <div class="flex justify-between">
                                    <span class="font-bold">{c.name.clone()}</span>
                                    <span class={if blocked { "badge badge-error" } else { "badge badge-success" }}>
                                        {if blocked { "blocked" } else { "active" }}
                                    </span>
                                </div>
                                <div class="text-sm">"ИНН: " {c.inn.clone().unwrap_or_else(|| "-".to_string())}</div>
                                <div class="card-actions">
                                    <button class="btn btn-ghost btn-xs" on:click=move |_| toggle_blocked(ctx, block.clone())>
                                        {if blocked { "Разблок" } else { "Блок" }}
                                    </button>
                                    <button class="btn btn-error btn-xs" on:click=move |_| delete(ctx, del.clone())>
                                        "Удалить"
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}
