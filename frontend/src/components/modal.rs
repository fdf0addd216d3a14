//! 单槽模态框
//!
//! `<dialog>` 的打开/关闭由 Effect 跟随 `ModalSlot` 状态。

use leptos::prelude::*;

use crate::components::employees::EmployeeForm;
use crate::components::items::{
    CreateItemForm, HistoryTable, LowStockList, StockOperationForm,
};
use crate::components::notifications::NotificationList;
use crate::components::supplies::CreateSupplyForm;
use crate::components::warehouses::CreateWarehouseForm;
use crate::context::{Modal, use_panel};

fn render(content: Modal) -> AnyView {
    match content {
        Modal::CreateWarehouse => view! { <CreateWarehouseForm /> }.into_any(),
        Modal::CreateItem => view! { <CreateItemForm /> }.into_any(),
        Modal::StockOperation { item, op } => {
            view! { <StockOperationForm item=item op=op /> }.into_any()
        }
        Modal::ItemHistory { entries } => {
            view! { <HistoryTable entries=entries show_item=false /> }.into_any()
        }
        Modal::WarehouseHistory { entries } => {
            view! { <HistoryTable entries=entries show_item=true /> }.into_any()
        }
        Modal::LowStock { items } => view! { <LowStockList items=items /> }.into_any(),
        Modal::CreateSupply { items } => view! { <CreateSupplyForm items=items /> }.into_any(),
        Modal::CreateEmployee => view! { <EmployeeForm employee=None /> }.into_any(),
        Modal::EditEmployee(employee) => {
            view! { <EmployeeForm employee=Some(employee) /> }.into_any()
        }
        Modal::Notifications => view! { <NotificationList /> }.into_any(),
    }
}

#[component]
pub fn ModalHost() -> impl IntoView {
    let ctx = use_panel();
    let modal = ctx.modal;
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let is_open = Memo::new(move |_| modal.with(|m| m.is_open()));

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if is_open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| ctx.close_modal()>
            <div class="modal-box max-w-3xl">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-bold text-lg">{move || modal.with(|m| m.title().to_string())}</h3>
                    <button class="btn btn-sm btn-circle btn-ghost" on:click=move |_| ctx.close_modal()>
                        "✕"
                    </button>
                </div>
                {move || modal.with(|m| m.content().cloned()).map(render)}
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
