use leptos::prelude::*;
use sklad_shared::toast::ToastKind;

use crate::context::use_panel;

/// 右上角提示条，点击立即关闭
#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = use_panel();
    let toasts = ctx.toasts;

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.with(|q| q.items().to_vec())
                key=|t| t.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Good => "alert alert-success shadow-lg cursor-pointer",
                        ToastKind::Bad => "alert alert-error shadow-lg cursor-pointer",
                    };
                    view! {
                        <div
                            class=class
                            data-kind=toast.kind.class()
                            on:click=move |_| toasts.update(|q| q.dismiss(id))
                        >
                            <span class="whitespace-pre-line">{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
