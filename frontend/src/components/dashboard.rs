use shared::{format_amount, AggregateSeries, ChartKind, Transaction};
use yew::prelude::*;

use crate::components::category_panel::CategoryPanel;
use crate::components::filter_bar::FilterBar;
use crate::components::transaction_chart::TransactionChart;
use crate::components::transaction_form::TransactionFormView;
use crate::components::transaction_table::TransactionTable;
use crate::hooks::use_dashboard;
use crate::services::{ApiClient, GatewayError};
use crate::state::{Mutation, MutationStatus};

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub api_client: ApiClient,
    pub chart_kind: ChartKind,
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let dashboard = use_dashboard(&props.api_client, props.chart_kind);
    let state = &*dashboard.state;
    let actions = dashboard.actions.clone();
    let editing = use_state(|| Option::<Transaction>::None);

    let loaded = state.transactions().data();
    let rows = loaded.map(|l| l.rows()).unwrap_or_default();
    let aggregates = loaded.map(|l| l.aggregates.clone()).unwrap_or_default();
    let busy = state.mutation().is_pending();
    // Loaded rows may still carry names of deleted categories
    let category_options = state.filters().category_options(
        state.category_list(),
        loaded
            .into_iter()
            .flat_map(|l| l.transactions.iter().map(Transaction::category_name)),
    );

    let on_edit = {
        let editing = editing.clone();
        let transactions: Vec<Transaction> =
            loaded.map(|l| l.transactions.clone()).unwrap_or_default();
        Callback::from(move |id: String| {
            editing.set(transactions.iter().find(|t| t.id == id).cloned());
        })
    };

    let on_delete = actions.mutate.reform(Mutation::DeleteTransaction);

    let on_submit = {
        let editing = editing.clone();
        let mutate = actions.mutate.clone();
        Callback::from(move |mutation: Mutation| {
            if matches!(mutation, Mutation::UpdateTransaction { .. }) {
                editing.set(None);
            }
            mutate.emit(mutation);
        })
    };

    let on_cancel = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };

    html! {
        <div class="dashboard">
            {mutation_notice(state.mutation(), state.mutation_generation(), &actions.dismiss_mutation)}
            {summary(&aggregates)}

            <FilterBar
                filters={state.filters().clone()}
                {category_options}
                error={state.filter_error().map(ToString::to_string)}
                on_change={actions.set_filter.clone()}
                on_clear={actions.clear_filters.clone()}
            />

            <div class="dashboard-grid">
                <TransactionChart
                    aggregates={aggregates.clone()}
                    kind={state.chart_kind()}
                    loading={state.transactions().is_loading()}
                    on_kind_change={actions.set_chart_kind.clone()}
                />
                <TransactionFormView
                    categories={state.category_list().to_vec()}
                    editing={(*editing).clone()}
                    busy={busy}
                    on_submit={on_submit}
                    on_cancel={on_cancel}
                />
            </div>

            <TransactionTable
                rows={rows}
                loading={state.transactions().is_loading()}
                error={state.transactions().error().map(describe_error)}
                busy={busy}
                on_edit={on_edit}
                on_delete={on_delete}
            />
            <button class="refresh" onclick={actions.refetch.reform(|_| ())}>{"Refresh"}</button>

            <CategoryPanel
                categories={state.category_list().to_vec()}
                loading={state.categories().is_loading()}
                error={state.categories().error().map(describe_error)}
                busy={busy}
                on_mutate={actions.mutate.clone()}
            />
        </div>
    }
}

/// Error text for a failed list query, with a login hint on auth failures.
fn describe_error(error: &GatewayError) -> String {
    match error.status() {
        Some(401) | Some(403) => format!("{error}. Please log out and log in again."),
        _ => error.to_string(),
    }
}

fn summary(aggregates: &AggregateSeries) -> Html {
    let totals = aggregates.totals;
    html! {
        <section class="summary">
            <div class="summary-card income">
                <span>{"Income"}</span>
                <strong>{format_amount(totals.income)}</strong>
            </div>
            <div class="summary-card expense">
                <span>{"Expense"}</span>
                <strong>{format_amount(totals.expense)}</strong>
            </div>
            <div class="summary-card balance">
                <span>{"Balance"}</span>
                <strong>{format_amount(totals.net())}</strong>
            </div>
        </section>
    }
}

fn mutation_notice(status: &MutationStatus, generation: u64, on_dismiss: &Callback<u64>) -> Html {
    let (class, text) = match status {
        MutationStatus::Idle => return html! {},
        MutationStatus::Pending(kind) => ("form-message info", format!("{}...", kind.label())),
        MutationStatus::Succeeded(kind) => ("form-message success", kind.success_message().to_string()),
        MutationStatus::Failed { kind, error } => {
            ("form-message error", format!("{} failed: {error}", kind.label()))
        }
    };

    html! {
        <div class={class}>
            {text}
            <button class="dismiss" onclick={on_dismiss.reform(move |_| generation)}>{"×"}</button>
        </div>
    }
}
