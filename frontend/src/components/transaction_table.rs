use shared::{TransactionRow, TransactionType};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TransactionTableProps {
    pub rows: Vec<TransactionRow>,
    pub loading: bool,
    pub error: Option<String>,
    /// Disables row actions while a mutation is running
    #[prop_or_default]
    pub busy: bool,
    pub on_edit: Callback<String>,
    pub on_delete: Callback<String>,
}

#[function_component(TransactionTable)]
pub fn transaction_table(props: &TransactionTableProps) -> Html {
    let body = if props.loading {
        html! { <div class="loading">{"Loading transactions..."}</div> }
    } else if let Some(error) = props.error.as_ref() {
        html! { <div class="form-message error">{error}</div> }
    } else if props.rows.is_empty() {
        html! { <div class="empty">{"No transactions found"}</div> }
    } else {
        html! {
            <div class="table-container">
                <table class="transactions-table">
                    <thead>
                        <tr>
                            <th>{"Date"}</th>
                            <th>{"Category"}</th>
                            <th>{"Type"}</th>
                            <th>{"Amount"}</th>
                            <th>{"Description"}</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {for props.rows.iter().map(|row| {
                            let amount_class = match row.transaction_type {
                                Some(TransactionType::Income) => "amount income",
                                Some(TransactionType::Expense) => "amount expense",
                                None => "amount unknown",
                            };
                            let on_edit = {
                                let id = row.id.clone();
                                props.on_edit.reform(move |_: MouseEvent| id.clone())
                            };
                            let on_delete = {
                                let id = row.id.clone();
                                props.on_delete.reform(move |_: MouseEvent| id.clone())
                            };

                            html! {
                                <tr key={row.id.clone()}>
                                    <td class="date">{&row.formatted_date}</td>
                                    <td class="category">{&row.category}</td>
                                    <td class="type">{&row.type_label}</td>
                                    <td class={amount_class}>{&row.formatted_amount}</td>
                                    <td class="description">{&row.description}</td>
                                    <td class="actions">
                                        <button onclick={on_edit} disabled={props.busy}>{"Edit"}</button>
                                        <button onclick={on_delete} disabled={props.busy}>{"Delete"}</button>
                                    </td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            </div>
        }
    };

    html! {
        <section class="transactions-section">
            <h2>{"Transactions"}</h2>
            {body}
        </section>
    }
}
