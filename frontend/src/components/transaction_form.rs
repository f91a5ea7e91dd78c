use shared::{Category, Transaction, TransactionForm, TransactionType, ValidationError};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::state::Mutation;

#[derive(Properties, PartialEq)]
pub struct TransactionFormProps {
    pub categories: Vec<Category>,
    /// Transaction being edited; `None` adds a new one
    #[prop_or_default]
    pub editing: Option<Transaction>,
    #[prop_or_default]
    pub busy: bool,
    pub on_submit: Callback<Mutation>,
    pub on_cancel: Callback<()>,
}

fn field_setter<E>(
    form: &UseStateHandle<TransactionForm>,
    apply: fn(&mut TransactionForm, String),
) -> Callback<Event>
where
    E: AsRef<web_sys::EventTarget> + JsCast + FieldValue,
{
    let form = form.clone();
    Callback::from(move |e: Event| {
        let target: E = e.target_unchecked_into();
        let mut next = (*form).clone();
        apply(&mut next, target.field_value());
        form.set(next);
    })
}

trait FieldValue {
    fn field_value(&self) -> String;
}

impl FieldValue for HtmlInputElement {
    fn field_value(&self) -> String {
        self.value()
    }
}

impl FieldValue for HtmlSelectElement {
    fn field_value(&self) -> String {
        self.value()
    }
}

impl FieldValue for HtmlTextAreaElement {
    fn field_value(&self) -> String {
        self.value()
    }
}

#[function_component(TransactionFormView)]
pub fn transaction_form_view(props: &TransactionFormProps) -> Html {
    let form = use_state(TransactionForm::default);
    let errors = use_state(Vec::<ValidationError>::new);

    {
        let form = form.clone();
        let errors = errors.clone();
        use_effect_with(props.editing.clone(), move |editing| {
            form.set(
                editing
                    .as_ref()
                    .map(TransactionForm::from_transaction)
                    .unwrap_or_default(),
            );
            errors.set(Vec::new());
            || ()
        });
    }

    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let editing_id = props.editing.as_ref().map(|t| t.id.clone());
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match form.validate() {
                Ok(draft) => {
                    errors.set(Vec::new());
                    let mutation = match editing_id.clone() {
                        Some(id) => Mutation::UpdateTransaction { id, draft },
                        None => Mutation::CreateTransaction(draft),
                    };
                    on_submit.emit(mutation);
                    if editing_id.is_none() {
                        form.set(TransactionForm::default());
                    }
                }
                Err(problems) => errors.set(problems),
            }
        })
    };

    // Categories matching the chosen type, plus the current value so an
    // orphaned category name stays selectable while editing.
    let chosen_type = form.transaction_type.parse::<TransactionType>().ok();
    let mut category_names: Vec<String> = props
        .categories
        .iter()
        .filter(|c| chosen_type.map_or(true, |kind| c.category_type == kind))
        .map(|c| c.name.clone())
        .collect();
    if !category_names.contains(&form.category) {
        category_names.insert(0, form.category.clone());
    }

    let title = if props.editing.is_some() { "Edit transaction" } else { "Add transaction" };

    html! {
        <section class="transaction-form-section">
            <h2>{title}</h2>

            {if !errors.is_empty() {
                html! {
                    <div class="form-message error">
                        <ul>
                            {for errors.iter().map(|error| html! { <li>{error.to_string()}</li> })}
                        </ul>
                    </div>
                }
            } else { html! {} }}

            <form class="transaction-form" {onsubmit}>
                <select
                    name="type"
                    onchange={field_setter::<HtmlSelectElement>(&form, |f, v| f.transaction_type = v)}
                >
                    <option value="" selected={form.transaction_type.is_empty()}>{"Select type"}</option>
                    {for TransactionType::ALL.iter().map(|kind| html! {
                        <option value={kind.as_str()} selected={form.transaction_type == kind.as_str()}>
                            {kind.label()}
                        </option>
                    })}
                </select>
                <input
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0"
                    placeholder="Amount"
                    value={form.amount.clone()}
                    onchange={field_setter::<HtmlInputElement>(&form, |f, v| f.amount = v)}
                />
                <select
                    name="category"
                    onchange={field_setter::<HtmlSelectElement>(&form, |f, v| f.category = v)}
                >
                    {for category_names.iter().map(|name| html! {
                        <option value={name.clone()} selected={*name == form.category}>{name}</option>
                    })}
                </select>
                <input
                    type="date"
                    name="date"
                    value={form.date.clone()}
                    onchange={field_setter::<HtmlInputElement>(&form, |f, v| f.date = v)}
                />
                <textarea
                    name="description"
                    placeholder="Description (optional)"
                    value={form.description.clone()}
                    onchange={field_setter::<HtmlTextAreaElement>(&form, |f, v| f.description = v)}
                />
                <button type="submit" disabled={props.busy}>
                    {if props.editing.is_some() { "Save" } else { "Add" }}
                </button>
                {if props.editing.is_some() {
                    html! {
                        <button type="button" onclick={props.on_cancel.reform(|_| ())}>{"Cancel"}</button>
                    }
                } else { html! {} }}
            </form>
        </section>
    }
}
