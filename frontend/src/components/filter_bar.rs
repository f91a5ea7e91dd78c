use shared::{FilterField, FilterState, TransactionType};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub filters: FilterState,
    /// Category filter choices, see `FilterState::category_options`
    pub category_options: Vec<String>,
    pub error: Option<String>,
    pub on_change: Callback<(FilterField, String)>,
    pub on_clear: Callback<()>,
}

fn input_handler(field: FilterField, on_change: &Callback<(FilterField, String)>) -> Callback<Event> {
    let on_change = on_change.clone();
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_change.emit((field, input.value()));
    })
}

fn select_handler(field: FilterField, on_change: &Callback<(FilterField, String)>) -> Callback<Event> {
    let on_change = on_change.clone();
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        on_change.emit((field, select.value()));
    })
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let type_value = props.filters.field_value(FilterField::Type);
    let category_value = props.filters.field_value(FilterField::Category);

    html! {
        <section class="filter-bar">
            <label>
                {"From"}
                <input
                    type="date"
                    name={FilterField::StartDate.query_key()}
                    value={props.filters.field_value(FilterField::StartDate)}
                    onchange={input_handler(FilterField::StartDate, &props.on_change)}
                />
            </label>
            <label>
                {"To"}
                <input
                    type="date"
                    name={FilterField::EndDate.query_key()}
                    value={props.filters.field_value(FilterField::EndDate)}
                    onchange={input_handler(FilterField::EndDate, &props.on_change)}
                />
            </label>
            <label>
                {"Type"}
                <select
                    name={FilterField::Type.query_key()}
                    onchange={select_handler(FilterField::Type, &props.on_change)}
                >
                    <option value="" selected={type_value.is_empty()}>{"All types"}</option>
                    {for TransactionType::ALL.iter().map(|kind| html! {
                        <option value={kind.as_str()} selected={type_value == kind.as_str()}>
                            {kind.label()}
                        </option>
                    })}
                </select>
            </label>
            <label>
                {"Category"}
                <select
                    name={FilterField::Category.query_key()}
                    onchange={select_handler(FilterField::Category, &props.on_change)}
                >
                    <option value="" selected={category_value.is_empty()}>{"All categories"}</option>
                    {for props.category_options.iter().map(|name| html! {
                        <option value={name.clone()} selected={category_value == *name}>
                            {name}
                        </option>
                    })}
                </select>
            </label>
            <button
                class="clear-filters"
                disabled={props.filters.is_empty()}
                onclick={props.on_clear.reform(|_| ())}
            >
                {"Clear filters"}
            </button>

            {if let Some(error) = props.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
        </section>
    }
}
