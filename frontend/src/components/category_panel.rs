use shared::{Category, CategoryForm, TransactionType, ValidationError};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::state::Mutation;

#[derive(Properties, PartialEq)]
pub struct CategoryPanelProps {
    pub categories: Vec<Category>,
    pub loading: bool,
    pub error: Option<String>,
    #[prop_or_default]
    pub busy: bool,
    pub on_mutate: Callback<Mutation>,
}

#[function_component(CategoryPanel)]
pub fn category_panel(props: &CategoryPanelProps) -> Html {
    // New category form state
    let form = use_state(CategoryForm::default);
    let errors = use_state(Vec::<ValidationError>::new);

    let on_name_change = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(CategoryForm {
                name: input.value(),
                ..(*form).clone()
            });
        })
    };

    let on_type_change = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            form.set(CategoryForm {
                category_type: select.value(),
                ..(*form).clone()
            });
        })
    };

    // Input is only sent once it validates
    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let on_mutate = props.on_mutate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match form.validate() {
                Ok(category) => {
                    errors.set(Vec::new());
                    form.set(CategoryForm::default());
                    on_mutate.emit(Mutation::CreateCategory(category));
                }
                Err(problems) => errors.set(problems),
            }
        })
    };

    let list = if props.loading {
        html! { <div class="loading">{"Loading categories..."}</div> }
    } else if let Some(error) = props.error.as_ref() {
        html! { <div class="form-message error">{error}</div> }
    } else if props.categories.is_empty() {
        html! { <div class="empty">{"No categories yet"}</div> }
    } else {
        html! {
            <ul class="category-list">
                {for props.categories.iter().map(|category| {
                    let on_delete = {
                        let id = category.id.clone();
                        props
                            .on_mutate
                            .reform(move |_: MouseEvent| Mutation::DeleteCategory(id.clone()))
                    };
                    html! {
                        <li key={category.id.clone()}>
                            <span class="category-name">{&category.name}</span>
                            <span class="category-type">{category.category_type.label()}</span>
                            <button onclick={on_delete} disabled={props.busy}>{"Delete"}</button>
                        </li>
                    }
                })}
            </ul>
        }
    };

    html! {
        <section class="category-panel">
            <h2>{"Categories"}</h2>
            {list}

            {if !errors.is_empty() {
                html! {
                    <div class="form-message error">
                        {for errors.iter().map(|error| html! { <p>{error.to_string()}</p> })}
                    </div>
                }
            } else { html! {} }}

            <form class="category-form" {onsubmit}>
                <input
                    type="text"
                    name="name"
                    placeholder="Category name"
                    value={form.name.clone()}
                    onchange={on_name_change}
                />
                <select name="type" onchange={on_type_change}>
                    <option value="" selected={form.category_type.is_empty()}>{"Select type"}</option>
                    {for TransactionType::ALL.iter().map(|kind| html! {
                        <option value={kind.as_str()} selected={form.category_type == kind.as_str()}>
                            {kind.label()}
                        </option>
                    })}
                </select>
                <button type="submit" disabled={props.busy}>{"Add category"}</button>
            </form>
        </section>
    }
}
