use shared::{LoginForm, RegisterForm, ValidationError};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::{ApiClient, Session};

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub api_client: ApiClient,
    pub on_login: Callback<Session>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Login,
    Register,
}

pub(crate) fn text_setter<F: Clone + PartialEq + 'static>(
    form: &UseStateHandle<F>,
    apply: fn(&mut F, String),
) -> Callback<Event> {
    let form = form.clone();
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let mut next = (*form).clone();
        apply(&mut next, input.value());
        form.set(next);
    })
}

fn messages(errors: Vec<ValidationError>) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

#[function_component(LoginFormView)]
pub fn login_form_view(props: &LoginFormProps) -> Html {
    // Both forms keep their input while switching modes
    let mode = use_state(|| Mode::Login);
    let login = use_state(LoginForm::default);
    let register = use_state(RegisterForm::default);
    let errors = use_state(Vec::<String>::new);
    let notice = use_state(|| Option::<String>::None);
    let submitting = use_state(|| false);

    let onsubmit = {
        let mode = mode.clone();
        let login = login.clone();
        let register = register.clone();
        let errors = errors.clone();
        let notice = notice.clone();
        let submitting = submitting.clone();
        let api_client = props.api_client.clone();
        let on_login = props.on_login.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            notice.set(None);

            match *mode {
                Mode::Login => {
                    let request = match login.validate() {
                        Ok(request) => request,
                        Err(problems) => return errors.set(messages(problems)),
                    };
                    errors.set(Vec::new());
                    submitting.set(true);

                    let api_client = api_client.clone();
                    let errors = errors.clone();
                    let submitting = submitting.clone();
                    let on_login = on_login.clone();
                    spawn_local(async move {
                        match api_client.login(&request).await {
                            Ok(response) => {
                                // Persist first so a reload stays logged in
                                let session = Session::from(response);
                                if let Err(e) = session.save() {
                                    tracing::warn!("{e}");
                                }
                                tracing::info!("logged in as {}", session.display_name());
                                on_login.emit(session);
                            }
                            Err(e) => errors.set(vec![e.to_string()]),
                        }
                        submitting.set(false);
                    });
                }
                Mode::Register => {
                    let request = match register.validate() {
                        Ok(request) => request,
                        Err(problems) => return errors.set(messages(problems)),
                    };
                    errors.set(Vec::new());
                    submitting.set(true);

                    let api_client = api_client.clone();
                    let errors = errors.clone();
                    let notice = notice.clone();
                    let mode = mode.clone();
                    let submitting = submitting.clone();
                    spawn_local(async move {
                        match api_client.register(&request).await {
                            Ok(user) => {
                                tracing::info!("registered {}", user.email);
                                notice.set(Some("Registration successful, please log in".to_string()));
                                mode.set(Mode::Login);
                            }
                            Err(e) => errors.set(vec![e.to_string()]),
                        }
                        submitting.set(false);
                    });
                }
            }
        })
    };

    let toggle = {
        let mode = mode.clone();
        let errors = errors.clone();
        Callback::from(move |_: MouseEvent| {
            errors.set(Vec::new());
            mode.set(match *mode {
                Mode::Login => Mode::Register,
                Mode::Register => Mode::Login,
            });
        })
    };

    let fields = match *mode {
        Mode::Login => html! {
            <>
                <input type="email" name="email" placeholder="Email"
                    value={login.email.clone()}
                    onchange={text_setter(&login, |f: &mut LoginForm, v| f.email = v)} />
                <input type="password" name="password" placeholder="Password"
                    value={login.password.clone()}
                    onchange={text_setter(&login, |f: &mut LoginForm, v| f.password = v)} />
            </>
        },
        Mode::Register => html! {
            <>
                <input type="text" name="username" placeholder="Username"
                    value={register.username.clone()}
                    onchange={text_setter(&register, |f: &mut RegisterForm, v| f.username = v)} />
                <input type="email" name="email" placeholder="Email"
                    value={register.email.clone()}
                    onchange={text_setter(&register, |f: &mut RegisterForm, v| f.email = v)} />
                <input type="password" name="password" placeholder="Password"
                    value={register.password.clone()}
                    onchange={text_setter(&register, |f: &mut RegisterForm, v| f.password = v)} />
                <input type="password" name="confirm_password" placeholder="Confirm password"
                    value={register.confirm_password.clone()}
                    onchange={text_setter(&register, |f: &mut RegisterForm, v| f.confirm_password = v)} />
            </>
        },
    };

    let (title, submit_label, toggle_label) = match *mode {
        Mode::Login => ("Log in", "Log in", "Need an account? Register"),
        Mode::Register => ("Register", "Create account", "Have an account? Log in"),
    };

    html! {
        <section class="auth-section">
            <h2>{title}</h2>

            {if let Some(text) = &*notice {
                html! { <div class="form-message success">{text}</div> }
            } else { html! {} }}

            {if !errors.is_empty() {
                html! {
                    <div class="form-message error">
                        {for errors.iter().map(|error| html! { <p>{error}</p> })}
                    </div>
                }
            } else { html! {} }}

            <form class="auth-form" {onsubmit}>
                {fields}
                <button type="submit" disabled={*submitting}>{submit_label}</button>
            </form>
            <button class="link-button" onclick={toggle}>{toggle_label}</button>
        </section>
    }
}
