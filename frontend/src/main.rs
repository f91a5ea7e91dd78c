use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod services;
mod state;

use components::dashboard::Dashboard;
use components::login_form::LoginFormView;
use components::profile::ProfileView;
use config::AppConfig;
use services::{ApiClient, Session};

#[derive(Properties, PartialEq)]
struct AppProps {
    config: AppConfig,
}

#[derive(Clone, Copy, PartialEq)]
enum Page {
    Dashboard,
    Profile,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let session = use_state(Session::load);
    let page = use_state(|| Page::Dashboard);
    let api_client = ApiClient::new(&props.config, (*session).clone());

    let on_login = {
        let session = session.clone();
        let page = page.clone();
        Callback::from(move |new_session: Session| {
            page.set(Page::Dashboard);
            session.set(Some(new_session));
        })
    };

    // Password changes end the session too, without a click event
    let end_session = {
        let session = session.clone();
        Callback::from(move |_: ()| {
            Session::forget();
            tracing::info!("logged out");
            session.set(None);
        })
    };
    let on_logout = end_session.reform(|_: MouseEvent| ());

    let on_session_change = {
        let session = session.clone();
        Callback::from(move |updated: Session| session.set(Some(updated)))
    };

    let toggle_page = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| {
            page.set(match *page {
                Page::Dashboard => Page::Profile,
                Page::Profile => Page::Dashboard,
            })
        })
    };
    let toggle_label = match *page {
        Page::Dashboard => "Profile",
        Page::Profile => "Dashboard",
    };

    html! {
        <div class="app">
            <header class="app-header">
                <h1>{"BudgetBee"}</h1>
                {if let Some(current) = &*session {
                    html! {
                        <div class="user">
                            <span>{format!("Hi, {}", current.display_name())}</span>
                            <button onclick={toggle_page}>{toggle_label}</button>
                            <button onclick={on_logout}>{"Log out"}</button>
                        </div>
                    }
                } else { html! {} }}
            </header>
            <main>
                {match (&*session, *page) {
                    (Some(current), Page::Profile) => html! {
                        <ProfileView
                            api_client={api_client.clone()}
                            session={current.clone()}
                            {on_session_change}
                            on_logout={end_session}
                        />
                    },
                    (Some(_), Page::Dashboard) => html! {
                        <Dashboard
                            api_client={api_client.clone()}
                            chart_kind={props.config.default_chart}
                        />
                    },
                    (None, _) => html! {
                        <LoginFormView api_client={api_client.clone()} {on_login} />
                    },
                }}
            </main>
        </div>
    }
}

fn main() {
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        gloo::console::error!(format!("invalid build configuration, using defaults: {e}"));
        AppConfig::default()
    });

    if let Err(e) = services::logging::init(&config.log_level) {
        gloo::console::error!(format!("{e}"));
    }
    tracing::info!(api = %config.api_base_url, "starting BudgetBee");

    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
