use shared::{ChangePasswordForm, ProfileForm, ValidationError};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::login_form::text_setter;
use crate::services::{ApiClient, Session};

#[derive(Properties, PartialEq)]
pub struct ProfileProps {
    pub api_client: ApiClient,
    pub session: Session,
    /// Emitted with the updated identity after a profile change
    pub on_session_change: Callback<Session>,
    /// Emitted after a password change; the old session must not be reused
    pub on_logout: Callback<()>,
}

/// Progress of one of the two profile forms.
#[derive(Debug, Clone, PartialEq, Default)]
enum SubmitStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(Vec<String>),
}

impl SubmitStatus {
    fn invalid(errors: Vec<ValidationError>) -> Self {
        SubmitStatus::Failed(errors.iter().map(ToString::to_string).collect())
    }
}

fn status_message(status: &SubmitStatus, pending: &str, succeeded: &str) -> Html {
    match status {
        SubmitStatus::Idle => html! {},
        SubmitStatus::Pending => html! { <div class="form-message info">{pending}</div> },
        SubmitStatus::Succeeded => html! { <div class="form-message success">{succeeded}</div> },
        SubmitStatus::Failed(errors) => html! {
            <div class="form-message error">
                {for errors.iter().map(|error| html! { <p>{error}</p> })}
            </div>
        },
    }
}

#[function_component(ProfileView)]
pub fn profile_view(props: &ProfileProps) -> Html {
    let profile = {
        let session = props.session.clone();
        use_state(move || {
            ProfileForm::prefilled(session.username.as_deref(), session.email.as_deref())
        })
    };
    let password = use_state(ChangePasswordForm::default);
    let profile_status = use_state(SubmitStatus::default);
    let password_status = use_state(SubmitStatus::default);

    let on_profile_submit = {
        let profile = profile.clone();
        let status = profile_status.clone();
        let api_client = props.api_client.clone();
        let session = props.session.clone();
        let on_session_change = props.on_session_change.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match profile.validate() {
                Ok(request) => request,
                Err(problems) => return status.set(SubmitStatus::invalid(problems)),
            };
            status.set(SubmitStatus::Pending);

            let api_client = api_client.clone();
            let status = status.clone();
            let session = session.clone();
            let on_session_change = on_session_change.clone();
            spawn_local(async move {
                match api_client.update_profile(&request).await {
                    Ok(()) => {
                        // Keep the stored identity in step with the server
                        let updated = session.with_profile(&request);
                        if let Err(e) = updated.save() {
                            tracing::warn!("{e}");
                        }
                        tracing::info!("profile updated for {}", updated.display_name());
                        status.set(SubmitStatus::Succeeded);
                        on_session_change.emit(updated);
                    }
                    Err(e) => status.set(SubmitStatus::Failed(vec![e.to_string()])),
                }
            });
        })
    };

    let on_password_submit = {
        let password = password.clone();
        let status = password_status.clone();
        let api_client = props.api_client.clone();
        let on_logout = props.on_logout.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match password.validate() {
                Ok(request) => request,
                Err(problems) => return status.set(SubmitStatus::invalid(problems)),
            };
            status.set(SubmitStatus::Pending);

            let api_client = api_client.clone();
            let status = status.clone();
            let on_logout = on_logout.clone();
            spawn_local(async move {
                match api_client.change_password(&request).await {
                    Ok(()) => {
                        tracing::info!("password changed, logging out");
                        on_logout.emit(());
                    }
                    Err(e) => status.set(SubmitStatus::Failed(vec![e.to_string()])),
                }
            });
        })
    };

    let profile_busy = *profile_status == SubmitStatus::Pending;
    let password_busy = *password_status == SubmitStatus::Pending;

    html! {
        <section class="profile-section">
            <h2>{"Your profile"}</h2>
            <div class="profile-card">
                <p>{props.session.username.as_deref().unwrap_or("No name")}</p>
                <p>{props.session.email.as_deref().unwrap_or("No email")}</p>
            </div>

            <h3>{"Update profile"}</h3>
            {status_message(&profile_status, "Updating profile...", "Profile updated")}
            <form class="profile-form" onsubmit={on_profile_submit}>
                <input type="text" name="username" placeholder="Username"
                    value={profile.username.clone()}
                    onchange={text_setter(&profile, |f: &mut ProfileForm, v| f.username = v)} />
                <input type="email" name="email" placeholder="Email"
                    value={profile.email.clone()}
                    onchange={text_setter(&profile, |f: &mut ProfileForm, v| f.email = v)} />
                <button type="submit" disabled={profile_busy}>{"Save changes"}</button>
            </form>

            <h3>{"Change password"}</h3>
            {status_message(&password_status, "Updating password...", "Password updated")}
            <form class="password-form" onsubmit={on_password_submit}>
                <input type="password" name="password" placeholder="New password"
                    value={password.password.clone()}
                    onchange={text_setter(&password, |f: &mut ChangePasswordForm, v| f.password = v)} />
                <button type="submit" disabled={password_busy}>{"Update password"}</button>
            </form>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_form_lists_every_message() {
        let status = SubmitStatus::invalid(vec![
            ValidationError::MissingUsername,
            ValidationError::InvalidEmail,
        ]);
        assert_eq!(
            status,
            SubmitStatus::Failed(vec![
                "Username is required".to_string(),
                "Invalid email".to_string()
            ])
        );
    }
}
