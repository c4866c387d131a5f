//! Session commands: one client call per user action.

use greeter_client::models::Registration;
use greeter_client::{GreeterClient, SessionSlot};

use crate::cli::{Command, PrefsAction};
use crate::render::{Action, Output};

/// Run a session command against `slot`.
///
/// `Config` commands never reach here; they are handled before a client is
/// built.
pub async fn execute(client: &GreeterClient, slot: &mut SessionSlot, command: Command) -> Output {
    match command {
        Command::Status => Output::ok(slot.status().to_string()),
        Command::Login { user, password } => login(client, slot, &user, &password).await,
        Command::Logout => logout(client, slot).await,
        Command::Register {
            user,
            password,
            password_repeat,
        } => register(client, &user, &password, &password_repeat).await,
        Command::DeleteAccount => match client.delete_account(slot).await {
            Ok(_) => Output::ok("Account deleted"),
            Err(e) => Output::failure(Action::DeleteAccount, &e),
        },
        Command::Languages => match client.languages(slot).await {
            Ok(langs) => Output::ok_lines(langs.codes()),
            Err(e) => Output::failure(Action::Languages, &e),
        },
        Command::Greet { language } => greet(client, slot, language.as_deref()).await,
        Command::Prefs { action } => prefs(client, slot, action).await,
        Command::Whoami => whoami(client, slot).await,
        Command::Users => match client.list_users(slot).await {
            Ok(users) => Output::ok_lines(users.user_ids.iter().map(u64::to_string)),
            Err(e) => Output::failure(Action::User, &e),
        },
        Command::Config { .. } => Output {
            lines: vec!["config commands do not use a session".to_string()],
            success: false,
        },
    }
}

async fn login(
    client: &GreeterClient,
    slot: &mut SessionSlot,
    user: &str,
    password: &str,
) -> Output {
    match client.login(slot, user, password).await {
        Ok(_) => Output::ok("Login success"),
        Err(e) => Output::failure(Action::Login, &e),
    }
}

async fn logout(client: &GreeterClient, slot: &mut SessionSlot) -> Output {
    match client.logout(slot).await {
        Ok(Some(_)) => Output::ok("Logged out"),
        Ok(None) => Output::ok(slot.status().to_string()),
        Err(e) => Output::failure(Action::Logout, &e),
    }
}

async fn register(client: &GreeterClient, user: &str, password: &str, repeat: &str) -> Output {
    let registration = match Registration::new(user, password, repeat) {
        Ok(r) => r,
        Err(e) => return Output::failure(Action::Register, &e),
    };
    match client.register(&registration).await {
        Ok(_) => Output::ok("Registration success"),
        Err(e) => Output::failure(Action::Register, &e),
    }
}

async fn greet(client: &GreeterClient, slot: &SessionSlot, language: Option<&str>) -> Output {
    let language = match language {
        Some(l) => l.to_string(),
        None => match client.preference(slot).await {
            Ok(pref) => pref.language,
            Err(e) => return Output::failure(Action::Greet, &e),
        },
    };
    match client.greeting(slot, &language).await {
        Ok(greeting) => Output::ok(format!("Greeting Success: {}", greeting.message)),
        Err(e) => Output::failure(Action::Greet, &e),
    }
}

async fn prefs(client: &GreeterClient, slot: &SessionSlot, action: PrefsAction) -> Output {
    let result = match action {
        PrefsAction::Get => client.preference(slot).await,
        PrefsAction::Set { language } => client.set_preference(slot, &language).await,
    };
    match result {
        Ok(pref) => Output::ok(format!("Language: {}", pref.language)),
        Err(e) => Output::failure(Action::Preference, &e),
    }
}

async fn whoami(client: &GreeterClient, slot: &SessionSlot) -> Output {
    let user_id = match slot.require().and_then(|session| session.account_id()) {
        Ok(id) => id,
        Err(e) => return Output::failure(Action::User, &e),
    };
    match client.user_info(slot, user_id).await {
        Ok(info) => Output::ok(format!("{} {}", info.user_id, info.user_name)),
        Err(e) => Output::failure(Action::User, &e),
    }
}
