//! Command-line stand-in for the presentation site.
//!
//! Each run is one "page load": the session is restored from the state
//! directory, the requested action runs, and the page the view gate ends up
//! on is printed.
//!
//! ```text
//! presentation status
//! presentation login <username> <password>
//! presentation logout
//! presentation hash <password>
//! ```
//!
//! State lives in `.vestibule/` unless `VESTIBULE_STATE_DIR` says otherwise.
//! Log verbosity follows `RUST_LOG`.

use std::path::PathBuf;

use vestibule::prelude::*;

const USERS: &str = include_str!("../data/users.json");
const STATE_DIR_VAR: &str = "VESTIBULE_STATE_DIR";
const DEFAULT_STATE_DIR: &str = ".vestibule";

const USAGE: &str = "usage: presentation <status | login <username> <password> | logout | hash <password>>";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Print a new registry digest and exit.
    Hash(String),
    /// Load the page and do something on it.
    Page(PageAction),
}

#[derive(Debug, PartialEq, Eq)]
enum PageAction {
    Status,
    Login { username: String, password: String },
    Logout,
}

impl PageAction {
    /// The page the visitor opens to do this.
    fn start(&self) -> Route {
        match self {
            Self::Login { .. } => Route::Login,
            Self::Status | Self::Logout => Route::Home,
        }
    }
}

fn parse_args(args: &[String]) -> Option<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match args.as_slice() {
        [] | ["status"] => Command::Page(PageAction::Status),
        ["login", username, password] => Command::Page(PageAction::Login {
            username: username.to_string(),
            password: password.to_string(),
        }),
        ["logout"] => Command::Page(PageAction::Logout),
        ["hash", password] => Command::Hash(password.to_string()),
        _ => return None,
    };
    Some(command)
}

fn state_dir() -> PathBuf {
    std::env::var_os(STATE_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_page(route: Route, session: &Session) -> String {
    let header = format!("[{}]", AuthButton::label(session));
    let body = match (route, session.identity()) {
        (Route::Home, Some(profile)) => format!(
            "Welcome to the presentation, {} ({}).",
            profile.display_name, profile.role
        ),
        (Route::Home, None) => "Loading...".to_string(),
        (Route::Login, _) => format!("Sign in to continue.\n{DEMO_CREDENTIALS_HINT}"),
    };
    format!("{} {header}\n{body}", route.path())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let action = match command {
        Command::Hash(password) => {
            println!("{}", hash_password(&password));
            return Ok(());
        }
        Command::Page(action) => action,
    };

    let app = Vestibule::builder()
        .registry_json(USERS)
        .store(FileStore::new(state_dir()))
        .build()?;

    let gate = app
        .spawn_gate(action.start(), RecordingNavigator::new())
        .await;
    let restored = app.initialize().await;
    tracing::debug!(status = %restored.status(), "page loaded");

    match action {
        PageAction::Status => {}
        PageAction::Login { username, password } => {
            let mut form = LoginForm::new();
            form.set_username(username);
            form.set_password(password);
            println!("{}", app.submit(&mut form).await);
        }
        PageAction::Logout => match app.press_auth_button().await {
            ButtonAction::SignedOut(notice) => println!("{notice}"),
            ButtonAction::Navigate(route) => println!("not signed in, go to {}", route.path()),
        },
    }

    let session = app.current_session().await;
    drop(app);
    let gate = gate.await?;

    for route in gate.navigator().history() {
        println!("-> redirected to {}", route.path());
    }
    println!("{}", render_page(gate.current_route(), &session));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults_to_status() {
        assert_eq!(parse_args(&[]), Some(Command::Page(PageAction::Status)));
        assert_eq!(
            parse_args(&args(&["status"])),
            Some(Command::Page(PageAction::Status))
        );
    }

    #[test]
    fn test_parse_args_login_takes_two_values() {
        assert_eq!(
            parse_args(&args(&["login", "user", "password"])),
            Some(Command::Page(PageAction::Login {
                username: "user".into(),
                password: "password".into(),
            }))
        );
        assert_eq!(parse_args(&args(&["login", "user"])), None);
    }

    #[test]
    fn test_parse_args_unknown_command_is_rejected() {
        assert_eq!(parse_args(&args(&["register", "me"])), None);
        assert_eq!(parse_args(&args(&["logout", "now"])), None);
    }

    #[test]
    fn test_page_action_start_route() {
        let login = PageAction::Login {
            username: "user".into(),
            password: "password".into(),
        };
        assert_eq!(login.start(), Route::Login);
        assert_eq!(PageAction::Status.start(), Route::Home);
    }

    #[test]
    fn test_bundled_registry_loads() {
        let registry = UserRegistry::from_json_str(USERS).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_username("user").unwrap().id, UserId(1));
        assert!(registry.find_by_username("speaker").is_some());
    }

    #[tokio::test]
    async fn test_bundled_demo_credentials_sign_in() {
        let app = Vestibule::builder().registry_json(USERS).build().unwrap();
        app.initialize().await;

        assert!(!app.login("user", "wrong").await);
        assert!(app.login("user", "password").await);
    }

    #[test]
    fn test_render_page_login_shows_hint() {
        let page = render_page(Route::Login, &Session::Anonymous);

        assert!(page.starts_with("/login [Sign in]"));
        assert!(page.contains(DEMO_CREDENTIALS_HINT));
    }
}
