use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use safeguard_core::{Safeguard, ServiceError, Session, features};
use safeguard_types::SettingsRecord;

const HELP: &str = "\
Account:   register, login, logout
Profile:   profile, edit-profile
Settings:  settings, edit-settings
Safety:    check-in, check-ins, alert, alerts, contacts
Other:     help, quit

When editing, an empty answer keeps the current value and `-` clears it.";

#[derive(Error, Debug)]
enum ShellError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("input closed")]
    Eof,
}

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end over the account services.
///
/// Service errors are printed and the loop carries on; only I/O failures
/// end the shell early.
pub struct Shell<'a, R, W> {
    app: &'a Safeguard,
    session: Session,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(app: &'a Safeguard, input: R, out: W) -> Self {
        Self {
            app,
            session: Session::new(),
            input,
            out,
        }
    }

    /// Read commands until `quit` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "Safeguard. Type `help` for commands.")?;

        loop {
            let prompt = if self.session.is_logged_in() {
                "safeguard> "
            } else {
                "safeguard (logged out)> "
            };

            let line = match self.ask(prompt) {
                Ok(line) => line,
                Err(ShellError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            match self.dispatch(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) | Err(ShellError::Eof) => break,
                Err(ShellError::Service(e)) => writeln!(self.out, "error: {}", e)?,
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(user_id) = self.session.logout() {
            debug!(%user_id, "Session closed on exit");
        }
        Ok(())
    }

    fn dispatch(&mut self, command: &str) -> Result<Flow, ShellError> {
        match command {
            "help" | "?" => writeln!(self.out, "{}", HELP)?,
            "register" => self.register()?,
            "login" => self.login()?,
            "logout" => self.logout()?,
            "profile" => self.show_profile()?,
            "edit-profile" => self.edit_profile()?,
            "settings" => self.show_settings()?,
            "edit-settings" => self.edit_settings()?,
            "check-in" => features::check_in(&self.session)?,
            "check-ins" => features::view_checkins(&self.session)?,
            "alert" => features::send_alert(&self.session)?,
            "alerts" => features::view_alerts(&self.session)?,
            "contacts" => features::manage_contacts(&self.session)?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => writeln!(self.out, "unknown command `{}` (try `help`)", other)?,
        }
        Ok(Flow::Continue)
    }

    fn register(&mut self) -> Result<(), ShellError> {
        let username = self.ask("Username: ")?;
        let password = self.ask("Password: ")?;
        let name = self.ask("Name: ")?;
        let email = self.ask("Email: ")?;

        self.app
            .accounts
            .register(&username, &password, &name, &email)?;
        writeln!(self.out, "Registration successful. You can now log in.")?;
        Ok(())
    }

    fn login(&mut self) -> Result<(), ShellError> {
        let username = self.ask("Username: ")?;
        let password = self.ask("Password: ")?;

        let user_id = self
            .session
            .login(&self.app.accounts, &username, &password)?;
        let name = self
            .app
            .accounts
            .profile(user_id)?
            .map(|p| p.name)
            .unwrap_or(username);
        writeln!(self.out, "Welcome, {}.", name)?;
        Ok(())
    }

    fn logout(&mut self) -> Result<(), ShellError> {
        match self.session.logout() {
            Some(_) => writeln!(self.out, "Logged out.")?,
            None => writeln!(self.out, "Not logged in.")?,
        }
        Ok(())
    }

    fn show_profile(&mut self) -> Result<(), ShellError> {
        let user_id = self.session.require_user()?;
        let profile = self
            .app
            .accounts
            .profile(user_id)?
            .ok_or(ServiceError::NotFound)?;
        writeln!(self.out, "{}", serde_json::to_string_pretty(&profile)?)?;
        Ok(())
    }

    fn edit_profile(&mut self) -> Result<(), ShellError> {
        let user_id = self.session.require_user()?;
        let current = self
            .app
            .accounts
            .profile(user_id)?
            .ok_or(ServiceError::NotFound)?;

        let name = self.ask_default("Name", &current.name)?;
        let email = self.ask_default("Email", &current.email)?;

        self.app.accounts.update_profile(user_id, &name, &email)?;
        writeln!(self.out, "Profile updated.")?;
        Ok(())
    }

    fn show_settings(&mut self) -> Result<(), ShellError> {
        let user_id = self.session.require_user()?;
        let settings = self
            .app
            .preferences
            .get_settings(user_id)?
            .unwrap_or_default();
        writeln!(self.out, "{}", serde_json::to_string_pretty(&settings)?)?;
        Ok(())
    }

    fn edit_settings(&mut self) -> Result<(), ShellError> {
        let user_id = self.session.require_user()?;
        let current = self
            .app
            .preferences
            .get_settings(user_id)?
            .unwrap_or_default();

        let record = SettingsRecord {
            notification: self.ask_flag("Notifications", current.notification)?,
            notification_sound: self
                .ask_default("Notification sound", &current.notification_sound)?,
            vibration_pattern: self.ask_default("Vibration pattern", &current.vibration_pattern)?,
            location_tracking: self.ask_flag("Location tracking", current.location_tracking)?,
            location_sharing: self.ask_flag("Location sharing", current.location_sharing)?,
        };

        self.app.preferences.save_settings(user_id, &record)?;
        writeln!(self.out, "Settings saved.")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, ShellError> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::Eof);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn ask_default(&mut self, label: &str, current: &str) -> Result<String, ShellError> {
        let answer = self.ask(&format!("{} [{}]: ", label, current))?;
        let value = match answer.trim() {
            "" => current.to_string(),
            "-" => String::new(),
            _ => answer.clone(),
        };
        Ok(value)
    }

    fn ask_flag(&mut self, label: &str, current: bool) -> Result<bool, ShellError> {
        let shown = if current { "y" } else { "n" };
        loop {
            let answer = self.ask(&format!("{} (y/n) [{}]: ", label, shown))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(current);
            }
            match parse_flag(answer) {
                Some(value) => return Ok(value),
                None => writeln!(self.out, "Please answer y or n.")?,
            }
        }
    }
}

fn parse_flag(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}
