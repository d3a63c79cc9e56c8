//! CLI `login`, `logout`, and `whoami` commands.

use anyhow::Result;

use chronos::app::App;

pub fn login(app: &App, user: Option<&str>) -> Result<()> {
    let user_id = app.session.sign_in(user)?;
    println!("Signed in as {user_id}.");
    if let Some(ref fixed) = app.config.session.user_id {
        println!("Note: the configured user {fixed} still takes precedence.");
    }
    Ok(())
}

/// Sign out. With `clear_preferences`, also drop every local preference,
/// including the scheduled-ID ledger.
pub fn logout(app: &App, clear_preferences: bool) -> Result<()> {
    if clear_preferences {
        app.prefs.clear()?;
        println!("Signed out and cleared local preferences.");
    } else {
        app.session.sign_out()?;
        println!("Signed out.");
    }
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    let user = app.session.current_user()?;
    println!("{user}");
    Ok(())
}
