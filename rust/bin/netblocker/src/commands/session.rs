//! Login / logout / whoami commands.

use std::io::Write;

use anyhow::Result;
use netblocker_core::UserSession;

/// Adopt a token issued by the firewall API.
pub fn login(session: &mut UserSession, token: &str, out: &mut impl Write) -> Result<()> {
    let user = session
        .login(token.trim())
        .map_err(|e| anyhow::anyhow!("Login failed: {}", e))?;
    writeln!(out, "Logged in as {}.", describe(&user.name, &user.role))?;
    Ok(())
}

/// Forget the stored token and user.
pub fn logout(session: &mut UserSession, out: &mut impl Write) -> Result<()> {
    session.logout()?;
    writeln!(out, "Logged out.")?;
    Ok(())
}

pub fn whoami(session: &UserSession, out: &mut impl Write) -> Result<()> {
    match session.user() {
        Some(user) => writeln!(out, "{}", describe(&user.name, &user.role))?,
        None => writeln!(out, "Not logged in.")?,
    }
    Ok(())
}

fn describe(name: &str, role: &str) -> String {
    let name = if name.is_empty() { "(unnamed)" } else { name };
    if role.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({role})")
    }
}
