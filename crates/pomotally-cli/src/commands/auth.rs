use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Pushover: login / logout / status
    Pushover {
        #[command(subcommand)]
        action: AuthOp,
    },
    /// Beeminder: login / logout / status
    Beeminder {
        #[command(subcommand)]
        action: AuthOp,
    },
}

#[derive(Subcommand)]
pub enum AuthOp {
    /// Store credentials in the system keyring
    Login {
        /// API token
        #[arg(long)]
        token: Option<String>,
        /// User key (Pushover only)
        #[arg(long)]
        user: Option<String>,
    },
    /// Remove credentials
    Logout,
    /// Check whether credentials are present
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Pushover { action: op } => handle_pushover(op),
        AuthAction::Beeminder { action: op } => handle_beeminder(op),
    }
}

fn handle_pushover(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use pomotally_core::{Pushover, SideChannel};
    match op {
        AuthOp::Login { token, user } => {
            let tok = token.ok_or("--token required for Pushover")?;
            let usr = user.ok_or("--user required for Pushover")?;
            let mut p = Pushover::new();
            p.set_credentials(&tok, &usr)?;
            println!("Pushover configured");
        }
        AuthOp::Logout => {
            let mut p = Pushover::new();
            p.clear_credentials()?;
            println!("Pushover disconnected");
        }
        AuthOp::Status => {
            let p = Pushover::new();
            println!(
                "{}",
                if p.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
    }
    Ok(())
}

fn handle_beeminder(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use pomotally_core::{Beeminder, SideChannel};
    match op {
        AuthOp::Login { token, .. } => {
            let tok = token.ok_or("--token required for Beeminder")?;
            let mut b = Beeminder::new();
            b.set_credentials(&tok)?;
            println!("Beeminder configured");
        }
        AuthOp::Logout => {
            let mut b = Beeminder::new();
            b.clear_credentials()?;
            println!("Beeminder disconnected");
        }
        AuthOp::Status => {
            let b = Beeminder::new();
            println!(
                "{}",
                if b.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
    }
    Ok(())
}
