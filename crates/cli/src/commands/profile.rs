//! Profile commands.

use clap::Subcommand;

use wildroot_storefront::error::Result;
use wildroot_storefront::state::StoreState;
use wildroot_storefront::types::UserProfile;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the caller's profile and role
    Show,
    /// Create or replace the caller's profile
    Setup {
        /// Display name
        #[arg(short, long)]
        name: String,
    },
}

pub async fn run(store: &StoreState, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Show => {
            let role = store.profile().role().await?;
            match store.profile().current().await? {
                Some(profile) => {
                    tracing::info!("Name: {}", profile.name);
                    tracing::info!("Role: {role}");
                }
                None => {
                    tracing::info!(
                        "No profile yet. Run `wildroot profile setup --name <name>` first."
                    );
                }
            }
        }
        ProfileAction::Setup { name } => {
            store.profile().save(UserProfile { name }).await?;
            tracing::info!("Profile saved.");
        }
    }
    Ok(())
}
