use std::path::PathBuf;

use clap::Parser;
use dev_profile::api::Error;
use dev_profile::store::ProfileStore;
use dev_profile_app::args::{Args, Command, ExportFormat};
use dev_profile_app::{build_profile, display};
use github_client::GithubClientBuilder;
use secrecy::SecretString;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        display::error(&err.to_string());
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let Args {
        token,
        api_url,
        profile_dir,
        command,
    } = args;
    let store = ProfileStore::new(profile_dir);

    match command {
        Command::Build { username } => build_and_save(token, &api_url, &store, &username).await,
        Command::Refresh { username } => {
            if !store.exists(&username) {
                return Err(missing_profile(&username));
            }
            build_and_save(token, &api_url, &store, &username).await
        }
        Command::Show { username } => {
            let profile = store.load(&username).ok_or_else(|| missing_profile(&username))?;
            display::display_profile(&profile);
            Ok(())
        }
        Command::List => {
            display::display_profile_list(&store.list());
            Ok(())
        }
        Command::Export {
            username,
            format,
            output,
        } => export(&store, &username, format, output),
    }
}

async fn build_and_save(
    token: Option<SecretString>,
    api_url: &str,
    store: &ProfileStore,
    username: &str,
) -> Result<(), Error> {
    let mut builder = GithubClientBuilder::default().with_github_url(api_url);
    let authenticated = token.is_some();
    if let Some(token) = token {
        builder = builder.try_with_token(token)?;
    }
    if !authenticated {
        display::warning("No GITHUB_TOKEN found. Rate limits will be restricted (60 req/hr).");
        display::detail("Set the GITHUB_TOKEN env var for higher limits (5000 req/hr).");
    }
    let client = builder.build()?;

    let profile = build_profile(&client, username).await?;
    display::display_profile(&profile);

    let path = store.save(&profile)?;
    println!();
    println!("Profile saved to {}", path.display());
    Ok(())
}

fn export(
    store: &ProfileStore,
    username: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<(), Error> {
    let profile = store.load(username).ok_or_else(|| missing_profile(username))?;

    let content = match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(&profile).map_err(anyhow::Error::from)?
        }
        ExportFormat::Md => display::export_markdown(&profile),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, content).map_err(anyhow::Error::from)?;
            println!("Profile exported to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn missing_profile(username: &str) -> Error {
    anyhow::anyhow!(
        "No saved profile found for '{}'. Run `dev-profile build {}` first.",
        username,
        username
    )
    .into()
}
