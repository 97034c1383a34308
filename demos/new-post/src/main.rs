//! Publishes a draft post to a WordPress site.
//!
//! ```text
//! PRESSRPC_URL=https://blog.example.com PRESSRPC_USER=admin PRESSRPC_PASSWORD=secret \
//!     cargo run -p new-post -- "Title" "<p>Body</p>"
//! ```

use std::env;
use std::process::ExitCode;

use pressrpc::prelude::*;
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{name} is not set"))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (base_url, username, password) = match (
        required("PRESSRPC_URL"),
        required("PRESSRPC_USER"),
        required("PRESSRPC_PASSWORD"),
    ) {
        (Ok(url), Ok(user), Ok(password)) => (url, user, password),
        (url, user, password) => {
            for err in [url.err(), user.err(), password.err()].into_iter().flatten() {
                tracing::error!("{err}");
            }
            return ExitCode::FAILURE;
        }
    };

    let mut args = env::args().skip(1);
    let title = args.next().unwrap_or_else(|| "Hello from pressrpc".to_string());
    let content = args.next().unwrap_or_else(|| "<p>Posted over XML-RPC.</p>".to_string());

    match run(&base_url, Credentials::new(username, password), &title, &content).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Fault(fault)) => {
            tracing::error!(code = %fault.code, "server refused: {}", fault.message);
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "call failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(base_url: &str, credentials: Credentials, title: &str, content: &str) -> Result<(), Error> {
    let client = XmlRpcClient::builder().base_url(base_url).build()?;
    tracing::info!(endpoint = %client.transport().endpoint(), "connecting");
    let wp = WordPressClient::new(client);

    let profile = wp.validate_user(&credentials).await?;
    tracing::info!(profile = %profile, "credentials accepted");

    let categories = wp.categories(&credentials).await?;
    for category in &categories {
        tracing::info!(id = %category.id, name = %category.name, "category");
    }

    let params = PostParams {
        categories: categories
            .first()
            .and_then(|c| c.id.parse().ok())
            .into_iter()
            .collect(),
        ..PostParams::default()
    };
    let post_id = wp.new_post(&credentials, title, content, &params).await?;
    tracing::info!(post = %post_id, "draft created");
    Ok(())
}
