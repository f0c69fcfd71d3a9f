//! `closetly-tryon` -- run virtual try-on jobs against a Closetly backend.
//!
//! Lists and manages the closet catalog, or submits a model photo and a
//! clothing image and follows the job until it finishes. Ctrl-C cancels a
//! running job.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default                 | Description                       |
//! |--------------------------|----------|-------------------------|-----------------------------------|
//! | `BASE_URL`               | no       | `http://localhost:8000` | Closetly backend base URL         |
//! | `REQUEST_TIMEOUT_SECS`   | no       | `15`                    | Per-request HTTP timeout          |
//! | `TRYON_POLL_INTERVAL_MS` | no       | `2000`                  | Delay between status checks       |
//! | `TRYON_MAX_ATTEMPTS`     | no       | `30`                    | Status checks before giving up    |

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use closetly_cli::args::{self, Command, USAGE};
use closetly_cli::render;
use closetly_client::api::ClosetlyApi;
use closetly_client::config::ClientConfig;
use closetly_core::catalog::{
    filter_by_category, find_item, find_model, validate_category, validate_item_type,
};
use closetly_core::image::ImagePayload;
use closetly_core::tryon::TryOnRequest;
use closetly_tryon::{PollConfig, TryOnJobController, TryOnState};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "closetly_cli=info,closetly_tryon=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = match args::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(render::EXIT_INVALID);
        }
    };

    match run(command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "closetly-tryon failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Help => {
            println!("{USAGE}");
            Ok(ExitCode::SUCCESS)
        }
        Command::List { category } => {
            list(&connect()?, category.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { model_id, item_id } => {
            let api = connect()?;
            let (models, items) = tokio::try_join!(api.list_models(), api.list_items())
                .context("failed to load the catalog")?;
            let model = find_model(&models, &model_id)?;
            let item = find_item(&items, &item_id)?;
            let request = TryOnRequest::from_selection(Some(model), Some(item));
            follow(api, request).await
        }
        Command::Files {
            model_path,
            item_path,
        } => {
            let request = TryOnRequest::new(
                ImagePayload::from_file(&model_path)?,
                ImagePayload::from_file(&item_path)?,
            );
            follow(connect()?, request).await
        }
        Command::UploadItem {
            name,
            image_path,
            item_type,
        } => {
            if let Some(item_type) = &item_type {
                validate_item_type(item_type)?;
            }
            let image = ImagePayload::from_file(&image_path)?;
            let uploaded = connect()?
                .upload_item(&name, &image, item_type.as_deref())
                .await
                .context("failed to upload item")?;
            println!("Uploaded item {} ({})", uploaded.id, uploaded.item_type);
            Ok(ExitCode::SUCCESS)
        }
        Command::SetType { item_id, item_type } => {
            validate_item_type(&item_type)?;
            connect()?
                .update_item_type(&item_id, &item_type)
                .await
                .context("failed to update item type")?;
            println!("Item {item_id} is now '{item_type}'");
            Ok(ExitCode::SUCCESS)
        }
        Command::DeleteItem { item_id } => {
            connect()?
                .delete_item(&item_id)
                .await
                .context("failed to delete item")?;
            println!("Deleted item {item_id}");
            Ok(ExitCode::SUCCESS)
        }
        Command::UploadModel {
            name,
            image_path,
            gender,
            style,
        } => {
            let image = ImagePayload::from_file(&image_path)?;
            let uploaded = connect()?
                .upload_model_photo(&name, &image, gender.as_deref(), style.as_deref())
                .await
                .context("failed to upload model photo")?;
            match uploaded.image_url {
                Some(url) => println!("Uploaded model {} ({url})", uploaded.id),
                None => println!("Uploaded model {}", uploaded.id),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::DeleteModel { model_id } => {
            connect()?
                .delete_model_photo(&model_id)
                .await
                .context("failed to delete model photo")?;
            println!("Deleted model {model_id}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn connect() -> anyhow::Result<ClosetlyApi> {
    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let api = ClosetlyApi::from_config(&config).context("failed to build HTTP client")?;
    tracing::info!(base_url = %api.base_url(), "Using Closetly backend");
    Ok(api)
}

async fn list(api: &ClosetlyApi, category: Option<&str>) -> anyhow::Result<()> {
    if let Some(category) = category {
        validate_category(category)?;
    }

    let (models, items) = tokio::try_join!(api.list_models(), api.list_items())
        .context("failed to load the catalog")?;

    println!("Models ({}):", models.len());
    for model in &models {
        println!("  {}", render::model_line(model));
    }

    let category = category.unwrap_or(closetly_core::catalog::CATEGORY_ALL);
    let shown = filter_by_category(&items, category);
    println!("Items in '{category}' ({}):", shown.len());
    for item in shown {
        println!("  {}", render::item_line(item));
    }
    Ok(())
}

/// Submit `request` and print transitions until the job settles.
async fn follow(api: ClosetlyApi, request: TryOnRequest) -> anyhow::Result<ExitCode> {
    let poll_config = PollConfig::from_env().context("invalid poll configuration")?;
    let controller = TryOnJobController::new(Arc::new(api), poll_config);
    let mut rx = controller.subscribe();

    controller.submit(request);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted, cancelling try-on job");
                controller.cancel();
                break TryOnState::Idle;
            }
            received = rx.recv() => match received {
                Ok(state) => {
                    println!("{}", render::state_line(&state));
                    if !state.is_active() {
                        break state;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed try-on progress updates");
                }
                Err(RecvError::Closed) => break controller.state(),
            },
        }
    };

    if outcome == TryOnState::Idle {
        println!("{}", render::state_line(&outcome));
    }
    Ok(ExitCode::from(render::exit_code(&outcome)))
}
