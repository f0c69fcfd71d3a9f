//! Argument parsing for the `closetly-tryon` binary.

use std::path::PathBuf;

pub const USAGE: &str = "\
Usage:
  closetly-tryon list [category]
  closetly-tryon run <model-id> <item-id>
  closetly-tryon files <model-image-path> <clothing-image-path>
  closetly-tryon upload-item <name> <image-path> [type]
  closetly-tryon set-type <item-id> <type>
  closetly-tryon delete-item <item-id>
  closetly-tryon upload-model <name> <image-path> [gender] [style]
  closetly-tryon delete-model <model-id>
  closetly-tryon help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the catalog, optionally filtered to one category.
    List { category: Option<String> },
    /// Try on catalog entries by id.
    Run { model_id: String, item_id: String },
    /// Try on images read from local files.
    Files {
        model_path: PathBuf,
        item_path: PathBuf,
    },
    /// Add a clothing item; without a type the backend classifies it.
    UploadItem {
        name: String,
        image_path: PathBuf,
        item_type: Option<String>,
    },
    SetType { item_id: String, item_type: String },
    DeleteItem { item_id: String },
    UploadModel {
        name: String,
        image_path: PathBuf,
        gender: Option<String>,
        style: Option<String>,
    },
    DeleteModel { model_id: String },
    Help,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("missing command")]
    MissingCommand,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    WrongArity {
        command: &'static str,
        expected: &'static str,
    },
}

/// Parse the arguments that follow the program name.
pub fn parse<I>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = args.next().ok_or(UsageError::MissingCommand)?;
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "list" => match rest.as_slice() {
            [] => Ok(Command::List { category: None }),
            [category] => Ok(Command::List {
                category: Some(category.clone()),
            }),
            _ => Err(UsageError::WrongArity {
                command: "list",
                expected: "at most one category",
            }),
        },
        "run" => match rest.as_slice() {
            [model_id, item_id] => Ok(Command::Run {
                model_id: model_id.clone(),
                item_id: item_id.clone(),
            }),
            _ => Err(UsageError::WrongArity {
                command: "run",
                expected: "<model-id> <item-id>",
            }),
        },
        "files" => match rest.as_slice() {
            [model_path, item_path] => Ok(Command::Files {
                model_path: PathBuf::from(model_path),
                item_path: PathBuf::from(item_path),
            }),
            _ => Err(UsageError::WrongArity {
                command: "files",
                expected: "<model-image-path> <clothing-image-path>",
            }),
        },
        "upload-item" => match rest.as_slice() {
            [name, path] => Ok(Command::UploadItem {
                name: name.clone(),
                image_path: PathBuf::from(path),
                item_type: None,
            }),
            [name, path, item_type] => Ok(Command::UploadItem {
                name: name.clone(),
                image_path: PathBuf::from(path),
                item_type: Some(item_type.clone()),
            }),
            _ => Err(UsageError::WrongArity {
                command: "upload-item",
                expected: "<name> <image-path> [type]",
            }),
        },
        "set-type" => match rest.as_slice() {
            [item_id, item_type] => Ok(Command::SetType {
                item_id: item_id.clone(),
                item_type: item_type.clone(),
            }),
            _ => Err(UsageError::WrongArity {
                command: "set-type",
                expected: "<item-id> <type>",
            }),
        },
        "delete-item" => match rest.as_slice() {
            [item_id] => Ok(Command::DeleteItem {
                item_id: item_id.clone(),
            }),
            _ => Err(UsageError::WrongArity {
                command: "delete-item",
                expected: "<item-id>",
            }),
        },
        "upload-model" => match rest.as_slice() {
            [name, path, tags @ ..] if tags.len() <= 2 => Ok(Command::UploadModel {
                name: name.clone(),
                image_path: PathBuf::from(path),
                gender: tags.first().cloned(),
                style: tags.get(1).cloned(),
            }),
            _ => Err(UsageError::WrongArity {
                command: "upload-model",
                expected: "<name> <image-path> [gender] [style]",
            }),
        },
        "delete-model" => match rest.as_slice() {
            [model_id] => Ok(Command::DeleteModel {
                model_id: model_id.clone(),
            }),
            _ => Err(UsageError::WrongArity {
                command: "delete-model",
                expected: "<model-id>",
            }),
        },
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(UsageError::UnknownCommand(other.to_string())),
    }
}
