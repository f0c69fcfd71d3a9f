//! Plain-text rendering of catalog entries and try-on progress.

use closetly_core::catalog::{ClosetItem, ModelPhoto};
use closetly_tryon::{TryOnError, TryOnState};

/// Exit status when the user cancelled the job (128 + SIGINT).
pub const EXIT_CANCELLED: u8 = 130;

/// Exit status for a request that was rejected before submission.
pub const EXIT_INVALID: u8 = 2;

pub fn model_line(model: &ModelPhoto) -> String {
    let mut line = format!("{:<26} {}", model.id, display_name(&model.name));
    let tags: Vec<&str> = [model.gender.as_deref(), model.style.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    if model.image_base64.is_none() {
        line.push_str(" (no image)");
    }
    line
}

pub fn item_line(item: &ClosetItem) -> String {
    let mut line = format!(
        "{:<26} {} ({})",
        item.id,
        display_name(&item.name),
        item.item_type
    );
    if item.image_base64.is_none() {
        line.push_str(" (no image)");
    }
    line
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

/// One progress line per state transition.
pub fn state_line(state: &TryOnState) -> String {
    match state {
        TryOnState::Idle => "Cancelled.".to_string(),
        TryOnState::Submitting => "Submitting try-on request...".to_string(),
        TryOnState::Polling { attempt_count: 0 } => {
            "Submitted. Waiting for the result...".to_string()
        }
        TryOnState::Polling { attempt_count } => {
            format!("Still processing ({attempt_count} checks so far)...")
        }
        TryOnState::Succeeded { output_image_url } => format!("Done: {output_image_url}"),
        TryOnState::Failed(reason) => format!("Try-on failed: {reason}"),
    }
}

/// Process exit status for the state a run ended in.
pub fn exit_code(state: &TryOnState) -> u8 {
    match state {
        TryOnState::Succeeded { .. } => 0,
        TryOnState::Failed(TryOnError::Validation(_)) => EXIT_INVALID,
        TryOnState::Idle => EXIT_CANCELLED,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, image: Option<&str>) -> ClosetItem {
        ClosetItem {
            id: "i1".into(),
            name: name.into(),
            item_type: "t-shirt".into(),
            image_url: None,
            image_base64: image.map(String::from),
        }
    }

    #[test]
    fn item_line_shows_type_and_missing_image() {
        let line = item_line(&item("Blue tee", None));
        assert!(line.starts_with("i1"));
        assert!(line.contains("Blue tee (t-shirt)"));
        assert!(line.ends_with("(no image)"));

        assert!(!item_line(&item("Blue tee", Some("aTE="))).contains("no image"));
        assert!(item_line(&item("  ", Some("aTE="))).contains("(unnamed)"));
    }

    #[test]
    fn model_line_lists_known_tags() {
        let model = ModelPhoto {
            id: "m1".into(),
            name: "Front".into(),
            image_url: None,
            image_base64: Some("bTE=".into()),
            gender: Some("female".into()),
            style: None,
        };
        assert!(model_line(&model).ends_with("Front [female]"));
    }

    #[test]
    fn progress_lines() {
        assert_eq!(
            state_line(&TryOnState::Polling { attempt_count: 0 }),
            "Submitted. Waiting for the result..."
        );
        assert_eq!(
            state_line(&TryOnState::Polling { attempt_count: 4 }),
            "Still processing (4 checks so far)..."
        );
        assert_eq!(
            state_line(&TryOnState::Succeeded {
                output_image_url: "https://x/y.png".into()
            }),
            "Done: https://x/y.png"
        );
        assert_eq!(
            state_line(&TryOnState::Failed(TryOnError::Timeout { attempts: 30 })),
            "Try-on failed: Gave up waiting after 30 status checks"
        );
    }

    #[test]
    fn exit_codes_by_outcome() {
        assert_eq!(
            exit_code(&TryOnState::Succeeded {
                output_image_url: "u".into()
            }),
            0
        );
        assert_eq!(
            exit_code(&TryOnState::Failed(TryOnError::Validation("x".into()))),
            EXIT_INVALID
        );
        assert_eq!(
            exit_code(&TryOnState::Failed(TryOnError::BackendJobFailed("x".into()))),
            1
        );
        assert_eq!(exit_code(&TryOnState::Idle), EXIT_CANCELLED);
    }
}
